//! `wmic logicaldisk get size,freespace,caption` table.
//! wmic orders columns alphabetically: `Caption  FreeSpace  Size`.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WmicRow {
    pub caption: String,
    pub free_bytes: u64,
    pub size_bytes: u64,
}

pub fn parse_wmic(raw: &str) -> Vec<WmicRow> {
    raw.trim().lines().filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<WmicRow> {
    let mut it = line.split_whitespace();
    let caption = it.next()?;
    // Header row and drives without media (no size columns) fall out here.
    let free_bytes = it.next()?.parse::<u64>().ok()?;
    let size_bytes = it.next()?.parse::<u64>().ok()?;
    if size_bytes == 0 {
        return None;
    }
    Some(WmicRow {
        caption: caption.to_string(),
        free_bytes,
        size_bytes,
    })
}
