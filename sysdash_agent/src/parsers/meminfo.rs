//! `/proc/meminfo` key/value lines (`MemAvailable:   8000000 kB`).

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemInfo {
    pub total_bytes: Option<u64>,
    pub available_bytes: Option<u64>,
    pub free_bytes: Option<u64>,
}

pub fn parse_meminfo(raw: &str) -> MemInfo {
    let mut info = MemInfo::default();
    for line in raw.lines() {
        let mut it = line.split_whitespace();
        let (Some(key), Some(value)) = (it.next(), it.next()) else {
            continue;
        };
        let Ok(kb) = value.parse::<u64>() else {
            continue;
        };
        let bytes = Some(kb.saturating_mul(1024));
        match key {
            "MemTotal:" => info.total_bytes = bytes,
            "MemAvailable:" => info.available_bytes = bytes,
            "MemFree:" => info.free_bytes = bytes,
            _ => {}
        }
    }
    info
}
