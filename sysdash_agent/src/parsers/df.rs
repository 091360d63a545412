//! `df -h` table, physical devices only.
//!
//! Sizes are converted to GB through a fixed multiplier table that treats
//! binary and decimal suffixes alike (`G` == `GB` == `GiB`). The result is
//! approximate and is kept that way so numbers match what `df -h` prints.

#[derive(Debug, Clone, PartialEq)]
pub struct DfRow {
    pub device: String,
    pub mount: String,
    pub total_gb: f64,
    pub used_gb: f64,
    pub available_gb: f64,
    pub usage_percent: u8,
}

pub fn parse_df(raw: &str) -> Vec<DfRow> {
    raw.trim()
        .lines()
        .map(str::trim)
        .filter(|l| l.starts_with("/dev/"))
        .filter_map(parse_line)
        .collect()
}

fn parse_line(line: &str) -> Option<DfRow> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 6 {
        return None;
    }
    // Linux prints one percentage column, macOS adds %iused after the inode
    // counts; the mount point is whatever follows the last percentage. The
    // final token always belongs to the mount, even when it ends in '%'.
    let last_pct = 4 + tokens[4..tokens.len() - 1]
        .iter()
        .rposition(|t| t.ends_with('%'))?;
    let usage = tokens[4]
        .trim_end_matches('%')
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())?;
    Some(DfRow {
        device: tokens[0].to_string(),
        mount: tokens[last_pct + 1..].join(" "),
        total_gb: size_to_gb(tokens[1]),
        used_gb: size_to_gb(tokens[2]),
        available_gb: size_to_gb(tokens[3]),
        usage_percent: usage.round().clamp(0.0, 100.0) as u8,
    })
}

/// Convert a unit-suffixed size such as `"2TB"`, `"512M"` or `"7.5Gi"` to GB.
///
/// Unknown or missing suffixes are taken as already being GB.
pub fn size_to_gb(size: &str) -> f64 {
    let size = size.trim();
    let split = size
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == ','))
        .unwrap_or(size.len());
    let (number, unit) = size.split_at(split);
    let num = number
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0);
    match unit.trim().to_ascii_uppercase().as_str() {
        "TB" | "T" | "TI" | "TIB" => num * 1024.0,
        "GB" | "G" | "GI" | "GIB" => num,
        "MB" | "M" | "MI" | "MIB" => num / 1024.0,
        _ => num,
    }
}
