//! Darwin `vm_stat` page counters.
//!
//! ```text
//! Mach Virtual Memory Statistics: (page size of 16384 bytes)
//! Pages free:                               12345.
//! Pages active:                            234567.
//! ```

pub const DEFAULT_PAGE_SIZE: u64 = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VmStat {
    pub page_size: u64,
    pub free: u64,
    pub active: u64,
    pub inactive: u64,
    pub speculative: u64,
    pub wired: u64,
    pub compressed: u64,
}

impl Default for VmStat {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            free: 0,
            active: 0,
            inactive: 0,
            speculative: 0,
            wired: 0,
            compressed: 0,
        }
    }
}

/// Missing counters stay 0.
pub fn parse_vm_stat(raw: &str) -> VmStat {
    let mut stat = VmStat::default();
    for line in raw.lines() {
        let line = line.trim();
        if let Some(size) = page_size(line) {
            stat.page_size = size;
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let Ok(pages) = value.trim().trim_end_matches('.').parse::<u64>() else {
            continue;
        };
        match key.trim() {
            "Pages free" => stat.free = pages,
            "Pages active" => stat.active = pages,
            "Pages inactive" => stat.inactive = pages,
            "Pages speculative" => stat.speculative = pages,
            "Pages wired down" => stat.wired = pages,
            "Pages occupied by compressor" => stat.compressed = pages,
            _ => {}
        }
    }
    stat
}

fn page_size(line: &str) -> Option<u64> {
    let rest = &line[line.find("page size of ")? + "page size of ".len()..];
    rest.split_whitespace()
        .next()?
        .parse::<u64>()
        .ok()
        .filter(|&v| v > 0)
}
