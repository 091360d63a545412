//! Text parsers for raw probe output. None of them panics, and empty input
//! always yields an empty or zeroed result; malformed rows are skipped.

pub mod df;
pub mod meminfo;
pub mod procstat;
pub mod ps;
pub mod tasklist;
pub mod vmstat;
pub mod wmic;

pub use df::{parse_df, size_to_gb, DfRow};
pub use meminfo::{parse_meminfo, MemInfo};
pub use procstat::parse_proc_stat;
pub use ps::parse_ps;
pub use tasklist::{parse_tasklist, TaskRow};
pub use vmstat::{parse_vm_stat, VmStat};
pub use wmic::{parse_wmic, WmicRow};

/// Lenient float parse: anything non-numeric (or NaN/inf) becomes 0.
pub(crate) fn lenient_f64(token: Option<&str>) -> f64 {
    token
        .map(|t| t.trim().trim_end_matches('%'))
        .and_then(|t| t.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}
