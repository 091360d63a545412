//! Unit normalization into the canonical schema: bytes, percentages in
//! `0..=100`, counts.

use std::collections::HashMap;

use crate::parsers::{DfRow, TaskRow, VmStat, WmicRow};
use crate::types::{DiskEntry, MediaType, MemoryMetrics, ProcessEntry, ProcessState};

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// `round(used / total * 100)` clamped to `[0, 100]`. A zero, negative or
/// non-finite total yields 0.
pub fn usage_percent(used: f64, total: f64) -> f64 {
    if !(total.is_finite() && total > 0.0) || !used.is_finite() {
        return 0.0;
    }
    (used / total * 100.0).round().clamp(0.0, 100.0)
}

/// Build memory figures from a used byte count. `used` is capped at `total`
/// so that `used + free == total` always holds.
pub fn memory_from_used(total_bytes: u64, used_bytes: u64) -> MemoryMetrics {
    let used_bytes = used_bytes.min(total_bytes);
    MemoryMetrics {
        total_bytes,
        used_bytes,
        free_bytes: total_bytes - used_bytes,
        usage_percent: usage_percent(used_bytes as f64, total_bytes as f64),
    }
}

/// Linux: used is everything the kernel does not report as available
/// (reclaimable cache already counts as available). The same rule applies to
/// the generic `freemem` fallback.
pub fn memory_from_available(total_bytes: u64, available_bytes: u64) -> MemoryMetrics {
    memory_from_used(total_bytes, total_bytes.saturating_sub(available_bytes))
}

/// Darwin: used = active + wired + compressed pages. Inactive and
/// speculative pages are reclaimable cache and count as free.
pub fn memory_from_vm_stat(vm: &VmStat, total_bytes: u64) -> MemoryMetrics {
    let pages = vm
        .active
        .saturating_add(vm.wired)
        .saturating_add(vm.compressed);
    memory_from_used(total_bytes, pages.saturating_mul(vm.page_size))
}

pub fn gb_to_bytes(gb: f64) -> u64 {
    if gb.is_finite() && gb > 0.0 {
        (gb * GIB).round() as u64
    } else {
        0
    }
}

pub fn disk_from_df(row: &DfRow, kinds: &HashMap<String, MediaType>) -> DiskEntry {
    let media_type = match kinds.get(&row.mount) {
        Some(kind) if *kind != MediaType::Unknown => *kind,
        // Heuristic: Darwin block devices are /dev/diskN and almost always SSDs.
        _ if row.device.contains("disk") => MediaType::Ssd,
        _ => MediaType::Hdd,
    };
    DiskEntry {
        mount_name: row.mount.clone(),
        total_bytes: gb_to_bytes(row.total_gb),
        used_bytes: gb_to_bytes(row.used_gb),
        available_bytes: gb_to_bytes(row.available_gb),
        usage_percent: row.usage_percent.min(100),
        media_type,
    }
}

pub fn disk_from_wmic(row: &WmicRow, kinds: &HashMap<String, MediaType>) -> DiskEntry {
    let free = row.free_bytes.min(row.size_bytes);
    let used = row.size_bytes - free;
    // sysinfo reports Windows mount points as "C:\", wmic captions as "C:".
    let media_type = kinds
        .get(&row.caption)
        .or_else(|| kinds.get(&format!("{}\\", row.caption)))
        .copied()
        .unwrap_or(MediaType::Unknown);
    DiskEntry {
        mount_name: row.caption.clone(),
        total_bytes: row.size_bytes,
        used_bytes: used,
        available_bytes: free,
        usage_percent: usage_percent(used as f64, row.size_bytes as f64) as u8,
        media_type,
    }
}

/// tasklist carries no CPU column, so CPU is reported as 0.
pub fn process_from_task(row: &TaskRow, total_memory_bytes: u64) -> ProcessEntry {
    let memory_percent = if total_memory_bytes == 0 {
        0.0
    } else {
        let pct = row.mem_bytes as f64 / total_memory_bytes as f64 * 100.0;
        (pct * 10.0).round().clamp(0.0, 1000.0) / 10.0
    };
    ProcessEntry {
        pid: row.pid.clone(),
        name: row.name.clone(),
        cpu_percent: 0.0,
        memory_percent,
        state: ProcessState::Unknown,
    }
}

pub fn mhz_to_ghz(mhz: u64) -> f64 {
    (mhz as f64 / 1000.0 * 100.0).round() / 100.0
}

/// `"3d 04:05:06"`.
pub fn format_uptime(secs: u64) -> String {
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    let minutes = (secs % 3_600) / 60;
    let seconds = secs % 60;
    format!("{days}d {hours:02}:{minutes:02}:{seconds:02}")
}
