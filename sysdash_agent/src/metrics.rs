//! Metrics collection: probe → parse → normalize for each category.
//!
//! Each call re-probes the OS from scratch. Within one call a failure aborts
//! the whole result unless a local fallback is defined for it; separate
//! categories are collected by separate calls and cannot take each other down.

use std::cmp::Ordering;
use std::fmt;
use tracing::{debug, warn};

use crate::error::MetricsError;
use crate::normalize::{
    disk_from_df, disk_from_wmic, format_uptime, memory_from_available, memory_from_vm_stat,
    mhz_to_ghz, process_from_task,
};
use crate::parsers::{parse_df, parse_meminfo, parse_proc_stat, parse_ps, parse_tasklist, parse_vm_stat, parse_wmic};
use crate::platform::{Category, Platform, ProbeSource};
use crate::probe::HostFacts;
use crate::sampler;
use crate::state::AppState;
use crate::types::{
    CpuMetrics, DiskEntry, MemoryMetrics, MemoryView, MetricsResponse, ProcessEntry,
    ProcessesResponse, StorageResponse,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Probing,
    Parsing,
    Normalizing,
    Responding,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Probing => "probing",
            Self::Parsing => "parsing",
            Self::Normalizing => "normalizing",
            Self::Responding => "responding",
        })
    }
}

fn enter(category: Category, phase: Phase) {
    debug!(%category, %phase, "collector phase");
}

/// CPU + memory for `/metrics`. Both are gathered concurrently so the memory
/// probe overlaps the CPU sampling pause.
pub async fn collect_metrics(state: &AppState) -> Result<MetricsResponse, MetricsError> {
    let host = state.source.host_facts().await;
    let (usage, memory) = tokio::try_join!(cpu_usage(state), collect_memory(state, &host))?;

    enter(Category::Cpu, Phase::Responding);
    Ok(MetricsResponse {
        cpu: CpuMetrics {
            usage_percent: usage.round().clamp(0.0, 100.0) as u8,
            core_count: host.core_count,
            clock_speed_ghz: mhz_to_ghz(host.clock_mhz),
            load_average: host.load_average,
            uptime_seconds: host.uptime_secs,
        },
        memory: MemoryView::from(&memory),
        uptime: format_uptime(host.uptime_secs),
    })
}

/// Two-snapshot CPU usage. Linux reads `/proc/stat` ticks; the other
/// platforms run the same refresh/wait/refresh contract natively.
pub async fn cpu_usage(state: &AppState) -> Result<f64, MetricsError> {
    let interval = state.config.cpu_sample_interval;
    let source = state.source.as_ref();
    let probe = state.platform.source(Category::Cpu);
    enter(Category::Cpu, Phase::Probing);
    if probe == ProbeSource::Native {
        return source.native_cpu_usage(interval).await;
    }
    let sampled = sampler::sample(interval, move || async move {
        let raw = source.read(Category::Cpu, probe).await?;
        enter(Category::Cpu, Phase::Parsing);
        let snap = parse_proc_stat(&raw);
        if snap.total_ticks == 0 && snap.per_core.is_empty() {
            return Err(MetricsError::parse(Category::Cpu, "no cpu tick lines"));
        }
        Ok::<_, MetricsError>(snap)
    })
    .await;
    match sampled {
        Err(MetricsError::ProbeUnavailable { reason, .. }) => {
            warn!(%reason, "cpu tick source unavailable; falling back to native sampling");
            source.native_cpu_usage(interval).await
        }
        other => other,
    }
}

pub async fn collect_memory(state: &AppState, host: &HostFacts) -> Result<MemoryMetrics, MetricsError> {
    let source = state.source.as_ref();
    let probe = state.platform.source(Category::Memory);
    enter(Category::Memory, Phase::Probing);
    match state.platform {
        Platform::Linux => {
            let info = match source.read(Category::Memory, probe).await {
                Ok(raw) => {
                    enter(Category::Memory, Phase::Parsing);
                    parse_meminfo(&raw)
                }
                Err(MetricsError::ProbeUnavailable { reason, .. }) => {
                    warn!(%reason, "meminfo unavailable; using generic free memory");
                    Default::default()
                }
                Err(e) => return Err(e),
            };
            enter(Category::Memory, Phase::Normalizing);
            let total = info.total_bytes.unwrap_or(host.total_memory);
            Ok(match info.available_bytes {
                Some(available) => memory_from_available(total, available),
                None => {
                    debug!("no MemAvailable; used = total - freemem");
                    memory_from_available(host.total_memory, host.free_memory)
                }
            })
        }
        Platform::Darwin => {
            let raw = source.read(Category::Memory, probe).await?;
            enter(Category::Memory, Phase::Parsing);
            let vm = parse_vm_stat(&raw);
            if vm.free == 0 && vm.active == 0 && vm.inactive == 0 && vm.wired == 0 && vm.compressed == 0 {
                return Err(MetricsError::parse(Category::Memory, "no page counters in vm_stat output"));
            }
            enter(Category::Memory, Phase::Normalizing);
            Ok(memory_from_vm_stat(&vm, host.total_memory))
        }
        Platform::Windows => {
            enter(Category::Memory, Phase::Normalizing);
            Ok(memory_from_available(host.total_memory, host.free_memory))
        }
    }
}

pub async fn collect_processes(state: &AppState) -> Result<ProcessesResponse, MetricsError> {
    let probe = state.platform.source(Category::Processes);
    enter(Category::Processes, Phase::Probing);
    let raw = state.source.read(Category::Processes, probe).await?;

    enter(Category::Processes, Phase::Parsing);
    let (entries, data_lines) = match state.platform {
        Platform::Linux | Platform::Darwin => {
            (parse_ps(&raw), non_blank_lines(&raw).saturating_sub(1))
        }
        Platform::Windows => {
            let rows = parse_tasklist(&raw);
            enter(Category::Processes, Phase::Normalizing);
            let total = state.source.host_facts().await.total_memory;
            let entries: Vec<ProcessEntry> =
                rows.iter().map(|r| process_from_task(r, total)).collect();
            (entries, non_blank_lines(&raw))
        }
    };
    if entries.is_empty() && data_lines > 0 {
        return Err(MetricsError::parse(
            Category::Processes,
            format!("none of {data_lines} process rows could be read"),
        ));
    }

    enter(Category::Processes, Phase::Responding);
    Ok(ProcessesResponse {
        processes: top_processes(entries, state.config.top_processes),
    })
}

pub async fn collect_storage(state: &AppState) -> Result<StorageResponse, MetricsError> {
    let probe = state.platform.source(Category::Disks);
    enter(Category::Disks, Phase::Probing);
    let raw = state.source.read(Category::Disks, probe).await?;
    let kinds = state.source.media_kinds().await;

    enter(Category::Disks, Phase::Parsing);
    let drives: Vec<DiskEntry> = match state.platform {
        Platform::Linux | Platform::Darwin => {
            let rows = parse_df(&raw);
            enter(Category::Disks, Phase::Normalizing);
            rows.iter().map(|r| disk_from_df(r, &kinds)).collect()
        }
        Platform::Windows => {
            let rows = parse_wmic(&raw);
            enter(Category::Disks, Phase::Normalizing);
            rows.iter().map(|r| disk_from_wmic(r, &kinds)).collect()
        }
    };

    enter(Category::Disks, Phase::Responding);
    Ok(StorageResponse {
        drives: top_drives(drives, state.config.top_drives),
    })
}

/// Highest CPU first (ties by memory), at most `n`.
pub fn top_processes(mut entries: Vec<ProcessEntry>, n: usize) -> Vec<ProcessEntry> {
    entries.sort_by(|a, b| {
        b.cpu_percent
            .partial_cmp(&a.cpu_percent)
            .unwrap_or(Ordering::Equal)
            .then_with(|| {
                b.memory_percent
                    .partial_cmp(&a.memory_percent)
                    .unwrap_or(Ordering::Equal)
            })
    });
    entries.truncate(n);
    entries
}

/// Fullest drive first, at most `n`.
pub fn top_drives(mut drives: Vec<DiskEntry>, n: usize) -> Vec<DiskEntry> {
    drives.sort_by(|a, b| b.usage_percent.cmp(&a.usage_percent));
    drives.truncate(n);
    drives
}

fn non_blank_lines(raw: &str) -> usize {
    raw.lines().filter(|l| !l.trim().is_empty()).count()
}
