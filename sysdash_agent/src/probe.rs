//! Platform probes: run a command or read a pseudo-file and hand back raw
//! text, plus host facts served natively by sysinfo.

use async_trait::async_trait;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::process::Stdio;
use std::time::Duration;
use sysinfo::{CpuRefreshKind, DiskKind, Disks, MemoryRefreshKind, RefreshKind, System};
use tokio::process::Command;
use tokio::time::{sleep, timeout};
use tracing::{debug, warn};

use crate::error::MetricsError;
use crate::platform::{Category, ProbeSource};
use crate::types::{LoadAverage, MediaType};

/// Facts every platform can answer without text scraping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostFacts {
    pub total_memory: u64,
    /// Coarse free memory, used when a finer memory probe is unavailable.
    pub free_memory: u64,
    pub core_count: usize,
    pub clock_mhz: u64,
    pub load_average: LoadAverage,
    pub uptime_secs: u64,
}

#[async_trait]
pub trait RawSource: Send + Sync {
    /// Fetch the raw text behind a file or command probe.
    async fn read(&self, category: Category, source: ProbeSource) -> Result<String, MetricsError>;

    async fn host_facts(&self) -> HostFacts;

    /// CPU usage for platforms without a tick text source: refresh, wait, refresh.
    async fn native_cpu_usage(&self, interval: Duration) -> Result<f64, MetricsError>;

    /// Mount point → media kind, where the OS can tell.
    async fn media_kinds(&self) -> HashMap<String, MediaType>;
}

/// Probes the live host. Every call starts from fresh OS state.
#[derive(Debug, Clone)]
pub struct SystemSource {
    timeout: Duration,
}

impl SystemSource {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    async fn read_file(&self, category: Category, path: &'static str) -> Result<String, MetricsError> {
        match timeout(self.timeout, tokio::fs::read_to_string(path)).await {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(MetricsError::ProbeUnavailable {
                category,
                probe: path.to_string(),
                reason: e.to_string(),
            }),
            Err(_) => Err(self.timed_out(category, path.to_string())),
        }
    }

    async fn run_command(
        &self,
        category: Category,
        program: &'static str,
        args: &'static [&'static str],
    ) -> Result<String, MetricsError> {
        let probe = ProbeSource::Command { program, args }.to_string();
        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // Dropping the future (timeout or client gone) kills the child.
            .kill_on_drop(true)
            .output();
        let output = match timeout(self.timeout, child).await {
            Ok(Ok(out)) => out,
            Ok(Err(e)) => {
                let reason = if e.kind() == ErrorKind::NotFound {
                    format!("`{program}` not found on PATH")
                } else {
                    e.to_string()
                };
                return Err(MetricsError::ProbeUnavailable {
                    category,
                    probe,
                    reason,
                });
            }
            Err(_) => return Err(self.timed_out(category, probe)),
        };
        let stdout = decode_output(&output.stdout);
        if !output.status.success() {
            let stderr = decode_output(&output.stderr);
            // df exits 1 when a single mount is unreadable but still prints the rest.
            if stdout.trim().is_empty() {
                return Err(MetricsError::ProbeUnavailable {
                    category,
                    probe,
                    reason: format!("{}: {}", output.status, stderr.trim()),
                });
            }
            warn!(%probe, status = %output.status, stderr = %stderr.trim(), "probe exited non-zero; using partial output");
        }
        debug!(%probe, bytes = stdout.len(), "probe finished");
        Ok(stdout)
    }

    fn timed_out(&self, category: Category, probe: String) -> MetricsError {
        MetricsError::ProbeTimeout {
            category,
            probe,
            timeout_ms: self.timeout.as_millis() as u64,
        }
    }
}

#[async_trait]
impl RawSource for SystemSource {
    async fn read(&self, category: Category, source: ProbeSource) -> Result<String, MetricsError> {
        match source {
            ProbeSource::File(path) => self.read_file(category, path).await,
            ProbeSource::Command { program, args } => self.run_command(category, program, args).await,
            ProbeSource::Native => Err(MetricsError::ProbeUnavailable {
                category,
                probe: source.to_string(),
                reason: "no text source on this platform".into(),
            }),
        }
    }

    async fn host_facts(&self) -> HostFacts {
        let refresh_kind = RefreshKind::nothing()
            .with_cpu(CpuRefreshKind::nothing().with_frequency())
            .with_memory(MemoryRefreshKind::nothing().with_ram());
        let sys = System::new_with_specifics(refresh_kind);
        let load = System::load_average();
        HostFacts {
            total_memory: sys.total_memory(),
            free_memory: sys.free_memory(),
            core_count: sys.cpus().len(),
            clock_mhz: sys.cpus().iter().map(|c| c.frequency()).max().unwrap_or(0),
            load_average: LoadAverage {
                one: load.one,
                five: load.five,
                fifteen: load.fifteen,
            },
            uptime_secs: System::uptime(),
        }
    }

    async fn native_cpu_usage(&self, interval: Duration) -> Result<f64, MetricsError> {
        let mut sys = System::new_with_specifics(
            RefreshKind::nothing().with_cpu(CpuRefreshKind::nothing().with_cpu_usage()),
        );
        // No tick counters to estimate from here, so a zero interval still
        // waits sysinfo's minimum gap; a single refresh always reads 0%.
        sleep(interval.max(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL)).await;
        sys.refresh_cpu_usage();
        let usage = f64::from(sys.global_cpu_usage());
        Ok(if usage.is_finite() {
            usage.round().clamp(0.0, 100.0)
        } else {
            0.0
        })
    }

    async fn media_kinds(&self) -> HashMap<String, MediaType> {
        Disks::new_with_refreshed_list()
            .list()
            .iter()
            .map(|d| {
                let kind = match d.kind() {
                    DiskKind::SSD => MediaType::Ssd,
                    DiskKind::HDD => MediaType::Hdd,
                    DiskKind::Unknown(_) => MediaType::Unknown,
                };
                (d.mount_point().to_string_lossy().into_owned(), kind)
            })
            .collect()
    }
}

/// Console tools on Windows may emit UTF-16LE when stdout is a pipe.
fn decode_output(bytes: &[u8]) -> String {
    let utf16 = bytes.starts_with(&[0xFF, 0xFE])
        || (bytes.len() >= 4 && bytes.len() % 2 == 0 && bytes[1] == 0 && bytes[3] == 0);
    if utf16 {
        let units: Vec<u16> = bytes
            .chunks_exact(2)
            .map(|c| u16::from_le_bytes([c[0], c[1]]))
            .skip_while(|&u| u == 0xFEFF)
            .collect();
        String::from_utf16_lossy(&units)
    } else {
        String::from_utf8_lossy(bytes).into_owned()
    }
}
