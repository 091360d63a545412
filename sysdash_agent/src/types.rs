//! Data types sent to the dashboard as JSON.
//! Field names here are the wire format; the dashboard reads them as-is.

use serde::{Deserialize, Serialize};

const MIB: u64 = 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessState {
    Running,
    Sleeping,
    Stopped,
    Zombie,
    Unknown,
}

impl ProcessState {
    /// Map a `ps` state code (`R`, `Ss`, `S+`, `Z`, ...) by its first letter.
    pub fn from_ps_code(code: &str) -> Self {
        match code.chars().next() {
            Some('R') => Self::Running,
            Some('S' | 'I' | 'D' | 'U') => Self::Sleeping,
            Some('T' | 't') => Self::Stopped,
            Some('Z') => Self::Zombie,
            _ => Self::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessEntry {
    pub pid: String,
    pub name: String,
    #[serde(rename = "cpu")]
    pub cpu_percent: f64,
    #[serde(rename = "memory")]
    pub memory_percent: f64,
    #[serde(rename = "status")]
    pub state: ProcessState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaType {
    #[serde(rename = "SSD")]
    Ssd,
    #[serde(rename = "HDD")]
    Hdd,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiskEntry {
    #[serde(rename = "name")]
    pub mount_name: String,
    pub total_bytes: u64,
    pub used_bytes: u64,
    pub available_bytes: u64,
    #[serde(rename = "usagePercentage")]
    pub usage_percent: u8,
    #[serde(rename = "type")]
    pub media_type: MediaType,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadAverage {
    #[serde(rename = "1min")]
    pub one: f64,
    #[serde(rename = "5min")]
    pub five: f64,
    #[serde(rename = "15min")]
    pub fifteen: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuMetrics {
    #[serde(rename = "usage")]
    pub usage_percent: u8,
    #[serde(rename = "cores")]
    pub core_count: usize,
    #[serde(rename = "clockSpeed")]
    pub clock_speed_ghz: f64,
    pub load_average: LoadAverage,
    pub uptime_seconds: u64,
}

/// Canonical memory figures, in bytes. Serialized through [`MemoryView`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemoryMetrics {
    pub total_bytes: u64,
    pub used_bytes: u64,
    pub free_bytes: u64,
    pub usage_percent: f64,
}

/// `/metrics` memory block: whole megabytes (MiB, truncated).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryView {
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub usage_percentage: u8,
}

impl From<&MemoryMetrics> for MemoryView {
    fn from(m: &MemoryMetrics) -> Self {
        Self {
            total: m.total_bytes / MIB,
            used: m.used_bytes / MIB,
            free: m.free_bytes / MIB,
            usage_percentage: m.usage_percent.round().clamp(0.0, 100.0) as u8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsResponse {
    pub cpu: CpuMetrics,
    pub memory: MemoryView,
    pub uptime: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessesResponse {
    pub processes: Vec<ProcessEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageResponse {
    pub drives: Vec<DiskEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySample {
    pub timestamp: String,
    pub cpu: u8,
    pub memory: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub samples: Vec<HistorySample>,
}
