//! Fixture-driven probe source shared by the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use sysdash_agent::platform::{Category, ProbeSource};
use sysdash_agent::probe::{HostFacts, RawSource};
use sysdash_agent::settings::MemorySettingsStore;
use sysdash_agent::types::{LoadAverage, MediaType};
use sysdash_agent::{AgentConfig, AppState, MetricsError, Platform};

#[derive(Default)]
pub struct FakeSource {
    /// Popped in order per category; the last output keeps being served.
    outputs: Mutex<HashMap<Category, VecDeque<String>>>,
    unavailable: HashSet<Category>,
    pub host: HostFacts,
    pub native_cpu: f64,
    pub kinds: HashMap<String, MediaType>,
    pub reads: Mutex<Vec<Category>>,
}

impl FakeSource {
    pub fn new(host: HostFacts) -> Self {
        Self {
            host,
            ..Default::default()
        }
    }

    pub fn with_output(self, category: Category, text: &str) -> Self {
        self.with_outputs(category, &[text])
    }

    pub fn with_outputs(self, category: Category, texts: &[&str]) -> Self {
        self.outputs
            .lock()
            .unwrap()
            .insert(category, texts.iter().map(|t| t.to_string()).collect());
        self
    }

    pub fn unavailable(mut self, category: Category) -> Self {
        self.unavailable.insert(category);
        self
    }

    pub fn with_native_cpu(mut self, usage: f64) -> Self {
        self.native_cpu = usage;
        self
    }

    pub fn with_kind(mut self, mount: &str, kind: MediaType) -> Self {
        self.kinds.insert(mount.to_string(), kind);
        self
    }
}

#[async_trait]
impl RawSource for FakeSource {
    async fn read(&self, category: Category, source: ProbeSource) -> Result<String, MetricsError> {
        self.reads.lock().unwrap().push(category);
        let missing = || MetricsError::ProbeUnavailable {
            category,
            probe: source.to_string(),
            reason: "fixture missing".into(),
        };
        if self.unavailable.contains(&category) {
            return Err(missing());
        }
        let mut outputs = self.outputs.lock().unwrap();
        let queue = outputs.get_mut(&category).ok_or_else(missing)?;
        if queue.len() > 1 {
            Ok(queue.pop_front().unwrap())
        } else {
            queue.front().cloned().ok_or_else(missing)
        }
    }

    async fn host_facts(&self) -> HostFacts {
        self.host.clone()
    }

    async fn native_cpu_usage(&self, _interval: Duration) -> Result<f64, MetricsError> {
        Ok(self.native_cpu)
    }

    async fn media_kinds(&self) -> HashMap<String, MediaType> {
        self.kinds.clone()
    }
}

pub fn host(total_memory: u64, free_memory: u64) -> HostFacts {
    HostFacts {
        total_memory,
        free_memory,
        core_count: 8,
        clock_mhz: 3200,
        load_average: LoadAverage {
            one: 1.5,
            five: 1.0,
            fifteen: 0.5,
        },
        uptime_secs: 273_906,
    }
}

pub fn fast_config() -> AgentConfig {
    AgentConfig {
        cpu_sample_interval: Duration::from_millis(1),
        ..AgentConfig::default()
    }
}

pub fn state(platform: Platform, source: FakeSource) -> AppState {
    AppState::new(
        platform,
        fast_config(),
        Arc::new(source),
        Arc::new(MemorySettingsStore::new()),
    )
}

pub const PROC_STAT_A: &str = "cpu  600 0 400 1000 0 0 0 0 0 0\nintr 12345\n";
pub const PROC_STAT_B: &str = "cpu  650 0 400 1050 0 0 0 0 0 0\nintr 12399\n";

pub const MEMINFO: &str = "MemTotal:       16000000 kB\nMemFree:         2000000 kB\nMemAvailable:    8000000 kB\nBuffers:          100000 kB\n";

pub const VM_STAT: &str = "\
Mach Virtual Memory Statistics: (page size of 4096 bytes)
Pages free:                              100000.
Pages active:                            200000.
Pages inactive:                          150000.
Pages speculative:                        20000.
Pages wired down:                         50000.
Pages occupied by compressor:             10000.
";

pub fn ps_output(rows: usize) -> String {
    let mut out = String::from("  PID COMM             %CPU %MEM STAT\n");
    for i in 0..rows {
        out.push_str(&format!(
            "{:>5} proc{i}  {:.1} {:.1} S\n",
            100 + i,
            (i % 37) as f64 * 1.5,
            (i % 11) as f64 * 0.3
        ));
    }
    out
}

pub const DF_LINUX: &str = "\
Filesystem      Size  Used Avail Use% Mounted on
udev            7.8G     0  7.8G   0% /dev
tmpfs           1.6G  2.0M  1.6G   1% /run
/dev/nvme0n1p2  468G  301G  144G  68% /
/dev/nvme0n1p1  511M  6.1M  505M   2% /boot/efi
/dev/sda1       1.8T  1.2T  600G  67% /mnt/data
/dev/sdb1       100G   90G   10G  90% /mnt/backup
/dev/sdc1        50G    5G   45G  10% /mnt/My Files
";

pub const WMIC: &str = "\
Caption  FreeSpace     Size
C:       107374182400  536870912000
D:
E:       0             1073741824
";
