//! Agent configuration: command-line flags plus `SYSDASH_*` environment
//! overrides, resolved once at startup.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentConfig {
    pub bind: IpAddr,
    pub port: u16,
    /// Gap between the two CPU tick snapshots; zero selects the since-boot estimate.
    pub cpu_sample_interval: Duration,
    pub probe_timeout: Duration,
    pub top_processes: usize,
    pub top_drives: usize,
    pub history_len: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            cpu_sample_interval: Duration::from_millis(100),
            probe_timeout: Duration::from_millis(5_000),
            top_processes: 20,
            top_drives: 4,
            history_len: 20,
        }
    }
}

impl AgentConfig {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    /// Resolve from the process arguments and environment.
    pub fn from_env() -> Result<Self, String> {
        Self::from_sources(std::env::args(), |k| std::env::var(k).ok())
    }

    /// Flags win over environment, environment over defaults.
    /// `Err` carries the usage text (also for `--help`).
    pub fn from_sources<I, F>(args: I, env: F) -> Result<Self, String>
    where
        I: IntoIterator<Item = String>,
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        let env_u64 = |key: &str| env(key).and_then(|v| v.trim().parse::<u64>().ok());

        if let Some(p) = env("SYSDASH_PORT").and_then(|v| v.trim().parse::<u16>().ok()) {
            cfg.port = p;
        }
        if let Some(b) = env("SYSDASH_BIND").and_then(|v| v.trim().parse::<IpAddr>().ok()) {
            cfg.bind = b;
        }
        if let Some(ms) = env_u64("SYSDASH_CPU_SAMPLE_MS") {
            // Anything longer stalls the request handler noticeably.
            cfg.cpu_sample_interval = Duration::from_millis(ms.min(1_000));
        }
        if let Some(ms) = env_u64("SYSDASH_PROBE_TIMEOUT_MS").filter(|&ms| ms > 0) {
            cfg.probe_timeout = Duration::from_millis(ms);
        }
        if let Some(n) = env_u64("SYSDASH_TOP_PROCESSES").filter(|&n| n > 0) {
            cfg.top_processes = n as usize;
        }
        if let Some(n) = env_u64("SYSDASH_TOP_DRIVES").filter(|&n| n > 0) {
            cfg.top_drives = n as usize;
        }
        if let Some(n) = env_u64("SYSDASH_HISTORY_LEN").filter(|&n| n > 0) {
            cfg.history_len = n as usize;
        }

        let mut it = args.into_iter();
        let prog = it.next().unwrap_or_else(|| "sysdash_agent".into());
        let usage = || format!("Usage: {prog} [--port PORT|-p PORT] [--bind ADDR]");
        while let Some(arg) = it.next() {
            match arg.as_str() {
                "-h" | "--help" => return Err(usage()),
                "--port" | "-p" => cfg.port = parse_port(it.next()).ok_or_else(usage)?,
                "--bind" => cfg.bind = parse_bind(it.next()).ok_or_else(usage)?,
                _ if arg.starts_with("--port=") => {
                    cfg.port = parse_port(arg.split_once('=').map(|(_, v)| v.to_string()))
                        .ok_or_else(usage)?
                }
                _ if arg.starts_with("--bind=") => {
                    cfg.bind = parse_bind(arg.split_once('=').map(|(_, v)| v.to_string()))
                        .ok_or_else(usage)?
                }
                _ => return Err(format!("Unexpected argument `{arg}`. {}", usage())),
            }
        }
        Ok(cfg)
    }
}

fn parse_port(v: Option<String>) -> Option<u16> {
    v?.trim().parse::<u16>().ok()
}

fn parse_bind(v: Option<String>) -> Option<IpAddr> {
    v?.trim().parse::<IpAddr>().ok()
}
