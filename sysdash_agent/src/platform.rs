//! Platform discrimination and the probe strategy table.

use once_cell::sync::OnceCell;
use std::fmt;

use crate::error::MetricsError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Linux,
    Darwin,
    Windows,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Cpu,
    Memory,
    Processes,
    Disks,
}

/// Where the raw data for one category comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeSource {
    File(&'static str),
    Command {
        program: &'static str,
        args: &'static [&'static str],
    },
    /// Served by native OS APIs through sysinfo rather than text scraping.
    Native,
}

const PS: ProbeSource = ProbeSource::Command {
    program: "ps",
    args: &["-ax", "-o", "pid,comm,%cpu,%mem,state"],
};

const DF: ProbeSource = ProbeSource::Command {
    program: "df",
    args: &["-h"],
};

impl Platform {
    /// Map an OS name as reported by `std::env::consts::OS`.
    pub fn from_os_name(os: &str) -> Result<Self, MetricsError> {
        match os {
            "linux" => Ok(Self::Linux),
            "macos" | "darwin" => Ok(Self::Darwin),
            "windows" => Ok(Self::Windows),
            other => Err(MetricsError::UnsupportedPlatform(other.to_string())),
        }
    }

    /// The host platform, resolved once per process.
    pub fn current() -> Result<Self, MetricsError> {
        static CURRENT: OnceCell<Platform> = OnceCell::new();
        CURRENT
            .get_or_try_init(|| Self::from_os_name(std::env::consts::OS))
            .copied()
    }

    pub fn source(self, category: Category) -> ProbeSource {
        match (self, category) {
            (Self::Linux, Category::Cpu) => ProbeSource::File("/proc/stat"),
            (Self::Linux, Category::Memory) => ProbeSource::File("/proc/meminfo"),
            (Self::Linux | Self::Darwin, Category::Processes) => PS,
            (Self::Linux | Self::Darwin, Category::Disks) => DF,
            (Self::Darwin, Category::Cpu) => ProbeSource::Native,
            (Self::Darwin, Category::Memory) => ProbeSource::Command {
                program: "vm_stat",
                args: &[],
            },
            (Self::Windows, Category::Cpu | Category::Memory) => ProbeSource::Native,
            (Self::Windows, Category::Processes) => ProbeSource::Command {
                program: "tasklist",
                args: &["/FO", "CSV", "/NH"],
            },
            (Self::Windows, Category::Disks) => ProbeSource::Command {
                program: "wmic",
                args: &["logicaldisk", "get", "size,freespace,caption"],
            },
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Linux => "linux",
            Self::Darwin => "darwin",
            Self::Windows => "windows",
        })
    }
}

impl Category {
    /// Phrase used in user-facing error messages.
    pub fn description(self) -> &'static str {
        match self {
            Self::Cpu | Self::Memory => "system metrics",
            Self::Processes => "processes",
            Self::Disks => "storage information",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Cpu => "cpu",
            Self::Memory => "memory",
            Self::Processes => "processes",
            Self::Disks => "disks",
        })
    }
}

impl fmt::Display for ProbeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => f.write_str(path),
            Self::Command { program, args } if args.is_empty() => f.write_str(program),
            Self::Command { program, args } => write!(f, "{program} {}", args.join(" ")),
            Self::Native => f.write_str("native"),
        }
    }
}
