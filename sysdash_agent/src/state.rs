//! Shared agent state. Metric collection itself keeps nothing between
//! requests; only the history ring and the settings store are shared.

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::AgentConfig;
use crate::history::MetricsHistory;
use crate::platform::Platform;
use crate::probe::{RawSource, SystemSource};
use crate::settings::{MemorySettingsStore, SettingsStore};

pub type SharedSource = Arc<dyn RawSource>;
pub type SharedHistory = Arc<Mutex<MetricsHistory>>;
pub type SharedSettings = Arc<dyn SettingsStore>;

#[derive(Clone)]
pub struct AppState {
    pub platform: Platform,
    pub config: Arc<AgentConfig>,
    pub source: SharedSource,
    pub history: SharedHistory,
    pub settings: SharedSettings,
}

impl AppState {
    pub fn new(
        platform: Platform,
        config: AgentConfig,
        source: SharedSource,
        settings: SharedSettings,
    ) -> Self {
        let history = Arc::new(Mutex::new(MetricsHistory::new(config.history_len)));
        Self {
            platform,
            config: Arc::new(config),
            source,
            history,
            settings,
        }
    }

    /// State wired to the live host.
    pub fn for_host(platform: Platform, config: AgentConfig) -> Self {
        let source = Arc::new(SystemSource::new(config.probe_timeout));
        Self::new(
            platform,
            config,
            source,
            Arc::new(MemorySettingsStore::new()),
        )
    }
}
