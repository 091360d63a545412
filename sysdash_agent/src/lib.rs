//! sysdash_agent: cross-platform system metrics collection served as JSON over HTTP.
//!
//! Layering, leaves first: [`platform`] picks the probe source for a metric
//! category, [`probe`] fetches raw text, [`parsers`] type it, [`normalize`]
//! converts units, [`sampler`] turns CPU tick snapshots into a rate and
//! [`metrics`] stitches the pipeline together for the [`http`] handlers.

pub mod config;
pub mod error;
pub mod history;
pub mod http;
pub mod metrics;
pub mod normalize;
pub mod parsers;
pub mod platform;
pub mod probe;
pub mod sampler;
pub mod settings;
pub mod state;
pub mod terminal;
pub mod types;

pub use config::AgentConfig;
pub use error::MetricsError;
pub use platform::Platform;
pub use state::AppState;
