//! CPU utilization sampler.
//!
//! Tick counters are cumulative since boot, so a usage figure needs two
//! snapshots taken a short interval apart; the rate is
//! `1 - Σidle_delta / Σtotal_delta` across all cores.

use std::future::Future;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoreTicks {
    pub idle: u64,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpuSnapshot {
    pub idle_ticks: u64,
    pub total_ticks: u64,
    pub per_core: Vec<CoreTicks>,
    pub captured_at: Instant,
}

impl CpuSnapshot {
    pub fn new(aggregate: CoreTicks, per_core: Vec<CoreTicks>) -> Self {
        Self {
            idle_ticks: aggregate.idle,
            total_ticks: aggregate.total,
            per_core,
            captured_at: Instant::now(),
        }
    }

    fn cores(&self) -> Vec<CoreTicks> {
        if self.per_core.is_empty() {
            vec![CoreTicks {
                idle: self.idle_ticks,
                total: self.total_ticks,
            }]
        } else {
            self.per_core.clone()
        }
    }
}

/// Usage percent (rounded, 0..=100) between two snapshots of the same host.
pub fn usage_between(a: &CpuSnapshot, b: &CpuSnapshot) -> f64 {
    let (a_cores, b_cores) = if a.per_core.len() == b.per_core.len() {
        (a.cores(), b.cores())
    } else {
        // Core hotplug between snapshots: fall back to the aggregate line.
        let agg = |s: &CpuSnapshot| {
            vec![CoreTicks {
                idle: s.idle_ticks,
                total: s.total_ticks,
            }]
        };
        (agg(a), agg(b))
    };
    let (mut idle_delta, mut total_delta) = (0u64, 0u64);
    for (before, after) in a_cores.iter().zip(&b_cores) {
        idle_delta = idle_delta.saturating_add(after.idle.saturating_sub(before.idle));
        total_delta = total_delta.saturating_add(after.total.saturating_sub(before.total));
    }
    ratio_percent(idle_delta, total_delta)
}

/// Crude estimate from counters accumulated since boot.
pub fn usage_since_boot(s: &CpuSnapshot) -> f64 {
    ratio_percent(s.idle_ticks, s.total_ticks)
}

fn ratio_percent(idle: u64, total: u64) -> f64 {
    if total == 0 {
        debug!("no cpu ticks elapsed between snapshots; reporting 0% usage");
        return 0.0;
    }
    let busy = 1.0 - idle as f64 / total as f64;
    (busy * 100.0).round().clamp(0.0, 100.0)
}

/// Take two snapshots `interval` apart and return the usage between them.
/// A zero interval degrades to the single-snapshot since-boot estimate.
pub async fn sample<F, Fut, E>(interval: Duration, mut take: F) -> Result<f64, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<CpuSnapshot, E>>,
{
    let first = take().await?;
    if interval.is_zero() {
        return Ok(usage_since_boot(&first));
    }
    sleep(interval).await;
    let second = take().await?;
    debug!(
        elapsed_ms = second.captured_at.duration_since(first.captured_at).as_millis() as u64,
        "cpu snapshots captured"
    );
    Ok(usage_between(&first, &second))
}
