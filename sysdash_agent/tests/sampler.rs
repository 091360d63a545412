//! CPU sampler: usage from two tick snapshots.

use std::time::Duration;

use sysdash_agent::parsers::parse_proc_stat;
use sysdash_agent::sampler::{sample, usage_between, usage_since_boot, CoreTicks, CpuSnapshot};

fn snap(idle: u64, total: u64) -> CpuSnapshot {
    CpuSnapshot::new(CoreTicks { idle, total }, Vec::new())
}

fn cores(ticks: &[(u64, u64)]) -> CpuSnapshot {
    let per_core: Vec<CoreTicks> = ticks
        .iter()
        .map(|&(idle, total)| CoreTicks { idle, total })
        .collect();
    let aggregate = CoreTicks {
        idle: per_core.iter().map(|c| c.idle).sum(),
        total: per_core.iter().map(|c| c.total).sum(),
    };
    CpuSnapshot::new(aggregate, per_core)
}

#[test]
fn half_idle_interval_is_fifty_percent() {
    let a = snap(1000, 2000);
    let b = snap(1050, 2100);
    assert_eq!(usage_between(&a, &b), 50.0);
}

#[test]
fn zero_elapsed_ticks_reports_zero() {
    let a = cores(&[(500, 1000), (700, 1000)]);
    assert_eq!(usage_between(&a, &a.clone()), 0.0);
    assert_eq!(usage_since_boot(&snap(0, 0)), 0.0);
}

#[test]
fn deltas_aggregate_across_cores() {
    // core0 fully busy, core1 fully idle over the interval.
    let a = cores(&[(100, 1000), (100, 1000)]);
    let b = cores(&[(100, 1100), (200, 1100)]);
    assert_eq!(usage_between(&a, &b), 50.0);

    // core0 25% busy, core1 75% busy, both advanced by 100 ticks.
    let b = cores(&[(175, 1100), (125, 1100)]);
    assert_eq!(usage_between(&a, &b), 50.0);
}

#[test]
fn counter_regressions_do_not_go_negative() {
    let a = snap(2000, 4000);
    let b = snap(1000, 4100);
    let usage = usage_between(&a, &b);
    assert!((0.0..=100.0).contains(&usage));
    assert_eq!(usage, 100.0);
}

#[test]
fn core_count_change_uses_aggregate() {
    let a = cores(&[(100, 200), (100, 200)]);
    let b = cores(&[(150, 300), (150, 300), (0, 10)]);
    let usage = usage_between(&a, &b);
    assert!((0.0..=100.0).contains(&usage));
}

#[test]
fn since_boot_estimate() {
    assert_eq!(usage_since_boot(&snap(750, 1000)), 25.0);
}

#[tokio::test]
async fn sample_takes_two_snapshots() {
    let mut frames = vec![
        "cpu  650 0 400 1050 0 0 0 0\n",
        "cpu  600 0 400 1000 0 0 0 0\n",
    ];
    let mut taken = 0;
    let usage = sample(Duration::from_millis(5), || {
        taken += 1;
        let raw = frames.pop().unwrap_or_default();
        async move { Ok::<_, ()>(parse_proc_stat(raw)) }
    })
    .await
    .unwrap();
    assert_eq!(taken, 2);
    assert_eq!(usage, 50.0);
}

#[tokio::test]
async fn zero_interval_uses_single_snapshot() {
    let mut taken = 0;
    let usage = sample(Duration::ZERO, || {
        taken += 1;
        async { Ok::<_, ()>(snap(900, 1000)) }
    })
    .await
    .unwrap();
    assert_eq!(taken, 1);
    assert_eq!(usage, 10.0);
}

#[tokio::test]
async fn snapshot_errors_propagate() {
    let result = sample(Duration::from_millis(1), || async { Err::<CpuSnapshot, _>("gone") }).await;
    assert_eq!(result, Err("gone"));
}
