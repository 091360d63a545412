//! `/proc/stat` CPU lines: `cpu  user nice system idle iowait irq softirq steal ...`.

use crate::sampler::{CoreTicks, CpuSnapshot};

pub fn parse_proc_stat(raw: &str) -> CpuSnapshot {
    let mut aggregate = CoreTicks::default();
    let mut per_core = Vec::new();
    for line in raw.lines() {
        let mut it = line.split_whitespace();
        let Some(label) = it.next() else {
            continue;
        };
        if !label.starts_with("cpu") {
            continue;
        }
        let ticks = parse_ticks(it);
        if label == "cpu" {
            aggregate = ticks;
        } else {
            per_core.push(ticks);
        }
    }
    CpuSnapshot::new(aggregate, per_core)
}

fn parse_ticks<'a>(fields: impl Iterator<Item = &'a str>) -> CoreTicks {
    // guest/guest_nice are already folded into user/nice, so stop at steal.
    let vals: Vec<u64> = fields
        .take(8)
        .map(|t| t.parse::<u64>().unwrap_or(0))
        .collect();
    let at = |i: usize| vals.get(i).copied().unwrap_or(0);
    let total = vals.iter().fold(0u64, |acc, v| acc.saturating_add(*v));
    CoreTicks {
        idle: at(3).saturating_add(at(4)),
        total,
    }
}
