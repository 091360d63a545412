//! Bounded in-memory history of recent `/metrics` results for chart backfill.

use std::collections::VecDeque;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::types::{HistorySample, MetricsResponse};

pub fn push_capped<T>(dq: &mut VecDeque<T>, v: T, cap: usize) {
    if cap == 0 {
        return;
    }
    while dq.len() >= cap {
        dq.pop_front();
    }
    dq.push_back(v);
}

#[derive(Debug)]
pub struct MetricsHistory {
    samples: VecDeque<HistorySample>,
    cap: usize,
}

impl MetricsHistory {
    pub fn new(cap: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(cap),
            cap,
        }
    }

    pub fn record(&mut self, m: &MetricsResponse) {
        let sample = HistorySample {
            timestamp: now_rfc3339(),
            cpu: m.cpu.usage_percent,
            memory: m.memory.usage_percentage,
        };
        self.push(sample);
    }

    pub fn push(&mut self, sample: HistorySample) {
        push_capped(&mut self.samples, sample, self.cap);
    }

    /// Oldest first.
    pub fn snapshot(&self) -> Vec<HistorySample> {
        self.samples.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default()
}
