//! `ps -ax -o pid,comm,%cpu,%mem,state` table.

use super::lenient_f64;
use crate::types::{ProcessEntry, ProcessState};

pub fn parse_ps(raw: &str) -> Vec<ProcessEntry> {
    raw.trim()
        .lines()
        .skip(1) // header
        .filter_map(parse_line)
        .collect()
}

fn parse_line(line: &str) -> Option<ProcessEntry> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    match tokens.len() {
        0 | 1 => None,
        2..=4 => Some(ProcessEntry {
            pid: tokens[0].to_string(),
            name: tokens[1].to_string(),
            cpu_percent: clamp_percent(lenient_f64(tokens.get(2).copied())),
            memory_percent: clamp_percent(lenient_f64(tokens.get(3).copied())),
            state: ProcessState::Unknown,
        }),
        n => {
            // comm may contain spaces (macOS app bundles); the numeric tail is fixed.
            let name = tokens[1..n - 3].join(" ");
            Some(ProcessEntry {
                pid: tokens[0].to_string(),
                name,
                cpu_percent: clamp_percent(lenient_f64(Some(tokens[n - 3]))),
                memory_percent: clamp_percent(lenient_f64(Some(tokens[n - 2]))),
                state: ProcessState::from_ps_code(tokens[n - 1]),
            })
        }
    }
}

fn clamp_percent(v: f64) -> f64 {
    v.clamp(0.0, 100.0)
}
