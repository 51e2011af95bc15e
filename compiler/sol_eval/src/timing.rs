//! Per-category timers.
//!
//! Purely observational: timers never influence evaluation. They only
//! record while the `timing` setting is on.

use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;

/// Stack of running timers plus the totals per category.
#[derive(Debug, Default)]
pub struct Timers {
    enabled: bool,
    running: Vec<(&'static str, Instant)>,
    totals: FxHashMap<&'static str, Duration>,
}

impl Timers {
    /// Disabled timers with no totals.
    pub fn new() -> Self {
        Timers::default()
    }

    /// Turn recording on or off; turning it off drops running timers.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.running.clear();
        }
    }

    /// Whether timers record.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Start a timer for `category` if recording.
    pub fn push(&mut self, category: &'static str) {
        if self.enabled {
            self.running.push((category, Instant::now()));
        }
    }

    /// Stop the innermost timer; returns its category and elapsed time.
    pub fn pop(&mut self) -> Option<(&'static str, Duration)> {
        let (category, start) = self.running.pop()?;
        let elapsed = start.elapsed();
        *self.totals.entry(category).or_default() += elapsed;
        Some((category, elapsed))
    }

    /// Number of timers currently running.
    pub fn depth(&self) -> usize {
        self.running.len()
    }

    /// Discard timers started above `depth`.
    pub fn truncate(&mut self, depth: usize) {
        self.running.truncate(depth);
    }

    /// Drain the accumulated totals, largest first.
    pub fn report(&mut self) -> Vec<(&'static str, Duration)> {
        let mut totals: Vec<_> = std::mem::take(&mut self.totals).into_iter().collect();
        totals.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_timers_record_nothing() {
        let mut timers = Timers::new();
        timers.push("command");
        assert_eq!(timers.pop(), None);
        assert!(timers.report().is_empty());
    }

    #[test]
    fn nested_timers_accumulate_per_category() {
        let mut timers = Timers::new();
        timers.set_enabled(true);
        timers.push("command");
        timers.push("procedure call");
        assert_eq!(timers.pop().map(|(c, _)| c), Some("procedure call"));
        assert_eq!(timers.pop().map(|(c, _)| c), Some("command"));
        let report = timers.report();
        assert_eq!(report.len(), 2);
        assert!(report[0].1 >= report[1].1);
        assert!(timers.report().is_empty());
    }
}
