//! Statistics: atomic counters and progress timing shared across workers,
//! plus the progress-reporter task that renders them.

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

pub struct Statistics {
    pub total: AtomicU64,
    pub processed: AtomicU64,
    pub found: AtomicU64,
    pub errors: AtomicU64,
    pub secrets: AtomicU64,
    pub waf_hits: AtomicU64,
    pub start_time: Instant,
    /// Count of task units submitted but not yet resolved, across both the
    /// task queue and the recursion controller. A cyclic pipeline (the
    /// recursion controller re-feeds the task queue) can never terminate by
    /// channel-closing alone, so shutdown is instead driven by this count
    /// returning to zero: see `submit`/`resolve`.
    in_flight: AtomicI64,
}

impl Statistics {
    pub fn new() -> Self {
        Statistics {
            total: AtomicU64::new(0),
            processed: AtomicU64::new(0),
            found: AtomicU64::new(0),
            errors: AtomicU64::new(0),
            secrets: AtomicU64::new(0),
            waf_hits: AtomicU64::new(0),
            start_time: Instant::now(),
            in_flight: AtomicI64::new(0),
        }
    }

    /// Records one unit of outstanding work (a task pushed onto the task
    /// queue). Call before the corresponding channel send.
    pub fn submit(&self) {
        self.in_flight.fetch_add(1, Ordering::AcqRel);
    }

    /// Resolves one unit of outstanding work: either a worker finished a
    /// task without recursing, or the recursion controller finished
    /// handling a forwarded directory (dropped it, or finished submitting
    /// all of its children).
    pub fn resolve(&self) {
        self.in_flight.fetch_sub(1, Ordering::AcqRel);
    }

    /// True once every submitted unit of work has been resolved. Monotone:
    /// once true, stays true, since any further submission is always a
    /// causal consequence of handling an already-outstanding unit.
    pub fn is_quiescent(&self) -> bool {
        self.in_flight.load(Ordering::Acquire) <= 0
    }

    pub fn snapshot(&self) -> ScanSummary {
        ScanSummary {
            total: self.total.load(Ordering::Relaxed),
            processed: self.processed.load(Ordering::Relaxed),
            found: self.found.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            secrets: self.secrets.load(Ordering::Relaxed),
            waf_hits: self.waf_hits.load(Ordering::Relaxed),
            elapsed: self.start_time.elapsed(),
        }
    }
}

impl Default for Statistics {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable end-of-run snapshot, handed to the Report Renderer and the
/// final console summary.
#[derive(Debug, Clone, Copy)]
pub struct ScanSummary {
    pub total: u64,
    pub processed: u64,
    pub found: u64,
    pub errors: u64,
    pub secrets: u64,
    pub waf_hits: u64,
    pub elapsed: Duration,
}

/// Samples `stats` every 500ms and renders a single status line until
/// `cancel` fires. Isolated here so the engine stays usable headlessly —
/// callers that never start this task still get correct counters.
pub async fn run_progress_reporter(
    stats: std::sync::Arc<Statistics>,
    mut cancel: watch::Receiver<bool>,
) {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );

    let mut interval = tokio::time::interval(Duration::from_millis(500));
    loop {
        tokio::select! {
            _ = interval.tick() => {
                let s = stats.snapshot();
                bar.set_message(format!(
                    "{}/{} processed, {} found, {} errors, {} secrets, {} waf hits",
                    s.processed, s.total, s.found, s.errors, s.secrets, s.waf_hits
                ));
                bar.tick();
            }
            _ = cancel.changed() => break,
        }
    }
    bar.finish_and_clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_counters() {
        let stats = Statistics::new();
        stats.processed.fetch_add(3, Ordering::Relaxed);
        stats.found.fetch_add(1, Ordering::Relaxed);
        let s = stats.snapshot();
        assert_eq!(s.processed, 3);
        assert_eq!(s.found, 1);
        assert_eq!(s.errors, 0);
    }

    #[test]
    fn quiescent_only_after_every_submit_is_resolved() {
        let stats = Statistics::new();
        assert!(stats.is_quiescent());

        stats.submit();
        stats.submit();
        assert!(!stats.is_quiescent());

        stats.resolve();
        assert!(!stats.is_quiescent());

        stats.resolve();
        assert!(stats.is_quiescent());
    }
}
