//! Recursion Controller: the single consumer of `new_task_channel`. Dedupes
//! discovered directories per target and expands them into wordlist-cross-
//! extension task batches, bounded by `max_depth`.

use crate::config::Target;
use crate::stats::Statistics;
use crate::task::{RecursionRequest, Task};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::{mpsc, watch, Mutex};

/// Per-target set of already-expanded directory paths, used for
/// idempotence. A single mutex covers every target, per the spec's
/// concurrency model — this controller is the map's sole owner, but the
/// lock keeps the invariant explicit and lets tests observe it safely.
#[derive(Default)]
pub struct ScannedDirs(Mutex<HashMap<Target, HashSet<String>>>);

impl ScannedDirs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically checks-and-sets membership. Returns `true` if `dir_path`
    /// had not yet been expanded for `target` (and is now recorded).
    async fn try_claim(&self, target: &Target, dir_path: &str) -> bool {
        let mut guard = self.0.lock().await;
        let set = guard.entry(target.clone()).or_default();
        set.insert(dir_path.to_string())
    }

    #[cfg(test)]
    pub async fn contains(&self, target: &Target, dir_path: &str) -> bool {
        let guard = self.0.lock().await;
        guard.get(target).is_some_and(|set| set.contains(dir_path))
    }
}

/// Runs until `new_task_rx` closes or `shutdown` fires. For every incoming
/// request: drops it silently if depth is exhausted or the directory was
/// already expanded (per spec, neither is an error); otherwise enqueues one
/// task per wordlist-cross-extension path under the directory, incrementing
/// `total` for each.
///
/// Every request arrives as a unit of work already `submit`-ted by the
/// worker that forwarded it (see `worker.rs`); this function is responsible
/// for eventually `resolve`-ing it — immediately on drop, or once every
/// child task it spawns has itself been submitted.
pub async fn run(
    mut new_task_rx: mpsc::Receiver<RecursionRequest>,
    task_tx: mpsc::Sender<Task>,
    paths: Arc<Vec<String>>,
    max_depth: u32,
    scanned: Arc<ScannedDirs>,
    stats: Arc<Statistics>,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        let request = tokio::select! {
            request = new_task_rx.recv() => request,
            _ = shutdown.changed() => return,
        };
        let Some(request) = request else { return };

        if max_depth == 0 || request.depth > max_depth {
            stats.resolve();
            continue;
        }

        if !scanned.try_claim(&request.target, &request.dir_path).await {
            stats.resolve();
            continue;
        }

        tracing::info!(
            target = %request.target,
            dir = %request.dir_path,
            depth = request.depth + 1,
            children = paths.len(),
            "expanding directory for recursion"
        );

        let dir = request.dir_path.trim_end_matches('/');
        for word in paths.iter() {
            let task = Task {
                target: request.target.clone(),
                path: format!("{dir}/{word}"),
                depth: request.depth + 1,
            };
            stats.total.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            stats.submit();
            if task_tx.send(task).await.is_err() {
                // Undo this child's submit and resolve the parent request —
                // both are now abandoned since the pool has shut down.
                stats.resolve();
                stats.resolve();
                return;
            }
        }
        stats.resolve();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn expands_directory_into_wordlist_tasks() {
        let target = Target::parse("http://example.com").unwrap();
        let (new_tx, new_rx) = mpsc::channel(4);
        let (task_tx, mut task_rx) = mpsc::channel(16);
        let scanned = Arc::new(ScannedDirs::new());
        let stats = Arc::new(Statistics::new());
        let paths = Arc::new(vec!["logo.png".to_string(), "icon.png".to_string()]);

        let (_shutdown_tx, shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(run(new_rx, task_tx, paths, 2, scanned.clone(), stats.clone(), shutdown_rx));

        new_tx
            .send(RecursionRequest {
                target: target.clone(),
                dir_path: "images".to_string(),
                depth: 1,
            })
            .await
            .unwrap();
        drop(new_tx);
        handle.await.unwrap();

        let mut received = Vec::new();
        while let Ok(task) = task_rx.try_recv() {
            received.push(task.path);
        }
        received.sort();
        assert_eq!(received, vec!["images/icon.png", "images/logo.png"]);
        assert!(scanned.contains(&target, "images").await);
    }

    #[tokio::test]
    async fn never_expands_same_directory_twice() {
        let target = Target::parse("http://example.com").unwrap();
        let (new_tx, new_rx) = mpsc::channel(4);
        let (task_tx, mut task_rx) = mpsc::channel(16);
        let scanned = Arc::new(ScannedDirs::new());
        let stats = Arc::new(Statistics::new());
        let paths = Arc::new(vec!["x".to_string()]);

        let (_shutdown_tx, shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(run(new_rx, task_tx, paths, 5, scanned, stats, shutdown_rx));

        for _ in 0..3 {
            new_tx
                .send(RecursionRequest {
                    target: target.clone(),
                    dir_path: "images".to_string(),
                    depth: 1,
                })
                .await
                .unwrap();
        }
        drop(new_tx);
        handle.await.unwrap();

        let mut count = 0;
        while task_rx.try_recv().is_ok() {
            count += 1;
        }
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn depth_zero_disables_recursion() {
        let target = Target::parse("http://example.com").unwrap();
        let (new_tx, new_rx) = mpsc::channel(4);
        let (task_tx, mut task_rx) = mpsc::channel(16);
        let scanned = Arc::new(ScannedDirs::new());
        let stats = Arc::new(Statistics::new());
        let paths = Arc::new(vec!["x".to_string()]);

        let (_shutdown_tx, shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(run(new_rx, task_tx, paths, 0, scanned, stats, shutdown_rx));
        new_tx
            .send(RecursionRequest {
                target,
                dir_path: "images".to_string(),
                depth: 1,
            })
            .await
            .unwrap();
        drop(new_tx);
        handle.await.unwrap();

        assert!(task_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn depth_exceeding_max_is_dropped() {
        let target = Target::parse("http://example.com").unwrap();
        let (new_tx, new_rx) = mpsc::channel(4);
        let (task_tx, mut task_rx) = mpsc::channel(16);
        let scanned = Arc::new(ScannedDirs::new());
        let stats = Arc::new(Statistics::new());
        let paths = Arc::new(vec!["x".to_string()]);

        let (_shutdown_tx, shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(run(new_rx, task_tx, paths, 2, scanned, stats, shutdown_rx));
        new_tx
            .send(RecursionRequest {
                target,
                dir_path: "images".to_string(),
                depth: 3,
            })
            .await
            .unwrap();
        drop(new_tx);
        handle.await.unwrap();

        assert!(task_rx.try_recv().is_err());
    }
}
