//! Task Queue & Scheduler: the bounded channels that turn a wordlist into a
//! stream of tasks for the worker pool, plus the seeding logic that starts
//! that stream.

use crate::config::Target;
use crate::stats::Statistics;
use tokio::sync::mpsc;

/// A unit of work pending a probe. `depth` starts at 1 for seed tasks; the
/// Recursion Controller increments it for expansions.
#[derive(Debug, Clone)]
pub struct Task {
    pub target: Target,
    pub path: String,
    pub depth: u32,
}

/// A directory-expansion request admitted to the Recursion Controller.
#[derive(Debug, Clone)]
pub struct RecursionRequest {
    pub target: Target,
    pub dir_path: String,
    pub depth: u32,
}

/// Queue capacities are `2 x worker_count`, providing back-pressure: the
/// seeder and the Recursion Controller block on enqueue once workers
/// saturate, bounding memory across large wordlists.
pub fn channel_capacity(worker_count: usize) -> usize {
    worker_count * 2
}

pub fn task_channel(worker_count: usize) -> (mpsc::Sender<Task>, mpsc::Receiver<Task>) {
    mpsc::channel(channel_capacity(worker_count))
}

pub fn recursion_channel(
    worker_count: usize,
) -> (mpsc::Sender<RecursionRequest>, mpsc::Receiver<RecursionRequest>) {
    mpsc::channel(channel_capacity(worker_count))
}

/// Enqueues one task per target per path. Runs concurrently with worker
/// consumption. Each enqueued task is one unit of outstanding work: see
/// `Statistics::submit`/`resolve` for how the pipeline tracks completion of
/// a cyclic task graph that channel-closing alone cannot terminate.
pub async fn seed_tasks(
    sender: mpsc::Sender<Task>,
    targets: &[Target],
    paths: &[String],
    stats: &Statistics,
) {
    for target in targets {
        for path in paths {
            let task = Task {
                target: target.clone(),
                path: path.clone(),
                depth: 1,
            };
            stats.total.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            stats.submit();
            if sender.send(task).await.is_err() {
                // Receivers gone — the pool has shut down already.
                stats.resolve();
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn seeds_one_task_per_target_per_path() {
        let targets = vec![
            Target::parse("http://a.example").unwrap(),
            Target::parse("http://b.example").unwrap(),
        ];
        let paths = vec!["admin".to_string(), "login".to_string()];

        let stats = Statistics::new();
        let (tx, mut rx) = task_channel(4);
        seed_tasks(tx, &targets, &paths, &stats).await;

        let mut received = Vec::new();
        while let Some(task) = rx.recv().await {
            received.push((task.target.to_string(), task.path, task.depth));
        }

        assert_eq!(received.len(), 4);
        assert!(received.iter().all(|(_, _, depth)| *depth == 1));
        assert_eq!(stats.total.load(std::sync::atomic::Ordering::Relaxed), 4);
        assert!(!stats.is_quiescent());
    }

    #[test]
    fn channel_capacity_is_double_worker_count() {
        assert_eq!(channel_capacity(25), 50);
    }
}
