//! Orchestration: wires the CLI into a running scan — client, calibration,
//! task queue, worker pool, recursion controller, progress reporter,
//! shutdown, and final reporting. `main.rs` only calls `run`.

use crate::calibrator::calibrate_all;
use crate::cli::Cli;
use crate::config::ScanConfig;
use crate::error::ScoutError;
use crate::finding::Finding;
use crate::recursion::{self, ScannedDirs};
use crate::report;
use crate::stats::{run_progress_reporter, Statistics};
use crate::task::{self, task_channel};
use crate::wordlist;
use crate::worker::{self, WorkerContext};
use crate::client::ProbeClient;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch, Mutex};

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    init_tracing(cli.verbose);

    let config = ScanConfig::from_cli(&cli)?;
    let words = wordlist::load(&cli.wordlist)?;
    let paths = Arc::new(wordlist::with_extensions(&words, &config.extensions));
    if paths.is_empty() {
        tracing::warn!("wordlist {:?} produced no paths, nothing to scan", cli.wordlist);
    }

    let client = Arc::new(ProbeClient::new(config.threads, config.timeout_secs).map_err(ScoutError::ClientBuild)?);

    tracing::info!(targets = config.targets.len(), "calibrating");
    let calibration = Arc::new(calibrate_all(client.clone(), &config.targets).await);

    let stats = Arc::new(Statistics::new());
    let (task_tx, task_rx) = task_channel(config.threads);
    let task_rx = Arc::new(Mutex::new(task_rx));
    let (new_task_tx, new_task_rx) = task::recursion_channel(config.threads);
    let (finding_tx, mut finding_rx) = mpsc::channel::<Finding>(task::channel_capacity(config.threads));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let scanned = Arc::new(ScannedDirs::new());
    let recursion_handle = tokio::spawn(recursion::run(
        new_task_rx,
        task_tx.clone(),
        paths.clone(),
        config.max_depth,
        scanned,
        stats.clone(),
        shutdown_rx.clone(),
    ));

    let worker_ctx = Arc::new(WorkerContext {
        client: client.clone(),
        calibration,
        custom_headers: config.custom_headers.clone(),
        max_depth: config.max_depth,
        stats: stats.clone(),
        new_task_tx,
        finding_tx,
    });

    let mut worker_handles = Vec::with_capacity(config.threads);
    for _ in 0..config.threads {
        worker_handles.push(tokio::spawn(worker::run(
            task_rx.clone(),
            worker_ctx.clone(),
            shutdown_rx.clone(),
        )));
    }

    let progress_handle = tokio::spawn(run_progress_reporter(stats.clone(), shutdown_rx.clone()));

    let collector_handle = tokio::spawn(async move {
        let mut findings = Vec::new();
        while let Some(finding) = finding_rx.recv().await {
            findings.push(finding);
        }
        findings
    });

    task::seed_tasks(task_tx.clone(), &config.targets, &paths, &stats).await;
    drop(task_tx);

    wait_for_quiescence_or_interrupt(&stats).await;
    let _ = shutdown_tx.send(true);

    let _ = recursion_handle.await;
    for handle in worker_handles {
        let _ = handle.await;
    }
    // Drop our own WorkerContext clone so its finding_tx sender is released —
    // every worker's clone is already gone, so this is the last one.
    drop(worker_ctx);
    let _ = progress_handle.await;

    let findings = collector_handle.await.unwrap_or_default();
    let summary = stats.snapshot();

    if let Some(path) = &config.output_json {
        match report::write_json(&findings, path) {
            Ok(()) => println!("JSON report written to {path}"),
            Err(err) => eprintln!("warning: {err}"),
        }
    }
    if let Some(path) = &config.output_html {
        match report::write_html(&findings, &summary, path) {
            Ok(()) => println!("HTML report written to {path}"),
            Err(err) => eprintln!("warning: {err}"),
        }
    }

    report::print_summary(&summary);
    Ok(())
}

/// Blocks until the pipeline has resolved every submitted unit of work, or
/// the user interrupts with Ctrl+C — whichever happens first.
async fn wait_for_quiescence_or_interrupt(stats: &Statistics) {
    let quiescence = async {
        loop {
            if stats.is_quiescent() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    };

    tokio::select! {
        _ = quiescence => {}
        _ = tokio::signal::ctrl_c() => {
            println!("\nReceived Ctrl+C, stopping scan gracefully...");
        }
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default_level = if verbose { "dirscout=debug" } else { "dirscout=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
