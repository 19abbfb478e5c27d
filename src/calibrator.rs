//! Calibrator: learns a target's negative-response fingerprint so the
//! Classifier can suppress false positives (soft-404 pages, catch-all
//! redirects, etc).
//!
//! Per the Open Question in the spec this implementation performs
//! calibration exactly once per target, before any task is dispatched, and
//! publishes the result read-only — not the source's per-worker
//! duplication, which the spec calls out as wasteful but behavior-neutral.

use crate::client::{random_user_agent, ProbeClient};
use crate::config::Target;
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;

/// `(status, size_bytes, word_count, line_count)` profile of a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseSignature {
    pub status: u16,
    pub size: u64,
    pub word_count: usize,
    pub line_count: usize,
}

/// An ordered, immutable set of signatures captured from non-existent paths
/// at startup.
#[derive(Debug, Clone, Default)]
pub struct CalibrationSet(Vec<ResponseSignature>);

impl CalibrationSet {
    pub fn signatures(&self) -> &[ResponseSignature] {
        &self.0
    }

    /// Builds a set directly from signatures, bypassing network probing.
    /// Used by tests and by callers that already hold known-negative
    /// samples (e.g. integration tests pinning a mock server's 404 body).
    pub fn from_signatures(signatures: Vec<ResponseSignature>) -> Self {
        CalibrationSet(signatures)
    }
}

const CALIBRATION_PREFIXES: [&str; 3] = ["wildcard", "probe", "baseline"];

/// Issues one GET per synthetic, near-certainly-absent path and records the
/// resulting signatures. Transport failures are dropped silently — a target
/// whose every calibration probe fails yields an empty `CalibrationSet`,
/// which per spec means every interesting response is surfaced unfiltered.
pub async fn calibrate_target(client: &ProbeClient, target: &Target) -> CalibrationSet {
    let mut signatures = Vec::with_capacity(CALIBRATION_PREFIXES.len());

    for prefix in CALIBRATION_PREFIXES {
        let random_suffix = rand::rng().random_range(0..1_000_000);
        let path = format!("{prefix}_{random_suffix}");
        let url = target.join_path(&path);

        if let Ok(response) = client
            .probe(
                &url,
                reqwest::Method::GET,
                random_user_agent(),
                &HashMap::new(),
            )
            .await
        {
            signatures.push(ResponseSignature {
                status: response.status,
                size: response.size,
                word_count: response.word_count,
                line_count: response.line_count,
            });
        } else {
            tracing::warn!(target = %target, %path, "calibration probe failed, dropping sample");
        }
    }

    CalibrationSet(signatures)
}

/// Calibrates every target concurrently and publishes the result as a
/// read-only shared table — no lock is needed thereafter since the table is
/// written once, before any worker starts consuming tasks.
pub async fn calibrate_all(
    client: Arc<ProbeClient>,
    targets: &[Target],
) -> HashMap<Target, CalibrationSet> {
    let mut set = tokio::task::JoinSet::new();
    for target in targets.iter().cloned() {
        let client = client.clone();
        set.spawn(async move {
            let calibration = calibrate_target(&client, &target).await;
            (target, calibration)
        });
    }

    let mut table = HashMap::new();
    while let Some(result) = set.join_next().await {
        if let Ok((target, calibration)) = result {
            tracing::info!(
                target = %target,
                signatures = calibration.signatures().len(),
                "calibration complete"
            );
            table.insert(target, calibration);
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_calibration_set_has_no_signatures() {
        let set = CalibrationSet::default();
        assert!(set.signatures().is_empty());
    }
}
