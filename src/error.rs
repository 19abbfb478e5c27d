//! Crate-wide error type for the engine boundary.
//!
//! Per-request transport failures are *not* routed through this type — they
//! are counted and suppressed at task granularity (see `stats.rs` and
//! `worker.rs`). `ScoutError` covers the failures that are fatal to a scan:
//! bad configuration, unreadable wordlists, unwritable reports.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("no targets specified: pass -u or pipe targets on stdin")]
    NoTargets,

    #[error("invalid target url {0:?}: {1}")]
    InvalidTarget(String, url::ParseError),

    #[error("failed to read wordlist {path:?}: {source}")]
    Wordlist {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to build http client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("failed to write report to {path:?}: {source}")]
    ReportWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize findings: {0}")]
    Serialize(#[source] serde_json::Error),
}
