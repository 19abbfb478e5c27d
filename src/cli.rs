//! Command-line surface. A thin adapter: parses flags into a typed `Cli`,
//! which `config.rs` turns into the validated `ScanConfig` the engine runs
//! on. No scanning logic lives here.

use clap::Parser;

/// dirscout — context-aware HTTP content-discovery engine.
#[derive(Parser, Debug)]
#[command(name = "dirscout", version, about, long_about = None)]
pub struct Cli {
    /// Single target base URL. Mutually exclusive with piped stdin targets.
    #[arg(short = 'u', long = "url")]
    pub url: Option<String>,

    /// Path to the wordlist file.
    #[arg(short = 'w', long = "wordlist")]
    pub wordlist: String,

    /// Number of concurrent workers.
    #[arg(short = 't', long = "threads", default_value_t = 50)]
    pub threads: usize,

    /// Comma-separated extensions to fuzz (dot prepended if missing).
    #[arg(short = 'x', long = "extensions")]
    pub extensions: Option<String>,

    /// Custom header "Name: Value"; repeatable.
    #[arg(short = 'H', long = "header")]
    pub headers: Vec<String>,

    /// Per-request timeout in seconds.
    #[arg(long = "timeout", default_value_t = 10)]
    pub timeout: u64,

    /// Max recursion depth; 0 disables recursion.
    #[arg(long = "depth", default_value_t = 0)]
    pub depth: u32,

    /// Emit one log line per probed URL.
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Write findings as JSON to this path.
    #[arg(short = 'o', long = "output")]
    pub output: Option<String>,

    /// Write a self-contained HTML report to this path.
    #[arg(long = "html")]
    pub html: Option<String>,
}
