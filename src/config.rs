//! Target resolution and the engine's validated run configuration.

use crate::error::ScoutError;
use std::collections::HashMap;
use std::io::IsTerminal;

/// An absolute base URL (scheme + authority), normalized with no trailing
/// slash. Scheme is inferred as `http://` when the input omits one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Target(String);

impl Target {
    /// Parses and normalizes a single target line. `#`-prefixed input is
    /// never expected here — comment stripping happens before this is
    /// called, for both stdin and wordlist-style inputs.
    pub fn parse(raw: &str) -> Result<Self, ScoutError> {
        let raw = raw.trim();
        let with_scheme = if raw.contains("://") {
            raw.to_string()
        } else {
            format!("http://{raw}")
        };

        let parsed = url::Url::parse(&with_scheme)
            .map_err(|e| ScoutError::InvalidTarget(raw.to_string(), e))?;

        let normalized = parsed.as_str().trim_end_matches('/').to_string();
        Ok(Target(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Joins a path fragment (no leading slash) onto this target with
    /// exactly one separating slash.
    pub fn join_path(&self, path: &str) -> String {
        format!("{}/{}", self.0, path.trim_start_matches('/'))
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Collects targets from `-u` or, when stdin is not a terminal, from piped
/// lines (one per line, `#` comments ignored, scheme-less lines prefixed
/// `http://` by `Target::parse`).
pub fn resolve_targets(cli_url: Option<&str>) -> Result<Vec<Target>, ScoutError> {
    if let Some(u) = cli_url {
        return Ok(vec![Target::parse(u)?]);
    }

    let mut targets = Vec::new();
    if !std::io::stdin().is_terminal() {
        use std::io::BufRead;
        for line in std::io::stdin().lock().lines().map_while(Result::ok) {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            targets.push(Target::parse(line)?);
        }
    }

    if targets.is_empty() {
        return Err(ScoutError::NoTargets);
    }
    Ok(targets)
}

/// Validated, immutable configuration shared across every worker for the
/// lifetime of the run. Built once from `Cli` in `main`.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub targets: Vec<Target>,
    pub threads: usize,
    pub extensions: Vec<String>,
    pub custom_headers: HashMap<String, String>,
    pub timeout_secs: u64,
    pub max_depth: u32,
    pub verbose: bool,
    pub output_json: Option<String>,
    pub output_html: Option<String>,
}

impl ScanConfig {
    pub fn from_cli(cli: &crate::cli::Cli) -> Result<Self, ScoutError> {
        let targets = resolve_targets(cli.url.as_deref())?;

        let extensions = cli
            .extensions
            .as_deref()
            .map(normalize_extensions)
            .unwrap_or_default();

        let custom_headers = parse_custom_headers(&cli.headers);

        Ok(ScanConfig {
            targets,
            threads: cli.threads.max(1),
            extensions,
            custom_headers,
            timeout_secs: cli.timeout,
            max_depth: cli.depth,
            verbose: cli.verbose,
            output_json: cli.output.clone(),
            output_html: cli.html.clone(),
        })
    }
}

/// Splits a comma-separated extension list and prepends `.` to entries that
/// lack it.
fn normalize_extensions(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|ext| {
            if ext.starts_with('.') {
                ext.to_string()
            } else {
                format!(".{ext}")
            }
        })
        .collect()
}

/// Parses `Name: Value` header strings into a map, silently skipping
/// malformed entries.
fn parse_custom_headers(headers: &[String]) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for header in headers {
        if let Some((key, value)) = header.split_once(':') {
            map.insert(key.trim().to_string(), value.trim().to_string());
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_http_scheme() {
        let t = Target::parse("example.com").unwrap();
        assert_eq!(t.as_str(), "http://example.com");
    }

    #[test]
    fn keeps_explicit_scheme() {
        let t = Target::parse("https://example.com/").unwrap();
        assert_eq!(t.as_str(), "https://example.com");
    }

    #[test]
    fn join_path_single_slash() {
        let t = Target::parse("http://example.com").unwrap();
        assert_eq!(t.join_path("admin"), "http://example.com/admin");
        assert_eq!(t.join_path("/admin"), "http://example.com/admin");
    }

    #[test]
    fn normalizes_extensions() {
        assert_eq!(
            normalize_extensions("php,.html, txt"),
            vec![".php".to_string(), ".html".to_string(), ".txt".to_string()]
        );
    }

    #[test]
    fn parses_custom_headers_skips_malformed() {
        let headers = vec!["X-Api-Key: abc".to_string(), "malformed".to_string()];
        let map = parse_custom_headers(&headers);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("X-Api-Key"), Some(&"abc".to_string()));
    }
}
