//! Bypass Module: on 401/403 findings, retries with a fixed set of
//! access-restriction bypass headers, then probes a set of filename
//! mutations of the original path looking for backup/temp artifacts. Never
//! recurses on mutation hits.

use crate::calibrator::CalibrationSet;
use crate::classifier::{is_interesting, matches_signature};
use crate::client::ProbeClient;
use crate::config::Target;
use std::collections::HashMap;

/// A response worth turning into a `Finding`, with the URL and method
/// already decided by the bypass pipeline.
pub struct BypassFindingDraft {
    pub url: String,
    pub method: &'static str,
    pub response: crate::client::ProbeResponse,
}

#[derive(Default)]
pub struct BypassOutcome {
    pub primary: Option<BypassFindingDraft>,
    pub mutations: Vec<BypassFindingDraft>,
}

/// The fixed access-restriction bypass headers, applied after the caller's
/// custom headers so they always win.
fn bypass_headers(path: &str) -> HashMap<String, String> {
    let mut headers = HashMap::new();
    headers.insert("X-Forwarded-For".to_string(), "127.0.0.1".to_string());
    headers.insert("X-Original-URL".to_string(), format!("/{path}"));
    headers.insert("X-Rewrite-URL".to_string(), format!("/{path}"));
    headers.insert(
        "X-Custom-IP-Authorization".to_string(),
        "127.0.0.1".to_string(),
    );
    headers.insert("Client-IP".to_string(), "127.0.0.1".to_string());
    headers
}

fn split_dir_base(path: &str) -> (&str, &str) {
    match path.rfind('/') {
        Some(idx) => (&path[..=idx], &path[idx + 1..]),
        None => ("", path),
    }
}

/// Computes the filename-mutation candidates for a path: `.bak`, `.old`,
/// `.backup`, `~`, `.swp` suffixes, leading `.` and `_`, `.txt`, `.orig`,
/// and (if the path has an extension) `<base>.bak.<ext>`.
pub fn mutate_filename(path: &str) -> Vec<String> {
    let (dir, base) = split_dir_base(path);
    let mut mutations = Vec::new();

    for suffix in [".bak", ".old", ".backup", "~", ".swp", ".txt", ".orig"] {
        mutations.push(format!("{path}{suffix}"));
    }

    mutations.push(format!("{dir}.{base}"));
    mutations.push(format!("{dir}_{base}"));

    if let Some(dot_idx) = base.rfind('.') {
        let (name, ext) = base.split_at(dot_idx);
        let ext = &ext[1..];
        mutations.push(format!("{dir}{name}.bak.{ext}"));
    }

    mutations
}

/// Runs the bypass header retry and, regardless of its outcome, the
/// filename-mutation sweep. Triggered by the worker pool on 401/403.
pub async fn attempt_bypass(
    client: &ProbeClient,
    target: &Target,
    path: &str,
    user_agent: &str,
    custom_headers: &HashMap<String, String>,
    calibration: &CalibrationSet,
) -> BypassOutcome {
    let mut outcome = BypassOutcome::default();

    let mut headers = custom_headers.clone();
    headers.extend(bypass_headers(path));
    let url = target.join_path(path);

    if let Ok(response) = client
        .probe(&url, reqwest::Method::GET, user_agent, &headers)
        .await
    {
        if response.status == 200 || response.status == 302 {
            outcome.primary = Some(BypassFindingDraft {
                url: format!("{url} [BYPASS]"),
                method: "GET+BYPASS",
                response,
            });
        }
    }

    for mutated_path in mutate_filename(path) {
        let mutated_url = target.join_path(&mutated_path);
        if let Ok(response) = client
            .probe(&mutated_url, reqwest::Method::GET, user_agent, custom_headers)
            .await
        {
            if is_interesting(response.status)
                && !matches_signature(response.status, response.size, calibration)
            {
                outcome.mutations.push(BypassFindingDraft {
                    url: mutated_url,
                    method: "GET",
                    response,
                });
            }
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mutates_plain_filename() {
        let muts = mutate_filename("config");
        assert!(muts.contains(&"config.bak".to_string()));
        assert!(muts.contains(&"config.old".to_string()));
        assert!(muts.contains(&"config.backup".to_string()));
        assert!(muts.contains(&"config~".to_string()));
        assert!(muts.contains(&"config.swp".to_string()));
        assert!(muts.contains(&".config".to_string()));
        assert!(muts.contains(&"_config".to_string()));
        assert!(muts.contains(&"config.txt".to_string()));
        assert!(muts.contains(&"config.orig".to_string()));
    }

    #[test]
    fn mutates_filename_with_extension_adds_bak_ext() {
        let muts = mutate_filename("backup.sql");
        assert!(muts.contains(&"backup.sql.bak".to_string()));
        assert!(muts.contains(&"backup.bak.sql".to_string()));
    }

    #[test]
    fn mutates_path_with_directory_preserves_prefix() {
        let muts = mutate_filename("admin/config.php");
        assert!(muts.contains(&"admin/.config.php".to_string()));
        assert!(muts.contains(&"admin/_config.php".to_string()));
        assert!(muts.contains(&"admin/config.bak.php".to_string()));
    }

    #[test]
    fn bypass_headers_reference_original_path() {
        let headers = bypass_headers("admin");
        assert_eq!(
            headers.get("X-Original-URL"),
            Some(&"/admin".to_string())
        );
        assert_eq!(headers.get("Client-IP"), Some(&"127.0.0.1".to_string()));
    }
}
