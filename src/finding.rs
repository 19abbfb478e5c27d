//! The structured record surfaced for every interesting response.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub url: String,
    pub status: u16,
    pub size: u64,
    pub word_count: usize,
    pub line_count: usize,
    pub method: String,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub powered_by: Option<String>,
    pub user_agent: String,
    pub critical: bool,
    pub secret_found: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub secret_types: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub waf_detected: String,
    pub curl_command: String,
}

/// Parameters needed to build a `Finding` from a classified response. Kept
/// as a struct (rather than a long argument list) since callers assemble it
/// incrementally across the probe -> classify -> enrich pipeline.
pub struct FindingInput<'a> {
    pub url: &'a str,
    pub status: u16,
    pub size: u64,
    pub word_count: usize,
    pub line_count: usize,
    pub method: &'a str,
    pub server: Option<String>,
    pub powered_by: Option<String>,
    pub user_agent: &'a str,
    pub critical: bool,
    pub secret_types: Vec<String>,
    pub waf_detected: String,
    pub custom_headers: &'a std::collections::HashMap<String, String>,
}

impl Finding {
    pub fn build(input: FindingInput) -> Self {
        Finding {
            url: input.url.to_string(),
            status: input.status,
            size: input.size,
            word_count: input.word_count,
            line_count: input.line_count,
            method: input.method.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            server: input.server,
            powered_by: input.powered_by,
            user_agent: input.user_agent.to_string(),
            critical: input.critical,
            secret_found: !input.secret_types.is_empty(),
            secret_types: input.secret_types,
            waf_detected: input.waf_detected,
            curl_command: build_curl_command(
                input.url,
                input.method,
                input.user_agent,
                input.custom_headers,
            ),
        }
    }
}

/// Builds a reproduction `curl` command line for this finding.
fn build_curl_command(
    url: &str,
    method: &str,
    user_agent: &str,
    custom_headers: &std::collections::HashMap<String, String>,
) -> String {
    let base_method = method.split('+').next().unwrap_or(method);
    let mut cmd = format!("curl -sS -X {base_method} -A {user_agent:?}");
    let mut headers: Vec<_> = custom_headers.iter().collect();
    headers.sort_by_key(|(k, _)| k.clone());
    for (key, value) in headers {
        cmd.push_str(&format!(" -H \"{key}: {value}\""));
    }
    cmd.push_str(&format!(" {url:?}"));
    cmd
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn secret_found_mirrors_secret_types() {
        let f = Finding::build(FindingInput {
            url: "http://x/env",
            status: 200,
            size: 10,
            word_count: 1,
            line_count: 1,
            method: "GET",
            server: None,
            powered_by: None,
            user_agent: "ua",
            critical: false,
            secret_types: vec!["AWS Access Key".to_string()],
            waf_detected: String::new(),
            custom_headers: &HashMap::new(),
        });
        assert!(f.secret_found);
        assert_eq!(f.secret_types, vec!["AWS Access Key".to_string()]);
    }

    #[test]
    fn json_round_trip_omits_empty_optionals() {
        let f = Finding::build(FindingInput {
            url: "http://x/a",
            status: 200,
            size: 10,
            word_count: 1,
            line_count: 1,
            method: "GET",
            server: None,
            powered_by: None,
            user_agent: "ua",
            critical: false,
            secret_types: vec![],
            waf_detected: String::new(),
            custom_headers: &HashMap::new(),
        });
        let json = serde_json::to_string(&f).unwrap();
        assert!(!json.contains("server"));
        assert!(!json.contains("secret_types"));
        assert!(!json.contains("waf_detected"));

        let parsed: Finding = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.url, f.url);
        assert_eq!(parsed.status, f.status);
        assert_eq!(parsed.secret_found, f.secret_found);
    }

    #[test]
    fn curl_command_strips_bypass_suffix_from_method() {
        let f = Finding::build(FindingInput {
            url: "http://x/admin [BYPASS]",
            status: 200,
            size: 10,
            word_count: 1,
            line_count: 1,
            method: "GET+BYPASS",
            server: None,
            powered_by: None,
            user_agent: "ua",
            critical: true,
            secret_types: vec![],
            waf_detected: String::new(),
            custom_headers: &HashMap::new(),
        });
        assert!(f.curl_command.starts_with("curl -sS -X GET"));
    }
}
