//! Probe Client: executes a single HTTP request with a rotated User-Agent
//! and the caller's headers, and returns a structured response record plus
//! the raw body. Follows no redirects — the 3xx status itself is the signal
//! the Classifier and Recursion Controller rely on.

use rand::prelude::IndexedRandom;
use reqwest::header::{HeaderName, HeaderValue, USER_AGENT};
use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

/// Ten modern user-agent strings, rotated uniformly at random per request.
pub const USER_AGENTS: [&str; 10] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_4 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Mobile/15E148 Safari/604.1",
    "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Mobile Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Edg/124.0 Safari/537.36",
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:125.0) Gecko/20100101 Firefox/125.0",
    "dirscout/1.0 (+https://github.com/dirscout/dirscout)",
];

pub fn random_user_agent() -> &'static str {
    USER_AGENTS
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or(USER_AGENTS[0])
}

/// A single probed response, already reduced to the fields the rest of the
/// pipeline needs. The raw body is kept only long enough to be scanned for
/// secrets and fingerprinted, then dropped.
#[derive(Debug, Clone)]
pub struct ProbeResponse {
    pub status: u16,
    pub size: u64,
    pub word_count: usize,
    pub line_count: usize,
    pub body: String,
    pub headers: HashMap<String, String>,
    pub cookie_names: Vec<String>,
    pub server: Option<String>,
    pub powered_by: Option<String>,
}

pub struct ProbeClient {
    client: reqwest::Client,
}

impl ProbeClient {
    /// Builds the shared client: no redirect-following, a connection pool
    /// sized to 2x the worker count, 30s idle keep-alive, and the
    /// configured per-request timeout.
    pub fn new(worker_count: usize, timeout_secs: u64) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(Duration::from_secs(timeout_secs))
            .pool_max_idle_per_host(worker_count * 2)
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(30))
            .cookie_store(true)
            .build()?;
        Ok(ProbeClient { client })
    }

    /// Executes a single probe. `user_agent` is applied first, then
    /// `custom_headers`, so user headers can override the UA (e.g. an
    /// explicit `User-Agent` entry in `-H`).
    pub async fn probe(
        &self,
        url: &str,
        method: reqwest::Method,
        user_agent: &str,
        custom_headers: &HashMap<String, String>,
    ) -> Result<ProbeResponse, String> {
        let mut request = self
            .client
            .request(method, url)
            .header(USER_AGENT, user_agent);

        for (key, value) in custom_headers {
            if let (Ok(name), Ok(val)) = (
                HeaderName::from_str(key),
                HeaderValue::from_str(value),
            ) {
                request = request.header(name, val);
            }
        }

        let response = request.send().await.map_err(|e| e.to_string())?;
        let status = response.status().as_u16();

        let mut headers = HashMap::new();
        let mut cookie_names = Vec::new();
        for (name, value) in response.headers().iter() {
            let value_str = value.to_str().unwrap_or("").to_string();
            if name.as_str().eq_ignore_ascii_case("set-cookie") {
                if let Some(cookie_name) = value_str.split('=').next() {
                    cookie_names.push(cookie_name.trim().to_string());
                }
            }
            headers.insert(name.as_str().to_string(), value_str);
        }

        let server = headers.get("server").cloned();
        let powered_by = headers.get("x-powered-by").cloned();

        let body = response.text().await.map_err(|e| e.to_string())?;
        let size = body.len() as u64;
        let word_count = body.split_whitespace().count();
        let line_count = body.matches('\n').count() + 1;

        Ok(ProbeResponse {
            status,
            size,
            word_count,
            line_count,
            body,
            headers,
            cookie_names,
            server,
            powered_by,
        })
    }
}
