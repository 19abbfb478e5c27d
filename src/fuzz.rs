//! Method Fuzzer: on a 405 primary response, retries alternative HTTP
//! methods in a fixed order and stops at the first success.

use crate::client::ProbeClient;
use std::collections::HashMap;

pub struct FuzzFindingDraft {
    pub method: &'static str,
    pub response: crate::client::ProbeResponse,
}

const FUZZ_METHODS: [reqwest::Method; 4] = [
    reqwest::Method::POST,
    reqwest::Method::PUT,
    reqwest::Method::DELETE,
    reqwest::Method::PATCH,
];

fn method_name(method: &reqwest::Method) -> &'static str {
    match *method {
        reqwest::Method::POST => "POST",
        reqwest::Method::PUT => "PUT",
        reqwest::Method::DELETE => "DELETE",
        reqwest::Method::PATCH => "PATCH",
        _ => "UNKNOWN",
    }
}

/// Tries `POST`, `PUT`, `DELETE`, `PATCH` in order against `url`, returning
/// the first response with status 200/201/204. The triggering 405 itself is
/// never surfaced by this module.
pub async fn attempt_method_fuzz(
    client: &ProbeClient,
    url: &str,
    user_agent: &str,
    custom_headers: &HashMap<String, String>,
) -> Option<FuzzFindingDraft> {
    for method in &FUZZ_METHODS {
        if let Ok(response) = client.probe(url, method.clone(), user_agent, custom_headers).await {
            if matches!(response.status, 200 | 201 | 204) {
                return Some(FuzzFindingDraft {
                    method: method_name(method),
                    response,
                });
            }
        }
    }
    None
}
