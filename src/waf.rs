//! WAF Fingerprinter: inspects response headers and cookies against a fixed
//! table of protective-intermediary signatures.

use std::collections::HashMap;

struct WafSignature {
    name: &'static str,
    server_header_substring: Option<&'static str>,
    custom_header_substring: Option<&'static str>,
    cookie_name_substring: Option<&'static str>,
}

/// Authoritative signature order — also defines tie-breaks, since the first
/// match wins.
const WAF_SIGNATURES: [WafSignature; 8] = [
    WafSignature {
        name: "Cloudflare",
        server_header_substring: Some("cloudflare"),
        custom_header_substring: Some("cf-ray"),
        cookie_name_substring: Some("__cfduid"),
    },
    WafSignature {
        name: "AWS WAF",
        server_header_substring: Some("awselb"),
        custom_header_substring: Some("x-amzn-waf"),
        cookie_name_substring: Some("awswaf"),
    },
    WafSignature {
        name: "Akamai",
        server_header_substring: Some("akamaighost"),
        custom_header_substring: Some("x-akamai"),
        cookie_name_substring: Some("akamai"),
    },
    WafSignature {
        name: "Imperva",
        server_header_substring: None,
        custom_header_substring: Some("x-iinfo"),
        cookie_name_substring: Some("incap_ses"),
    },
    WafSignature {
        name: "F5 BigIP",
        server_header_substring: Some("big-ip"),
        custom_header_substring: Some("x-cnection"),
        cookie_name_substring: Some("bigipserver"),
    },
    WafSignature {
        name: "Sucuri",
        server_header_substring: Some("sucuri"),
        custom_header_substring: Some("x-sucuri"),
        cookie_name_substring: Some("sucuri-cloudproxy"),
    },
    WafSignature {
        name: "StackPath",
        server_header_substring: Some("stackpath"),
        custom_header_substring: Some("x-sp-"),
        cookie_name_substring: None,
    },
    WafSignature {
        name: "Wordfence",
        server_header_substring: None,
        custom_header_substring: Some("x-wordfence"),
        cookie_name_substring: Some("wfvt"),
    },
];

/// Returns the first matching signature's name, or an empty string.
pub fn fingerprint(headers: &HashMap<String, String>, cookie_names: &[String]) -> String {
    let server = headers.get("server").map(|s| s.to_lowercase());

    for sig in &WAF_SIGNATURES {
        if let (Some(server), Some(substr)) = (&server, sig.server_header_substring) {
            if server.contains(substr) {
                return sig.name.to_string();
            }
        }

        if let Some(substr) = sig.custom_header_substring {
            if headers.keys().any(|k| k.to_lowercase().contains(substr)) {
                return sig.name.to_string();
            }
        }

        if let Some(substr) = sig.cookie_name_substring {
            if cookie_names.iter().any(|c| c.to_lowercase().contains(substr)) {
                return sig.name.to_string();
            }
        }
    }

    String::new()
}
