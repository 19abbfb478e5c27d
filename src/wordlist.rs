//! Wordlist loading. UTF-8 text, one entry per line; blank lines and
//! `#`-prefixed lines are ignored.

use crate::error::ScoutError;
use std::fs::read_to_string;

pub fn load(path: &str) -> Result<Vec<String>, ScoutError> {
    let content = read_to_string(path).map_err(|source| ScoutError::Wordlist {
        path: path.to_string(),
        source,
    })?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

/// Cross-products `words` with `extensions`, producing every `word.ext`
/// combination in addition to each bare word, as spec'd for task seeding.
pub fn with_extensions(words: &[String], extensions: &[String]) -> Vec<String> {
    let mut paths = Vec::with_capacity(words.len() * (1 + extensions.len()));
    for word in words {
        paths.push(word.clone());
        for ext in extensions {
            paths.push(format!("{word}{ext}"));
        }
    }
    paths
}
