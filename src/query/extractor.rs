//! Container extraction from raw TQL
//!
//! Raw-mode statements do not carry a structured container, but the TQL
//! endpoint needs one. The name is recovered with a single pattern:
//!
//! ```text
//! select ... from <identifier> [limit ... | order ... | where ... | <end>]
//! ```

use regex::Regex;
use std::sync::OnceLock;

use crate::error::{TqlError, TqlResult};

fn container_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^\s*select.*[\s*)']from\s+([a-zA-Z0-9_]*)\s*(?:$|limit|order|where).*$")
            .expect("container pattern compiles")
    })
}

/// Extract the container name from a raw TQL statement
pub fn extract_container(tql: &str) -> TqlResult<String> {
    if tql.trim().is_empty() {
        return Err(TqlError::InvalidQuery("Query must not be empty".to_string()));
    }

    let normalized = tql.replace("\r\n", " ").replace(['\n', '\r'], " ");

    let captures = container_pattern()
        .captures(&normalized)
        .ok_or_else(|| TqlError::UnparseableQuery("Query is wrong format".to_string()))?;

    match captures.get(1).map(|m| m.as_str().trim()) {
        Some(name) if !name.is_empty() => Ok(name.to_string()),
        _ => Err(TqlError::UnparseableQuery(
            "Cannot detect container name from query".to_string(),
        )),
    }
}
