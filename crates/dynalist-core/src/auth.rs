//! Credential resolution
//!
//! The token is resolved exactly once, when a client is constructed.

use crate::error::{DynalistError, Result, TOKEN_ENV};

/// Resolve the API token
///
/// An explicit token wins over the value `lookup` returns for
/// `DYNALIST_TOKEN`. Empty strings count as absent.
pub fn resolve_token<F>(explicit: Option<&str>, lookup: F) -> Result<String>
where
    F: FnOnce(&str) -> Option<String>,
{
    if let Some(token) = explicit.filter(|t| !t.is_empty()) {
        return Ok(token.to_string());
    }

    lookup(TOKEN_ENV)
        .filter(|t| !t.is_empty())
        .ok_or(DynalistError::Authentication)
}

/// Resolve the API token, falling back to a configured one
///
/// Order: `explicit`, then `DYNALIST_TOKEN` via `lookup`, then `fallback`.
/// An empty value at any step falls through to the next.
pub fn resolve_token_or<F>(
    explicit: Option<&str>,
    lookup: F,
    fallback: Option<&str>,
) -> Result<String>
where
    F: FnOnce(&str) -> Option<String>,
{
    resolve_token(explicit, |name| {
        lookup(name)
            .filter(|t| !t.is_empty())
            .or_else(|| fallback.map(str::to_string))
    })
}

/// Lookup backed by the process environment
pub fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}
