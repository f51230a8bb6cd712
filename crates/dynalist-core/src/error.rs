//! Client error handling
//!
//! Every failure the client can report surfaces as a [`DynalistError`].
//! Nothing is retried or recovered locally.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Environment variable holding the API token
pub const TOKEN_ENV: &str = "DYNALIST_TOKEN";

/// Errors that can occur while talking to the document API
#[derive(Error, Debug)]
pub enum RemoteError {
    /// Request could not be sent or no response arrived
    #[error("Request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with a non-success HTTP status
    #[error("{endpoint} returned HTTP {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// Server answered with an API error code (InvalidToken, NotFound, ...)
    #[error("API error {code}: {message}")]
    Api { code: String, message: String },

    /// Response body could not be parsed
    #[error("Malformed response from {endpoint}: {details}")]
    Decode { endpoint: String, details: String },
}

/// Errors surfaced by the Dynalist client
#[derive(Error, Debug)]
pub enum DynalistError {
    /// No token passed and none found in the environment
    #[error(
        "Token not found. Pass a token explicitly or set the {} environment variable",
        TOKEN_ENV
    )]
    Authentication,

    /// Remote call failed
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// An operation that needs the node was given an unknown id
    #[error("Node not found: '{id}'")]
    Lookup { id: String },

    /// Export file could not be written or read
    #[error("Failed to export '{path}': {source}")]
    Export {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Export file is not a valid node list
    #[error("Invalid export in '{path}': {source}")]
    InvalidExport {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Configuration could not be loaded
    #[error(transparent)]
    Config(#[from] anyhow::Error),
}

impl DynalistError {
    pub fn lookup(id: impl Into<String>) -> Self {
        DynalistError::Lookup { id: id.into() }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, DynalistError::Remote(_))
    }

    pub fn is_lookup(&self) -> bool {
        matches!(self, DynalistError::Lookup { .. })
    }
}

/// Result type for client operations
pub type Result<T> = std::result::Result<T, DynalistError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authentication_display_names_env_var() {
        let msg = DynalistError::Authentication.to_string();
        assert!(msg.contains("DYNALIST_TOKEN"));
    }

    #[test]
    fn test_lookup_display() {
        let err = DynalistError::lookup("abc");
        assert!(err.is_lookup());
        assert!(!err.is_remote());
        assert_eq!(err.to_string(), "Node not found: 'abc'");
    }

    #[test]
    fn test_remote_is_transparent() {
        let err: DynalistError = RemoteError::Api {
            code: "InvalidToken".to_string(),
            message: "Invalid token".to_string(),
        }
        .into();

        assert!(err.is_remote());
        assert_eq!(err.to_string(), "API error InvalidToken: Invalid token");
    }

    #[test]
    fn test_status_display() {
        let err = RemoteError::Status {
            endpoint: "doc/read".to_string(),
            status: 502,
            body: "Bad Gateway".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("502"));
        assert!(msg.contains("doc/read"));
    }
}
