//! Document API transport
//!
//! [`DocumentApi`] is the seam between the client and the remote service.
//! [`HttpApi`] talks to the real service over blocking HTTP; tests plug in
//! an in-memory implementation instead.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::RemoteError;
use crate::models::{
    CheckForUpdatesRequest, CheckForUpdatesResponse, ReadRequest, ReadResponse, Snapshot, CODE_OK,
};

pub const READ_PATH: &str = "doc/read";
pub const CHECK_FOR_UPDATES_PATH: &str = "doc/check_for_updates";

const USER_AGENT: &str = concat!("dynalist-core/", env!("CARGO_PKG_VERSION"));

/// Remote operations the client needs
pub trait DocumentApi {
    /// Fetch all nodes of a document plus its version
    fn read_doc(&self, token: &str, file_id: &str) -> Result<Snapshot, RemoteError>;

    /// Fetch the current version of a document
    fn document_version(&self, token: &str, file_id: &str) -> Result<i64, RemoteError>;
}

/// Blocking HTTP implementation of [`DocumentApi`]
pub struct HttpApi {
    client: reqwest::blocking::Client,
    read_url: String,
    check_url: String,
}

impl HttpApi {
    /// Build a transport from configuration
    pub fn new(config: &Config) -> Result<Self, RemoteError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout())
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| RemoteError::Transport {
                endpoint: config.api_url.clone(),
                source: e,
            })?;

        Ok(Self {
            client,
            read_url: config.endpoint(READ_PATH),
            check_url: config.endpoint(CHECK_FOR_UPDATES_PATH),
        })
    }

    fn post<B, T>(&self, url: &str, body: &B) -> Result<T, RemoteError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        debug!("POST {}", url);

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .map_err(|e| RemoteError::Transport {
                endpoint: url.to_string(),
                source: e,
            })?;

        let status = response.status();
        let text = response.text().map_err(|e| RemoteError::Transport {
            endpoint: url.to_string(),
            source: e,
        })?;

        if !status.is_success() {
            warn!("{} returned HTTP {}", url, status);
            return Err(RemoteError::Status {
                endpoint: url.to_string(),
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str(&text).map_err(|e| RemoteError::Decode {
            endpoint: url.to_string(),
            details: e.to_string(),
        })
    }
}

impl DocumentApi for HttpApi {
    fn read_doc(&self, token: &str, file_id: &str) -> Result<Snapshot, RemoteError> {
        let response: ReadResponse = self.post(&self.read_url, &ReadRequest { token, file_id })?;
        check_code(response.code.as_deref(), response.message.as_deref())?;

        let version = response.version.ok_or_else(|| RemoteError::Decode {
            endpoint: self.read_url.clone(),
            details: "missing field `version`".to_string(),
        })?;
        let nodes = response.nodes.ok_or_else(|| RemoteError::Decode {
            endpoint: self.read_url.clone(),
            details: "missing field `nodes`".to_string(),
        })?;

        Ok(Snapshot::new(file_id, version, nodes))
    }

    fn document_version(&self, token: &str, file_id: &str) -> Result<i64, RemoteError> {
        let request = CheckForUpdatesRequest {
            token,
            file_ids: vec![file_id],
        };
        let response: CheckForUpdatesResponse = self.post(&self.check_url, &request)?;
        check_code(response.code.as_deref(), response.message.as_deref())?;

        response
            .versions
            .get(file_id)
            .copied()
            .ok_or_else(|| RemoteError::Decode {
                endpoint: self.check_url.clone(),
                details: format!("no version reported for '{}'", file_id),
            })
    }
}

/// Map an API result code other than "Ok" to an error
///
/// Responses without a code are accepted.
fn check_code(code: Option<&str>, message: Option<&str>) -> Result<(), RemoteError> {
    match code {
        None | Some(CODE_OK) => Ok(()),
        Some(code) => {
            warn!("API error {}: {}", code, message.unwrap_or_default());
            Err(RemoteError::Api {
                code: code.to_string(),
                message: message.unwrap_or_default().to_string(),
            })
        }
    }
}
