//! Dynalist Core Library
//!
//! A read-only client for the Dynalist document API. A client fetches the
//! flat node list of one document once, indexes it by node id, and serves
//! lookups, child traversal, keyword search, a version check and a JSON
//! export from that snapshot.
//!
//! # Quick Start
//!
//! ```text
//! let doc = Dynalist::new("FF7nfSyfsJjx9NvOfqts_rfO", None)?;
//!
//! let root = doc.get_node(ROOT_ID);
//! let children = doc.get_children(ROOT_ID)?;
//! let hits = doc.search("123");
//!
//! doc.to_json(Some("backup"))?;   // writes backup.json
//! ```
//!
//! # Modules
//!
//! - `client`: The document client (main entry point)
//! - `models`: Node records and API request/response bodies
//! - `api`: Transport trait and the blocking HTTP implementation
//! - `auth`: Token resolution
//! - `export`: JSON export of a snapshot
//! - `config`: Client configuration
//! - `error`: Error types

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod models;

pub use api::{DocumentApi, HttpApi};
pub use auth::{resolve_token, resolve_token_or};
pub use client::Dynalist;
pub use config::Config;
pub use error::{DynalistError, RemoteError, Result};
pub use export::{export_file_name, read_export};
pub use models::{FileInfo, Node, NodeSummary, Snapshot, ROOT_ID};
