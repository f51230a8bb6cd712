//! Data models for Dynalist documents
//!
//! Defines the node record as the document API sends it, the snapshot
//! returned by one `doc/read` call, and the request/response bodies of the
//! two endpoints the client uses.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Id of the node every document is rooted at
pub const ROOT_ID: &str = "root";

/// API result code for a successful call
pub const CODE_OK: &str = "Ok";

/// One outline item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Node {
    /// Unique identifier within the document
    pub id: String,
    /// Display text
    pub content: String,
    /// Free-text annotation
    pub note: String,
    /// Completion flag
    #[serde(default)]
    pub checked: bool,
    /// Ordered child ids, absent on leaves
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<String>>,
    /// Fields this client does not interpret (timestamps, collapsed, ...),
    /// in the order the service sent them
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Node {
    /// Create a node with the given id and content
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            note: String::new(),
            checked: false,
            children: None,
            extra: Map::new(),
        }
    }

    /// Set the note
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    /// Set the completion flag
    pub fn with_checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    /// Set the child ids
    pub fn with_children<I, S>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.children = Some(children.into_iter().map(Into::into).collect());
        self
    }

    /// Child ids in outline order (empty for leaves)
    pub fn child_ids(&self) -> &[String] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Whether the keyword occurs in the content or the note
    pub fn matches(&self, keyword: &str) -> bool {
        self.content.contains(keyword) || self.note.contains(keyword)
    }
}

/// Search result: a node reduced to its text fields
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NodeSummary {
    pub id: String,
    pub content: String,
    pub note: String,
    pub checked: bool,
}

impl From<&Node> for NodeSummary {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id.clone(),
            content: node.content.clone(),
            note: node.note.clone(),
            checked: node.checked,
        }
    }
}

/// Metadata derived from the root node
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileInfo {
    pub title: String,
}

/// All nodes of one document as returned by a single fetch
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub file_id: String,
    pub version: i64,
    pub nodes: Vec<Node>,
}

impl Snapshot {
    pub fn new(file_id: impl Into<String>, version: i64, nodes: Vec<Node>) -> Self {
        Self {
            file_id: file_id.into(),
            version,
            nodes,
        }
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Body of `POST /doc/read`
#[derive(Debug, Serialize)]
pub struct ReadRequest<'a> {
    pub token: &'a str,
    pub file_id: &'a str,
}

/// Response of `POST /doc/read`
#[derive(Debug, Clone, Deserialize)]
pub struct ReadResponse {
    #[serde(rename = "_code", default)]
    pub code: Option<String>,
    #[serde(rename = "_msg", default)]
    pub message: Option<String>,
    #[serde(default)]
    pub version: Option<i64>,
    #[serde(default)]
    pub nodes: Option<Vec<Node>>,
}

/// Body of `POST /doc/check_for_updates`
#[derive(Debug, Serialize)]
pub struct CheckForUpdatesRequest<'a> {
    pub token: &'a str,
    pub file_ids: Vec<&'a str>,
}

/// Response of `POST /doc/check_for_updates`
#[derive(Debug, Clone, Deserialize)]
pub struct CheckForUpdatesResponse {
    #[serde(rename = "_code", default)]
    pub code: Option<String>,
    #[serde(rename = "_msg", default)]
    pub message: Option<String>,
    #[serde(default)]
    pub versions: BTreeMap<String, i64>,
}
