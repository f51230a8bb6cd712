//! Document client
//!
//! A [`Dynalist`] holds one snapshot of one document. The snapshot is
//! fetched once, when the client is built, and never changes afterwards;
//! build a new client to observe remote edits.
//!
//! ## Usage
//!
//! ```ignore
//! let doc = Dynalist::new("FF7nfSyfsJjx9NvOfqts_rfO", None)?;
//!
//! for child in doc.get_children(ROOT_ID)? {
//!     println!("{}", child.content);
//! }
//!
//! let hits = doc.search("123");
//! doc.to_json(None)?;
//! ```

use std::collections::HashMap;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::api::{DocumentApi, HttpApi};
use crate::auth::{env_lookup, resolve_token, resolve_token_or};
use crate::config::Config;
use crate::error::{DynalistError, Result};
use crate::export::{export_file_name, write_export};
use crate::models::{FileInfo, Node, NodeSummary, Snapshot, ROOT_ID};

/// Read-only client for a single Dynalist document
pub struct Dynalist<A = HttpApi> {
    /// Remote transport
    api: A,
    /// Resolved API token
    token: String,
    /// Base URL for deep links
    link_base: String,
    /// Nodes in document order
    snapshot: Snapshot,
    /// Node id -> position in `snapshot.nodes`
    index: HashMap<String, usize>,
    /// Root metadata
    file: FileInfo,
}

impl Dynalist<HttpApi> {
    /// Fetch a document using configuration from the default location
    ///
    /// If `token` is not provided, `DYNALIST_TOKEN` is used, then the token
    /// from the config file.
    ///
    /// With no credential available the result is
    /// [`DynalistError::Authentication`], even when the configuration itself
    /// fails to load.
    pub fn new(file_id: &str, token: Option<&str>) -> Result<Self> {
        let config = match Config::load() {
            Ok(config) => config,
            Err(e) => {
                resolve_token(token, env_lookup)?;
                return Err(e.into());
            }
        };
        Self::with_config(file_id, token, &config)
    }

    /// Fetch a document using the given configuration
    pub fn with_config(file_id: &str, token: Option<&str>, config: &Config) -> Result<Self> {
        let token = resolve_token_or(token, env_lookup, config.token.as_deref())?;
        let api = HttpApi::new(config)?;
        Self::connect(api, file_id, token, config.link_base())
    }
}

impl<A: DocumentApi> Dynalist<A> {
    /// Fetch a document through an arbitrary transport
    pub fn connect(
        api: A,
        file_id: &str,
        token: impl Into<String>,
        link_base: &str,
    ) -> Result<Self> {
        let token = token.into();
        debug!("Fetching document {}", file_id);

        let snapshot = api.read_doc(&token, file_id).map_err(|e| {
            warn!("Failed to fetch document {}: {}", file_id, e);
            e
        })?;

        info!(
            "Fetched document {}, version={}, nodes={}",
            file_id,
            snapshot.version,
            snapshot.len()
        );

        Ok(Self::from_snapshot(api, token, link_base, snapshot))
    }

    /// Build a ready client from an already fetched snapshot
    ///
    /// No remote call is made.
    pub fn from_snapshot(
        api: A,
        token: impl Into<String>,
        link_base: &str,
        snapshot: Snapshot,
    ) -> Self {
        let index = build_index(&snapshot.nodes);
        let title = index
            .get(ROOT_ID)
            .map(|&i| snapshot.nodes[i].content.clone())
            .unwrap_or_default();

        Self {
            api,
            token: token.into(),
            link_base: link_base.trim_end_matches('/').to_string(),
            snapshot,
            index,
            file: FileInfo { title },
        }
    }

    /// Document id
    pub fn file_id(&self) -> &str {
        &self.snapshot.file_id
    }

    /// Version captured when the snapshot was fetched
    pub fn version(&self) -> i64 {
        self.snapshot.version
    }

    /// All nodes in document order
    pub fn nodes(&self) -> &[Node] {
        &self.snapshot.nodes
    }

    /// The full snapshot
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Root metadata
    pub fn file(&self) -> &FileInfo {
        &self.file
    }

    /// Document title (content of the root node)
    pub fn title(&self) -> &str {
        &self.file.title
    }

    /// Get a node by id
    ///
    /// Unknown ids yield `None`, never an error.
    pub fn get_node(&self, node_id: &str) -> Option<&Node> {
        self.index.get(node_id).map(|&i| &self.snapshot.nodes[i])
    }

    /// The root node
    pub fn root(&self) -> Option<&Node> {
        self.get_node(ROOT_ID)
    }

    /// Markdown deep link to a node: `[content](web_url/file_id#z=node_id)`
    pub fn get_node_link(&self, node_id: &str) -> Result<String> {
        let node = self
            .get_node(node_id)
            .ok_or_else(|| DynalistError::lookup(node_id))?;

        Ok(format!(
            "[{}]({}/{}#z={})",
            node.content,
            self.link_base,
            self.file_id(),
            node.id
        ))
    }

    /// Children of a node in outline order
    ///
    /// A leaf yields an empty list. An unknown parent, or a child id the
    /// snapshot does not contain, is a lookup error.
    pub fn get_children(&self, node_id: &str) -> Result<Vec<&Node>> {
        let parent = self
            .get_node(node_id)
            .ok_or_else(|| DynalistError::lookup(node_id))?;

        parent
            .child_ids()
            .iter()
            .map(|id| self.get_node(id).ok_or_else(|| DynalistError::lookup(id)))
            .collect()
    }

    /// Nodes whose content or note contains `keyword`, in document order
    ///
    /// Case-sensitive substring match; an empty keyword matches every node.
    pub fn search(&self, keyword: &str) -> Vec<NodeSummary> {
        self.snapshot
            .nodes
            .iter()
            .filter(|n| n.matches(keyword))
            .map(NodeSummary::from)
            .collect()
    }

    /// Compare the remote version with the version of this snapshot
    ///
    /// Returns `true` when they are EQUAL, i.e. when the snapshot is still
    /// current and no update is needed.
    pub fn check_for_updates(&self) -> Result<bool> {
        let remote = self.api.document_version(&self.token, self.file_id())?;
        debug!(
            "Document {} local version={}, remote version={}",
            self.file_id(),
            self.version(),
            remote
        );
        Ok(remote == self.version())
    }

    /// Write the node list as JSON
    ///
    /// Defaults to `<title>.json`; see [`export_file_name`] for the naming
    /// rule. The target directory must exist. Returns the path written.
    pub fn to_json(&self, file_name: Option<&str>) -> Result<PathBuf> {
        let path = PathBuf::from(export_file_name(file_name, self.title()));
        write_export(&path, self.nodes())?;
        debug!("Exported {} nodes to {:?}", self.snapshot.len(), path);
        Ok(path)
    }
}

impl<A> std::fmt::Debug for Dynalist<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dynalist")
            .field("file_id", &self.snapshot.file_id)
            .field("version", &self.snapshot.version)
            .field("title", &self.file.title)
            .field("nodes", &self.snapshot.len())
            .finish_non_exhaustive()
    }
}

/// Map node ids to positions; later duplicates win
fn build_index(nodes: &[Node]) -> HashMap<String, usize> {
    let mut index = HashMap::with_capacity(nodes.len());
    for (i, node) in nodes.iter().enumerate() {
        if index.insert(node.id.clone(), i).is_some() {
            warn!("Duplicate node id {}", node.id);
        }
    }
    index
}
