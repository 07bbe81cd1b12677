//! Category tree node definitions shared by the catalog, API and UI crates.

use std::fmt;

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde::{Deserialize, Deserializer, Serialize};

/// Characters escaped inside a single path segment of a public category URL.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Delimiter used when rendering an ancestor chain as a single label.
pub const FULL_PATH_DELIMITER: &str = " > ";

/// Identifier of a category node.
///
/// Identifiers are unique within a single fetched tree snapshot only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub u64);

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for CategoryId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// A single node of the storefront category tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryNode {
    /// Unique identifier within the snapshot.
    pub id: CategoryId,
    /// Display label; also the text matched by search.
    pub name: String,
    /// Slash separated identifier used to build the public browsing URL.
    #[serde(default)]
    pub path: String,
    /// Ordered children. Missing and `null` both mean "no children".
    #[serde(default, deserialize_with = "null_as_empty")]
    pub children: Vec<CategoryNode>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<CategoryNode>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<CategoryNode>>::deserialize(deserializer)?.unwrap_or_default())
}

impl CategoryNode {
    /// Build a leaf node.
    pub fn leaf(id: u64, name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: CategoryId(id),
            name: name.into(),
            path: path.into(),
            children: Vec::new(),
        }
    }

    /// Build a branch node with the provided children.
    pub fn branch(id: u64, name: impl Into<String>, path: impl Into<String>, children: Vec<CategoryNode>) -> Self {
        Self {
            id: CategoryId(id),
            name: name.into(),
            path: path.into(),
            children,
        }
    }

    /// A node with at least one child.
    pub fn is_branch(&self) -> bool {
        !self.children.is_empty()
    }

    /// A node without children; the only kind that can be a final selection.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Case-insensitive substring match of `term` against the node name.
    ///
    /// `term` is expected to be lowercased already; see [`normalize_term`].
    pub fn matches(&self, normalized_term: &str) -> bool {
        self.name.to_lowercase().contains(normalized_term)
    }

    /// Returns `true` when `child` is a direct child of this node (compared by id).
    pub fn has_child(&self, child: CategoryId) -> bool {
        self.children.iter().any(|candidate| candidate.id == child)
    }
}

/// Lowercase a search term so it can be fed to [`CategoryNode::matches`].
pub fn normalize_term(term: &str) -> String {
    term.to_lowercase()
}

/// Public browsing URL for a chosen category: `/c/{path}?category=<name>`.
pub fn category_url(node: &CategoryNode) -> String {
    let encoded_path = node
        .path
        .trim_start_matches('/')
        .split('/')
        .map(|segment| utf8_percent_encode(segment, PATH_SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/");
    let encoded_name: String = url::form_urlencoded::byte_serialize(node.name.as_bytes()).collect();
    format!("/c/{encoded_path}?category={encoded_name}")
}
