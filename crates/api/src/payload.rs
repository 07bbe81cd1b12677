//! Wire shapes accepted for a category tree snapshot.
//!
//! Both a bare array of root nodes and an object wrapping it under
//! `categories` are accepted, from the API and from local files alike.

use aisle_catalog::CategoryTree;
use aisle_types::CategoryNode;
use serde::Deserialize;

use crate::error::CatalogError;

#[derive(Deserialize)]
#[serde(untagged)]
enum TreePayload {
    Bare(Vec<CategoryNode>),
    Wrapped { categories: Vec<CategoryNode> },
}

impl From<TreePayload> for CategoryTree {
    fn from(payload: TreePayload) -> Self {
        match payload {
            TreePayload::Bare(roots) | TreePayload::Wrapped { categories: roots } => CategoryTree::new(roots),
        }
    }
}

pub fn parse_tree_json(content: &str) -> Result<CategoryTree, CatalogError> {
    Ok(serde_json::from_str::<TreePayload>(content)?.into())
}

pub fn parse_tree_yaml(content: &str) -> Result<CategoryTree, CatalogError> {
    Ok(serde_yaml::from_str::<TreePayload>(content)?.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use aisle_types::CategoryId;

    #[test]
    fn accepts_bare_array() {
        let tree = parse_tree_json(r#"[{"id": 1, "name": "Books", "path": "books"}]"#).unwrap();
        assert_eq!(tree.roots().len(), 1);
    }

    #[test]
    fn accepts_wrapped_object() {
        let tree = parse_tree_json(
            r#"{"categories": [{"id": 1, "name": "Toys", "path": "toys", "children": [{"id": 2, "name": "Puzzles", "path": "toys/puzzles"}]}]}"#,
        )
        .unwrap();
        assert_eq!(tree.node_count(), 2);
        assert!(tree.find(CategoryId(2)).is_some());
    }

    #[test]
    fn accepts_yaml() {
        let tree = parse_tree_yaml("categories:\n  - id: 3\n    name: Music\n    path: music\n").unwrap();
        assert_eq!(tree.roots()[0].name, "Music");
    }

    #[test]
    fn rejects_unrelated_json() {
        assert!(matches!(parse_tree_json(r#"{"items": []}"#), Err(CatalogError::Json(_))));
    }
}
