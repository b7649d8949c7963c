//! Tree-level types.

use super::node::join_blocks;
use super::{ContentNode, NodeKind};
use serde::{Deserialize, Serialize};

/// Root of a transpiled resume: the ordered top-level nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentTree {
    /// Top-level nodes in document order
    pub nodes: Vec<ContentNode>,
}

impl ContentTree {
    /// Create a new empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a top-level node.
    pub fn push(&mut self, node: ContentNode) {
        self.nodes.push(node);
    }

    /// Check if the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of top-level nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Iterate over top-level nodes.
    pub fn iter(&self) -> std::slice::Iter<'_, ContentNode> {
        self.nodes.iter()
    }

    /// Visit every node depth-first.
    pub fn walk<'a, F: FnMut(&'a ContentNode)>(&'a self, f: &mut F) {
        for node in &self.nodes {
            node.walk(f);
        }
    }

    /// Count nodes of a kind anywhere in the tree.
    pub fn count(&self, kind: NodeKind) -> usize {
        let mut count = 0;
        self.walk(&mut |node| {
            if node.kind() == kind {
                count += 1;
            }
        });
        count
    }

    /// Collect all nodes of a kind, in document order.
    pub fn find_all(&self, kind: NodeKind) -> Vec<&ContentNode> {
        let mut found = Vec::new();
        self.walk(&mut |node| {
            if node.kind() == kind {
                found.push(node);
            }
        });
        found
    }

    /// Get the first header, if any.
    pub fn header(&self) -> Option<&ContentNode> {
        self.find_all(NodeKind::Header).into_iter().next()
    }

    /// Titles of all sections, in document order.
    pub fn section_titles(&self) -> Vec<&str> {
        self.find_all(NodeKind::Section)
            .into_iter()
            .filter_map(|node| match node {
                ContentNode::Section { title, .. } => Some(title.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Get plain text content of the whole tree.
    pub fn plain_text(&self) -> String {
        join_blocks(&self.nodes, "\n\n")
    }
}

impl From<Vec<ContentNode>> for ContentTree {
    fn from(nodes: Vec<ContentNode>) -> Self {
        Self { nodes }
    }
}

impl<'a> IntoIterator for &'a ContentTree {
    type Item = &'a ContentNode;
    type IntoIter = std::slice::Iter<'a, ContentNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

/// Outcome of one conversion: the tree plus everything that could not be
/// classified along the way.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversionResult {
    /// Transpiled content
    pub tree: ContentTree,

    /// Recoverable problems, in the order they were met
    pub warnings: Vec<String>,
}

impl ConversionResult {
    /// Create a new conversion result.
    pub fn new(tree: ContentTree, warnings: Vec<String>) -> Self {
        Self { tree, warnings }
    }

    /// Check if any warning was recorded.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> ContentTree {
        ContentTree::from(vec![
            ContentNode::Header {
                name: "Jane Roe".to_string(),
                contact_lines: vec!["Berlin".to_string()],
                contacts: vec![ContentNode::text("Berlin")],
            },
            ContentNode::Section {
                title: "Education".to_string(),
                body: vec![],
            },
            ContentNode::Section {
                title: "Skills".to_string(),
                body: vec![ContentNode::text("Rust")],
            },
        ])
    }

    #[test]
    fn test_count_and_titles() {
        let tree = sample_tree();
        assert_eq!(tree.count(NodeKind::Section), 2);
        assert_eq!(tree.count(NodeKind::PlainText), 2);
        assert_eq!(tree.section_titles(), vec!["Education", "Skills"]);
        assert!(tree.header().is_some());
    }

    #[test]
    fn test_plain_text() {
        let tree = sample_tree();
        assert_eq!(
            tree.plain_text(),
            "Jane Roe\nBerlin\n\nEDUCATION\n\nSKILLS\nRust"
        );
    }

    #[test]
    fn test_serializes_as_array() {
        let result = ConversionResult::new(ContentTree::new(), vec![]);
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"tree":[],"warnings":[]}"#);
    }
}
