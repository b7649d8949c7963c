//! Rendering result with statistics.

use crate::model::{ContentNode, ContentTree, NodeKind};
use serde::{Deserialize, Serialize};

/// Result of rendering a tree, including content and statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderResult {
    /// The rendered content (HTML, Markdown, text)
    pub content: String,

    /// Tree statistics
    pub stats: TreeStats,

    /// Warnings carried over from transpiling
    pub warnings: Vec<String>,
}

impl RenderResult {
    /// Create a new render result.
    pub fn new(content: String, stats: TreeStats, warnings: Vec<String>) -> Self {
        Self {
            content,
            stats,
            warnings,
        }
    }

    /// Get the content length in bytes.
    pub fn content_len(&self) -> usize {
        self.content.len()
    }
}

/// Statistics about a content tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeStats {
    /// Number of sections
    pub section_count: u32,

    /// Number of subheading entries
    pub entry_count: u32,

    /// Number of lists
    pub list_count: u32,

    /// Number of list items
    pub list_item_count: u32,

    /// Number of column groups
    pub column_group_count: u32,

    /// Number of links
    pub link_count: u32,

    /// Approximate word count (whitespace-separated tokens)
    pub word_count: u32,

    /// Character count (excluding whitespace)
    pub char_count: u32,

    /// Number of transpile warnings
    pub warning_count: u32,
}

impl TreeStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect statistics from a tree.
    pub fn from_tree(tree: &ContentTree) -> Self {
        let mut stats = Self::new();
        tree.walk(&mut |node| stats.add_node(node));
        stats
    }

    /// Count one node (not its children), including its own text.
    pub fn add_node(&mut self, node: &ContentNode) {
        match node {
            ContentNode::PlainText { value } => self.count_text(value),
            ContentNode::Header { name, .. } => self.count_text(name),
            ContentNode::Section { title, .. } => self.count_text(title),
            _ => {}
        }
        match node.kind() {
            NodeKind::Section => self.section_count += 1,
            NodeKind::Entry => self.entry_count += 1,
            NodeKind::ItemList => {
                self.list_count += 1;
                if let ContentNode::ItemList { items, .. } = node {
                    self.list_item_count += items.len() as u32;
                }
            }
            NodeKind::ColumnGroup => self.column_group_count += 1,
            NodeKind::Link => self.link_count += 1,
            _ => {}
        }
    }

    /// Add word and character counts from text.
    pub fn count_text(&mut self, text: &str) {
        // Word count: whitespace-separated tokens
        self.word_count += text.split_whitespace().count() as u32;

        // Character count: non-whitespace characters
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count() as u32;
    }
}
