//! Visitor pattern for customizing tree rendering.
//!
//! The visitor pattern allows users to customize how different nodes are
//! rendered without modifying the core rendering logic.
//!
//! # Example
//!
//! ```
//! use rezume::render::visitor::{NodeVisitor, VisitorAction};
//!
//! struct HideLinks;
//!
//! impl NodeVisitor for HideLinks {
//!     fn visit_link(&mut self, _href: &str, label: &str) -> VisitorAction {
//!         // Keep the label, drop the anchor
//!         VisitorAction::Replace(label.to_string())
//!     }
//! }
//! ```

use crate::model::ContentNode;

/// Action returned by visitor methods to control rendering behavior.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum VisitorAction {
    /// Continue with default rendering.
    #[default]
    Continue,

    /// Replace the node with custom output, emitted verbatim.
    Replace(String),

    /// Skip this node entirely (produce no output).
    Skip,
}

impl VisitorAction {
    /// Check if this action indicates the node should be skipped.
    pub fn should_skip(&self) -> bool {
        matches!(self, VisitorAction::Skip)
    }

    /// Check if this action provides replacement content.
    pub fn is_replace(&self) -> bool {
        matches!(self, VisitorAction::Replace(_))
    }

    /// Get replacement content if available.
    pub fn replacement(&self) -> Option<&str> {
        match self {
            VisitorAction::Replace(s) => Some(s),
            _ => None,
        }
    }
}

/// Trait for visiting nodes during rendering.
///
/// Implement this trait to customize how specific nodes are rendered.
/// All methods return `VisitorAction::Continue` by default.
pub trait NodeVisitor: Send + Sync {
    /// Called before rendering any node, ahead of the specific methods.
    ///
    /// # Arguments
    /// * `node` - The node about to be rendered
    ///
    /// # Returns
    /// Action indicating how to handle this node
    fn visit_node(&mut self, node: &ContentNode) -> VisitorAction {
        let _ = node;
        VisitorAction::Continue
    }

    /// Called before rendering a section.
    ///
    /// # Arguments
    /// * `title` - The section title
    ///
    /// # Returns
    /// Action indicating how to handle the whole section
    fn visit_section(&mut self, title: &str) -> VisitorAction {
        let _ = title;
        VisitorAction::Continue
    }

    /// Called before rendering a link.
    ///
    /// # Arguments
    /// * `href` - Link target
    /// * `label` - Plain text of the visible label
    ///
    /// # Returns
    /// Action indicating how to handle this link
    fn visit_link(&mut self, href: &str, label: &str) -> VisitorAction {
        let _ = (href, label);
        VisitorAction::Continue
    }
}

/// Run a visitor over one node: the generic hook first, then the hook for
/// the node's kind.
pub fn dispatch(visitor: &mut dyn NodeVisitor, node: &ContentNode) -> VisitorAction {
    let action = visitor.visit_node(node);
    if action != VisitorAction::Continue {
        return action;
    }
    match node {
        ContentNode::Section { title, .. } => visitor.visit_section(title),
        ContentNode::Link { href, label } => visitor.visit_link(href, &label.plain_text()),
        _ => VisitorAction::Continue,
    }
}

/// Default visitor that performs no customization.
///
/// All visit methods return `VisitorAction::Continue`.
#[derive(Debug, Clone, Default)]
pub struct DefaultVisitor;

impl DefaultVisitor {
    /// Create a new default visitor.
    pub fn new() -> Self {
        Self
    }
}

impl NodeVisitor for DefaultVisitor {}

/// Visitor that leaves out sections by title (case-insensitive).
#[derive(Debug, Clone, Default)]
pub struct SkipSectionsVisitor {
    titles: Vec<String>,
}

impl SkipSectionsVisitor {
    /// Create a visitor skipping the given section titles.
    pub fn new<I, S>(titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            titles: titles
                .into_iter()
                .map(|t| t.as_ref().trim().to_lowercase())
                .collect(),
        }
    }
}

impl NodeVisitor for SkipSectionsVisitor {
    fn visit_section(&mut self, title: &str) -> VisitorAction {
        let title = title.trim().to_lowercase();
        if self.titles.iter().any(|t| *t == title) {
            VisitorAction::Skip
        } else {
            VisitorAction::Continue
        }
    }
}

/// Composite visitor that chains multiple visitors.
///
/// Visitors are called in order. The first visitor that returns
/// a non-Continue action determines the result.
pub struct CompositeVisitor {
    visitors: Vec<Box<dyn NodeVisitor>>,
}

impl CompositeVisitor {
    /// Create a new composite visitor.
    pub fn new() -> Self {
        Self {
            visitors: Vec::new(),
        }
    }

    /// Add a visitor to the chain.
    pub fn with_visitor<V: NodeVisitor + 'static>(mut self, visitor: V) -> Self {
        self.visitors.push(Box::new(visitor));
        self
    }

    /// Check if the chain has no visitors.
    pub fn is_empty(&self) -> bool {
        self.visitors.is_empty()
    }
}

impl Default for CompositeVisitor {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeVisitor for CompositeVisitor {
    fn visit_node(&mut self, node: &ContentNode) -> VisitorAction {
        for visitor in &mut self.visitors {
            let action = visitor.visit_node(node);
            if !matches!(action, VisitorAction::Continue) {
                return action;
            }
        }
        VisitorAction::Continue
    }

    fn visit_section(&mut self, title: &str) -> VisitorAction {
        for visitor in &mut self.visitors {
            let action = visitor.visit_section(title);
            if !matches!(action, VisitorAction::Continue) {
                return action;
            }
        }
        VisitorAction::Continue
    }

    fn visit_link(&mut self, href: &str, label: &str) -> VisitorAction {
        for visitor in &mut self.visitors {
            let action = visitor.visit_link(href, label);
            if !matches!(action, VisitorAction::Continue) {
                return action;
            }
        }
        VisitorAction::Continue
    }
}
