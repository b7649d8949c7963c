//! Content model for transpiled resume markup.
//!
//! This module defines the intermediate representation that bridges the
//! markup transpiler and the renderers. Nodes are plain data: they are
//! created during one conversion call and owned by the caller afterwards.

mod node;
mod tree;

pub use node::{ContentNode, NodeKind, SpanStyle};
pub use tree::{ContentTree, ConversionResult};
