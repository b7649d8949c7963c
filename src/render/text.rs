//! Plain text rendering for resumes.

use crate::error::Result;
use crate::model::ContentTree;

/// Convert a tree to plain text.
///
/// Blocks are separated by blank lines, section titles are upper-cased and
/// list items are prefixed with `- `.
pub fn to_text(tree: &ContentTree) -> Result<String> {
    let output = tree.plain_text();
    Ok(output.trim().to_string())
}
