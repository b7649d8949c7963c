//! Incremental tree builder.

use crate::model::ContentNode;

/// Accumulates the nodes of one sequence.
///
/// Text is merged as it arrives; sections collect everything pushed after
/// them until the next section or [`TreeBuilder::finish`].
#[derive(Debug, Default)]
pub struct TreeBuilder {
    done: Vec<ContentNode>,
    current: Vec<ContentNode>,
    section: Option<String>,
}

impl TreeBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append text, merging with preceding text.
    pub fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(ContentNode::PlainText { value }) = self.current.last_mut() {
            value.push_str(text);
        } else {
            self.current.push(ContentNode::text(text));
        }
    }

    /// Append a node.
    pub fn push(&mut self, node: ContentNode) {
        match node {
            ContentNode::PlainText { value } => self.push_text(&value),
            node => self.current.push(node),
        }
    }

    /// Append several nodes in order.
    pub fn extend(&mut self, nodes: impl IntoIterator<Item = ContentNode>) {
        for node in nodes {
            self.push(node);
        }
    }

    /// Close the open section, if any, and start a new one.
    pub fn open_section(&mut self, title: String) {
        self.flush();
        self.section = Some(title);
    }

    /// Close the open section and return the finished sequence.
    pub fn finish(mut self) -> Vec<ContentNode> {
        self.flush();
        self.done
    }

    fn flush(&mut self) {
        let body = tidy(std::mem::take(&mut self.current));
        match self.section.take() {
            Some(title) => self.done.push(ContentNode::Section { title, body }),
            None => self.done.extend(body),
        }
    }
}

/// Collapse whitespace in text nodes and drop text that carries nothing.
///
/// Whitespace runs become one space; whitespace touching a block node, a
/// line break, a separator or either end of the sequence is removed.
pub fn tidy(nodes: Vec<ContentNode>) -> Vec<ContentNode> {
    let mut merged: Vec<ContentNode> = Vec::with_capacity(nodes.len());
    for node in nodes {
        if let ContentNode::PlainText { value: next } = &node {
            if let Some(ContentNode::PlainText { value }) = merged.last_mut() {
                value.push_str(next);
                continue;
            }
        }
        merged.push(node);
    }

    let flows: Vec<bool> = merged.iter().map(flows_with_text).collect();
    let mut out = Vec::with_capacity(merged.len());
    for (i, node) in merged.into_iter().enumerate() {
        let ContentNode::PlainText { value } = node else {
            out.push(node);
            continue;
        };
        let mut value = collapse_whitespace(&value);
        if i + 1 >= flows.len() || !flows[i + 1] {
            value.truncate(value.trim_end_matches(' ').len());
        }
        if i == 0 || !flows[i - 1] {
            value = value.trim_start_matches(' ').to_string();
        }
        if !value.is_empty() {
            out.push(ContentNode::PlainText { value });
        }
    }
    out
}

/// Text next to this node keeps its surrounding space.
fn flows_with_text(node: &ContentNode) -> bool {
    matches!(
        node,
        ContentNode::PlainText { .. } | ContentNode::StyledSpan { .. } | ContentNode::Link { .. }
    )
}

fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_ascii_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}
