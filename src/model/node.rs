//! Content node types.

use serde::{Deserialize, Serialize};

/// One semantic unit of a resume.
///
/// Nodes form a tree built bottom-up by the transpiler; a node never refers
/// back to an ancestor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentNode {
    /// Name banner with contact details.
    Header {
        /// Candidate name
        name: String,
        /// Plain text of each contact segment
        contact_lines: Vec<String>,
        /// Contact segments as nodes, aligned with `contact_lines`
        contacts: Vec<ContentNode>,
    },

    /// Titled section. The body may be empty.
    Section {
        /// Section title
        title: String,
        /// Nodes up to the next section
        body: Vec<ContentNode>,
    },

    /// Four-field heading (organization / location / role / dates).
    Entry {
        /// First row, left
        primary: Box<ContentNode>,
        /// First row, right
        secondary: Box<ContentNode>,
        /// Second row, left
        tertiary: Box<ContentNode>,
        /// Second row, right
        quaternary: Box<ContentNode>,
    },

    /// Vertical list of items.
    ItemList {
        /// Whether item markers are shown
        bulleted: bool,
        /// One node per item
        items: Vec<ContentNode>,
    },

    /// Side-by-side blocks.
    ColumnGroup {
        /// One node per column
        columns: Vec<ContentNode>,
    },

    /// Centered text block without columns.
    Centered {
        /// Centered content
        body: Vec<ContentNode>,
    },

    /// Styled inline content.
    StyledSpan {
        /// Applied style
        style: SpanStyle,
        /// Styled content
        child: Box<ContentNode>,
    },

    /// Hyperlink.
    Link {
        /// Link target
        href: String,
        /// Visible label
        label: Box<ContentNode>,
    },

    /// Several nodes occupying a single-node slot.
    Fragment {
        /// Grouped nodes
        children: Vec<ContentNode>,
    },

    /// Explicit line break.
    LineBreak,

    /// Visual pipe divider.
    Separator,

    /// Literal text.
    PlainText {
        /// Text content
        value: String,
    },
}

/// Inline text style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanStyle {
    /// Bold weight
    Bold,
    /// Italic shape
    Italic,
    /// Underlined
    Underline,
    /// Small capitals
    SmallCaps,
    /// Link-colored text
    Accent,
}

/// Field-less discriminant of [`ContentNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Header,
    Section,
    Entry,
    ItemList,
    ColumnGroup,
    Centered,
    StyledSpan,
    Link,
    Fragment,
    LineBreak,
    Separator,
    PlainText,
}

impl ContentNode {
    /// Create a plain text node.
    pub fn text(value: impl Into<String>) -> Self {
        ContentNode::PlainText {
            value: value.into(),
        }
    }

    /// Create an empty plain text node (used for missing entry fields).
    pub fn empty() -> Self {
        Self::text("")
    }

    /// Wrap a node in a style.
    pub fn styled(style: SpanStyle, child: ContentNode) -> Self {
        ContentNode::StyledSpan {
            style,
            child: Box::new(child),
        }
    }

    /// Create a bold span over plain text.
    pub fn bold(text: impl Into<String>) -> Self {
        Self::styled(SpanStyle::Bold, Self::text(text))
    }

    /// Create an italic span over plain text.
    pub fn italic(text: impl Into<String>) -> Self {
        Self::styled(SpanStyle::Italic, Self::text(text))
    }

    /// Create a link node.
    pub fn link(href: impl Into<String>, label: ContentNode) -> Self {
        ContentNode::Link {
            href: href.into(),
            label: Box::new(label),
        }
    }

    /// Create an entry from its four positional fields.
    pub fn entry(
        primary: ContentNode,
        secondary: ContentNode,
        tertiary: ContentNode,
        quaternary: ContentNode,
    ) -> Self {
        ContentNode::Entry {
            primary: Box::new(primary),
            secondary: Box::new(secondary),
            tertiary: Box::new(tertiary),
            quaternary: Box::new(quaternary),
        }
    }

    /// Fold a node sequence into a single node.
    ///
    /// Zero nodes give empty text, one node is returned as is, more are
    /// grouped in a [`ContentNode::Fragment`].
    pub fn collapse(mut nodes: Vec<ContentNode>) -> Self {
        match nodes.len() {
            0 => Self::empty(),
            1 => nodes.remove(0),
            _ => ContentNode::Fragment { children: nodes },
        }
    }

    /// Get the kind of this node.
    pub fn kind(&self) -> NodeKind {
        match self {
            ContentNode::Header { .. } => NodeKind::Header,
            ContentNode::Section { .. } => NodeKind::Section,
            ContentNode::Entry { .. } => NodeKind::Entry,
            ContentNode::ItemList { .. } => NodeKind::ItemList,
            ContentNode::ColumnGroup { .. } => NodeKind::ColumnGroup,
            ContentNode::Centered { .. } => NodeKind::Centered,
            ContentNode::StyledSpan { .. } => NodeKind::StyledSpan,
            ContentNode::Link { .. } => NodeKind::Link,
            ContentNode::Fragment { .. } => NodeKind::Fragment,
            ContentNode::LineBreak => NodeKind::LineBreak,
            ContentNode::Separator => NodeKind::Separator,
            ContentNode::PlainText { .. } => NodeKind::PlainText,
        }
    }

    /// Check if this node flows inside a line of text.
    pub fn is_inline(&self) -> bool {
        matches!(
            self,
            ContentNode::PlainText { .. }
                | ContentNode::StyledSpan { .. }
                | ContentNode::Link { .. }
                | ContentNode::LineBreak
                | ContentNode::Separator
        )
    }

    /// Check if a renderer should avoid splitting this node across pages.
    pub fn keeps_together(&self) -> bool {
        matches!(
            self,
            ContentNode::Section { .. } | ContentNode::Entry { .. } | ContentNode::ColumnGroup { .. }
        )
    }

    /// Check if this node carries no visible content.
    pub fn is_empty(&self) -> bool {
        match self {
            ContentNode::PlainText { value } => value.is_empty(),
            ContentNode::Fragment { children } => children.iter().all(|c| c.is_empty()),
            _ => false,
        }
    }

    /// Direct children, in document order.
    pub fn children(&self) -> Vec<&ContentNode> {
        match self {
            ContentNode::Header { contacts, .. } => contacts.iter().collect(),
            ContentNode::Section { body, .. } | ContentNode::Centered { body } => {
                body.iter().collect()
            }
            ContentNode::Entry {
                primary,
                secondary,
                tertiary,
                quaternary,
            } => vec![
                primary.as_ref(),
                secondary.as_ref(),
                tertiary.as_ref(),
                quaternary.as_ref(),
            ],
            ContentNode::ItemList { items, .. } => items.iter().collect(),
            ContentNode::ColumnGroup { columns } => columns.iter().collect(),
            ContentNode::Fragment { children } => children.iter().collect(),
            ContentNode::StyledSpan { child, .. } => vec![child.as_ref()],
            ContentNode::Link { label, .. } => vec![label.as_ref()],
            ContentNode::LineBreak | ContentNode::Separator | ContentNode::PlainText { .. } => {
                Vec::new()
            }
        }
    }

    /// Visit this node and all descendants depth-first, parents first.
    pub fn walk<'a, F: FnMut(&'a ContentNode)>(&'a self, f: &mut F) {
        f(self);
        for child in self.children() {
            child.walk(f);
        }
    }

    /// Get the plain text content of this node.
    ///
    /// Inline nodes give their visible text; block nodes give one line per
    /// row of content.
    pub fn plain_text(&self) -> String {
        match self {
            ContentNode::PlainText { value } => value.clone(),
            ContentNode::LineBreak => "\n".to_string(),
            ContentNode::Separator => " | ".to_string(),
            ContentNode::StyledSpan { child, .. } => child.plain_text(),
            ContentNode::Link { label, .. } => label.plain_text(),
            ContentNode::Fragment { children } => {
                children.iter().map(|c| c.plain_text()).collect()
            }
            ContentNode::Header {
                name,
                contact_lines,
                ..
            } => {
                if contact_lines.is_empty() {
                    name.clone()
                } else {
                    format!("{}\n{}", name, contact_lines.join(" | "))
                }
            }
            ContentNode::Section { title, body } => {
                let mut text = title.to_uppercase();
                let body = join_blocks(body, "\n");
                if !body.is_empty() {
                    text.push('\n');
                    text.push_str(&body);
                }
                text
            }
            ContentNode::Entry {
                primary,
                secondary,
                tertiary,
                quaternary,
            } => {
                let first = join_fields(primary, secondary);
                let second = join_fields(tertiary, quaternary);
                match (first.is_empty(), second.is_empty()) {
                    (false, false) => format!("{}\n{}", first, second),
                    (false, true) => first,
                    (true, _) => second,
                }
            }
            ContentNode::ItemList { bulleted, items } => items
                .iter()
                .map(|item| {
                    let text = item.plain_text();
                    if *bulleted {
                        format!("- {}", text)
                    } else {
                        text
                    }
                })
                .collect::<Vec<_>>()
                .join("\n"),
            ContentNode::ColumnGroup { columns } => columns
                .iter()
                .map(|c| c.plain_text())
                .collect::<Vec<_>>()
                .join("\n\n"),
            ContentNode::Centered { body } => join_blocks(body, "\n"),
        }
    }
}

/// Join a mixed sequence: runs of inline nodes form one line, block nodes
/// stand on their own.
pub(crate) fn join_blocks(nodes: &[ContentNode], separator: &str) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut line = String::new();
    for node in nodes {
        if node.is_inline() {
            line.push_str(&node.plain_text());
        } else {
            if !line.trim().is_empty() {
                parts.push(line.trim().to_string());
            }
            line.clear();
            parts.push(node.plain_text());
        }
    }
    if !line.trim().is_empty() {
        parts.push(line.trim().to_string());
    }
    parts.join(separator)
}

fn join_fields(left: &ContentNode, right: &ContentNode) -> String {
    let left = left.plain_text();
    let right = right.plain_text();
    match (left.is_empty(), right.is_empty()) {
        (false, false) => format!("{}, {}", left, right),
        (false, true) => left,
        (true, _) => right,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse() {
        assert_eq!(ContentNode::collapse(vec![]), ContentNode::empty());
        assert_eq!(
            ContentNode::collapse(vec![ContentNode::text("a")]),
            ContentNode::text("a")
        );
        let fragment = ContentNode::collapse(vec![ContentNode::text("a"), ContentNode::bold("b")]);
        assert_eq!(fragment.kind(), NodeKind::Fragment);
        assert_eq!(fragment.plain_text(), "ab");
    }

    #[test]
    fn test_entry_plain_text() {
        let entry = ContentNode::entry(
            ContentNode::text("Globex"),
            ContentNode::empty(),
            ContentNode::italic("Data Analyst"),
            ContentNode::text("2024"),
        );
        assert_eq!(entry.plain_text(), "Globex\nData Analyst, 2024");
    }

    #[test]
    fn test_section_plain_text() {
        let section = ContentNode::Section {
            title: "Skills".to_string(),
            body: vec![
                ContentNode::bold("Rust:"),
                ContentNode::text(" parsers"),
                ContentNode::ItemList {
                    bulleted: true,
                    items: vec![ContentNode::text("one")],
                },
            ],
        };
        assert_eq!(section.plain_text(), "SKILLS\nRust: parsers\n- one");
    }

    #[test]
    fn test_walk_visits_nested_nodes() {
        let node = ContentNode::link(
            "https://example.com",
            ContentNode::styled(SpanStyle::Underline, ContentNode::text("site")),
        );
        let mut kinds = Vec::new();
        node.walk(&mut |n| kinds.push(n.kind()));
        assert_eq!(
            kinds,
            vec![NodeKind::Link, NodeKind::StyledSpan, NodeKind::PlainText]
        );
    }

    #[test]
    fn test_keeps_together() {
        assert!(ContentNode::ColumnGroup { columns: vec![] }.keeps_together());
        assert!(!ContentNode::LineBreak.keeps_together());
    }

    #[test]
    fn test_serde_tagging() {
        let json = serde_json::to_string(&ContentNode::bold("x")).unwrap();
        assert!(json.contains("\"type\":\"styled_span\""));
        assert!(json.contains("\"style\":\"bold\""));
    }
}
