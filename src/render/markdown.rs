//! Markdown rendering for resumes.

use crate::error::Result;
use crate::model::{ContentNode, ContentTree, ConversionResult, SpanStyle};

use super::html::is_safe_href;
use super::visitor::{self, NodeVisitor, VisitorAction};
use super::{RenderOptions, RenderResult, TreeStats};

/// Convert a tree to Markdown.
pub fn to_markdown(tree: &ContentTree, options: &RenderOptions) -> Result<String> {
    let renderer = MarkdownRenderer::new(options.clone());
    renderer.render(tree)
}

/// Convert a transpiled result to Markdown with statistics.
pub fn to_markdown_with_stats(
    result: &ConversionResult,
    options: &RenderOptions,
) -> Result<RenderResult> {
    let mut options = options.clone();
    options.collect_stats = true;
    let renderer = MarkdownRenderer::new(options);
    renderer.render_with_stats(result)
}

/// Markdown renderer.
pub struct MarkdownRenderer {
    options: RenderOptions,
    stats: TreeStats,
    visitor: Option<Box<dyn NodeVisitor>>,
}

impl MarkdownRenderer {
    /// Create a new Markdown renderer.
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            stats: TreeStats::new(),
            visitor: None,
        }
    }

    /// Attach a visitor consulted before each node is rendered.
    pub fn with_visitor<V: NodeVisitor + 'static>(mut self, visitor: V) -> Self {
        self.visitor = Some(Box::new(visitor));
        self
    }

    /// Render a tree to Markdown.
    pub fn render(mut self, tree: &ContentTree) -> Result<String> {
        self.render_internal(tree)
    }

    /// Render a transpiled result to Markdown with statistics.
    pub fn render_with_stats(mut self, result: &ConversionResult) -> Result<RenderResult> {
        self.options.collect_stats = true;
        let content = self.render_internal(&result.tree)?;
        self.stats.warning_count = result.warnings.len() as u32;

        Ok(RenderResult::new(
            content,
            self.stats,
            result.warnings.clone(),
        ))
    }

    fn render_internal(&mut self, tree: &ContentTree) -> Result<String> {
        let mut output = String::new();
        self.render_blocks(&mut output, &tree.nodes);
        Ok(output.trim().to_string())
    }

    fn enter(&mut self, output: &mut String, node: &ContentNode) -> bool {
        let action = match self.visitor.as_mut() {
            Some(v) => visitor::dispatch(v.as_mut(), node),
            None => VisitorAction::Continue,
        };
        match action {
            VisitorAction::Continue => {
                if self.options.collect_stats {
                    self.stats.add_node(node);
                }
                true
            }
            VisitorAction::Replace(replacement) => {
                output.push_str(&replacement);
                false
            }
            VisitorAction::Skip => false,
        }
    }

    /// Render a block sequence; runs of inline nodes form one paragraph.
    fn render_blocks(&mut self, output: &mut String, nodes: &[ContentNode]) {
        let mut line = String::new();
        for node in flatten(nodes) {
            if node.is_inline() {
                self.render_inline(&mut line, node);
            } else {
                push_paragraph(output, &mut line);
                self.render_block(output, node, 0);
            }
        }
        push_paragraph(output, &mut line);
    }

    fn render_block(&mut self, output: &mut String, node: &ContentNode, indent: usize) {
        if !self.enter(output, node) {
            return;
        }

        match node {
            ContentNode::Header {
                name, contacts, ..
            } => {
                output.push_str(&format!("# {}\n\n", self.escape(name)));
                let mut parts = Vec::with_capacity(contacts.len());
                for contact in contacts {
                    let mut part = String::new();
                    self.render_inline(&mut part, contact);
                    parts.push(part.trim().to_string());
                }
                if !parts.is_empty() {
                    output.push_str(&parts.join(" | "));
                    output.push_str("\n\n");
                }
            }
            ContentNode::Section { title, body } => {
                output.push_str(&format!("## {}\n\n", self.escape(title)));
                self.render_blocks(output, body);
            }
            ContentNode::Entry {
                primary,
                secondary,
                tertiary,
                quaternary,
            } => {
                let first = self.entry_row(primary, secondary, SpanStyle::Bold);
                let second = self.entry_row(tertiary, quaternary, SpanStyle::Italic);
                match (first.is_empty(), second.is_empty()) {
                    (false, false) => output.push_str(&format!("{}  \n{}\n\n", first, second)),
                    (false, true) => output.push_str(&format!("{}\n\n", first)),
                    (true, false) => output.push_str(&format!("{}\n\n", second)),
                    (true, true) => {}
                }
            }
            ContentNode::ItemList { bulleted, items } => {
                self.render_list(output, *bulleted, items, indent);
                if indent == 0 {
                    output.push('\n');
                }
            }
            ContentNode::ColumnGroup { columns } => self.render_blocks(output, columns),
            ContentNode::Centered { body } => self.render_blocks(output, body),
            ContentNode::Fragment { children } => self.render_blocks(output, children),
            inline => {
                let mut line = String::new();
                self.render_inline(&mut line, inline);
                push_paragraph(output, &mut line);
            }
        }
    }

    fn render_list(&mut self, output: &mut String, bulleted: bool, items: &[ContentNode], indent: usize) {
        let pad = "  ".repeat(indent);
        for item in items {
            let mut line = String::new();
            let mut nested = Vec::new();
            for node in flatten(std::slice::from_ref(item)) {
                if node.is_inline() {
                    self.render_inline(&mut line, node);
                } else {
                    nested.push(node);
                }
            }

            let line = line.trim();
            if bulleted {
                output.push_str(&format!("{}{} {}\n", pad, self.options.list_marker, line));
            } else if !line.is_empty() {
                output.push_str(&format!("{}{}  \n", pad, line));
            }

            for node in nested {
                match node {
                    ContentNode::ItemList { .. } => self.render_block(output, node, indent + 1),
                    _ => {
                        let mut block = String::new();
                        self.render_block(&mut block, node, indent + 1);
                        for text in block.lines().filter(|l| !l.trim().is_empty()) {
                            output.push_str(&format!("{}  {}\n", pad, text.trim()));
                        }
                    }
                }
            }
        }
    }

    fn entry_row(&mut self, left: &ContentNode, right: &ContentNode, style: SpanStyle) -> String {
        let mut first = String::new();
        if !left.is_empty() {
            self.render_inline(&mut first, &ContentNode::styled(style, left.clone()));
        }
        let mut second = String::new();
        if !right.is_empty() {
            self.render_inline(&mut second, right);
        }
        let (first, second) = (first.trim(), second.trim());
        match (first.is_empty(), second.is_empty()) {
            (false, false) => format!("{} | {}", first, second),
            (false, true) => first.to_string(),
            (true, _) => second.to_string(),
        }
    }

    fn render_inline(&mut self, output: &mut String, node: &ContentNode) {
        if !self.enter(output, node) {
            return;
        }

        match node {
            ContentNode::PlainText { value } => output.push_str(&self.escape(value)),
            ContentNode::StyledSpan { style, child } => {
                let mut inner = String::new();
                self.render_inline(&mut inner, child);
                output.push_str(&apply_style(&inner, *style));
            }
            ContentNode::Link { href, label } => {
                let mut text = String::new();
                self.render_inline(&mut text, label);
                if is_safe_href(href) {
                    output.push_str(&format!("[{}]({})", text.trim(), href));
                } else {
                    output.push_str(text.trim());
                }
            }
            ContentNode::LineBreak => output.push_str("  \n"),
            ContentNode::Separator => output.push_str(" | "),
            ContentNode::Fragment { children } => {
                for child in children {
                    self.render_inline(output, child);
                }
            }
            block => output.push_str(&self.escape(&block.plain_text().replace('\n', " "))),
        }
    }

    fn escape(&self, text: &str) -> String {
        if self.options.escape_special_chars {
            escape_markdown(text)
        } else {
            text.to_string()
        }
    }
}

fn flatten(nodes: &[ContentNode]) -> Vec<&ContentNode> {
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            ContentNode::Fragment { children } => out.extend(flatten(children)),
            node => out.push(node),
        }
    }
    out
}

fn push_paragraph(output: &mut String, line: &mut String) {
    let text = line.trim();
    if !text.is_empty() {
        output.push_str(text);
        output.push_str("\n\n");
    }
    line.clear();
}

fn apply_style(text: &str, style: SpanStyle) -> String {
    // Emphasis markers must hug the text
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return text.to_string();
    }
    let lead = &text[..text.len() - text.trim_start().len()];
    let tail = &text[text.trim_end().len()..];
    let styled = match style {
        SpanStyle::Bold => format!("**{}**", trimmed),
        SpanStyle::Italic => format!("*{}*", trimmed),
        SpanStyle::Underline => format!("<u>{}</u>", trimmed),
        SpanStyle::SmallCaps | SpanStyle::Accent => trimmed.to_string(),
    };
    format!("{}{}{}", lead, styled, tail)
}

/// Escape special Markdown characters.
/// Only escape characters that could be misinterpreted as Markdown syntax.
fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '`' | '*' | '_' | '[' | ']' | '|' => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }
    result
}
