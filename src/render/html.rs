//! HTML rendering with a print stylesheet.

use crate::error::Result;
use crate::model::{ContentNode, ContentTree, ConversionResult, SpanStyle};

use super::visitor::{self, NodeVisitor, VisitorAction};
use super::{RenderOptions, RenderResult, TreeStats};

/// Convert a tree to HTML.
pub fn to_html(tree: &ContentTree, options: &RenderOptions) -> Result<String> {
    let renderer = HtmlRenderer::new(options.clone());
    renderer.render(tree)
}

/// Convert a transpiled result to HTML with statistics.
pub fn to_html_with_stats(result: &ConversionResult, options: &RenderOptions) -> Result<RenderResult> {
    let mut options = options.clone();
    options.collect_stats = true;
    let renderer = HtmlRenderer::new(options);
    renderer.render_with_stats(result)
}

/// HTML renderer.
///
/// Produces either a complete document with an embedded stylesheet or a
/// body fragment, depending on [`RenderOptions::standalone`].
pub struct HtmlRenderer {
    options: RenderOptions,
    stats: TreeStats,
    visitor: Option<Box<dyn NodeVisitor>>,
}

impl HtmlRenderer {
    /// Create a new HTML renderer.
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

    /// Render a tree to HTML.
    pub fn render(mut self, tree: &ContentTree) -> Result<String> {
        self.render_internal(tree)
    }

    /// Render a transpiled result to HTML with statistics.
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
        let mut body = String::new();
        self.render_sequence(&mut body, &tree.nodes, true);

        if !self.options.standalone {
            return Ok(body);
        }

        let title = self
            .options
            .title
            .clone()
            .or_else(|| match tree.header() {
                Some(ContentNode::Header { name, .. }) if !name.is_empty() => Some(name.clone()),
                _ => None,
            })
            .unwrap_or_else(|| "Resume".to_string());

        let mut output = String::with_capacity(body.len() + 4096);
        output.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        output.push_str("<meta charset=\"utf-8\">\n");
        output.push_str(
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n",
        );
        output.push_str(&format!("<title>{}</title>\n", escape_html(&title)));
        output.push_str("<style>\n");
        output.push_str(&self.options.stylesheet.to_css());
        output.push_str("</style>\n</head>\n<body>\n");
        output.push_str(&body);
        output.push_str("</body>\n</html>\n");
        Ok(output)
    }

    /// Render nodes in order. Fragments are spliced in place; runs of
    /// inline nodes become one paragraph when `wrap` is set.
    fn render_sequence(&mut self, output: &mut String, nodes: &[ContentNode], wrap: bool) {
        let mut run = String::new();
        self.collect(output, &mut run, nodes, wrap);
        flush_run(output, &mut run, wrap);
    }

    fn collect(&mut self, output: &mut String, run: &mut String, nodes: &[ContentNode], wrap: bool) {
        for node in nodes {
            match node {
                ContentNode::Fragment { children } => self.collect(output, run, children, wrap),
                node if node.is_inline() => self.render_node(run, node),
                node => {
                    flush_run(output, run, wrap);
                    self.render_node(output, node);
                }
            }
        }
    }

    /// Consult the visitor and count the node. Returns false when the
    /// visitor handled it.
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

    fn render_node(&mut self, output: &mut String, node: &ContentNode) {
        if !self.enter(output, node) {
            return;
        }

        match node {
            ContentNode::Header { name, contacts, .. } => {
                self.render_header(output, name, contacts)
            }
            ContentNode::Section { title, body } => {
                output.push_str("<section class=\"resume-section\">\n");
                output.push_str(&format!(
                    "<h2 class=\"section-title\">{}</h2>\n",
                    escape_html(title)
                ));
                self.render_section_body(output, body);
                output.push_str("</section>\n");
            }
            ContentNode::Entry {
                primary,
                secondary,
                tertiary,
                quaternary,
            } => {
                output.push_str("<div class=\"resume-entry\">\n");
                self.render_entry_row(
                    output,
                    "entry-header",
                    [(primary.as_ref(), Some("strong")), (secondary.as_ref(), None)],
                    1,
                );
                if !(tertiary.is_empty() && quaternary.is_empty()) {
                    self.render_entry_row(
                        output,
                        "entry-details",
                        [(tertiary.as_ref(), Some("em")), (quaternary.as_ref(), None)],
                        3,
                    );
                }
                output.push_str("</div>\n");
            }
            ContentNode::ItemList { bulleted, items } => {
                if *bulleted {
                    output.push_str("<ul class=\"resume-list\">\n");
                } else {
                    output.push_str("<ul class=\"resume-list no-bullet\">\n");
                }
                for item in items {
                    output.push_str("<li>");
                    self.render_sequence(output, std::slice::from_ref(item), false);
                    output.push_str("</li>\n");
                }
                output.push_str("</ul>\n");
            }
            ContentNode::ColumnGroup { columns } => {
                output.push_str("<div class=\"center-grid\">\n");
                for column in columns {
                    output.push_str("<div class=\"minipage-col\">\n");
                    self.render_sequence(output, std::slice::from_ref(column), true);
                    output.push_str("</div>\n");
                }
                output.push_str("</div>\n");
            }
            ContentNode::Centered { body } => {
                output.push_str("<div class=\"center-text\">\n");
                self.render_sequence(output, body, true);
                output.push_str("</div>\n");
            }
            ContentNode::StyledSpan { style, child } => {
                let (open, close) = style_tags(*style);
                output.push_str(open);
                self.render_sequence(output, std::slice::from_ref(child.as_ref()), false);
                output.push_str(close);
            }
            ContentNode::Link { href, label } if !is_safe_href(href) => {
                log::debug!("link to {} rendered as text", href);
                self.render_sequence(output, std::slice::from_ref(label.as_ref()), false);
            }
            ContentNode::Link { href, label } => {
                output.push_str(&format!("<a href=\"{}\">", escape_html(href)));
                self.render_sequence(output, std::slice::from_ref(label.as_ref()), false);
                output.push_str("</a>");
            }
            ContentNode::Fragment { children } => self.render_sequence(output, children, false),
            ContentNode::LineBreak => output.push_str("<br/>"),
            ContentNode::Separator => output.push_str("<span class=\"pipe\">|</span>"),
            ContentNode::PlainText { value } => output.push_str(&escape_html(value)),
        }
    }

    /// Render a section body, keeping each entry together with the lists
    /// that follow it.
    fn render_section_body(&mut self, output: &mut String, body: &[ContentNode]) {
        let mut rest = body;
        while !rest.is_empty() {
            let start = rest
                .iter()
                .position(|node| matches!(node, ContentNode::Entry { .. }))
                .unwrap_or(rest.len());
            self.render_sequence(output, &rest[..start], true);
            rest = &rest[start..];
            if rest.is_empty() {
                break;
            }

            let len = 1 + rest[1..]
                .iter()
                .take_while(|node| matches!(node, ContentNode::ItemList { .. }))
                .count();
            let mut group = String::new();
            self.render_sequence(&mut group, &rest[..len], true);
            if !group.is_empty() {
                output.push_str("<div class=\"resume-group\">\n");
                output.push_str(&group);
                output.push_str("</div>\n");
            }
            rest = &rest[len..];
        }
    }

    fn render_header(&mut self, output: &mut String, name: &str, contacts: &[ContentNode]) {
        output.push_str("<header class=\"center-text\">\n");
        output.push_str(&format!(
            "<h1 class=\"name small-caps\">{}</h1>\n",
            escape_html(name)
        ));
        if !contacts.is_empty() {
            output.push_str("<div class=\"contacts\">");
            for (i, contact) in contacts.iter().enumerate() {
                if i > 0 {
                    output.push_str("<span class=\"pipe\">|</span>");
                }
                self.render_sequence(output, std::slice::from_ref(contact), false);
            }
            output.push_str("</div>\n");
        }
        output.push_str("</header>\n");
    }

    fn render_entry_row(
        &mut self,
        output: &mut String,
        class: &str,
        fields: [(&ContentNode, Option<&str>); 2],
        first_arg: usize,
    ) {
        output.push_str(&format!("<div class=\"{}\">", class));
        for (offset, (field, tag)) in fields.into_iter().enumerate() {
            output.push_str(&format!("<span class=\"entry-arg{}\">", first_arg + offset));
            if !field.is_empty() {
                if let Some(tag) = tag {
                    output.push_str(&format!("<{}>", tag));
                }
                self.render_sequence(output, std::slice::from_ref(field), false);
                if let Some(tag) = tag {
                    output.push_str(&format!("</{}>", tag));
                }
            }
            output.push_str("</span>");
        }
        output.push_str("</div>\n");
    }
}

fn flush_run(output: &mut String, run: &mut String, wrap: bool) {
    if wrap {
        let text = run.trim();
        if !text.is_empty() {
            output.push_str("<p>");
            output.push_str(text);
            output.push_str("</p>\n");
        }
    } else {
        output.push_str(run);
    }
    run.clear();
}

fn style_tags(style: SpanStyle) -> (&'static str, &'static str) {
    match style {
        SpanStyle::Bold => ("<strong>", "</strong>"),
        SpanStyle::Italic => ("<em>", "</em>"),
        SpanStyle::Underline => ("<u>", "</u>"),
        SpanStyle::SmallCaps => ("<span class=\"small-caps\">", "</span>"),
        SpanStyle::Accent => ("<span class=\"accent\">", "</span>"),
    }
}

/// Check whether a link target may become a live anchor.
///
/// Targets without a scheme are relative and allowed; otherwise only
/// `http`, `https`, `mailto` and `tel` pass. Whitespace and control
/// characters are ignored the way browsers ignore them in a scheme.
pub fn is_safe_href(href: &str) -> bool {
    let target: String = href
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();
    match target.find([':', '/', '?', '#']) {
        Some(end) if target[end..].starts_with(':') => {
            matches!(&target[..end], "http" | "https" | "mailto" | "tel")
        }
        _ => true,
    }
}

/// Escape text for HTML content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    result
}
