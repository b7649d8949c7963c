//! Structural transpiler: normalized markup to content tree.
//!
//! A recursive-descent walk over brace-balanced groups. Each construct is
//! recognized at the command that introduces it and consumes exactly its
//! own arguments or body, so nested and adjacent constructs never bleed
//! into each other. Anything that cannot be classified is recorded as a
//! warning; the walk itself never fails.

use super::builder::{tidy, TreeBuilder};
use super::commands::{
    color_style, escaped_symbol, ignored_arity, is_banner_size, is_list_environment, is_silent,
    is_size_declaration, is_structural, style_command, style_declaration, suppresses_bullets,
};
use super::normalize::{LINE_BREAK, SEPARATOR};
use super::options::{EntryPolicy, TranspileOptions};
use super::scanner::{split_items, Closing, Cursor, Delimiter, Skip};
use crate::model::{ContentNode, ContentTree, ConversionResult, SpanStyle};
use std::borrow::Cow;

const ITEM_LIST: Delimiter<'static> = Delimiter::Marker {
    open: "resumeItemListStart",
    close: "resumeItemListEnd",
};

/// Transpiler from normalized markup to a [`ConversionResult`].
#[derive(Debug, Clone, Default)]
pub struct Transpiler {
    options: TranspileOptions,
}

impl Transpiler {
    /// Create a new transpiler.
    pub fn new(options: TranspileOptions) -> Self {
        Self { options }
    }

    /// Get the transpile options.
    pub fn options(&self) -> &TranspileOptions {
        &self.options
    }

    /// Transpile normalized markup.
    ///
    /// Malformed markup degrades the tree and adds warnings; it never
    /// produces an error.
    pub fn transpile(&self, normalized: &str) -> ConversionResult {
        let mut walker = Walker {
            options: &self.options,
            warnings: Vec::new(),
        };
        let nodes = walker.sequence(normalized, 0);
        log::debug!(
            "transpiled {} top-level nodes with {} warnings",
            nodes.len(),
            walker.warnings.len()
        );
        ConversionResult::new(ContentTree::from(nodes), walker.warnings)
    }
}

/// State of one transpile call.
struct Walker<'o> {
    options: &'o TranspileOptions,
    warnings: Vec<String>,
}

impl Walker<'_> {
    fn warn(&mut self, message: String) {
        log::debug!("{}", message);
        self.warnings.push(message);
    }

    /// Transpile a fragment into a tidy node sequence.
    fn sequence(&mut self, src: &str, depth: usize) -> Vec<ContentNode> {
        if depth > self.options.max_depth {
            self.warn(format!(
                "nesting deeper than {} levels flattened to text",
                self.options.max_depth
            ));
            let text = flatten(src);
            return if text.is_empty() {
                Vec::new()
            } else {
                vec![ContentNode::text(text)]
            };
        }

        let mut builder = TreeBuilder::new();
        let mut cursor = Cursor::new(src);

        while let Some(c) = cursor.peek() {
            match c {
                '\\' => self.command(&mut cursor, &mut builder, depth),
                '{' => {
                    if let Some(inner) = self.arg(&mut cursor, Skip::Spaces) {
                        let nodes = self.sequence(inner, depth + 1);
                        builder.extend(nodes);
                    }
                }
                '}' => {
                    cursor.bump();
                    self.warn("unmatched closing brace dropped".to_string());
                }
                LINE_BREAK => {
                    cursor.bump();
                    builder.push(ContentNode::LineBreak);
                }
                SEPARATOR => {
                    cursor.bump();
                    builder.push(ContentNode::Separator);
                }
                '$' => {
                    cursor.bump();
                }
                _ => {
                    let text = cursor.take_while(|c| {
                        !matches!(c, '\\' | '{' | '}' | '$' | LINE_BREAK | SEPARATOR)
                    });
                    builder.push_text(&self.typeset(text));
                }
            }
        }

        builder.finish()
    }

    /// Handle the command at the cursor.
    fn command(&mut self, cursor: &mut Cursor<'_>, builder: &mut TreeBuilder, depth: usize) {
        let Some(cmd) = cursor.read_command() else {
            return;
        };
        let name = cmd.name;

        if name == "textbf" {
            self.bold_or_header(cursor, builder, depth);
        } else if let Some(style) = style_command(name) {
            match self.arg(cursor, Skip::Spaces) {
                Some(inner) => {
                    let child = ContentNode::collapse(self.sequence(inner, depth + 1));
                    if !child.is_empty() {
                        builder.push(ContentNode::styled(style, child));
                    }
                }
                None => self.warn(format!("\\{} without an argument", name)),
            }
        } else if let Some(style) = style_declaration(name) {
            self.declaration(style, cursor, builder, depth);
        } else {
            match name {
                "" => {}
                "section" => self.section(cursor, builder, depth),
                "href" => self.href(cursor, builder, depth),
                "url" => match self.arg(cursor, Skip::Spaces) {
                    Some(target) => {
                        let href = unescape_url(target);
                        builder.push(ContentNode::link(href.clone(), ContentNode::text(href)));
                    }
                    None => self.warn("\\url without a target".to_string()),
                },
                "color" => match self.arg(cursor, Skip::Spaces).map(color_style) {
                    Some(Some(style)) => self.declaration(style, cursor, builder, depth),
                    Some(None) => {}
                    None => self.warn("\\color without a color".to_string()),
                },
                "resumeSubheading" => self.entry(cursor, builder, depth),
                "resumeItemListStart" => {
                    let node = self.marker_list(cursor, depth);
                    builder.push(node);
                }
                "resumeItem" => self.stray_items(cursor, builder, depth),
                "resumeSubHeadingListStart" | "resumeSubHeadingListEnd" => {}
                "resumeItemListEnd" => self.warn("unmatched \\resumeItemListEnd".to_string()),
                "item" => {
                    cursor.read_optional();
                    self.warn("\\item outside a list".to_string());
                }
                "begin" => self.environment(cursor, builder, depth),
                "end" => {
                    let env = cursor.read_arg(Skip::Spaces).map_or("", |g| g.inner.trim());
                    self.warn(format!("unmatched \\end{{{}}}", env));
                }
                _ => self.residual(name, cursor, builder, depth),
            }
        }
    }

    /// Presentational, symbol and unknown commands.
    fn residual(
        &mut self,
        name: &str,
        cursor: &mut Cursor<'_>,
        builder: &mut TreeBuilder,
        depth: usize,
    ) {
        if is_silent(name) {
            return;
        }
        if let Some(arity) = ignored_arity(name) {
            for _ in 0..arity {
                cursor.read_optional();
                if cursor.read_arg(Skip::Spaces).is_none() {
                    break;
                }
            }
            return;
        }
        if let Some(symbol) = escaped_symbol(name) {
            builder.push_text(symbol);
            return;
        }

        cursor.read_optional();
        match self.arg(cursor, Skip::Spaces) {
            Some(inner) if self.options.unwrap_unknown => {
                self.warn(format!("unknown command \\{}: argument kept as text", name));
                let nodes = self.sequence(inner, depth + 1);
                builder.extend(nodes);
            }
            Some(_) => self.warn(format!("unknown command \\{}: argument dropped", name)),
            None => log::trace!("dropped bare command \\{}", name),
        }
    }

    /// Read a brace argument, warning when it runs off the end of input.
    fn arg<'a>(&mut self, cursor: &mut Cursor<'a>, skip: Skip) -> Option<&'a str> {
        let group = cursor.read_arg(skip)?;
        if !group.closed {
            self.warn("unterminated group runs to end of input".to_string());
        }
        Some(group.inner)
    }

    fn bold_or_header(&mut self, cursor: &mut Cursor<'_>, builder: &mut TreeBuilder, depth: usize) {
        let Some(inner) = self.arg(cursor, Skip::Spaces) else {
            self.warn("\\textbf without an argument".to_string());
            return;
        };

        if let Some(name) = self.banner_name(inner, depth) {
            let header = self.header(name, cursor, depth);
            builder.push(header);
            return;
        }

        let child = ContentNode::collapse(self.sequence(inner, depth + 1));
        if !child.is_empty() {
            builder.push(ContentNode::styled(SpanStyle::Bold, child));
        }
    }

    /// Name text when a bold argument opens with a banner size and
    /// `\scshape`, in any order.
    fn banner_name(&mut self, inner: &str, depth: usize) -> Option<String> {
        let mut cursor = Cursor::new(inner);
        let (mut sized, mut caps) = (false, false);
        loop {
            cursor.skip(Skip::Whitespace);
            match cursor.peek_command() {
                Some(cmd) if is_banner_size(cmd.name) => sized = true,
                Some(cmd) if cmd.name == "scshape" => caps = true,
                Some(cmd)
                    if is_size_declaration(cmd.name) || style_declaration(cmd.name).is_some() => {}
                _ => break,
            }
            cursor.read_command();
        }
        if !(sized && caps) {
            return None;
        }

        let nodes = self.sequence(cursor.rest(), depth + 1);
        Some(ContentNode::collapse(nodes).plain_text().trim().to_string())
    }

    /// Build a header from its name and the contact lines after it.
    fn header(&mut self, name: String, cursor: &mut Cursor<'_>, depth: usize) -> ContentNode {
        let start = cursor.pos();
        let mut probe = *cursor;
        let end = loop {
            match probe.next_command_at_level() {
                Some(cmd) if is_structural(cmd.name) => break cmd.start,
                Some(_) => {}
                None => break cursor.src().len(),
            }
        };
        cursor.set_pos(end);

        let nodes = self.sequence(&cursor.src()[start..end], depth + 1);
        let (contact_lines, contacts) = split_contacts(nodes);
        ContentNode::Header {
            name,
            contact_lines,
            contacts,
        }
    }

    fn declaration(
        &mut self,
        style: SpanStyle,
        cursor: &mut Cursor<'_>,
        builder: &mut TreeBuilder,
        depth: usize,
    ) {
        if depth == 0 {
            return;
        }
        let rest = cursor.rest();
        cursor.set_pos(cursor.src().len());

        let nodes = self.sequence(rest, depth + 1);
        if nodes.iter().all(ContentNode::is_inline) {
            let child = ContentNode::collapse(nodes);
            if !child.is_empty() {
                builder.push(ContentNode::styled(style, child));
            }
        } else {
            builder.extend(nodes);
        }
    }

    fn section(&mut self, cursor: &mut Cursor<'_>, builder: &mut TreeBuilder, depth: usize) {
        let title = match self.arg(cursor, Skip::Spaces) {
            Some(inner) => {
                let nodes = self.sequence(inner, depth + 1);
                ContentNode::collapse(nodes).plain_text().trim().to_string()
            }
            None => {
                self.warn("\\section without a title".to_string());
                String::new()
            }
        };
        builder.open_section(title);
    }

    fn href(&mut self, cursor: &mut Cursor<'_>, builder: &mut TreeBuilder, depth: usize) {
        let Some(target) = self.arg(cursor, Skip::Spaces) else {
            self.warn("\\href without a target".to_string());
            return;
        };
        let href = unescape_url(target);
        let label = match self.arg(cursor, Skip::Spaces) {
            Some(inner) => ContentNode::collapse(self.sequence(inner, depth + 1)),
            None => {
                self.warn(format!("\\href{{{}}} without a label: target used as label", href));
                ContentNode::text(href.clone())
            }
        };
        builder.push(ContentNode::link(href, label));
    }

    fn entry(&mut self, cursor: &mut Cursor<'_>, builder: &mut TreeBuilder, depth: usize) {
        let mut fields = Vec::with_capacity(4);
        while fields.len() < 4 {
            let Some(inner) = self.arg(cursor, Skip::Whitespace) else {
                break;
            };
            fields.push(ContentNode::collapse(self.sequence(inner, depth + 1)));
        }

        if fields.len() < 4 {
            self.warn(format!(
                "\\resumeSubheading expects 4 arguments, found {}",
                fields.len()
            ));
            if self.options.malformed_entries == EntryPolicy::Drop {
                return;
            }
            fields.resize(4, ContentNode::empty());
        }

        let mut fields = fields.into_iter();
        let mut next = || fields.next().unwrap_or_else(ContentNode::empty);
        let (primary, secondary, tertiary, quaternary) = (next(), next(), next(), next());
        builder.push(ContentNode::entry(primary, secondary, tertiary, quaternary));
    }

    /// `\resumeItemListStart … \resumeItemListEnd`, opening marker consumed.
    fn marker_list(&mut self, cursor: &mut Cursor<'_>, depth: usize) -> ContentNode {
        let body = self.body(cursor, ITEM_LIST, "\\resumeItemListStart");
        self.list(body, true, depth)
    }

    /// A run of `\resumeItem{..}` outside any list.
    fn stray_items(&mut self, cursor: &mut Cursor<'_>, builder: &mut TreeBuilder, depth: usize) {
        let mut items = Vec::new();
        loop {
            match self.arg(cursor, Skip::Whitespace) {
                Some(inner) => {
                    items.push(ContentNode::collapse(self.sequence(inner, depth + 1)));
                }
                None => self.warn("\\resumeItem without an argument".to_string()),
            }

            let mut probe = *cursor;
            probe.skip(Skip::Whitespace);
            match probe.read_command() {
                Some(cmd) if cmd.name == "resumeItem" => *cursor = probe,
                _ => break,
            }
        }

        if !items.is_empty() {
            builder.push(ContentNode::ItemList {
                bulleted: true,
                items,
            });
        }
    }

    /// Body of a delimited construct whose opening was consumed.
    ///
    /// An unterminated body runs to the end of input with a warning.
    fn body<'a>(&mut self, cursor: &mut Cursor<'a>, delimiter: Delimiter<'_>, what: &str) -> &'a str {
        let start = cursor.pos();
        match cursor.find_closing(delimiter) {
            Some(Closing { body_end, resume }) => {
                cursor.set_pos(resume);
                &cursor.src()[start..body_end]
            }
            None => {
                self.warn(format!("unterminated {} runs to end of input", what));
                cursor.set_pos(cursor.src().len());
                &cursor.src()[start..]
            }
        }
    }

    fn list(&mut self, body: &str, bulleted: bool, depth: usize) -> ContentNode {
        let split = split_items(body);
        let mut items = Vec::with_capacity(split.items.len() + 1);

        let lead = self.sequence(split.lead, depth + 1);
        if !lead.is_empty() {
            self.warn("content before the first list item kept as an item".to_string());
            items.push(ContentNode::collapse(lead));
        }
        for item in split.items {
            items.push(ContentNode::collapse(self.sequence(item, depth + 1)));
        }

        ContentNode::ItemList { bulleted, items }
    }

    /// `\begin{name} … \end{name}`, `\begin` consumed.
    fn environment(&mut self, cursor: &mut Cursor<'_>, builder: &mut TreeBuilder, depth: usize) {
        let Some(group) = cursor.read_arg(Skip::Spaces) else {
            self.warn("\\begin without an environment name".to_string());
            return;
        };
        let name = group.inner.trim();
        let what = format!("\\begin{{{}}}", name);

        match name {
            "center" => {
                let body = self.body(cursor, Delimiter::Environment(name), &what);
                self.center(body, builder, depth);
            }
            "minipage" => {
                let mut columns = vec![self.minipage(cursor, depth)];
                loop {
                    let mut probe = *cursor;
                    skip_column_spacing(&mut probe);
                    if !opens_environment(&mut probe, "minipage") {
                        break;
                    }
                    columns.push(self.minipage(&mut probe, depth));
                    *cursor = probe;
                }
                builder.push(ContentNode::ColumnGroup { columns });
            }
            name if is_list_environment(name) => {
                let bulleted = !cursor.read_optional().is_some_and(suppresses_bullets);
                let body = self.body(cursor, Delimiter::Environment(name), &what);
                let node = self.list(body, bulleted, depth);
                builder.push(node);
            }
            "document" => {
                let body = self.body(cursor, Delimiter::Environment(name), &what);
                let nodes = self.sequence(body, depth + 1);
                builder.extend(nodes);
            }
            _ => {
                cursor.read_optional();
                let body = self.body(cursor, Delimiter::Environment(name), &what);
                self.warn(format!("unknown environment {}: content kept", name));
                let nodes = self.sequence(body, depth + 1);
                builder.extend(nodes);
            }
        }
    }

    /// Center body: columns when it holds a minipage, centered text
    /// otherwise. A header inside is emitted on its own.
    fn center(&mut self, body: &str, builder: &mut TreeBuilder, depth: usize) {
        if contains_environment(body, "minipage") {
            let columns = self.columns(body, depth);
            builder.push(ContentNode::ColumnGroup { columns });
            return;
        }

        let mut run = Vec::new();
        for node in self.sequence(body, depth + 1) {
            if matches!(node, ContentNode::Header { .. }) {
                push_centered(builder, std::mem::take(&mut run));
                builder.push(node);
            } else {
                run.push(node);
            }
        }
        push_centered(builder, run);
    }

    /// Split a body holding minipages into columns.
    fn columns(&mut self, body: &str, depth: usize) -> Vec<ContentNode> {
        let mut cursor = Cursor::new(body);
        let mut columns = Vec::new();
        let mut stray = 0;

        loop {
            let mut probe = cursor;
            let Some(cmd) = probe.next_command_at_level() else {
                break;
            };
            if cmd.name == "begin" {
                match probe.read_arg(Skip::Spaces) {
                    Some(env) if env.inner.trim() == "minipage" => {
                        self.stray_column(&body[stray..cmd.start], depth, &mut columns);
                        let column = self.minipage(&mut probe, depth);
                        columns.push(column);
                        stray = probe.pos();
                    }
                    Some(env) => {
                        if let Some(closing) =
                            probe.find_closing(Delimiter::Environment(env.inner.trim()))
                        {
                            probe.set_pos(closing.resume);
                        }
                    }
                    None => {}
                }
            }
            cursor = probe;
        }

        self.stray_column(&body[stray..], depth, &mut columns);
        columns
    }

    fn stray_column(&mut self, text: &str, depth: usize, columns: &mut Vec<ContentNode>) {
        let nodes = self.sequence(text, depth + 1);
        if !nodes.is_empty() {
            columns.push(ContentNode::collapse(nodes));
        }
    }

    /// One minipage column, `\begin{minipage}` consumed. The position and
    /// width arguments are discarded.
    fn minipage(&mut self, cursor: &mut Cursor<'_>, depth: usize) -> ContentNode {
        cursor.read_optional();
        cursor.read_arg(Skip::Spaces);
        let body = self.body(
            cursor,
            Delimiter::Environment("minipage"),
            "\\begin{minipage}",
        );
        ContentNode::collapse(self.sequence(body, depth + 1))
    }

    fn typeset<'t>(&self, text: &'t str) -> Cow<'t, str> {
        if !self.options.typography || !text.contains(|c| matches!(c, '-' | '~' | '`' | '\'')) {
            return Cow::Borrowed(text);
        }
        Cow::Owned(
            text.replace("---", "\u{2014}")
                .replace("--", "\u{2014}")
                .replace('~', "\u{a0}")
                .replace("``", "\u{201c}")
                .replace("''", "\u{201d}"),
        )
    }
}

fn push_centered(builder: &mut TreeBuilder, run: Vec<ContentNode>) {
    let body = tidy(run);
    if !body.is_empty() {
        builder.push(ContentNode::Centered { body });
    }
}

/// Split header contact content on line breaks and separators.
fn split_contacts(nodes: Vec<ContentNode>) -> (Vec<String>, Vec<ContentNode>) {
    let mut lines = Vec::new();
    let mut contacts = Vec::new();
    let mut segment = Vec::new();

    let mut flush = |segment: &mut Vec<ContentNode>| {
        let contact = ContentNode::collapse(tidy(std::mem::take(segment)));
        let line = contact.plain_text().trim().to_string();
        if !line.is_empty() {
            lines.push(line);
            contacts.push(contact);
        }
    };

    for node in nodes {
        match node {
            ContentNode::LineBreak | ContentNode::Separator => flush(&mut segment),
            node => segment.push(node),
        }
    }
    flush(&mut segment);

    (lines, contacts)
}

/// Skip `\hfill`, `\hspace{..}` and whitespace between columns.
fn skip_column_spacing(cursor: &mut Cursor<'_>) {
    loop {
        cursor.skip(Skip::Whitespace);
        match cursor.peek_command() {
            Some(cmd) if cmd.name == "hfill" => {
                cursor.read_command();
            }
            Some(cmd) if cmd.name == "hspace" => {
                cursor.read_command();
                cursor.read_arg(Skip::Spaces);
            }
            _ => return,
        }
    }
}

/// Consume `\begin{env}` when it is next at the cursor.
fn opens_environment(cursor: &mut Cursor<'_>, env: &str) -> bool {
    let mut probe = *cursor;
    let opens = probe.read_command().is_some_and(|cmd| cmd.name == "begin")
        && probe
            .read_arg(Skip::Spaces)
            .is_some_and(|group| group.inner.trim() == env);
    if opens {
        *cursor = probe;
    }
    opens
}

/// Check whether `\begin{env}` occurs at the top level of `src`, outside
/// other environments.
fn contains_environment(src: &str, env: &str) -> bool {
    let mut cursor = Cursor::new(src);
    while let Some(cmd) = cursor.next_command_at_level() {
        if cmd.name != "begin" {
            continue;
        }
        let Some(group) = cursor.read_arg(Skip::Spaces) else {
            continue;
        };
        let name = group.inner.trim();
        if name == env {
            return true;
        }
        if let Some(closing) = cursor.find_closing(Delimiter::Environment(name)) {
            cursor.set_pos(closing.resume);
        }
    }
    false
}

/// Resolve escaped punctuation in a link target.
fn unescape_url(target: &str) -> String {
    let mut out = String::with_capacity(target.len());
    let mut chars = target.trim().chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next) = chars.peek() {
                if next.is_ascii_punctuation() {
                    out.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}

/// Reduce markup to its visible text.
fn flatten(src: &str) -> String {
    let mut out = String::with_capacity(src.len());
    let mut cursor = Cursor::new(src);
    while let Some(c) = cursor.peek() {
        match c {
            '\\' => {
                if let Some(symbol) = cursor.read_command().and_then(|cmd| escaped_symbol(cmd.name)) {
                    out.push_str(symbol);
                }
            }
            LINE_BREAK => {
                cursor.bump();
                out.push(' ');
            }
            SEPARATOR => {
                cursor.bump();
                out.push_str(" | ");
            }
            '{' | '}' | '$' => {
                cursor.bump();
            }
            _ => {
                cursor.bump();
                out.push(c);
            }
        }
    }
    out.split_ascii_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeKind;
    use crate::parser::Normalizer;
    use pretty_assertions::assert_eq;

    fn run(markup: &str) -> ConversionResult {
        let normalized = Normalizer::default().normalize(markup);
        Transpiler::default().transpile(&normalized)
    }

    fn run_with(markup: &str, options: TranspileOptions) -> ConversionResult {
        let normalized = Normalizer::default().normalize(markup);
        Transpiler::new(options).transpile(&normalized)
    }

    // ========================================================================
    // Residual cleanup
    // ========================================================================

    #[test]
    fn test_empty_input() {
        let result = run("");
        assert!(result.tree.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_unknown_command_unwrapped() {
        let result = run(r"\foo{bar}");
        assert_eq!(result.tree.nodes, vec![ContentNode::text("bar")]);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("\\foo"));
    }

    #[test]
    fn test_unknown_command_dropped_when_not_unwrapping() {
        let result = run_with(r"\foo{bar}", TranspileOptions::new().with_unwrap_unknown(false));
        assert!(result.tree.is_empty());
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_bare_unknown_command_dropped_silently() {
        let result = run(r"\foo");
        assert!(result.tree.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_presentational_commands_consumed() {
        let result = run(r"\vspace{-4pt}\setlength{\tabcolsep}{0in}\small Text\hfill");
        assert_eq!(result.tree.nodes, vec![ContentNode::text("Text")]);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_escaped_symbols() {
        let result = run(r"R\&D 100\% \$5 \#1 a\_b");
        assert_eq!(result.tree.nodes, vec![ContentNode::text("R&D 100% $5 #1 a_b")]);
    }

    #[test]
    fn test_unmatched_braces_warn() {
        let result = run("a } b");
        assert_eq!(result.tree.nodes, vec![ContentNode::text("a b")]);
        assert_eq!(result.warnings.len(), 1);

        let result = run(r"\textbf{open");
        assert_eq!(result.tree.nodes, vec![ContentNode::bold("open")]);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_typography() {
        let result = run("2019 -- 2021 ``quoted'' a~b");
        assert_eq!(
            result.tree.nodes,
            vec![ContentNode::text(
                "2019 \u{2014} 2021 \u{201c}quoted\u{201d} a\u{a0}b"
            )]
        );

        let result = run_with("a -- b", TranspileOptions::new().with_typography(false));
        assert_eq!(result.tree.nodes, vec![ContentNode::text("a -- b")]);
    }

    #[test]
    fn test_depth_guard_flattens() {
        let markup = format!("{}deep{}", "{".repeat(10), "}".repeat(10));
        let result = run_with(&markup, TranspileOptions::new().with_max_depth(3));
        assert_eq!(result.tree.nodes, vec![ContentNode::text("deep")]);
        assert_eq!(result.warnings.len(), 1);
    }

    // ========================================================================
    // Styling and links
    // ========================================================================

    #[test]
    fn test_nested_styling() {
        let result = run(r"\textbf{Bold \textit{both}} after");
        assert_eq!(
            result.tree.nodes,
            vec![
                ContentNode::styled(
                    SpanStyle::Bold,
                    ContentNode::Fragment {
                        children: vec![ContentNode::text("Bold "), ContentNode::italic("both")],
                    },
                ),
                ContentNode::text(" after"),
            ]
        );
    }

    #[test]
    fn test_declaration_styles_rest_of_group() {
        let result = run(r"{\bfseries strong} plain \itshape ignored");
        assert_eq!(
            result.tree.nodes,
            vec![
                ContentNode::bold("strong"),
                ContentNode::text(" plain ignored"),
            ]
        );
    }

    #[test]
    fn test_link_color_becomes_accent() {
        let result = run(r"{\color{linkblue} site} now");
        assert_eq!(
            result.tree.nodes,
            vec![
                ContentNode::styled(SpanStyle::Accent, ContentNode::text("site")),
                ContentNode::text(" now"),
            ]
        );
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_other_colors_dropped() {
        let result = run(r"{\color{red} x} \color{linkblue}y");
        assert_eq!(result.tree.nodes, vec![ContentNode::text("x y")]);
        assert!(result.warnings.is_empty());

        let result = run(r"{\color}");
        assert!(result.tree.is_empty());
        assert_eq!(result.warnings, vec!["\\color without a color".to_string()]);
    }

    #[test]
    fn test_links() {
        let result = run(r"\href{https://example.com/a\_b}{\underline{site}} \url{https://x.dev}");
        assert_eq!(
            result.tree.nodes,
            vec![
                ContentNode::link(
                    "https://example.com/a_b",
                    ContentNode::styled(SpanStyle::Underline, ContentNode::text("site")),
                ),
                ContentNode::text(" "),
                ContentNode::link("https://x.dev", ContentNode::text("https://x.dev")),
            ]
        );
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_href_without_label() {
        let result = run(r"\href{https://example.com}");
        assert_eq!(
            result.tree.nodes,
            vec![ContentNode::link(
                "https://example.com",
                ContentNode::text("https://example.com")
            )]
        );
        assert_eq!(result.warnings.len(), 1);
    }

    // ========================================================================
    // Header and center blocks
    // ========================================================================

    #[test]
    fn test_header_with_contacts() {
        let markup = r"\begin{center}
    \textbf{\Huge \scshape Jake Ryan} \\ \vspace{1pt}
    \small 123-456-7890 $|$ \href{mailto:jake@su.edu}{\underline{jake@su.edu}} $|$
    \href{https://github.com/jake}{\underline{github.com/jake}}
\end{center}";
        let result = run(markup);
        assert!(result.warnings.is_empty(), "{:?}", result.warnings);
        assert_eq!(result.tree.len(), 1);

        let ContentNode::Header {
            name,
            contact_lines,
            contacts,
        } = &result.tree.nodes[0]
        else {
            panic!("expected header, got {:?}", result.tree.nodes[0]);
        };
        assert_eq!(name, "Jake Ryan");
        assert_eq!(
            contact_lines,
            &vec![
                "123-456-7890".to_string(),
                "jake@su.edu".to_string(),
                "github.com/jake".to_string(),
            ]
        );
        assert_eq!(contacts[1].kind(), NodeKind::Link);
    }

    #[test]
    fn test_header_stops_at_section() {
        let result = run(r"\textbf{\LARGE \scshape Ann Lee} \\ Berlin \section{Skills} Rust");
        assert_eq!(result.tree.len(), 2);
        assert_eq!(
            result.tree.nodes[0],
            ContentNode::Header {
                name: "Ann Lee".to_string(),
                contact_lines: vec!["Berlin".to_string()],
                contacts: vec![ContentNode::text("Berlin")],
            }
        );
        assert_eq!(result.tree.section_titles(), vec!["Skills"]);
    }

    #[test]
    fn test_bold_without_banner_is_span() {
        let result = run(r"\textbf{\scshape Name}");
        assert_eq!(
            result.tree.nodes,
            vec![ContentNode::styled(
                SpanStyle::Bold,
                ContentNode::styled(SpanStyle::SmallCaps, ContentNode::text("Name")),
            )]
        );
    }

    #[test]
    fn test_center_disambiguation() {
        let with_columns = run(r"\begin{center}\begin{minipage}{0.5\textwidth}A\end{minipage}\end{center}");
        assert_eq!(
            with_columns.tree.nodes,
            vec![ContentNode::ColumnGroup {
                columns: vec![ContentNode::text("A")],
            }]
        );

        let without = run(r"\begin{center}A\end{center}");
        assert_eq!(
            without.tree.nodes,
            vec![ContentNode::Centered {
                body: vec![ContentNode::text("A")],
            }]
        );
    }

    #[test]
    fn test_columns_drop_spacing_and_keep_stray_content() {
        let markup = r"\begin{center}
\begin{minipage}[t]{0.45\textwidth} Left \end{minipage} \hfill
Middle
\begin{minipage}[t]{0.45\textwidth} Right \end{minipage}
\end{center}";
        let result = run(markup);
        assert_eq!(
            result.tree.nodes,
            vec![ContentNode::ColumnGroup {
                columns: vec![
                    ContentNode::text("Left"),
                    ContentNode::text("Middle"),
                    ContentNode::text("Right"),
                ],
            }]
        );
    }

    #[test]
    fn test_adjacent_minipages_outside_center() {
        let markup = r"\begin{minipage}{0.5\textwidth}A\end{minipage}\hfill\hspace{1em}
\begin{minipage}{0.5\textwidth}B\end{minipage} tail";
        let result = run(markup);
        assert_eq!(
            result.tree.nodes,
            vec![
                ContentNode::ColumnGroup {
                    columns: vec![ContentNode::text("A"), ContentNode::text("B")],
                },
                ContentNode::text("tail"),
            ]
        );
    }

    // ========================================================================
    // Sections, entries and lists
    // ========================================================================

    #[test]
    fn test_empty_section_kept() {
        let result = run(r"\section{Education}\section*{Experience} Work");
        assert_eq!(
            result.tree.nodes,
            vec![
                ContentNode::Section {
                    title: "Education".to_string(),
                    body: vec![],
                },
                ContentNode::Section {
                    title: "Experience".to_string(),
                    body: vec![ContentNode::text("Work")],
                },
            ]
        );
    }

    #[test]
    fn test_entry_with_nested_bold() {
        let result = run(
            r"\resumeSubheading
      {Acme Corp}{Remote}
      {\textbf{Staff Engineer}}{2020 -- 2023}",
        );
        assert_eq!(
            result.tree.nodes,
            vec![ContentNode::entry(
                ContentNode::text("Acme Corp"),
                ContentNode::text("Remote"),
                ContentNode::bold("Staff Engineer"),
                ContentNode::text("2020 \u{2014} 2023"),
            )]
        );
    }

    #[test]
    fn test_malformed_entry_degrades() {
        let result = run(r"\resumeSubheading{Globex}{Springfield}");
        assert_eq!(
            result.tree.nodes,
            vec![ContentNode::entry(
                ContentNode::text("Globex"),
                ContentNode::text("Springfield"),
                ContentNode::empty(),
                ContentNode::empty(),
            )]
        );
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_malformed_entry_dropped_when_strict() {
        let result = run_with(r"\resumeSubheading{Globex}{Springfield}", TranspileOptions::new().strict());
        assert!(result.tree.is_empty());
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_itemize_without_bullets() {
        let result = run(r"\begin{itemize}[leftmargin=0.15in, label={}]
\item \textbf{Languages}{: Rust, Go}
\end{itemize}");
        assert_eq!(
            result.tree.nodes,
            vec![ContentNode::ItemList {
                bulleted: false,
                items: vec![ContentNode::Fragment {
                    children: vec![ContentNode::bold("Languages"), ContentNode::text(": Rust, Go")],
                }],
            }]
        );
    }

    #[test]
    fn test_adjacent_lists_keep_their_items() {
        let markup = r"\resumeItemListStart
  \resumeItem{One}
  \resumeItem{Two}
\resumeItemListEnd
\begin{itemize}
  \item Three
\end{itemize}";
        let result = run(markup);
        assert_eq!(
            result.tree.nodes,
            vec![
                ContentNode::ItemList {
                    bulleted: true,
                    items: vec![ContentNode::text("One"), ContentNode::text("Two")],
                },
                ContentNode::ItemList {
                    bulleted: true,
                    items: vec![ContentNode::text("Three")],
                },
            ]
        );
    }

    #[test]
    fn test_nested_list_stays_in_its_item() {
        let markup = r"\begin{itemize}
\item Outer
  \begin{itemize}\item Inner\end{itemize}
\item Last
\end{itemize}";
        let result = run(markup);
        let ContentNode::ItemList { items, .. } = &result.tree.nodes[0] else {
            panic!("expected list");
        };
        assert_eq!(items.len(), 2);
        assert_eq!(
            items[0],
            ContentNode::Fragment {
                children: vec![
                    ContentNode::text("Outer"),
                    ContentNode::ItemList {
                        bulleted: true,
                        items: vec![ContentNode::text("Inner")],
                    },
                ],
            }
        );
    }

    #[test]
    fn test_unterminated_list_warns() {
        let result = run(r"\resumeItemListStart \resumeItem{Only}");
        assert_eq!(
            result.tree.nodes,
            vec![ContentNode::ItemList {
                bulleted: true,
                items: vec![ContentNode::text("Only")],
            }]
        );
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_stray_resume_items_form_one_list() {
        let result = run(r"\resumeItem{A} \resumeItem{B} after");
        assert_eq!(
            result.tree.nodes,
            vec![
                ContentNode::ItemList {
                    bulleted: true,
                    items: vec![ContentNode::text("A"), ContentNode::text("B")],
                },
                ContentNode::text("after"),
            ]
        );
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_subheading_list_markers_transparent() {
        let result = run(r"\resumeSubHeadingListStart \resumeSubheading{a}{b}{c}{d} \resumeSubHeadingListEnd");
        assert_eq!(result.tree.count(NodeKind::Entry), 1);
        assert_eq!(result.tree.len(), 1);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_unknown_environment_keeps_content() {
        let result = run(r"\begin{quote}Kept\end{quote}");
        assert_eq!(result.tree.nodes, vec![ContentNode::text("Kept")]);
        assert_eq!(result.warnings.len(), 1);
    }
}
