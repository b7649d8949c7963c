//! # rezume
//!
//! Resume markup transpiler for Rust.
//!
//! This library reads LaTeX-like resume markup (the `\resumeSubheading` /
//! `\resumeItem` family of templates), turns it into a semantic content
//! tree and renders that tree as print-ready HTML, Markdown, plain text or
//! JSON.
//!
//! ## Quick Start
//!
//! ```
//! use rezume::{render, transpile};
//!
//! fn main() -> rezume::Result<()> {
//!     let result = transpile(r"\section{Skills} \textbf{Rust:} parsers, CLIs");
//!     assert!(result.warnings.is_empty());
//!
//!     let options = render::RenderOptions::default();
//!     let html = render::to_html(&result.tree, &options)?;
//!     assert!(html.contains("<h2 class=\"section-title\">Skills</h2>"));
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Never fails on markup**: malformed input degrades and is reported as warnings
//! - **Brace-aware scanning**: nested groups inside arguments survive intact
//! - **Multiple output formats**: HTML with a print stylesheet, Markdown, text, JSON
//! - **Visitors**: skip or replace nodes while rendering

pub mod convert;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use convert::{ConvertOptions, ConvertResult, OutputFormat};
pub use error::{Error, Result};
pub use model::{ContentNode, ContentTree, ConversionResult, NodeKind, SpanStyle};
pub use parser::{EntryPolicy, NormalizeOptions, Normalizer, TranspileOptions, Transpiler};
pub use render::{JsonFormat, PageSize, RenderOptions, Stylesheet};

use render::SkipSectionsVisitor;
use std::io::Read;
use std::path::Path;

/// Normalize markup with default options.
///
/// Strips comments and document scaffolding and resolves the line-break
/// and separator idioms to marker characters.
///
/// # Example
///
/// ```
/// use rezume::{normalize, LINE_BREAK};
///
/// let text = normalize("Jane \\\\ Doe % note");
/// assert_eq!(text, format!("Jane {} Doe ", LINE_BREAK));
/// ```
pub fn normalize(markup: &str) -> String {
    Normalizer::default().normalize(markup)
}

pub use parser::{LINE_BREAK, SEPARATOR};

/// Normalize and transpile markup with default options.
///
/// # Example
///
/// ```
/// use rezume::{transpile, NodeKind};
///
/// let result = transpile(r"\section{Education}\section{Skills}");
/// assert_eq!(result.tree.count(NodeKind::Section), 2);
/// ```
pub fn transpile(markup: &str) -> ConversionResult {
    transpile_with_options(markup, &TranspileOptions::default())
}

/// Normalize and transpile markup with custom options.
///
/// # Example
///
/// ```
/// use rezume::{transpile_with_options, TranspileOptions};
///
/// let options = TranspileOptions::new().strict();
/// let result = transpile_with_options(r"\resumeSubheading{Acme}{Remote}", &options);
/// assert!(result.tree.is_empty());
/// assert_eq!(result.warnings.len(), 1);
/// ```
pub fn transpile_with_options(markup: &str, options: &TranspileOptions) -> ConversionResult {
    parser::parse(markup, options)
}

/// Read and transpile a markup file.
///
/// # Example
///
/// ```no_run
/// use rezume::parse_file;
///
/// let result = parse_file("resume.tex").unwrap();
/// println!("Sections: {:?}", result.tree.section_titles());
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<ConversionResult> {
    parse_file_with_options(path, &TranspileOptions::default())
}

/// Read and transpile a markup file with custom options.
pub fn parse_file_with_options<P: AsRef<Path>>(
    path: P,
    options: &TranspileOptions,
) -> Result<ConversionResult> {
    let markup = std::fs::read_to_string(path)?;
    Ok(transpile_with_options(&markup, options))
}

/// Read and transpile markup from a reader.
///
/// The input must be UTF-8.
///
/// # Example
///
/// ```no_run
/// use rezume::parse_reader;
/// use std::fs::File;
///
/// let file = File::open("resume.tex").unwrap();
/// let result = parse_reader(file).unwrap();
/// ```
pub fn parse_reader<R: Read>(mut reader: R) -> Result<ConversionResult> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    let markup = String::from_utf8(bytes)?;
    Ok(transpile(&markup))
}

/// Convert markup to a standalone HTML document.
///
/// # Example
///
/// ```
/// let html = rezume::to_html(r"\section{Skills} Rust").unwrap();
/// assert!(html.starts_with("<!DOCTYPE html>"));
/// ```
pub fn to_html(markup: &str) -> Result<String> {
    let result = transpile(markup);
    render::to_html(&result.tree, &RenderOptions::default())
}

/// Convert markup to Markdown.
///
/// # Example
///
/// ```
/// let markdown = rezume::to_markdown(r"\section{Skills} \textit{Rust}").unwrap();
/// assert_eq!(markdown, "## Skills\n\n*Rust*");
/// ```
pub fn to_markdown(markup: &str) -> Result<String> {
    let result = transpile(markup);
    render::to_markdown(&result.tree, &RenderOptions::default())
}

/// Convert markup to plain text.
pub fn to_text(markup: &str) -> Result<String> {
    let result = transpile(markup);
    render::to_text(&result.tree)
}

/// Convert markup to JSON (tree and warnings).
///
/// # Example
///
/// ```
/// use rezume::JsonFormat;
///
/// let json = rezume::to_json(r"\section{Skills}", JsonFormat::Compact).unwrap();
/// assert_eq!(json, r#"{"tree":[{"type":"section","title":"Skills","body":[]}],"warnings":[]}"#);
/// ```
pub fn to_json(markup: &str, format: JsonFormat) -> Result<String> {
    let result = transpile(markup);
    render::to_json(&result, format)
}

/// Builder for transpiling and rendering resumes.
///
/// # Example
///
/// ```
/// use rezume::{PageSize, Rezume};
///
/// let html = Rezume::new()
///     .with_page_size(PageSize::A4)
///     .skip_section("References")
///     .transpile(r"\section{Skills} Rust \section{References} On request")
///     .to_html()?;
/// assert!(html.contains("size: A4"));
/// assert!(!html.contains("On request"));
/// # Ok::<(), rezume::Error>(())
/// ```
pub struct Rezume {
    transpile_options: TranspileOptions,
    render_options: RenderOptions,
    skip_sections: Vec<String>,
}

impl Rezume {
    /// Create a new Rezume builder.
    pub fn new() -> Self {
        Self {
            transpile_options: TranspileOptions::default(),
            render_options: RenderOptions::default(),
            skip_sections: Vec::new(),
        }
    }

    /// Drop malformed entries instead of padding them.
    pub fn strict(mut self) -> Self {
        self.transpile_options = self.transpile_options.strict();
        self
    }

    /// Set transpiling options.
    pub fn with_transpile_options(mut self, options: TranspileOptions) -> Self {
        self.transpile_options = options;
        self
    }

    /// Set rendering options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render_options = options;
        self
    }

    /// Set the paper size.
    pub fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.render_options = self.render_options.with_page_size(page_size);
        self
    }

    /// Emit an HTML body fragment instead of a full document.
    pub fn fragment(mut self) -> Self {
        self.render_options = self.render_options.with_standalone(false);
        self
    }

    /// Set the HTML document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.render_options = self.render_options.with_title(title);
        self
    }

    /// Leave a section out of HTML and Markdown output.
    pub fn skip_section(mut self, title: impl Into<String>) -> Self {
        self.skip_sections.push(title.into());
        self
    }

    /// Transpile markup and return a result wrapper.
    pub fn transpile(self, markup: &str) -> RezumeResult {
        let result = transpile_with_options(markup, &self.transpile_options);
        RezumeResult {
            result,
            render_options: self.render_options,
            skip_sections: self.skip_sections,
        }
    }

    /// Read and transpile a markup file.
    pub fn parse<P: AsRef<Path>>(self, path: P) -> Result<RezumeResult> {
        let markup = std::fs::read_to_string(path)?;
        Ok(self.transpile(&markup))
    }
}

impl Default for Rezume {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of transpiling with a [`Rezume`] builder.
pub struct RezumeResult {
    /// Tree and warnings
    pub result: ConversionResult,
    render_options: RenderOptions,
    skip_sections: Vec<String>,
}

impl RezumeResult {
    /// Convert to HTML.
    pub fn to_html(&self) -> Result<String> {
        render::HtmlRenderer::new(self.render_options.clone())
            .with_visitor(SkipSectionsVisitor::new(&self.skip_sections))
            .render(&self.result.tree)
    }

    /// Convert to HTML with statistics.
    pub fn to_html_with_stats(&self) -> Result<render::RenderResult> {
        render::HtmlRenderer::new(self.render_options.clone())
            .with_visitor(SkipSectionsVisitor::new(&self.skip_sections))
            .render_with_stats(&self.result)
    }

    /// Convert to Markdown.
    pub fn to_markdown(&self) -> Result<String> {
        render::MarkdownRenderer::new(self.render_options.clone())
            .with_visitor(SkipSectionsVisitor::new(&self.skip_sections))
            .render(&self.result.tree)
    }

    /// Convert to plain text.
    pub fn to_text(&self) -> Result<String> {
        render::to_text(&self.result.tree)
    }

    /// Convert to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.result, format)
    }

    /// Get the content tree.
    pub fn tree(&self) -> &ContentTree {
        &self.result.tree
    }

    /// Get the transpile warnings.
    pub fn warnings(&self) -> &[String] {
        &self.result.warnings
    }

    /// Get plain text of the tree.
    pub fn plain_text(&self) -> String {
        self.result.tree.plain_text()
    }
}
