//! One-call conversion from markup to a rendered output format.
//!
//! # Example
//!
//! ```
//! use rezume::convert::{convert, ConvertOptions, OutputFormat};
//!
//! fn main() -> rezume::Result<()> {
//!     let options = ConvertOptions::new().with_format(OutputFormat::Markdown);
//!     let result = convert(r"\section{Skills} Rust", &options)?;
//!     assert_eq!(result.content, "## Skills\n\nRust");
//!     assert_eq!(result.mime_type, "text/markdown");
//!     Ok(())
//! }
//! ```

use crate::error::{Error, Result};
use crate::model::ConversionResult;
use crate::parser::{self, TranspileOptions};
use crate::render::visitor::{self, SkipSectionsVisitor};
use crate::render::{
    self, HtmlRenderer, JsonFormat, MarkdownRenderer, RenderOptions, TreeStats,
};
use std::fmt;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

/// Options for a full conversion.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Normalizing and transpiling options
    pub transpile: TranspileOptions,

    /// Rendering options
    pub render: RenderOptions,

    /// Output format
    pub output_format: OutputFormat,

    /// Layout of JSON output
    pub json_format: JsonFormat,

    /// Section titles left out of the output (case-insensitive)
    pub skip_sections: Vec<String>,
}

impl ConvertOptions {
    /// Create new conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set transpiling options.
    pub fn with_transpile_options(mut self, options: TranspileOptions) -> Self {
        self.transpile = options;
        self
    }

    /// Set rendering options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render = options;
        self
    }

    /// Enable statistics collection.
    pub fn with_stats(mut self, collect: bool) -> Self {
        self.render.collect_stats = collect;
        self
    }

    /// Set output format.
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Set the JSON layout.
    pub fn with_json_format(mut self, format: JsonFormat) -> Self {
        self.json_format = format;
        self
    }

    /// Leave a section out of the output.
    pub fn skip_section(mut self, title: impl Into<String>) -> Self {
        self.skip_sections.push(title.into());
        self
    }
}

/// Output format for conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Print-ready HTML
    #[default]
    Html,

    /// Markdown format
    Markdown,

    /// Plain text
    Text,

    /// JSON content tree with warnings
    Json,
}

impl OutputFormat {
    /// All formats, in a stable order.
    pub const ALL: [OutputFormat; 4] = [
        OutputFormat::Html,
        OutputFormat::Markdown,
        OutputFormat::Text,
        OutputFormat::Json,
    ];

    /// MIME type of the rendered output.
    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Html => "text/html",
            OutputFormat::Markdown => "text/markdown",
            OutputFormat::Text => "text/plain",
            OutputFormat::Json => "application/json",
        }
    }

    /// File extension without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Html => "html",
            OutputFormat::Markdown => "md",
            OutputFormat::Text => "txt",
            OutputFormat::Json => "json",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" | "htm" => Ok(OutputFormat::Html),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(Error::InvalidOption(format!(
                "unknown output format '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Result of a full conversion.
#[derive(Debug, Clone)]
pub struct ConvertResult {
    /// Rendered content
    pub content: String,

    /// Transpile warnings, in the order they were met
    pub warnings: Vec<String>,

    /// Tree statistics (if collected)
    pub stats: Option<TreeStats>,

    /// MIME type of the output
    pub mime_type: &'static str,
}

impl ConvertResult {
    /// Create a new conversion result.
    pub fn new(content: String, warnings: Vec<String>, format: OutputFormat) -> Self {
        Self {
            content,
            warnings,
            stats: None,
            mime_type: format.mime_type(),
        }
    }

    /// Set tree statistics.
    pub fn with_stats(mut self, stats: TreeStats) -> Self {
        self.stats = Some(stats);
        self
    }

    /// Check if transpiling reported any warning.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Get content length in bytes.
    pub fn content_len(&self) -> usize {
        self.content.len()
    }
}

/// Normalize, transpile and render markup.
pub fn convert(markup: &str, options: &ConvertOptions) -> Result<ConvertResult> {
    let transpiled = parser::parse(markup, &options.transpile);
    render_result(transpiled, options)
}

/// Convert a markup file.
pub fn convert_file<P: AsRef<Path>>(path: P, options: &ConvertOptions) -> Result<ConvertResult> {
    let path = path.as_ref();
    log::debug!("converting {}", path.display());
    let markup = std::fs::read_to_string(path)?;
    convert(&markup, options)
}

/// Convert markup read from a reader.
pub fn convert_reader<R: Read>(mut reader: R, options: &ConvertOptions) -> Result<ConvertResult> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    let markup = String::from_utf8(bytes)?;
    convert(&markup, options)
}

/// Render an already transpiled result.
pub fn render_result(mut transpiled: ConversionResult, options: &ConvertOptions) -> Result<ConvertResult> {
    let format = options.output_format;
    let skipping = !options.skip_sections.is_empty();

    let (content, stats) = match format {
        OutputFormat::Html => {
            let mut renderer = HtmlRenderer::new(options.render.clone());
            if skipping {
                renderer = renderer.with_visitor(SkipSectionsVisitor::new(&options.skip_sections));
            }
            if options.render.collect_stats {
                let rendered = renderer.render_with_stats(&transpiled)?;
                (rendered.content, Some(rendered.stats))
            } else {
                (renderer.render(&transpiled.tree)?, None)
            }
        }
        OutputFormat::Markdown => {
            let mut renderer = MarkdownRenderer::new(options.render.clone());
            if skipping {
                renderer = renderer.with_visitor(SkipSectionsVisitor::new(&options.skip_sections));
            }
            if options.render.collect_stats {
                let rendered = renderer.render_with_stats(&transpiled)?;
                (rendered.content, Some(rendered.stats))
            } else {
                (renderer.render(&transpiled.tree)?, None)
            }
        }
        OutputFormat::Text | OutputFormat::Json => {
            if skipping {
                let mut skip = SkipSectionsVisitor::new(&options.skip_sections);
                transpiled
                    .tree
                    .nodes
                    .retain(|node| !visitor::dispatch(&mut skip, node).should_skip());
            }
            let content = if format == OutputFormat::Text {
                render::to_text(&transpiled.tree)?
            } else {
                render::to_json(&transpiled, options.json_format)?
            };
            let stats = options.render.collect_stats.then(|| {
                let mut stats = TreeStats::from_tree(&transpiled.tree);
                stats.warning_count = transpiled.warnings.len() as u32;
                stats
            });
            (content, stats)
        }
    };

    let mut result = ConvertResult::new(content, transpiled.warnings, format);
    if let Some(stats) = stats {
        result = result.with_stats(stats);
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_options_builder() {
        let options = ConvertOptions::new()
            .with_stats(true)
            .with_format(OutputFormat::Text)
            .skip_section("Hobbies");

        assert!(options.render.collect_stats);
        assert_eq!(options.output_format, OutputFormat::Text);
        assert_eq!(options.skip_sections, vec!["Hobbies".to_string()]);
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("md".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
        assert_eq!("HTML".parse::<OutputFormat>().unwrap(), OutputFormat::Html);
        assert!("pdf".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_mime_types() {
        for format in OutputFormat::ALL {
            let result = convert("", &ConvertOptions::new().with_format(format)).unwrap();
            assert_eq!(result.mime_type, format.mime_type());
        }
    }

    #[test]
    fn test_skip_section_in_text() {
        let options = ConvertOptions::new()
            .with_format(OutputFormat::Text)
            .skip_section("hobbies");
        let result = convert(r"\section{Hobbies} chess \section{Skills} Rust", &options).unwrap();
        assert_eq!(result.content, "SKILLS\nRust");
    }

    #[test]
    fn test_stats_for_json() {
        let options = ConvertOptions::new()
            .with_format(OutputFormat::Json)
            .with_stats(true);
        let result = convert(r"\section{Skills} Rust \foo{bar}", &options).unwrap();
        let stats = result.stats.unwrap();
        assert_eq!(stats.section_count, 1);
        assert_eq!(stats.warning_count, 1);
        assert_eq!(result.warnings.len(), 1);
    }
}
