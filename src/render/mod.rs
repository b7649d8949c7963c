//! Rendering module for converting content trees to output formats.

mod html;
mod json;
mod markdown;
mod options;
mod result;
mod stylesheet;
mod text;
pub mod visitor;

pub use html::{escape_html, to_html, to_html_with_stats, HtmlRenderer};
pub use json::{to_json, JsonFormat};
pub use markdown::{to_markdown, to_markdown_with_stats, MarkdownRenderer};
pub use options::RenderOptions;
pub use result::{RenderResult, TreeStats};
pub use stylesheet::{PageSize, Stylesheet};
pub use text::to_text;
pub use visitor::{
    CompositeVisitor, DefaultVisitor, NodeVisitor, SkipSectionsVisitor, VisitorAction,
};
