//! Rendering options and configuration.

use super::stylesheet::{PageSize, Stylesheet};

/// Options for rendering a content tree.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Page and typography settings (HTML only)
    pub stylesheet: Stylesheet,

    /// Emit a complete HTML document instead of a body fragment
    pub standalone: bool,

    /// Document title; the header name is used when unset
    pub title: Option<String>,

    /// Character to use for unordered list markers
    pub list_marker: char,

    /// Escape special Markdown characters
    pub escape_special_chars: bool,

    /// Collect statistics during rendering
    pub collect_stats: bool,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the stylesheet.
    pub fn with_stylesheet(mut self, stylesheet: Stylesheet) -> Self {
        self.stylesheet = stylesheet;
        self
    }

    /// Set the paper size.
    pub fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.stylesheet.page_size = page_size;
        self
    }

    /// Emit a full document or a body fragment.
    pub fn with_standalone(mut self, standalone: bool) -> Self {
        self.standalone = standalone;
        self
    }

    /// Set the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the list marker character.
    pub fn with_list_marker(mut self, marker: char) -> Self {
        self.list_marker = marker;
        self
    }

    /// Enable or disable Markdown escaping.
    pub fn with_escaping(mut self, escape: bool) -> Self {
        self.escape_special_chars = escape;
        self
    }

    /// Enable statistics collection during rendering.
    pub fn with_stats(mut self, collect: bool) -> Self {
        self.collect_stats = collect;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            stylesheet: Stylesheet::default(),
            standalone: true,
            title: None,
            list_marker: '-',
            escape_special_chars: true,
            collect_stats: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_options_builder() {
        let options = RenderOptions::new()
            .with_page_size(PageSize::A4)
            .with_standalone(false)
            .with_title("CV")
            .with_list_marker('*');

        assert_eq!(options.stylesheet.page_size, PageSize::A4);
        assert!(!options.standalone);
        assert_eq!(options.title.as_deref(), Some("CV"));
        assert_eq!(options.list_marker, '*');
        assert!(options.escape_special_chars);
    }
}
