//! Print stylesheet for HTML output.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Paper size of the printed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageSize {
    /// US Letter, 8.5in × 11in
    #[default]
    Letter,
    /// ISO A4, 210mm × 297mm
    A4,
}

impl PageSize {
    /// Value for the CSS `@page { size }` property.
    pub fn css_name(&self) -> &'static str {
        match self {
            PageSize::Letter => "letter",
            PageSize::A4 => "A4",
        }
    }

    /// Page width as a CSS length.
    pub fn width(&self) -> &'static str {
        match self {
            PageSize::Letter => "8.5in",
            PageSize::A4 => "210mm",
        }
    }

    /// Page height as a CSS length.
    pub fn height(&self) -> &'static str {
        match self {
            PageSize::Letter => "11in",
            PageSize::A4 => "297mm",
        }
    }
}

impl FromStr for PageSize {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "letter" | "us-letter" => Ok(PageSize::Letter),
            "a4" => Ok(PageSize::A4),
            other => Err(Error::InvalidOption(format!(
                "unknown page size '{}' (expected letter or a4)",
                other
            ))),
        }
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.css_name())
    }
}

/// Page and typography settings for the HTML renderer.
#[derive(Debug, Clone)]
pub struct Stylesheet {
    /// Paper size
    pub page_size: PageSize,

    /// Page margin in inches
    pub margin_in: f32,

    /// CSS font family list
    pub font_family: String,

    /// Base font size in points
    pub font_size_pt: f32,

    /// Link color; links inherit the text color when unset
    pub link_color: Option<String>,
}

impl Stylesheet {
    /// Create a stylesheet with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the paper size.
    pub fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the page margin in inches.
    pub fn with_margin(mut self, inches: f32) -> Self {
        self.margin_in = inches.max(0.0);
        self
    }

    /// Set the font family list.
    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = family.into();
        self
    }

    /// Set the base font size in points.
    pub fn with_font_size(mut self, points: f32) -> Self {
        self.font_size_pt = points.max(1.0);
        self
    }

    /// Set the link color.
    pub fn with_link_color(mut self, color: impl Into<String>) -> Self {
        self.link_color = Some(color.into());
        self
    }

    /// Generate the CSS.
    pub fn to_css(&self) -> String {
        let mut css = format!(
            "@page {{ size: {size}; margin: {margin}in; }}\n\
             * {{ box-sizing: border-box; margin: 0; padding: 0; }}\n\
             body {{ font-family: {family}; font-size: {font}pt; line-height: 1.4; color: #000; \
             background: white; padding: {margin}in; width: {width}; min-height: {height}; \
             -webkit-print-color-adjust: exact; print-color-adjust: exact; }}\n\
             a {{ color: {link}; text-decoration: none; }}\n",
            size = self.page_size.css_name(),
            margin = self.margin_in,
            family = self.font_family,
            font = self.font_size_pt,
            width = self.page_size.width(),
            height = self.page_size.height(),
            link = self.link_color.as_deref().unwrap_or("inherit"),
        );
        css.push_str(LAYOUT_CSS);
        css
    }
}

impl Default for Stylesheet {
    fn default() -> Self {
        Self {
            page_size: PageSize::Letter,
            margin_in: 0.5,
            font_family: "'Lato', sans-serif".to_string(),
            font_size_pt: 11.0,
            link_color: None,
        }
    }
}

const LAYOUT_CSS: &str = "\
.small-caps { font-variant: small-caps; }
.accent { color: #000080; }
strong { font-weight: 700; }
em { font-style: italic; }
.center-text { text-align: center; width: 100%; margin-bottom: 10px; }
.center-text p { margin: 0; line-height: 1.3; }
.name { font-size: 24pt; margin: 0 0 4pt 0; line-height: 1; text-align: center; font-weight: bold; font-variant: small-caps; }
.contacts { text-align: center; margin-bottom: 10px; }
.pipe { margin: 0 8px; vertical-align: middle; }
.center-grid { width: 100%; display: flex; flex-wrap: wrap; justify-content: space-between; gap: 15px; align-items: flex-start; margin-top: 10px; break-inside: avoid; }
.minipage-col { flex: 1; min-width: 30%; text-align: left; font-size: 10.5pt; break-inside: avoid; }
.section-title { font-size: 14pt; font-weight: 700; text-transform: uppercase; border-bottom: 1px solid #000; margin: 14pt 0 6pt 0; padding-bottom: 2pt; width: 100%; break-after: avoid; }
.resume-section { break-inside: auto; }
.resume-group { break-inside: avoid; }
.resume-entry { margin-bottom: 2pt; break-inside: avoid; }
.entry-header, .entry-details { display: flex; justify-content: space-between; width: 100%; }
.entry-arg2, .entry-arg3, .entry-arg4 { font-style: italic; }
ul.resume-list { margin: 2pt 0 8pt 0; padding-left: 18pt; break-inside: avoid; }
ul.resume-list li { margin-bottom: 2pt; text-align: left; }
ul.no-bullet { list-style-type: none; padding-left: 0; margin-left: 0; }
ul.no-bullet li { margin-bottom: 4pt; }
@media print {
  .section-title { page-break-after: avoid; }
  .resume-group, .resume-entry, .center-grid, ul.resume-list { page-break-inside: avoid; }
}
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_size_from_str() {
        assert_eq!("A4".parse::<PageSize>().unwrap(), PageSize::A4);
        assert_eq!(" Letter ".parse::<PageSize>().unwrap(), PageSize::Letter);
        assert!(matches!(
            "legal".parse::<PageSize>(),
            Err(Error::InvalidOption(_))
        ));
    }

    #[test]
    fn test_css_page_rules() {
        let css = Stylesheet::new().with_page_size(PageSize::A4).to_css();
        assert!(css.contains("@page { size: A4; margin: 0.5in; }"));
        assert!(css.contains("width: 210mm"));
        assert!(css.contains("font-size: 11pt"));
    }

    #[test]
    fn test_css_keep_together_rules() {
        let css = Stylesheet::default().to_css();
        assert!(css.contains(".resume-entry { margin-bottom: 2pt; break-inside: avoid; }"));
        assert!(css.contains("break-after: avoid"));
        assert!(css.contains(".center-grid"));
        assert!(css.contains(".resume-group { break-inside: avoid; }"));
        assert!(css.contains(".resume-group, .resume-entry"));
        assert!(css.contains(".accent { color: #000080; }"));
        assert!(css.contains("a { color: inherit;"));
    }

    #[test]
    fn test_link_color() {
        let css = Stylesheet::new().with_link_color("#000080").to_css();
        assert!(css.contains("a { color: #000080;"));
    }
}
