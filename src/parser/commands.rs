//! Command vocabulary recognized by the transpiler.

use crate::model::SpanStyle;

/// Style applied by a one-argument styling command.
pub fn style_command(name: &str) -> Option<SpanStyle> {
    match name {
        "textbf" => Some(SpanStyle::Bold),
        "textit" | "emph" | "textsl" => Some(SpanStyle::Italic),
        "underline" => Some(SpanStyle::Underline),
        "textsc" => Some(SpanStyle::SmallCaps),
        _ => None,
    }
}

/// Style applied by a declaration to the rest of its group.
pub fn style_declaration(name: &str) -> Option<SpanStyle> {
    match name {
        "bfseries" => Some(SpanStyle::Bold),
        "itshape" | "em" | "slshape" => Some(SpanStyle::Italic),
        "scshape" => Some(SpanStyle::SmallCaps),
        _ => None,
    }
}

/// Font size declarations.
pub fn is_size_declaration(name: &str) -> bool {
    matches!(
        name,
        "Huge"
            | "huge"
            | "LARGE"
            | "Large"
            | "large"
            | "normalsize"
            | "small"
            | "footnotesize"
            | "scriptsize"
            | "tiny"
    )
}

/// Size declarations large enough to mark the name banner.
pub fn is_banner_size(name: &str) -> bool {
    matches!(name, "Huge" | "huge" | "LARGE" | "Large")
}

/// Argument-less presentational commands consumed without a trace.
pub fn is_silent(name: &str) -> bool {
    matches!(
        name,
        "hfill"
            | "centering"
            | "raggedright"
            | "raggedleft"
            | "noindent"
            | "indent"
            | "hline"
            | "smallskip"
            | "medskip"
            | "bigskip"
            | "normalfont"
            | "mdseries"
            | "upshape"
            | "rmfamily"
            | "sffamily"
            | "ttfamily"
            | "newline"
            | "newpage"
            | "clearpage"
            | "pagebreak"
            | "linebreak"
            | "nopagebreak"
            | "par"
            | "maketitle"
            | "tableofcontents"
            | "quad"
            | "qquad"
    ) || is_size_declaration(name)
}

/// Number of brace arguments a presentational command drops along with
/// itself. Commands with no entry here are not presentational.
pub fn ignored_arity(name: &str) -> Option<usize> {
    match name {
        "vspace" | "hspace" | "pagestyle" | "thispagestyle" | "label"
        | "titleformat" | "titlespacing" | "addtocounter" | "setcounter" | "input"
        | "include" | "pdfgentounicode" | "urlstyle" => Some(1),
        "setlength" | "addtolength" | "fontsize" | "renewcommand" | "newcommand" => Some(2),
        _ => None,
    }
}

/// Style for a `\color` declaration. Only the link color carries meaning.
pub fn color_style(name: &str) -> Option<SpanStyle> {
    match name.trim() {
        "linkblue" => Some(SpanStyle::Accent),
        _ => None,
    }
}

/// Literal text for an escaped symbol such as `\&`.
pub fn escaped_symbol(name: &str) -> Option<&'static str> {
    match name {
        "&" => Some("&"),
        "%" => Some("%"),
        "$" => Some("$"),
        "#" => Some("#"),
        "_" => Some("_"),
        "{" => Some("{"),
        "}" => Some("}"),
        "|" => Some("|"),
        " " | "\t" | "\n" => Some(" "),
        "," | ";" | ":" => Some(" "),
        "/" | "-" | "@" => Some(""),
        "textbackslash" => Some("\\"),
        "textbar" => Some("|"),
        "textbullet" => Some("\u{2022}"),
        "ldots" | "dots" | "textellipsis" => Some("\u{2026}"),
        "LaTeX" => Some("LaTeX"),
        "TeX" => Some("TeX"),
        "today" => Some(""),
        _ => None,
    }
}

/// Commands that end a run of header contact lines.
pub fn is_structural(name: &str) -> bool {
    matches!(
        name,
        "section"
            | "begin"
            | "end"
            | "resumeSubHeadingListStart"
            | "resumeSubHeadingListEnd"
            | "resumeSubheading"
            | "resumeItemListStart"
            | "resumeItemListEnd"
            | "resumeItem"
            | "item"
    )
}

/// Environments that hold list items.
pub fn is_list_environment(name: &str) -> bool {
    matches!(name, "itemize" | "enumerate" | "description")
}

/// Check whether list options suppress the item marker (`label={}`).
pub fn suppresses_bullets(options: &str) -> bool {
    options.split(',').any(|option| {
        let mut parts = option.splitn(2, '=');
        let key = parts.next().unwrap_or("").trim();
        let value = parts.next().map(str::trim);
        key == "label" && matches!(value, Some("") | Some("{}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_tables() {
        assert_eq!(style_command("emph"), Some(SpanStyle::Italic));
        assert_eq!(style_command("textsc"), Some(SpanStyle::SmallCaps));
        assert_eq!(style_command("scshape"), None);
        assert_eq!(style_declaration("scshape"), Some(SpanStyle::SmallCaps));
        assert_eq!(style_declaration("textbf"), None);
        assert_eq!(color_style(" linkblue "), Some(SpanStyle::Accent));
        assert_eq!(color_style("red"), None);
    }

    #[test]
    fn test_silent_includes_sizes() {
        assert!(is_silent("hfill"));
        assert!(is_silent("Huge"));
        assert!(!is_silent("foo"));
        assert!(is_banner_size("LARGE"));
        assert!(!is_banner_size("small"));
    }

    #[test]
    fn test_ignored_arity() {
        assert_eq!(ignored_arity("vspace"), Some(1));
        assert_eq!(ignored_arity("setlength"), Some(2));
        assert_eq!(ignored_arity("textbf"), None);
    }

    #[test]
    fn test_suppresses_bullets() {
        assert!(suppresses_bullets("leftmargin=0.15in, label={}"));
        assert!(suppresses_bullets("label="));
        assert!(!suppresses_bullets("leftmargin=0.15in"));
        assert!(!suppresses_bullets("label=\\textbullet"));
    }
}
