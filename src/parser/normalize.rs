//! Markup normalizer.
//!
//! Strips non-semantic scaffolding (comments, preamble) and turns the
//! line-break and pipe-separator idioms into single marker characters the
//! transpiler recognizes without re-parsing.

use super::options::NormalizeOptions;
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Marker left in place of a `\\` line break.
pub const LINE_BREAK: char = '\u{E000}';

/// Marker left in place of a `$|$` pipe separator.
pub const SEPARATOR: char = '\u{E001}';

static PREAMBLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\\documentclass.*?\\begin[ \t]*\{document\}").expect("static pattern")
});

static DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\(?:documentclass|usepackage)[ \t]*(?:\[[^\]]*\])?[ \t]*\{[^}]*\}")
        .expect("static pattern")
});

static DEFINECOLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\definecolor[ \t]*\{[^}]*\}[ \t]*\{[^}]*\}[ \t]*\{[^}]*\}")
        .expect("static pattern")
});

static DOCUMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\(?:begin|end)[ \t]*\{document\}").expect("static pattern")
});

static SEPARATOR_IDIOM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)(?P<pre>^|[^\\]|\\\\)(?:\\ )?[ \t~]*\$\|\$[ \t~]*(?:\\ )?")
        .expect("static pattern")
});

static LINE_BREAK_IDIOM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\\\\*?(?:\[[^\]\n]*\])?").expect("static pattern"));

static BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n(?:[ \t]*\n){2,}").expect("static pattern"));

/// Markup normalizer.
///
/// The patterns are compiled once per process, so a normalizer is cheap to
/// build for every call.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    options: NormalizeOptions,
}

impl Normalizer {
    /// Create a new normalizer.
    pub fn new(options: NormalizeOptions) -> Self {
        Self { options }
    }

    /// Normalize raw markup.
    ///
    /// Never fails; empty input gives empty output. Normalizing the output
    /// again yields the same string.
    pub fn normalize(&self, markup: &str) -> String {
        if markup.is_empty() {
            return String::new();
        }

        let mut text = strip_comments(markup);
        text = strip_preamble(&text);
        text = collapse_separators(&text);
        text = LINE_BREAK_IDIOM
            .replace_all(&text, LINE_BREAK.to_string())
            .into_owned();

        if self.options.normalize_unicode {
            text = text.nfc().collect();
        }
        if self.options.collapse_blank_lines {
            text = BLANK_LINES.replace_all(&text, "\n\n").into_owned();
        }

        log::trace!("normalized {} bytes into {}", markup.len(), text.len());
        text
    }
}

fn strip_preamble(text: &str) -> String {
    let mut text = remove_unescaped(&PREAMBLE, text, Some(1)).into_owned();
    for pattern in [&*DECLARATION, &*DEFINECOLOR, &*DOCUMENT] {
        // A removal can splice together a new declaration.
        loop {
            let next = match remove_unescaped(pattern, &text, None) {
                Cow::Borrowed(_) => break,
                Cow::Owned(next) => next,
            };
            text = next;
        }
    }
    text
}

/// Remove matches of a command pattern whose leading backslash is not the
/// second half of a `\\` pair, at most `limit` of them.
fn remove_unescaped<'t>(pattern: &Regex, text: &'t str, limit: Option<usize>) -> Cow<'t, str> {
    let mut out = String::new();
    let (mut last, mut pos, mut removed) = (0, 0, 0);
    while limit.map_or(true, |limit| removed < limit) {
        let Some(found) = pattern.find_at(text, pos) else {
            break;
        };
        if escaped_at(text, found.start()) {
            // Patterns open with a backslash, so the next byte is a boundary.
            pos = found.start() + 1;
            continue;
        }
        out.push_str(&text[last..found.start()]);
        last = found.end();
        pos = found.end();
        removed += 1;
    }
    if removed == 0 {
        return Cow::Borrowed(text);
    }
    out.push_str(&text[last..]);
    Cow::Owned(out)
}

/// Check whether the byte at `index` follows an odd run of backslashes.
fn escaped_at(text: &str, index: usize) -> bool {
    let run = text.as_bytes()[..index]
        .iter()
        .rev()
        .take_while(|&&b| b == b'\\')
        .count();
    run % 2 == 1
}

fn collapse_separators(text: &str) -> String {
    let replacement = format!("${{pre}}{}", SEPARATOR);
    let mut text = text.to_string();
    // Each match consumes the character before it, so `$|$$|$` needs
    // another pass.
    loop {
        let next = match SEPARATOR_IDIOM.replace_all(&text, replacement.as_str()) {
            Cow::Borrowed(_) => break,
            Cow::Owned(next) => next,
        };
        text = next;
    }
    text
}

/// Remove `%` comments up to the end of each line, keeping the newline.
fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.split_inclusive('\n') {
        let (content, newline) = match line.strip_suffix('\n') {
            Some(content) => (content, "\n"),
            None => (line, ""),
        };
        let end = comment_start(content).unwrap_or(content.len());
        out.push_str(&content[..end]);
        out.push_str(newline);
    }
    out
}

/// Byte offset of the first `%` preceded by an even run of backslashes.
fn comment_start(line: &str) -> Option<usize> {
    let mut backslashes = 0usize;
    for (i, b) in line.bytes().enumerate() {
        match b {
            b'\\' => backslashes += 1,
            b'%' if backslashes % 2 == 0 => return Some(i),
            _ => backslashes = 0,
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(text: &str) -> String {
        Normalizer::default().normalize(text)
    }

    #[test]
    fn test_strip_comments() {
        assert_eq!(normalize("a % note\nb"), "a \nb");
        assert_eq!(normalize("100\\% done"), "100\\% done");
        assert_eq!(normalize("x\\\\% gone"), format!("x{}", LINE_BREAK));
    }

    #[test]
    fn test_strip_preamble() {
        let markup = "\\documentclass[letterpaper,11pt]{article}\n\\usepackage{titlesec}\n\\begin{document}\nBody\n\\end{document}\n";
        assert_eq!(normalize(markup).trim(), "Body");
    }

    #[test]
    fn test_strip_declarations_without_region() {
        let markup = "\\usepackage[usenames]{color}\\definecolor{linkblue}{RGB}{0,0,200}Text";
        assert_eq!(normalize(markup), "Text");
    }

    #[test]
    fn test_separator_variants() {
        let expected = format!("a{}b", SEPARATOR);
        assert_eq!(normalize("a $|$ b"), expected);
        assert_eq!(normalize("a\\ $|$\\ b"), expected);
        assert_eq!(normalize("a~$|$~b"), expected);
        assert_eq!(normalize("a$|$b"), expected);
        assert_eq!(normalize("a $|$$|$ b"), format!("a{0}{0}b", SEPARATOR));
    }

    #[test]
    fn test_line_break_before_separator_kept() {
        assert_eq!(
            normalize("a \\\\ $|$ b"),
            format!("a {}{}b", LINE_BREAK, SEPARATOR)
        );
        assert_eq!(
            normalize("a\\\\$|$b"),
            format!("a{}{}b", LINE_BREAK, SEPARATOR)
        );
    }

    #[test]
    fn test_line_break_spacing_hint() {
        assert_eq!(
            normalize("one\\\\[-2pt]two\\\\three"),
            format!("one{0}two{0}three", LINE_BREAK)
        );
    }

    #[test]
    fn test_collapse_blank_lines() {
        assert_eq!(normalize("a\n\n\n  \n\nb"), "a\n\nb");

        let keep = Normalizer::new(NormalizeOptions::new().with_blank_line_collapsing(false));
        assert_eq!(keep.normalize("a\n\n\n\nb"), "a\n\n\n\nb");
    }

    #[test]
    fn test_unicode_nfc() {
        assert_eq!(normalize("Jose\u{301}"), "Jos\u{e9}");
    }

    #[test]
    fn test_declaration_after_line_break_kept() {
        assert_eq!(
            normalize(r"\\usepackage{x}\% tail"),
            format!("{}usepackage{{x}}\\% tail", LINE_BREAK)
        );
        assert_eq!(
            normalize(r"a\\definecolor{a}{b}{c}\% b"),
            format!("a{}definecolor{{a}}{{b}}{{c}}\\% b", LINE_BREAK)
        );
        assert_eq!(normalize(r"x\\\usepackage{y}z"), format!("x{}z", LINE_BREAK));
    }

    #[test]
    fn test_escaped_at() {
        assert!(!escaped_at(r"\x", 0));
        assert!(escaped_at(r"\x", 1));
        assert!(!escaped_at(r"\\x", 2));
        assert!(!escaped_at(r"a\\\x", 3));
        assert!(escaped_at(r"a\\\x", 4));
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "\\documentclass{article}\\begin{document}\n% header\n\\textbf{\\Huge \\scshape Jane}\\\\ \\vspace{1pt}\nx $|$ y\n\n\n\n\\section{Skills}\n\\end{document}",
            r"\\usepackage{x}\% tail",
            r"a\\definecolor{a}{b}{c}\% b",
            r"\\begin{document}\% x",
            r"\\documentclass{a}\begin{document}\% y",
        ];
        for markup in samples {
            let once = normalize(markup);
            assert_eq!(normalize(&once), once, "input: {:?}", markup);
        }
    }

    #[test]
    fn test_normalizer_holds_no_patterns() {
        assert_eq!(
            std::mem::size_of::<Normalizer>(),
            std::mem::size_of::<NormalizeOptions>()
        );
        let plain = Normalizer::new(NormalizeOptions::new().with_unicode_normalization(false));
        assert_eq!(plain.normalize("a $|$ b"), normalize("a $|$ b"));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize(""), "");
    }
}
