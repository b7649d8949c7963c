//! Brace-aware cursor over normalized markup.
//!
//! Every delimiter the scanner cares about (`\`, `{`, `}`, `[`, `]`) is
//! ASCII, so byte offsets are always valid `str` boundaries at the points
//! where slices are taken.

/// A command token: `\name`, `\name*` or an escaped symbol such as `\&`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command<'a> {
    /// Command name without the backslash
    pub name: &'a str,
    /// Whether a `*` followed the name
    pub starred: bool,
    /// Byte offset of the backslash
    pub start: usize,
}

/// A brace-delimited argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Group<'a> {
    /// Content between the braces
    pub inner: &'a str,
    /// False when input ended before the closing brace
    pub closed: bool,
}

/// Closing delimiter of a block construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter<'n> {
    /// `\begin{name}` … `\end{name}`
    Environment(&'n str),
    /// A pair of argument-less marker commands
    Marker {
        /// Opening command name
        open: &'n str,
        /// Closing command name
        close: &'n str,
    },
}

/// Location of a matched closing delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Closing {
    /// Byte offset where the body ends (start of the closing command)
    pub body_end: usize,
    /// Byte offset just past the closing command
    pub resume: usize,
}

/// How much whitespace may precede an argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skip {
    /// Spaces and tabs only
    Spaces,
    /// Any whitespace including newlines
    Whitespace,
}

/// Cursor over a markup fragment.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Create a cursor at the start of `src`.
    pub fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    /// The whole fragment.
    pub fn src(&self) -> &'a str {
        self.src
    }

    /// Current byte offset.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Move to a byte offset (clamped to the end).
    pub fn set_pos(&mut self, pos: usize) {
        self.pos = pos.min(self.src.len());
    }

    /// Remaining input.
    pub fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    /// Next character without consuming it.
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Consume one character.
    pub fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Consume characters while `pred` holds and return them.
    pub fn take_while<F: Fn(char) -> bool>(&mut self, pred: F) -> &'a str {
        let start = self.pos;
        let len = self
            .rest()
            .char_indices()
            .find(|&(_, c)| !pred(c))
            .map_or(self.src.len() - start, |(i, _)| i);
        self.pos = start + len;
        &self.src[start..self.pos]
    }

    /// Skip whitespace according to `skip`.
    pub fn skip(&mut self, skip: Skip) {
        match skip {
            Skip::Spaces => self.take_while(|c| c == ' ' || c == '\t'),
            Skip::Whitespace => self.take_while(char::is_whitespace),
        };
    }

    /// Read a command at the cursor, if the cursor is on a backslash.
    pub fn read_command(&mut self) -> Option<Command<'a>> {
        if self.peek() != Some('\\') {
            return None;
        }
        let start = self.pos;
        let after = start + 1;
        let letters = self.src[after..]
            .bytes()
            .take_while(u8::is_ascii_alphabetic)
            .count();

        if letters > 0 {
            self.pos = after + letters;
            let name = &self.src[after..self.pos];
            let starred = self.peek() == Some('*');
            if starred {
                self.pos += 1;
            }
            return Some(Command {
                name,
                starred,
                start,
            });
        }

        self.pos = after;
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
        Some(Command {
            name: &self.src[after..self.pos],
            starred: false,
            start,
        })
    }

    /// Read the command at the cursor without consuming it.
    pub fn peek_command(&self) -> Option<Command<'a>> {
        let mut probe = *self;
        probe.read_command()
    }

    /// Read a brace group at the cursor.
    ///
    /// Braces are matched by depth; escaped braces (`\{`, `\}`) do not
    /// count. An unterminated group takes the rest of the input.
    pub fn read_group(&mut self) -> Option<Group<'a>> {
        if self.peek() != Some('{') {
            return None;
        }
        let open = self.pos + 1;
        match matching_brace(self.src, open) {
            Some(close) => {
                self.pos = close + 1;
                Some(Group {
                    inner: &self.src[open..close],
                    closed: true,
                })
            }
            None => {
                self.pos = self.src.len();
                Some(Group {
                    inner: &self.src[open..],
                    closed: false,
                })
            }
        }
    }

    /// Read a brace argument, allowing whitespace before it.
    ///
    /// The cursor does not move when no argument follows.
    pub fn read_arg(&mut self, skip: Skip) -> Option<Group<'a>> {
        let mut probe = *self;
        probe.skip(skip);
        let group = probe.read_group()?;
        *self = probe;
        Some(group)
    }

    /// Read an optional bracket argument (`[...]`), allowing spaces before it.
    ///
    /// Unterminated brackets are not treated as an argument.
    pub fn read_optional(&mut self) -> Option<&'a str> {
        let mut probe = *self;
        probe.skip(Skip::Spaces);
        if probe.peek() != Some('[') {
            return None;
        }
        let open = probe.pos + 1;
        let bytes = probe.src.as_bytes();
        let mut depth = 0usize;
        let mut i = open;
        while i < bytes.len() {
            match bytes[i] {
                b'\\' => i += 1,
                b'{' => depth += 1,
                b'}' => depth = depth.saturating_sub(1),
                b']' if depth == 0 => {
                    self.pos = i + 1;
                    return Some(&probe.src[open..i]);
                }
                _ => {}
            }
            i += 1;
        }
        None
    }

    /// Advance to the next command at this brace level.
    ///
    /// Text is skipped and brace groups are stepped over whole; the returned
    /// command has been consumed.
    pub fn next_command_at_level(&mut self) -> Option<Command<'a>> {
        loop {
            self.take_while(|c| c != '\\' && c != '{');
            match self.peek()? {
                '{' => {
                    self.read_group();
                }
                _ => return self.read_command(),
            }
        }
    }

    /// Find the delimiter closing a construct whose opening was consumed.
    ///
    /// Nested constructs of the same kind are counted. The cursor is left
    /// where it was.
    pub fn find_closing(&self, delimiter: Delimiter<'_>) -> Option<Closing> {
        let mut probe = *self;
        let mut depth = 1usize;
        while let Some(cmd) = probe.next_command_at_level() {
            let step = match delimiter {
                Delimiter::Environment(env) => match cmd.name {
                    "begin" | "end" => {
                        let matches = probe
                            .read_arg(Skip::Spaces)
                            .is_some_and(|g| g.inner.trim() == env);
                        match (cmd.name, matches) {
                            ("begin", true) => 1,
                            ("end", true) => -1,
                            _ => 0,
                        }
                    }
                    _ => 0,
                },
                Delimiter::Marker { open, close } => {
                    if cmd.name == open {
                        1
                    } else if cmd.name == close {
                        -1
                    } else {
                        0
                    }
                }
            };
            if step > 0 {
                depth += 1;
            } else if step < 0 {
                depth -= 1;
                if depth == 0 {
                    return Some(Closing {
                        body_end: cmd.start,
                        resume: probe.pos,
                    });
                }
            }
        }
        None
    }
}

/// List body split at its own item introducers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSplit<'a> {
    /// Content before the first introducer
    pub lead: &'a str,
    /// Content of each item, introducer removed
    pub items: Vec<&'a str>,
}

/// Split a list body on `\item` and `\resumeItem`.
///
/// Nested environments and `\resumeItemListStart` blocks are stepped over,
/// so their items stay inside the item that contains them. The optional
/// `[label]` of `\item` is dropped; a `\resumeItem` keeps its argument
/// group at the start of the item.
pub fn split_items(body: &str) -> ItemSplit<'_> {
    let mut cursor = Cursor::new(body);
    // (introducer start, content start)
    let mut starts: Vec<(usize, usize)> = Vec::new();

    while let Some(cmd) = cursor.next_command_at_level() {
        match cmd.name {
            "item" => {
                cursor.read_optional();
                starts.push((cmd.start, cursor.pos()));
            }
            "resumeItem" => starts.push((cmd.start, cursor.pos())),
            "begin" => {
                let nested = cursor
                    .read_arg(Skip::Spaces)
                    .and_then(|env| cursor.find_closing(Delimiter::Environment(env.inner.trim())));
                if let Some(closing) = nested {
                    cursor.set_pos(closing.resume);
                }
            }
            "resumeItemListStart" => {
                if let Some(closing) = cursor.find_closing(Delimiter::Marker {
                    open: "resumeItemListStart",
                    close: "resumeItemListEnd",
                }) {
                    cursor.set_pos(closing.resume);
                }
            }
            _ => {}
        }
    }

    let lead_end = starts.first().map_or(body.len(), |&(start, _)| start);
    let items = starts
        .iter()
        .enumerate()
        .map(|(i, &(_, content))| {
            let end = starts.get(i + 1).map_or(body.len(), |&(next, _)| next);
            &body[content..end]
        })
        .collect();

    ItemSplit {
        lead: &body[..lead_end],
        items,
    }
}

/// Find the closing brace matching an opening brace just before `from`.
pub fn matching_brace(src: &str, from: usize) -> Option<usize> {
    let bytes = src.as_bytes();
    let mut depth = 1usize;
    let mut i = from;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 1,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_command() {
        let mut cursor = Cursor::new(r"\section*{Title}");
        let cmd = cursor.read_command().unwrap();
        assert_eq!(cmd.name, "section");
        assert!(cmd.starred);
        assert_eq!(cursor.rest(), "{Title}");
    }

    #[test]
    fn test_read_symbol_command() {
        let mut cursor = Cursor::new(r"\&rest");
        let cmd = cursor.read_command().unwrap();
        assert_eq!(cmd.name, "&");
        assert_eq!(cursor.rest(), "rest");

        let mut cursor = Cursor::new("\\");
        assert_eq!(cursor.read_command().unwrap().name, "");
        assert!(cursor.rest().is_empty());
    }

    #[test]
    fn test_read_group_nested() {
        let mut cursor = Cursor::new(r"{a {b} \{ c}tail");
        let group = cursor.read_group().unwrap();
        assert_eq!(group.inner, r"a {b} \{ c");
        assert!(group.closed);
        assert_eq!(cursor.rest(), "tail");
    }

    #[test]
    fn test_read_group_unterminated() {
        let mut cursor = Cursor::new("{open {inner}");
        let group = cursor.read_group().unwrap();
        assert_eq!(group.inner, "open {inner}");
        assert!(!group.closed);
        assert!(cursor.rest().is_empty());
    }

    #[test]
    fn test_read_arg_skips_newlines() {
        let mut cursor = Cursor::new("\n  {x}");
        assert_eq!(cursor.read_arg(Skip::Whitespace).unwrap().inner, "x");

        let mut cursor = Cursor::new("\n{x}");
        assert!(cursor.read_arg(Skip::Spaces).is_none());
        assert_eq!(cursor.pos(), 0);
    }

    #[test]
    fn test_read_optional() {
        let mut cursor = Cursor::new("[leftmargin=0.15in, label={}]body");
        assert_eq!(
            cursor.read_optional(),
            Some("leftmargin=0.15in, label={}")
        );
        assert_eq!(cursor.rest(), "body");

        let mut cursor = Cursor::new("[unterminated");
        assert_eq!(cursor.read_optional(), None);
        assert_eq!(cursor.pos(), 0);
    }

    #[test]
    fn test_find_closing_environment_nested() {
        let src = r"\item a \begin{itemize}\item b\end{itemize}\end{itemize} after";
        let cursor = Cursor::new(src);
        let closing = cursor.find_closing(Delimiter::Environment("itemize")).unwrap();
        assert_eq!(
            &src[..closing.body_end],
            r"\item a \begin{itemize}\item b\end{itemize}"
        );
        assert_eq!(&src[closing.resume..], " after");
    }

    #[test]
    fn test_find_closing_marker_distinguishes_prefixes() {
        let src = r"\resumeItem{x}\resumeItemListEnd tail";
        let cursor = Cursor::new(src);
        let closing = cursor
            .find_closing(Delimiter::Marker {
                open: "resumeItemListStart",
                close: "resumeItemListEnd",
            })
            .unwrap();
        assert_eq!(&src[..closing.body_end], r"\resumeItem{x}");
        assert_eq!(&src[closing.resume..], " tail");
    }

    #[test]
    fn test_split_items_keeps_nested_lists_whole() {
        let body = r" lead \item[a] one \begin{itemize}\item inner\end{itemize} \item two";
        let split = split_items(body);
        assert_eq!(split.lead, " lead ");
        assert_eq!(
            split.items,
            vec![r" one \begin{itemize}\item inner\end{itemize} ", " two"]
        );
    }

    #[test]
    fn test_split_resume_items() {
        let body = r"
            \resumeItem{First {nested}}
            \resumeItem{Second}
        ";
        let split = split_items(body);
        assert_eq!(split.lead.trim(), "");
        assert_eq!(split.items.len(), 2);
        assert!(split.items[0].trim_start().starts_with("{First {nested}}"));
        assert_eq!(split.items[1].trim(), "{Second}");
    }

    #[test]
    fn test_next_command_at_level_skips_groups() {
        let mut cursor = Cursor::new(r"text {\inner} \outer");
        let cmd = cursor.next_command_at_level().unwrap();
        assert_eq!(cmd.name, "outer");
        assert!(cursor.next_command_at_level().is_none());
    }
}
