//! Normalizing and transpiling options.

/// Options for the markup normalizer.
#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    /// Normalize Unicode to NFC form
    pub normalize_unicode: bool,

    /// Collapse runs of blank lines into a single blank line
    pub collapse_blank_lines: bool,
}

impl NormalizeOptions {
    /// Create new normalize options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable Unicode NFC normalization.
    pub fn with_unicode_normalization(mut self, enabled: bool) -> Self {
        self.normalize_unicode = enabled;
        self
    }

    /// Enable or disable blank line collapsing.
    pub fn with_blank_line_collapsing(mut self, enabled: bool) -> Self {
        self.collapse_blank_lines = enabled;
        self
    }
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            normalize_unicode: true,
            collapse_blank_lines: true,
        }
    }
}

/// Options for transpiling markup into a content tree.
#[derive(Debug, Clone)]
pub struct TranspileOptions {
    /// Normalizer options applied before transpiling
    pub normalize: NormalizeOptions,

    /// What to do with a subheading entry missing arguments
    pub malformed_entries: EntryPolicy,

    /// Keep the argument of unknown commands as content
    pub unwrap_unknown: bool,

    /// Convert dashes, ties and TeX quotes to typographic characters
    pub typography: bool,

    /// Maximum group nesting before content is flattened to text
    pub max_depth: usize,
}

impl TranspileOptions {
    /// Create new transpile options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop malformed entries instead of padding them.
    pub fn strict(mut self) -> Self {
        self.malformed_entries = EntryPolicy::Drop;
        self
    }

    /// Set the malformed entry policy.
    pub fn with_entry_policy(mut self, policy: EntryPolicy) -> Self {
        self.malformed_entries = policy;
        self
    }

    /// Set normalizer options.
    pub fn with_normalize_options(mut self, options: NormalizeOptions) -> Self {
        self.normalize = options;
        self
    }

    /// Keep or drop the argument of unknown commands.
    pub fn with_unwrap_unknown(mut self, unwrap: bool) -> Self {
        self.unwrap_unknown = unwrap;
        self
    }

    /// Enable or disable typographic replacements.
    pub fn with_typography(mut self, enabled: bool) -> Self {
        self.typography = enabled;
        self
    }

    /// Set the maximum nesting depth.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth.max(1);
        self
    }
}

impl Default for TranspileOptions {
    fn default() -> Self {
        Self {
            normalize: NormalizeOptions::default(),
            malformed_entries: EntryPolicy::Degrade,
            unwrap_unknown: true,
            typography: true,
            max_depth: 64,
        }
    }
}

/// Handling of a `\resumeSubheading` with fewer than four arguments.
///
/// Both policies record a warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryPolicy {
    /// Emit the entry with missing fields left empty
    #[default]
    Degrade,
    /// Leave the entry out of the tree
    Drop,
}
