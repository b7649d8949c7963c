//! Markup parsing module.
//!
//! Two stages: the [`Normalizer`] strips scaffolding and resolves the
//! line-break and separator idioms to markers, then the [`Transpiler`]
//! walks the normalized text and builds the content tree.

mod builder;
mod commands;
mod normalize;
mod options;
mod scanner;
mod transpiler;

pub use normalize::{Normalizer, LINE_BREAK, SEPARATOR};
pub use options::{EntryPolicy, NormalizeOptions, TranspileOptions};
pub use transpiler::Transpiler;

use crate::model::ConversionResult;

/// Normalize and transpile markup in one step.
pub fn parse(markup: &str, options: &TranspileOptions) -> ConversionResult {
    let normalized = Normalizer::new(options.normalize.clone()).normalize(markup);
    Transpiler::new(options.clone()).transpile(&normalized)
}
