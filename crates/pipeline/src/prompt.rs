//! Prompt template loading and rendering.
//!
//! The built-in template ships compiled into the binary; deployments can
//! override it with a file. Placeholders are literal `{tone}`,
//! `{max_length}`, `{platform}` and `{product_data}` tokens replaced by
//! plain substitution, not a template engine.

use std::fs;
use std::io;
use std::path::Path;

use crate::pipeline::GenerationOptions;

/// Token the model is instructed to emit between ad text and rationale.
pub const RESPONSE_SEPARATOR: &str = "---REFERENCE_STRATEGY_SEPARATOR---";

const BUILTIN_TEMPLATE: &str = include_str!("../templates/ad_generation.txt");

/// An ad-generation prompt template.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    text: String,
}

impl PromptTemplate {
    /// The compiled-in default template.
    pub fn builtin() -> Self {
        Self {
            text: BUILTIN_TEMPLATE.to_string(),
        }
    }

    /// Load a template override from disk.
    pub fn from_file(path: &Path) -> io::Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(Self { text })
    }

    /// Substitute generation options and the product JSON block into the
    /// template.
    pub fn render(&self, opts: &GenerationOptions, product_data: &str) -> String {
        self.text
            .replace("{platform}", &opts.platform)
            .replace("{tone}", &opts.tone)
            .replace("{max_length}", &opts.max_length.to_string())
            .replace("{product_data}", product_data)
    }
}
