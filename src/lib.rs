//! Blackboard library exports for testing

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub mod core;
pub mod tui;

#[cfg(test)]
pub mod test_support;

/// Which editing surface to run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// One flat text buffer; commands become literal glyphs and delimiters.
    #[default]
    Raw,
    /// A tree of typed blocks with styled spans.
    Blocks,
}

impl Mode {
    pub fn label(self) -> &'static str {
        match self {
            Mode::Raw => "raw",
            Mode::Blocks => "blocks",
        }
    }
}
