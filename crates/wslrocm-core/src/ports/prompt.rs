//! User prompt abstraction.
//!
//! The provisioning steps ask the operator questions and print status lines
//! through [`PromptPort`], so a terminal, a test script, or a non-interactive
//! context can stand behind them.

use thiserror::Error;

/// Errors that can occur while prompting.
#[derive(Debug, Error)]
pub enum PromptError {
    /// Reading from or writing to the terminal failed.
    #[error("Failed to read user input: {0}")]
    Io(#[from] std::io::Error),

    /// A question was asked where nobody can answer it.
    #[error("User input required: {message}")]
    InputRequired { message: String },

    /// Standard input was closed before an answer arrived.
    #[error("Input closed while waiting for: {message}")]
    Closed { message: String },
}

impl PromptError {
    pub fn input_required(message: impl Into<String>) -> Self {
        Self::InputRequired {
            message: message.into(),
        }
    }
}

/// Port for interactive questions and user-facing status output.
pub trait PromptPort: Send + Sync {
    /// Ask a yes/no question.
    ///
    /// Returns `default` on empty or unrecognised input.
    fn confirm(&self, message: &str, default: bool) -> Result<bool, PromptError>;

    /// Ask for a line of free text. The answer is returned trimmed.
    fn input(&self, message: &str) -> Result<String, PromptError>;

    /// Display an informational message.
    fn info(&self, message: &str);

    /// Display a warning message.
    fn warn(&self, message: &str);
}

/// Interpret a yes/no answer.
///
/// `y`/`yes` (any case) confirm, `n`/`no` decline, anything else yields `default`.
pub fn parse_confirmation(input: &str, default: bool) -> bool {
    match input.trim().to_lowercase().as_str() {
        "y" | "yes" => true,
        "n" | "no" => false,
        _ => default,
    }
}
