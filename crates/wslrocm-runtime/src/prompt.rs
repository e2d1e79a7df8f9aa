//! [`PromptPort`] adapters.
//!
//! # Feature Flags
//!
//! - `cli`: Enables `CliPrompt` which uses stdin/stdout for interactive prompts.
//!   Without this feature, only `NonInteractivePrompt` and `ScriptedPrompt`
//!   are available.
//!
//! `NonInteractivePrompt` refuses every question with
//! `PromptError::InputRequired`; nothing in the pipeline is ever answered on
//! the operator's behalf.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use tracing::{info, warn};
use wslrocm_core::ports::{PromptError, PromptPort, parse_confirmation};

/// Prompt for contexts without a terminal.
///
/// Questions fail with `InputRequired`; status lines go to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct NonInteractivePrompt;

impl PromptPort for NonInteractivePrompt {
    fn confirm(&self, message: &str, _default: bool) -> Result<bool, PromptError> {
        Err(PromptError::input_required(message))
    }

    fn input(&self, message: &str) -> Result<String, PromptError> {
        Err(PromptError::input_required(message))
    }

    fn info(&self, message: &str) {
        info!("{message}");
    }

    fn warn(&self, message: &str) {
        warn!("{message}");
    }
}

/// Prompt that replays prepared answers.
///
/// Every question, status line and warning is recorded in order so callers
/// can assert on what the operator would have seen. Running out of answers
/// behaves like a closed stdin.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: Mutex<VecDeque<String>>,
    transcript: Mutex<Vec<String>>,
}

impl ScriptedPrompt {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: Mutex::new(answers.into_iter().map(Into::into).collect()),
            transcript: Mutex::new(Vec::new()),
        }
    }

    /// Everything shown so far. Questions are prefixed `? `, warnings `! `.
    pub fn transcript(&self) -> Vec<String> {
        self.transcript
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Answers not consumed yet.
    pub fn remaining(&self) -> usize {
        self.answers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn record(&self, line: String) {
        self.transcript
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line);
    }

    fn next_answer(&self, message: &str) -> Result<String, PromptError> {
        self.record(format!("? {message}"));
        self.answers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .ok_or_else(|| PromptError::Closed {
                message: message.to_string(),
            })
    }
}

impl PromptPort for ScriptedPrompt {
    fn confirm(&self, message: &str, default: bool) -> Result<bool, PromptError> {
        let answer = self.next_answer(message)?;
        Ok(parse_confirmation(&answer, default))
    }

    fn input(&self, message: &str) -> Result<String, PromptError> {
        Ok(self.next_answer(message)?.trim().to_string())
    }

    fn info(&self, message: &str) {
        self.record(message.to_string());
    }

    fn warn(&self, message: &str) {
        self.record(format!("! {message}"));
    }
}

/// Interactive stdin/stdout prompt.
///
/// This is only available with the `cli` feature flag.
#[cfg(feature = "cli")]
pub mod cli_prompt {
    use std::io::{self, BufRead, Write};

    use super::{PromptError, PromptPort, parse_confirmation};

    #[derive(Debug, Default, Clone, Copy)]
    pub struct CliPrompt;

    impl CliPrompt {
        pub const fn new() -> Self {
            Self
        }

        fn read_line(prompt: &str, message: &str) -> Result<String, PromptError> {
            print!("{prompt}");
            io::stdout().flush()?;

            let mut input = String::new();
            let read = io::stdin().lock().read_line(&mut input)?;
            if read == 0 {
                return Err(PromptError::Closed {
                    message: message.to_string(),
                });
            }
            Ok(input)
        }
    }

    impl PromptPort for CliPrompt {
        fn confirm(&self, message: &str, default: bool) -> Result<bool, PromptError> {
            let suffix = if default { "[Y/n]" } else { "[y/N]" };
            let input = Self::read_line(&format!("{message} {suffix}: "), message)?;
            Ok(parse_confirmation(&input, default))
        }

        fn input(&self, message: &str) -> Result<String, PromptError> {
            let input = Self::read_line(&format!("{message}: "), message)?;
            Ok(input.trim().to_string())
        }

        fn info(&self, message: &str) {
            println!("{message}");
        }

        fn warn(&self, message: &str) {
            eprintln!("⚠️  {message}");
        }
    }
}

#[cfg(feature = "cli")]
pub use cli_prompt::CliPrompt;
