//! Resolution of an existing application directory.

use std::fmt;
use std::str::FromStr;

/// What to do when the application directory already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictChoice {
    /// Delete the directory and clone a fresh copy.
    Remove,
    /// Move the directory aside with a timestamp suffix, then clone.
    Rename,
    /// Leave everything untouched and end the run with exit code 0.
    Exit,
}

impl ConflictChoice {
    /// Keywords accepted at the prompt.
    pub const KEYWORDS: [&'static str; 3] = ["remove", "rename", "exit"];

    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Remove => "remove",
            Self::Rename => "rename",
            Self::Exit => "exit",
        }
    }
}

impl fmt::Display for ConflictChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for ConflictChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "remove" => Ok(Self::Remove),
            "rename" => Ok(Self::Rename),
            "exit" => Ok(Self::Exit),
            other => Err(format!(
                "'{other}' is not one of: {}",
                Self::KEYWORDS.join(", ")
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_keywords_case_insensitively() {
        assert_eq!("remove".parse(), Ok(ConflictChoice::Remove));
        assert_eq!(" Rename\n".parse(), Ok(ConflictChoice::Rename));
        assert_eq!("EXIT".parse(), Ok(ConflictChoice::Exit));
    }

    #[test]
    fn rejects_anything_else() {
        let err = "delete".parse::<ConflictChoice>().unwrap_err();
        assert!(err.contains("remove, rename, exit"));
        assert!("".parse::<ConflictChoice>().is_err());
    }
}
