use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Letter key of a multiple-choice option. Only `A` to `D` exist.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub enum OptionKey {
    A,
    B,
    C,
    D,
}

impl OptionKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionKey::A => "A",
            OptionKey::B => "B",
            OptionKey::C => "C",
            OptionKey::D => "D",
        }
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptionKey {
    type Err = String;

    // Case-sensitive: "b" is not a key.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(OptionKey::A),
            "B" => Ok(OptionKey::B),
            "C" => Ok(OptionKey::C),
            "D" => Ok(OptionKey::D),
            other => Err(format!("'{}' is not an option key", other)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizOption {
    pub key: OptionKey,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizQuestion {
    pub id: String, // q1, q2, ... in document order
    pub text: String,
    pub options: Vec<QuizOption>,
    pub correct_answer: Option<OptionKey>, // None only for malformed source documents
    #[serde(default)]
    pub explanation: String,
}

impl QuizQuestion {
    pub fn has_option(&self, key: OptionKey) -> bool {
        self.options.iter().any(|o| o.key == key)
    }

    /// A question is gradable when its answer key names one of its options.
    pub fn is_valid(&self) -> bool {
        self.correct_answer
            .map(|key| self.has_option(key))
            .unwrap_or(false)
    }
}
