//! Line patterns recognised in quiz documents.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::domain::{OptionKey, QuizOption};

static TITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#\s+(.+?)\s*$").expect("TITLE_RE is a valid regex pattern"));

static QUESTION_HEADING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#{2,4}\s*(?i:question)\s+\d+\s*[:.\-–—]?\s*(.*?)\s*$")
        .expect("QUESTION_HEADING_RE is a valid regex pattern")
});

static OPTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:[-*+]\s+)?(?:\*\*|__)?([A-D])(?:\*\*|__)?\)(?:\*\*|__)?\s*(.+?)\s*$")
        .expect("OPTION_RE is a valid regex pattern")
});

static ANSWER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?:[-+>]\s*)?(?:\*\*|__|\*|_)?\s*(?i:correct\s+answer|answer)\s*(?:\*\*|__|\*|_)?\s*:\s*(?:\*\*|__|\*|_)?\s*([A-D])\b",
    )
    .expect("ANSWER_RE is a valid regex pattern")
});

static EXPLANATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?:[-+>]\s*)?(?:\*\*|__|\*|_)?\s*(?i:explanation)\s*(?:\*\*|__|\*|_)?\s*:\s*(.*?)\s*$",
    )
    .expect("EXPLANATION_RE is a valid regex pattern")
});

static LEGACY_ANSWER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d+)\.\s*\*\*([A-D])\)?\*\*\s*[-–—:]\s*(.*?)\s*$")
        .expect("LEGACY_ANSWER_RE is a valid regex pattern")
});

static HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#{1,6}\s").expect("HEADING_RE is a valid regex pattern"));

static LIST_ITEM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:[-*+]|\d+[.)])\s+").expect("LIST_ITEM_RE is a valid regex pattern")
});

static RULE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:-{3,}|\*{3,}|_{3,})\s*$").expect("RULE_RE is a valid regex pattern")
});

/// What a single source line means to the question scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    Blank,
    Rule,
    QuestionHeading { title: String },
    Option(QuizOption),
    Answer(OptionKey),
    Explanation(String),
    LegacyAnswer(LegacyAnswer),
    Heading,
    Text(&'a str),
}

/// Entry of a trailing answer-key block, `N. **X** - explanation`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyAnswer {
    pub ordinal: usize,
    pub key: OptionKey,
    pub explanation: String,
}

pub fn classify(line: &str) -> LineKind<'_> {
    if line.trim().is_empty() {
        return LineKind::Blank;
    }

    if RULE_RE.is_match(line) {
        return LineKind::Rule;
    }

    if let Some(caps) = QUESTION_HEADING_RE.captures(line) {
        return LineKind::QuestionHeading {
            title: strip_emphasis(&caps[1]),
        };
    }

    if let Some(legacy) = legacy_answer(line) {
        return LineKind::LegacyAnswer(legacy);
    }

    if let Some(caps) = OPTION_RE.captures(line) {
        let text = strip_emphasis(&caps[2]);
        if let (Ok(key), false) = (caps[1].parse::<OptionKey>(), text.is_empty()) {
            return LineKind::Option(QuizOption { key, text });
        }
    }

    if let Some(caps) = ANSWER_RE.captures(line) {
        if let Ok(key) = caps[1].parse::<OptionKey>() {
            return LineKind::Answer(key);
        }
    }

    if let Some(caps) = EXPLANATION_RE.captures(line) {
        return LineKind::Explanation(strip_emphasis(&caps[1]));
    }

    if HEADING_RE.is_match(line) {
        return LineKind::Heading;
    }

    LineKind::Text(line)
}

fn legacy_answer(line: &str) -> Option<LegacyAnswer> {
    let caps = LEGACY_ANSWER_RE.captures(line)?;
    let ordinal = caps[1].parse::<usize>().ok()?;
    let key = caps[2].parse::<OptionKey>().ok()?;

    Some(LegacyAnswer {
        ordinal,
        key,
        explanation: strip_emphasis(&caps[3]),
    })
}

pub fn is_title(line: &str) -> bool {
    TITLE_RE.is_match(line)
}

/// Text of the first top-level `# ` heading, decorations removed.
pub fn title_of(line: &str) -> Option<String> {
    let caps = TITLE_RE.captures(line)?;
    let title = strip_decorations(&caps[1]);
    (!title.is_empty()).then_some(title)
}

pub fn is_heading(line: &str) -> bool {
    HEADING_RE.is_match(line)
}

pub fn is_list_item(line: &str) -> bool {
    LIST_ITEM_RE.is_match(line)
}

/// `*text*`, `**text**`, `_text_` and friends with nothing around them.
pub fn is_emphasis_only(line: &str) -> bool {
    let trimmed = line.trim();
    let markers = ['*', '_'];
    trimmed.len() > 2
        && trimmed.starts_with(markers)
        && trimmed.ends_with(markers)
        && !strip_emphasis(trimmed).is_empty()
}

pub fn strip_emphasis(text: &str) -> String {
    text.trim()
        .trim_matches(|c| c == '*' || c == '_')
        .trim()
        .to_string()
}

/// Drops emoji and other symbols, then collapses whitespace.
pub fn strip_decorations(text: &str) -> String {
    let kept: String = text
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || c.is_ascii_punctuation())
        .collect();

    strip_emphasis(&kept)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
