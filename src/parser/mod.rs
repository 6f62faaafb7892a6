//! Markdown quiz parser.
//!
//! Turns one quiz document into a [`ParsedQuiz`]. Two authoring conventions are accepted:
//! inline `Answer:` / `Explanation:` annotations under each question, and a trailing
//! answer-key block of `N. **X** - explanation` lines. Malformed questions degrade to
//! warnings instead of failing the document.

pub mod chapter;
pub mod patterns;

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crate::config::Config;
use crate::models::domain::quiz::{
    truncate_chars, DEFAULT_PASSING_PERCENTAGE, DESCRIPTION_MAX_CHARS,
};
use crate::models::domain::{OptionKey, Quiz, QuizOption, QuizQuestion};

pub use chapter::{chapter_id_for, looks_like_quiz_document};
use patterns::{LegacyAnswer, LineKind};

#[derive(Clone, Debug)]
pub struct ParserOptions {
    pub chapter_prefix: String,
    pub passing_percentage: i32,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            chapter_prefix: "chapter-".to_string(),
            passing_percentage: DEFAULT_PASSING_PERCENTAGE,
        }
    }
}

impl ParserOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            chapter_prefix: config.chapter_prefix.clone(),
            passing_percentage: config.passing_percentage,
        }
    }
}

/// Data-quality issue found in a question that was still kept.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseWarning {
    MissingAnswer { question_id: String },
    AnswerNotAmongOptions { question_id: String, answer: OptionKey },
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseWarning::MissingAnswer { question_id } => {
                write!(f, "question {} has no correct answer", question_id)
            }
            ParseWarning::AnswerNotAmongOptions {
                question_id,
                answer,
            } => write!(
                f,
                "question {} names answer {} which is not one of its options",
                question_id, answer
            ),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedQuiz {
    pub chapter_id: String,
    pub title: String,
    pub description: String,
    pub passing_percentage: i32,
    pub questions: Vec<QuizQuestion>,
    pub warnings: Vec<ParseWarning>,
}

impl ParsedQuiz {
    pub fn into_quiz(self) -> Quiz {
        Quiz::new(
            &self.chapter_id,
            &self.title,
            &self.description,
            self.passing_percentage,
            self.questions,
        )
    }
}

#[derive(Clone, Debug, Default)]
pub struct QuizParser {
    options: ParserOptions,
}

impl QuizParser {
    pub fn new(options: ParserOptions) -> Self {
        Self { options }
    }

    /// Parses one document. `None` means the text holds no usable question.
    pub fn parse(&self, logical_path: &Path, text: &str) -> Option<ParsedQuiz> {
        let chapter_id = chapter_id_for(logical_path, &self.options.chapter_prefix);
        let lines: Vec<&str> = text.lines().collect();

        // Only the first top-level heading counts, even when it is all decoration.
        let title_idx = lines.iter().position(|line| patterns::is_title(line));
        let (title, description_start) = match title_idx {
            Some(idx) => (
                patterns::title_of(lines[idx]).unwrap_or_else(|| chapter_id.clone()),
                idx + 1,
            ),
            None => (chapter_id.clone(), 0),
        };
        let description = extract_description(&lines[description_start..]);

        let (mut questions, legacy_answers) = scan_questions(&lines);
        apply_legacy_answers(&mut questions, &legacy_answers);

        if questions.is_empty() {
            return None;
        }

        let warnings = collect_warnings(&questions);

        Some(ParsedQuiz {
            chapter_id,
            title,
            description,
            passing_percentage: self.options.passing_percentage,
            questions,
            warnings,
        })
    }
}

fn extract_description(lines: &[&str]) -> String {
    let mut parts = Vec::new();

    for line in lines {
        match patterns::classify(line) {
            LineKind::QuestionHeading { .. } => break,
            LineKind::Heading if line.to_lowercase().contains("question") => break,
            LineKind::Text(text)
                if !patterns::is_emphasis_only(text) && !patterns::is_list_item(text) =>
            {
                parts.push(text.trim());
            }
            _ => {}
        }
    }

    truncate_chars(&parts.join(" "), DESCRIPTION_MAX_CHARS)
}

struct QuestionBuilder {
    heading_title: String,
    text: Option<String>,
    options: Vec<QuizOption>,
    correct_answer: Option<OptionKey>,
    explanation: Option<String>,
}

impl QuestionBuilder {
    fn new(heading_title: String) -> Self {
        Self {
            heading_title,
            text: None,
            options: Vec::new(),
            correct_answer: None,
            explanation: None,
        }
    }

    fn accept(&mut self, line: LineKind<'_>) {
        if self.text.is_none() {
            match line {
                LineKind::Blank => return,
                LineKind::Text(text) => {
                    let text = patterns::strip_emphasis(text);
                    self.text = Some(if text.is_empty() {
                        self.heading_title.clone()
                    } else {
                        text
                    });
                    return;
                }
                // Anything structural means the question had no text line of its own.
                _ => self.text = Some(self.heading_title.clone()),
            }
        }

        match line {
            LineKind::Option(option) => self.options.push(option),
            LineKind::Answer(key) => self.correct_answer = Some(key),
            LineKind::Explanation(text) if !text.is_empty() => self.explanation = Some(text),
            _ => {}
        }
    }

    fn finish(self, position: usize) -> Option<QuizQuestion> {
        let text = self.text.unwrap_or(self.heading_title);
        if text.trim().is_empty() || self.options.is_empty() {
            log::debug!("Dropping question {}: no text or no options", position);
            return None;
        }

        Some(QuizQuestion {
            id: format!("q{}", position),
            text,
            options: self.options,
            correct_answer: self.correct_answer,
            explanation: self.explanation.unwrap_or_default(),
        })
    }
}

enum ScanState {
    AwaitingQuestion,
    BuildingQuestion(QuestionBuilder),
}

fn scan_questions(lines: &[&str]) -> (Vec<QuizQuestion>, BTreeMap<usize, LegacyAnswer>) {
    let mut questions = Vec::new();
    let mut legacy_answers = BTreeMap::new();
    let mut state = ScanState::AwaitingQuestion;

    for line in lines {
        let kind = patterns::classify(line);

        if let LineKind::LegacyAnswer(legacy) = &kind {
            legacy_answers.insert(legacy.ordinal, legacy.clone());
        }

        state = match (state, kind) {
            (ScanState::BuildingQuestion(builder), LineKind::QuestionHeading { title }) => {
                finalize(builder, &mut questions);
                ScanState::BuildingQuestion(QuestionBuilder::new(title))
            }
            (ScanState::AwaitingQuestion, LineKind::QuestionHeading { title }) => {
                ScanState::BuildingQuestion(QuestionBuilder::new(title))
            }
            (ScanState::BuildingQuestion(mut builder), kind) => {
                builder.accept(kind);
                ScanState::BuildingQuestion(builder)
            }
            (ScanState::AwaitingQuestion, _) => ScanState::AwaitingQuestion,
        };
    }

    if let ScanState::BuildingQuestion(builder) = state {
        finalize(builder, &mut questions);
    }

    (questions, legacy_answers)
}

fn finalize(builder: QuestionBuilder, questions: &mut Vec<QuizQuestion>) {
    if let Some(question) = builder.finish(questions.len() + 1) {
        questions.push(question);
    }
}

/// Fills gaps from the trailing answer key by 1-based position. Inline values win.
fn apply_legacy_answers(questions: &mut [QuizQuestion], legacy: &BTreeMap<usize, LegacyAnswer>) {
    for (idx, question) in questions.iter_mut().enumerate() {
        let Some(entry) = legacy.get(&(idx + 1)) else {
            continue;
        };

        if question.correct_answer.is_none() {
            question.correct_answer = Some(entry.key);
        }
        if question.explanation.is_empty() {
            question.explanation = entry.explanation.clone();
        }
    }
}

fn collect_warnings(questions: &[QuizQuestion]) -> Vec<ParseWarning> {
    let mut warnings = Vec::new();

    for question in questions {
        let question_id = question.id.clone();
        match question.correct_answer {
            None => warnings.push(ParseWarning::MissingAnswer { question_id }),
            Some(answer) if !question.has_option(answer) => {
                warnings.push(ParseWarning::AnswerNotAmongOptions {
                    question_id,
                    answer,
                })
            }
            Some(_) => {}
        }
    }

    warnings
}
