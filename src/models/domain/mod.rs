pub mod quiz;
pub mod quiz_attempt;
pub mod quiz_question;
pub use quiz::Quiz;
pub use quiz_attempt::{QuestionResult, QuizAttempt};
pub use quiz_question::{OptionKey, QuizOption, QuizQuestion};
