use std::env;
use std::path::PathBuf;

use secrecy::SecretString;

use crate::errors::{AppError, AppResult};

#[derive(Clone, Debug)]
pub struct Config {
    pub mongo_conn_string: SecretString,
    pub mongo_db_name: String,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub cors_allowed_origin: Option<String>,
    pub content_dir: PathBuf,
    pub chapter_prefix: String,
    pub passing_percentage: i32,
    pub reject_unknown_answers: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            mongo_conn_string: SecretString::from(
                env::var("MONGO_CONN_STRING")
                    .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            ),
            mongo_db_name: env::var("MONGO_DB_NAME")
                .unwrap_or_else(|_| "chapter-quiz-local".to_string()),
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "localhost".to_string()),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN")
                .ok()
                .filter(|origin| !origin.trim().is_empty()),
            content_dir: env::var("QUIZ_CONTENT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("docs")),
            chapter_prefix: env::var("QUIZ_CHAPTER_PREFIX")
                .unwrap_or_else(|_| "chapter-".to_string()),
            passing_percentage: env::var("QUIZ_PASSING_PERCENTAGE")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(70),
            reject_unknown_answers: env::var("QUIZ_REJECT_UNKNOWN_ANSWERS")
                .ok()
                .and_then(|v| parse_flag(&v))
                .unwrap_or(true),
        }
    }

    /// Rejects values the parser and grader cannot work with.
    pub fn validate(&self) -> AppResult<()> {
        if !(0..=100).contains(&self.passing_percentage) {
            return Err(AppError::ValidationError(format!(
                "QUIZ_PASSING_PERCENTAGE must be between 0 and 100, got {}",
                self.passing_percentage
            )));
        }

        if self.chapter_prefix.trim().is_empty() {
            return Err(AppError::ValidationError(
                "QUIZ_CHAPTER_PREFIX must not be empty".to_string(),
            ));
        }

        if self.mongo_db_name.trim().is_empty() {
            return Err(AppError::ValidationError(
                "MONGO_DB_NAME must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            mongo_conn_string: SecretString::from("mongodb://localhost:27017".to_string()),
            mongo_db_name: "chapter-quiz-test".to_string(),
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            cors_allowed_origin: None,
            content_dir: PathBuf::from("docs"),
            chapter_prefix: "chapter-".to_string(),
            passing_percentage: 70,
            reject_unknown_answers: true,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
