pub mod health_handler;
pub mod quiz_handler;

use actix_web::web;

use crate::errors::AppError;

pub use health_handler::{health_check, health_check_live, health_check_ready};
pub use quiz_handler::{get_attempt, get_quiz, list_attempts, list_quizzes, submit_attempt};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(health_check)
        .service(health_check_ready)
        .service(health_check_live)
        .service(list_quizzes)
        .service(get_quiz)
        .service(submit_attempt)
        .service(list_attempts)
        .service(get_attempt);
}

/// Malformed JSON bodies come back in the same error shape as everything else.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(64 * 1024)
        .error_handler(|err, _req| AppError::ValidationError(err.to_string()).into())
}
