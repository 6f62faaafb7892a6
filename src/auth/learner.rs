use std::future::{ready, Ready};

use actix_web::{FromRequest, HttpRequest};

use crate::errors::AppError;

/// Header set by the upstream session layer once the learner is authenticated.
pub const LEARNER_ID_HEADER: &str = "x-learner-id";

// Extractor for the learner a request acts for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LearnerId(pub String);

impl FromRequest for LearnerId {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let learner = req
            .headers()
            .get(LEARNER_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(|id| LearnerId(id.to_string()))
            .ok_or_else(|| AppError::Unauthorized("Missing learner identity".to_string()));

        ready(learner)
    }
}
