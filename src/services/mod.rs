pub mod quiz_attempt_service;
pub mod quiz_import_service;
pub mod quiz_service;
