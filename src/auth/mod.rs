pub mod learner;

pub use learner::{LearnerId, LEARNER_ID_HEADER};
