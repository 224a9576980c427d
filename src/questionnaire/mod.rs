pub mod draft_store;
pub mod engine;

pub use draft_store::DraftStore;
pub use engine::{InputOutcome, QuestionnaireEngine, SaveError};
