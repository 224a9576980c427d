pub mod field;
pub mod questionnaire;
pub mod session_state;
pub mod user;

pub use field::{Field, FieldValue, FIELD_COUNT};
pub use questionnaire::{QuestionnaireDraft, QuestionnaireProgress, QuestionnaireStatus};
pub use session_state::SessionState;
pub use user::{PersistedQuestionnaire, UserRecord};
