use std::collections::HashMap;
use std::sync::Arc;
use teloxide::types::ChatId;
use tokio::sync::RwLock;

use crate::catalog::Catalog;
use crate::database::Database;
use crate::models::SessionState;
use crate::questionnaire::QuestionnaireEngine;

type StateMap = Arc<RwLock<HashMap<ChatId, SessionState>>>;

/// Текущее положение каждого пользователя в диалоге.
/// Отсутствие записи означает Idle.
#[derive(Clone, Default)]
pub struct SessionStateTracker {
    states: StateMap,
}

impl SessionStateTracker {
    pub async fn get(&self, chat_id: ChatId) -> SessionState {
        self.states
            .read()
            .await
            .get(&chat_id)
            .copied()
            .unwrap_or_default()
    }

    pub async fn set(&self, chat_id: ChatId, state: SessionState) {
        if state == SessionState::Idle {
            // Idle не храним, чтобы карта не росла на брошенных сессиях
            self.states.write().await.remove(&chat_id);
        } else {
            self.states.write().await.insert(chat_id, state);
        }
    }

    pub async fn clear(&self, chat_id: ChatId) {
        self.states.write().await.remove(&chat_id);
    }

    pub async fn is_in_questionnaire(&self, chat_id: ChatId) -> bool {
        self.get(chat_id).await.is_in_questionnaire()
    }
}

#[derive(Clone)]
pub struct BotState {
    pub db: Database,
    pub catalog: Catalog,
    pub sessions: SessionStateTracker,
    pub engine: QuestionnaireEngine,
}

impl BotState {
    pub fn new(db: Database, catalog: Catalog) -> Self {
        let sessions = SessionStateTracker::default();
        let engine = QuestionnaireEngine::new(Arc::new(db.clone()), sessions.clone());
        Self {
            db,
            catalog,
            sessions,
            engine,
        }
    }
}
