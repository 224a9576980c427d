use std::collections::HashMap;
use std::sync::Arc;
use teloxide::types::ChatId;
use thiserror::Error;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use crate::bot_state::SessionStateTracker;
use crate::database::{GatewayError, PersistenceGateway};
use crate::models::{
    Field, FieldValue, PersistedQuestionnaire, QuestionnaireProgress, SessionState,
};

use super::draft_store::DraftStore;

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("no questionnaire draft in progress")]
    NoActiveDraft,
    #[error("user {0} is not registered")]
    UserNotFound(ChatId),
    #[error("questionnaire row was not updated")]
    UpdateRejected,
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Результат обработки ввода для поля
#[derive(Debug, Clone, PartialEq)]
pub enum InputOutcome {
    /// Значение записано, состояние переведено на next
    Accepted { value: FieldValue, next: SessionState },
    /// Ввод отклонен, состояние и черновик не изменены
    Rejected { reason: &'static str },
    NoActiveDraft,
}

// Блокировка на пользователя: операции одного пользователя строго
// последовательны, разные пользователи не мешают друг другу
#[derive(Clone, Default)]
struct UserLocks {
    inner: Arc<RwLock<HashMap<ChatId, Arc<Mutex<()>>>>>,
}

impl UserLocks {
    async fn acquire(&self, chat_id: ChatId) -> OwnedMutexGuard<()> {
        let existing = self.inner.read().await.get(&chat_id).cloned();
        let lock = match existing {
            Some(lock) => lock,
            None => self
                .inner
                .write()
                .await
                .entry(chat_id)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone(),
        };
        lock.lock_owned().await
    }
}

/// Машина состояний заполнения анкеты
#[derive(Clone)]
pub struct QuestionnaireEngine {
    gateway: Arc<dyn PersistenceGateway>,
    drafts: DraftStore,
    sessions: SessionStateTracker,
    locks: UserLocks,
}

impl QuestionnaireEngine {
    pub fn new(gateway: Arc<dyn PersistenceGateway>, sessions: SessionStateTracker) -> Self {
        Self {
            gateway,
            drafts: DraftStore::default(),
            sessions,
            locks: UserLocks::default(),
        }
    }

    /// Новый черновик и переход к первому полю
    pub async fn start(&self, chat_id: ChatId) -> Field {
        let _guard = self.locks.acquire(chat_id).await;
        self.drafts.start(chat_id).await;
        let first = Field::first();
        self.sessions
            .set(chat_id, SessionState::AwaitingField(first))
            .await;
        first
    }

    /// Валидация ввода, запись в черновик и переход к следующему полю.
    /// При отклонении состояние и черновик остаются прежними.
    pub async fn handle_field_input(
        &self,
        chat_id: ChatId,
        field: Field,
        text: &str,
    ) -> InputOutcome {
        let _guard = self.locks.acquire(chat_id).await;

        let value = match field.validate(text) {
            Ok(value) => value,
            Err(reason) => {
                log::debug!("Input for {:?} rejected for user {}", field, chat_id);
                return InputOutcome::Rejected { reason };
            }
        };

        if !self
            .drafts
            .update_field(chat_id, field, value.clone())
            .await
        {
            log::warn!("Field input from user {} without an active draft", chat_id);
            return InputOutcome::NoActiveDraft;
        }

        let next = match field.next() {
            Some(next_field) => SessionState::AwaitingField(next_field),
            None => SessionState::ConfirmingSave,
        };
        self.sessions.set(chat_id, next).await;

        InputOutcome::Accepted { value, next }
    }

    pub async fn progress(&self, chat_id: ChatId) -> QuestionnaireProgress {
        match self.drafts.get(chat_id).await {
            Some(draft) => draft.progress(),
            None => QuestionnaireProgress::empty(),
        }
    }

    /// Сохранение черновика: create для новой анкеты, update для существующей.
    /// Черновик и состояние очищаются только при успехе.
    pub async fn save(&self, chat_id: ChatId) -> Result<(), SaveError> {
        let _guard = self.locks.acquire(chat_id).await;

        let draft = self
            .drafts
            .get(chat_id)
            .await
            .ok_or(SaveError::NoActiveDraft)?;

        let user = self
            .gateway
            .find_user_by_identity(chat_id)
            .await?
            .ok_or(SaveError::UserNotFound(chat_id))?;

        let payload = serde_json::to_value(&draft).map_err(GatewayError::from)?;
        let status = draft.status.as_str();

        let existing = self.gateway.find_questionnaire_by_user(user.id).await?;
        if existing.is_some() {
            let updated = self
                .gateway
                .update_questionnaire(user.id, payload, status)
                .await?;
            if !updated {
                return Err(SaveError::UpdateRejected);
            }
        } else {
            self.gateway
                .create_questionnaire(user.id, payload, status)
                .await?;
        }

        self.drafts.remove(chat_id).await;
        self.sessions.clear(chat_id).await;
        log::info!("Questionnaire saved for user {}", chat_id);

        Ok(())
    }

    /// Отмена заполнения. Идемпотентна: false значит отменять было нечего.
    pub async fn cancel(&self, chat_id: ChatId) -> bool {
        let _guard = self.locks.acquire(chat_id).await;
        let was_active = self.drafts.remove(chat_id).await;
        self.sessions.clear(chat_id).await;
        if was_active {
            log::info!("Questionnaire cancelled for user {}", chat_id);
        }
        was_active
    }

    /// Сохраненная анкета пользователя, если есть
    pub async fn saved_questionnaire(
        &self,
        chat_id: ChatId,
    ) -> Result<Option<PersistedQuestionnaire>, GatewayError> {
        let user = match self.gateway.find_user_by_identity(chat_id).await? {
            Some(user) => user,
            None => return Ok(None),
        };
        self.gateway.find_questionnaire_by_user(user.id).await
    }

    /// Удаление сохраненной анкеты; черновик в памяти не трогается
    pub async fn delete_saved(&self, chat_id: ChatId) -> Result<bool, GatewayError> {
        let user = match self.gateway.find_user_by_identity(chat_id).await? {
            Some(user) => user,
            None => return Ok(false),
        };
        self.gateway.delete_questionnaire(user.id).await
    }
}
