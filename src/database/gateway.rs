use async_trait::async_trait;
use teloxide::types::ChatId;
use thiserror::Error;

use crate::models::{PersistedQuestionnaire, UserRecord};

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// CRUD-контракт хранилища. Ядро анкеты работает только через этот трейт.
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// Поиск пользователя по идентификатору в Telegram
    async fn find_user_by_identity(&self, chat_id: ChatId)
        -> Result<Option<UserRecord>, GatewayError>;

    /// Создание пользователя, возвращает id записи
    async fn create_user(
        &self,
        chat_id: ChatId,
        username: Option<&str>,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> Result<i64, GatewayError>;

    async fn find_questionnaire_by_user(
        &self,
        user_id: i64,
    ) -> Result<Option<PersistedQuestionnaire>, GatewayError>;

    /// Создание анкеты, возвращает id записи
    async fn create_questionnaire(
        &self,
        user_id: i64,
        payload: serde_json::Value,
        status: &str,
    ) -> Result<i64, GatewayError>;

    /// Обновление анкеты на месте; false если строки не было
    async fn update_questionnaire(
        &self,
        user_id: i64,
        payload: serde_json::Value,
        status: &str,
    ) -> Result<bool, GatewayError>;

    /// Удаление анкеты; false если строки не было
    async fn delete_questionnaire(&self, user_id: i64) -> Result<bool, GatewayError>;
}
