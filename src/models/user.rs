use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Запись пользователя в таблице users
#[derive(Debug, Clone, FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub telegram_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Сохраненная анкета (одна на пользователя)
#[derive(Debug, Clone, FromRow)]
pub struct PersistedQuestionnaire {
    pub id: i64,
    pub user_id: i64,
    pub data: serde_json::Value,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
