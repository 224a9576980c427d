use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Row;
use std::time::Duration;
use teloxide::types::ChatId;

pub mod gateway;

pub use gateway::{GatewayError, PersistenceGateway};

use crate::models::{PersistedQuestionnaire, UserRecord};

#[derive(Clone, Debug)]
pub struct Database {
    pub pool: PgPool,
}

impl Database {
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(20)
            .min_connections(5)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(1800))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        Ok(Database { pool })
    }

    pub async fn init(&self) -> Result<(), sqlx::Error> {
        // Таблица users
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id BIGSERIAL PRIMARY KEY,
                telegram_id BIGINT NOT NULL UNIQUE,
                username TEXT,
                first_name TEXT,
                last_name TEXT,
                created_at TIMESTAMP WITH TIME ZONE DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        // Таблица questionnaires: не больше одной анкеты на пользователя
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS questionnaires (
                id BIGSERIAL PRIMARY KEY,
                user_id BIGINT NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
                data JSONB NOT NULL,
                status TEXT NOT NULL DEFAULT 'draft',
                created_at TIMESTAMP WITH TIME ZONE DEFAULT NOW(),
                updated_at TIMESTAMP WITH TIME ZONE DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_users_telegram_id ON users (telegram_id)")
            .execute(&self.pool)
            .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_questionnaires_user_id ON questionnaires (user_id)",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_questionnaires_status ON questionnaires (status)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl PersistenceGateway for Database {
    async fn find_user_by_identity(
        &self,
        chat_id: ChatId,
    ) -> Result<Option<UserRecord>, GatewayError> {
        let user = sqlx::query_as::<_, UserRecord>(
            "SELECT id, telegram_id, username, first_name, last_name, created_at
             FROM users WHERE telegram_id = $1",
        )
        .bind(chat_id.0)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create_user(
        &self,
        chat_id: ChatId,
        username: Option<&str>,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> Result<i64, GatewayError> {
        let row = sqlx::query(
            r#"
            INSERT INTO users (telegram_id, username, first_name, last_name, created_at)
            VALUES ($1, $2, $3, $4, NOW())
            RETURNING id
            "#,
        )
        .bind(chat_id.0)
        .bind(username)
        .bind(first_name)
        .bind(last_name)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.get("id"))
    }

    async fn find_questionnaire_by_user(
        &self,
        user_id: i64,
    ) -> Result<Option<PersistedQuestionnaire>, GatewayError> {
        let questionnaire = sqlx::query_as::<_, PersistedQuestionnaire>(
            "SELECT id, user_id, data, status, created_at, updated_at
             FROM questionnaires WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(questionnaire)
    }

    async fn create_questionnaire(
        &self,
        user_id: i64,
        payload: serde_json::Value,
        status: &str,
    ) -> Result<i64, GatewayError> {
        let row = sqlx::query(
            r#"
            INSERT INTO questionnaires (user_id, data, status, created_at, updated_at)
            VALUES ($1, $2, $3, NOW(), NOW())
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(payload)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.get("id"))
    }

    async fn update_questionnaire(
        &self,
        user_id: i64,
        payload: serde_json::Value,
        status: &str,
    ) -> Result<bool, GatewayError> {
        let result = sqlx::query(
            r#"
            UPDATE questionnaires
            SET data = $1, status = $2, updated_at = NOW()
            WHERE user_id = $3
            "#,
        )
        .bind(payload)
        .bind(status)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_questionnaire(&self, user_id: i64) -> Result<bool, GatewayError> {
        let result = sqlx::query("DELETE FROM questionnaires WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
