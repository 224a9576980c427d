use std::collections::HashMap;
use std::sync::Arc;
use teloxide::types::ChatId;
use tokio::sync::RwLock;

use crate::models::{Field, FieldValue, QuestionnaireDraft};

/// Черновики анкет в памяти, не больше одного на пользователя
#[derive(Clone, Default)]
pub struct DraftStore {
    drafts: Arc<RwLock<HashMap<ChatId, QuestionnaireDraft>>>,
}

impl DraftStore {
    /// Новый черновик; несохраненный предыдущий затирается
    pub async fn start(&self, chat_id: ChatId) -> QuestionnaireDraft {
        let draft = QuestionnaireDraft::new();
        self.drafts.write().await.insert(chat_id, draft.clone());
        log::info!("Questionnaire draft started for user {}", chat_id);
        draft
    }

    pub async fn get(&self, chat_id: ChatId) -> Option<QuestionnaireDraft> {
        self.drafts.read().await.get(&chat_id).cloned()
    }

    /// Запись значения поля; false если черновика нет
    pub async fn update_field(&self, chat_id: ChatId, field: Field, value: FieldValue) -> bool {
        let mut drafts = self.drafts.write().await;
        match drafts.get_mut(&chat_id) {
            Some(draft) => {
                draft.set(field, value);
                log::debug!("Field {:?} updated for user {}", field, chat_id);
                true
            }
            None => false,
        }
    }

    /// Удаление черновика; false если удалять было нечего
    pub async fn remove(&self, chat_id: ChatId) -> bool {
        self.drafts.write().await.remove(&chat_id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const USER: ChatId = ChatId(100);

    #[tokio::test]
    async fn start_creates_fresh_draft() {
        let store = DraftStore::default();
        assert!(store.get(USER).await.is_none());

        store.start(USER).await;
        let draft = store.get(USER).await.unwrap();
        assert!(draft.full_name.is_empty());
        assert_eq!(draft.filled_count(), 0);
    }

    #[tokio::test]
    async fn start_discards_previous_draft() {
        let store = DraftStore::default();
        store.start(USER).await;
        store
            .update_field(USER, Field::FullName, FieldValue::Text("Ivan".into()))
            .await;

        store.start(USER).await;
        assert!(store.get(USER).await.unwrap().full_name.is_empty());
    }

    #[tokio::test]
    async fn update_field_without_draft_fails() {
        let store = DraftStore::default();
        let updated = store
            .update_field(USER, Field::Age, FieldValue::Number(30))
            .await;
        assert!(!updated);
    }

    #[tokio::test]
    async fn update_refreshes_updated_at() {
        let store = DraftStore::default();
        store.start(USER).await;
        let before = store.get(USER).await.unwrap().updated_at;

        store
            .update_field(USER, Field::Phone, FieldValue::Text("+1 5551234567".into()))
            .await;
        let after = store.get(USER).await.unwrap();
        assert_eq!(after.phone, "+1 5551234567");
        assert!(after.updated_at >= before);
    }

    #[tokio::test]
    async fn remove_reports_presence() {
        let store = DraftStore::default();
        assert!(!store.remove(USER).await);
        store.start(USER).await;
        assert!(store.remove(USER).await);
        assert!(store.get(USER).await.is_none());
    }

    #[tokio::test]
    async fn drafts_are_isolated_per_user() {
        let store = DraftStore::default();
        let other = ChatId(200);
        store.start(USER).await;
        store.start(other).await;
        store
            .update_field(USER, Field::FullName, FieldValue::Text("Ivan".into()))
            .await;

        assert_eq!(store.get(USER).await.unwrap().full_name, "Ivan");
        assert!(store.get(other).await.unwrap().full_name.is_empty());
    }
}
