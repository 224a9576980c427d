use teloxide::prelude::*;
use teloxide::types::{KeyboardButton, KeyboardMarkup, ReplyMarkup, User};

use crate::bot_state::BotState;
use crate::database::PersistenceGateway;
use crate::models::{PersistedQuestionnaire, QuestionnaireDraft};

/// Главное меню
pub fn main_menu_keyboard() -> ReplyMarkup {
    ReplyMarkup::Keyboard(
        KeyboardMarkup::new(vec![
            vec![KeyboardButton::new("📚 Содержание модуля")],
            vec![KeyboardButton::new("📝 Заполнить анкету")],
            vec![
                KeyboardButton::new("ℹ️ Информация"),
                KeyboardButton::new("🔧 Админ панель"),
            ],
        ])
        .resize_keyboard(),
    )
}

/// Клавиатура во время заполнения анкеты
pub fn cancel_keyboard() -> ReplyMarkup {
    ReplyMarkup::Keyboard(
        KeyboardMarkup::new(vec![vec![KeyboardButton::new("❌ Отменить заполнение")]])
            .resize_keyboard(),
    )
}

/// Клавиатура после последнего поля: сохранить, перезаполнить или отменить
pub fn review_keyboard() -> ReplyMarkup {
    ReplyMarkup::Keyboard(
        KeyboardMarkup::new(vec![
            vec![KeyboardButton::new("💾 Сохранить анкету")],
            vec![KeyboardButton::new("✏️ Редактировать")],
            vec![KeyboardButton::new("❌ Отменить")],
        ])
        .resize_keyboard(),
    )
}

/// Меню существующей анкеты
pub fn questionnaire_menu_keyboard() -> ReplyMarkup {
    ReplyMarkup::Keyboard(
        KeyboardMarkup::new(vec![
            vec![KeyboardButton::new("👁️ Просмотреть анкету")],
            vec![KeyboardButton::new("✏️ Редактировать анкету")],
            vec![KeyboardButton::new("🗑️ Удалить анкету")],
            vec![KeyboardButton::new("🔙 Назад в меню")],
        ])
        .resize_keyboard(),
    )
}

/// Клавиатура после просмотра анкеты
pub fn questionnaire_view_keyboard() -> ReplyMarkup {
    ReplyMarkup::Keyboard(
        KeyboardMarkup::new(vec![
            vec![KeyboardButton::new("✏️ Редактировать анкету")],
            vec![KeyboardButton::new("🗑️ Удалить анкету")],
            vec![KeyboardButton::new("🔙 Назад в меню")],
        ])
        .resize_keyboard(),
    )
}

/// Регистрация пользователя при первом обращении
pub async fn ensure_user_exists(state: &BotState, chat_id: ChatId, user: Option<&User>) -> bool {
    match state.db.find_user_by_identity(chat_id).await {
        Ok(Some(_)) => true,
        Ok(None) => {
            let username = user.and_then(|u| u.username.as_deref());
            let first_name = user.map(|u| u.first_name.as_str());
            let last_name = user.and_then(|u| u.last_name.as_deref());

            match state
                .db
                .create_user(chat_id, username, first_name, last_name)
                .await
            {
                Ok(id) => {
                    log::info!("👤 New user {} registered with id {}", chat_id, id);
                    true
                }
                Err(e) => {
                    log::error!("Error creating user {}: {}", chat_id, e);
                    false
                }
            }
        }
        Err(e) => {
            log::error!("Error looking up user {}: {}", chat_id, e);
            false
        }
    }
}

pub async fn send_main_menu(
    bot: &Bot,
    chat_id: ChatId,
    text: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    bot.send_message(chat_id, text)
        .reply_markup(main_menu_keyboard())
        .await?;
    Ok(())
}

fn value_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}

/// Текст сохраненной анкеты для просмотра
pub fn format_questionnaire(questionnaire: &PersistedQuestionnaire) -> String {
    let created = questionnaire.created_at.format("%d.%m.%Y %H:%M");
    let updated = questionnaire.updated_at.format("%d.%m.%Y %H:%M");

    match serde_json::from_value::<QuestionnaireDraft>(questionnaire.data.clone()) {
        Ok(data) => {
            let age = if data.age == 0 {
                "Не указан".to_string()
            } else {
                data.age.to_string()
            };

            format!(
                "📋 Ваша анкета\n\n\
                👤 Личная информация:\n\
                • Имя: {}\n\
                • Возраст: {}\n\
                • Телефон: {}\n\
                • Email: {}\n\n\
                🎓 Образование и опыт:\n\
                • Образование: {}\n\
                • Опыт работы: {}\n\
                • Навыки: {}\n\n\
                🎯 Дополнительно:\n\
                • Интересы: {}\n\
                • Цели: {}\n\
                • Доп. информация: {}\n\n\
                📊 Статус: {}\n\
                📅 Создана: {}\n\
                🔄 Обновлена: {}",
                value_or(&data.full_name, "Не указано"),
                age,
                value_or(&data.phone, "Не указан"),
                value_or(&data.email, "Не указан"),
                value_or(&data.education, "Не указано"),
                value_or(&data.work_experience, "Не указан"),
                value_or(&data.skills, "Не указаны"),
                value_or(&data.interests, "Не указаны"),
                value_or(&data.goals, "Не указаны"),
                value_or(&data.additional_info, "Не указана"),
                questionnaire.status,
                created,
                updated,
            )
        }
        Err(e) => {
            log::error!(
                "Error reading questionnaire payload for user_id {}: {}",
                questionnaire.user_id,
                e
            );
            format!(
                "📋 Ваша анкета\n\n\
                Статус: {}\n\
                Создана: {}\n\
                Обновлена: {}\n\n\
                ⚠️ Ошибка при чтении данных анкеты.",
                questionnaire.status, created, updated,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crate::models::{Field, FieldValue};

    fn persisted(data: serde_json::Value) -> PersistedQuestionnaire {
        PersistedQuestionnaire {
            id: 1,
            user_id: 1,
            data,
            status: "draft".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn formats_filled_questionnaire() {
        let mut draft = QuestionnaireDraft::new();
        draft.set(Field::FullName, FieldValue::Text("Иванов Иван".into()));
        draft.set(Field::Age, FieldValue::Number(30));

        let text = format_questionnaire(&persisted(serde_json::to_value(&draft).unwrap()));
        assert!(text.contains("• Имя: Иванов Иван"));
        assert!(text.contains("• Возраст: 30"));
        assert!(text.contains("• Телефон: Не указан"));
    }

    #[test]
    fn malformed_payload_falls_back_to_metadata() {
        let text = format_questionnaire(&persisted(serde_json::json!({"age": "тридцать"})));
        assert!(text.contains("⚠️ Ошибка при чтении данных анкеты."));
        assert!(text.contains("Статус: draft"));
    }
}
