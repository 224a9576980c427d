use std::error::Error;
use teloxide::prelude::*;

use crate::bot_state::BotState;
use crate::handlers::utils::{
    cancel_keyboard, ensure_user_exists, format_questionnaire, main_menu_keyboard,
    questionnaire_menu_keyboard, questionnaire_view_keyboard, review_keyboard, send_main_menu,
};
use crate::models::{Field, FieldValue, SessionState};
use crate::questionnaire::{InputOutcome, SaveError};

type HandlerResult = Result<(), Box<dyn Error + Send + Sync>>;

pub async fn message_handler(bot: Bot, msg: Message, state: BotState) -> HandlerResult {
    let chat_id = msg.chat.id;

    let Some(text) = msg.text() else {
        bot.send_message(chat_id, "Напишите текстовое сообщение. /help - справка.")
            .await?;
        return Ok(());
    };

    // Команды уже обработаны в command_handler
    if text.starts_with('/') {
        return Ok(());
    }

    match text {
        "📚 Содержание модуля" => handle_catalog(&bot, &msg, &state).await?,
        "📝 Заполнить анкету" => handle_questionnaire_entry(&bot, &msg, &state).await?,
        "ℹ️ Информация" => handle_info(&bot, chat_id).await?,
        "🔧 Админ панель" => handle_admin(&bot, chat_id).await?,
        "❌ Отменить заполнение" | "❌ Отменить" => handle_cancel(&bot, chat_id, &state).await?,
        "💾 Сохранить анкету" => handle_save(&bot, chat_id, &state).await?,
        "🔙 Назад в меню" => handle_back_to_menu(&bot, chat_id, &state).await?,
        _ => route_by_state(&bot, chat_id, text, &state).await?,
    }

    Ok(())
}

/// Маршрутизация свободного текста по состоянию сессии
async fn route_by_state(
    bot: &Bot,
    chat_id: ChatId,
    text: &str,
    state: &BotState,
) -> HandlerResult {
    match state.sessions.get(chat_id).await {
        SessionState::AwaitingField(field) => {
            handle_field_input(bot, chat_id, field, text, state).await?
        }
        SessionState::ConfirmingSave => match text {
            "✏️ Редактировать" => start_fill(bot, chat_id, state, "✏️ Редактирование анкеты").await?,
            _ => {
                bot.send_message(chat_id, "Выберите действие из меню.")
                    .await?;
            }
        },
        SessionState::ReviewingMenu => match text {
            "👁️ Просмотреть анкету" => show_questionnaire(bot, chat_id, state).await?,
            "✏️ Редактировать анкету" => handle_menu_edit(bot, chat_id, state).await?,
            "🗑️ Удалить анкету" => handle_delete(bot, chat_id, state).await?,
            _ => {
                bot.send_message(chat_id, "Выберите действие из меню.")
                    .await?;
            }
        },
        SessionState::Idle => {
            bot.send_message(chat_id, "Не понимаю эту команду. Используйте /help для справки.")
                .await?;
        }
    }

    Ok(())
}

async fn handle_field_input(
    bot: &Bot,
    chat_id: ChatId,
    field: Field,
    text: &str,
    state: &BotState,
) -> HandlerResult {
    match state.engine.handle_field_input(chat_id, field, text).await {
        InputOutcome::Accepted { value, next } => match next {
            SessionState::AwaitingField(next_field) => {
                bot.send_message(
                    chat_id,
                    format!("{}\n\n{}", ack_text(field, &value), next_field.prompt()),
                )
                .await?;
            }
            _ => {
                // Последнее поле принято, показываем прогресс и предлагаем сохранить
                let progress = state.engine.progress(chat_id).await;
                let review_text = format!(
                    "{}\n\n\
                    📊 Прогресс заполнения: {}%\n\
                    Заполнено полей: {}/{}\n\n\
                    Анкета готова к сохранению!",
                    ack_text(field, &value),
                    progress.percentage,
                    progress.completed_fields,
                    progress.total_fields,
                );
                bot.send_message(chat_id, review_text)
                    .reply_markup(review_keyboard())
                    .await?;
            }
        },
        InputOutcome::Rejected { reason } => {
            bot.send_message(chat_id, reason).await?;
        }
        InputOutcome::NoActiveDraft => {
            state.sessions.clear(chat_id).await;
            bot.send_message(
                chat_id,
                "⚠️ Активная анкета не найдена. Начните заполнение заново.",
            )
            .reply_markup(main_menu_keyboard())
            .await?;
        }
    }

    Ok(())
}

/// Подтверждение принятого поля
fn ack_text(field: Field, value: &FieldValue) -> String {
    match (field, value) {
        (Field::FullName, FieldValue::Text(v)) => format!("✅ Имя сохранено: {}", v),
        (Field::Age, FieldValue::Number(v)) => format!("✅ Возраст сохранен: {} лет", v),
        (Field::Phone, FieldValue::Text(v)) => format!("✅ Телефон сохранен: {}", v),
        (Field::Email, FieldValue::Text(v)) => format!("✅ Email сохранен: {}", v),
        (Field::Education, _) => "✅ Образование сохранено".to_string(),
        (Field::WorkExperience, _) => "✅ Опыт работы сохранен".to_string(),
        (Field::Skills, _) => "✅ Навыки сохранены".to_string(),
        (Field::Interests, _) => "✅ Интересы сохранены".to_string(),
        (Field::Goals, _) => "✅ Цели сохранены".to_string(),
        (Field::AdditionalInfo, _) => "✅ Дополнительная информация сохранена".to_string(),
        _ => String::new(),
    }
}

async fn handle_catalog(bot: &Bot, msg: &Message, state: &BotState) -> HandlerResult {
    let chat_id = msg.chat.id;

    if !ensure_user_exists(state, chat_id, msg.from.as_ref()).await {
        bot.send_message(chat_id, "Произошла ошибка. Попробуйте позже.")
            .await?;
        return Ok(());
    }

    let items = match state.catalog.all_items().await {
        Ok(items) => items,
        Err(e) => {
            log::error!("Error loading catalog: {}", e);
            Vec::new()
        }
    };

    let catalog_text = if items.is_empty() {
        "📚 Содержание модуля\n\n\
        К сожалению, каталог модулей временно недоступен.\n\
        Попробуйте позже или обратитесь к администратору."
            .to_string()
    } else {
        let mut text = "📚 Содержание модуля\n\n".to_string();
        for item in &items {
            text.push_str(&format!("• {}\n\n", item.description));
        }
        text.push_str("Выберите интересующий вас модуль для получения дополнительной информации.");
        text
    };

    bot.send_message(chat_id, catalog_text).await?;

    Ok(())
}

async fn handle_questionnaire_entry(bot: &Bot, msg: &Message, state: &BotState) -> HandlerResult {
    let chat_id = msg.chat.id;

    if !ensure_user_exists(state, chat_id, msg.from.as_ref()).await {
        bot.send_message(chat_id, "Произошла ошибка. Попробуйте позже.")
            .await?;
        return Ok(());
    }

    match state.engine.saved_questionnaire(chat_id).await {
        Ok(Some(_)) => {
            // Анкета уже есть, предлагаем меню действий
            state
                .sessions
                .set(chat_id, SessionState::ReviewingMenu)
                .await;
            bot.send_message(
                chat_id,
                "📝 Ваша анкета\n\n\
                У вас уже есть сохраненная анкета. Что вы хотите сделать?",
            )
            .reply_markup(questionnaire_menu_keyboard())
            .await?;
        }
        Ok(None) => {
            let first = state.engine.start(chat_id).await;
            bot.send_message(
                chat_id,
                format!(
                    "📝 Заполнение анкеты\n\n\
                    Добро пожаловать! Давайте заполним вашу анкету.\n\n\
                    Начнем с личной информации. {}",
                    first.prompt()
                ),
            )
            .reply_markup(cancel_keyboard())
            .await?;
        }
        Err(e) => {
            log::error!("Error checking questionnaire for user {}: {}", chat_id, e);
            bot.send_message(chat_id, "Произошла ошибка. Попробуйте позже.")
                .await?;
        }
    }

    Ok(())
}

/// Перезапуск последовательности полей с пустого черновика
async fn start_fill(bot: &Bot, chat_id: ChatId, state: &BotState, title: &str) -> HandlerResult {
    let first = state.engine.start(chat_id).await;
    bot.send_message(chat_id, format!("{}\n\n{}", title, first.prompt()))
        .reply_markup(cancel_keyboard())
        .await?;
    Ok(())
}

async fn handle_menu_edit(bot: &Bot, chat_id: ChatId, state: &BotState) -> HandlerResult {
    match state.engine.saved_questionnaire(chat_id).await {
        Ok(Some(_)) => start_fill(bot, chat_id, state, "✏️ Редактирование анкеты").await?,
        Ok(None) => {
            bot.send_message(chat_id, "❌ Анкета не найдена.").await?;
        }
        Err(e) => {
            log::error!("Error loading questionnaire for user {}: {}", chat_id, e);
            bot.send_message(chat_id, "Произошла ошибка. Попробуйте позже.")
                .await?;
        }
    }

    Ok(())
}

async fn show_questionnaire(bot: &Bot, chat_id: ChatId, state: &BotState) -> HandlerResult {
    match state.engine.saved_questionnaire(chat_id).await {
        Ok(Some(questionnaire)) => {
            bot.send_message(chat_id, format_questionnaire(&questionnaire))
                .reply_markup(questionnaire_view_keyboard())
                .await?;
        }
        Ok(None) => {
            bot.send_message(chat_id, "❌ Анкета не найдена.").await?;
        }
        Err(e) => {
            log::error!("Error loading questionnaire for user {}: {}", chat_id, e);
            bot.send_message(chat_id, "Произошла ошибка. Попробуйте позже.")
                .await?;
        }
    }

    Ok(())
}

async fn handle_delete(bot: &Bot, chat_id: ChatId, state: &BotState) -> HandlerResult {
    let deleted = match state.engine.delete_saved(chat_id).await {
        Ok(deleted) => deleted,
        Err(e) => {
            log::error!("Error deleting questionnaire for user {}: {}", chat_id, e);
            false
        }
    };

    let text = if deleted {
        "✅ Анкета удалена."
    } else {
        "❌ Ошибка при удалении анкеты."
    };
    bot.send_message(chat_id, text).await?;

    state.sessions.clear(chat_id).await;
    send_main_menu(bot, chat_id, "🏠 Главное меню").await?;

    Ok(())
}

async fn handle_save(bot: &Bot, chat_id: ChatId, state: &BotState) -> HandlerResult {
    match state.engine.save(chat_id).await {
        Ok(()) => {
            // Черновик и состояние уже очищены движком
            bot.send_message(chat_id, "✅ Анкета успешно сохранена!")
                .await?;
            send_main_menu(bot, chat_id, "🏠 Главное меню").await?;
        }
        Err(SaveError::NoActiveDraft) => {
            state.sessions.clear(chat_id).await;
            send_main_menu(bot, chat_id, "Сохранять нечего.\n🏠 Главное меню").await?;
        }
        Err(e) => {
            // Черновик остается, пользователь может повторить сохранение
            log::error!("Error saving questionnaire for user {}: {}", chat_id, e);
            bot.send_message(
                chat_id,
                "❌ Ошибка при сохранении анкеты. Попробуйте позже.",
            )
            .reply_markup(review_keyboard())
            .await?;
        }
    }

    Ok(())
}

async fn handle_cancel(bot: &Bot, chat_id: ChatId, state: &BotState) -> HandlerResult {
    let was_active = state.engine.cancel(chat_id).await;

    let text = if was_active {
        "❌ Заполнение анкеты отменено.\n🏠 Главное меню"
    } else {
        "🏠 Главное меню"
    };
    send_main_menu(bot, chat_id, text).await?;

    Ok(())
}

async fn handle_back_to_menu(bot: &Bot, chat_id: ChatId, state: &BotState) -> HandlerResult {
    state.sessions.clear(chat_id).await;
    send_main_menu(bot, chat_id, "🏠 Главное меню").await?;
    Ok(())
}

async fn handle_info(bot: &Bot, chat_id: ChatId) -> HandlerResult {
    bot.send_message(
        chat_id,
        "ℹ️ Информация о боте\n\n\
        🤖 Этот бот предназначен для сбора анкет пользователей.\n\n\
        📊 Возможности:\n\
        • Регистрация пользователей\n\
        • Заполнение анкет\n\
        • Сохранение данных в базу\n\
        • Администрирование\n\n\
        🔒 Ваши данные защищены и используются только в указанных целях.\n\n\
        ❓ По вопросам обращайтесь к администратору.",
    )
    .await?;

    Ok(())
}

async fn handle_admin(bot: &Bot, chat_id: ChatId) -> HandlerResult {
    // TODO: проверка прав администратора, когда появится список админов
    bot.send_message(
        chat_id,
        "🔧 Админ панель\n\n\
        Функции администратора находятся в разработке.\n\n\
        Доступные функции (в разработке):\n\
        • Просмотр статистики\n\
        • Управление пользователями\n\
        • Экспорт данных\n\
        • Настройки бота",
    )
    .await?;

    Ok(())
}
