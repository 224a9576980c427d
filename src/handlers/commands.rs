use std::error::Error;
use teloxide::prelude::*;

use crate::bot_state::BotState;
use crate::database::PersistenceGateway;
use crate::handlers::utils::{ensure_user_exists, main_menu_keyboard};
use crate::Command;

pub async fn command_handler(
    bot: Bot,
    msg: Message,
    cmd: Command,
    state: BotState,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    match cmd {
        Command::Start => handle_start(bot, msg, state).await?,
        Command::Help => handle_help(bot, msg).await?,
        Command::Profile => handle_profile(bot, msg, state).await?,
    }
    Ok(())
}

async fn handle_start(
    bot: Bot,
    msg: Message,
    state: BotState,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let chat_id = msg.chat.id;

    if !ensure_user_exists(&state, chat_id, msg.from.as_ref()).await {
        bot.send_message(
            chat_id,
            "Произошла ошибка при инициализации. Попробуйте позже.",
        )
        .await?;
        return Ok(());
    }

    // Начатый сценарий сбрасывается
    state.sessions.clear(chat_id).await;

    let first_name = msg
        .from
        .as_ref()
        .map(|u| u.first_name.as_str())
        .unwrap_or("гость");

    let welcome_text = format!(
        "👋 Добро пожаловать, {}!\n\n\
        Этот бот поможет вам заполнить анкету и сохранить данные.\n\n\
        Выберите действие:",
        first_name
    );

    bot.send_message(chat_id, welcome_text)
        .reply_markup(main_menu_keyboard())
        .await?;

    Ok(())
}

async fn handle_help(bot: Bot, msg: Message) -> Result<(), Box<dyn Error + Send + Sync>> {
    bot.send_message(
        msg.chat.id,
        "📋 Доступные команды:\n\n\
        /start - Начать работу с ботом\n\
        /help - Показать эту справку\n\
        /profile - Просмотр профиля\n\n\
        🔧 Основные функции:\n\
        • Заполнение анкеты\n\
        • Просмотр содержания модуля\n\
        • Просмотр информации",
    )
    .await?;

    Ok(())
}

async fn handle_profile(
    bot: Bot,
    msg: Message,
    state: BotState,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let chat_id = msg.chat.id;

    let user = match state.db.find_user_by_identity(chat_id).await {
        Ok(user) => user,
        Err(e) => {
            log::error!("Error loading profile for user {}: {}", chat_id, e);
            bot.send_message(chat_id, "Произошла ошибка. Попробуйте позже.")
                .await?;
            return Ok(());
        }
    };

    let Some(user) = user else {
        bot.send_message(
            chat_id,
            "Пользователь не найден. Используйте /start для регистрации.",
        )
        .await?;
        return Ok(());
    };

    let profile_text = format!(
        "👤 Ваш профиль:\n\n\
        🆔 ID: {}\n\
        👤 Имя: {}\n\
        👤 Фамилия: {}\n\
        📱 Username: @{}\n\
        📅 Дата регистрации: {}",
        user.telegram_id,
        user.first_name.as_deref().unwrap_or("Не указано"),
        user.last_name.as_deref().unwrap_or("Не указано"),
        user.username.as_deref().unwrap_or("Не указан"),
        user.created_at.format("%d.%m.%Y %H:%M"),
    );

    bot.send_message(chat_id, profile_text).await?;

    Ok(())
}
