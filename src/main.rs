use teloxide::{prelude::*, utils::command::BotCommands};

mod bot_state;
mod catalog;
mod config;
mod database;
mod handlers;
mod models;
mod questionnaire;

use crate::bot_state::BotState;
use crate::catalog::Catalog;
use crate::config::Config;
use crate::database::Database;
use crate::handlers::{command_handler, message_handler};

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Доступные команды:")]
enum Command {
    #[command(description = "начать работу с ботом")]
    Start,
    #[command(description = "показать справку")]
    Help,
    #[command(description = "просмотр профиля")]
    Profile,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Загружаем .env и инициализируем логирование
    dotenvy::dotenv().ok();
    env_logger::init();
    log::info!("Starting questionnaire bot...");

    let config = Config::from_env()?;

    let db = Database::new(&config.database_url).await?;
    db.init().await?;
    log::info!("✅ Database initialized");

    let catalog = Catalog::new(&config.catalog_db_path).await?;
    catalog.init().await?;
    log::info!("✅ Catalog database initialized");

    let state = BotState::new(db, catalog);
    let bot = Bot::from_env();

    let handler = dptree::entry()
        .branch(
            Update::filter_message()
                .filter_command::<Command>()
                .endpoint(command_handler),
        )
        .branch(Update::filter_message().endpoint(message_handler));

    log::info!("🚀 Starting dispatcher...");

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
