mod callback;
mod commands;
mod config;
mod downloader;
mod errors;
mod format_cache;
mod handlers;
mod health;
mod schema;
mod temp_file;
mod utils;
mod video;

use std::sync::Arc;

use teloxide::{prelude::*, utils::command::BotCommands};
use tokio::net::TcpListener;

use crate::{
    config::Config,
    downloader::Downloader,
    errors::BotResult,
    schema::{Command, schema},
};

#[tokio::main]
async fn main() -> BotResult<()> {
    let _ = dotenvy::dotenv();
    pretty_env_logger::init();
    log::info!("Starting video downloader bot...");

    let config = Config::from_env()?;
    let bot = Bot::new(&config.bot_token);

    let downloader = Arc::new(Downloader::from_config(&config)?);
    log::info!(
        "Downloader ready (quality picker: {}, upload limit: {} bytes)",
        downloader.quality_picker(),
        downloader.max_upload_bytes()
    );

    // Bind before polling so a taken port fails the deploy right away
    let listener = TcpListener::bind(config.health_addr).await?;
    log::info!("Health endpoint listening on http://{}", config.health_addr);
    tokio::spawn(async move {
        if let Err(e) = health::serve(listener).await {
            log::error!("Health endpoint stopped: {}", e);
        }
    });

    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        log::warn!("Failed to register bot commands: {}", e);
    }

    log::info!("Telegram bot polling started.");
    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![downloader])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
