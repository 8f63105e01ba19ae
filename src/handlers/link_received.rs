use std::sync::Arc;

use teloxide::{
    prelude::*,
    types::{ChatAction, InlineKeyboardButton, InlineKeyboardMarkup},
};

use crate::{
    downloader::{Downloader, QualityMenu},
    errors::{BotError, HandlerResult},
    handlers::quality_received::deliver,
    utils::{LinkKind, UNSUPPORTED_LINK_TEXT, classify_link, coming_soon_text},
    video::FormatSelection,
};

/// What to do with a text message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    ListQualities,
    DownloadBest,
    Reply(String),
}

pub fn route(text: &str, quality_picker: bool) -> Route {
    match classify_link(text) {
        LinkKind::YouTube if quality_picker => Route::ListQualities,
        LinkKind::YouTube => Route::DownloadBest,
        kind if kind.is_coming_soon() => Route::Reply(coming_soon_text(kind)),
        _ => Route::Reply(UNSUPPORTED_LINK_TEXT.to_string()),
    }
}

pub fn listing_failure_text(err: &BotError) -> &'static str {
    match err {
        BotError::NoFormats => "❌ No downloadable formats found.",
        _ => "❌ Failed to fetch video formats.",
    }
}

pub fn quality_keyboard(menu: &QualityMenu) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(menu.choices.iter().map(|choice| {
        [InlineKeyboardButton::callback(
            choice.label.clone(),
            choice.callback_data.clone(),
        )]
    }))
}

pub async fn link_received(bot: Bot, msg: Message, downloader: Arc<Downloader>) -> HandlerResult {
    let text = msg
        .text()
        .ok_or_else(|| BotError::general("Text should be here. It's invalid state"))?;
    let url = text.trim();
    log::info!("Received: {}", url);

    match route(url, downloader.quality_picker()) {
        Route::ListQualities => present_qualities(&bot, &msg, url, &downloader).await?,
        Route::DownloadBest => {
            bot.send_message(msg.chat.id, "📥 Downloading...").await?;
            deliver(&bot, msg.chat.id, url, FormatSelection::Best, &downloader).await?;
        }
        Route::Reply(text) => {
            bot.send_message(msg.chat.id, text).await?;
        }
    }

    Ok(())
}

async fn present_qualities(
    bot: &Bot,
    msg: &Message,
    url: &str,
    downloader: &Downloader,
) -> HandlerResult {
    bot.send_chat_action(msg.chat.id, ChatAction::Typing).await?;

    match downloader.quality_menu(msg.chat.id, url).await {
        Ok(menu) => {
            bot.send_message(msg.chat.id, "🔽 Choose video quality:")
                .reply_markup(quality_keyboard(&menu))
                .await?;
        }
        Err(e) => {
            log::error!("Failed to list formats for {}: {}", url, e);
            bot.send_message(msg.chat.id, listing_failure_text(&e))
                .await?;
        }
    }

    Ok(())
}
