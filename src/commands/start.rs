use teloxide::{prelude::*, types::ParseMode};

use crate::errors::HandlerResult;

pub const WELCOME_TEXT: &str = "🤖 <b>Welcome to the Video Downloader Bot!</b>\n\
    👉 Send a YouTube, Terabox, or DiskWala link.\n\
    🎞️ You'll be asked to pick a video quality.";

pub async fn start(bot: Bot, msg: Message) -> HandlerResult {
    bot.send_message(msg.chat.id, WELCOME_TEXT)
        .parse_mode(ParseMode::Html)
        .await?;
    Ok(())
}
