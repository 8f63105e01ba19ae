use teloxide::{prelude::*, utils::command::BotCommands};

use crate::{errors::HandlerResult, schema::Command};

pub async fn help(bot: Bot, msg: Message) -> HandlerResult {
    let text = format!(
        "{}\n\nSupported: YouTube (youtube.com, youtu.be).\nComing soon: Terabox, DiskWala.",
        Command::descriptions()
    );
    bot.send_message(msg.chat.id, text).await?;
    Ok(())
}
