use std::sync::Arc;

use teloxide::{
    prelude::*,
    types::{ChatAction, InputFile, MaybeInaccessibleMessage},
};

use crate::{
    downloader::Downloader,
    errors::{BotError, HandlerResult},
    utils::megabytes,
    video::FormatSelection,
};

pub fn download_failure_text(err: &BotError) -> String {
    match err {
        BotError::FileTooLarge { size, limit } => format!(
            "❌ File is too large to upload ({:.1} MB, limit {:.1} MB).",
            megabytes(*size),
            megabytes(*limit)
        ),
        BotError::SessionExpired => {
            "⌛ This choice has expired. Please send the link again.".to_string()
        }
        BotError::InvalidCallback(_) => "❌ Unknown quality choice.".to_string(),
        _ => format!("❌ Failed to download.\n{}", err),
    }
}

/// Handles a press on a quality button. Callback data: `formatId|url`.
pub async fn quality_received(
    bot: Bot,
    query: CallbackQuery,
    downloader: Arc<Downloader>,
) -> HandlerResult {
    bot.answer_callback_query(query.id.clone()).await?;

    let data = query
        .data
        .as_deref()
        .ok_or_else(|| BotError::general("No callback data"))?;

    let message = query
        .message
        .as_ref()
        .ok_or_else(|| BotError::general("Couldn't find message"))?;

    let chat_id = match message {
        MaybeInaccessibleMessage::Inaccessible(m) => m.chat.id,
        MaybeInaccessibleMessage::Regular(m) => m.chat.id,
    };

    let token = match downloader.resolve_choice(data).await {
        Ok(token) => token,
        Err(e) => {
            log::warn!("Rejected callback {:?}: {}", data, e);
            bot.send_message(chat_id, download_failure_text(&e)).await?;
            return Ok(());
        }
    };

    log::info!("Format {} selected for {}", token.format_id, token.url);

    let status = "📥 Downloading selected quality...";
    match message {
        MaybeInaccessibleMessage::Regular(m) => {
            bot.edit_message_text(chat_id, m.id, status).await?;
        }
        MaybeInaccessibleMessage::Inaccessible(_) => {
            bot.send_message(chat_id, status).await?;
        }
    }

    deliver(
        &bot,
        chat_id,
        &token.url,
        FormatSelection::Id(token.format_id),
        &downloader,
    )
    .await
}

/// Downloads and uploads as a document; any failure is reported to the chat.
pub async fn deliver(
    bot: &Bot,
    chat_id: ChatId,
    url: &str,
    selection: FormatSelection,
    downloader: &Downloader,
) -> HandlerResult {
    bot.send_chat_action(chat_id, ChatAction::UploadDocument)
        .await?;

    let result = async {
        let video = downloader.fetch(chat_id, url, selection).await?;
        log::info!(
            "Uploading {} ({} bytes)",
            video.path().display(),
            video.size_bytes()
        );

        bot.send_document(
            chat_id,
            InputFile::file(video.path()).file_name(video.file_name()),
        )
        .caption(video.caption())
        .await?;

        Ok::<_, BotError>(())
    }
    .await;

    if let Err(e) = result {
        log::error!("Download error: {}", e);
        bot.send_message(chat_id, download_failure_text(&e)).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn extractor_failures_are_reported_with_details() {
        let err = BotError::extractor_error("ERROR: Private video");
        assert_eq!(
            download_failure_text(&err),
            "❌ Failed to download.\nyt-dlp failed: ERROR: Private video"
        );
    }

    #[test]
    fn oversize_files_get_a_size_message() {
        let err = BotError::FileTooLarge {
            size: 3 * 1024 * 1024 * 1024,
            limit: 2 * 1024 * 1024 * 1024,
        };
        assert_eq!(
            download_failure_text(&err),
            "❌ File is too large to upload (3072.0 MB, limit 2048.0 MB)."
        );
    }

    #[test]
    fn stale_and_bogus_buttons_are_explained() {
        assert_eq!(
            download_failure_text(&BotError::SessionExpired),
            "⌛ This choice has expired. Please send the link again."
        );
        assert_eq!(
            download_failure_text(&BotError::invalid_callback("nope")),
            "❌ Unknown quality choice."
        );
    }
}
