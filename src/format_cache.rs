use std::{collections::HashMap, sync::Arc, time::Duration};

use moka::future::Cache;
use teloxide::types::ChatId;

use crate::video::VideoFormat;

/// Id for URLs that don't fit in callback data: a full v4 uuid without dashes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShortId(pub String);

impl ShortId {
    pub const LEN: usize = 32;

    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }
}

impl std::fmt::Display for ShortId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The listing last offered to a chat: its URL and formats keyed by format id.
#[derive(Debug)]
pub struct ChatListing {
    pub url: String,
    pub formats: HashMap<String, VideoFormat>,
}

/// In-memory state shared between the quality menu and the button press.
/// Both maps are bounded and expire entries after a fixed time to live.
#[derive(Clone)]
pub struct FormatCache {
    formats: Cache<ChatId, Arc<ChatListing>>,
    urls: Cache<String, String>,
}

impl FormatCache {
    pub fn new(capacity: u64, ttl: Duration) -> Self {
        Self {
            formats: Cache::builder()
                .max_capacity(capacity)
                .time_to_live(ttl)
                .build(),
            urls: Cache::builder()
                .max_capacity(capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Replaces whatever was offered to the chat before.
    pub async fn store_formats<I>(&self, chat_id: ChatId, url: &str, formats: I)
    where
        I: IntoIterator<Item = VideoFormat>,
    {
        let listing = ChatListing {
            url: url.to_string(),
            formats: formats
                .into_iter()
                .map(|f| (f.format_id.clone(), f))
                .collect(),
        };
        self.formats.insert(chat_id, Arc::new(listing)).await;
    }

    /// Format ids repeat across videos, so a lookup only hits when `url` is
    /// the one the chat's current listing was made for.
    pub async fn format(&self, chat_id: ChatId, url: &str, format_id: &str) -> Option<VideoFormat> {
        self.formats
            .get(&chat_id)
            .await
            .filter(|listing| listing.url == url)
            .and_then(|listing| listing.formats.get(format_id).cloned())
    }

    /// Parks a URL and returns the id to put in callback data instead.
    pub async fn park_url(&self, url: &str) -> ShortId {
        let short_id = ShortId::new();
        self.urls.insert(short_id.0.clone(), url.to_string()).await;
        short_id
    }

    pub async fn url(&self, short_id: &str) -> Option<String> {
        self.urls.get(short_id).await
    }

    #[cfg(test)]
    pub async fn run_pending_tasks(&self) {
        self.formats.run_pending_tasks().await;
        self.urls.run_pending_tasks().await;
    }

    #[cfg(test)]
    pub fn parked_urls(&self) -> u64 {
        self.urls.entry_count()
    }
}
