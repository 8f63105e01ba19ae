//! Callback data attached to quality buttons: `formatId|url`.
//!
//! Telegram rejects callback data longer than 64 bytes. Long URLs are parked
//! in the [`FormatCache`] and referenced as `formatId|~shortId`.

use crate::{
    errors::{BotError, BotResult},
    format_cache::{FormatCache, ShortId},
};

const SEPARATOR: char = '|';
const PARKED_PREFIX: char = '~';
pub const MAX_CALLBACK_DATA_LEN: usize = 64;

/// A quality choice: which format of which video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackToken {
    pub format_id: String,
    pub url: String,
}

/// The URL half of a decoded token before the cache is consulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlRef {
    Inline(String),
    Parked(String),
}

impl CallbackToken {
    pub fn new(format_id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            format_id: format_id.into(),
            url: url.into(),
        }
    }

    /// `formatId|url`, regardless of length.
    pub fn inline_data(&self) -> String {
        format!("{}{}{}", self.format_id, SEPARATOR, self.url)
    }

    fn parked_data(&self, short_id: &ShortId) -> String {
        format!("{}{}{}{}", self.format_id, SEPARATOR, PARKED_PREFIX, short_id)
    }

    /// Splits on the first separator so URLs may contain `|`.
    pub fn parse(data: &str) -> BotResult<(String, UrlRef)> {
        let (format_id, rest) = data
            .split_once(SEPARATOR)
            .ok_or_else(|| BotError::invalid_callback(data))?;

        if format_id.is_empty() || rest.is_empty() {
            return Err(BotError::invalid_callback(data));
        }

        let url = match rest.strip_prefix(PARKED_PREFIX) {
            Some(short_id) if !short_id.is_empty() => UrlRef::Parked(short_id.to_string()),
            Some(_) => return Err(BotError::invalid_callback(data)),
            None => UrlRef::Inline(rest.to_string()),
        };

        Ok((format_id.to_string(), url))
    }

    pub async fn decode(data: &str, cache: &FormatCache) -> BotResult<Self> {
        let (format_id, url) = Self::parse(data)?;

        let url = match url {
            UrlRef::Inline(url) => url,
            UrlRef::Parked(short_id) => cache.url(&short_id).await.ok_or(BotError::SessionExpired)?,
        };

        Ok(Self { format_id, url })
    }
}

/// Encodes the buttons of one menu. All of them point at the same URL, so it
/// is parked at most once.
pub struct MenuEncoder<'a> {
    url: &'a str,
    cache: &'a FormatCache,
    parked: Option<ShortId>,
}

impl<'a> MenuEncoder<'a> {
    pub fn new(url: &'a str, cache: &'a FormatCache) -> Self {
        Self {
            url,
            cache,
            parked: None,
        }
    }

    /// Callback data for `format_id` within Telegram's limit, or `None` when
    /// the format id alone is too long for even the parked form.
    pub async fn encode(&mut self, format_id: &str) -> Option<String> {
        let token = CallbackToken::new(format_id, self.url);
        let inline = token.inline_data();
        if inline.len() <= MAX_CALLBACK_DATA_LEN {
            return Some(inline);
        }

        if format_id.len() + 2 + ShortId::LEN > MAX_CALLBACK_DATA_LEN {
            log::warn!("Format id {format_id:?} is too long for callback data, skipping");
            return None;
        }

        if self.parked.is_none() {
            self.parked = Some(self.cache.park_url(self.url).await);
        }
        self.parked.as_ref().map(|short_id| token.parked_data(short_id))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;

    use super::*;

    fn cache() -> FormatCache {
        FormatCache::new(100, Duration::from_secs(60))
    }

    fn long_url() -> String {
        format!("https://www.youtube.com/watch?v=dQw4w9WgXcQ&list={}", "x".repeat(60))
    }

    #[tokio::test]
    async fn short_tokens_stay_inline() {
        let cache = cache();
        let url = "https://youtu.be/dQw4w9WgXcQ";
        let mut encoder = MenuEncoder::new(url, &cache);

        let data = encoder.encode("18").await.unwrap();

        assert_eq!(data, "18|https://youtu.be/dQw4w9WgXcQ");
        assert_eq!(
            CallbackToken::decode(&data, &cache).await.unwrap(),
            CallbackToken::new("18", url)
        );
        assert!(encoder.parked.is_none());
    }

    #[tokio::test]
    async fn long_urls_are_parked() {
        let cache = cache();
        let url = long_url();
        let mut encoder = MenuEncoder::new(&url, &cache);

        let data = encoder.encode("137").await.unwrap();

        assert!(data.len() <= MAX_CALLBACK_DATA_LEN);
        assert!(data.starts_with("137|~"));
        assert_eq!(CallbackToken::decode(&data, &cache).await.unwrap().url, url);
    }

    #[tokio::test]
    async fn one_menu_parks_its_url_once() {
        let cache = cache();
        let url = long_url();
        let mut encoder = MenuEncoder::new(&url, &cache);

        let first = encoder.encode("18").await.unwrap();
        let second = encoder.encode("22").await.unwrap();

        let slot = |data: &str| data.split_once(SEPARATOR).unwrap().1.to_string();
        assert_eq!(slot(&first), slot(&second));
        assert_eq!(CallbackToken::decode(&second, &cache).await.unwrap().format_id, "22");
    }

    #[tokio::test]
    async fn format_ids_too_long_to_fit_are_skipped() {
        let cache = cache();
        let url = long_url();
        let mut encoder = MenuEncoder::new(&url, &cache);
        let hls_id = "hls-fastly_skyfire_sep-2176-video=2000000";

        assert_eq!(encoder.encode(hls_id).await, None);
        assert!(encoder.parked.is_none());

        // short URLs still fit inline with the same id
        let short = "https://x.test/v";
        let data = MenuEncoder::new(short, &cache).encode(hls_id).await.unwrap();
        assert_eq!(data, format!("{hls_id}|{short}"));
    }

    #[tokio::test]
    async fn unknown_parked_url_means_expired_session() {
        let err = CallbackToken::decode("18|~0123456789abcdef0123456789abcdef", &cache()).await.unwrap_err();
        assert!(matches!(err, BotError::SessionExpired));
    }

    #[test]
    fn url_may_contain_separator() {
        let (format_id, url) = CallbackToken::parse("22|https://x.test/?a=1|2").unwrap();
        assert_eq!(format_id, "22");
        assert_eq!(url, UrlRef::Inline("https://x.test/?a=1|2".to_string()));
    }

    #[test]
    fn malformed_data_is_rejected() {
        for data in ["", "18", "|https://youtu.be/a", "18|", "18|~"] {
            assert!(
                matches!(CallbackToken::parse(data), Err(BotError::InvalidCallback(_))),
                "{data:?}"
            );
        }
    }
}
