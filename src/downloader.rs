use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use teloxide::types::ChatId;

use crate::{
    callback::{CallbackToken, MenuEncoder},
    config::Config,
    errors::{BotError, BotResult},
    format_cache::FormatCache,
    temp_file::ScratchDir,
    utils::megabytes,
    video::{Extractor, FormatSelection, VideoFormat, YtDlp},
};

const DEFAULT_TITLE: &str = "Video";

#[derive(Debug, Clone)]
pub struct DownloadSettings {
    pub download_dir: PathBuf,
    pub max_upload_bytes: u64,
    pub max_choices: usize,
    pub quality_picker: bool,
}

/// One button of the quality menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualityChoice {
    pub label: String,
    pub callback_data: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualityMenu {
    pub choices: Vec<QualityChoice>,
}

/// A downloaded file ready for upload. The scratch directory holding it is
/// removed when this is dropped.
#[derive(Debug)]
pub struct FetchedVideo {
    _scratch: ScratchDir,
    path: PathBuf,
    title: String,
    size_bytes: u64,
}

impl FetchedVideo {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "video.mp4".to_string())
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub fn caption(&self) -> String {
        format!("{} ({:.1} MB)", self.title, megabytes(self.size_bytes))
    }
}

/// Everything the handlers need to turn a link into an uploaded file.
pub struct Downloader {
    extractor: Arc<dyn Extractor>,
    cache: FormatCache,
    settings: DownloadSettings,
}

impl Downloader {
    pub fn new(extractor: Arc<dyn Extractor>, cache: FormatCache, settings: DownloadSettings) -> Self {
        Self {
            extractor,
            cache,
            settings,
        }
    }

    pub fn from_config(config: &Config) -> BotResult<Self> {
        let ytdlp = YtDlp::new(&config.ytdlp_command, Some(config.cookies_path.clone()))?;
        let cache = FormatCache::new(config.format_cache_capacity, config.format_cache_ttl);
        let settings = DownloadSettings {
            download_dir: config.download_dir.clone(),
            max_upload_bytes: config.max_upload_bytes,
            max_choices: config.max_quality_choices,
            quality_picker: config.quality_picker,
        };

        Ok(Self::new(Arc::new(ytdlp), cache, settings))
    }

    pub fn quality_picker(&self) -> bool {
        self.settings.quality_picker
    }

    pub fn max_upload_bytes(&self) -> u64 {
        self.settings.max_upload_bytes
    }

    /// Probes `url` and remembers the offered formats for `chat_id`.
    pub async fn quality_menu(&self, chat_id: ChatId, url: &str) -> BotResult<QualityMenu> {
        let info = self.extractor.probe(url).await?;
        let formats: Vec<VideoFormat> = info.downloadable_formats().cloned().collect();

        let mut encoder = MenuEncoder::new(url, &self.cache);
        let mut choices = Vec::with_capacity(formats.len().min(self.settings.max_choices));
        for format in &formats {
            if choices.len() == self.settings.max_choices {
                break;
            }
            if let Some(callback_data) = encoder.encode(&format.format_id).await {
                choices.push(QualityChoice {
                    label: format.label(),
                    callback_data,
                });
            }
        }

        log::info!(
            "Found {} downloadable formats for {:?} ({}), offering {}",
            formats.len(),
            info.title.as_deref().unwrap_or(DEFAULT_TITLE),
            url,
            choices.len()
        );
        self.cache.store_formats(chat_id, url, formats).await;

        if choices.is_empty() {
            return Err(BotError::NoFormats);
        }

        Ok(QualityMenu { choices })
    }

    /// Turns pressed-button data back into a format and URL.
    pub async fn resolve_choice(&self, data: &str) -> BotResult<CallbackToken> {
        CallbackToken::decode(data, &self.cache).await
    }

    pub async fn fetch(
        &self,
        chat_id: ChatId,
        url: &str,
        selection: FormatSelection,
    ) -> BotResult<FetchedVideo> {
        let limit = self.settings.max_upload_bytes;

        if let FormatSelection::Id(format_id) = &selection {
            let announced = self
                .cache
                .format(chat_id, url, format_id)
                .await
                .and_then(|f| f.filesize);
            if let Some(size) = announced.filter(|&size| size > limit) {
                return Err(BotError::FileTooLarge { size, limit });
            }
        }

        let scratch = ScratchDir::create(&self.settings.download_dir).await?;
        let video = self
            .extractor
            .download(url, &selection, scratch.path())
            .await?;

        let size = tokio::fs::metadata(&video.path).await?.len();
        if size > limit {
            return Err(BotError::FileTooLarge { size, limit });
        }

        Ok(FetchedVideo {
            _scratch: scratch,
            path: video.path,
            title: video.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            size_bytes: size,
        })
    }
}
