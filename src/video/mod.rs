pub mod info;
pub mod youtube;

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::errors::BotResult;

pub use info::{VideoFormat, VideoInfo};
pub use youtube::YtDlp;

/// Which stream the extractor should fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatSelection {
    /// Exact format id picked from the quality menu
    Id(String),
    /// Let the extractor choose, preferring mp4
    Best,
}

/// A file the extractor wrote to disk.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadedVideo {
    pub path: PathBuf,
    pub title: Option<String>,
}

/// Resolves video page URLs into metadata and files.
#[async_trait]
pub trait Extractor: Send + Sync {
    async fn probe(&self, url: &str) -> BotResult<VideoInfo>;

    /// Downloads `url` into `dir`, which must already exist.
    async fn download(
        &self,
        url: &str,
        selection: &FormatSelection,
        dir: &Path,
    ) -> BotResult<DownloadedVideo>;
}
