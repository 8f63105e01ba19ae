use serde::Deserialize;

use crate::utils::megabytes;

/// Container accepted for uploads
const UPLOAD_CONTAINER: &str = "mp4";

/// One encoded stream variant offered by the extractor.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VideoFormat {
    pub format_id: String,
    #[serde(default)]
    pub ext: Option<String>,
    #[serde(default)]
    pub filesize: Option<u64>,
    /// Human label such as "720p" or "medium"
    #[serde(default)]
    pub format_note: Option<String>,
}

impl VideoFormat {
    /// mp4 with a known non-zero size and a non-empty label.
    pub fn is_downloadable(&self) -> bool {
        self.ext.as_deref() == Some(UPLOAD_CONTAINER)
            && self.filesize.is_some_and(|size| size > 0)
            && self.format_note.as_deref().is_some_and(|note| !note.is_empty())
    }

    /// Button text, e.g. `720p - 12.5MB`.
    pub fn label(&self) -> String {
        format!(
            "{} - {:.1}MB",
            self.format_note.as_deref().unwrap_or_default(),
            megabytes(self.filesize.unwrap_or_default())
        )
    }
}

/// Subset of `yt-dlp -J` output the bot cares about.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoInfo {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub formats: Vec<VideoFormat>,
}

impl VideoInfo {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Formats that can be offered as a quality choice, in extractor order.
    pub fn downloadable_formats(&self) -> impl Iterator<Item = &VideoFormat> {
        self.formats.iter().filter(|f| f.is_downloadable())
    }
}
