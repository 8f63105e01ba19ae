use strum::Display;

const BYTES_IN_MEGABYTE: f64 = 1024.0 * 1024.0;

/// What the router should do with a piece of incoming text.
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    #[strum(to_string = "YouTube")]
    YouTube,
    #[strum(to_string = "Terabox")]
    Terabox,
    #[strum(to_string = "DiskWala")]
    DiskWala,
    #[strum(to_string = "Unsupported")]
    Unsupported,
}

impl LinkKind {
    /// Providers that are recognised but not downloadable yet.
    pub fn is_coming_soon(self) -> bool {
        matches!(self, LinkKind::Terabox | LinkKind::DiskWala)
    }
}

/// Classifies by substring; youtube wins when several providers appear.
pub fn classify_link(text: &str) -> LinkKind {
    let text = text.trim().to_lowercase();

    if text.contains("youtube.com") || text.contains("youtu.be") {
        LinkKind::YouTube
    } else if text.contains("terabox") {
        LinkKind::Terabox
    } else if text.contains("diskwala") {
        LinkKind::DiskWala
    } else {
        LinkKind::Unsupported
    }
}

pub fn coming_soon_text(kind: LinkKind) -> String {
    format!("📥 {} support coming soon.", kind)
}

pub const UNSUPPORTED_LINK_TEXT: &str = "❌ Unsupported link.";

/// Size in MiB rounded to one decimal.
pub fn megabytes(bytes: u64) -> f64 {
    (bytes as f64 / BYTES_IN_MEGABYTE * 10.0).round() / 10.0
}
