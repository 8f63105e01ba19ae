use std::{
    env,
    net::SocketAddr,
    path::PathBuf,
    str::FromStr,
    time::Duration,
};

use crate::errors::{BotError, BotResult};

const DEFAULT_PORT: u16 = 10000;
const DEFAULT_MAX_UPLOAD_MB: u64 = 2048;
const DEFAULT_MAX_QUALITY_CHOICES: usize = 10;
const DEFAULT_CACHE_TTL_SECS: u64 = 60 * 60;
const DEFAULT_CACHE_CAPACITY: u64 = 10_000;

/// Runtime settings, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub bot_token: String,
    /// Program and leading arguments used to invoke yt-dlp
    pub ytdlp_command: Vec<String>,
    pub cookies_path: PathBuf,
    pub download_dir: PathBuf,
    pub max_upload_bytes: u64,
    /// `false` skips the quality menu and downloads the best mp4 right away
    pub quality_picker: bool,
    pub max_quality_choices: usize,
    pub format_cache_ttl: Duration,
    pub format_cache_capacity: u64,
    pub health_addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> BotResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup, so tests don't have to
    /// touch the process environment.
    pub fn from_lookup<F>(lookup: F) -> BotResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bot_token = get("TELOXIDE_TOKEN")
            .or_else(|| get("BOT_TOKEN"))
            .ok_or_else(|| BotError::config("TELOXIDE_TOKEN is not set"))?;

        let ytdlp_command: Vec<String> = get("YTDLP_COMMAND")
            .unwrap_or_else(|| "yt-dlp".to_string())
            .split_whitespace()
            .map(str::to_owned)
            .collect();

        let cookies_path = get("YTDLP_COOKIES")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("cookies.txt"));

        let download_dir = get("DOWNLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(env::temp_dir);

        let max_upload_mb: u64 = parse_or(&get, "MAX_UPLOAD_MB", DEFAULT_MAX_UPLOAD_MB)?;
        let max_upload_bytes = max_upload_mb
            .checked_mul(1024 * 1024)
            .ok_or_else(|| BotError::config(format!("MAX_UPLOAD_MB is too large: {max_upload_mb}")))?;
        let quality_picker = match get("QUALITY_PICKER") {
            Some(v) => parse_bool("QUALITY_PICKER", &v)?,
            None => true,
        };
        let max_quality_choices: usize =
            parse_or(&get, "MAX_QUALITY_CHOICES", DEFAULT_MAX_QUALITY_CHOICES)?;
        if max_quality_choices == 0 {
            return Err(BotError::config("MAX_QUALITY_CHOICES must be at least 1"));
        }
        let ttl_secs: u64 = parse_or(&get, "FORMAT_CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS)?;
        let format_cache_capacity: u64 =
            parse_or(&get, "FORMAT_CACHE_CAPACITY", DEFAULT_CACHE_CAPACITY)?;

        let health_addr = match get("HEALTH_ADDR") {
            Some(addr) => addr
                .parse::<SocketAddr>()
                .map_err(|_| BotError::config(format!("HEALTH_ADDR is not a socket address: {addr}")))?,
            None => {
                let port: u16 = parse_or(&get, "PORT", DEFAULT_PORT)?;
                SocketAddr::from(([0, 0, 0, 0], port))
            }
        };

        Ok(Self {
            bot_token,
            ytdlp_command,
            cookies_path,
            download_dir,
            max_upload_bytes,
            quality_picker,
            max_quality_choices,
            format_cache_ttl: Duration::from_secs(ttl_secs),
            format_cache_capacity,
            health_addr,
        })
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> BotResult<T>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| BotError::config(format!("{key} has an invalid value: {raw}"))),
        None => Ok(default),
    }
}

fn parse_bool(key: &str, raw: &str) -> BotResult<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(BotError::config(format!("{key} must be a boolean, got {raw}"))),
    }
}
