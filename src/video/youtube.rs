use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::info;
use tokio::process;

use crate::errors::{BotError, BotResult};
use crate::video::{DownloadedVideo, Extractor, FormatSelection, VideoInfo};

const OUTPUT_TEMPLATE: &str = "%(title)s.%(ext)s";

/// Prefer a progressive mp4 so the upload plays inline, fall back to anything.
const BEST_FORMAT: &str = "best[ext=mp4]/best";

/// Runs the `yt-dlp` command line tool.
#[derive(Debug, Clone)]
pub struct YtDlp {
    program: String,
    leading_args: Vec<String>,
    cookies: Option<PathBuf>,
}

impl YtDlp {
    /// `command` is the program followed by any arguments that must precede
    /// ours, e.g. `["python3", "-m", "yt_dlp"]`.
    pub fn new(command: &[String], cookies: Option<PathBuf>) -> BotResult<Self> {
        let (program, leading_args) = command
            .split_first()
            .ok_or_else(|| BotError::config("yt-dlp command is empty"))?;

        let cookies = cookies.filter(|path| {
            let exists = path.is_file();
            if !exists {
                log::warn!(
                    "Cookies file {} not found, restricted videos will fail",
                    path.display()
                );
            }
            exists
        });

        Ok(Self {
            program: program.clone(),
            leading_args: leading_args.to_vec(),
            cookies,
        })
    }

    fn base_command(&self) -> process::Command {
        let mut cmd = process::Command::new(&self.program);
        cmd.args(&self.leading_args)
            .arg("--no-playlist")
            .arg("--no-warnings")
            .args(["--socket-timeout", "5", "--retries", "3"]);

        if let Some(cookies) = &self.cookies {
            cmd.arg("--cookies").arg(cookies);
        }

        cmd
    }

    async fn run(&self, mut cmd: process::Command) -> BotResult<String> {
        let output = cmd
            .output()
            .await
            .map_err(|e| BotError::external_command_error(&self.program, e.to_string()))?;

        info!("yt-dlp exit code: {:?}", output.status.code());

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            log::error!("yt-dlp failed: {}", stderr);
            Err(BotError::extractor_error(stderr))
        }
    }
}

#[async_trait]
impl Extractor for YtDlp {
    async fn probe(&self, url: &str) -> BotResult<VideoInfo> {
        let mut cmd = self.base_command();
        cmd.arg("-J").arg(url);

        let stdout = self.run(cmd).await?;
        VideoInfo::from_json(&stdout)
            .map_err(|e| BotError::ParseError(format!("Failed to parse yt-dlp output: {}", e)))
    }

    async fn download(
        &self,
        url: &str,
        selection: &FormatSelection,
        dir: &Path,
    ) -> BotResult<DownloadedVideo> {
        let format = match selection {
            FormatSelection::Id(id) => id.as_str(),
            FormatSelection::Best => BEST_FORMAT,
        };

        let mut cmd = self.base_command();
        cmd.args(["-f", format])
            .arg("-o")
            .arg(dir.join(OUTPUT_TEMPLATE))
            // --print implies --simulate
            .arg("--no-simulate")
            .args(["--print", "after_move:filepath"])
            .args(["--print", "after_move:title"])
            .arg(url);

        info!("Starting download: {} (format: {})", url, format);

        let stdout = self.run(cmd).await?;
        parse_download_output(&stdout)
    }
}

/// First line is the final path, anything after it is the title.
fn parse_download_output(stdout: &str) -> BotResult<DownloadedVideo> {
    let mut lines = stdout.lines().map(str::trim).filter(|l| !l.is_empty());

    let path = lines
        .next()
        .ok_or_else(|| BotError::extractor_error("yt-dlp did not report a file path"))?;
    let title: Vec<&str> = lines.collect();

    Ok(DownloadedVideo {
        path: PathBuf::from(path),
        title: (!title.is_empty()).then(|| title.join(" ")),
    })
}
