use std::{
    fs,
    path::{Path, PathBuf},
};

/// Per-request directory for downloads, removed when dropped.
#[derive(Debug)]
pub struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    pub async fn create(parent: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = parent
            .as_ref()
            .join(format!("video-{}", uuid::Uuid::new_v4().simple()));
        tokio::fs::create_dir_all(&path).await?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if self.path.exists() {
            if let Err(e) = fs::remove_dir_all(&self.path) {
                log::warn!("Failed to remove {}: {}", self.path.display(), e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[tokio::test]
    async fn directory_and_contents_are_removed_on_drop() {
        let parent = TempDir::new().unwrap();
        let scratch = ScratchDir::create(parent.path()).await.unwrap();
        let path = scratch.path().to_path_buf();
        fs::write(path.join("video.mp4"), b"data").unwrap();
        assert!(path.is_dir());

        drop(scratch);

        assert!(!path.exists());
    }

    #[tokio::test]
    async fn each_request_gets_its_own_directory() {
        let parent = TempDir::new().unwrap();
        let a = ScratchDir::create(parent.path()).await.unwrap();
        let b = ScratchDir::create(parent.path()).await.unwrap();
        assert_ne!(a.path(), b.path());
    }
}
