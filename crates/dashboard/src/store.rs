//! Persistence of rendered images.
//!
//! Images are written as `dashboard-YYYYmmdd-HHMMSS.png` in one directory.
//! Each file is written under a temporary name and renamed into place so a
//! reader never sees a partial image.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use tokio::fs;
use tracing::{debug, warn};

use crate::error::Result;

const FILE_PREFIX: &str = "dashboard-";
const FILE_EXTENSION: &str = "png";
const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// A persisted dashboard image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderArtifact {
    /// Full path of the image
    pub path: PathBuf,
    /// File name, as served to display clients
    pub file_name: String,
    /// Instant the image was rendered for
    pub rendered_at: NaiveDateTime,
}

/// Directory of rendered images.
#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
    keep: usize,
}

impl ImageStore {
    /// Use `dir` for images. Created on first save. Keeps every image.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            keep: 0,
        }
    }

    /// Keep only the newest `keep` images after each save; 0 keeps all.
    pub fn with_retention(mut self, keep: usize) -> Self {
        self.keep = keep;
        self
    }

    /// The image directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File name for an image rendered at `at`.
    pub fn file_name(at: NaiveDateTime) -> String {
        format!("{}{}.{}", FILE_PREFIX, at.format(TIMESTAMP_FORMAT), FILE_EXTENSION)
    }

    fn parse_file_name(name: &str) -> Option<NaiveDateTime> {
        let stamp = name
            .strip_prefix(FILE_PREFIX)?
            .strip_suffix(FILE_EXTENSION)?
            .strip_suffix('.')?;
        NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT).ok()
    }

    /// Write encoded image bytes for `at`, then prune past the retention count.
    pub async fn save(&self, png: &[u8], at: NaiveDateTime) -> Result<RenderArtifact> {
        fs::create_dir_all(&self.dir).await?;

        let file_name = Self::file_name(at);
        let path = self.dir.join(&file_name);
        let tmp = self.dir.join(format!(".{}.tmp", file_name));

        fs::write(&tmp, png).await?;
        fs::rename(&tmp, &path).await?;
        debug!("Wrote {} bytes to {}", png.len(), path.display());

        let artifact = RenderArtifact {
            path,
            file_name,
            rendered_at: at,
        };
        self.prune(&artifact).await?;
        Ok(artifact)
    }

    /// Stored images, oldest first.
    pub async fn list(&self) -> Result<Vec<RenderArtifact>> {
        let mut rd = match fs::read_dir(&self.dir).await {
            Ok(rd) => rd,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut artifacts = Vec::new();
        while let Some(entry) = rd.next_entry().await? {
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|s| s.to_str()) else {
                continue;
            };
            let Some(rendered_at) = Self::parse_file_name(name) else {
                continue;
            };
            artifacts.push(RenderArtifact {
                file_name: name.to_string(),
                path,
                rendered_at,
            });
        }
        artifacts.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        Ok(artifacts)
    }

    /// Most recent image on disk, by name.
    pub async fn latest(&self) -> Result<Option<RenderArtifact>> {
        Ok(self.list().await?.pop())
    }

    async fn prune(&self, current: &RenderArtifact) -> Result<()> {
        if self.keep == 0 {
            return Ok(());
        }
        let artifacts = self.list().await?;
        let excess = artifacts.len().saturating_sub(self.keep);
        for old in artifacts.iter().take(excess).filter(|a| a.path != current.path) {
            match fs::remove_file(&old.path).await {
                Ok(()) => debug!("Pruned {}", old.path.display()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => warn!("Could not prune {}: {}", old.path.display(), e),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_file_name() {
        assert_eq!(ImageStore::file_name(at(9, 5, 7)), "dashboard-20261019-090507.png");
    }

    #[tokio::test]
    async fn test_save_and_latest() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path().join("images"));
        assert_eq!(store.latest().await.unwrap(), None);

        let first = store.save(b"first", at(9, 0, 0)).await.unwrap();
        let second = store.save(b"second", at(9, 15, 0)).await.unwrap();
        std::fs::write(store.dir().join("notes.txt"), "x").unwrap();

        assert_eq!(std::fs::read(&first.path).unwrap(), b"first");
        assert_eq!(second.file_name, "dashboard-20261019-091500.png");
        assert_eq!(store.latest().await.unwrap(), Some(second));
    }

    #[test]
    fn test_parse_file_name() {
        assert_eq!(ImageStore::parse_file_name("dashboard-20261019-090507.png"), Some(at(9, 5, 7)));
        assert_eq!(ImageStore::parse_file_name(".dashboard-20261019-090507.png.tmp"), None);
        assert_eq!(ImageStore::parse_file_name("dashboard-latest.png"), None);
    }

    #[tokio::test]
    async fn test_retention_keeps_newest() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path()).with_retention(2);

        for minute in [0, 15, 30, 45] {
            store.save(b"png", at(9, minute, 0)).await.unwrap();
        }
        std::fs::write(dir.path().join("notes.txt"), "x").unwrap();

        let names: Vec<String> = store.list().await.unwrap().into_iter().map(|a| a.file_name).collect();
        assert_eq!(names, vec!["dashboard-20261019-093000.png", "dashboard-20261019-094500.png"]);
        assert!(dir.path().join("notes.txt").exists());
    }

    #[tokio::test]
    async fn test_no_retention_keeps_all() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path());
        for minute in [0, 15, 30] {
            store.save(b"png", at(9, minute, 0)).await.unwrap();
        }
        assert_eq!(store.list().await.unwrap().len(), 3);
    }
}
