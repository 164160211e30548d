use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use futures::future::try_join_all;
use tokio::fs;

use crate::downloader::DownloadedAsset;
use crate::error::LoadError;
use crate::observer::LoadObserver;

/// Owns the output directory: prepares the assets directory and writes the
/// page and its assets into it.
#[derive(Clone)]
pub struct FileManager {
    base_dir: PathBuf,
    observer: Arc<dyn LoadObserver>,
}

impl FileManager {
    pub fn new(base_dir: &Path, observer: Arc<dyn LoadObserver>) -> Self {
        Self {
            base_dir: base_dir.to_path_buf(),
            observer,
        }
    }

    /// Checks the output directory, then recreates `assets_directory_name`
    /// inside it empty, dropping whatever a previous run left there.
    pub async fn prepare_assets_directory(&self, assets_directory_name: &str) -> Result<PathBuf, LoadError> {
        let metadata = fs::metadata(&self.base_dir)
            .await
            .map_err(|e| LoadError::from_directory_io(e, &self.base_dir))?;

        if !metadata.is_dir() {
            return Err(LoadError::NotADirectory { path: self.base_dir.clone() });
        }

        let assets_dir = self.base_dir.join(assets_directory_name);

        match fs::remove_dir_all(&assets_dir).await {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(LoadError::from_directory_io(e, &self.base_dir)),
        }

        fs::create_dir(&assets_dir)
            .await
            .map_err(|e| LoadError::from_directory_io(e, &self.base_dir))?;

        self.observer.directory_prepared(&assets_dir);
        Ok(assets_dir)
    }

    /// Writes the page, then every asset concurrently. Returns the page path.
    ///
    /// Nothing is rolled back on failure: files written before the error stay.
    pub async fn save_all(
        &self,
        html_file_name: &str,
        page_content: &[u8],
        assets: &[DownloadedAsset],
    ) -> Result<PathBuf> {
        let page_path = self.base_dir.join(html_file_name);
        self.write_file(&page_path, page_content).await?;

        try_join_all(
            assets
                .iter()
                .map(|asset| self.write_file_owned(self.resolve(&asset.local_path), &asset.bytes)),
        )
        .await?;

        Ok(page_path)
    }

    /// Maps a `/`-separated local path onto the output directory.
    pub fn resolve(&self, local_path: &str) -> PathBuf {
        local_path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .fold(self.base_dir.clone(), |path, segment| path.join(segment))
    }

    async fn write_file_owned(&self, path: PathBuf, content: &[u8]) -> Result<()> {
        self.write_file(&path, content).await
    }

    async fn write_file(&self, path: &Path, content: &[u8]) -> Result<()> {
        self.observer.write_started(path);

        fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write to file: {:?}", path))?;

        self.observer.write_finished(path);
        Ok(())
    }
}
