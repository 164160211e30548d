use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::address::PageAddress;
use crate::downloader::{AssetDownloader, DownloadError};
use crate::error::LoadError;
use crate::fetcher::{FetchError, LoaderConfig, PageFetcher};
use crate::file_manager::FileManager;
use crate::html_parser::HtmlParser;
use crate::observer::{LoadObserver, NoopObserver};

/// Downloads one page and its same-origin assets into a directory.
///
/// Stages run in order: validate, fetch page, extract, prepare directory,
/// download assets, write. The first failing stage ends the run.
pub struct PageLoader {
    fetcher: PageFetcher,
    observer: Arc<dyn LoadObserver>,
}

impl PageLoader {
    pub fn new(config: &LoaderConfig) -> Result<Self, LoadError> {
        Self::with_observer(config, Arc::new(NoopObserver))
    }

    pub fn with_observer(config: &LoaderConfig, observer: Arc<dyn LoadObserver>) -> Result<Self, LoadError> {
        let fetcher = PageFetcher::new(config).map_err(|e| {
            observer.stage_failed("client", &format!("{:#}", e));
            LoadError::Unprocessed(e)
        })?;

        Ok(Self { fetcher, observer })
    }

    /// Saves the page at `url` into `output_dir` and returns the saved HTML path.
    pub async fn load(&self, url: &str, output_dir: &Path) -> Result<PathBuf, LoadError> {
        let address = PageAddress::parse(url).map_err(|e| self.failed("validation", e))?;

        self.observer.page_fetch_started(address.url());
        let raw_page = self
            .fetcher
            .fetch(address.url())
            .await
            .map_err(|e| self.fetch_failed("page fetch", e))?;
        self.observer.page_fetch_finished(address.url(), raw_page.len());

        let plan = HtmlParser::new(&address).extract(&raw_page);
        self.observer.assets_planned(plan.resources().len());

        let file_manager = FileManager::new(output_dir, self.observer.clone());
        file_manager
            .prepare_assets_directory(plan.assets_directory_name())
            .await
            .map_err(|e| self.failed("directory preparation", e))?;

        let downloader = AssetDownloader::new(self.fetcher.clone(), self.observer.clone());
        let assets = downloader
            .download_all(plan.resources())
            .await
            .map_err(|e| match e {
                DownloadError::Fetch(e) => self.fetch_failed("asset download", e),
                DownloadError::Task(e) => self.failed("asset download", LoadError::Unprocessed(e)),
            })?;

        let saved_page = file_manager
            .save_all(plan.html_file_name(), &plan.render(), &assets)
            .await
            .map_err(|e| self.failed("write", LoadError::Unprocessed(e)))?;

        self.observer.load_finished(&saved_page);
        Ok(saved_page)
    }

    fn fetch_failed(&self, stage: &str, error: FetchError) -> LoadError {
        let mapped = match error {
            FetchError::Status { url, status } => LoadError::AssetFetchFailed {
                url: url.to_string(),
                status,
            },
            network @ FetchError::Network { .. } => LoadError::Unprocessed(anyhow::Error::new(network)),
        };
        self.failed(stage, mapped)
    }

    fn failed(&self, stage: &str, error: LoadError) -> LoadError {
        let detail = match &error {
            LoadError::Unprocessed(cause) => format!("{:#}", cause),
            other => other.to_string(),
        };
        self.observer.stage_failed(stage, &detail);
        error
    }
}
