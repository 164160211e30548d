use std::future::Future;
use std::sync::Arc;

use anyhow::anyhow;
use tokio::task::JoinSet;

use crate::fetcher::{FetchError, PageFetcher};
use crate::html_parser::ResourceDescriptor;
use crate::observer::LoadObserver;

/// Fetched body of one asset, paired with where it must be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedAsset {
    pub local_path: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("download task failed: {0}")]
    Task(#[source] anyhow::Error),
}

/// Runs a fixed set of fallible tasks concurrently and joins them.
///
/// Results come back in spawn order. The first failure to complete ends the
/// join; tasks still in flight are aborted when the group is dropped.
pub struct TaskGroup<T, E> {
    tasks: JoinSet<(usize, Result<T, E>)>,
    spawned: usize,
}

impl<T, E> TaskGroup<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    pub fn new() -> Self {
        Self {
            tasks: JoinSet::new(),
            spawned: 0,
        }
    }

    pub fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
    {
        let index = self.spawned;
        self.spawned += 1;
        self.tasks.spawn(async move { (index, task.await) });
    }

    pub async fn join_all(mut self) -> Result<Vec<T>, E>
    where
        E: From<tokio::task::JoinError>,
    {
        let mut slots: Vec<Option<T>> = (0..self.spawned).map(|_| None).collect();

        while let Some(joined) = self.tasks.join_next().await {
            let (index, result) = joined?;
            if let Some(slot) = slots.get_mut(index) {
                *slot = Some(result?);
            }
        }

        Ok(slots.into_iter().flatten().collect())
    }
}

impl<T, E> Default for TaskGroup<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl From<tokio::task::JoinError> for DownloadError {
    fn from(error: tokio::task::JoinError) -> Self {
        DownloadError::Task(anyhow!(error))
    }
}

/// Fetches every planned asset at once, with no concurrency cap.
#[derive(Clone)]
pub struct AssetDownloader {
    fetcher: PageFetcher,
    observer: Arc<dyn LoadObserver>,
}

impl AssetDownloader {
    pub fn new(fetcher: PageFetcher, observer: Arc<dyn LoadObserver>) -> Self {
        Self { fetcher, observer }
    }

    /// Downloads `resources`, returning one asset per descriptor in the same
    /// order, or the first failure.
    pub async fn download_all(
        &self,
        resources: &[ResourceDescriptor],
    ) -> Result<Vec<DownloadedAsset>, DownloadError> {
        let mut group = TaskGroup::new();

        for resource in resources {
            let fetcher = self.fetcher.clone();
            let observer = self.observer.clone();
            let resource = resource.clone();

            group.spawn(async move {
                observer.asset_fetch_started(&resource.source_url);

                match fetcher.fetch(&resource.source_url).await {
                    Ok(bytes) => {
                        observer.asset_fetch_finished(&resource.source_url, bytes.len());
                        Ok(DownloadedAsset {
                            local_path: resource.local_path,
                            bytes,
                        })
                    }
                    Err(e) => {
                        observer.asset_fetch_failed(&resource.source_url, &e.to_string());
                        Err(DownloadError::from(e))
                    }
                }
            });
        }

        group.join_all().await
    }
}
