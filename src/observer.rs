use std::path::Path;

use url::Url;

/// Pipeline events a [`crate::PageLoader`] reports while it runs.
///
/// Observers are purely informational: nothing they do changes the outcome of
/// a load. All methods default to doing nothing.
pub trait LoadObserver: Send + Sync {
    fn page_fetch_started(&self, _url: &Url) {}
    fn page_fetch_finished(&self, _url: &Url, _bytes: usize) {}
    fn assets_planned(&self, _count: usize) {}
    fn directory_prepared(&self, _path: &Path) {}
    fn asset_fetch_started(&self, _url: &Url) {}
    fn asset_fetch_finished(&self, _url: &Url, _bytes: usize) {}
    fn asset_fetch_failed(&self, _url: &Url, _reason: &str) {}
    fn write_started(&self, _path: &Path) {}
    fn write_finished(&self, _path: &Path) {}
    fn stage_failed(&self, _stage: &str, _detail: &str) {}
    fn load_finished(&self, _saved_page: &Path) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl LoadObserver for NoopObserver {}

/// Forwards every event to `tracing` at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl LoadObserver for TracingObserver {
    fn page_fetch_started(&self, url: &Url) {
        tracing::debug!(%url, "page fetch started");
    }

    fn page_fetch_finished(&self, url: &Url, bytes: usize) {
        tracing::debug!(%url, bytes, "page fetch finished");
    }

    fn assets_planned(&self, count: usize) {
        tracing::debug!(count, "same-origin assets found");
    }

    fn directory_prepared(&self, path: &Path) {
        tracing::debug!(path = %path.display(), "assets directory created");
    }

    fn asset_fetch_started(&self, url: &Url) {
        tracing::debug!(%url, "asset fetch started");
    }

    fn asset_fetch_finished(&self, url: &Url, bytes: usize) {
        tracing::debug!(%url, bytes, "asset fetch finished");
    }

    fn asset_fetch_failed(&self, url: &Url, reason: &str) {
        tracing::debug!(%url, reason, "asset fetch failed");
    }

    fn write_started(&self, path: &Path) {
        tracing::debug!(path = %path.display(), "write started");
    }

    fn write_finished(&self, path: &Path) {
        tracing::debug!(path = %path.display(), "write finished");
    }

    fn stage_failed(&self, stage: &str, detail: &str) {
        tracing::debug!(stage, detail, "stage failed");
    }

    fn load_finished(&self, saved_page: &Path) {
        tracing::debug!(saved_page = %saved_page.display(), "page saved");
    }
}

/// Fans each event out to several observers in order.
pub struct FanoutObserver {
    observers: Vec<Box<dyn LoadObserver>>,
}

impl FanoutObserver {
    pub fn new(observers: Vec<Box<dyn LoadObserver>>) -> Self {
        Self { observers }
    }

    fn each(&self, f: impl Fn(&dyn LoadObserver)) {
        self.observers.iter().for_each(|observer| f(observer.as_ref()));
    }
}

impl LoadObserver for FanoutObserver {
    fn page_fetch_started(&self, url: &Url) {
        self.each(|o| o.page_fetch_started(url));
    }

    fn page_fetch_finished(&self, url: &Url, bytes: usize) {
        self.each(|o| o.page_fetch_finished(url, bytes));
    }

    fn assets_planned(&self, count: usize) {
        self.each(|o| o.assets_planned(count));
    }

    fn directory_prepared(&self, path: &Path) {
        self.each(|o| o.directory_prepared(path));
    }

    fn asset_fetch_started(&self, url: &Url) {
        self.each(|o| o.asset_fetch_started(url));
    }

    fn asset_fetch_finished(&self, url: &Url, bytes: usize) {
        self.each(|o| o.asset_fetch_finished(url, bytes));
    }

    fn asset_fetch_failed(&self, url: &Url, reason: &str) {
        self.each(|o| o.asset_fetch_failed(url, reason));
    }

    fn write_started(&self, path: &Path) {
        self.each(|o| o.write_started(path));
    }

    fn write_finished(&self, path: &Path) {
        self.each(|o| o.write_finished(path));
    }

    fn stage_failed(&self, stage: &str, detail: &str) {
        self.each(|o| o.stage_failed(stage, detail));
    }

    fn load_finished(&self, saved_page: &Path) {
        self.each(|o| o.load_finished(saved_page));
    }
}
