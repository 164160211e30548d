pub mod address;
pub mod cli;
pub mod downloader;
pub mod error;
pub mod fetcher;
pub mod file_manager;
pub mod html_parser;
pub mod loader;
pub mod logging;
pub mod naming;
pub mod observer;
pub mod progress;

// Re-export main types for convenience
pub use address::PageAddress;
pub use cli::LoadCommand;
pub use downloader::{AssetDownloader, DownloadedAsset, TaskGroup};
pub use error::LoadError;
pub use fetcher::{FetchError, LoaderConfig, PageFetcher};
pub use file_manager::FileManager;
pub use html_parser::{HtmlParser, ResourceDescriptor, RewritePlan, TagKind};
pub use loader::PageLoader;
pub use naming::{derive_assets_directory_name, derive_file_name};
pub use observer::{FanoutObserver, LoadObserver, NoopObserver, TracingObserver};
