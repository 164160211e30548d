use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors surfaced to callers of [`crate::PageLoader`].
///
/// Every stage failure is mapped into exactly one of these kinds; the
/// underlying cause is only kept as a `source()` of [`LoadError::Unprocessed`].
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{url} must be a valid URL")]
    InvalidUrl { url: String },

    #[error("Directory {} doesn't exist", .path.display())]
    DirectoryNotFound { path: PathBuf },

    #[error("No access to write in {}", .path.display())]
    PermissionDenied { path: PathBuf },

    #[error("{} is not a directory", .path.display())]
    NotADirectory { path: PathBuf },

    #[error("Request to {url} failed with status code {status}")]
    AssetFetchFailed { url: String, status: u16 },

    #[error("Unprocessed error occurred. Please, run the application with PAGE_LOADER_LOG=debug for more information")]
    Unprocessed(#[source] anyhow::Error),
}

impl LoadError {
    /// Classifies an I/O failure that happened while preparing `path`.
    pub(crate) fn from_directory_io(error: io::Error, path: &Path) -> Self {
        let path = path.to_path_buf();
        match error.kind() {
            io::ErrorKind::NotFound => LoadError::DirectoryNotFound { path },
            io::ErrorKind::PermissionDenied => LoadError::PermissionDenied { path },
            io::ErrorKind::NotADirectory => LoadError::NotADirectory { path },
            _ => LoadError::Unprocessed(anyhow::Error::new(error)
                .context(format!("Failed to prepare directory: {:?}", path))),
        }
    }
}
