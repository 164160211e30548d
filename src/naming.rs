//! Deterministic file and directory names derived from URLs.
//!
//! Both functions are pure: the same URL and base part always give the same
//! name, and nothing here touches the network or the filesystem.

use url::Url;

const DEFAULT_EXTENSION: &str = "html";

/// Maps `url` to `<name_base_part>-<path-segments>.<extension>`.
///
/// The path is split on `.`: the first piece is the stem, the second piece
/// (when present) is the extension. Non-empty `/`-separated stem segments are
/// joined with `-`.
pub fn derive_file_name(url: &Url, name_base_part: &str) -> String {
    let mut pieces = url.path().split('.');
    let stem = pieces.next().unwrap_or_default();
    let extension = pieces.next().unwrap_or(DEFAULT_EXTENSION);

    let segments = stem
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    format!("{}-{}.{}", name_base_part, segments, extension)
}

/// Maps the page URL to `<name_base_part><path-with-dashes>_files`.
pub fn derive_assets_directory_name(page_url: &Url, name_base_part: &str) -> String {
    format!("{}{}_files", name_base_part, page_url.path().replace('/', "-"))
}

/// Relative path (always `/`-separated) an asset is saved under and referenced by.
pub fn asset_local_path(assets_directory_name: &str, asset_file_name: &str) -> String {
    format!("{}/{}", assets_directory_name, asset_file_name)
}
