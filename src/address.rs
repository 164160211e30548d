use url::{Origin, Url};

use crate::error::LoadError;

/// A validated absolute page URL.
///
/// Validation is purely syntactic: `http://localhost` is accepted, and no DNS
/// or public-suffix lookup ever happens here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageAddress {
    url: Url,
    origin_base: Url,
}

impl PageAddress {
    pub fn parse(input: &str) -> Result<Self, LoadError> {
        let invalid = || LoadError::InvalidUrl { url: input.to_string() };

        let url = Url::parse(input).map_err(|_| invalid())?;
        if url.cannot_be_a_base() || url.host_str().is_none() {
            return Err(invalid());
        }

        let origin_base = Url::parse(&url.origin().ascii_serialization()).map_err(|_| invalid())?;

        Ok(Self { url, origin_base })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn origin(&self) -> Origin {
        self.url.origin()
    }

    pub fn hostname(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    pub fn pathname(&self) -> &str {
        self.url.path()
    }

    /// Resolves an attribute value against the page origin (not the page path).
    pub fn resolve(&self, reference: &str) -> Option<Url> {
        self.origin_base.join(reference).ok()
    }

    pub fn is_same_origin(&self, other: &Url) -> bool {
        other.origin() == self.origin()
    }

    /// Namespacing prefix shared by every file generated for this page.
    pub fn name_base_part(&self) -> String {
        self.hostname().replace('.', "-")
    }
}
