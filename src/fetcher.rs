use std::time::Duration;

use anyhow::Result;
use reqwest::{Client, ClientBuilder};
use thiserror::Error;
use url::Url;

/// HTTP client settings, filled from the command line.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("page-loader/{}", env!("CARGO_PKG_VERSION")),
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request to {url} failed with status code {status}")]
    Status { url: Url, status: u16 },

    #[error("Request to {url} failed: {source}")]
    Network {
        url: Url,
        #[source]
        source: reqwest::Error,
    },
}

/// GET-only HTTP client shared by the page fetch and every asset fetch.
#[derive(Clone)]
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new(config: &LoaderConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .use_rustls_tls()
            .cookie_store(true)
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()?;

        Ok(Self { client })
    }

    /// Fetches the body of `url`. Non-2xx answers become [`FetchError::Status`];
    /// DNS, connection and timeout failures become [`FetchError::Network`].
    pub async fn fetch(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        let network = |source| FetchError::Network { url: url.clone(), source };

        let response = self.client.get(url.clone()).send().await.map_err(network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { url: url.clone(), status: status.as_u16() });
        }

        let content = response.bytes().await.map_err(network)?;
        Ok(content.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_success() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/style.css"))
            .respond_with(ResponseTemplate::new(200).set_body_string("body { color: red; }"))
            .mount(&mock_server)
            .await;

        let fetcher = PageFetcher::new(&LoaderConfig::default())?;
        let url = Url::parse(&format!("{}/style.css", mock_server.uri()))?;

        let content = fetcher.fetch(&url).await?;
        assert_eq!(content, b"body { color: red; }");
        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_status_error_keeps_url_and_code() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/missing.png"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let fetcher = PageFetcher::new(&LoaderConfig::default())?;
        let url = Url::parse(&format!("{}/missing.png", mock_server.uri()))?;

        match fetcher.fetch(&url).await {
            Err(FetchError::Status { url: failed, status }) => {
                assert_eq!(failed, url);
                assert_eq!(status, 404);
            }
            other => panic!("expected status error, got {:?}", other),
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_network_error_is_distinct() -> std::result::Result<(), Box<dyn std::error::Error>> {
        // Bind then drop a listener so the port is very likely closed.
        let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
        let port = listener.local_addr()?.port();
        drop(listener);

        let fetcher = PageFetcher::new(&LoaderConfig::default())?;
        let url = Url::parse(&format!("http://127.0.0.1:{}/page", port))?;

        let result = fetcher.fetch(&url).await;
        assert!(matches!(result, Err(FetchError::Network { .. })));
        Ok(())
    }
}
