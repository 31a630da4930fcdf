use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::FetchError;
use crate::traits::PageFetcher;

/// Plain HTTP page fetcher backed by `reqwest`.
///
/// Makes exactly one request per call; there is no retry and no timeout
/// beyond the client defaults.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = Client::builder().user_agent(&config.user_agent).build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        info!("Fetching {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Unreachable {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok());
        classify_response(url, response.status().as_u16(), content_type)?;

        response.text().await.map_err(|e| FetchError::Unreachable {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Accept only a successful response that is (or may be) an HTML document.
///
/// A missing content type is given the benefit of the doubt.
fn classify_response(url: &str, status: u16, content_type: Option<&str>) -> Result<(), FetchError> {
    if !(200..300).contains(&status) {
        return Err(FetchError::Status {
            url: url.to_string(),
            status,
        });
    }

    if !content_type.is_none_or(|value| value.contains("html")) {
        debug!("{} is not an HTML document", url);
        return Err(FetchError::NoDocument {
            url: url.to_string(),
        });
    }

    Ok(())
}
