use reqwest::Client;
use tracing::{debug, info};

use crate::utils::error::Result;

/// Plain HTTP page fetcher. One client is built per run and reused for
/// every request.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = Client::builder().user_agent(user_agent).build()?;
        Ok(Self { client })
    }

    /// GETs `url` and returns the body. Transport failures and non-2xx
    /// statuses are both reported as `AppError::Network`.
    pub async fn fetch(&self, url: &str) -> Result<String> {
        info!("Accessing URL: {}", url);

        let response = self.client.get(url).send().await?.error_for_status()?;
        let status = response.status();
        let body = response.text().await?;

        debug!(%status, bytes = body.len(), "Fetched {}", url);
        Ok(body)
    }
}
