use async_trait::async_trait;
use bytes::Bytes;
use log::info;
use reqwest::StatusCode;

use crate::error::GeocreditError;
use crate::platform::PlatformService;

const USER_AGENT: &str = "geocredit/0.1";

/// Platform service loading data over HTTP with `reqwest`.
#[derive(Debug, Clone)]
pub struct NativePlatformService {
    http_client: reqwest::Client,
}

#[async_trait]
impl PlatformService for NativePlatformService {
    async fn load_bytes_from_url(&self, url: &str) -> Result<Bytes, GeocreditError> {
        self.load_from_web(url).await
    }
}

impl NativePlatformService {
    /// Creates a new instance of the service.
    pub fn new() -> Result<Self, GeocreditError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { http_client })
    }

    async fn load_from_web(&self, url: &str) -> Result<Bytes, GeocreditError> {
        let response = self.http_client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            info!("Failed to load {url}: {status}");
            return Err(if status == StatusCode::NOT_FOUND {
                GeocreditError::NotFound
            } else {
                GeocreditError::IO
            });
        }

        Ok(response.bytes().await?)
    }
}
