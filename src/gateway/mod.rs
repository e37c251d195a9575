use crate::domain::model::NftMetadata;
use crate::domain::ports::MetadataSource;
use crate::utils::error::{PublisherError, Result};
use reqwest::Client;
use std::time::Duration;

/// 透過 HTTP gateway 解析並抓取 token metadata
///
/// ipfs:// 開頭的 URI 會改寫成 `{base_url}/ipfs/{cid...}`，
/// http(s) URI 原樣使用，其餘 scheme 一律拒絕。
pub struct IpfsGateway {
    base_url: String,
    client: Client,
    timeout: Option<Duration>,
}

impl IpfsGateway {
    pub const DEFAULT_BASE_URL: &'static str = "https://ipfs.io";

    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: Client::new(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = Some(Duration::from_secs(seconds));
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for IpfsGateway {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BASE_URL)
    }
}

impl MetadataSource for IpfsGateway {
    fn resolve(&self, token_uri: &str) -> Result<String> {
        if let Some(rest) = token_uri.strip_prefix("ipfs://") {
            return Ok(format!(
                "{}/ipfs/{}",
                self.base_url.trim_end_matches('/'),
                rest
            ));
        }
        if token_uri.starts_with("http://") || token_uri.starts_with("https://") {
            return Ok(token_uri.to_string());
        }
        Err(PublisherError::UnsupportedUriError {
            uri: token_uri.to_string(),
        })
    }

    async fn fetch(&self, url: &str) -> Result<NftMetadata> {
        tracing::debug!("📥 Fetching metadata from: {}", url);

        // 構建請求
        let mut request = self.client.get(url);

        // 設定超時
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        // 執行請求
        let response = request.send().await?;
        tracing::debug!("📥 Metadata response status: {}", response.status());

        if !response.status().is_success() {
            return Err(PublisherError::MetadataError {
                url: url.to_string(),
                reason: format!("HTTP status {}", response.status()),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| PublisherError::MetadataError {
            url: url.to_string(),
            reason: format!("invalid metadata JSON: {}", e),
        })
    }
}
