use crate::utils::error::{PublisherError, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// 極簡 JSON-RPC 2.0 客戶端，只涵蓋發布流程用到的方法
pub struct RpcClient {
    endpoint: String,
    client: Client,
    timeout: Option<Duration>,
    next_id: AtomicU64,
}

impl RpcClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: Client::new(),
            timeout: None,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = Some(Duration::from_secs(seconds));
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// 呼叫結果不可為 null 的方法
    pub async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<T> {
        let value = self.call_raw(method, params).await?;
        if value.is_null() {
            return Err(PublisherError::RpcResponseError {
                method: method.to_string(),
                details: "unexpected null result".to_string(),
            });
        }
        Ok(serde_json::from_value(value)?)
    }

    /// 呼叫結果可能為 null 的方法，例如 eth_getTransactionReceipt
    pub async fn call_nullable<T: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<Option<T>> {
        let value = self.call_raw(method, params).await?;
        if value.is_null() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_value(value)?))
    }

    async fn call_raw(&self, method: &str, params: serde_json::Value) -> Result<serde_json::Value> {
        let payload = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        tracing::debug!("📡 RPC {} -> {}", method, self.endpoint);

        // 構建請求
        let mut request = self.client.post(&self.endpoint).json(&payload);

        // 設定超時
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        // 執行請求
        let response = request.send().await?;
        tracing::debug!("📡 RPC {} response status: {}", method, response.status());

        if !response.status().is_success() {
            return Err(PublisherError::RpcResponseError {
                method: method.to_string(),
                details: format!("HTTP status {}", response.status()),
            });
        }

        let envelope: RpcResponse = response.json().await?;

        if let Some(error) = envelope.error {
            tracing::error!(
                "❌ RPC {} failed: {} (code {})",
                method,
                error.message,
                error.code
            );
            return Err(PublisherError::RpcError {
                method: method.to_string(),
                code: error.code,
                message: error.message,
            });
        }

        Ok(envelope.result.unwrap_or(serde_json::Value::Null))
    }
}

/// 解析 JSON-RPC 的十六進位數量，例如 "0x89" -> 137
pub fn parse_quantity(method: &str, value: &str) -> Result<u64> {
    let digits = value
        .strip_prefix("0x")
        .ok_or_else(|| PublisherError::RpcResponseError {
            method: method.to_string(),
            details: format!("quantity missing 0x prefix: {}", value),
        })?;

    u64::from_str_radix(digits, 16).map_err(|_| PublisherError::RpcResponseError {
        method: method.to_string(),
        details: format!("invalid hex quantity: {}", value),
    })
}
