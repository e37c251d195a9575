use crate::chain::abi;
use crate::domain::model::ChainId;
use crate::utils::error::{PublisherError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublisherConfig {
    pub publisher: PublisherInfo,
    pub chains: HashMap<String, ChainConfig>,
    pub wallet: WalletConfig,
    pub gateway: Option<GatewayConfig>,
    pub template: TemplateConfig,
    pub publish: PublishConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublisherInfo {
    pub name: String,
    pub description: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    pub rpc_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletConfig {
    /// 持有帳戶並簽名的 JSON-RPC 端點
    pub endpoint: String,
    /// 指定送出帳戶；未設定時用 eth_accounts 的第一個
    pub from: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateConfig {
    /// 內嵌的 creation bytecode（十六進位）
    pub bytecode: Option<String>,
    /// 或指向含十六進位 bytecode 的檔案
    pub bytecode_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishConfig {
    pub output_path: String,
    pub confirm_interval_ms: Option<u64>,
    pub confirm_attempts: Option<u32>,
    pub gas: Option<u64>,
    pub rpc_timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_level: Option<String>,
    pub system_stats: Option<bool>,
}

impl PublisherConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PublisherError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PublisherError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${POLYGON_RPC_URL})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        // 使用正規表達式匹配 ${VAR_NAME} 格式
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        // 驗證 publisher 資訊
        crate::utils::validation::validate_non_empty_string(
            "publisher.name",
            &self.publisher.name,
        )?;
        crate::utils::validation::validate_non_empty_string(
            "publisher.version",
            &self.publisher.version,
        )?;

        // 驗證錢包端點
        crate::utils::validation::validate_url("wallet.endpoint", &self.wallet.endpoint)?;
        if let Some(from) = &self.wallet.from {
            crate::utils::validation::validate_address("wallet.from", from)?;
        }

        // 驗證每條鏈的 RPC 端點
        if self.chains.is_empty() {
            return Err(PublisherError::MissingConfigError {
                field: "chains".to_string(),
            });
        }
        for (name, chain) in &self.chains {
            crate::utils::validation::validate_url(
                &format!("chains.{}.rpc_url", name),
                &chain.rpc_url,
            )?;
        }

        // 驗證 gateway 端點
        if let Some(base_url) = self.gateway.as_ref().and_then(|g| g.base_url.as_deref()) {
            crate::utils::validation::validate_url("gateway.base_url", base_url)?;
        }

        // template 必須恰好提供一種 bytecode 來源
        match (&self.template.bytecode, &self.template.bytecode_path) {
            (None, None) => {
                return Err(PublisherError::MissingConfigError {
                    field: "template.bytecode".to_string(),
                })
            }
            (Some(_), Some(_)) => {
                return Err(PublisherError::ConfigValidationError {
                    field: "template".to_string(),
                    message: "set either bytecode or bytecode_path, not both".to_string(),
                })
            }
            _ => {}
        }

        // 驗證輸出路徑與確認參數
        crate::utils::validation::validate_path("publish.output_path", &self.publish.output_path)?;
        if let Some(attempts) = self.publish.confirm_attempts {
            crate::utils::validation::validate_positive_number(
                "publish.confirm_attempts",
                attempts as usize,
                1,
            )?;
        }

        Ok(())
    }

    /// 取得指定鏈的 RPC 端點
    pub fn rpc_url_for(&self, chain: ChainId) -> Result<&str> {
        let key = chain.config_key();
        self.chains
            .get(key)
            .map(|c| c.rpc_url.as_str())
            .ok_or_else(|| PublisherError::MissingConfigError {
                field: format!("chains.{}", key),
            })
    }

    /// 載入 augment template 的 creation bytecode
    pub fn load_bytecode(&self) -> Result<Vec<u8>> {
        let (field, hex) = match (&self.template.bytecode, &self.template.bytecode_path) {
            (Some(inline), _) => ("template.bytecode", inline.trim().to_string()),
            (None, Some(path)) => {
                let content = std::fs::read_to_string(path).map_err(PublisherError::IoError)?;
                ("template.bytecode_path", content.trim().to_string())
            }
            (None, None) => {
                return Err(PublisherError::MissingConfigError {
                    field: "template.bytecode".to_string(),
                })
            }
        };

        abi::decode_hex(&hex).map_err(|e| PublisherError::InvalidConfigValueError {
            field: field.to_string(),
            value: truncate_for_display(&hex),
            reason: e.to_string(),
        })
    }

    /// 取得 gateway base URL
    pub fn gateway_base_url(&self) -> &str {
        self.gateway
            .as_ref()
            .and_then(|g| g.base_url.as_deref())
            .unwrap_or(crate::gateway::IpfsGateway::DEFAULT_BASE_URL)
    }

    pub fn gateway_timeout_seconds(&self) -> Option<u64> {
        self.gateway.as_ref().and_then(|g| g.timeout_seconds)
    }

    /// 取得收據輸出路徑
    pub fn output_path(&self) -> &str {
        &self.publish.output_path
    }

    pub fn confirm_interval_ms(&self) -> u64 {
        self.publish.confirm_interval_ms.unwrap_or(2000)
    }

    pub fn confirm_attempts(&self) -> u32 {
        self.publish.confirm_attempts.unwrap_or(30)
    }

    pub fn gas(&self) -> Option<u64> {
        self.publish.gas
    }

    pub fn rpc_timeout_seconds(&self) -> Option<u64> {
        self.publish.rpc_timeout_seconds
    }

    pub fn wallet_from(&self) -> Option<&str> {
        self.wallet.from.as_deref()
    }

    /// 取得監控設定
    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}

fn truncate_for_display(value: &str) -> String {
    // 截斷點必須落在字元邊界，設定值可能含多位元組字元
    match value.char_indices().nth(34) {
        Some((cut, _)) => format!("{}...", &value[..cut]),
        None => value.to_string(),
    }
}

impl Validate for PublisherConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
