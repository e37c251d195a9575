use thiserror::Error;

/// 發布流程失敗時顯示給使用者的統一訊息
pub const PUBLISH_FLOW_ERROR_MESSAGE: &str =
    "There was an error while trying to publish the NFT augment, \
     please make sure the information provided is right";

#[derive(Error, Debug)]
pub enum PublisherError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("RPC call {method} failed with code {code}: {message}")]
    RpcError {
        method: String,
        code: i64,
        message: String,
    },

    #[error("Unexpected RPC response for {method}: {details}")]
    RpcResponseError { method: String, details: String },

    #[error("ABI error while {context}: {details}")]
    AbiError { context: String, details: String },

    #[error("Metadata error for {url}: {reason}")]
    MetadataError { url: String, reason: String },

    #[error("Unsupported token URI scheme: {uri}")]
    UnsupportedUriError { uri: String },

    #[error("Wallet is connected to chain {actual} but chain {expected} was selected")]
    ChainMismatchError { expected: u64, actual: u64 },

    #[error("Wallet provider returned no account to publish from")]
    NoAccountError,

    #[error("Deployment failed: {reason}")]
    DeployError { reason: String },

    #[error("Transaction {tx_hash} was not confirmed after {attempts} attempts")]
    ConfirmationTimeoutError { tx_hash: String, attempts: u32 },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

/// 錯誤分類，用於日誌與統計
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Chain,
    Data,
    Configuration,
    System,
}

/// 錯誤嚴重程度，決定 CLI 的退出碼
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PublisherError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::HttpError(_) => ErrorCategory::Network,
            Self::RpcError { .. }
            | Self::RpcResponseError { .. }
            | Self::ChainMismatchError { .. }
            | Self::NoAccountError
            | Self::DeployError { .. }
            | Self::ConfirmationTimeoutError { .. } => ErrorCategory::Chain,
            Self::SerializationError(_)
            | Self::AbiError { .. }
            | Self::MetadataError { .. }
            | Self::UnsupportedUriError { .. } => ErrorCategory::Data,
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 網路錯誤與確認逾時通常重跑即可恢復
            Self::HttpError(_) | Self::ConfirmationTimeoutError { .. } => ErrorSeverity::Medium,
            Self::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    /// 提供給使用者的下一步建議
    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::HttpError(_) => {
                "Check your network connection and the endpoint URLs in the configuration file"
                    .to_string()
            }
            Self::IoError(_) => {
                "Check file permissions and that the output/template paths exist".to_string()
            }
            Self::SerializationError(_) => {
                "The response was not valid JSON; verify the endpoint serves JSON metadata"
                    .to_string()
            }
            Self::RpcError { method, .. } => format!(
                "The node rejected {}; verify the collection address and token id exist on the selected chain",
                method
            ),
            Self::RpcResponseError { .. } => {
                "The RPC endpoint returned an unexpected payload; verify it is a JSON-RPC endpoint"
                    .to_string()
            }
            Self::AbiError { .. } => {
                "Verify the collection implements ERC-721 tokenURI and the token id is valid"
                    .to_string()
            }
            Self::MetadataError { .. } => {
                "Verify the token metadata is reachable through the configured gateway".to_string()
            }
            Self::UnsupportedUriError { .. } => {
                "Only http(s) and ipfs token URIs are supported".to_string()
            }
            Self::ChainMismatchError { expected, .. } => format!(
                "Switch the wallet provider to chain {} before publishing",
                expected
            ),
            Self::NoAccountError => {
                "Unlock an account on the wallet provider or set wallet.from in the configuration"
                    .to_string()
            }
            Self::DeployError { .. } => {
                "The deployment transaction did not succeed; check the wallet balance and gas settings"
                    .to_string()
            }
            Self::ConfirmationTimeoutError { tx_hash, .. } => format!(
                "Check transaction {} on a block explorer before publishing again",
                tx_hash
            ),
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => {
                "Fix the configuration file or command line flags and run again".to_string()
            }
        }
    }

    /// 發布流程內的失敗一律回報統一訊息，設定錯誤回報具體原因
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => self.to_string(),
            _ => PUBLISH_FLOW_ERROR_MESSAGE.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PublisherError>;
