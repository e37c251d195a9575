use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::error::PublisherError;

/// 支援的鏈，對應原生 chain id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChainId {
    Mainnet,
    Optimism,
    Polygon,
}

impl ChainId {
    pub fn chain_id(&self) -> u64 {
        match self {
            Self::Mainnet => 1,
            Self::Optimism => 10,
            Self::Polygon => 137,
        }
    }

    /// 設定檔 [chains.*] 表的 key
    pub fn config_key(&self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Optimism => "optimism",
            Self::Polygon => "polygon",
        }
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.config_key())
    }
}

impl FromStr for ChainId {
    type Err = PublisherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "eth" | "ethereum" | "mainnet" | "1" => Ok(Self::Mainnet),
            "optimism" | "op" | "10" => Ok(Self::Optimism),
            "polygon" | "matic" | "137" => Ok(Self::Polygon),
            other => Err(PublisherError::InvalidConfigValueError {
                field: "chain".to_string(),
                value: other.to_string(),
                reason: "supported chains are mainnet, optimism and polygon".to_string(),
            }),
        }
    }
}

/// 要顯示的媒體型態，鏈上以 uint8 表示
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaType {
    Image,
    Model,
    Audio,
}

impl MediaType {
    pub fn as_u8(&self) -> u8 {
        match self {
            Self::Image => 0,
            Self::Model => 1,
            Self::Audio => 2,
        }
    }

    /// Image 取 metadata.image，其餘取 metadata.animation_url
    pub fn select_media_uri<'a>(&self, metadata: &'a NftMetadata) -> Option<&'a str> {
        match self {
            Self::Image => metadata.image.as_deref(),
            Self::Model | Self::Audio => metadata.animation_url.as_deref(),
        }
    }

    pub fn metadata_field(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Model | Self::Audio => "animation_url",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Image => "image",
            Self::Model => "model",
            Self::Audio => "audio",
        };
        f.write_str(name)
    }
}

impl FromStr for MediaType {
    type Err = PublisherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "image" => Ok(Self::Image),
            "model" | "3d" | "3d-model" => Ok(Self::Model),
            "audio" => Ok(Self::Audio),
            other => Err(PublisherError::InvalidConfigValueError {
                field: "media_type".to_string(),
                value: other.to_string(),
                reason: "supported media types are image, model and audio".to_string(),
            }),
        }
    }
}

/// 使用者填寫的發布表單
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AugmentForm {
    pub chain: ChainId,
    pub collection: String,
    pub token_id: String,
    pub media_type: MediaType,
    pub display_height: String,
    pub meme_text: String,
}

impl AugmentForm {
    pub fn validate(&self) -> crate::utils::error::Result<()> {
        crate::utils::validation::validate_address("collection", &self.collection)?;
        crate::utils::validation::validate_token_id("token_id", &self.token_id)?;
        crate::utils::validation::parse_display_height("display_height", &self.display_height)?;
        Ok(())
    }
}

/// token metadata，未知欄位一律忽略
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NftMetadata {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub animation_url: Option<String>,
}

/// lookup 階段的結果
#[derive(Debug, Clone)]
pub struct NftRecord {
    pub token_uri: String,
    pub metadata_url: String,
    pub metadata: NftMetadata,
}

/// prepare 階段產出的部署計畫
#[derive(Debug, Clone)]
pub struct DeployPlan {
    pub media_uri: String,
    pub display_height_cm: u64,
    pub constructor_args: Vec<u8>,
    pub deploy_data: Vec<u8>,
}

/// eth_getTransactionReceipt 回傳的收據
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub transaction_hash: String,
    #[serde(default)]
    pub contract_address: Option<String>,
    #[serde(default)]
    pub block_number: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// 發布成功後留存的本地收據
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishReceipt {
    pub chain: String,
    pub chain_id: u64,
    pub collection: String,
    pub token_id: String,
    pub media_type: String,
    pub media_uri: String,
    pub display_height_cm: u64,
    pub meme_text: String,
    pub contract_address: String,
    pub transaction_hash: String,
    pub block_number: Option<u64>,
    pub published_at: DateTime<Utc>,
}

/// 發布流程的狀態機：idle → deploying → success/error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishState {
    Idle,
    Deploying,
    Success,
    Error,
}

impl fmt::Display for PublishState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Deploying => "deploying",
            Self::Success => "success",
            Self::Error => "error",
        };
        f.write_str(name)
    }
}

/// 引擎執行的結果：實際發布或 dry run
#[derive(Debug, Clone)]
pub enum PublishOutcome {
    Published(PublishReceipt),
    DryRun(DeployPlan),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_id_parsing() {
        assert_eq!("eth".parse::<ChainId>().unwrap(), ChainId::Mainnet);
        assert_eq!("Polygon".parse::<ChainId>().unwrap(), ChainId::Polygon);
        assert_eq!("10".parse::<ChainId>().unwrap(), ChainId::Optimism);
        assert!("goerli".parse::<ChainId>().is_err());
    }

    #[test]
    fn test_chain_id_values() {
        assert_eq!(ChainId::Mainnet.chain_id(), 1);
        assert_eq!(ChainId::Optimism.chain_id(), 10);
        assert_eq!(ChainId::Polygon.chain_id(), 137);
    }

    #[test]
    fn test_media_type_selection() {
        let metadata = NftMetadata {
            image: Some("ipfs://image".to_string()),
            animation_url: Some("ipfs://anim".to_string()),
            ..Default::default()
        };

        assert_eq!(
            MediaType::Image.select_media_uri(&metadata),
            Some("ipfs://image")
        );
        assert_eq!(
            MediaType::Model.select_media_uri(&metadata),
            Some("ipfs://anim")
        );
        assert_eq!(
            MediaType::Audio.select_media_uri(&metadata),
            Some("ipfs://anim")
        );

        let image_only = NftMetadata {
            image: Some("ipfs://image".to_string()),
            ..Default::default()
        };
        assert_eq!(MediaType::Model.select_media_uri(&image_only), None);
    }

    #[test]
    fn test_media_type_parsing() {
        assert_eq!("image".parse::<MediaType>().unwrap(), MediaType::Image);
        assert_eq!("3d".parse::<MediaType>().unwrap(), MediaType::Model);
        assert_eq!("AUDIO".parse::<MediaType>().unwrap(), MediaType::Audio);
        assert!("video".parse::<MediaType>().is_err());
    }

    #[test]
    fn test_metadata_ignores_unknown_fields() {
        let json = serde_json::json!({
            "name": "Bored Ape #1",
            "image": "ipfs://QmImage",
            "attributes": [{"trait_type": "Fur", "value": "Robot"}]
        });
        let metadata: NftMetadata = serde_json::from_value(json).unwrap();
        assert_eq!(metadata.name.as_deref(), Some("Bored Ape #1"));
        assert_eq!(metadata.image.as_deref(), Some("ipfs://QmImage"));
        assert!(metadata.animation_url.is_none());
    }

    #[test]
    fn test_form_validation() {
        let form = AugmentForm {
            chain: ChainId::Mainnet,
            collection: "0xBC4CA0EdA7647A8aB7C2061c2E118A18a936f13D".to_string(),
            token_id: "4495".to_string(),
            media_type: MediaType::Image,
            display_height: "10".to_string(),
            meme_text: String::new(),
        };
        assert!(form.validate().is_ok());

        let mut bad = form.clone();
        bad.collection = "not-an-address".to_string();
        assert!(bad.validate().is_err());

        let mut bad = form;
        bad.display_height = "0".to_string();
        assert!(bad.validate().is_err());
    }
}
