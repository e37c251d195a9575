use crate::chain::abi::{self, AbiValue};
use crate::chain::rpc::parse_quantity;
use crate::core::{MetadataSource, PublishFlow, ReceiptSink, TokenUriSource, WalletProvider};
use crate::domain::model::{AugmentForm, DeployPlan, NftRecord, PublishReceipt, TransactionReceipt};
use crate::utils::error::{PublisherError, Result};
use crate::utils::validation;
use std::time::Duration;

/// 部署交易的送出與確認參數
#[derive(Debug, Clone)]
pub struct PublishOptions {
    /// 指定送出帳戶；未設定時用錢包的第一個帳戶
    pub from: Option<String>,
    pub gas: Option<u64>,
    pub confirm_interval: Duration,
    pub confirm_attempts: u32,
}

impl Default for PublishOptions {
    fn default() -> Self {
        Self {
            from: None,
            gas: None,
            confirm_interval: Duration::from_millis(2000),
            confirm_attempts: 30,
        }
    }
}

/// 把表單變成鏈上 augment 的完整流程
///
/// lookup 讀 tokenURI 並抓 metadata，prepare 組出部署資料，
/// submit 送出部署交易、輪詢收據並留存本地收據檔。
pub struct AugmentPublisher<C, W, M, R> {
    form: AugmentForm,
    template: Vec<u8>,
    options: PublishOptions,
    reader: C,
    wallet: W,
    metadata: M,
    receipts: R,
}

impl<C, W, M, R> AugmentPublisher<C, W, M, R>
where
    C: TokenUriSource,
    W: WalletProvider,
    M: MetadataSource,
    R: ReceiptSink,
{
    pub fn new(
        form: AugmentForm,
        template: Vec<u8>,
        options: PublishOptions,
        reader: C,
        wallet: W,
        metadata: M,
        receipts: R,
    ) -> Self {
        Self {
            form,
            template,
            options,
            reader,
            wallet,
            metadata,
            receipts,
        }
    }

    fn receipt_filename(&self) -> String {
        format!(
            "augment-{}-{}-{}.json",
            self.form.chain,
            self.form.collection.to_lowercase(),
            self.form.token_id
        )
    }

    /// 輪詢交易收據，次數用完仍未確認就放棄
    async fn wait_for_receipt(&self, tx_hash: &str) -> Result<TransactionReceipt> {
        let attempts = self.options.confirm_attempts;
        for attempt in 1..=attempts {
            if let Some(receipt) = self.wallet.transaction_receipt(tx_hash).await? {
                tracing::debug!("⏳ Receipt found after {} attempt(s)", attempt);
                return Ok(receipt);
            }

            tracing::debug!("⏳ Waiting for confirmation ({}/{})", attempt, attempts);
            if attempt < attempts {
                tokio::time::sleep(self.options.confirm_interval).await;
            }
        }

        Err(PublisherError::ConfirmationTimeoutError {
            tx_hash: tx_hash.to_string(),
            attempts,
        })
    }
}

#[async_trait::async_trait]
impl<C, W, M, R> PublishFlow for AugmentPublisher<C, W, M, R>
where
    C: TokenUriSource,
    W: WalletProvider,
    M: MetadataSource,
    R: ReceiptSink,
{
    async fn lookup(&self) -> Result<NftRecord> {
        let token_id = abi::parse_token_id(&self.form.token_id)?;

        tracing::info!(
            "🔍 Looking up token {} of {} on {}",
            self.form.token_id,
            self.form.collection,
            self.form.chain
        );
        let token_uri = self
            .reader
            .token_uri(&self.form.collection, &token_id)
            .await?;
        tracing::info!("🔍 tokenURI: {}", token_uri);

        let metadata_url = self.metadata.resolve(&token_uri)?;
        if metadata_url != token_uri {
            tracing::debug!("🔍 Resolved metadata URL: {}", metadata_url);
        }

        let metadata = self.metadata.fetch(&metadata_url).await?;
        if let Some(name) = &metadata.name {
            tracing::info!("✅ Token metadata found: {}", name);
        }

        Ok(NftRecord {
            token_uri,
            metadata_url,
            metadata,
        })
    }

    async fn prepare(&self, record: NftRecord) -> Result<DeployPlan> {
        // image 型態取 metadata.image，其餘取 animation_url；缺欄位就不部署
        let media_uri = self
            .form
            .media_type
            .select_media_uri(&record.metadata)
            .ok_or_else(|| PublisherError::MetadataError {
                url: record.metadata_url.clone(),
                reason: format!(
                    "metadata has no {} field for media type {}",
                    self.form.media_type.metadata_field(),
                    self.form.media_type
                ),
            })?
            .to_string();

        let display_height_cm =
            validation::parse_display_height("display_height", &self.form.display_height)?;

        let constructor_args = abi::encode_constructor_args(&[
            AbiValue::Address(abi::parse_address(&self.form.collection)?),
            AbiValue::Uint256(abi::parse_token_id(&self.form.token_id)?),
            AbiValue::Str(media_uri.clone()),
            AbiValue::Uint8(self.form.media_type.as_u8()),
            AbiValue::Uint256(abi::uint_word(display_height_cm)),
            AbiValue::Str(self.form.meme_text.clone()),
        ]);

        let mut deploy_data = Vec::with_capacity(self.template.len() + constructor_args.len());
        deploy_data.extend_from_slice(&self.template);
        deploy_data.extend_from_slice(&constructor_args);

        tracing::info!(
            "📦 Deploy plan ready: {} ({}), height {} cm, {} bytes of init code",
            media_uri,
            self.form.media_type,
            display_height_cm,
            deploy_data.len()
        );

        Ok(DeployPlan {
            media_uri,
            display_height_cm,
            constructor_args,
            deploy_data,
        })
    }

    async fn submit(&self, plan: DeployPlan) -> Result<PublishReceipt> {
        // 錢包必須連在表單選定的鏈上
        let expected = self.form.chain.chain_id();
        let actual = self.wallet.wallet_chain_id().await?;
        if actual != expected {
            return Err(PublisherError::ChainMismatchError { expected, actual });
        }

        let from = match &self.options.from {
            Some(from) => from.clone(),
            None => {
                let accounts = self.wallet.accounts().await?;
                accounts
                    .into_iter()
                    .next()
                    .ok_or(PublisherError::NoAccountError)?
            }
        };

        tracing::info!("🚀 Deploying augment template from {}", from);
        let data_hex = abi::encode_hex(&plan.deploy_data);
        let tx_hash = self
            .wallet
            .send_deploy(&from, &data_hex, self.options.gas)
            .await?;
        tracing::info!("🚀 Deploy transaction sent: {}", tx_hash);

        let receipt = self.wait_for_receipt(&tx_hash).await?;

        // status 0x0 代表部署交易 revert
        if receipt.status.as_deref() == Some("0x0") {
            return Err(PublisherError::DeployError {
                reason: format!("transaction {} reverted", tx_hash),
            });
        }

        let contract_address =
            receipt
                .contract_address
                .clone()
                .ok_or_else(|| PublisherError::DeployError {
                    reason: format!("receipt for {} has no contract address", tx_hash),
                })?;

        let block_number = match receipt.block_number.as_deref() {
            Some(hex) => Some(parse_quantity("eth_getTransactionReceipt", hex)?),
            None => None,
        };

        let publish_receipt = PublishReceipt {
            chain: self.form.chain.to_string(),
            chain_id: expected,
            collection: self.form.collection.clone(),
            token_id: self.form.token_id.clone(),
            media_type: self.form.media_type.to_string(),
            media_uri: plan.media_uri.clone(),
            display_height_cm: plan.display_height_cm,
            meme_text: self.form.meme_text.clone(),
            contract_address,
            transaction_hash: tx_hash,
            block_number,
            published_at: chrono::Utc::now(),
        };

        // 留存本地收據檔
        let receipt_json = serde_json::to_string_pretty(&publish_receipt)?;
        let filename = self.receipt_filename();
        self.receipts
            .write_file(&filename, receipt_json.as_bytes())
            .await?;
        tracing::info!("📁 Receipt saved to: {}", filename);

        tracing::info!(
            "✅ Augment deployed at {}",
            publish_receipt.contract_address
        );
        Ok(publish_receipt)
    }
}
