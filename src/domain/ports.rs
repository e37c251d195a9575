use crate::domain::model::{DeployPlan, NftMetadata, NftRecord, PublishReceipt, TransactionReceipt};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 讀取鏈上 ERC-721 tokenURI 的入口
pub trait TokenUriSource: Send + Sync {
    fn token_uri(
        &self,
        collection: &str,
        token_id: &[u8; 32],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

/// 外部錢包提供者（持有帳戶並負責簽名）
pub trait WalletProvider: Send + Sync {
    fn wallet_chain_id(&self) -> impl std::future::Future<Output = Result<u64>> + Send;
    fn accounts(&self) -> impl std::future::Future<Output = Result<Vec<String>>> + Send;
    /// 送出部署交易（to 留空），回傳交易雜湊
    fn send_deploy(
        &self,
        from: &str,
        data_hex: &str,
        gas: Option<u64>,
    ) -> impl std::future::Future<Output = Result<String>> + Send;
    fn transaction_receipt(
        &self,
        tx_hash: &str,
    ) -> impl std::future::Future<Output = Result<Option<TransactionReceipt>>> + Send;
}

/// 取得 token metadata 的入口（IPFS gateway 或任意 HTTP 端點）
pub trait MetadataSource: Send + Sync {
    /// 把 token URI 轉成可直接抓取的 HTTP URL
    fn resolve(&self, token_uri: &str) -> Result<String>;
    fn fetch(&self, url: &str) -> impl std::future::Future<Output = Result<NftMetadata>> + Send;
}

/// 本地收據的寫入端
pub trait ReceiptSink: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// 發布流程的三個循序階段
#[async_trait]
pub trait PublishFlow: Send + Sync {
    /// 讀 tokenURI、解析並抓取 metadata
    async fn lookup(&self) -> Result<NftRecord>;
    /// 選定媒體 URI 並組出部署資料
    async fn prepare(&self, record: NftRecord) -> Result<DeployPlan>;
    /// 送出部署交易並等待確認
    async fn submit(&self, plan: DeployPlan) -> Result<PublishReceipt>;
}
