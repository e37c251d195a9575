use crate::chain::rpc::{parse_quantity, RpcClient};
use crate::domain::model::TransactionReceipt;
use crate::domain::ports::WalletProvider;
use crate::utils::error::Result;

/// 對外部 JSON-RPC 簽名端點（本地節點或錢包守護程序）的客戶端
pub struct WalletClient {
    rpc: RpcClient,
}

impl WalletClient {
    pub fn new(rpc: RpcClient) -> Self {
        Self { rpc }
    }
}

impl WalletProvider for WalletClient {
    async fn wallet_chain_id(&self) -> Result<u64> {
        let hex: String = self.rpc.call("eth_chainId", serde_json::json!([])).await?;
        parse_quantity("eth_chainId", &hex)
    }

    async fn accounts(&self) -> Result<Vec<String>> {
        self.rpc.call("eth_accounts", serde_json::json!([])).await
    }

    async fn send_deploy(&self, from: &str, data_hex: &str, gas: Option<u64>) -> Result<String> {
        let mut tx = serde_json::json!({
            "from": from,
            "data": data_hex,
        });
        if let Some(gas) = gas {
            tx["gas"] = serde_json::Value::String(format!("0x{:x}", gas));
        }

        tracing::debug!(
            "🚀 eth_sendTransaction from {} ({} bytes of data)",
            from,
            data_hex.len().saturating_sub(2) / 2
        );
        self.rpc
            .call("eth_sendTransaction", serde_json::json!([tx]))
            .await
    }

    async fn transaction_receipt(&self, tx_hash: &str) -> Result<Option<TransactionReceipt>> {
        self.rpc
            .call_nullable("eth_getTransactionReceipt", serde_json::json!([tx_hash]))
            .await
    }
}
