use crate::chain::abi;
use crate::chain::rpc::RpcClient;
use crate::domain::ports::TokenUriSource;
use crate::utils::error::Result;

/// 透過 eth_call 讀取 ERC-721 tokenURI
pub struct TokenUriReader {
    rpc: RpcClient,
}

impl TokenUriReader {
    pub fn new(rpc: RpcClient) -> Self {
        Self { rpc }
    }
}

impl TokenUriSource for TokenUriReader {
    async fn token_uri(&self, collection: &str, token_id: &[u8; 32]) -> Result<String> {
        let calldata = abi::token_uri_calldata(token_id);
        let params = serde_json::json!([
            {
                "to": collection,
                "data": abi::encode_hex(&calldata),
            },
            "latest",
        ]);

        tracing::debug!("🔍 eth_call tokenURI on {}", collection);
        let return_hex: String = self.rpc.call("eth_call", params).await?;
        let return_data = abi::decode_hex(&return_hex)?;
        let uri = abi::decode_string_return(&return_data)?;

        tracing::debug!("🔍 tokenURI resolved to: {}", uri);
        Ok(uri)
    }
}
