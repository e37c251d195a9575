pub mod abi;
pub mod reader;
pub mod rpc;
pub mod wallet;

pub use reader::TokenUriReader;
pub use rpc::RpcClient;
pub use wallet::WalletClient;
