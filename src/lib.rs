pub mod chain;
pub mod config;
pub mod core;
pub mod domain;
pub mod gateway;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::LocalReceiptStore;

pub use chain::{RpcClient, TokenUriReader, WalletClient};
pub use config::PublisherConfig;
pub use core::engine::PublishEngine;
pub use core::publisher::{AugmentPublisher, PublishOptions};
pub use gateway::IpfsGateway;
pub use utils::error::{PublisherError, Result};
