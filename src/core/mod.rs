pub mod engine;
pub mod publisher;

pub use crate::domain::model::{
    AugmentForm, DeployPlan, NftRecord, PublishOutcome, PublishReceipt, PublishState,
};
pub use crate::domain::ports::{
    MetadataSource, PublishFlow, ReceiptSink, TokenUriSource, WalletProvider,
};
pub use crate::utils::error::Result;
