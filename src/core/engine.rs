use crate::core::PublishFlow;
use crate::domain::model::{DeployPlan, PublishOutcome, PublishReceipt, PublishState};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;
use std::sync::Mutex;

/// 驅動發布流程並追蹤狀態機 idle -> deploying -> success/error
pub struct PublishEngine<P: PublishFlow> {
    flow: P,
    monitor: SystemMonitor,
    state: Mutex<PublishState>,
}

impl<P: PublishFlow> PublishEngine<P> {
    pub fn new(flow: P) -> Self {
        Self::new_with_monitoring(flow, false)
    }

    pub fn new_with_monitoring(flow: P, monitor_enabled: bool) -> Self {
        Self {
            flow,
            monitor: SystemMonitor::new(monitor_enabled),
            state: Mutex::new(PublishState::Idle),
        }
    }

    pub fn state(&self) -> PublishState {
        self.state.lock().map(|s| *s).unwrap_or(PublishState::Error)
    }

    fn transition(&self, next: PublishState) {
        if let Ok(mut state) = self.state.lock() {
            tracing::debug!("Publish state: {} -> {}", *state, next);
            *state = next;
        }
    }

    /// 完整發布：lookup -> prepare -> submit
    pub async fn run(&self) -> Result<PublishOutcome> {
        match self.publish().await {
            Ok(receipt) => {
                self.transition(PublishState::Success);
                self.monitor.log_final_stats();
                Ok(PublishOutcome::Published(receipt))
            }
            Err(e) => {
                self.transition(PublishState::Error);
                Err(e)
            }
        }
    }

    /// 只跑唯讀階段，回傳部署計畫而不送交易
    pub async fn dry_run(&self) -> Result<PublishOutcome> {
        match self.analyze().await {
            Ok(plan) => {
                self.monitor.log_final_stats();
                Ok(PublishOutcome::DryRun(plan))
            }
            Err(e) => {
                self.transition(PublishState::Error);
                Err(e)
            }
        }
    }

    async fn publish(&self) -> Result<PublishReceipt> {
        println!("Starting publish flow...");

        // Lookup
        println!("Looking up token metadata...");
        let record = self.flow.lookup().await?;
        self.monitor.log_stats("Lookup");
        println!("Token URI: {}", record.token_uri);

        // Prepare
        println!("Preparing deployment...");
        let plan = self.flow.prepare(record).await?;
        self.monitor.log_stats("Prepare");
        println!("Media URI: {}", plan.media_uri);

        // Submit
        self.transition(PublishState::Deploying);
        println!("Deploying augment contract...");
        let receipt = self.flow.submit(plan).await?;
        self.monitor.log_stats("Deploy");
        println!("Deployed at: {}", receipt.contract_address);

        Ok(receipt)
    }

    async fn analyze(&self) -> Result<DeployPlan> {
        println!("Looking up token metadata...");
        let record = self.flow.lookup().await?;
        self.monitor.log_stats("Lookup");
        println!("Token URI: {}", record.token_uri);

        println!("Preparing deployment...");
        let plan = self.flow.prepare(record).await?;
        self.monitor.log_stats("Prepare");

        Ok(plan)
    }
}
