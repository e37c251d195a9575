use augment_publisher::core::{AugmentForm, DeployPlan, PublishOutcome, PublishReceipt};
use augment_publisher::utils::error::{ErrorSeverity, PublisherError, Result};
use augment_publisher::utils::{logger, validation::Validate};
use augment_publisher::{
    AugmentPublisher, IpfsGateway, LocalReceiptStore, PublishEngine, PublishOptions,
    PublisherConfig, RpcClient, TokenUriReader, WalletClient,
};
use clap::Parser;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "augment-publisher")]
#[command(about = "Publishes NFT augments as on-chain template deployments")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "augment-config.toml")]
    config: String,

    /// Chain to publish on (mainnet, optimism, polygon)
    #[arg(long)]
    chain: String,

    /// ERC-721 collection contract address
    #[arg(long)]
    collection: String,

    /// Token id, decimal or 0x hex
    #[arg(long)]
    token_id: String,

    /// Media type shown by the augment (image, model, audio)
    #[arg(long, default_value = "image")]
    media_type: String,

    /// Display height in meters
    #[arg(long)]
    display_height: String,

    /// Meme text engraved into the augment
    #[arg(long, default_value = "")]
    meme_text: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Dry run - resolve metadata and build the deploy plan without sending
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Starting NFT augment publisher");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    // 載入 TOML 配置
    let config = match PublisherConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    // 組裝並驗證發布表單
    let form = match build_form(&args) {
        Ok(form) => form,
        Err(e) => {
            tracing::error!("❌ Invalid publish form: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    tracing::info!("✅ Configuration loaded and validated successfully");

    // 顯示發布摘要
    display_publish_summary(&config, &form, &args);

    let rpc_url = match config.rpc_url_for(form.chain) {
        Ok(url) => url.to_string(),
        Err(e) => {
            tracing::error!("❌ {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    // 載入 augment template bytecode
    let template = match config.load_bytecode() {
        Ok(template) => template,
        Err(e) => {
            tracing::error!("❌ Failed to load template bytecode: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };
    tracing::info!("📦 Template bytecode loaded ({} bytes)", template.len());

    // 決定監控設定
    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    // 組裝發布流程的各個組件
    let reader = TokenUriReader::new(build_rpc(&rpc_url, config.rpc_timeout_seconds()));
    let wallet = WalletClient::new(build_rpc(
        &config.wallet.endpoint,
        config.rpc_timeout_seconds(),
    ));
    let gateway = match config.gateway_timeout_seconds() {
        Some(seconds) => IpfsGateway::new(config.gateway_base_url()).with_timeout(seconds),
        None => IpfsGateway::new(config.gateway_base_url()),
    };
    let receipts = LocalReceiptStore::new(config.output_path().to_string());

    let options = PublishOptions {
        from: config.wallet_from().map(String::from),
        gas: config.gas(),
        confirm_interval: Duration::from_millis(config.confirm_interval_ms()),
        confirm_attempts: config.confirm_attempts(),
    };

    let publisher = AugmentPublisher::new(form, template, options, reader, wallet, gateway, receipts);
    let engine = PublishEngine::new_with_monitoring(publisher, monitor_enabled);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No transaction will be sent");
    }

    let outcome = if args.dry_run {
        engine.dry_run().await
    } else {
        engine.run().await
    };

    match outcome {
        Ok(PublishOutcome::Published(receipt)) => {
            tracing::info!("✅ Publish completed successfully!");
            display_publish_receipt(&receipt);
        }
        Ok(PublishOutcome::DryRun(plan)) => {
            display_deploy_plan(&plan);
        }
        Err(e) => {
            let exit_code = report_publish_failure(&e);
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn build_form(args: &Args) -> Result<AugmentForm> {
    let form = AugmentForm {
        chain: args.chain.parse()?,
        collection: args.collection.clone(),
        token_id: args.token_id.clone(),
        media_type: args.media_type.parse()?,
        display_height: args.display_height.clone(),
        meme_text: args.meme_text.clone(),
    };
    form.validate()?;
    Ok(form)
}

fn build_rpc(endpoint: &str, timeout_seconds: Option<u64>) -> RpcClient {
    let client = RpcClient::new(endpoint);
    match timeout_seconds {
        Some(seconds) => client.with_timeout(seconds),
        None => client,
    }
}

fn display_publish_summary(config: &PublisherConfig, form: &AugmentForm, args: &Args) {
    println!("📋 Publish Summary:");
    println!(
        "  Publisher: {} v{}",
        config.publisher.name, config.publisher.version
    );
    println!("  Chain: {} (id {})", form.chain, form.chain.chain_id());
    println!("  Collection: {}", form.collection);
    println!("  Token: {}", form.token_id);
    println!("  Media Type: {}", form.media_type);
    println!("  Display Height: {} m", form.display_height);
    if !form.meme_text.is_empty() {
        println!("  Meme Text: {}", form.meme_text);
    }
    println!("  Wallet: {}", config.wallet.endpoint);
    println!("  Gateway: {}", config.gateway_base_url());
    println!("  Receipts: {}", config.output_path());

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn display_deploy_plan(plan: &DeployPlan) {
    println!();
    println!("🔍 Dry Run Result:");
    println!("  Media URI: {}", plan.media_uri);
    println!("  Display Height: {} cm", plan.display_height_cm);
    println!("  Constructor Args: {} bytes", plan.constructor_args.len());
    println!("  Init Code: {} bytes", plan.deploy_data.len());
    println!();
    println!("✅ Dry run complete. Run again without --dry-run to deploy.");
}

fn display_publish_receipt(receipt: &PublishReceipt) {
    println!();
    println!("✅ NFT augment published!");
    println!("  Contract: {}", receipt.contract_address);
    println!("  Transaction: {}", receipt.transaction_hash);
    if let Some(block) = receipt.block_number {
        println!("  Block: {}", block);
    }
    println!("  Media: {} ({})", receipt.media_uri, receipt.media_type);
}

fn report_publish_failure(e: &PublisherError) -> i32 {
    // 記錄詳細錯誤信息
    tracing::error!(
        "❌ Publish failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    // 輸出用戶友好的錯誤信息
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    match e.severity() {
        ErrorSeverity::Low => 0,      // 警告，但成功
        ErrorSeverity::Medium => 2,   // 重試錯誤
        ErrorSeverity::High => 1,     // 處理錯誤
        ErrorSeverity::Critical => 3, // 系統錯誤
    }
}
