use augment_publisher::chain::abi;
use augment_publisher::config::toml_config::PublisherConfig;
use augment_publisher::core::{AugmentForm, MetadataSource, TokenUriSource};
use augment_publisher::utils::error::Result;
use augment_publisher::utils::{logger, validation::Validate};
use augment_publisher::{IpfsGateway, RpcClient, TokenUriReader};
use clap::Parser;

/// 不碰錢包的唯讀查詢工具：tokenURI -> metadata
#[derive(Parser)]
#[command(name = "augment-lookup")]
#[command(about = "Looks up NFT token metadata without touching a wallet")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "augment-config.toml")]
    config: String,

    /// Chain to query (mainnet, optimism, polygon)
    #[arg(long)]
    chain: String,

    /// ERC-721 collection contract address
    #[arg(long)]
    collection: String,

    /// Token id, decimal or 0x hex
    #[arg(long)]
    token_id: String,

    /// Show which media URI a given media type would select
    #[arg(long)]
    media_type: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logger::init_cli_logger(args.verbose);

    let config = match PublisherConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };
    config.validate()?;

    let chain = args.chain.parse()?;
    let form = AugmentForm {
        chain,
        collection: args.collection.clone(),
        token_id: args.token_id.clone(),
        media_type: args
            .media_type
            .as_deref()
            .unwrap_or("image")
            .parse()?,
        display_height: "1".to_string(),
        meme_text: String::new(),
    };
    form.validate()?;

    println!("🔍 Looking up token {} of {}", form.token_id, form.collection);
    println!("  Chain: {} (id {})", form.chain, form.chain.chain_id());
    println!();

    let rpc_url = config.rpc_url_for(chain)?;
    let rpc = match config.rpc_timeout_seconds() {
        Some(seconds) => RpcClient::new(rpc_url).with_timeout(seconds),
        None => RpcClient::new(rpc_url),
    };
    let reader = TokenUriReader::new(rpc);
    let gateway = match config.gateway_timeout_seconds() {
        Some(seconds) => IpfsGateway::new(config.gateway_base_url()).with_timeout(seconds),
        None => IpfsGateway::new(config.gateway_base_url()),
    };

    let token_id = abi::parse_token_id(&form.token_id)?;
    let token_uri = reader.token_uri(&form.collection, &token_id).await?;
    println!("📡 tokenURI: {}", token_uri);

    let metadata_url = gateway.resolve(&token_uri)?;
    if metadata_url != token_uri {
        println!("📡 Metadata URL: {}", metadata_url);
    }

    let metadata = gateway.fetch(&metadata_url).await?;
    println!();
    println!("📋 Metadata:");
    if let Some(name) = &metadata.name {
        println!("  Name: {}", name);
    }
    if let Some(description) = &metadata.description {
        println!("  Description: {}", description);
    }
    if let Some(image) = &metadata.image {
        println!("  Image: {}", image);
    }
    if let Some(animation_url) = &metadata.animation_url {
        println!("  Animation URL: {}", animation_url);
    }

    if args.media_type.is_some() {
        println!();
        match form.media_type.select_media_uri(&metadata) {
            Some(uri) => println!("✅ Media URI for {}: {}", form.media_type, uri),
            None => println!(
                "❌ Metadata has no {} field for media type {}",
                form.media_type.metadata_field(),
                form.media_type
            ),
        }
    }

    Ok(())
}
