use augment_publisher::core::{AugmentForm, PublishOutcome, PublishState};
use augment_publisher::domain::model::{ChainId, MediaType};
use augment_publisher::{
    AugmentPublisher, IpfsGateway, LocalReceiptStore, PublishEngine, PublishOptions,
    PublisherConfig, PublisherError, RpcClient, TokenUriReader, WalletClient,
};
use httpmock::prelude::*;
use std::time::Duration;
use tempfile::TempDir;

const COLLECTION: &str = "0x2953399124F0cBB46d2CbACD8A89cF0599974963";
const DEPLOYED_AT: &str = "0x5fbdb2315678afecb367f032d93f642f64180aa3";
const TX_HASH: &str = "0x88df016429689c079f3b2f6ad39fa052532c56795b733da78a91ebe6a713944b";

/// eth_call 回傳值：ABI 編碼的單一 string（offset + length + padded bytes）
fn abi_string_return(value: &str) -> String {
    let mut padded = value.as_bytes().to_vec();
    while padded.len() % 32 != 0 {
        padded.push(0);
    }
    let mut out = format!("0x{:064x}{:064x}", 32, value.len());
    for byte in &padded {
        out.push_str(&format!("{:02x}", byte));
    }
    out
}

fn test_config(server: &MockServer, output_path: &str) -> PublisherConfig {
    let chain_rpc = server.url("/rpc/chain");
    let wallet_rpc = server.url("/rpc/wallet");
    let gateway = server.base_url();
    let output = output_path.replace('\\', "/");
    let content = format!(
        r#"
[publisher]
name = "augment-publisher"
description = "Integration test config"
version = "0.1.0"

[chains.polygon]
rpc_url = "{chain_rpc}"

[wallet]
endpoint = "{wallet_rpc}"

[gateway]
base_url = "{gateway}"

[template]
bytecode = "0x6080604052"

[publish]
output_path = "{output}"
confirm_interval_ms = 1
confirm_attempts = 3
gas = 3000000
"#
    );
    PublisherConfig::from_toml_str(&content).unwrap()
}

fn test_form() -> AugmentForm {
    AugmentForm {
        chain: ChainId::Polygon,
        collection: COLLECTION.to_string(),
        token_id: "4495".to_string(),
        media_type: MediaType::Image,
        display_height: "0.25".to_string(),
        meme_text: "wen moon".to_string(),
    }
}

/// 照 CLI 的接線方式組出完整的 publisher
fn build_publisher(
    config: &PublisherConfig,
    form: AugmentForm,
) -> AugmentPublisher<TokenUriReader, WalletClient, IpfsGateway, LocalReceiptStore> {
    let template = config.load_bytecode().unwrap();
    let reader = TokenUriReader::new(RpcClient::new(config.rpc_url_for(form.chain).unwrap()));
    let wallet = WalletClient::new(RpcClient::new(config.wallet.endpoint.clone()));
    let gateway = IpfsGateway::new(config.gateway_base_url());
    let receipts = LocalReceiptStore::new(config.output_path().to_string());
    let options = PublishOptions {
        from: config.wallet_from().map(String::from),
        gas: config.gas(),
        confirm_interval: Duration::from_millis(config.confirm_interval_ms()),
        confirm_attempts: config.confirm_attempts(),
    };
    AugmentPublisher::new(form, template, options, reader, wallet, gateway, receipts)
}

fn mock_token_uri<'a>(server: &'a MockServer, token_uri: &str) -> httpmock::Mock<'a> {
    let body = abi_string_return(token_uri);
    server.mock(move |when, then| {
        when.method(POST)
            .path("/rpc/chain")
            .json_body_partial(r#"{"method": "eth_call"}"#)
            .body_contains("c87b56dd");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "jsonrpc": "2.0",
                "id": 1,
                "result": body,
            }));
    })
}

fn mock_wallet_call<'a>(
    server: &'a MockServer,
    method: &str,
    result: serde_json::Value,
) -> httpmock::Mock<'a> {
    let matcher = format!(r#"{{"method": "{}"}}"#, method);
    server.mock(move |when, then| {
        when.method(POST)
            .path("/rpc/wallet")
            .json_body_partial(matcher);
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "jsonrpc": "2.0",
                "id": 1,
                "result": result,
            }));
    })
}

#[tokio::test]
async fn test_end_to_end_publish_with_real_http() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();

    let token_uri_mock = mock_token_uri(&server, "ipfs://QmMetaHash/4495.json");

    let metadata_mock = server.mock(|when, then| {
        when.method(GET).path("/ipfs/QmMetaHash/4495.json");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "name": "Creature #4495",
                "description": "A friendly creature",
                "image": "ipfs://QmImageHash/4495.png",
            }));
    });

    let chain_id_mock = mock_wallet_call(&server, "eth_chainId", serde_json::json!("0x89"));
    let accounts_mock = mock_wallet_call(
        &server,
        "eth_accounts",
        serde_json::json!(["0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"]),
    );
    let send_mock = mock_wallet_call(&server, "eth_sendTransaction", serde_json::json!(TX_HASH));
    let receipt_mock = mock_wallet_call(
        &server,
        "eth_getTransactionReceipt",
        serde_json::json!({
            "transactionHash": TX_HASH,
            "contractAddress": DEPLOYED_AT,
            "blockNumber": "0x10",
            "status": "0x1",
        }),
    );

    let config = test_config(&server, &output_path);
    let publisher = build_publisher(&config, test_form());
    let engine = PublishEngine::new_with_monitoring(publisher, false);

    let result = engine.run().await;

    assert!(result.is_ok());
    token_uri_mock.assert();
    metadata_mock.assert();
    chain_id_mock.assert();
    accounts_mock.assert();
    send_mock.assert();
    receipt_mock.assert();
    assert_eq!(engine.state(), PublishState::Success);

    let receipt = match result.unwrap() {
        PublishOutcome::Published(receipt) => receipt,
        other => panic!("expected published outcome, got {:?}", other),
    };
    assert_eq!(receipt.contract_address, DEPLOYED_AT);
    assert_eq!(receipt.transaction_hash, TX_HASH);
    assert_eq!(receipt.block_number, Some(16));
    assert_eq!(receipt.chain, "polygon");
    assert_eq!(receipt.chain_id, 137);
    assert_eq!(receipt.media_uri, "ipfs://QmImageHash/4495.png");
    assert_eq!(receipt.display_height_cm, 25);

    // Verify the local receipt file was written and parses back
    let file_name = format!("augment-polygon-{}-4495.json", COLLECTION.to_lowercase());
    let full_path = temp_dir.path().join(&file_name);
    assert!(full_path.exists());

    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&full_path).unwrap()).unwrap();
    assert_eq!(saved["contract_address"], DEPLOYED_AT);
    assert_eq!(saved["token_id"], "4495");
    assert_eq!(saved["meme_text"], "wen moon");
}

#[tokio::test]
async fn test_publish_failure_surfaces_generic_message() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();

    let token_uri_mock = mock_token_uri(&server, "ipfs://QmMetaHash/4495.json");

    // Metadata host is down - lookup should fail before any wallet traffic
    let metadata_mock = server.mock(|when, then| {
        when.method(GET).path("/ipfs/QmMetaHash/4495.json");
        then.status(500);
    });

    let send_mock = mock_wallet_call(&server, "eth_sendTransaction", serde_json::json!(TX_HASH));

    let config = test_config(&server, &output_path);
    let publisher = build_publisher(&config, test_form());
    let engine = PublishEngine::new_with_monitoring(publisher, false);

    let result = engine.run().await;

    assert!(result.is_err());
    token_uri_mock.assert();
    metadata_mock.assert();
    send_mock.assert_hits(0);
    assert_eq!(engine.state(), PublishState::Error);

    let error = result.unwrap_err();
    assert_eq!(
        error.user_friendly_message(),
        "There was an error while trying to publish the NFT augment, please make sure the information provided is right"
    );

    // No receipt file on failure
    assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_wallet_on_wrong_chain_aborts_before_deploy() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();

    mock_token_uri(&server, "ipfs://QmMetaHash/4495.json");
    server.mock(|when, then| {
        when.method(GET).path("/ipfs/QmMetaHash/4495.json");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({"image": "ipfs://QmImageHash/4495.png"}));
    });

    // 錢包連到 mainnet，但表單選的是 polygon
    let chain_id_mock = mock_wallet_call(&server, "eth_chainId", serde_json::json!("0x1"));
    let send_mock = mock_wallet_call(&server, "eth_sendTransaction", serde_json::json!(TX_HASH));

    let config = test_config(&server, &output_path);
    let publisher = build_publisher(&config, test_form());
    let engine = PublishEngine::new_with_monitoring(publisher, false);

    let result = engine.run().await;

    assert!(result.is_err());
    chain_id_mock.assert();
    send_mock.assert_hits(0);
    assert_eq!(engine.state(), PublishState::Error);

    match result.unwrap_err() {
        PublisherError::ChainMismatchError { expected, actual } => {
            assert_eq!(expected, 137);
            assert_eq!(actual, 1);
        }
        other => panic!("expected chain mismatch, got {:?}", other),
    }
}

#[tokio::test]
async fn test_dry_run_prepares_without_sending_transaction() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();

    let token_uri_mock = mock_token_uri(&server, "ipfs://QmMetaHash/4495.json");
    let metadata_mock = server.mock(|when, then| {
        when.method(GET).path("/ipfs/QmMetaHash/4495.json");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({"image": "ipfs://QmImageHash/4495.png"}));
    });
    let send_mock = mock_wallet_call(&server, "eth_sendTransaction", serde_json::json!(TX_HASH));

    let config = test_config(&server, &output_path);
    let publisher = build_publisher(&config, test_form());
    let engine = PublishEngine::new_with_monitoring(publisher, false);

    let result = engine.dry_run().await;

    assert!(result.is_ok());
    token_uri_mock.assert();
    metadata_mock.assert();
    send_mock.assert_hits(0);
    // Dry run never leaves idle
    assert_eq!(engine.state(), PublishState::Idle);

    let plan = match result.unwrap() {
        PublishOutcome::DryRun(plan) => plan,
        other => panic!("expected dry run outcome, got {:?}", other),
    };
    assert_eq!(plan.media_uri, "ipfs://QmImageHash/4495.png");
    assert_eq!(plan.display_height_cm, 25);
    assert!(plan.deploy_data.starts_with(&[0x60, 0x80, 0x60, 0x40, 0x52]));
    assert_eq!(plan.deploy_data.len(), 5 + plan.constructor_args.len());

    // Nothing written in dry run mode
    assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_unconfirmed_transaction_times_out() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();

    mock_token_uri(&server, "ipfs://QmMetaHash/4495.json");
    server.mock(|when, then| {
        when.method(GET).path("/ipfs/QmMetaHash/4495.json");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({"image": "ipfs://QmImageHash/4495.png"}));
    });
    mock_wallet_call(&server, "eth_chainId", serde_json::json!("0x89"));
    mock_wallet_call(
        &server,
        "eth_accounts",
        serde_json::json!(["0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"]),
    );
    mock_wallet_call(&server, "eth_sendTransaction", serde_json::json!(TX_HASH));
    // 交易一直 pending：收據永遠是 null
    let receipt_mock = mock_wallet_call(
        &server,
        "eth_getTransactionReceipt",
        serde_json::Value::Null,
    );

    let config = test_config(&server, &output_path);
    let publisher = build_publisher(&config, test_form());
    let engine = PublishEngine::new_with_monitoring(publisher, false);

    let result = engine.run().await;

    assert!(result.is_err());
    receipt_mock.assert_hits(3);
    assert_eq!(engine.state(), PublishState::Error);

    match result.unwrap_err() {
        PublisherError::ConfirmationTimeoutError { tx_hash, attempts } => {
            assert_eq!(tx_hash, TX_HASH);
            assert_eq!(attempts, 3);
        }
        other => panic!("expected confirmation timeout, got {:?}", other),
    }
}
