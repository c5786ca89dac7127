//! Wallet bridge transport against a local JSON-RPC endpoint.

use serde_json::json;

use tokenbound_wallet::{
    domain::transfer::{Erc20Transfer, TransferResult},
    infra::tokenbound::{BridgeTokenbound, TokenboundOptions, TokenboundSdk, run_transfer},
};

use super::support::{client, dead_url, serve_once};

fn bridge(url: &str) -> BridgeTokenbound {
    BridgeTokenbound::with_client(
        client(),
        url,
        TokenboundOptions {
            registry_address: "0xreg".to_string(),
            implementation_address: "0ximpl".to_string(),
            json_rpc: "https://rpc.example".to_string(),
        },
    )
}

fn transfer() -> Erc20Transfer {
    Erc20Transfer {
        tba_address: "0xtba".to_string(),
        contract_address: "0xeth".to_string(),
        recipient: "0xabc".to_string(),
        amount: "1500000000000000000".to_string(),
    }
}

#[tokio::test]
async fn test_get_account_sends_options() {
    let (url, server) = serve_once(
        "200 OK",
        json!({ "jsonrpc": "2.0", "id": 1, "result": "0xABCdef" }).to_string(),
    )
    .await;

    let address = bridge(&url).get_account("0xnft", "7").await.unwrap();
    assert_eq!(address, "0xabcdef");

    let request = server.await.unwrap().json();
    assert_eq!(request["jsonrpc"], "2.0");
    assert_eq!(request["method"], "tokenbound_getAccount");
    assert_eq!(request["params"]["tokenContract"], "0xnft");
    assert_eq!(request["params"]["tokenId"], "7");
    assert_eq!(request["params"]["options"]["registryAddress"], "0xreg");
    assert_eq!(request["params"]["options"]["implementationAddress"], "0ximpl");
    assert_eq!(request["params"]["options"]["jsonRPC"], "https://rpc.example");
}

#[tokio::test]
async fn test_balance_accepts_string_result() {
    let (url, server) = serve_once(
        "200 OK",
        json!({ "jsonrpc": "2.0", "id": 1, "result": "2500000000000000000" }).to_string(),
    )
    .await;

    let raw = bridge(&url).erc20_balance("0xtba", "0xeth").await.unwrap();
    assert_eq!(raw, "2500000000000000000");

    let request = server.await.unwrap().json();
    assert_eq!(request["method"], "tokenbound_erc20Balance");
    assert_eq!(request["params"]["tbaAddress"], "0xtba");
    assert_eq!(request["params"]["contractAddress"], "0xeth");
}

#[tokio::test]
async fn test_transfer_with_receipt_succeeds() {
    let (url, server) = serve_once(
        "200 OK",
        json!({ "jsonrpc": "2.0", "id": 1, "result": { "transaction_hash": "0x1" } }).to_string(),
    )
    .await;

    let result = run_transfer(&bridge(&url), &transfer()).await;
    assert_eq!(result, TransferResult::Success);

    let request = server.await.unwrap().json();
    assert_eq!(request["method"], "tokenbound_transferERC20");
    assert_eq!(request["params"]["amount"], "1500000000000000000");
    assert_eq!(request["params"]["recipient"], "0xabc");
}

#[tokio::test]
async fn test_falsy_transfer_result_is_failure() {
    let (url, _server) = serve_once(
        "200 OK",
        json!({ "jsonrpc": "2.0", "id": 1, "result": false }).to_string(),
    )
    .await;
    assert_eq!(
        run_transfer(&bridge(&url), &transfer()).await,
        TransferResult::Failure
    );
}

#[tokio::test]
async fn test_rpc_error_is_exception() {
    let (url, _server) = serve_once(
        "200 OK",
        json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": { "code": -32000, "message": "user rejected" }
        })
        .to_string(),
    )
    .await;

    let result = run_transfer(&bridge(&url), &transfer()).await;
    assert!(matches!(
        result,
        TransferResult::Exception(reason) if reason.contains("user rejected")
    ));
}

#[tokio::test]
async fn test_unreachable_bridge_is_exception() {
    let result = run_transfer(&bridge(&dead_url().await), &transfer()).await;
    assert!(matches!(result, TransferResult::Exception(_)));
}
