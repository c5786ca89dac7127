//! Marketplace client against a local HTTP server.

use serde_json::json;

use tokenbound_wallet::{
    config::MarketplaceConfig,
    domain::nft::{Chain, TokensEnvelope},
    infra::marketplace::{HttpMarketplace, MarketplaceApi},
};

use super::support::{client, dead_url, serve_once};

fn marketplace(url: String, api_key: Option<&str>) -> HttpMarketplace {
    HttpMarketplace::with_client(
        client(),
        &MarketplaceConfig {
            api_url: url,
            api_key: api_key.map(str::to_string),
        },
    )
}

#[tokio::test]
async fn test_portfolio_page_is_requested_and_parsed() {
    let body = json!({
        "data": [{
            "contract_address": "0xc",
            "token_id": "7",
            "metadata": { "name": "Bot #7" }
        }],
        "next_page": "3",
        "collection_count": 1,
        "token_count": 4
    })
    .to_string();
    let (url, server) = serve_once("200 OK", body).await;

    let envelope = marketplace(url, Some("key-1"))
        .get_wallet_nft("0xwallet", Some(2))
        .await
        .unwrap();

    assert_eq!(envelope.data.len(), 1);
    assert_eq!(envelope.data[0].display_name(), "Bot #7");
    assert_eq!(envelope.next_page, Some(3));
    assert_eq!(envelope.token_count, 4);

    let request = server.await.unwrap();
    assert!(request.head.starts_with("GET /portfolio/0xwallet?page=2 HTTP/1.1"));
    assert!(request.has_header("x-api-key", "key-1"));
}

#[tokio::test]
async fn test_non_ok_status_yields_empty_envelope() {
    let (url, server) = serve_once("500 Internal Server Error", "{}".to_string()).await;

    let envelope = marketplace(url, None)
        .get_nft_token("0xc", Chain::Sepolia, "7")
        .await
        .unwrap();
    assert_eq!(envelope, TokensEnvelope::empty());

    let request = server.await.unwrap();
    assert!(request
        .head
        .starts_with("GET /tokens/0xc/0x534e5f5345504f4c4941/7 HTTP/1.1"));
    assert!(!request.head.to_lowercase().contains("x-api-key"));
}

#[tokio::test]
async fn test_refresh_posts_token_and_returns_message() {
    let (url, server) =
        serve_once("200 OK", json!({ "message": "Metadata refreshed" }).to_string()).await;

    let message = marketplace(url, None)
        .refresh_metadata("0xc", "7")
        .await
        .unwrap();
    assert_eq!(message, "Metadata refreshed");

    let request = server.await.unwrap();
    assert!(request.head.starts_with("POST /metadata/refresh HTTP/1.1"));
    assert!(request.has_header("accept", "text/plain"));
    assert_eq!(
        request.json(),
        json!({ "contract_address": "0xc", "token_id": "7" })
    );
}

#[tokio::test]
async fn test_refresh_error_status_is_an_error() {
    let (url, _server) = serve_once("503 Service Unavailable", "{}".to_string()).await;
    assert!(marketplace(url, None).refresh_metadata("0xc", "7").await.is_err());
}

#[tokio::test]
async fn test_unreachable_marketplace_is_an_error() {
    let api = marketplace(dead_url().await, None);
    assert!(api.get_wallet_nft("0xwallet", None).await.is_err());
}
