//! Token-bound account capability and its wallet-bridge transport.
//!
//! The terminal never holds key material. Calls that need a signature, and the
//! account lookups that go with them, are forwarded as JSON-RPC 2.0 requests to
//! a wallet bridge that owns the signer.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use color_eyre::eyre::{Result, WrapErr, eyre};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::{
    config::Config,
    domain::transfer::{Erc20Transfer, TransferResult},
};

/// Operations of the token-bound account SDK used by the wallet.
#[async_trait]
pub trait TokenboundSdk: Send + Sync {
    /// Address of the token-bound account of `token_contract` / `token_id`.
    async fn get_account(&self, token_contract: &str, token_id: &str) -> Result<String>;

    /// Raw ERC20 balance (smallest unit, integer string) held by an account.
    async fn erc20_balance(&self, tba_address: &str, contract_address: &str) -> Result<String>;

    /// Transfer an ERC20 amount out of a token-bound account.
    ///
    /// The returned flag is the SDK's success indicator.
    async fn transfer_erc20(&self, transfer: &Erc20Transfer) -> Result<bool>;
}

/// Run a transfer call and fold every outcome into a [`TransferResult`].
pub async fn run_transfer(sdk: &dyn TokenboundSdk, call: &Erc20Transfer) -> TransferResult {
    info!(
        "Transferring {} of {} from {} to {}",
        call.amount, call.contract_address, call.tba_address, call.recipient
    );
    match sdk.transfer_erc20(call).await {
        Ok(true) => TransferResult::Success,
        Ok(false) => TransferResult::Failure,
        Err(e) => TransferResult::Exception(format!("{:#}", e)),
    }
}

/// Interpret a bridge result the way a boolean-like status is read.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => !s.is_empty() && s != "false" && s != "0",
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Client options sent along with every bridge call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenboundOptions {
    pub registry_address: String,
    pub implementation_address: String,
    #[serde(rename = "jsonRPC")]
    pub json_rpc: String,
}

impl TokenboundOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            registry_address: config.network.registry_address.clone(),
            implementation_address: config.network.implementation_address.clone(),
            json_rpc: config.network.rpc_url.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcError>,
}

/// [`TokenboundSdk`] backed by a JSON-RPC wallet bridge.
pub struct BridgeTokenbound {
    client: Client,
    url: String,
    options: TokenboundOptions,
    next_id: AtomicU64,
}

impl BridgeTokenbound {
    pub fn new(url: &str, options: TokenboundOptions) -> Self {
        Self::with_client(Client::new(), url, options)
    }

    pub fn with_client(client: Client, url: &str, options: TokenboundOptions) -> Self {
        Self {
            client,
            url: url.to_string(),
            options,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.bridge.url, TokenboundOptions::from_config(config))
    }

    async fn call(&self, method: &str, mut params: Value) -> Result<Value> {
        if let Value::Object(ref mut map) = params {
            map.insert("options".to_string(), serde_json::to_value(&self.options)?);
        }
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };
        debug!("Bridge call {} (id {})", method, request.id);

        let response: RpcResponse = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .wrap_err_with(|| format!("Wallet bridge unreachable at {}", self.url))?
            .error_for_status()
            .wrap_err_with(|| format!("Wallet bridge rejected {}", method))?
            .json()
            .await
            .wrap_err_with(|| format!("Invalid wallet bridge response to {}", method))?;

        if let Some(err) = response.error {
            return Err(eyre!("{} failed ({}): {}", method, err.code, err.message));
        }
        Ok(response.result.unwrap_or(Value::Null))
    }
}

#[async_trait]
impl TokenboundSdk for BridgeTokenbound {
    async fn get_account(&self, token_contract: &str, token_id: &str) -> Result<String> {
        let result = self
            .call(
                "tokenbound_getAccount",
                json!({ "tokenContract": token_contract, "tokenId": token_id }),
            )
            .await?;
        match result {
            Value::String(address) if address.starts_with("0x") => Ok(address.to_lowercase()),
            other => Err(eyre!("Unexpected account address: {}", other)),
        }
    }

    async fn erc20_balance(&self, tba_address: &str, contract_address: &str) -> Result<String> {
        let result = self
            .call(
                "tokenbound_erc20Balance",
                json!({ "tbaAddress": tba_address, "contractAddress": contract_address }),
            )
            .await?;
        match result {
            Value::String(raw) => Ok(raw),
            Value::Number(n) if n.is_u64() => Ok(n.to_string()),
            other => Err(eyre!("Unexpected balance: {}", other)),
        }
    }

    async fn transfer_erc20(&self, transfer: &Erc20Transfer) -> Result<bool> {
        let params = serde_json::to_value(transfer)?;
        let result = self.call("tokenbound_transferERC20", params).await?;
        Ok(is_truthy(&result))
    }
}
