//! Marketplace data types for NFTs and the chain selector.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use strum::{Display, EnumString};

/// Starknet mainnet chain id (`SN_MAIN`).
pub const MAINNET_CHAIN_ID: &str = "0x534e5f4d41494e";
/// Starknet sepolia chain id (`SN_SEPOLIA`).
pub const SEPOLIA_CHAIN_ID: &str = "0x534e5f5345504f4c4941";

/// Network a token lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    Mainnet,
    Sepolia,
}

impl Chain {
    /// Chain id literal used in marketplace token URLs.
    pub fn chain_id(&self) -> &'static str {
        match self {
            Chain::Mainnet => MAINNET_CHAIN_ID,
            Chain::Sepolia => SEPOLIA_CHAIN_ID,
        }
    }

    /// Map a network name to a chain. Anything other than mainnet is sepolia.
    pub fn from_network(network: &str) -> Self {
        if network == "mainnet" {
            Chain::Mainnet
        } else {
            Chain::Sepolia
        }
    }
}

/// Display metadata of a token, as indexed by the marketplace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenMetadata {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub attributes: Vec<Value>,
}

/// One NFT entry of a portfolio or token lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NftToken {
    pub contract_address: String,
    pub token_id: String,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub collection_name: Option<String>,
    #[serde(default)]
    pub metadata: Option<TokenMetadata>,
}

impl NftToken {
    /// Best display name: metadata name, then collection name with id.
    pub fn display_name(&self) -> String {
        if let Some(name) = self.metadata.as_ref().and_then(|m| m.name.as_deref())
            && !name.is_empty()
        {
            return name.to_string();
        }
        match self.collection_name.as_deref() {
            Some(collection) if !collection.is_empty() => {
                format!("{} #{}", collection, self.token_id)
            }
            _ => format!("#{}", self.token_id),
        }
    }
}

/// Paginated envelope returned by the portfolio and token endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokensEnvelope {
    #[serde(default)]
    pub data: Vec<NftToken>,
    #[serde(default, deserialize_with = "deserialize_page")]
    pub next_page: Option<u64>,
    #[serde(default)]
    pub collection_count: u64,
    #[serde(default)]
    pub token_count: u64,
}

/// Response of `GET /portfolio/{wallet}`.
pub type WalletTokensApiResponse = TokensEnvelope;
/// Response of `GET /tokens/{contract}/{chain_id}/{token_id}`.
pub type TokensApiResponse = TokensEnvelope;

impl TokensEnvelope {
    /// Envelope used in place of a failed lookup.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Request body of `POST /metadata/refresh`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshMetadataRequest {
    pub contract_address: String,
    pub token_id: String,
}

/// Response of `POST /metadata/refresh`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshMetadataResponse {
    pub message: String,
}

/// Accept `next_page` as a number, a numeric string, or null.
fn deserialize_page<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_u64()
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid page: {}", n))),
        Some(Value::String(s)) => s.parse().map(Some).map_err(serde::de::Error::custom),
        Some(other) => Err(serde::de::Error::custom(format!(
            "invalid page: {}",
            other
        ))),
    }
}
