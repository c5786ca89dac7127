use std::{collections::BTreeMap, path::PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::domain::nft::Chain;

/// Starknet ETH token contract (same address on mainnet and sepolia).
pub const ETH_CONTRACT_ADDRESS: &str =
    "0x049d36570d4e46f48e99674bd3fcc84644ddd6b96f7c741b1562b82f9e004dc7";
/// Starknet STRK token contract (same address on mainnet and sepolia).
pub const STRK_CONTRACT_ADDRESS: &str =
    "0x04718f5a0fc34cc1af16a1cdee98ffb20c31f5cd61d6ab07201858f4287c938d";

/// Default wallet bridge endpoint.
pub const DEFAULT_BRIDGE_URL: &str = "http://127.0.0.1:5050";

/// Get the data directory for the application.
pub fn get_data_dir() -> PathBuf {
    if let Ok(s) = std::env::var("TOKENBOUND_WALLET_DATA") {
        PathBuf::from(s)
    } else if let Some(proj_dirs) = ProjectDirs::from("com", "tokenbound", "tokenbound-wallet") {
        proj_dirs.data_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".data")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub name: String,
    pub rpc_url: String,
    /// Token-bound account registry contract; empty lets the bridge pick its default.
    pub registry_address: String,
    /// Token-bound account implementation class; empty lets the bridge pick its default.
    pub implementation_address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketplaceConfig {
    pub api_url: String,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    pub url: String,
}

/// A fungible asset a token-bound account may hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetConfig {
    pub abbreviation: String,
    pub name: String,
    pub icon: String,
    pub contract_address: String,
    pub decimals: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub network: NetworkConfig,
    pub marketplace: MarketplaceConfig,
    pub bridge: BridgeConfig,
    pub wallet_address: Option<String>,
    pub assets: Vec<AssetConfig>,
    /// Settings of networks visited before, restored when switching back.
    #[serde(default)]
    pub other_networks: BTreeMap<String, NetworkConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self::sepolia(None)
    }
}

impl Config {
    /// Create config for a network, with an optional RPC URL override.
    pub fn new(network: &str, alchemy_api_key: Option<&str>, rpc_url: Option<&str>) -> Self {
        let mut config = Self::from_network(network, alchemy_api_key);
        if let Some(url) = rpc_url {
            config.network.rpc_url = url.to_string();
        }
        config
    }

    pub fn mainnet(alchemy_api_key: Option<&str>) -> Self {
        Self::with_network("mainnet", alchemy_api_key)
    }

    pub fn sepolia(alchemy_api_key: Option<&str>) -> Self {
        Self::with_network("sepolia", alchemy_api_key)
    }

    pub fn from_network(network: &str, alchemy_api_key: Option<&str>) -> Self {
        match network {
            "mainnet" => Self::mainnet(alchemy_api_key),
            _ => Self::sepolia(alchemy_api_key),
        }
    }

    fn with_network(name: &str, alchemy_api_key: Option<&str>) -> Self {
        Self {
            network: NetworkConfig {
                name: name.to_string(),
                rpc_url: alchemy_rpc_url(name, alchemy_api_key.unwrap_or_default()),
                registry_address: String::new(),
                implementation_address: String::new(),
            },
            marketplace: MarketplaceConfig {
                api_url: String::new(),
                api_key: None,
            },
            bridge: BridgeConfig {
                url: DEFAULT_BRIDGE_URL.to_string(),
            },
            wallet_address: None,
            assets: default_assets(),
            other_networks: BTreeMap::new(),
        }
    }

    /// Switch to another network, keeping endpoints, wallet and assets.
    ///
    /// Account contracts and RPC URL are per network: the new network starts
    /// from its preset, or from what it had when last active.
    pub fn switch_network(&self, network: &str, alchemy_api_key: Option<&str>) -> Self {
        let mut config = self.clone();
        let preset = Self::from_network(network, alchemy_api_key).network;
        if preset.name == config.network.name {
            return config;
        }
        let next = config.other_networks.remove(&preset.name).unwrap_or(preset);
        let previous = std::mem::replace(&mut config.network, next);
        config.other_networks.insert(previous.name.clone(), previous);
        config
    }

    pub fn chain(&self) -> Chain {
        Chain::from_network(&self.network.name)
    }

    pub fn is_mainnet(&self) -> bool {
        self.chain() == Chain::Mainnet
    }
}

fn alchemy_rpc_url(network: &str, api_key: &str) -> String {
    format!("https://starknet-{}.g.alchemy.com/v2/{}", network, api_key)
}

fn default_assets() -> Vec<AssetConfig> {
    vec![
        AssetConfig {
            abbreviation: "ETH".to_string(),
            name: "Ether".to_string(),
            icon: "Ξ".to_string(),
            contract_address: ETH_CONTRACT_ADDRESS.to_string(),
            decimals: 18,
        },
        AssetConfig {
            abbreviation: "STRK".to_string(),
            name: "Starknet Token".to_string(),
            icon: "◆".to_string(),
            contract_address: STRK_CONTRACT_ADDRESS.to_string(),
            decimals: 18,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_presets() {
        let config = Config::from_network("mainnet", Some("key"));
        assert_eq!(config.network.name, "mainnet");
        assert_eq!(
            config.network.rpc_url,
            "https://starknet-mainnet.g.alchemy.com/v2/key"
        );
        assert!(config.is_mainnet());

        let config = Config::from_network("anything", None);
        assert_eq!(config.network.name, "sepolia");
        assert_eq!(config.chain(), Chain::Sepolia);
    }

    #[test]
    fn test_rpc_override() {
        let config = Config::new("sepolia", Some("key"), Some("http://localhost:5050/rpc"));
        assert_eq!(config.network.rpc_url, "http://localhost:5050/rpc");
    }

    #[test]
    fn test_switch_network_keeps_endpoints() {
        let mut config = Config::sepolia(None);
        config.marketplace.api_url = "https://api.example".to_string();
        config.wallet_address = Some("0xabc".to_string());

        let switched = config.switch_network("mainnet", Some("key"));
        assert_eq!(switched.network.name, "mainnet");
        assert_eq!(switched.marketplace.api_url, "https://api.example");
        assert_eq!(switched.wallet_address.as_deref(), Some("0xabc"));
        assert_eq!(switched.assets.len(), 2);
    }

    #[test]
    fn test_account_contracts_stay_with_their_network() {
        let mut config = Config::new("sepolia", Some("key"), Some("http://localhost:5050/rpc"));
        config.network.registry_address = "0xsepolia_reg".to_string();
        config.network.implementation_address = "0xsepolia_impl".to_string();

        let mainnet = config.switch_network("mainnet", Some("key"));
        assert_eq!(mainnet.network.registry_address, "");
        assert_eq!(mainnet.network.implementation_address, "");
        assert_eq!(
            mainnet.network.rpc_url,
            "https://starknet-mainnet.g.alchemy.com/v2/key"
        );

        let sepolia = mainnet.switch_network("sepolia", Some("key"));
        assert_eq!(sepolia.network.registry_address, "0xsepolia_reg");
        assert_eq!(sepolia.network.implementation_address, "0xsepolia_impl");
        assert_eq!(sepolia.network.rpc_url, "http://localhost:5050/rpc");

        // Switching to the active network changes nothing
        let same = sepolia.switch_network("sepolia", None);
        assert_eq!(same.network.registry_address, "0xsepolia_reg");
    }
}
