//! Marketplace REST API client.

use async_trait::async_trait;
use color_eyre::eyre::{Result, WrapErr, eyre};
use reqwest::{Client, RequestBuilder, header};
use tracing::{debug, error};

use crate::{
    config::MarketplaceConfig,
    domain::nft::{
        Chain, RefreshMetadataRequest, RefreshMetadataResponse, TokensApiResponse, TokensEnvelope,
        WalletTokensApiResponse,
    },
};

/// Read and refresh operations offered by the marketplace.
#[async_trait]
pub trait MarketplaceApi: Send + Sync {
    /// NFTs held by a wallet. `page` is the `next_page` value of a previous response.
    async fn get_wallet_nft(
        &self,
        wallet_address: &str,
        page: Option<u64>,
    ) -> Result<WalletTokensApiResponse>;

    /// A single token.
    async fn get_nft_token(
        &self,
        contract_address: &str,
        chain: Chain,
        token_id: &str,
    ) -> Result<TokensApiResponse>;

    /// Ask the marketplace to re-index a token's metadata. Returns its message.
    async fn refresh_metadata(&self, contract_address: &str, token_id: &str) -> Result<String>;
}

/// [`MarketplaceApi`] over HTTP.
#[derive(Clone)]
pub struct HttpMarketplace {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpMarketplace {
    pub fn new(config: &MarketplaceConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: &MarketplaceConfig) -> Self {
        Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    pub fn portfolio_url(&self, wallet_address: &str, page: Option<u64>) -> String {
        match page {
            Some(page) => format!("{}/portfolio/{}?page={}", self.base_url, wallet_address, page),
            None => format!("{}/portfolio/{}", self.base_url, wallet_address),
        }
    }

    pub fn token_url(&self, contract_address: &str, chain: Chain, token_id: &str) -> String {
        format!(
            "{}/tokens/{}/{}/{}",
            self.base_url,
            contract_address,
            chain.chain_id(),
            token_id
        )
    }

    pub fn refresh_url(&self) -> String {
        format!("{}/metadata/refresh", self.base_url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.header("x-api-key", key),
            None => request,
        }
    }

    /// GET an envelope; a non-success status yields an empty envelope.
    async fn get_envelope(&self, url: String) -> Result<TokensEnvelope> {
        debug!("GET {}", url);
        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .wrap_err_with(|| format!("Request to {} failed", url))?;

        let status = response.status();
        if !status.is_success() {
            error!("{} {}", url, status);
            return Ok(TokensEnvelope::empty());
        }

        response
            .json::<TokensEnvelope>()
            .await
            .wrap_err_with(|| format!("Invalid response from {}", url))
    }
}

#[async_trait]
impl MarketplaceApi for HttpMarketplace {
    async fn get_wallet_nft(
        &self,
        wallet_address: &str,
        page: Option<u64>,
    ) -> Result<WalletTokensApiResponse> {
        self.get_envelope(self.portfolio_url(wallet_address, page))
            .await
    }

    async fn get_nft_token(
        &self,
        contract_address: &str,
        chain: Chain,
        token_id: &str,
    ) -> Result<TokensApiResponse> {
        self.get_envelope(self.token_url(contract_address, chain, token_id))
            .await
    }

    async fn refresh_metadata(&self, contract_address: &str, token_id: &str) -> Result<String> {
        if contract_address.is_empty() {
            return Err(eyre!("Address is undefined. Unable to make the request."));
        }

        let url = self.refresh_url();
        debug!("POST {} ({} #{})", url, contract_address, token_id);

        let body = RefreshMetadataRequest {
            contract_address: contract_address.to_string(),
            token_id: token_id.to_string(),
        };
        let response = self
            .authorize(self.client.post(&url))
            .header(header::ACCEPT, "text/plain")
            .json(&body)
            .send()
            .await
            .wrap_err("Error refreshing metadata")?
            .error_for_status()
            .wrap_err("Error refreshing metadata")?;

        let refreshed: RefreshMetadataResponse = response
            .json()
            .await
            .wrap_err("Invalid metadata refresh response")?;
        Ok(refreshed.message)
    }
}
