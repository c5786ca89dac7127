use strum::Display;

use tokenbound_wallet::domain::{
    nft::{NftToken, TokensEnvelope},
    transfer::TransferResult,
};

/// Actions that can be triggered by user input or background tasks.
#[derive(Debug, Clone, PartialEq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Action {
    Tick,
    Quit,
    Suspend,
    Error(String),

    // Portfolio
    LoadPortfolio,
    LoadNextPage,
    PortfolioLoaded {
        request: u64,
        page: Option<u64>,
        envelope: TokensEnvelope,
    },
    PortfolioFailed {
        request: u64,
        message: String,
    },
    OpenToken(NftToken),

    // Token view
    TokenLoaded(TokensEnvelope),
    AccountResolved {
        contract_address: String,
        token_id: String,
        tba_address: String,
    },
    BalanceLoaded {
        tba_address: String,
        contract_address: String,
        balance: Option<String>,
    },
    RefreshMetadata,
    MetadataRefreshed {
        contract_address: String,
        token_id: String,
        message: Option<String>,
    },

    // Transfer modal
    OpenTransfer(usize),
    SubmitTransfer,
    TransferSettled {
        session: u64,
        result: TransferResult,
    },
    CloseTransfer,

    // Settings
    SwitchNetwork(String),
}
