use std::{sync::Arc, time::Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info, warn};

use tokenbound_wallet::{
    config::{AssetConfig, Config, MarketplaceConfig},
    domain::{amount::format_units, transfer::TransferOutcome},
    infra::{
        marketplace::{HttpMarketplace, MarketplaceApi},
        tokenbound::{BridgeTokenbound, TokenboundSdk, run_transfer},
    },
};

use crate::{
    action::Action,
    cli::Args,
    components::{
        Component, portfolio::PortfolioComponent, settings::SettingsComponent,
        token::TokenComponent, transfer::TransferModal,
    },
    tui::{Event, Frame, Tui},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Portfolio,
    Token,
    Settings,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Portfolio, Tab::Token, Tab::Settings];

    pub fn title(&self) -> Line<'static> {
        let hotkey = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
        match self {
            Tab::Portfolio => Line::from(vec![Span::styled("P", hotkey), Span::raw("ortfolio")]),
            Tab::Token => Line::from(vec![
                Span::raw("T"),
                Span::styled("o", hotkey),
                Span::raw("ken"),
            ]),
            Tab::Settings => Line::from(vec![Span::styled("S", hotkey), Span::raw("ettings")]),
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Tab::Portfolio => 0,
            Tab::Token => 1,
            Tab::Settings => 2,
        }
    }

    pub fn from_index(index: usize) -> Tab {
        Self::ALL[index % Self::ALL.len()]
    }
}

/// Build the runtime configuration from command line arguments.
pub fn config_from_args(args: &Args) -> Config {
    let mut config = Config::new(
        &args.network,
        args.alchemy_api_key.as_deref(),
        args.rpc_url.as_deref(),
    );
    config.marketplace = MarketplaceConfig {
        api_url: args.marketplace_url.clone(),
        api_key: args.marketplace_api_key.clone(),
    };
    if let Some(url) = &args.bridge_url {
        config.bridge.url = url.clone();
    }
    if let Some(address) = &args.registry_address {
        config.network.registry_address = address.clone();
    }
    if let Some(address) = &args.implementation_address {
        config.network.implementation_address = address.clone();
    }
    config.wallet_address = args.wallet.clone().filter(|w| !w.is_empty());
    config
}

pub struct App {
    pub should_quit: bool,
    pub should_suspend: bool,
    pub config: Config,
    alchemy_api_key: Option<String>,
    pub active_tab: Tab,
    pub action_tx: UnboundedSender<Action>,
    pub action_rx: UnboundedReceiver<Action>,
    pub tui: Tui,
    marketplace: Arc<dyn MarketplaceApi>,
    sdk: Arc<dyn TokenboundSdk>,
    pub portfolio_component: PortfolioComponent,
    pub token_component: TokenComponent,
    pub settings_component: SettingsComponent,
    pub transfer_modal: TransferModal,
    pub status_message: String,
}

impl App {
    pub fn new(args: &Args) -> Result<Self> {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let config = config_from_args(args);
        info!(
            "Starting on {} (bridge {}, marketplace {})",
            config.network.name, config.bridge.url, config.marketplace.api_url
        );

        let marketplace: Arc<dyn MarketplaceApi> =
            Arc::new(HttpMarketplace::new(&config.marketplace));
        let sdk: Arc<dyn TokenboundSdk> = Arc::new(BridgeTokenbound::from_config(&config));

        let portfolio_component =
            PortfolioComponent::new(action_tx.clone(), config.wallet_address.clone());
        let token_component = TokenComponent::new(action_tx.clone(), &config.assets);
        let settings_component = SettingsComponent::new(
            action_tx.clone(),
            &config.network.name,
            &config.network.rpc_url,
        );
        let transfer_modal = TransferModal::new(action_tx.clone());

        let tui = Tui::new()?
            .tick_rate(args.tick_rate)
            .frame_rate(args.frame_rate);

        Ok(Self {
            should_quit: false,
            should_suspend: false,
            config,
            alchemy_api_key: args.alchemy_api_key.clone(),
            active_tab: Tab::Portfolio,
            action_tx,
            action_rx,
            tui,
            marketplace,
            sdk,
            portfolio_component,
            token_component,
            settings_component,
            transfer_modal,
            status_message: "Ready".to_string(),
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        self.tui.enter()?;
        self.action_tx.send(Action::LoadPortfolio)?;

        loop {
            match self.tui.next().await {
                Some(event) => self.handle_event(event)?,
                None => break,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.handle_action(action)?;
            }

            if self.should_suspend {
                self.tui.suspend()?;
                self.should_suspend = false;
                self.tui.resume()?;
            }

            if self.should_quit {
                break;
            }
        }

        self.tui.exit()?;
        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Init => info!("Application initialized"),
            Event::Tick => self.action_tx.send(Action::Tick)?,
            Event::Render => self.draw_ui()?,
            Event::Key(key) => self.handle_key_event(key)?,
            Event::Paste(text) => self.handle_paste(&text),
            Event::Resize(w, h) => {
                self.tui.resize(Rect::new(0, 0, w, h))?;
                self.draw_ui()?;
            }
            Event::Error => {}
        }
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.action_tx.send(Action::Quit)?;
            return Ok(());
        }

        // The modal captures all other input while open.
        if self.transfer_modal.is_open() {
            return self.transfer_modal.handle_key_event(key);
        }

        match key.code {
            KeyCode::Char('q') if key.modifiers.is_empty() => {
                self.action_tx.send(Action::Quit)?;
            }
            KeyCode::Char('z') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.action_tx.send(Action::Suspend)?;
            }
            KeyCode::Char('r') if key.modifiers.is_empty() => {
                self.action_tx.send(Action::LoadPortfolio)?;
            }
            KeyCode::Char('p') if key.modifiers.is_empty() => {
                self.active_tab = Tab::Portfolio;
            }
            KeyCode::Char('o') if key.modifiers.is_empty() => {
                self.active_tab = Tab::Token;
            }
            KeyCode::Char('s') if key.modifiers.is_empty() => {
                self.active_tab = Tab::Settings;
            }
            KeyCode::Tab => {
                self.active_tab = Tab::from_index(self.active_tab.index() + 1);
            }
            KeyCode::BackTab => {
                self.active_tab = Tab::from_index(self.active_tab.index() + Tab::ALL.len() - 1);
            }
            _ => match self.active_tab {
                Tab::Portfolio => self.portfolio_component.handle_key_event(key)?,
                Tab::Token => self.token_component.handle_key_event(key)?,
                Tab::Settings => self.settings_component.handle_key_event(key)?,
            },
        }
        Ok(())
    }

    fn handle_paste(&mut self, text: &str) {
        if self.transfer_modal.is_open() {
            self.transfer_modal.paste(text);
        }
    }

    fn handle_action(&mut self, action: Action) -> Result<()> {
        if action != Action::Tick {
            debug!("Handling action: {}", action);
        }
        match action {
            Action::Tick => {
                self.token_component.refresh.expire(Instant::now());
            }
            Action::Quit => self.should_quit = true,
            Action::Suspend => self.should_suspend = true,
            Action::Error(msg) => {
                error!("{}", msg);
                self.status_message = msg;
            }

            Action::LoadPortfolio => self.load_portfolio(None),
            Action::LoadNextPage => {
                if self.portfolio_component.can_load_more() {
                    self.load_portfolio(self.portfolio_component.next_page);
                }
            }
            Action::PortfolioLoaded {
                request,
                page,
                envelope,
            } => {
                let count = envelope.data.len();
                if self.portfolio_component.apply_page(request, page, envelope) {
                    self.status_message = format!(
                        "Loaded {} NFTs ({} total)",
                        count, self.portfolio_component.token_count
                    );
                }
            }
            Action::PortfolioFailed { request, message } => {
                warn!("Portfolio load failed: {}", message);
                if self.portfolio_component.fail_load(request) {
                    self.status_message = format!("Failed to load NFTs: {}", message);
                }
            }
            Action::OpenToken(token) => {
                self.transfer_modal.close();
                self.token_component.set_token(token.clone());
                self.active_tab = Tab::Token;
                self.status_message = format!("Opened {}", token.display_name());
                self.load_token(&token.contract_address, &token.token_id);
                self.resolve_account(&token.contract_address, &token.token_id);
            }

            Action::TokenLoaded(envelope) => {
                if let Some(token) = envelope.data.into_iter().next() {
                    self.token_component.update_token(token);
                }
            }
            Action::AccountResolved {
                contract_address,
                token_id,
                tba_address,
            } => {
                self.token_component
                    .set_account(&contract_address, &token_id, tba_address);
            }
            Action::BalanceLoaded {
                tba_address,
                contract_address,
                balance,
            } => {
                self.token_component
                    .set_balance(&tba_address, &contract_address, balance);
            }
            Action::RefreshMetadata => self.refresh_metadata(),
            Action::MetadataRefreshed {
                contract_address,
                token_id,
                message,
            } => {
                let succeeded = message.is_some();
                if self.token_component.finish_refresh(
                    &contract_address,
                    &token_id,
                    message,
                    Instant::now(),
                ) {
                    self.status_message = if succeeded {
                        "Metadata refreshed".to_string()
                    } else {
                        "Metadata refresh failed".to_string()
                    };
                }
            }

            Action::OpenTransfer(index) => {
                if let Some(asset) = self.token_component.asset_context(index) {
                    self.transfer_modal.open(asset);
                }
            }
            Action::SubmitTransfer => self.submit_transfer(),
            Action::TransferSettled { session, result } => {
                if self.transfer_modal.settle(session, result) {
                    let outcome = self
                        .transfer_modal
                        .workflow()
                        .map(|w| w.outcome())
                        .unwrap_or_default();
                    self.status_message = match outcome {
                        TransferOutcome::Success => "Transaction successful".to_string(),
                        _ => "There was an error transferring the assets".to_string(),
                    };
                }
            }
            Action::CloseTransfer => {
                self.transfer_modal.close();
                // Balances may have changed.
                let tba_address = self.token_component.tba_address.clone();
                if !tba_address.is_empty() {
                    self.load_balances(tba_address);
                }
            }

            Action::SwitchNetwork(network) => self.switch_network(&network),
        }
        Ok(())
    }

    fn load_portfolio(&mut self, page: Option<u64>) {
        let Some(wallet) = self.config.wallet_address.clone() else {
            self.status_message = "No wallet address configured (set WALLET_ADDRESS)".to_string();
            return;
        };
        let request = self.portfolio_component.begin_load();
        self.status_message = "Loading NFTs...".to_string();

        let marketplace = self.marketplace.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let action = match marketplace.get_wallet_nft(&wallet, page).await {
                Ok(envelope) => Action::PortfolioLoaded {
                    request,
                    page,
                    envelope,
                },
                Err(e) => Action::PortfolioFailed {
                    request,
                    message: format!("{:#}", e),
                },
            };
            let _ = tx.send(action);
        });
    }

    fn load_token(&self, contract_address: &str, token_id: &str) {
        let marketplace = self.marketplace.clone();
        let tx = self.action_tx.clone();
        let chain = self.config.chain();
        let contract_address = contract_address.to_string();
        let token_id = token_id.to_string();
        tokio::spawn(async move {
            match marketplace
                .get_nft_token(&contract_address, chain, &token_id)
                .await
            {
                Ok(envelope) => {
                    let _ = tx.send(Action::TokenLoaded(envelope));
                }
                Err(e) => warn!("Failed to load token {}/{}: {:#}", contract_address, token_id, e),
            }
        });
    }

    fn resolve_account(&self, contract_address: &str, token_id: &str) {
        let sdk = self.sdk.clone();
        let tx = self.action_tx.clone();
        let assets = self.config.assets.clone();
        let contract_address = contract_address.to_string();
        let token_id = token_id.to_string();
        tokio::spawn(async move {
            let tba_address = match sdk.get_account(&contract_address, &token_id).await {
                Ok(address) => address,
                Err(e) => {
                    let _ = tx.send(Action::Error(format!(
                        "Failed to resolve token-bound account: {:#}",
                        e
                    )));
                    return;
                }
            };
            let _ = tx.send(Action::AccountResolved {
                contract_address,
                token_id,
                tba_address: tba_address.clone(),
            });
            fetch_balances(sdk.as_ref(), &tx, &tba_address, &assets).await;
        });
    }

    fn load_balances(&self, tba_address: String) {
        let sdk = self.sdk.clone();
        let tx = self.action_tx.clone();
        let assets = self.config.assets.clone();
        tokio::spawn(async move {
            fetch_balances(sdk.as_ref(), &tx, &tba_address, &assets).await;
        });
    }

    fn refresh_metadata(&mut self) {
        let Some(token) = self.token_component.token.clone() else {
            return;
        };
        if !self.token_component.refresh.start() {
            return;
        }

        let marketplace = self.marketplace.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let message = match marketplace
                .refresh_metadata(&token.contract_address, &token.token_id)
                .await
            {
                Ok(message) => Some(message),
                Err(e) => {
                    error!("Metadata refresh failed: {:#}", e);
                    None
                }
            };
            let _ = tx.send(Action::MetadataRefreshed {
                contract_address: token.contract_address,
                token_id: token.token_id,
                message,
            });
        });
    }

    fn submit_transfer(&mut self) {
        let Some(pending) = self.transfer_modal.begin_submit() else {
            if self
                .transfer_modal
                .workflow()
                .is_some_and(|w| w.outcome() == TransferOutcome::Failure)
            {
                self.status_message = "Invalid transfer amount".to_string();
            }
            return;
        };
        self.status_message = "Sending...".to_string();

        let sdk = self.sdk.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let result = run_transfer(sdk.as_ref(), &pending.call).await;
            let _ = tx.send(Action::TransferSettled {
                session: pending.session,
                result,
            });
        });
    }

    fn switch_network(&mut self, network: &str) {
        info!("Switching network to {}", network);
        self.config = self
            .config
            .switch_network(network, self.alchemy_api_key.as_deref());
        self.sdk = Arc::new(BridgeTokenbound::from_config(&self.config));
        self.settings_component
            .set_network(&self.config.network.name, &self.config.network.rpc_url);

        // Accounts and balances are per network.
        self.transfer_modal.close();
        self.token_component = TokenComponent::new(self.action_tx.clone(), &self.config.assets);
        self.status_message = format!("Switched to {}", self.config.network.name);
        self.load_portfolio(None);
    }

    fn draw_ui(&mut self) -> Result<()> {
        let Self {
            tui,
            config,
            active_tab,
            status_message,
            portfolio_component,
            token_component,
            settings_component,
            transfer_modal,
            ..
        } = self;
        let active_tab = *active_tab;

        tui.draw(|f| {
            let area = f.area();
            let chunks = Layout::vertical([
                Constraint::Length(3), // Header
                Constraint::Length(3), // Tabs
                Constraint::Min(0),    // Content
                Constraint::Length(3), // Status
            ])
            .split(area);

            draw_header(f, chunks[0], config);
            draw_tabs(f, chunks[1], active_tab);
            match active_tab {
                Tab::Portfolio => portfolio_component.draw(f, chunks[2]),
                Tab::Token => token_component.draw(f, chunks[2]),
                Tab::Settings => settings_component.draw(f, chunks[2]),
            }
            draw_status(f, chunks[3], status_message);

            if transfer_modal.is_open() {
                transfer_modal.draw(f, area);
            }
        })?;
        Ok(())
    }
}

/// Fetch and format every configured asset balance of an account.
async fn fetch_balances(
    sdk: &dyn TokenboundSdk,
    tx: &UnboundedSender<Action>,
    tba_address: &str,
    assets: &[AssetConfig],
) {
    for asset in assets {
        let balance = match sdk.erc20_balance(tba_address, &asset.contract_address).await {
            Ok(raw) => match format_units(&raw, asset.decimals) {
                Ok(balance) => Some(balance),
                Err(e) => {
                    warn!("Bad {} balance for {}: {:#}", asset.abbreviation, tba_address, e);
                    None
                }
            },
            Err(e) => {
                warn!("Failed to load {} balance for {}: {:#}", asset.abbreviation, tba_address, e);
                None
            }
        };
        let _ = tx.send(Action::BalanceLoaded {
            tba_address: tba_address.to_string(),
            contract_address: asset.contract_address.clone(),
            balance,
        });
    }
}

fn draw_header(f: &mut Frame, area: Rect, config: &Config) {
    let network_style = if config.is_mainnet() {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Yellow)
    };
    let title = Paragraph::new(Line::from(vec![
        Span::styled(
            "Tokenbound Wallet",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(format!("[{}]", config.network.name), network_style),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(title, area);
}

fn draw_tabs(f: &mut Frame, area: Rect, active_tab: Tab) {
    let titles: Vec<Line> = Tab::ALL.iter().map(|t| t.title()).collect();
    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL))
        .select(active_tab.index())
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(tabs, area);
}

fn draw_status(f: &mut Frame, area: Rect, status_message: &str) {
    let status = Paragraph::new(Line::from(vec![
        Span::styled("Status: ", Style::default().fg(Color::DarkGray)),
        Span::styled(status_message, Style::default().fg(Color::Green)),
        Span::raw("  |  "),
        Span::styled(
            "[r]Reload [Tab]Switch [q]Quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(status, area);
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn test_tab_cycle() {
        assert_eq!(Tab::from_index(Tab::Settings.index() + 1), Tab::Portfolio);
        assert_eq!(
            Tab::from_index(Tab::Portfolio.index() + Tab::ALL.len() - 1),
            Tab::Settings
        );
    }

    #[test]
    fn test_config_from_args() {
        let args = Args::parse_from([
            "tokenbound-wallet",
            "--marketplace-url",
            "https://api.example/",
            "--marketplace-api-key",
            "secret",
            "--bridge-url",
            "http://127.0.0.1:9000",
            "--registry-address",
            "0xreg",
            "--network",
            "mainnet",
            "-w",
            "0xwallet",
        ]);
        let config = config_from_args(&args);
        assert_eq!(config.network.name, "mainnet");
        assert_eq!(config.marketplace.api_key.as_deref(), Some("secret"));
        assert_eq!(config.bridge.url, "http://127.0.0.1:9000");
        assert_eq!(config.network.registry_address, "0xreg");
        assert_eq!(config.wallet_address.as_deref(), Some("0xwallet"));
    }
}
