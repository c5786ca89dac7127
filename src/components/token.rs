//! Token component: one NFT, its token-bound account and the assets the account holds.

use std::time::Instant;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use tokio::sync::mpsc::UnboundedSender;

use tokenbound_wallet::{
    config::AssetConfig,
    domain::{
        address::shorten_address,
        amount::scaling_factor,
        nft::NftToken,
        refresh::MetadataRefresh,
        transfer::AssetContext,
    },
};

use crate::{action::Action, tui::Frame};

use super::Component;

/// An asset row of the account, with its balance once loaded.
#[derive(Debug, Clone)]
pub struct AssetRow {
    pub config: AssetConfig,
    pub balance: Option<String>,
}

pub struct TokenComponent {
    action_tx: UnboundedSender<Action>,
    pub token: Option<NftToken>,
    pub tba_address: String,
    pub assets: Vec<AssetRow>,
    pub selected_index: usize,
    pub refresh: MetadataRefresh,
    list_state: ListState,
}

impl TokenComponent {
    pub fn new(action_tx: UnboundedSender<Action>, assets: &[AssetConfig]) -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            action_tx,
            token: None,
            tba_address: String::new(),
            assets: assets
                .iter()
                .map(|config| AssetRow {
                    config: config.clone(),
                    balance: None,
                })
                .collect(),
            selected_index: 0,
            refresh: MetadataRefresh::new(),
            list_state,
        }
    }

    /// Show a new token; account and balances are cleared until resolved again.
    pub fn set_token(&mut self, token: NftToken) {
        self.token = Some(token);
        self.tba_address.clear();
        for row in &mut self.assets {
            row.balance = None;
        }
        self.selected_index = 0;
        self.list_state.select(Some(0));
        self.refresh.reset();
    }

    /// Replace token details with a fresher copy of the same token.
    pub fn update_token(&mut self, token: NftToken) {
        if let Some(current) = &self.token
            && current.contract_address == token.contract_address
            && current.token_id == token.token_id
        {
            self.token = Some(token);
        }
    }

    /// Record the resolved account, if it belongs to the token on screen.
    pub fn set_account(&mut self, contract_address: &str, token_id: &str, tba_address: String) {
        if let Some(current) = &self.token
            && current.contract_address == contract_address
            && current.token_id == token_id
        {
            self.tba_address = tba_address;
        }
    }

    /// Apply a metadata refresh reply. Replies for another token are ignored.
    pub fn finish_refresh(
        &mut self,
        contract_address: &str,
        token_id: &str,
        message: Option<String>,
        now: Instant,
    ) -> bool {
        let Some(current) = &self.token else {
            return false;
        };
        if current.contract_address != contract_address || current.token_id != token_id {
            return false;
        }
        match message {
            Some(message) => self.refresh.succeed(message, now),
            None => self.refresh.fail(),
        }
        true
    }

    /// Record an asset balance of the account on screen.
    pub fn set_balance(
        &mut self,
        tba_address: &str,
        contract_address: &str,
        balance: Option<String>,
    ) {
        if tba_address.is_empty() || tba_address != self.tba_address {
            return;
        }
        if let Some(row) = self
            .assets
            .iter_mut()
            .find(|row| row.config.contract_address == contract_address)
        {
            row.balance = balance;
        }
    }

    /// Transfer context for an asset row, available once the account and balance are known.
    pub fn asset_context(&self, index: usize) -> Option<AssetContext> {
        if self.tba_address.is_empty() {
            return None;
        }
        let row = self.assets.get(index)?;
        let balance = row.balance.clone()?;
        let factor = scaling_factor(row.config.decimals).ok()?;
        Some(AssetContext {
            abbreviation: row.config.abbreviation.clone(),
            name: row.config.name.clone(),
            icon: row.config.icon.clone(),
            balance,
            tba_address: self.tba_address.clone(),
            contract_address: row.config.contract_address.clone(),
            scaling_factor: factor,
        })
    }

    fn next(&mut self) {
        if self.assets.is_empty() {
            return;
        }
        self.selected_index = (self.selected_index + 1) % self.assets.len();
        self.list_state.select(Some(self.selected_index));
    }

    fn previous(&mut self) {
        if self.assets.is_empty() {
            return;
        }
        self.selected_index = if self.selected_index == 0 {
            self.assets.len() - 1
        } else {
            self.selected_index - 1
        };
        self.list_state.select(Some(self.selected_index));
    }
}

impl Component for TokenComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        if self.token.is_none() {
            return Ok(());
        }
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.next(),
            KeyCode::Char('k') | KeyCode::Up => self.previous(),
            KeyCode::Char('f') if !self.refresh.is_loading() => {
                self.action_tx.send(Action::RefreshMetadata)?;
            }
            KeyCode::Char('t') | KeyCode::Enter => {
                if self.asset_context(self.selected_index).is_some() {
                    self.action_tx
                        .send(Action::OpenTransfer(self.selected_index))?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn draw(&mut self, f: &mut Frame, area: Rect) {
        let Some(token) = &self.token else {
            let empty = Paragraph::new("Select a token in the Portfolio tab.")
                .style(Style::default().fg(Color::Gray))
                .block(Block::default().title("Token").borders(Borders::ALL));
            f.render_widget(empty, area);
            return;
        };

        let chunks = Layout::vertical([
            Constraint::Length(9), // Token details
            Constraint::Min(0),    // Assets
            Constraint::Length(3), // Help / refresh status
        ])
        .split(area);

        let metadata = token.metadata.clone().unwrap_or_default();
        let tba = if self.tba_address.is_empty() {
            Span::styled("resolving...", Style::default().fg(Color::Yellow))
        } else {
            Span::styled(self.tba_address.clone(), Style::default().fg(Color::Cyan))
        };
        let details = Paragraph::new(vec![
            Line::from(vec![Span::styled(
                token.display_name(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )]),
            Line::from(vec![
                Span::styled("Contract: ", Style::default().fg(Color::DarkGray)),
                Span::raw(token.contract_address.clone()),
            ]),
            Line::from(vec![
                Span::styled("Token ID: ", Style::default().fg(Color::DarkGray)),
                Span::raw(token.token_id.clone()),
            ]),
            Line::from(vec![
                Span::styled("Owner: ", Style::default().fg(Color::DarkGray)),
                Span::raw(
                    token
                        .owner
                        .as_deref()
                        .and_then(shorten_address)
                        .unwrap_or_else(|| "-".to_string()),
                ),
            ]),
            Line::from(vec![
                Span::styled("Account: ", Style::default().fg(Color::DarkGray)),
                tba,
            ]),
            Line::from(vec![Span::styled(
                metadata.description.unwrap_or_default(),
                Style::default().fg(Color::Gray),
            )]),
        ])
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title("Token")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        f.render_widget(details, chunks[0]);

        let items: Vec<ListItem> = self
            .assets
            .iter()
            .map(|row| {
                let balance = row.balance.as_deref().unwrap_or("...");
                ListItem::new(Line::from(vec![
                    Span::raw(format!("{} ", row.config.icon)),
                    Span::styled(
                        row.config.abbreviation.to_uppercase(),
                        Style::default().fg(Color::White),
                    ),
                    Span::styled(
                        format!("  {}", row.config.name),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::raw("  "),
                    Span::styled(balance.to_string(), Style::default().fg(Color::Green)),
                ]))
            })
            .collect();
        let list = List::new(items)
            .block(Block::default().title("Assets").borders(Borders::ALL))
            .highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");
        f.render_stateful_widget(list, chunks[1], &mut self.list_state);

        let status = if self.refresh.is_loading() {
            Span::styled("Refreshing metadata...", Style::default().fg(Color::Yellow))
        } else if let Some(msg) = self.refresh.success_message() {
            Span::styled(msg.to_string(), Style::default().fg(Color::Green))
        } else {
            Span::styled(
                "[j/k] Select asset  [t] Transfer  [f] Refresh metadata",
                Style::default().fg(Color::DarkGray),
            )
        };
        let help = Paragraph::new(Line::from(status)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        f.render_widget(help, chunks[2]);
    }
}
