//! Portfolio component: NFTs held by the configured wallet, loaded page by page.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use tokio::sync::mpsc::UnboundedSender;

use tokenbound_wallet::domain::{
    address::shorten_address,
    nft::{NftToken, TokensEnvelope},
};

use crate::{action::Action, tui::Frame};

use super::Component;

pub struct PortfolioComponent {
    action_tx: UnboundedSender<Action>,
    pub wallet_address: Option<String>,
    pub tokens: Vec<NftToken>,
    pub next_page: Option<u64>,
    pub collection_count: u64,
    pub token_count: u64,
    pub is_loading: bool,
    // Id of the latest page request; replies to older ones are dropped.
    request: u64,
    pub selected_index: usize,
    list_state: ListState,
}

impl PortfolioComponent {
    pub fn new(action_tx: UnboundedSender<Action>, wallet_address: Option<String>) -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            action_tx,
            wallet_address,
            tokens: Vec::new(),
            next_page: None,
            collection_count: 0,
            token_count: 0,
            is_loading: false,
            request: 0,
            selected_index: 0,
            list_state,
        }
    }

    /// Whether another page can be requested right now.
    pub fn can_load_more(&self) -> bool {
        self.next_page.is_some() && !self.is_loading
    }

    /// Start a page request, superseding any request still in flight.
    pub fn begin_load(&mut self) -> u64 {
        self.request += 1;
        self.is_loading = true;
        self.request
    }

    /// Apply a loaded page. The first page replaces the list, later pages append to it.
    ///
    /// Returns false, changing nothing, for a reply to a superseded request.
    pub fn apply_page(
        &mut self,
        request: u64,
        page: Option<u64>,
        envelope: TokensEnvelope,
    ) -> bool {
        if request != self.request {
            return false;
        }
        self.is_loading = false;
        if page.is_none() {
            self.tokens.clear();
            self.selected_index = 0;
        }
        self.tokens.extend(envelope.data);
        self.next_page = envelope.next_page;
        self.collection_count = envelope.collection_count;
        self.token_count = envelope.token_count;
        self.list_state.select(Some(self.selected_index));
        true
    }

    /// End a failed request. Returns false for a superseded request.
    pub fn fail_load(&mut self, request: u64) -> bool {
        if request != self.request {
            return false;
        }
        self.is_loading = false;
        true
    }

    pub fn selected_token(&self) -> Option<&NftToken> {
        self.tokens.get(self.selected_index)
    }

    fn next(&mut self) {
        if self.tokens.is_empty() {
            return;
        }
        self.selected_index = (self.selected_index + 1) % self.tokens.len();
        self.list_state.select(Some(self.selected_index));
    }

    fn previous(&mut self) {
        if self.tokens.is_empty() {
            return;
        }
        self.selected_index = if self.selected_index == 0 {
            self.tokens.len() - 1
        } else {
            self.selected_index - 1
        };
        self.list_state.select(Some(self.selected_index));
    }
}

impl Component for PortfolioComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.next(),
            KeyCode::Char('k') | KeyCode::Up => self.previous(),
            KeyCode::Char('n') if self.can_load_more() => {
                self.action_tx.send(Action::LoadNextPage)?;
            }
            KeyCode::Enter => {
                if let Some(token) = self.selected_token() {
                    self.action_tx.send(Action::OpenToken(token.clone()))?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn draw(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::vertical([
            Constraint::Length(4), // Wallet summary
            Constraint::Min(0),    // Token list
            Constraint::Length(3), // Help
        ])
        .split(area);

        let wallet = self
            .wallet_address
            .as_deref()
            .and_then(shorten_address)
            .unwrap_or_else(|| "not configured".to_string());
        let summary = Paragraph::new(vec![
            Line::from(vec![
                Span::styled("Wallet: ", Style::default().fg(Color::DarkGray)),
                Span::styled(wallet, Style::default().fg(Color::White)),
            ]),
            Line::from(vec![
                Span::styled("Collections: ", Style::default().fg(Color::DarkGray)),
                Span::styled(
                    self.collection_count.to_string(),
                    Style::default().fg(Color::Green),
                ),
                Span::raw("  |  "),
                Span::styled("Tokens: ", Style::default().fg(Color::DarkGray)),
                Span::styled(self.token_count.to_string(), Style::default().fg(Color::Green)),
            ]),
        ])
        .block(
            Block::default()
                .title("Portfolio")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        f.render_widget(summary, chunks[0]);

        if self.tokens.is_empty() {
            let (text, color) = if self.is_loading {
                ("Loading...", Color::Yellow)
            } else {
                ("No NFT to display", Color::Red)
            };
            let empty = Paragraph::new(text)
                .style(Style::default().fg(color))
                .block(Block::default().title("NFTs").borders(Borders::ALL));
            f.render_widget(empty, chunks[1]);
        } else {
            let items: Vec<ListItem> = self
                .tokens
                .iter()
                .map(|token| {
                    let contract = shorten_address(&token.contract_address).unwrap_or_default();
                    ListItem::new(Line::from(vec![
                        Span::styled(token.display_name(), Style::default().fg(Color::White)),
                        Span::raw("  "),
                        Span::styled(contract, Style::default().fg(Color::DarkGray)),
                    ]))
                })
                .collect();

            let list = List::new(items)
                .block(
                    Block::default()
                        .title(format!("NFTs ({} loaded)", self.tokens.len()))
                        .borders(Borders::ALL),
                )
                .highlight_style(
                    Style::default()
                        .bg(Color::DarkGray)
                        .add_modifier(Modifier::BOLD),
                )
                .highlight_symbol("> ");
            f.render_stateful_widget(list, chunks[1], &mut self.list_state);
        }

        let more = if self.is_loading && !self.tokens.is_empty() {
            "Loading more..."
        } else if self.next_page.is_some() {
            "[n] Load more"
        } else {
            "Nothing more to load"
        };
        let help = Paragraph::new(Line::from(vec![
            Span::styled(
                "[j/k] Select  [Enter] Open  [r] Reload  ",
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(more, Style::default().fg(Color::Cyan)),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        f.render_widget(help, chunks[2]);
    }
}
