use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use tokio::sync::mpsc::UnboundedSender;

use tokenbound_wallet::domain::nft::Chain;

use crate::{action::Action, tui::Frame};

use super::Component;

/// Available network options
const NETWORKS: [(&str, &str); 2] = [
    ("sepolia", "Starknet Sepolia"),
    ("mainnet", "Starknet Mainnet"),
];

pub struct SettingsComponent {
    action_tx: UnboundedSender<Action>,
    pub current_network: String,
    pub rpc_url: String,
    pub selected_index: usize,
    list_state: ListState,
}

impl SettingsComponent {
    pub fn new(action_tx: UnboundedSender<Action>, current_network: &str, rpc_url: &str) -> Self {
        let mut component = Self {
            action_tx,
            current_network: String::new(),
            rpc_url: String::new(),
            selected_index: 0,
            list_state: ListState::default(),
        };
        component.set_network(current_network, rpc_url);
        component
    }

    pub fn set_network(&mut self, network: &str, rpc_url: &str) {
        self.current_network = network.to_string();
        self.rpc_url = rpc_url.to_string();
        self.selected_index = NETWORKS
            .iter()
            .position(|(name, _)| *name == network)
            .unwrap_or(0);
        self.list_state.select(Some(self.selected_index));
    }

    fn select(&mut self, index: usize) {
        self.selected_index = index;
        self.list_state.select(Some(index));
    }

    fn next(&mut self) {
        self.select((self.selected_index + 1) % NETWORKS.len());
    }

    fn previous(&mut self) {
        self.select(if self.selected_index == 0 {
            NETWORKS.len() - 1
        } else {
            self.selected_index - 1
        });
    }

    fn select_network(&self) -> Result<()> {
        let (name, _) = NETWORKS[self.selected_index];
        if name != self.current_network {
            self.action_tx
                .send(Action::SwitchNetwork(name.to_string()))?;
        }
        Ok(())
    }
}

impl Component for SettingsComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.next(),
            KeyCode::Char('k') | KeyCode::Up => self.previous(),
            KeyCode::Char('e') => {
                self.select(0);
                self.select_network()?;
            }
            KeyCode::Char('m') => {
                self.select(1);
                self.select_network()?;
            }
            KeyCode::Enter => self.select_network()?,
            _ => {}
        }
        Ok(())
    }

    fn draw(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(area);

        let hotkeys = ["S[e]polia", "[M]ainnet"];
        let items: Vec<ListItem> = NETWORKS
            .iter()
            .enumerate()
            .map(|(i, (name, _))| {
                let is_current = *name == self.current_network;
                let style = if i == self.selected_index {
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD)
                } else if is_current {
                    Style::default().fg(Color::Green)
                } else {
                    Style::default().fg(Color::White)
                };
                let marker = if is_current { " ✓" } else { "" };
                ListItem::new(Line::from(Span::styled(
                    format!("{}{}", hotkeys[i], marker),
                    style,
                )))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .title("Network Selection")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray)),
            )
            .highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");
        f.render_stateful_widget(list, chunks[0], &mut self.list_state);

        let (name, display_name) = NETWORKS[self.selected_index];
        let is_current = name == self.current_network;
        let chain = Chain::from_network(name);

        let mut details = vec![
            Line::from(vec![
                Span::styled("Network: ", Style::default().fg(Color::DarkGray)),
                Span::styled(display_name, Style::default().fg(Color::White)),
            ]),
            Line::from(vec![
                Span::styled("Chain ID: ", Style::default().fg(Color::DarkGray)),
                Span::styled(chain.chain_id(), Style::default().fg(Color::White)),
            ]),
            Line::from(""),
        ];

        if is_current {
            details.push(Line::from(vec![
                Span::styled("RPC URL: ", Style::default().fg(Color::DarkGray)),
                Span::styled(self.rpc_url.clone(), Style::default().fg(Color::Yellow)),
            ]));
            details.push(Line::from(""));
        }

        if chain == Chain::Mainnet {
            details.push(Line::from(Span::styled(
                "WARNING: Real funds!",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )));
            details.push(Line::from(Span::styled(
                "Transfers cannot be reversed.",
                Style::default().fg(Color::Red),
            )));
        } else {
            details.push(Line::from(Span::styled(
                "Test network for development",
                Style::default().fg(Color::Gray),
            )));
        }

        details.push(Line::from(""));
        details.push(Line::from(Span::styled(
            if is_current {
                "[Currently active]"
            } else {
                "[Enter] Switch to this network"
            },
            Style::default().fg(Color::DarkGray),
        )));

        let details_widget = Paragraph::new(details).block(
            Block::default()
                .title("Network Details")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        f.render_widget(details_widget, chunks[1]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn test_switch_only_to_other_network() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut settings = SettingsComponent::new(tx, "sepolia", "http://rpc");
        assert_eq!(settings.selected_index, 0);

        settings
            .handle_key_event(KeyEvent::from(KeyCode::Enter))
            .unwrap();
        assert!(rx.try_recv().is_err());

        settings
            .handle_key_event(KeyEvent::from(KeyCode::Char('m')))
            .unwrap();
        assert_eq!(
            rx.try_recv().unwrap(),
            Action::SwitchNetwork("mainnet".to_string())
        );
    }
}
