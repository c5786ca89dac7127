//! Transfer modal: the form and completion views around a [`TransferWorkflow`].

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};
use tokio::sync::mpsc::UnboundedSender;

use tokenbound_wallet::domain::transfer::{
    AssetContext, PendingTransfer, TransferOutcome, TransferResult, TransferWorkflow,
};

use crate::{action::Action, tui::Frame};

use super::Component;

/// Input field focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferField {
    Recipient,
    Amount,
    Send,
}

pub struct TransferModal {
    action_tx: UnboundedSender<Action>,
    workflow: Option<TransferWorkflow>,
    pub focused_field: TransferField,
    // Kept across open/close so completions of a closed modal are recognised as stale.
    sessions: u64,
}

impl TransferModal {
    pub fn new(action_tx: UnboundedSender<Action>) -> Self {
        Self {
            action_tx,
            workflow: None,
            focused_field: TransferField::Recipient,
            sessions: 0,
        }
    }

    pub fn is_open(&self) -> bool {
        self.workflow.is_some()
    }

    pub fn workflow(&self) -> Option<&TransferWorkflow> {
        self.workflow.as_ref()
    }

    pub fn open(&mut self, asset: AssetContext) {
        self.workflow = Some(TransferWorkflow::with_session(asset, self.sessions));
        self.focused_field = TransferField::Recipient;
    }

    /// Close the modal from any state, discarding the form.
    pub fn close(&mut self) {
        if let Some(mut workflow) = self.workflow.take() {
            workflow.close();
            self.sessions = workflow.session();
        }
        self.focused_field = TransferField::Recipient;
    }

    /// Start a submission if the form allows it.
    pub fn begin_submit(&mut self) -> Option<PendingTransfer> {
        self.workflow.as_mut()?.begin_submit()
    }

    /// Deliver a transfer result. Returns whether it belonged to the open session.
    pub fn settle(&mut self, session: u64, result: TransferResult) -> bool {
        match self.workflow.as_mut() {
            Some(workflow) => workflow.settle(session, result),
            None => false,
        }
    }

    pub fn paste(&mut self, text: &str) {
        let Some(workflow) = self.workflow.as_mut() else {
            return;
        };
        let text = text.trim();
        match self.focused_field {
            TransferField::Recipient => {
                let value = format!("{}{}", workflow.request().recipient_address, text);
                workflow.set_recipient(&value);
            }
            TransferField::Amount => {
                let value = format!("{}{}", workflow.request().amount_text, text);
                workflow.set_amount(&value);
            }
            TransferField::Send => {}
        }
    }

    fn next_field(&mut self) {
        self.focused_field = match self.focused_field {
            TransferField::Recipient => TransferField::Amount,
            TransferField::Amount => TransferField::Send,
            TransferField::Send => TransferField::Recipient,
        };
    }

    fn prev_field(&mut self) {
        self.focused_field = match self.focused_field {
            TransferField::Recipient => TransferField::Send,
            TransferField::Amount => TransferField::Recipient,
            TransferField::Send => TransferField::Amount,
        };
    }

    fn handle_char(&mut self, c: char) {
        let Some(workflow) = self.workflow.as_mut() else {
            return;
        };
        match self.focused_field {
            TransferField::Recipient => {
                let mut value = workflow.request().recipient_address.clone();
                value.push(c);
                workflow.set_recipient(&value);
            }
            TransferField::Amount => {
                let mut value = workflow.request().amount_text.clone();
                value.push(c);
                workflow.set_amount(&value);
            }
            TransferField::Send => {}
        }
    }

    fn handle_backspace(&mut self) {
        let Some(workflow) = self.workflow.as_mut() else {
            return;
        };
        match self.focused_field {
            TransferField::Recipient => {
                let mut value = workflow.request().recipient_address.clone();
                value.pop();
                workflow.set_recipient(&value);
            }
            TransferField::Amount => {
                let mut value = workflow.request().amount_text.clone();
                value.pop();
                workflow.set_amount(&value);
            }
            TransferField::Send => {}
        }
    }

    fn popup_area(area: Rect) -> Rect {
        let [area] = Layout::horizontal([Constraint::Length(64)])
            .flex(Flex::Center)
            .areas(area);
        let [area] = Layout::vertical([Constraint::Length(18)])
            .flex(Flex::Center)
            .areas(area);
        area
    }

    fn field_block(title: &'static str, focused: bool) -> Block<'static> {
        Block::default()
            .title(if focused {
                format!("> {}", title)
            } else {
                format!("  {}", title)
            })
            .borders(Borders::ALL)
            .border_style(if focused {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::DarkGray)
            })
    }

    fn draw_form(f: &mut Frame, area: Rect, workflow: &TransferWorkflow, focused: TransferField) {
        let chunks = Layout::vertical([
            Constraint::Length(3), // Asset
            Constraint::Length(3), // Recipient
            Constraint::Length(3), // Amount
            Constraint::Length(3), // Send button
            Constraint::Min(0),    // Help
        ])
        .split(area);

        let asset = workflow.asset();
        let asset_line = Paragraph::new(Line::from(vec![
            Span::raw(format!("{} ", asset.icon)),
            Span::styled(
                asset.abbreviation.to_uppercase(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  {}", asset.name), Style::default().fg(Color::DarkGray)),
            Span::raw("  |  "),
            Span::styled("Balance: ", Style::default().fg(Color::DarkGray)),
            Span::styled(asset.balance.clone(), Style::default().fg(Color::Green)),
        ]))
        .block(
            Block::default()
                .title("Asset")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        f.render_widget(asset_line, chunks[0]);

        let request = workflow.request();
        let input = |value: &str, placeholder: &'static str, is_focused: bool| {
            if value.is_empty() && !is_focused {
                Span::styled(placeholder, Style::default().fg(Color::DarkGray))
            } else if is_focused {
                Span::styled(format!("{}│", value), Style::default().fg(Color::Yellow))
            } else {
                Span::styled(value.to_string(), Style::default().fg(Color::White))
            }
        };

        let recipient_focused = focused == TransferField::Recipient;
        let recipient = Paragraph::new(Line::from(input(
            &request.recipient_address,
            "Enter Wallet Address",
            recipient_focused,
        )))
        .block(Self::field_block("Wallet Address", recipient_focused));
        f.render_widget(recipient, chunks[1]);

        let amount_focused = focused == TransferField::Amount;
        let amount = Paragraph::new(Line::from(input(
            &request.amount_text,
            "Enter Amount",
            amount_focused,
        )))
        .block(Self::field_block("Amount", amount_focused));
        f.render_widget(amount, chunks[2]);

        let enabled = workflow.can_submit();
        let label = if workflow.outcome() == TransferOutcome::Pending {
            "  [ sending... ]  "
        } else {
            "  [ send → ]  "
        };
        let send_style = match (enabled, focused == TransferField::Send) {
            (true, true) => Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD),
            (true, false) => Style::default().fg(Color::Green),
            (false, _) => Style::default().fg(Color::DarkGray),
        };
        let send = Paragraph::new(Line::from(Span::styled(label, send_style)))
            .block(Self::field_block("Send", focused == TransferField::Send));
        f.render_widget(send, chunks[3]);

        let help = Paragraph::new(Line::from(Span::styled(
            "[Tab/↓] Next field  [Shift+Tab/↑] Prev field  [Enter] Send  [Esc] Close",
            Style::default().fg(Color::DarkGray),
        )));
        f.render_widget(help, chunks[4]);
    }

    fn draw_complete(f: &mut Frame, area: Rect) {
        let done = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "✓",
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Completed",
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
            Line::from("Transaction successful"),
            Line::from(""),
            Line::from(Span::styled(
                "[Enter/Esc] Close",
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .centered();
        f.render_widget(done, area);
    }
}

impl Component for TransferModal {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        let Some(workflow) = self.workflow.as_ref() else {
            return Ok(());
        };

        if workflow.is_complete() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.action_tx.send(Action::CloseTransfer)?;
            }
            return Ok(());
        }

        match key.code {
            KeyCode::Esc => {
                self.action_tx.send(Action::CloseTransfer)?;
            }
            KeyCode::Tab | KeyCode::Down => self.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.prev_field(),
            KeyCode::Enter => {
                if self.focused_field == TransferField::Send {
                    if workflow.can_submit() {
                        self.action_tx.send(Action::SubmitTransfer)?;
                    }
                } else {
                    self.next_field();
                }
            }
            // Control and Alt chords are not text.
            KeyCode::Char(c) if key.modifiers.difference(KeyModifiers::SHIFT).is_empty() => {
                self.handle_char(c)
            }
            KeyCode::Backspace => self.handle_backspace(),
            _ => {}
        }
        Ok(())
    }

    fn draw(&mut self, f: &mut Frame, area: Rect) {
        let Some(workflow) = self.workflow.as_ref() else {
            return;
        };

        let popup = Self::popup_area(area);
        f.render_widget(Clear, popup);
        let block = Block::default()
            .title(" Send ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(popup);
        f.render_widget(block, popup);

        if workflow.is_complete() {
            Self::draw_complete(f, inner);
        } else {
            Self::draw_form(f, inner, workflow, self.focused_field);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;
    use tokio::sync::mpsc;

    fn asset() -> AssetContext {
        AssetContext {
            abbreviation: "ETH".to_string(),
            name: "Ether".to_string(),
            icon: "Ξ".to_string(),
            balance: "5".to_string(),
            tba_address: "0xtba".to_string(),
            contract_address: "0xeth".to_string(),
            scaling_factor: 1000,
        }
    }

    fn type_str(modal: &mut TransferModal, s: &str) {
        for c in s.chars() {
            modal
                .handle_key_event(KeyEvent::from(KeyCode::Char(c)))
                .unwrap();
        }
    }

    #[test]
    fn test_typing_goes_through_normalization() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut modal = TransferModal::new(tx);
        modal.open(asset());

        type_str(&mut modal, "0xabc");
        modal.handle_key_event(KeyEvent::from(KeyCode::Tab)).unwrap();
        type_str(&mut modal, ".5");
        assert_eq!(modal.workflow().unwrap().request().amount_text, "0.5");

        type_str(&mut modal, "9");
        assert_eq!(modal.workflow().unwrap().request().amount_text, "0.59");

        // Typing past the balance clamps to it
        modal
            .handle_key_event(KeyEvent::from(KeyCode::Backspace))
            .unwrap();
        modal
            .handle_key_event(KeyEvent::from(KeyCode::Backspace))
            .unwrap();
        modal
            .handle_key_event(KeyEvent::from(KeyCode::Backspace))
            .unwrap();
        type_str(&mut modal, "99");
        assert_eq!(modal.workflow().unwrap().request().amount_text, "5");
        assert_eq!(modal.workflow().unwrap().request().recipient_address, "0xabc");
    }

    #[test]
    fn test_send_button_emits_submit_only_when_enabled() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut modal = TransferModal::new(tx);
        modal.open(asset());
        modal.focused_field = TransferField::Send;

        modal.handle_key_event(KeyEvent::from(KeyCode::Enter)).unwrap();
        assert!(rx.try_recv().is_err());

        modal.paste("0xabc");
        // Paste lands in the focused field; Send is focused so nothing changes
        assert_eq!(modal.workflow().unwrap().request().recipient_address, "");

        modal.focused_field = TransferField::Recipient;
        modal.paste(" 0xabc ");
        modal.focused_field = TransferField::Amount;
        modal.paste("1");
        modal.focused_field = TransferField::Send;
        modal.handle_key_event(KeyEvent::from(KeyCode::Enter)).unwrap();
        assert_eq!(rx.try_recv().unwrap(), Action::SubmitTransfer);
    }

    #[test]
    fn test_result_after_reopen_is_stale() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut modal = TransferModal::new(tx);
        modal.open(asset());
        modal.paste("0xabc");
        modal.focused_field = TransferField::Amount;
        modal.paste("1");

        let pending = modal.begin_submit().unwrap();
        modal.close();
        assert!(!modal.is_open());

        modal.open(asset());
        assert!(!modal.settle(pending.session, TransferResult::Success));
        assert_eq!(
            modal.workflow().unwrap().outcome(),
            TransferOutcome::Unset
        );
    }

    #[test]
    fn test_control_chords_are_not_typed() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut modal = TransferModal::new(tx);
        modal.open(asset());
        modal.focused_field = TransferField::Amount;
        type_str(&mut modal, "1.5");

        for modifiers in [KeyModifiers::CONTROL, KeyModifiers::ALT] {
            modal
                .handle_key_event(KeyEvent::new(KeyCode::Char('z'), modifiers))
                .unwrap();
        }
        assert_eq!(modal.workflow().unwrap().request().amount_text, "1.5");

        modal.focused_field = TransferField::Recipient;
        modal
            .handle_key_event(KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT))
            .unwrap();
        assert_eq!(modal.workflow().unwrap().request().recipient_address, "A");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_escape_requests_close() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut modal = TransferModal::new(tx);
        modal.open(asset());
        modal.handle_key_event(KeyEvent::from(KeyCode::Esc)).unwrap();
        assert_eq!(rx.try_recv().unwrap(), Action::CloseTransfer);
    }
}
