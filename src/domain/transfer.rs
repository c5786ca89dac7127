//! Transfer workflow for sending a fungible asset out of a token-bound account.
//!
//! The workflow owns the form state of one transfer modal session and the
//! outcome of its submission. It never talks to the network itself:
//! [`TransferWorkflow::begin_submit`] hands out the call to make and
//! [`TransferWorkflow::settle`] takes the result back.

use serde::{Deserialize, Serialize};
use strum::Display;
use tracing::{debug, warn};

use super::amount::{normalize_amount, to_smallest_unit};

/// Read-only description of the asset being sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetContext {
    pub abbreviation: String,
    pub name: String,
    /// Icon reference (URL or symbol), shown as-is.
    pub icon: String,
    /// Available balance as a decimal string.
    pub balance: String,
    /// Token-bound account that owns the asset.
    pub tba_address: String,
    /// ERC20 contract address of the asset.
    pub contract_address: String,
    /// Multiplier from human units to the smallest unit.
    pub scaling_factor: u128,
}

/// Form fields of the transfer modal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferRequest {
    pub recipient_address: String,
    pub amount_text: String,
}

/// Submission state of the modal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum TransferOutcome {
    #[default]
    Unset,
    Pending,
    Success,
    Failure,
}

/// Result of one external transfer call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferResult {
    /// The call returned a truthy status.
    Success,
    /// The call returned a falsy status.
    Failure,
    /// The call path raised an error.
    Exception(String),
}

/// Parameters of the ERC20 transfer call, named after the SDK contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Erc20Transfer {
    pub tba_address: String,
    pub contract_address: String,
    pub recipient: String,
    /// Amount in the asset's smallest unit, as an integer string.
    pub amount: String,
}

/// A submitted transfer, tagged with the modal session that issued it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTransfer {
    pub session: u64,
    pub call: Erc20Transfer,
}

/// State machine for one asset's transfer modal.
#[derive(Debug, Clone)]
pub struct TransferWorkflow {
    asset: AssetContext,
    request: TransferRequest,
    outcome: TransferOutcome,
    session: u64,
}

impl TransferWorkflow {
    pub fn new(asset: AssetContext) -> Self {
        Self::with_session(asset, 0)
    }

    /// Start at a given session id, so ids keep growing across reopened modals.
    pub fn with_session(asset: AssetContext, session: u64) -> Self {
        Self {
            asset,
            request: TransferRequest::default(),
            outcome: TransferOutcome::Unset,
            session,
        }
    }

    pub fn asset(&self) -> &AssetContext {
        &self.asset
    }

    pub fn request(&self) -> &TransferRequest {
        &self.request
    }

    pub fn outcome(&self) -> TransferOutcome {
        self.outcome
    }

    pub fn session(&self) -> u64 {
        self.session
    }

    /// Whether the modal should show the completion view.
    pub fn is_complete(&self) -> bool {
        self.outcome == TransferOutcome::Success
    }

    /// Store the recipient verbatim.
    pub fn set_recipient(&mut self, value: &str) {
        self.request.recipient_address = value.to_string();
        self.leave_failure();
    }

    /// Store the amount after clamping it to the available balance.
    pub fn set_amount(&mut self, value: &str) {
        self.request.amount_text =
            normalize_amount(value, &self.request.amount_text, &self.asset.balance);
        self.leave_failure();
    }

    // An edit after a failed transfer makes the form submittable again.
    fn leave_failure(&mut self) {
        if self.outcome == TransferOutcome::Failure {
            self.outcome = TransferOutcome::Unset;
        }
    }

    /// Submit eligibility, derived from the current fields and outcome.
    pub fn can_submit(&self) -> bool {
        !self.request.recipient_address.is_empty()
            && !self.request.amount_text.is_empty()
            && !matches!(
                self.outcome,
                TransferOutcome::Pending | TransferOutcome::Failure
            )
    }

    /// Move to `Pending` and return the call to make.
    ///
    /// Returns `None` when submission is not allowed, including while a
    /// previous submission is still pending. An amount that cannot be scaled
    /// settles the submission as a failure without issuing a call.
    pub fn begin_submit(&mut self) -> Option<PendingTransfer> {
        if !self.can_submit() {
            debug!(
                "Transfer submit ignored in state {} (session {})",
                self.outcome, self.session
            );
            return None;
        }

        self.outcome = TransferOutcome::Pending;

        match to_smallest_unit(&self.request.amount_text, self.asset.scaling_factor) {
            Ok(amount) => Some(PendingTransfer {
                session: self.session,
                call: Erc20Transfer {
                    tba_address: self.asset.tba_address.clone(),
                    contract_address: self.asset.contract_address.clone(),
                    recipient: self.request.recipient_address.clone(),
                    amount,
                },
            }),
            Err(e) => {
                warn!("Cannot scale transfer amount: {}", e);
                self.outcome = TransferOutcome::Failure;
                None
            }
        }
    }

    /// Apply the result of a submitted call.
    ///
    /// Results for a session that has since been closed, or arriving when no
    /// submission is pending, are dropped. Returns whether the result was applied.
    pub fn settle(&mut self, session: u64, result: TransferResult) -> bool {
        if session != self.session || self.outcome != TransferOutcome::Pending {
            debug!(
                "Dropping stale transfer result for session {} (current {}, state {})",
                session, self.session, self.outcome
            );
            return false;
        }

        self.outcome = match result {
            TransferResult::Success => TransferOutcome::Success,
            TransferResult::Failure => TransferOutcome::Failure,
            TransferResult::Exception(reason) => {
                warn!("There was an error transferring the assets: {}", reason);
                TransferOutcome::Failure
            }
        };
        true
    }

    /// Close the modal: clear the fields and start a new session.
    pub fn close(&mut self) {
        self.request = TransferRequest::default();
        self.outcome = TransferOutcome::Unset;
        self.session += 1;
    }
}
