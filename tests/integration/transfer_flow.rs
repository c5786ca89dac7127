//! Transfer workflow driven end to end against an in-memory SDK.

use std::sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use color_eyre::eyre::{Result, eyre};

use tokenbound_wallet::{
    domain::{
        amount::scaling_factor,
        transfer::{AssetContext, Erc20Transfer, TransferOutcome, TransferWorkflow},
    },
    infra::tokenbound::{TokenboundSdk, run_transfer},
};

/// SDK double that counts transfer calls and answers with a fixed script.
struct CountingSdk {
    calls: AtomicUsize,
    last: Mutex<Option<Erc20Transfer>>,
    answer: fn() -> Result<bool>,
}

impl CountingSdk {
    fn new(answer: fn() -> Result<bool>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            last: Mutex::new(None),
            answer,
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenboundSdk for CountingSdk {
    async fn get_account(&self, _: &str, _: &str) -> Result<String> {
        Ok("0xtba".to_string())
    }

    async fn erc20_balance(&self, _: &str, _: &str) -> Result<String> {
        Ok("0".to_string())
    }

    async fn transfer_erc20(&self, transfer: &Erc20Transfer) -> Result<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some(transfer.clone());
        (self.answer)()
    }
}

fn eth(balance: &str) -> AssetContext {
    AssetContext {
        abbreviation: "ETH".to_string(),
        name: "Ether".to_string(),
        icon: "Ξ".to_string(),
        balance: balance.to_string(),
        tba_address: "0xtba".to_string(),
        contract_address: "0xeth".to_string(),
        scaling_factor: scaling_factor(18).unwrap(),
    }
}

/// Submit the current form and settle it with whatever the SDK answers.
async fn submit(workflow: &mut TransferWorkflow, sdk: &CountingSdk) -> bool {
    let Some(pending) = workflow.begin_submit() else {
        return false;
    };
    let result = run_transfer(sdk, &pending.call).await;
    workflow.settle(pending.session, result)
}

#[tokio::test]
async fn test_successful_transfer_scales_amount() {
    let sdk = CountingSdk::new(|| Ok(true));
    let mut workflow = TransferWorkflow::new(eth("2.5"));
    workflow.set_recipient("0xabc");
    workflow.set_amount("1.5");

    assert!(submit(&mut workflow, &sdk).await);
    assert_eq!(workflow.outcome(), TransferOutcome::Success);
    assert!(workflow.is_complete());
    assert_eq!(sdk.calls(), 1);

    let call = sdk.last.lock().unwrap().clone().unwrap();
    assert_eq!(call.amount, "1500000000000000000");
    assert_eq!(call.tba_address, "0xtba");
    assert_eq!(call.contract_address, "0xeth");
    assert_eq!(call.recipient, "0xabc");
}

#[tokio::test]
async fn test_amount_above_balance_sends_the_balance() {
    let sdk = CountingSdk::new(|| Ok(true));
    let mut workflow = TransferWorkflow::new(eth("0.25"));
    workflow.set_recipient("0xabc");
    workflow.set_amount("3");
    assert_eq!(workflow.request().amount_text, "0.25");

    assert!(submit(&mut workflow, &sdk).await);
    let call = sdk.last.lock().unwrap().clone().unwrap();
    assert_eq!(call.amount, "250000000000000000");
}

#[tokio::test]
async fn test_one_call_per_pending_submission() {
    let sdk = CountingSdk::new(|| Ok(true));
    let mut workflow = TransferWorkflow::new(eth("5"));
    workflow.set_recipient("0xabc");
    workflow.set_amount("1");

    let pending = workflow.begin_submit().unwrap();
    // Repeated activations while pending do nothing.
    assert!(workflow.begin_submit().is_none());
    assert!(workflow.begin_submit().is_none());

    let result = run_transfer(&sdk, &pending.call).await;
    assert!(workflow.settle(pending.session, result));
    assert_eq!(sdk.calls(), 1);
}

#[tokio::test]
async fn test_failure_keeps_form_and_retry_after_edit() {
    let failing = CountingSdk::new(|| Ok(false));
    let mut workflow = TransferWorkflow::new(eth("5"));
    workflow.set_recipient("0xabc");
    workflow.set_amount("1");

    assert!(submit(&mut workflow, &failing).await);
    assert_eq!(workflow.outcome(), TransferOutcome::Failure);
    assert_eq!(workflow.request().recipient_address, "0xabc");
    assert_eq!(workflow.request().amount_text, "1");
    assert!(!workflow.can_submit());
    assert!(!submit(&mut workflow, &failing).await);
    assert_eq!(failing.calls(), 1);

    workflow.set_amount("1.");
    assert!(workflow.can_submit());

    let working = CountingSdk::new(|| Ok(true));
    assert!(submit(&mut workflow, &working).await);
    assert_eq!(workflow.outcome(), TransferOutcome::Success);
}

#[tokio::test]
async fn test_sdk_error_ends_in_failure() {
    let sdk = CountingSdk::new(|| Err(eyre!("bridge went away")));
    let mut workflow = TransferWorkflow::new(eth("5"));
    workflow.set_recipient("0xabc");
    workflow.set_amount("1");

    assert!(submit(&mut workflow, &sdk).await);
    assert_eq!(workflow.outcome(), TransferOutcome::Failure);
}

#[tokio::test]
async fn test_result_after_close_is_ignored() {
    let sdk = CountingSdk::new(|| Ok(true));
    let mut workflow = TransferWorkflow::new(eth("5"));
    workflow.set_recipient("0xabc");
    workflow.set_amount("1");

    let pending = workflow.begin_submit().unwrap();
    workflow.close();

    let result = run_transfer(&sdk, &pending.call).await;
    assert!(!workflow.settle(pending.session, result));
    assert_eq!(workflow.outcome(), TransferOutcome::Unset);
    assert_eq!(workflow.request().recipient_address, "");
    assert_eq!(workflow.request().amount_text, "");
}
