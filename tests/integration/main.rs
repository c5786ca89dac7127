//! Integration tests for tokenbound-wallet.
//!
//! HTTP clients are exercised against a one-shot local server; the transfer
//! workflow is driven end to end against an in-memory SDK.

mod bridge_client;
mod marketplace_client;
mod support;
mod transfer_flow;
