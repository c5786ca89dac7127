//! Tokenbound Wallet - A TUI explorer for Starknet token-bound accounts.
//!
//! This library provides:
//! - The transfer workflow for sending assets out of a token-bound account
//! - A client for the marketplace REST API (portfolio, tokens, metadata refresh)
//! - The token-bound account capability and its wallet-bridge transport

pub mod config;
pub mod domain;
pub mod infra;
