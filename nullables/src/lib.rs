//! Nullable infrastructure for deterministic testing.
//!
//! The external collaborators of the splitting engine (UTXO source, fee
//! schedule, submission endpoint) are abstracted behind traits in
//! `splitter-engine`. This crate provides an in-memory implementation that:
//! - Returns deterministic block positions
//! - Enforces the chain's spending rules (no double spends, balanced plans,
//!   correctly encoded and optionally correctly signed transactions)
//! - Can be told to reject submissions
//! - Never touches the network
//!
//! Usage: swap the watcher client for a [`NullChain`] in tests.

pub mod chain;

pub use chain::NullChain;
