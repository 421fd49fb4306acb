//! Watcher client.
//!
//! The watcher is the child chain's indexing and submission service. This
//! crate talks to its HTTP API and implements the engine's [`UtxoSource`],
//! [`FeeSchedule`] and [`Submitter`] contracts on top of it.
//!
//! [`UtxoSource`]: splitter_engine::UtxoSource
//! [`FeeSchedule`]: splitter_engine::FeeSchedule
//! [`Submitter`]: splitter_engine::Submitter

pub mod client;
pub mod error;
mod wire;

pub use client::{WatcherClient, DEFAULT_PAGE_LIMIT};
pub use error::WatcherError;
