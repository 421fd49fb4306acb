//! Shared utilities for the UTXO splitter.

pub mod logging;

pub use logging::{init_logging, LogFormat};
