//! Fundamental types for the UTXO splitter.
//!
//! This crate defines the value types shared across every other crate in the
//! workspace: token amounts, UTXOs and their positions, fee entries, output
//! descriptions, split plans and submission results.
//!
//! Everything here is an immutable value record. Amounts are 256-bit unsigned
//! integers and never pass through floating point.

pub mod amount;
pub mod error;
pub mod fee;
pub mod plan;
pub mod utxo;

pub use alloy_primitives::{Address, Bytes, B256, U256};
pub use amount::Amount;
pub use error::TypesError;
pub use fee::FeeInfo;
pub use plan::{OutputSpec, OutputType, SignedTransaction, SplitPlan, SubmissionResult};
pub use utxo::{Utxo, UtxoPosition};
