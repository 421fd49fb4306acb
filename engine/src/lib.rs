//! The UTXO splitting engine.
//!
//! Components, leaf to root:
//! - **partition**: divide an amount into near-equal parts
//! - **plan**: build the inputs/outputs of one split transaction
//! - **batch**: pick and pair the UTXOs eligible for splitting in a round
//! - **fee**: resolve and memoize the per-transaction fee
//! - **orchestrator**: run rounds until nothing is left to split
//!
//! External collaborators (UTXO source, fee schedule, signer, submitter)
//! are abstracted behind the traits in [`chain`].

pub mod batch;
pub mod chain;
pub mod error;
pub mod fee;
pub mod orchestrator;
pub mod partition;
pub mod plan;

pub use batch::{select_batch, BatchItem, SelectionParams, DEFAULT_MAX_OUTPUTS};
pub use chain::{FeeSchedule, Submitter, TransactionSigner, UtxoSource, FEE_TIER};
pub use error::SplitError;
pub use fee::FeeOracle;
pub use orchestrator::{LeftoverPolicy, SplitConfig, SplitOrchestrator, SplitReport};
pub use partition::partition;
pub use plan::{build_fee_token_split, build_non_fee_token_split, build_plan};
