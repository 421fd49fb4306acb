//! Contracts for the external collaborators the engine drives.
//!
//! Network-facing collaborators are async; signing is synchronous CPU work.
//! Implementations live in `splitter-watcher` (HTTP) and
//! `splitter-nullables` (in-memory, for tests).

use std::collections::HashMap;
use std::future::Future;

use splitter_crypto::TypedDataSigner;
use splitter_types::{Address, FeeInfo, SignedTransaction, SplitPlan, SubmissionResult, Utxo};

use crate::error::SplitError;

/// The fee tier whose entries apply to plain payment transactions.
pub const FEE_TIER: &str = "1";

/// Lists every UTXO an address currently owns.
pub trait UtxoSource: Send + Sync {
    fn fetch_utxos(
        &self,
        address: &Address,
    ) -> impl Future<Output = Result<Vec<Utxo>, SplitError>> + Send;
}

/// Reports the current fee schedule, keyed by fee tier.
pub trait FeeSchedule: Send + Sync {
    fn fetch_fee_schedule(
        &self,
    ) -> impl Future<Output = Result<HashMap<String, Vec<FeeInfo>>, SplitError>> + Send;
}

/// Accepts signed transactions for inclusion.
pub trait Submitter: Send + Sync {
    fn submit(
        &self,
        tx: &SignedTransaction,
    ) -> impl Future<Output = Result<SubmissionResult, SplitError>> + Send;
}

/// Turns a plan into a signed, submittable transaction.
pub trait TransactionSigner: Send + Sync {
    fn sign(&self, plan: &SplitPlan) -> Result<SignedTransaction, SplitError>;
}

impl<T: UtxoSource + ?Sized> UtxoSource for &T {
    fn fetch_utxos(
        &self,
        address: &Address,
    ) -> impl Future<Output = Result<Vec<Utxo>, SplitError>> + Send {
        (**self).fetch_utxos(address)
    }
}

impl<T: FeeSchedule + ?Sized> FeeSchedule for &T {
    fn fetch_fee_schedule(
        &self,
    ) -> impl Future<Output = Result<HashMap<String, Vec<FeeInfo>>, SplitError>> + Send {
        (**self).fetch_fee_schedule()
    }
}

impl<T: Submitter + ?Sized> Submitter for &T {
    fn submit(
        &self,
        tx: &SignedTransaction,
    ) -> impl Future<Output = Result<SubmissionResult, SplitError>> + Send {
        (**self).submit(tx)
    }
}

impl<T: TransactionSigner + ?Sized> TransactionSigner for &T {
    fn sign(&self, plan: &SplitPlan) -> Result<SignedTransaction, SplitError> {
        (**self).sign(plan)
    }
}

impl TransactionSigner for TypedDataSigner {
    fn sign(&self, plan: &SplitPlan) -> Result<SignedTransaction, SplitError> {
        TypedDataSigner::sign(self, plan).map_err(SplitError::from)
    }
}
