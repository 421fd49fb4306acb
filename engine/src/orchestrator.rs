//! The round loop.
//!
//! Each round selects a batch, builds and signs one plan per item, submits
//! every plan of the round concurrently, and waits for all of them before
//! the next round starts. The loop ends when a round selects nothing.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use futures_util::future::try_join_all;
use serde::{Deserialize, Serialize};
use splitter_types::{Address, Amount, FeeInfo, SignedTransaction, SplitPlan, Utxo, UtxoPosition};

use crate::batch::{select_batch, SelectionParams, DEFAULT_MAX_OUTPUTS};
use crate::chain::{Submitter, TransactionSigner};
use crate::error::SplitError;
use crate::plan::build_plan;

/// What happens to UTXOs a round did not spend.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeftoverPolicy {
    /// Keep them as candidates for later rounds.
    #[default]
    Carry,
    /// Only the outputs created by a round are considered in the next one.
    Drop,
}

impl FromStr for LeftoverPolicy {
    type Err = SplitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "carry" => Ok(Self::Carry),
            "drop" => Ok(Self::Drop),
            other => Err(SplitError::InvalidArgument(format!(
                "unknown leftover policy {other:?}, expected \"carry\" or \"drop\""
            ))),
        }
    }
}

impl fmt::Display for LeftoverPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Carry => write!(f, "carry"),
            Self::Drop => write!(f, "drop"),
        }
    }
}

/// Parameters of a split run.
#[derive(Clone, Debug)]
pub struct SplitConfig {
    /// Token whose UTXOs are split.
    pub token: Address,
    /// Smallest output worth creating.
    pub min_value: Amount,
    /// Upper bound on outputs per transaction.
    pub max_outputs: usize,
    pub leftover_policy: LeftoverPolicy,
    /// See [`SelectionParams::defer_unsplittable`].
    pub defer_unsplittable: bool,
}

impl SplitConfig {
    pub fn new(token: Address, min_value: Amount) -> Self {
        Self {
            token,
            min_value,
            max_outputs: DEFAULT_MAX_OUTPUTS,
            leftover_policy: LeftoverPolicy::default(),
            defer_unsplittable: false,
        }
    }

    fn selection(&self, fee: &FeeInfo) -> SelectionParams {
        SelectionParams {
            target_token: self.token,
            min_value: self.min_value,
            fee: fee.clone(),
            max_outputs: self.max_outputs,
            defer_unsplittable: self.defer_unsplittable,
        }
    }
}

/// Summary of a completed run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SplitReport {
    /// Rounds that submitted at least one transaction.
    pub rounds: usize,
    pub transactions: usize,
    pub outputs_created: usize,
    /// The candidate pool the final, empty round was selected from.
    pub final_utxos: Vec<Utxo>,
}

/// Drives split rounds until nothing qualifies.
pub struct SplitOrchestrator<S, T> {
    signer: S,
    submitter: T,
    config: SplitConfig,
}

impl<S: TransactionSigner, T: Submitter> SplitOrchestrator<S, T> {
    pub fn new(signer: S, submitter: T, config: SplitConfig) -> Self {
        Self {
            signer,
            submitter,
            config,
        }
    }

    /// The plans the next round would submit for `utxos`, without signing or
    /// submitting anything.
    pub fn plan_round(&self, utxos: &[Utxo], fee: &FeeInfo) -> Result<Vec<SplitPlan>, SplitError> {
        select_batch(utxos, &self.config.selection(fee))?
            .iter()
            .map(|item| build_plan(item, fee))
            .collect()
    }

    /// Split `utxos` round after round until no UTXO is worth splitting.
    ///
    /// Any error aborts the run; transactions accepted in earlier rounds stay
    /// accepted.
    pub async fn run(&self, utxos: Vec<Utxo>, fee: &FeeInfo) -> Result<SplitReport, SplitError> {
        let mut report = SplitReport::default();
        let mut pool = utxos;

        loop {
            let plans = self.plan_round(&pool, fee)?;
            if plans.is_empty() {
                tracing::info!("no suitable utxos left to split");
                break;
            }

            report.rounds += 1;
            tracing::info!(round = report.rounds, count = plans.len(), "splitting utxos");

            let signed = plans
                .iter()
                .map(|plan| self.signer.sign(plan))
                .collect::<Result<Vec<_>, _>>()?;
            let created = self.submit_round(&signed).await?;

            report.transactions += signed.len();
            report.outputs_created += created.len();

            pool = match self.config.leftover_policy {
                LeftoverPolicy::Drop => created,
                LeftoverPolicy::Carry => {
                    let spent: HashSet<UtxoPosition> = plans
                        .iter()
                        .flat_map(|plan| plan.inputs.iter().map(Utxo::position))
                        .collect();
                    pool.into_iter()
                        .filter(|utxo| !spent.contains(&utxo.position()))
                        .chain(created)
                        .collect()
                }
            };
        }

        tracing::info!(
            rounds = report.rounds,
            transactions = report.transactions,
            outputs = report.outputs_created,
            "split complete"
        );
        report.final_utxos = pool;
        Ok(report)
    }

    /// Submit every transaction concurrently and collect the UTXOs they
    /// create, in transaction order then output order. The first failure
    /// drops the submissions still in flight.
    async fn submit_round(&self, signed: &[SignedTransaction]) -> Result<Vec<Utxo>, SplitError> {
        let submissions = signed.iter().map(|tx| async move {
            let result = self.submitter.submit(tx).await?;
            tracing::debug!(
                blknum = result.blknum,
                txindex = result.txindex,
                outputs = tx.plan.outputs.len(),
                "transaction accepted"
            );
            Ok::<_, SplitError>(tx.plan.next_utxos(&result))
        });
        let created = try_join_all(submissions).await?;
        Ok(created.into_iter().flatten().collect())
    }
}
