//! Nullable chain: an in-memory ledger of UTXOs that validates and applies
//! submitted split transactions.

use alloy_primitives::keccak256;
use alloy_sol_types::Eip712Domain;
use splitter_crypto::{decode_signed_transaction, plasma_domain, recover_signer, signing_hash};
use splitter_engine::{FeeSchedule, SplitError, Submitter, UtxoSource, FEE_TIER};
use splitter_types::{
    Address, Amount, FeeInfo, SignedTransaction, SplitPlan, SubmissionResult, Utxo, UtxoPosition,
};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;

/// Blocks are numbered in steps of this, like child chain blocks.
pub const BLOCK_INTERVAL: u64 = 1000;

struct ChainState {
    utxos: BTreeMap<UtxoPosition, Utxo>,
    next_blknum: u64,
    accepted: Vec<SplitPlan>,
    /// Submissions still allowed before every further one is rejected.
    remaining_accepts: Option<usize>,
}

/// A test chain that keeps UTXOs in memory.
/// Thread-safe for use with tokio's multi-threaded runtime.
pub struct NullChain {
    state: Mutex<ChainState>,
    fee_schedule: HashMap<String, Vec<FeeInfo>>,
    domain: Option<Eip712Domain>,
}

impl NullChain {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ChainState {
                utxos: BTreeMap::new(),
                next_blknum: BLOCK_INTERVAL,
                accepted: Vec::new(),
                remaining_accepts: None,
            }),
            fee_schedule: HashMap::new(),
            domain: None,
        }
    }

    /// Add a tier-1 fee entry.
    pub fn with_fee(mut self, fee: FeeInfo) -> Self {
        self.fee_schedule
            .entry(FEE_TIER.to_string())
            .or_default()
            .push(fee);
        self
    }

    /// Require every input signature to recover to the input's owner under
    /// the given plasma framework deployment.
    pub fn verifying_signatures(mut self, verifying_contract: Address) -> Self {
        self.domain = Some(plasma_domain(verifying_contract));
        self
    }

    /// Create a UTXO out of thin air in its own block.
    pub fn deposit(&self, owner: Address, currency: Address, amount: Amount) -> Utxo {
        let mut state = self.state.lock().unwrap();
        let blknum = state.next_blknum;
        state.next_blknum += BLOCK_INTERVAL;
        let utxo = Utxo {
            amount,
            currency,
            owner,
            blknum,
            txindex: 0,
            oindex: 0,
        };
        state.utxos.insert(utxo.position(), utxo.clone());
        utxo
    }

    /// Accept `count` more submissions, then reject every one after.
    pub fn reject_after(&self, count: usize) {
        self.state.lock().unwrap().remaining_accepts = Some(count);
    }

    /// Every unspent output of `owner`, in chain order.
    pub fn utxos_of(&self, owner: &Address) -> Vec<Utxo> {
        self.state
            .lock()
            .unwrap()
            .utxos
            .values()
            .filter(|u| u.owner == *owner)
            .cloned()
            .collect()
    }

    /// Total unspent `currency` held by `owner`.
    pub fn balance(&self, owner: &Address, currency: &Address) -> Amount {
        let utxos = self.utxos_of(owner);
        Amount::checked_sum(
            utxos
                .iter()
                .filter(|u| u.currency == *currency)
                .map(|u| &u.amount),
        )
        .unwrap_or(Amount::ZERO)
    }

    /// Plans accepted so far, in submission order.
    pub fn accepted(&self) -> Vec<SplitPlan> {
        self.state.lock().unwrap().accepted.clone()
    }

    fn fee_entry(&self, currency: &Address) -> Option<&FeeInfo> {
        self.fee_schedule
            .get(FEE_TIER)?
            .iter()
            .find(|f| f.currency == *currency)
    }

    /// Check that the plan pays exactly one scheduled fee and otherwise
    /// conserves value.
    fn check_balance(&self, plan: &SplitPlan) -> Result<(), String> {
        let mut paid = Vec::new();
        for currency in plan.currencies() {
            let fee = plan
                .implied_fee(&currency)
                .ok_or_else(|| format!("outputs exceed inputs in {currency}"))?;
            if !fee.is_zero() {
                paid.push((currency, fee));
            }
        }
        match paid.as_slice() {
            [] => {
                let free = plan
                    .currencies()
                    .iter()
                    .any(|c| self.fee_entry(c).is_some_and(|f| f.amount.is_zero()));
                if free {
                    Ok(())
                } else {
                    Err("transaction pays no fee".into())
                }
            }
            [(currency, amount)] => match self.fee_entry(currency) {
                Some(fee) if fee.amount == *amount => Ok(()),
                Some(fee) => Err(format!(
                    "fee mismatch in {currency}: paid {amount}, expected {}",
                    fee.amount
                )),
                None => Err(format!("{currency} is not a fee token")),
            },
            _ => Err("fees paid in more than one currency".into()),
        }
    }

    fn check_encoding(&self, tx: &SignedTransaction) -> Result<(), String> {
        let envelope = decode_signed_transaction(&tx.encoded).map_err(|e| e.to_string())?;
        if envelope.inputs.len() != tx.plan.inputs.len()
            || envelope.outputs.len() != tx.plan.outputs.len()
            || envelope.signatures.len() != tx.plan.inputs.len()
        {
            return Err("encoding does not match plan".into());
        }
        if let Some(domain) = &self.domain {
            let hash = signing_hash(&tx.plan, domain).map_err(|e| e.to_string())?;
            for (input, signature) in tx.plan.inputs.iter().zip(&envelope.signatures) {
                if recover_signer(&hash, signature) != Some(input.owner) {
                    return Err(format!("bad signature for input {}", input.position()));
                }
            }
        }
        Ok(())
    }

    fn apply(&self, tx: &SignedTransaction) -> Result<SubmissionResult, String> {
        self.check_encoding(tx)?;
        self.check_balance(&tx.plan)?;

        let mut state = self.state.lock().unwrap();
        if let Some(remaining) = state.remaining_accepts {
            if remaining == 0 {
                return Err("transaction rejected".into());
            }
            state.remaining_accepts = Some(remaining - 1);
        }

        let mut seen = HashSet::new();
        for input in &tx.plan.inputs {
            let position = input.position();
            if !seen.insert(position) {
                return Err(format!("input {position} spent twice"));
            }
            match state.utxos.get(&position) {
                Some(existing) if existing == input => {}
                Some(_) => return Err(format!("input {position} does not match chain state")),
                None => return Err(format!("input {position} is not unspent")),
            }
        }

        for input in &tx.plan.inputs {
            state.utxos.remove(&input.position());
        }
        let result = SubmissionResult {
            blknum: state.next_blknum,
            txindex: 0,
            txhash: Some(keccak256(&tx.encoded)),
        };
        state.next_blknum += BLOCK_INTERVAL;
        for utxo in tx.plan.next_utxos(&result) {
            state.utxos.insert(utxo.position(), utxo);
        }
        state.accepted.push(tx.plan.clone());
        Ok(result)
    }
}

impl Default for NullChain {
    fn default() -> Self {
        Self::new()
    }
}

impl UtxoSource for NullChain {
    async fn fetch_utxos(&self, address: &Address) -> Result<Vec<Utxo>, SplitError> {
        Ok(self.utxos_of(address))
    }
}

impl FeeSchedule for NullChain {
    async fn fetch_fee_schedule(&self) -> Result<HashMap<String, Vec<FeeInfo>>, SplitError> {
        Ok(self.fee_schedule.clone())
    }
}

impl Submitter for NullChain {
    async fn submit(&self, tx: &SignedTransaction) -> Result<SubmissionResult, SplitError> {
        self.apply(tx).map_err(SplitError::Submission)
    }
}
