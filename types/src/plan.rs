//! Split plans: the unsigned transaction drafts built by the splitter, and
//! what the chain hands back once one is accepted.

use alloy_primitives::{Address, Bytes, B256};
use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::utxo::Utxo;

/// Output types understood by the child chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputType {
    /// A plain payment: spendable by the address in the output guard.
    Payment,
}

impl OutputType {
    /// The numeric identifier used on the wire and in signed data.
    pub fn as_u64(&self) -> u64 {
        match self {
            Self::Payment => 1,
        }
    }
}

/// One output of a split transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSpec {
    pub output_type: OutputType,
    /// Address authorised to spend this output later.
    pub output_guard: Address,
    pub currency: Address,
    pub amount: Amount,
}

impl OutputSpec {
    pub fn payment(owner: Address, currency: Address, amount: Amount) -> Self {
        Self {
            output_type: OutputType::Payment,
            output_guard: owner,
            currency,
            amount,
        }
    }
}

/// An unsigned transaction draft: the inputs it spends and the outputs it
/// creates.
///
/// Per currency, `inputs == outputs + fee`, where only the fee currency
/// carries a non-zero fee.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitPlan {
    pub inputs: Vec<Utxo>,
    pub outputs: Vec<OutputSpec>,
}

impl SplitPlan {
    /// Sum of input amounts in `currency`, `None` on overflow.
    pub fn input_total(&self, currency: &Address) -> Option<Amount> {
        Amount::checked_sum(
            self.inputs
                .iter()
                .filter(|u| u.currency == *currency)
                .map(|u| &u.amount),
        )
    }

    /// Sum of output amounts in `currency`, `None` on overflow.
    pub fn output_total(&self, currency: &Address) -> Option<Amount> {
        Amount::checked_sum(
            self.outputs
                .iter()
                .filter(|o| o.currency == *currency)
                .map(|o| &o.amount),
        )
    }

    /// What the plan leaves unspent in `currency`, i.e. the fee it pays.
    /// `None` when outputs exceed inputs.
    pub fn implied_fee(&self, currency: &Address) -> Option<Amount> {
        self.input_total(currency)?
            .checked_sub(self.output_total(currency)?)
    }

    /// Every currency touched by the plan, inputs first, without duplicates.
    pub fn currencies(&self) -> Vec<Address> {
        let mut seen = Vec::new();
        let all = self
            .inputs
            .iter()
            .map(|u| u.currency)
            .chain(self.outputs.iter().map(|o| o.currency));
        for currency in all {
            if !seen.contains(&currency) {
                seen.push(currency);
            }
        }
        seen
    }

    /// The UTXOs this plan creates once included at `result`'s position, one
    /// per output in output order.
    pub fn next_utxos(&self, result: &SubmissionResult) -> Vec<Utxo> {
        self.outputs
            .iter()
            .enumerate()
            .map(|(i, output)| Utxo {
                amount: output.amount,
                currency: output.currency,
                owner: output.output_guard,
                blknum: result.blknum,
                txindex: result.txindex,
                oindex: i as u64,
            })
            .collect()
    }
}

/// Returned by the chain after accepting a signed transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionResult {
    pub blknum: u64,
    pub txindex: u64,
    #[serde(default)]
    pub txhash: Option<B256>,
}

/// A plan together with its per-input signatures and submittable encoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedTransaction {
    pub plan: SplitPlan,
    /// One 65-byte signature per input, in input order.
    pub signatures: Vec<Bytes>,
    /// The encoded transaction accepted by the submission endpoint.
    pub encoded: Bytes,
}
