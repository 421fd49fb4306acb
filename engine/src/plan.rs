//! Building split transactions.
//!
//! Two shapes, depending on whether the token being split is also the fee
//! token:
//! - **fee token**: one input; the fee is deducted before splitting.
//! - **other token**: the primary input plus a fee-paying input; fee change
//!   (if any) comes first, then the primary amount split in full.

use splitter_types::{Amount, FeeInfo, OutputSpec, SplitPlan, Utxo};

use crate::batch::BatchItem;
use crate::error::SplitError;
use crate::partition::partition;

/// Split a fee-token UTXO, paying the fee out of the UTXO itself.
pub fn build_fee_token_split(
    utxo: &Utxo,
    fee_amount: Amount,
    num_outputs: usize,
) -> Result<SplitPlan, SplitError> {
    let spendable = utxo
        .amount
        .checked_sub(fee_amount)
        .ok_or(SplitError::InsufficientFunds {
            needed: fee_amount,
            available: utxo.amount,
        })?;

    let outputs = partition(spendable, num_outputs)?
        .into_iter()
        .map(|amount| OutputSpec::payment(utxo.owner, utxo.currency, amount))
        .collect();

    Ok(SplitPlan {
        inputs: vec![utxo.clone()],
        outputs,
    })
}

/// Split a non-fee-token UTXO, paying the fee from `fee_utxo`.
///
/// When `fee_utxo` holds more than the fee, the change takes the first of
/// the `num_outputs` slots.
pub fn build_non_fee_token_split(
    utxo: &Utxo,
    fee_amount: Amount,
    fee_utxo: &Utxo,
    num_outputs: usize,
) -> Result<SplitPlan, SplitError> {
    let change = fee_utxo
        .amount
        .checked_sub(fee_amount)
        .ok_or(SplitError::InsufficientFunds {
            needed: fee_amount,
            available: fee_utxo.amount,
        })?;

    let mut outputs = Vec::with_capacity(num_outputs);
    let split_outputs = if change.is_zero() {
        num_outputs
    } else {
        if num_outputs < 2 {
            return Err(SplitError::InvalidArgument(format!(
                "{num_outputs} output(s) leave no room for fee change"
            )));
        }
        outputs.push(OutputSpec::payment(
            fee_utxo.owner,
            fee_utxo.currency,
            change,
        ));
        num_outputs - 1
    };

    outputs.extend(
        partition(utxo.amount, split_outputs)?
            .into_iter()
            .map(|amount| OutputSpec::payment(utxo.owner, utxo.currency, amount)),
    );

    Ok(SplitPlan {
        inputs: vec![utxo.clone(), fee_utxo.clone()],
        outputs,
    })
}

/// Build the plan for one selected batch item.
pub fn build_plan(item: &BatchItem, fee: &FeeInfo) -> Result<SplitPlan, SplitError> {
    match &item.fee_utxo {
        Some(fee_utxo) => {
            build_non_fee_token_split(&item.utxo, fee.amount, fee_utxo, item.num_outputs)
        }
        None => build_fee_token_split(&item.utxo, fee.amount, item.num_outputs),
    }
}
