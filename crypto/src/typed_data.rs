//! EIP-712 typed data for plasma payment transactions.
//!
//! The root chain verifies signatures over a fixed-shape `Transaction`
//! struct: four input slots and four output slots, unused slots zeroed.

use alloy_primitives::{b256, Address, FixedBytes, B256, U256};
use alloy_sol_types::{Eip712Domain, SolStruct};
use splitter_types::SplitPlan;
use std::borrow::Cow;

use crate::error::CryptoError;

/// Input slots in a payment transaction.
pub const MAX_INPUTS: usize = 4;

/// Output slots in a payment transaction.
pub const MAX_OUTPUTS: usize = 4;

/// Transaction type of a payment transaction.
pub const PAYMENT_TX_TYPE: u64 = 1;

/// Domain salt fixed by the plasma framework contracts.
pub const DOMAIN_SALT: B256 =
    b256!("fad5c7f626d80f9256ef01929f3beb96e058b8b4b0e3fe52d84f054c0e2a7a83");

pub const DOMAIN_NAME: &str = "OMG Network";
pub const DOMAIN_VERSION: &str = "1";

mod eip712 {
    alloy_sol_types::sol! {
        struct Input {
            uint256 blknum;
            uint256 txindex;
            uint256 oindex;
        }

        struct Output {
            uint256 outputType;
            bytes20 outputGuard;
            address currency;
            uint256 amount;
        }

        struct Transaction {
            uint256 txType;
            Input input0;
            Input input1;
            Input input2;
            Input input3;
            Output output0;
            Output output1;
            Output output2;
            Output output3;
            uint256 txData;
            bytes32 metadata;
        }
    }
}

use eip712::{Input, Output, Transaction};

/// The signing domain for a given plasma framework deployment.
pub fn plasma_domain(verifying_contract: Address) -> Eip712Domain {
    Eip712Domain::new(
        Some(Cow::Borrowed(DOMAIN_NAME)),
        Some(Cow::Borrowed(DOMAIN_VERSION)),
        None,
        Some(verifying_contract),
        Some(DOMAIN_SALT),
    )
}

fn empty_input() -> Input {
    Input {
        blknum: U256::ZERO,
        txindex: U256::ZERO,
        oindex: U256::ZERO,
    }
}

fn empty_output() -> Output {
    Output {
        outputType: U256::ZERO,
        outputGuard: FixedBytes::ZERO,
        currency: Address::ZERO,
        amount: U256::ZERO,
    }
}

/// Check that a plan fits into the fixed transaction shape.
pub(crate) fn check_shape(plan: &SplitPlan) -> Result<(), CryptoError> {
    if plan.inputs.len() > MAX_INPUTS {
        return Err(CryptoError::TooMany {
            kind: "inputs",
            count: plan.inputs.len(),
            max: MAX_INPUTS,
        });
    }
    if plan.outputs.len() > MAX_OUTPUTS {
        return Err(CryptoError::TooMany {
            kind: "outputs",
            count: plan.outputs.len(),
            max: MAX_OUTPUTS,
        });
    }
    if let Some(input) = plan.inputs.iter().find(|u| !u.position().is_encodable()) {
        return Err(CryptoError::UnencodablePosition(input.position().to_string()));
    }
    Ok(())
}

fn typed_transaction(plan: &SplitPlan) -> Result<Transaction, CryptoError> {
    check_shape(plan)?;

    let mut inputs = plan.inputs.iter().map(|utxo| Input {
        blknum: U256::from(utxo.blknum),
        txindex: U256::from(utxo.txindex),
        oindex: U256::from(utxo.oindex),
    });
    let mut outputs = plan.outputs.iter().map(|output| Output {
        outputType: U256::from(output.output_type.as_u64()),
        outputGuard: output.output_guard.0,
        currency: output.currency,
        amount: output.amount.raw(),
    });

    // Unused slots are zeroed.
    let mut next_input = || inputs.next().unwrap_or_else(empty_input);
    let input0 = next_input();
    let input1 = next_input();
    let input2 = next_input();
    let input3 = next_input();
    let mut next_output = || outputs.next().unwrap_or_else(empty_output);
    let output0 = next_output();
    let output1 = next_output();
    let output2 = next_output();
    let output3 = next_output();

    Ok(Transaction {
        txType: U256::from(PAYMENT_TX_TYPE),
        input0,
        input1,
        input2,
        input3,
        output0,
        output1,
        output2,
        output3,
        txData: U256::ZERO,
        metadata: B256::ZERO,
    })
}

/// The EIP-712 digest every input owner signs.
pub fn signing_hash(plan: &SplitPlan, domain: &Eip712Domain) -> Result<B256, CryptoError> {
    Ok(typed_transaction(plan)?.eip712_signing_hash(domain))
}
