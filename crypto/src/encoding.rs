//! RLP encoding of signed payment transactions.
//!
//! Wire layout:
//! `[signatures, txType, inputs, outputs, txData, metadata]` where each input
//! is its encoded position as 32 bytes and each output is
//! `[outputType, [outputGuard, currency, amount]]`. Empty slots are omitted.

use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_rlp::{Decodable, RlpDecodable, RlpEncodable};
use splitter_types::SplitPlan;

use crate::error::CryptoError;
use crate::typed_data::{check_shape, PAYMENT_TX_TYPE};

#[derive(Clone, Debug, PartialEq, Eq, RlpEncodable, RlpDecodable)]
pub struct OutputData {
    pub output_guard: Address,
    pub currency: Address,
    pub amount: U256,
}

#[derive(Clone, Debug, PartialEq, Eq, RlpEncodable, RlpDecodable)]
pub struct EncodedOutput {
    pub output_type: u64,
    pub data: OutputData,
}

/// A signed transaction as it travels to the submission endpoint.
#[derive(Clone, Debug, PartialEq, Eq, RlpEncodable, RlpDecodable)]
pub struct TransactionEnvelope {
    pub signatures: Vec<Bytes>,
    pub tx_type: u64,
    pub inputs: Vec<B256>,
    pub outputs: Vec<EncodedOutput>,
    pub tx_data: u64,
    pub metadata: B256,
}

impl TransactionEnvelope {
    fn from_plan(plan: &SplitPlan, signatures: Vec<Bytes>) -> Self {
        Self {
            signatures,
            tx_type: PAYMENT_TX_TYPE,
            inputs: plan
                .inputs
                .iter()
                .map(|utxo| B256::from(utxo.position().encode()))
                .collect(),
            outputs: plan
                .outputs
                .iter()
                .map(|output| EncodedOutput {
                    output_type: output.output_type.as_u64(),
                    data: OutputData {
                        output_guard: output.output_guard,
                        currency: output.currency,
                        amount: output.amount.raw(),
                    },
                })
                .collect(),
            tx_data: 0,
            metadata: B256::ZERO,
        }
    }
}

/// Encode a plan and its signatures for submission.
pub fn encode_signed_transaction(
    plan: &SplitPlan,
    signatures: &[Bytes],
) -> Result<Bytes, CryptoError> {
    check_shape(plan)?;
    if signatures.len() != plan.inputs.len() {
        return Err(CryptoError::KeyCountMismatch {
            expected: plan.inputs.len(),
            got: signatures.len(),
        });
    }
    let envelope = TransactionEnvelope::from_plan(plan, signatures.to_vec());
    Ok(Bytes::from(alloy_rlp::encode(&envelope)))
}

/// Decode bytes produced by [`encode_signed_transaction`].
pub fn decode_signed_transaction(mut bytes: &[u8]) -> Result<TransactionEnvelope, CryptoError> {
    let envelope = TransactionEnvelope::decode(&mut bytes)
        .map_err(|e| CryptoError::Encoding(e.to_string()))?;
    if !bytes.is_empty() {
        return Err(CryptoError::Encoding(format!(
            "{} trailing bytes",
            bytes.len()
        )));
    }
    Ok(envelope)
}
