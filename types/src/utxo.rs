//! Unspent transaction outputs and their chain positions.

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::amount::Amount;
use crate::error::TypesError;

/// Multiplier applied to the block number in an encoded position.
pub const BLOCK_OFFSET: u64 = 1_000_000_000;

/// Multiplier applied to the transaction index in an encoded position.
pub const TX_OFFSET: u64 = 10_000;

/// Where an output lives on the child chain.
///
/// Ordering is chain order: block, then transaction, then output index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UtxoPosition {
    pub blknum: u64,
    pub txindex: u64,
    pub oindex: u64,
}

impl UtxoPosition {
    pub fn new(blknum: u64, txindex: u64, oindex: u64) -> Self {
        Self {
            blknum,
            txindex,
            oindex,
        }
    }

    /// Encode as the single integer used by the root chain contracts:
    /// `blknum * 10^9 + txindex * 10^4 + oindex`.
    pub fn encode(&self) -> U256 {
        U256::from(self.blknum) * U256::from(BLOCK_OFFSET)
            + U256::from(self.txindex) * U256::from(TX_OFFSET)
            + U256::from(self.oindex)
    }

    /// Decode a position produced by [`UtxoPosition::encode`].
    pub fn decode(encoded: U256) -> Result<Self, TypesError> {
        let block_offset = U256::from(BLOCK_OFFSET);
        let tx_offset = U256::from(TX_OFFSET);
        let blknum = u64::try_from(encoded / block_offset)
            .map_err(|_| TypesError::InvalidPosition(format!("block number overflow in {encoded}")))?;
        let rest = encoded % block_offset;
        let txindex = u64::try_from(rest / tx_offset)
            .map_err(|_| TypesError::InvalidPosition(format!("tx index overflow in {encoded}")))?;
        let oindex = u64::try_from(rest % tx_offset)
            .map_err(|_| TypesError::InvalidPosition(format!("output index overflow in {encoded}")))?;
        Ok(Self::new(blknum, txindex, oindex))
    }

    /// Whether each component fits in its slot of the encoded form.
    pub fn is_encodable(&self) -> bool {
        self.oindex < TX_OFFSET && self.txindex < BLOCK_OFFSET / TX_OFFSET
    }
}

impl fmt::Display for UtxoPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.blknum, self.txindex, self.oindex)
    }
}

/// An unspent output of some token owned by some address.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Utxo {
    pub amount: Amount,
    pub currency: Address,
    pub owner: Address,
    pub blknum: u64,
    pub txindex: u64,
    pub oindex: u64,
}

impl Utxo {
    /// The identity of this output on chain.
    pub fn position(&self) -> UtxoPosition {
        UtxoPosition::new(self.blknum, self.txindex, self.oindex)
    }

    pub fn is_currency(&self, currency: &Address) -> bool {
        self.currency == *currency
    }
}
