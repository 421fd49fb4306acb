//! Fee schedule entries.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::amount::Amount;

/// The flat fee charged per transaction when paying in `currency`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeInfo {
    pub currency: Address,
    pub amount: Amount,
}

impl FeeInfo {
    pub fn new(currency: Address, amount: Amount) -> Self {
        Self { currency, amount }
    }
}
