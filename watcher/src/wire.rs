//! JSON shapes exchanged with the watcher.
//!
//! Every response is wrapped as `{"success": bool, "data": ...}`. Amounts
//! are JSON numbers that routinely exceed `u64`, so they are read as
//! [`serde_json::Number`] and parsed into [`Amount`] afterwards.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use splitter_types::{Address, Amount, FeeInfo, Utxo};

use crate::error::WatcherError;

/// Response envelope shared by every endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope {
    pub success: bool,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub data_paging: Option<Paging>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Paging {
    pub limit: usize,
}

impl Envelope {
    /// The payload of a successful response, decoded as `T`.
    pub fn into_data<T: serde::de::DeserializeOwned>(self) -> Result<T, WatcherError> {
        if !self.success {
            let code = self
                .data
                .get("code")
                .and_then(Value::as_str)
                .map(str::to_string);
            let payload = match self.data {
                Value::String(text) => text,
                other => other.to_string(),
            };
            return Err(WatcherError::Rejected { code, payload });
        }
        serde_json::from_value(self.data).map_err(|e| WatcherError::InvalidResponse(e.to_string()))
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct UtxoQuery<'a> {
    pub address: &'a Address,
    pub limit: usize,
    pub page: usize,
}

#[derive(Debug, Serialize)]
pub(crate) struct SubmitRequest {
    pub transaction: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireUtxo {
    amount: Number,
    currency: Address,
    owner: Address,
    blknum: u64,
    txindex: u64,
    oindex: u64,
}

impl TryFrom<WireUtxo> for Utxo {
    type Error = WatcherError;

    fn try_from(wire: WireUtxo) -> Result<Self, Self::Error> {
        Ok(Utxo {
            amount: parse_amount(&wire.amount)?,
            currency: wire.currency,
            owner: wire.owner,
            blknum: wire.blknum,
            txindex: wire.txindex,
            oindex: wire.oindex,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireFee {
    currency: Address,
    amount: Number,
}

impl TryFrom<WireFee> for FeeInfo {
    type Error = WatcherError;

    fn try_from(wire: WireFee) -> Result<Self, Self::Error> {
        Ok(FeeInfo::new(wire.currency, parse_amount(&wire.amount)?))
    }
}

fn parse_amount(number: &Number) -> Result<Amount, WatcherError> {
    number
        .to_string()
        .parse()
        .map_err(|e| WatcherError::InvalidResponse(format!("bad amount: {e}")))
}
