//! Fee resolution.
//!
//! The fee is looked up once per run and treated as a snapshot: later
//! changes to the schedule do not affect a run in progress.

use splitter_types::{Address, FeeInfo};
use tokio::sync::OnceCell;

use crate::chain::{FeeSchedule, FEE_TIER};
use crate::error::SplitError;

/// Resolves the fee for one fee token and memoizes it.
pub struct FeeOracle<F> {
    schedule: F,
    resolved: OnceCell<FeeInfo>,
}

impl<F: FeeSchedule> FeeOracle<F> {
    pub fn new(schedule: F) -> Self {
        Self {
            schedule,
            resolved: OnceCell::new(),
        }
    }

    /// The fee for `currency`, fetched on first use.
    ///
    /// Fails with [`SplitError::UnsupportedFeeToken`] if the schedule has no
    /// entry for `currency`, and with [`SplitError::InvalidArgument`] if a
    /// different currency was already resolved.
    pub async fn resolve(&self, currency: &Address) -> Result<FeeInfo, SplitError> {
        let fee = self
            .resolved
            .get_or_try_init(|| self.lookup(currency))
            .await?;
        if fee.currency != *currency {
            return Err(SplitError::InvalidArgument(format!(
                "fee already resolved for {}, cannot switch to {currency}",
                fee.currency
            )));
        }
        Ok(fee.clone())
    }

    async fn lookup(&self, currency: &Address) -> Result<FeeInfo, SplitError> {
        let schedule = self.schedule.fetch_fee_schedule().await?;
        let entries = schedule.get(FEE_TIER).ok_or_else(|| {
            SplitError::IndexingService(format!("fee schedule has no tier {FEE_TIER}"))
        })?;
        let fee = entries
            .iter()
            .find(|entry| entry.currency == *currency)
            .cloned()
            .ok_or_else(|| SplitError::UnsupportedFeeToken(currency.to_string()))?;
        tracing::info!(currency = %fee.currency, amount = %fee.amount, "resolved fee");
        Ok(fee)
    }
}
