//! Choosing which UTXOs to split in a round.

use splitter_types::{Address, Amount, FeeInfo, Utxo};

use crate::error::SplitError;

/// Most outputs a single split transaction creates.
pub const DEFAULT_MAX_OUTPUTS: usize = 4;

/// What a round selects for.
#[derive(Clone, Debug)]
pub struct SelectionParams {
    /// Token whose UTXOs are split.
    pub target_token: Address,
    /// Smallest output worth creating. Only UTXOs worth at least twice this
    /// are split.
    pub min_value: Amount,
    /// Fee charged per transaction, and the token it is paid in.
    pub fee: FeeInfo,
    /// Upper bound on outputs per transaction.
    pub max_outputs: usize,
    /// Skip cross-token pairings that would leave the target whole. Off by
    /// default, where fee UTXOs pair with targets strictly by position.
    pub defer_unsplittable: bool,
}

impl SelectionParams {
    pub fn pays_fee_in_target(&self) -> bool {
        self.target_token == self.fee.currency
    }

    fn validate(&self) -> Result<(), SplitError> {
        if self.min_value.is_zero() {
            return Err(SplitError::InvalidArgument("min_value must be positive".into()));
        }
        if self.max_outputs < 2 {
            return Err(SplitError::InvalidArgument(format!(
                "max_outputs must be at least 2, got {}",
                self.max_outputs
            )));
        }
        Ok(())
    }

    /// `min(max_outputs, floor(amount / min_value))`.
    fn num_outputs(&self, amount: Amount) -> usize {
        let units = amount
            .units_of(self.min_value)
            .map(|u| u.saturating_to_u64())
            .unwrap_or(0);
        units.min(self.max_outputs as u64) as usize
    }
}

/// One UTXO selected for splitting this round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchItem {
    pub utxo: Utxo,
    /// The UTXO paying the fee when the split token is not the fee token.
    pub fee_utxo: Option<Utxo>,
    pub num_outputs: usize,
}

/// Select and pair the UTXOs to split in one round, in input order.
///
/// An empty result means there is nothing left to split.
pub fn select_batch(all: &[Utxo], params: &SelectionParams) -> Result<Vec<BatchItem>, SplitError> {
    params.validate()?;

    let threshold = params
        .min_value
        .checked_mul_u64(2)
        .ok_or_else(|| SplitError::InvalidArgument("min_value too large".into()))?;

    let candidates: Vec<&Utxo> = all
        .iter()
        .filter(|u| u.is_currency(&params.target_token) && u.amount >= threshold)
        .collect();

    if candidates.is_empty() {
        return Ok(Vec::new());
    }

    if params.pays_fee_in_target() {
        return Ok(candidates
            .into_iter()
            .map(|utxo| BatchItem {
                utxo: utxo.clone(),
                fee_utxo: None,
                num_outputs: params.num_outputs(utxo.amount),
            })
            .collect());
    }

    let mut fee_pool: Vec<&Utxo> = all
        .iter()
        .filter(|u| u.is_currency(&params.fee.currency) && u.amount >= params.fee.amount)
        .collect();
    // Next payer in input order at the end.
    fee_pool.reverse();

    let mut batch = Vec::new();
    for utxo in candidates {
        let Some(&next) = fee_pool.last() else {
            tracing::debug!(
                position = %utxo.position(),
                "no fee utxo left to pair with, deferring"
            );
            break;
        };
        let num_outputs = params.num_outputs(utxo.amount);
        let mut payer = fee_pool.len() - 1;
        // Fee change takes one slot; a single remaining slot would not split.
        if params.defer_unsplittable && next.amount > params.fee.amount && num_outputs < 3 {
            match fee_pool.iter().rposition(|u| u.amount == params.fee.amount) {
                Some(exact) => payer = exact,
                None => {
                    tracing::debug!(
                        position = %utxo.position(),
                        num_outputs,
                        "pairing would not split the utxo, deferring"
                    );
                    continue;
                }
            }
        }
        batch.push(BatchItem {
            utxo: utxo.clone(),
            fee_utxo: Some(fee_pool.remove(payer).clone()),
            num_outputs,
        });
    }
    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token() -> Address {
        Address::repeat_byte(0x11)
    }

    fn fee_token() -> Address {
        Address::ZERO
    }

    fn utxo(amount: u64, currency: Address, txindex: u64) -> Utxo {
        Utxo {
            amount: Amount::from(amount),
            currency,
            owner: Address::repeat_byte(0xaa),
            blknum: 1000,
            txindex,
            oindex: 0,
        }
    }

    fn params(target: Address) -> SelectionParams {
        SelectionParams {
            target_token: target,
            min_value: Amount::from(50u64),
            fee: FeeInfo::new(fee_token(), Amount::from(10u64)),
            max_outputs: DEFAULT_MAX_OUTPUTS,
            defer_unsplittable: false,
        }
    }

    #[test]
    fn skips_utxos_below_twice_min_value() {
        let all = vec![
            utxo(99, fee_token(), 0),
            utxo(100, fee_token(), 1),
            utxo(5000, token(), 2),
        ];
        let batch = select_batch(&all, &params(fee_token())).unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].utxo.amount, Amount::from(100u64));
        assert_eq!(batch[0].num_outputs, 2);
        assert!(batch[0].fee_utxo.is_none());
    }

    #[test]
    fn caps_outputs_per_transaction() {
        let all = vec![utxo(1000, fee_token(), 0), utxo(160, fee_token(), 1)];
        let batch = select_batch(&all, &params(fee_token())).unwrap();
        assert_eq!(batch[0].num_outputs, 4);
        assert_eq!(batch[1].num_outputs, 3);
    }

    #[test]
    fn empty_when_nothing_qualifies() {
        let all = vec![utxo(60, fee_token(), 0), utxo(10, token(), 1)];
        assert!(select_batch(&all, &params(fee_token())).unwrap().is_empty());
        assert!(select_batch(&[], &params(token())).unwrap().is_empty());
    }

    #[test]
    fn pairs_fee_utxos_by_position() {
        let all = vec![
            utxo(500, token(), 0),
            utxo(20, fee_token(), 1),
            utxo(600, token(), 2),
            utxo(30, fee_token(), 3),
        ];
        let batch = select_batch(&all, &params(token())).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].fee_utxo.as_ref().unwrap().txindex, 1);
        assert_eq!(batch[1].fee_utxo.as_ref().unwrap().txindex, 3);
    }

    #[test]
    fn truncates_to_fee_pool_size() {
        let all = vec![
            utxo(500, token(), 0),
            utxo(600, token(), 1),
            utxo(700, token(), 2),
            utxo(20, fee_token(), 3),
            // Too small to pay the fee.
            utxo(9, fee_token(), 4),
        ];
        let batch = select_batch(&all, &params(token())).unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].utxo.txindex, 0);
    }

    #[test]
    fn pairs_strictly_by_position_by_default() {
        let all = vec![
            // 2 outputs, one of which is fee change.
            utxo(120, token(), 0),
            utxo(500, token(), 1),
            utxo(20, fee_token(), 2),
        ];
        let batch = select_batch(&all, &params(token())).unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].utxo.txindex, 0);
        assert_eq!(batch[0].num_outputs, 2);
        assert_eq!(batch[0].fee_utxo.as_ref().unwrap().txindex, 2);
    }

    #[test]
    fn defers_pairings_that_would_not_split() {
        let all = vec![
            utxo(120, token(), 0),
            utxo(500, token(), 1),
            utxo(20, fee_token(), 2),
        ];
        let mut p = params(token());
        p.defer_unsplittable = true;
        let batch = select_batch(&all, &p).unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].utxo.txindex, 1);
        assert_eq!(batch[0].fee_utxo.as_ref().unwrap().txindex, 2);
    }

    #[test]
    fn deferring_prefers_a_later_exact_fee_utxo() {
        let all = vec![
            utxo(120, token(), 0),
            utxo(500, token(), 1),
            utxo(20, fee_token(), 2),
            utxo(10, fee_token(), 3),
        ];
        let mut p = params(token());
        p.defer_unsplittable = true;
        let batch = select_batch(&all, &p).unwrap();

        let pairs: Vec<(u64, u64)> = batch
            .iter()
            .map(|item| (item.utxo.txindex, item.fee_utxo.as_ref().unwrap().txindex))
            .collect();
        assert_eq!(pairs, vec![(0, 3), (1, 2)]);
    }

    #[test]
    fn exact_fee_utxo_splits_two_ways() {
        let all = vec![utxo(120, token(), 0), utxo(10, fee_token(), 1)];
        let batch = select_batch(&all, &params(token())).unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].num_outputs, 2);
    }

    #[test]
    fn rejects_zero_min_value() {
        let mut p = params(token());
        p.min_value = Amount::ZERO;
        assert!(matches!(
            select_batch(&[], &p),
            Err(SplitError::InvalidArgument(_))
        ));
    }

    #[test]
    fn rejects_single_output_cap() {
        let mut p = params(token());
        p.max_outputs = 1;
        assert!(select_batch(&[], &p).is_err());
    }
}
