//! Near-equal division of an amount.

use splitter_types::Amount;

use crate::error::SplitError;

/// Divide `amount` into `parts` pieces that sum exactly to `amount`.
///
/// The first `parts - 1` pieces are `floor(amount / parts)`; the last piece
/// absorbs the remainder and may be larger than the others.
pub fn partition(amount: Amount, parts: usize) -> Result<Vec<Amount>, SplitError> {
    if parts == 0 {
        return Err(SplitError::InvalidArgument(
            "cannot partition into zero parts".into(),
        ));
    }
    if parts == 1 {
        return Ok(vec![amount]);
    }

    let parts_u64 = parts as u64;
    let base = amount
        .checked_div_u64(parts_u64)
        .ok_or_else(|| SplitError::InvalidArgument("cannot partition into zero parts".into()))?;
    // base * (parts - 1) <= amount, so neither step can fail.
    let last = base
        .checked_mul_u64(parts_u64 - 1)
        .and_then(|rest| amount.checked_sub(rest))
        .ok_or_else(|| SplitError::InvalidArgument(format!("cannot partition {amount}")))?;

    let mut pieces = vec![base; parts - 1];
    pieces.push(last);
    Ok(pieces)
}
