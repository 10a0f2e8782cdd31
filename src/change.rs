// SPDX-License-Identifier: CC0-1.0
//
//! Reducing a change list by a fee.

use crate::coin::{CheckedSum, Coin, DustThreshold, Fee};
use crate::distribute::distribute_fee;
use crate::dust::coalesce_dust;

/// Produces a new change list that has collectively absorbed `fee`.
///
/// If `fee >= sum(change)`, the change is fully consumed: the result is
/// empty and the caller observes the excess as an implicit additional
/// fee (see the module-level note on this in `adjust`). This holds even
/// when `fee == sum(change)` exactly — the balance equation still closes,
/// it simply does so with no change output at all.
///
/// Otherwise, the fee is distributed proportionally (via
/// [`distribute_fee`]) across the positive-valued coins of `change`
/// (zero-valued coins carry no weight and are dropped outright), each
/// coin is reduced by its assigned share, and the result is passed
/// through [`coalesce_dust`] at threshold `t` so no surviving coin is
/// uneconomical to spend.
///
/// # Panics
///
/// Panics if summing `change` overflows — the caller is responsible for
/// the input being representable.
pub fn reduce_change_outputs(t: DustThreshold, fee: Fee, change: &[Coin]) -> Vec<Coin> {
    let total = change.iter().copied().checked_sum().expect("reduce_change_outputs: change sum overflow");
    if fee.to_coin() >= total {
        return Vec::new();
    }

    let positive: Vec<Coin> = change.iter().copied().filter(|c| *c > Coin::ZERO).collect();
    if positive.is_empty() {
        return Vec::new();
    }

    let reduced: Vec<Coin> = if fee.to_coin() == Coin::ZERO {
        positive
    } else {
        distribute_fee(fee, &positive)
            .into_iter()
            .map(|(share, coin)| coin.checked_sub(share.to_coin()).unwrap_or(Coin::ZERO))
            .collect()
    };

    coalesce_dust(t, &reduced)
}
