// SPDX-License-Identifier: CC0-1.0
//
//! Proportional fee distribution.
//!
//! Splits a total fee across a list of coins in proportion to their
//! values, rounding so the sum of rounded shares equals the total exactly.

use crate::coin::{Coin, Fee};

/// Splits `total` across `coins` in proportion to each coin's value.
///
/// Returns one `(Fee, Coin)` pair per input coin, in the same order the
/// coins were given. The ideal (rational) share for coin `i` is
/// `total * coins[i] / sum(coins)`; each share is floored, and the
/// integer shortfall between `total` and the sum of floors is handed out
/// one unit at a time to the coins with the largest fractional remainder
/// — largest first, ties broken in favor of the earlier original index,
/// so the result is bit-for-bit deterministic.
///
/// The intermediate product `total * coins[i]` is carried in `u128`: with
/// both operands up to `u64::MAX` the product can need up to 128 bits,
/// and computing it as a floating-point ratio would make the rounding
/// non-reproducible across platforms.
///
/// # Panics
///
/// Panics if `coins` is empty, if `total` is zero, or if any coin is
/// zero — all three are caller bugs, not data the function can recover
/// from.
pub fn distribute_fee(total: Fee, coins: &[Coin]) -> Vec<(Fee, Coin)> {
    assert!(!coins.is_empty(), "distribute_fee: coins must be non-empty");
    assert!(total.to_coin() > Coin::ZERO, "distribute_fee: total fee must be positive");
    assert!(
        coins.iter().all(|c| *c > Coin::ZERO),
        "distribute_fee: every coin must be strictly positive"
    );

    let total_value: u128 = coins.iter().map(|c| c.to_u64() as u128).sum();
    let fee = total.to_coin().to_u64() as u128;

    // floor[i] and the numerator of frac[i] = remainder[i] / total_value.
    let mut floors = Vec::with_capacity(coins.len());
    let mut remainders = Vec::with_capacity(coins.len());
    let mut floor_sum: u128 = 0;
    for c in coins {
        let product = fee * (c.to_u64() as u128);
        let floor = product / total_value;
        let remainder = product % total_value;
        floor_sum += floor;
        floors.push(floor);
        remainders.push(remainder);
    }

    // 0 <= shortfall < coins.len() by construction.
    let shortfall = (fee - floor_sum) as usize;

    let mut order: Vec<usize> = (0..coins.len()).collect();
    order.sort_by(|&a, &b| remainders[b].cmp(&remainders[a]).then(a.cmp(&b)));

    let mut round_up = vec![false; coins.len()];
    for &index in order.iter().take(shortfall) {
        round_up[index] = true;
    }

    (0..coins.len())
        .map(|i| {
            let extra = if round_up[i] { 1 } else { 0 };
            let share = Coin::new(floors[i] as u64 + extra);
            (Fee::new(share), coins[i])
        })
        .collect()
}
