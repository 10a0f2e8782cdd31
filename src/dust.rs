// SPDX-License-Identifier: CC0-1.0
//
//! Even splitting and dust coalescing.

use crate::coin::{Coin, DustThreshold};

/// Distributes `v` evenly across `xs`, returning a same-length vector whose
/// total has grown by exactly `v`.
///
/// For `n = xs.len() > 0`, let `q = v / n` and `r = v % n`. Every element
/// gets `+ q`, and the *last* `r` elements additionally get `+ 1`, so the
/// total grows by exactly `q * n + r = v` and no two increments differ by
/// more than one.
///
/// `n == 0` is the degenerate case: there is nothing to split across, so
/// `v` itself becomes the sole output coin (dropped entirely if `v` is
/// also zero).
///
/// # Panics
///
/// Panics on `u64` overflow — the caller is responsible for `v` and `xs`
/// being representable together, which holds everywhere this is called
/// from inside the crate.
pub fn split_coin(v: Coin, xs: &[Coin]) -> Vec<Coin> {
    let n = xs.len();
    if n == 0 {
        return if v > Coin::ZERO { vec![v] } else { Vec::new() };
    }

    let q = v.to_u64() / n as u64;
    let r = (v.to_u64() % n as u64) as usize;

    xs.iter()
        .enumerate()
        .map(|(i, &x)| {
            let extra = if i >= n - r { 1 } else { 0 };
            x.checked_add(Coin::new(q + extra)).expect("split_coin: overflow")
        })
        .collect()
}

/// Removes every coin `<= threshold` from `xs` and redistributes their
/// combined value over the survivors via [`split_coin`].
///
/// If every coin in `xs` is dust, there are no survivors to fold the
/// value into, so the whole sum becomes the sole output coin — the same
/// `split_coin(v, [])` degenerate case it would hit with an empty
/// `keep`.
///
/// # Panics
///
/// Panics if `xs` is empty — coalescing an empty sequence is a caller
/// bug, not a degenerate-but-legal input.
pub fn coalesce_dust(threshold: DustThreshold, xs: &[Coin]) -> Vec<Coin> {
    assert!(!xs.is_empty(), "coalesce_dust: xs must be non-empty");

    let (keep, drop): (Vec<Coin>, Vec<Coin>) = xs.iter().copied().partition(|c| !threshold.is_dust(*c));

    let dust_total = drop.into_iter().fold(Coin::ZERO, |acc, c| {
        acc.checked_add(c).expect("coalesce_dust: dust sum overflow")
    });

    split_coin(dust_total, &keep)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coins(values: &[u64]) -> Vec<Coin> {
        values.iter().map(|v| Coin::new(*v)).collect()
    }

    #[test]
    fn split_coin_distributes_remainder_to_last_elements() {
        let result = split_coin(Coin::new(10), &coins(&[1, 1, 1, 1]));
        assert_eq!(result, coins(&[3, 3, 4, 4]));
    }

    #[test]
    fn split_coin_exact_division() {
        let result = split_coin(Coin::new(40), &coins(&[1, 2, 3, 4]));
        assert_eq!(result, coins(&[11, 12, 13, 14]));
    }

    #[test]
    fn split_coin_empty_input_returns_singleton() {
        assert_eq!(split_coin(Coin::new(10), &[]), coins(&[10]));
    }

    #[test]
    fn split_coin_empty_input_and_zero_value_returns_empty() {
        assert_eq!(split_coin(Coin::ZERO, &[]), Vec::<Coin>::new());
    }

    #[test]
    fn split_coin_preserves_total() {
        let xs = coins(&[5, 9, 2]);
        let result = split_coin(Coin::new(13), &xs);
        let before: u64 = xs.iter().map(|c| c.to_u64()).sum();
        let after: u64 = result.iter().map(|c| c.to_u64()).sum();
        assert_eq!(after, before + 13);
    }

    #[test]
    fn coalesce_dust_redistributes_into_survivors() {
        let result = coalesce_dust(DustThreshold::new(Coin::new(1)), &coins(&[1, 1, 5, 10]));
        assert_eq!(result, coins(&[6, 11]));
    }

    #[test]
    fn coalesce_dust_no_dust_is_identity() {
        let result = coalesce_dust(DustThreshold::new(Coin::new(0)), &coins(&[2, 3]));
        assert_eq!(result, coins(&[2, 3]));
    }

    #[test]
    fn coalesce_dust_all_dust_coalesces_into_one_survivor() {
        // Every coin is <= the threshold: there is no survivor to fold the
        // dust into, so the whole sum becomes a single new coin rather
        // than being dropped (see DESIGN.md).
        let result = coalesce_dust(DustThreshold::new(Coin::new(1)), &coins(&[1, 1, 1, 1]));
        assert_eq!(result, coins(&[4]));
    }

    #[test]
    fn coalesce_dust_preserves_sum() {
        let xs = coins(&[1, 1, 5, 10]);
        let before: u64 = xs.iter().map(|c| c.to_u64()).sum();
        let result = coalesce_dust(DustThreshold::new(Coin::new(1)), &xs);
        let after: u64 = result.iter().map(|c| c.to_u64()).sum();
        assert_eq!(after, before);
    }

    #[test]
    #[should_panic(expected = "non-empty")]
    fn coalesce_dust_panics_on_empty_input() {
        coalesce_dust(DustThreshold::new(Coin::new(1)), &[]);
    }

    #[test]
    fn split_coin_invariants_hold_for_arbitrary_input() {
        arbtest::arbtest(|u| {
            let n = u.int_in_range(0..=8)?;
            let mut xs = Vec::with_capacity(n);
            for _ in 0..n {
                xs.push(Coin::new(u.int_in_range(0..=1_000_000u64)?));
            }
            let v = Coin::new(u.int_in_range(0..=1_000_000u64)?);

            let before: u64 = xs.iter().map(|c| c.to_u64()).sum();
            let result = split_coin(v, &xs);
            let after: u64 = result.iter().map(|c| c.to_u64()).sum();

            if n > 0 {
                assert_eq!(result.len(), xs.len());
                assert_eq!(after, before + v.to_u64());
            }

            Ok(())
        });
    }

    #[test]
    fn coalesce_dust_invariants_hold_for_arbitrary_input() {
        arbtest::arbtest(|u| {
            let n = u.int_in_range(1..=8)?;
            let mut xs = Vec::with_capacity(n);
            for _ in 0..n {
                xs.push(Coin::new(u.int_in_range(0..=1_000_000u64)?));
            }
            let threshold = DustThreshold::new(Coin::new(u.int_in_range(0..=1_000_000u64)?));

            let before: u64 = xs.iter().map(|c| c.to_u64()).sum();
            let result = coalesce_dust(threshold, &xs);
            let after: u64 = result.iter().map(|c| c.to_u64()).sum();

            assert_eq!(after, before);
            for c in &result {
                assert!(!threshold.is_dust(*c));
            }

            Ok(())
        });
    }
}
