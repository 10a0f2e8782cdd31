// SPDX-License-Identifier: CC0-1.0
//
//! The migration driver: sweeping a UTxO pool into fee-paying, output-free
//! selections, useful for consolidating a wallet's dust ahead of a future
//! spend.

use crate::coin::{Coin, DustThreshold};
use crate::map::CoinMap;
use crate::adjust::FeeEstimator;
use crate::selection::CoinSelection;

const ITERATION_LIMIT: usize = 100_000;

/// Parameters the migration driver needs beyond [`crate::adjust::FeeOptions`].
///
/// `max_inputs_for_n_outputs` answers "how many inputs can a transaction
/// with `n` outputs still afford", and drives [`ideal_batch_size`].
pub struct CoinSelectionOptions<F> {
    pub max_inputs_for_n_outputs: F,
}

impl<F: Fn(usize) -> usize> CoinSelectionOptions<F> {
    pub fn new(max_inputs_for_n_outputs: F) -> Self {
        CoinSelectionOptions { max_inputs_for_n_outputs }
    }
}

/// The smallest batch size `B` (1..=255) for which a transaction with `B`
/// inputs remains affordable even once change produces a corresponding
/// number of outputs — i.e. the smallest `B` with
/// `max_inputs_for_n_outputs(B) <= B`.
///
/// Falls back to 255 if no such `B` exists in range, since that is the
/// largest batch [`deplete_utxo`] will ever form regardless.
pub fn ideal_batch_size<F: Fn(usize) -> usize>(options: &CoinSelectionOptions<F>) -> u8 {
    for b in 1..=255usize {
        if (options.max_inputs_for_n_outputs)(b) <= b {
            return b as u8;
        }
    }
    255
}

/// Repeatedly batches `utxo` into output-free selections that each pay
/// their own estimated fee out of their own inputs.
///
/// Each batch's change starts as the non-dust input values (or a single
/// placeholder coin at the dust threshold, if every input in the batch is
/// dust — this keeps the provisional selection non-trivial for the
/// rebalancer), then [`rebalance_batch`] nudges it until the implicit fee
/// matches the estimate. If a batch's change collapses to nothing before
/// that happens, the batch — and the whole sweep — is abandoned: the
/// already-accepted selections are still returned, but `utxo` is not
/// drained further.
///
/// # Panics
///
/// Panics if `batch_size` is zero.
pub fn deplete_utxo<I, E>(
    options: &crate::adjust::FeeOptions<E>,
    batch_size: u8,
    mut utxo: CoinMap<I>,
) -> Vec<CoinSelection<I, ()>>
where
    I: PartialEq,
    E: FeeEstimator<I, ()>,
{
    assert!(batch_size >= 1, "deplete_utxo: batch_size must be at least 1");

    let mut selections = Vec::new();
    loop {
        let batch = take_batch(&mut utxo, batch_size);
        if batch.is_empty() {
            break;
        }

        let dust = options.dust_threshold;
        let positive: Vec<Coin> = batch.values().filter(|c| !dust.is_dust(*c)).collect();
        let change = if positive.is_empty() { vec![dust.to_coin()] } else { positive };

        match rebalance_batch(batch, change, dust, &options.fee_estimator) {
            Some(selection) => selections.push(selection),
            None => break,
        }
    }
    selections
}

/// Removes up to `batch_size` entries from the front of `utxo`.
fn take_batch<I: PartialEq>(utxo: &mut CoinMap<I>, batch_size: u8) -> CoinMap<I> {
    let mut batch = CoinMap::new();
    for _ in 0..batch_size {
        match utxo.pop_front() {
            Some(entry) => {
                batch.insert(entry.key, entry.coin);
            }
            None => break,
        }
    }
    batch
}

/// Nudges `change`'s first element until the selection's implicit fee
/// (`sum(inputs) - sum(change)`, since outputs are always empty here)
/// matches `estimator`'s estimate for the selection as it currently
/// stands. Each correction can shift the estimate again (an estimator may
/// charge per change output), so the process repeats until it settles.
///
/// Returns `None` if change collapses to nothing before the two agree.
fn rebalance_batch<I, E>(
    inputs: CoinMap<I>,
    change: Vec<Coin>,
    dust_threshold: DustThreshold,
    estimator: &E,
) -> Option<CoinSelection<I, ()>>
where
    I: PartialEq,
    E: FeeEstimator<I, ()>,
{
    let mut selection = CoinSelection::new(inputs, CoinMap::new(), change);
    let threshold = dust_threshold.to_coin().to_u64() as i128;

    for _ in 0..ITERATION_LIMIT {
        if selection.change.is_empty() {
            return None;
        }

        let inputs_total = selection.inputs.total_value().expect("rebalance_batch: inputs sum overflow");
        let change_total = selection.change_value().expect("rebalance_batch: change sum overflow");
        let actual = inputs_total.to_u64() as i128 - change_total.to_u64() as i128;
        let fee_estimate = estimator.estimate(&selection).to_coin().to_u64() as i128;
        let diff = actual - fee_estimate;

        if diff == 0 {
            return Some(selection);
        }

        let first = selection.change[0].to_u64() as i128 + diff;
        if first <= threshold {
            selection.change.remove(0);
        } else {
            selection.change[0] = Coin::new(first as u64);
        }
    }

    panic!("rebalance_batch: exceeded iteration limit, estimator may not converge");
}
