// SPDX-License-Identifier: CC0-1.0
//
//! A coin selection: the `(inputs, outputs, change)` triple a transaction
//! draft is built from.

use crate::coin::{CheckedSum, Coin, Fee};
use crate::map::CoinMap;

/// A transaction draft: the UTxO entries consumed, the payment outputs
/// requested, and the change coins returned to the sender.
///
/// Order of `change` is significant — it drives the rounding determinism
/// of [`crate::distribute_fee`] and [`crate::split_coin`] — while the
/// order of `inputs`/`outputs` is not.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoinSelection<I, O> {
    pub inputs: CoinMap<I>,
    pub outputs: CoinMap<O>,
    pub change: Vec<Coin>,
}

impl<I, O> CoinSelection<I, O> {
    pub fn new(inputs: CoinMap<I>, outputs: CoinMap<O>, change: Vec<Coin>) -> Self {
        CoinSelection { inputs, outputs, change }
    }

    pub fn change_value(&self) -> Option<Coin> {
        self.change.iter().copied().checked_sum()
    }

    /// Builds the signed balance `sum(inputs) - sum(outputs) - sum(change)`
    /// as an `i128`, wide enough that no legal `Coin` sum can overflow it.
    pub(crate) fn signed_balance(&self) -> i128 {
        let inputs = self.inputs.total_value().expect("input sum overflow").to_u64() as i128;
        let outputs = self.outputs.total_value().expect("output sum overflow").to_u64() as i128;
        let change = self.change_value().expect("change sum overflow").to_u64() as i128;
        inputs - outputs - change
    }

    /// Same selection with `change` replaced, used to probe hypothetical
    /// fee estimates without touching `inputs`/`outputs`.
    pub(crate) fn with_change(&self, change: Vec<Coin>) -> Self
    where
        I: Clone,
        O: Clone,
    {
        CoinSelection { inputs: self.inputs.clone(), outputs: self.outputs.clone(), change }
    }
}

/// `sum(inputs) - sum(outputs) - sum(change)`, or `None` if that would be
/// negative (the selection does not balance) or would overflow.
pub fn calculate_fee<I, O>(selection: &CoinSelection<I, O>) -> Option<Fee> {
    let inputs = selection.inputs.total_value()?;
    let outputs = selection.outputs.total_value()?;
    let change = selection.change_value()?;

    let balance = inputs.to_u64() as i128 - outputs.to_u64() as i128 - change.to_u64() as i128;
    Coin::from_integral(balance).map(Fee::new)
}
