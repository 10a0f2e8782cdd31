// SPDX-License-Identifier: CC0-1.0

//! # coin-selection-fee
//!
//! A fee-balancing core for UTxO-based coin selection: the arithmetic and
//! iterative machinery a wallet uses to figure out, once it already knows
//! *which* coins it's spending, how much of them must go to the fee and
//! how the rest should come back as change.
//!
//! This crate does not choose which UTxOs to spend (that's coin
//! selection proper, e.g. branch-and-bound or single-random-draw over a
//! pool); it takes a draft [`CoinSelection`] and a [`adjust::FeeEstimator`]
//! and settles the two against each other:
//!
//! - [`distribute_fee`] splits a fee proportionally across a set of coins.
//! - [`split_coin`] and [`coalesce_dust`] keep change lists free of
//!   uneconomical (dust) outputs.
//! - [`reduce_change_outputs`] applies both to shrink change by a fee.
//! - [`adjust::adjust_for_fee`] is the driver: it estimates, reduces,
//!   measures the residual, and draws more inputs at random from a pool
//!   when the selection's own change can't absorb the fee.
//! - [`migration::deplete_utxo`] sweeps an entire UTxO pool into
//!   output-free, self-paying selections, for wallet consolidation.
//!
//! All arithmetic is checked: nothing here silently wraps. The only
//! non-determinism is the explicit [`random::RandomSource`] capability,
//! never an ambient global, so a fixed seed always reproduces the same
//! output.

pub mod adjust;
pub mod change;
pub mod coin;
pub mod distribute;
pub mod dust;
pub mod map;
pub mod migration;
pub mod random;
pub mod selection;

pub use adjust::{adjust_for_fee, FeeError, FeeEstimator, FeeOptions};
pub use change::reduce_change_outputs;
pub use coin::{CheckedSum, Coin, DustThreshold, Fee};
pub use distribute::distribute_fee;
pub use dust::{coalesce_dust, split_coin};
pub use map::{CoinMap, CoinMapEntry};
pub use migration::{deplete_utxo, ideal_batch_size, CoinSelectionOptions};
pub use random::RandomSource;
#[cfg(any(test, feature = "rand"))]
pub use random::RngSource;
pub use selection::{calculate_fee, CoinSelection};
