// SPDX-License-Identifier: CC0-1.0
//
//! The random-draw capability used by [`crate::migration`] and
//! [`crate::adjust`] to cover a remaining fee.
//!
//! Modeled as an explicit capability rather than an ambient global: callers
//! pass a `&mut impl RandomSource<K>` alongside the rest of their state, so
//! tests can inject a deterministic seeded source and production code can
//! reach for the thread-local CSPRNG.

#[cfg(any(test, feature = "rand"))]
use rand::Rng;

use crate::map::{CoinMap, CoinMapEntry};

/// Draws entries uniformly at random out of a [`CoinMap`] pool.
pub trait RandomSource<K> {
    /// Removes and returns one entry chosen uniformly at random from
    /// `pool`, or `None` if `pool` is empty.
    fn draw(&mut self, pool: &mut CoinMap<K>) -> Option<CoinMapEntry<K>>;
}

/// Adapts any [`rand::Rng`] into a [`RandomSource`].
#[cfg(any(test, feature = "rand"))]
pub struct RngSource<'a, R: ?Sized>(pub &'a mut R);

#[cfg(any(test, feature = "rand"))]
impl<'a, R: Rng + ?Sized, K> RandomSource<K> for RngSource<'a, R> {
    fn draw(&mut self, pool: &mut CoinMap<K>) -> Option<CoinMapEntry<K>> {
        if pool.is_empty() {
            return None;
        }
        let index = self.0.gen_range(0..pool.len());
        pool.remove(index)
    }
}

/// The thread-local CSPRNG, for production callers that don't need
/// reproducibility. Behind the `rand` feature so a library consumer who
/// only wants the deterministic core doesn't pull in a RNG.
#[cfg(feature = "rand")]
pub fn thread_rng() -> rand::rngs::ThreadRng {
    rand::thread_rng()
}
