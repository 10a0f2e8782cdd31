// SPDX-License-Identifier: CC0-1.0
//
//! Coin arithmetic.
//!
//! A [`Coin`] is a non-negative integer amount of value. Every operation
//! that would leave the non-negative domain is checked: it returns `None`
//! instead of wrapping or panicking, the same discipline `bitcoin::Amount`
//! applies to satoshi counts.

use core::fmt;
use core::iter::Sum;

/// A non-negative integer amount of value.
///
/// `Coin` has no notion of currency or consensus ceiling; it is the unit
/// every higher-level type (`Fee`, `DustThreshold`, `CoinMap`) is built
/// from.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coin(u64);

impl Coin {
    pub const ZERO: Coin = Coin(0);

    pub const fn new(value: u64) -> Self {
        Coin(value)
    }

    pub const fn to_u64(self) -> u64 {
        self.0
    }

    /// Rejects negative inputs; the `coinFromIntegral` conversion.
    pub fn from_integral(value: i128) -> Option<Coin> {
        if value < 0 {
            return None;
        }
        u64::try_from(value).ok().map(Coin)
    }

    pub fn checked_add(self, other: Coin) -> Option<Coin> {
        self.0.checked_add(other.0).map(Coin)
    }

    pub fn checked_sub(self, other: Coin) -> Option<Coin> {
        self.0.checked_sub(other.0).map(Coin)
    }

    /// `distance(a, b) = |a - b|`.
    pub fn distance(self, other: Coin) -> Coin {
        Coin(self.0.abs_diff(other.0))
    }

    /// Division by a positive count; `None` for a zero denominator.
    pub fn checked_div(self, denom: u64) -> Option<Coin> {
        if denom == 0 {
            return None;
        }
        Some(Coin(self.0 / denom))
    }

    /// Remainder by a positive count; `None` for a zero denominator.
    pub fn checked_rem(self, denom: u64) -> Option<Coin> {
        if denom == 0 {
            return None;
        }
        Some(Coin(self.0 % denom))
    }
}

impl fmt::Debug for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coin({})", self.0)
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sums an iterator of [`Coin`], returning `None` on overflow rather than
/// wrapping. Mirrors `bitcoin::amount::CheckedSum`.
pub trait CheckedSum {
    fn checked_sum(self) -> Option<Coin>;
}

impl<I: Iterator<Item = Coin>> CheckedSum for I {
    fn checked_sum(self) -> Option<Coin> {
        self.try_fold(Coin::ZERO, |acc, c| acc.checked_add(c))
    }
}

/// A [`Coin`] used solely in the fee role. A monoid under addition with
/// identity zero.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fee(Coin);

impl Fee {
    pub const ZERO: Fee = Fee(Coin::ZERO);

    pub const fn new(coin: Coin) -> Self {
        Fee(coin)
    }

    pub const fn to_coin(self) -> Coin {
        self.0
    }

    pub fn checked_add(self, other: Fee) -> Option<Fee> {
        self.0.checked_add(other.0).map(Fee)
    }
}

impl fmt::Debug for Fee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fee({})", self.0)
    }
}

impl fmt::Display for Fee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl Sum for Fee {
    fn sum<I: Iterator<Item = Fee>>(iter: I) -> Fee {
        iter.fold(Fee::ZERO, |acc, f| {
            acc.checked_add(f).expect("fee sum overflow")
        })
    }
}

/// Outputs with value `<= threshold` are classified as dust.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DustThreshold(Coin);

impl DustThreshold {
    pub const fn new(coin: Coin) -> Self {
        DustThreshold(coin)
    }

    pub const fn to_coin(self) -> Coin {
        self.0
    }

    pub fn is_dust(self, coin: Coin) -> bool {
        coin <= self.0
    }
}

impl fmt::Debug for DustThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DustThreshold({})", self.0)
    }
}
