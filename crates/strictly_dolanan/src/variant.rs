//! Game variants: the combine operator and the value domain it produces.

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Side length of the main board (both variants).
pub const BOARD_SIZE: usize = 10;

/// Number of contiguous cells needed to win.
pub const WIN_LENGTH: usize = 4;

/// Every distinct product of two factors in 1..=9.
pub const VALID_PRODUCTS: [u8; 36] = [
    1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 12, 14, 15, 16, 18, 20, 21, 24, 25, 27, 28, 30, 32, 35, 36, 40,
    42, 45, 48, 49, 54, 56, 63, 64, 72, 81,
];

/// Which arithmetic operator combines the two pion magnitudes.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Variant {
    /// Additive variant: magnitudes 1..=10, board values 2..=18.
    #[default]
    Sum,
    /// Multiplicative variant: magnitudes 1..=9, board values are the 36 products.
    Product,
}

impl Variant {
    /// Number of columns on each selector row.
    pub fn columns(self) -> usize {
        match self {
            Variant::Sum => 10,
            Variant::Product => 9,
        }
    }

    /// Magnitude contributed by a pion standing in `column`.
    pub fn magnitude(column: usize) -> u8 {
        (column + 1) as u8
    }

    /// Applies the variant's operator to two magnitudes.
    pub fn combine(self, a: u8, b: u8) -> u8 {
        match self {
            Variant::Sum => a + b,
            Variant::Product => a * b,
        }
    }

    /// Combined value of two pion columns.
    pub fn combine_columns(self, a: usize, b: usize) -> u8 {
        self.combine(Self::magnitude(a), Self::magnitude(b))
    }

    /// Smallest value a board cell may hold.
    pub fn min_value(self) -> u8 {
        match self {
            Variant::Sum => 2,
            Variant::Product => 1,
        }
    }

    /// Largest value a board cell may hold.
    pub fn max_value(self) -> u8 {
        match self {
            Variant::Sum => 18,
            Variant::Product => 81,
        }
    }

    /// Returns true if `value` can appear on a board of this variant.
    pub fn is_valid_value(self, value: u8) -> bool {
        match self {
            Variant::Sum => (self.min_value()..=self.max_value()).contains(&value),
            Variant::Product => VALID_PRODUCTS.contains(&value),
        }
    }

    /// Returns true if a combination can overshoot the board's value range.
    ///
    /// Only the additive variant can: 10 + 10 is 20 but the board stops at 18.
    pub fn can_overflow(self) -> bool {
        matches!(self, Variant::Sum)
    }

    /// Returns true if pions at these two columns produce a value the board can hold.
    pub fn is_reachable(self, a: usize, b: usize) -> bool {
        !self.can_overflow()
            || u16::from(Self::magnitude(a)) + u16::from(Self::magnitude(b))
                <= u16::from(self.max_value())
    }

    /// Draws a cell value according to the variant's generation rule.
    pub fn random_value<R: Rng + ?Sized>(self, rng: &mut R) -> u8 {
        match self {
            Variant::Sum => rng.random_range(self.min_value()..=self.max_value()),
            Variant::Product => *VALID_PRODUCTS.choose(rng).unwrap_or(&1),
        }
    }

    /// Center-first column preference used for opening placements.
    pub fn preferred_columns(self) -> &'static [usize] {
        match self {
            Variant::Sum => &[4, 5, 3, 6, 2, 7, 1, 8, 0, 9],
            Variant::Product => &[4, 3, 5, 2, 6, 1, 7, 0, 8],
        }
    }

    /// Columns an opening may be randomised over.
    pub fn opening_range(self) -> RangeInclusive<usize> {
        match self {
            Variant::Sum => 2..=7,
            Variant::Product => 1..=6,
        }
    }
}
