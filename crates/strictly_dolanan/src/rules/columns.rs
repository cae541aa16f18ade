//! Selector-track column legality.

use super::super::{PlayerId, Variant};

/// Columns `row`'s pion may not move to.
///
/// Always includes the pion's current column. In variants that can
/// overflow, also every column whose combined value with the other row's
/// pion would exceed the board's maximum.
pub fn disabled_columns(variant: Variant, pions: [Option<usize>; 2], row: PlayerId) -> Vec<usize> {
    let own = pions[row.index()];
    let other = pions[row.opponent().index()];
    (0..variant.columns())
        .filter(|&column| {
            Some(column) == own || other.is_some_and(|o| !variant.is_reachable(column, o))
        })
        .collect()
}

/// Columns the second pion may not take during the placement phase.
pub fn disabled_columns_for_placement(variant: Variant, first_column: Option<usize>) -> Vec<usize> {
    match first_column {
        Some(first) => (0..variant.columns())
            .filter(|&column| !variant.is_reachable(column, first))
            .collect(),
        None => Vec::new(),
    }
}

/// Columns `row`'s pion may legally move to.
pub fn legal_columns(variant: Variant, pions: [Option<usize>; 2], row: PlayerId) -> Vec<usize> {
    let disabled = disabled_columns(variant, pions, row);
    (0..variant.columns())
        .filter(|column| !disabled.contains(column))
        .collect()
}
