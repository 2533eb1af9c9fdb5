// binning.rs - Map continuous population/treatment values onto reference bins

use crate::error::{ReduceError, Result};
use crate::fixed::Fixed;

/// A key that the reference table bins on.
pub trait BinKey: Copy + Ord {
    fn magnitude(self) -> f64;
}

impl BinKey for i64 {
    fn magnitude(self) -> f64 {
        self as f64
    }
}

impl BinKey for Fixed {
    fn magnitude(self) -> f64 {
        self.value()
    }
}

/// Resolve `value` to the bin that contains it.
///
/// Bin keys are upper edges: the result is the smallest key that is
/// `>= value`. Anything past the last edge lands in the largest bin.
/// The keys need not be sorted, and the result is always one of them.
pub fn resolve_bin<K, I>(value: f64, bins: I) -> Result<K>
where
    K: BinKey,
    I: IntoIterator<Item = K>,
{
    if value.is_nan() {
        return Err(ReduceError::InvalidBin { value });
    }

    let mut ceiling: Option<K> = None;
    let mut largest: Option<K> = None;
    for bin in bins {
        if largest.map_or(true, |l| bin > l) {
            largest = Some(bin);
        }
        if bin.magnitude() >= value && ceiling.map_or(true, |c| bin < c) {
            ceiling = Some(bin);
        }
    }

    ceiling.or(largest).ok_or(ReduceError::InvalidBin { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_edge_resolves_to_itself() {
        assert_eq!(resolve_bin(20.0, [10_i64, 20, 30]).unwrap(), 20);
    }

    #[test]
    fn unsorted_keys() {
        assert_eq!(resolve_bin(11.0, [30_i64, 10, 20]).unwrap(), 20);
    }
}
