use crate::error::{RouletteError, RouletteResult};
use crate::geometry::normalize;
use std::f64::consts::TAU;
use std::num::NonZeroUsize;

/// Maps an absolute wheel rotation to the index of the wedge under the
/// pointer.
///
/// Mirrors the layout in [`crate::geometry`]: with `x` the rotation's
/// fraction of a turn, the pointer lands in wedge `floor(n - x * n) mod n`.
/// Any change to how wedges are laid out or where the pointer sits has to be
/// made here as well.
///
/// # Errors
///
/// [`RouletteError::InvalidItemCount`] when `item_count` is zero.
pub fn resolve(rotation: f64, item_count: usize) -> RouletteResult<usize> {
    NonZeroUsize::new(item_count)
        .map(|n| resolve_nonzero(rotation, n))
        .ok_or(RouletteError::InvalidItemCount(item_count))
}

pub(crate) fn resolve_nonzero(rotation: f64, item_count: NonZeroUsize) -> usize {
    let count = item_count.get();
    let n = count as f64;
    let turn_fraction = normalize(rotation) / TAU;
    let index = (n - turn_fraction * n).floor() as usize;
    index % count
}
