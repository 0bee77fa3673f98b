use crate::block::Block;

/// Dissimilarity between two glyph blocks, used by the decode fallback.
///
/// # Example
/// ```
/// use ac_core::block::Block;
/// use ac_core::distance::BlockDistance;
///
/// struct Exact;
/// impl BlockDistance for Exact {
///     fn distance(&self, a: &Block, b: &Block) -> usize {
///         usize::from(a != b)
///     }
/// }
/// assert_eq!(Exact.distance(&Block::from("ab"), &Block::from("ab")), 0);
/// ```
pub trait BlockDistance: Send + Sync {
    /// 0 for identical blocks, larger when they differ more.
    fn distance(&self, a: &Block, b: &Block) -> usize;
}

/// Position-wise mismatch count.
///
/// Blocks of different lengths also pay one per missing cell.
///
/// # Example
/// ```
/// use ac_core::block::Block;
/// use ac_core::distance::{BlockDistance, Hamming};
/// assert_eq!(Hamming.distance(&Block::from("|_|"), &Block::from("|_ ")), 1);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Hamming;

impl BlockDistance for Hamming {
    #[inline]
    fn distance(&self, a: &Block, b: &Block) -> usize {
        let mismatched = a
            .cells()
            .iter()
            .zip(b.cells())
            .filter(|(x, y)| x != y)
            .count();
        mismatched + a.len().abs_diff(b.len())
    }
}
