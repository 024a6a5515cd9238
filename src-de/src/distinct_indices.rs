use rand::Rng;
use rand::seq::SliceRandom;

/// `count` pairwise distinct indices from `0..pool_size`, none equal to `exclude`.
/// Every such selection is equally likely.
pub(crate) fn distinct_indices<R: Rng + ?Sized>(
    exclude: usize,
    count: usize,
    pool_size: usize,
    rng: &mut R,
) -> Vec<usize> {
    debug_assert!(count <= pool_size.saturating_sub(1));
    let mut idxs: Vec<usize> = (0..pool_size).filter(|&idx| idx != exclude).collect();
    idxs.shuffle(rng);
    idxs.truncate(count);
    idxs
}
