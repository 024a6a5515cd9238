use ndarray::{Array1, Array2};
use rand::Rng;

use crate::distinct_indices::distinct_indices;

/// rand/1 mutant for slot `i`: pop[a] + f * (pop[b] - pop[c]) with a, b, c, i pairwise distinct
pub(crate) fn mutant_rand1<R: Rng + ?Sized>(
    i: usize,
    pop: &Array2<f64>,
    f: f64,
    rng: &mut R,
) -> Array1<f64> {
    let idxs = distinct_indices(i, 3, pop.nrows(), rng);
    let (r0, r1, r2) = (idxs[0], idxs[1], idxs[2]);
    let diff = &pop.row(r1) - &pop.row(r2);
    &pop.row(r0) + &(diff * f)
}
