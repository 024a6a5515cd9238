use ndarray::Array2;
use rand::Rng;

use crate::Constraint;

/// Uniform random population, one row per slot.
/// Enabled dimensions are drawn in [lower, upper], disabled ones in `unbounded_range`.
pub(crate) fn init_random<R: Rng + ?Sized>(
    n: usize,
    npop: usize,
    constraints: &[Constraint],
    unbounded_range: (f64, f64),
    rng: &mut R,
) -> Array2<f64> {
    let mut pop = Array2::<f64>::zeros((npop, n));
    for i in 0..npop {
        for j in 0..n {
            let (lo, hi) = constraints[j].sampling_range(unbounded_range);
            let u: f64 = rng.random::<f64>();
            pop[(i, j)] = lo + u * (hi - lo);
        }
    }
    pop
}
