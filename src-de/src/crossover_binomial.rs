use ndarray::{Array1, ArrayView1};
use rand::Rng;

/// Binomial crossover. Returns the trial and the forced dimension, which
/// always comes from the mutant. Every dimension consumes one uniform draw.
pub(crate) fn binomial_crossover<R: Rng + ?Sized>(
    target: ArrayView1<f64>,
    mutant: &Array1<f64>,
    cr: f64,
    rng: &mut R,
) -> (Array1<f64>, usize) {
    let n = target.len();
    let jrand = rng.random_range(0..n);
    let mut trial = target.to_owned();
    for j in 0..n {
        let u: f64 = rng.random::<f64>();
        if u < cr || j == jrand {
            trial[j] = mutant[j];
        }
    }
    (trial, jrand)
}
