use ndarray::Array1;

use crate::Constraint;

/// Capability the optimizer needs from a problem.
///
/// The engine reads `parameter_count` and `constraints` once, when it is
/// built, and then only calls `evaluate_cost` with candidates of exactly
/// `parameter_count` values. Panics raised by `evaluate_cost` are not caught.
pub trait CostFunction {
    /// Cost of `candidate`; lower is better.
    fn evaluate_cost(&self, candidate: &Array1<f64>) -> f64;

    /// Number of decision variables, fixed for the lifetime of the object.
    fn parameter_count(&self) -> usize;

    /// One constraint per dimension.
    fn constraints(&self) -> Vec<Constraint>;
}

impl<T: CostFunction + ?Sized> CostFunction for &T {
    fn evaluate_cost(&self, candidate: &Array1<f64>) -> f64 {
        (**self).evaluate_cost(candidate)
    }
    fn parameter_count(&self) -> usize {
        (**self).parameter_count()
    }
    fn constraints(&self) -> Vec<Constraint> {
        (**self).constraints()
    }
}

/// Cost function backed by a closure plus the constraints it is declared with
pub struct ClosureCost<F>
where
    F: Fn(&Array1<f64>) -> f64,
{
    func: F,
    constraints: Vec<Constraint>,
}

impl<F> ClosureCost<F>
where
    F: Fn(&Array1<f64>) -> f64,
{
    /// The parameter count is the number of constraints.
    pub fn new(func: F, constraints: Vec<Constraint>) -> Self {
        Self { func, constraints }
    }

    /// Every dimension enabled with the given (lower, upper) pair
    pub fn with_bounds(func: F, bounds: &[(f64, f64)]) -> Self {
        let constraints = bounds.iter().map(|&(lo, hi)| Constraint::bounded(lo, hi)).collect();
        Self::new(func, constraints)
    }

    /// `n` dimensions, none of them constrained
    pub fn unbounded(func: F, n: usize) -> Self {
        Self::new(func, vec![Constraint::unbounded(); n])
    }
}

impl<F> CostFunction for ClosureCost<F>
where
    F: Fn(&Array1<f64>) -> f64,
{
    fn evaluate_cost(&self, candidate: &Array1<f64>) -> f64 {
        assert_eq!(
            candidate.len(),
            self.constraints.len(),
            "candidate length does not match the declared parameter count"
        );
        (self.func)(candidate)
    }

    fn parameter_count(&self) -> usize {
        self.constraints.len()
    }

    fn constraints(&self) -> Vec<Constraint> {
        self.constraints.clone()
    }
}
