use ndarray::Array1;

/// Per-dimension bound. A disabled constraint accepts every value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constraint {
    pub lower: f64,
    pub upper: f64,
    pub enabled: bool,
}

impl Default for Constraint {
    fn default() -> Self {
        Self { lower: 0.0, upper: 1.0, enabled: false }
    }
}

impl Constraint {
    pub fn new(lower: f64, upper: f64, enabled: bool) -> Self {
        Self { lower, upper, enabled }
    }

    /// Enabled constraint lower <= x <= upper
    pub fn bounded(lower: f64, upper: f64) -> Self {
        Self::new(lower, upper, true)
    }

    /// Disabled constraint: the dimension is free
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// true if disabled, else lower <= x <= upper
    pub fn check(&self, x: f64) -> bool {
        !self.enabled || (x >= self.lower && x <= self.upper)
    }

    /// An enabled constraint needs finite bounds, lower <= upper and a
    /// finite width, so that uniform sampling inside it stays finite.
    pub fn is_valid(&self) -> bool {
        !self.enabled
            || (self.lower.is_finite()
                && self.upper.is_finite()
                && (self.upper - self.lower).is_finite()
                && self.lower <= self.upper)
    }

    /// Interval used to draw initial values for this dimension.
    /// Disabled constraints fall back to `proxy`.
    pub fn sampling_range(&self, proxy: (f64, f64)) -> (f64, f64) {
        if self.enabled { (self.lower, self.upper) } else { proxy }
    }
}

/// Check every coordinate of `x` against its constraint
pub(crate) fn check_all(constraints: &[Constraint], x: &Array1<f64>) -> bool {
    x.iter().zip(constraints.iter()).all(|(&xi, c)| c.check(xi))
}
