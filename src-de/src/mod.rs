//! Differential Evolution (DE) global optimizer in pure Rust using ndarray
//!
//! A single-threaded, fully reproducible implementation of the classic
//! DE/rand/1/bin scheme:
//!
//! - Problems are described by the [`CostFunction`] trait: a cost, a
//!   parameter count and one [`Constraint`] per dimension
//! - Constraints may be disabled per dimension; such dimensions are
//!   initialized inside a finite proxy range
//! - Trials violating an enabled constraint are rejected and regenerated,
//!   with a bounded number of attempts per slot
//! - Greedy selection, run-wide best tracking
//! - One seeded generator per engine: same seed, same run
//! - Optional post-run callback and termination predicate
//!
//! ```
//! use ndarray::Array1;
//! use rde::{ClosureCost, DEConfigBuilder, DifferentialEvolution, Termination};
//!
//! let cost = ClosureCost::with_bounds(
//!     |x: &Array1<f64>| x.iter().map(|v| v * v).sum(),
//!     &[(-10.0, 10.0), (-10.0, 10.0)],
//! );
//! let config = DEConfigBuilder::new().population_size(10).seed(42).build()?;
//! let mut de = DifferentialEvolution::new(&cost, config)?;
//! let report = de.optimize_step(200, false)?;
//! assert_eq!(report.termination, Termination::BudgetExhausted);
//! assert!(de.get_best_cost() < 1e-4);
//! # Ok::<(), rde::DEError>(())
//! ```

use std::fmt;

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

pub mod constraint;
pub mod cost_function;
pub mod error;

pub mod distinct_indices;
pub mod init_random;

pub mod crossover_binomial;
pub mod mutant_rand1;

pub mod differential_evolution;

#[cfg(test)]
mod tests;

pub use constraint::Constraint;
pub use cost_function::{ClosureCost, CostFunction};
pub use differential_evolution::differential_evolution;
pub use error::{DEError, Result};

/// Seed used when none is configured
pub const DEFAULT_SEED: u64 = 123;

/// Interval used to initialize dimensions whose constraint is disabled
pub const DEFAULT_UNBOUNDED_INIT_RANGE: (f64, f64) = (-1.0e3, 1.0e3);

/// Callback invoked once after the generation budget is spent
pub type Callback = Box<dyn FnMut(&DEView<'_>)>;

/// Predicate invoked once after the callback; `true` means the run met its goal
pub type TerminationPredicate = Box<dyn Fn(&DEView<'_>) -> bool>;

/// Configuration for the Differential Evolution optimizer
pub struct DEConfig {
    /// Number of candidates, >= 4
    pub population_size: usize,
    pub seed: u64,
    /// Differential weight F in [0, 2]
    pub f: f64,
    /// Crossover probability CR in [0, 1]
    pub cr: f64,
    /// Reject trials that violate an enabled constraint
    pub enforce_constraints: bool,
    /// Trials generated per slot before giving up with `DEError::InfeasibleTrial`
    pub max_constraint_retries: usize,
    /// Sampling interval for dimensions whose constraint is disabled
    pub unbounded_init_range: (f64, f64),
    pub callback: Option<Callback>,
    pub termination: Option<TerminationPredicate>,
}

impl Default for DEConfig {
    fn default() -> Self {
        Self {
            population_size: 20,
            seed: DEFAULT_SEED,
            f: 0.8,
            cr: 0.9,
            enforce_constraints: true,
            max_constraint_retries: 1000,
            unbounded_init_range: DEFAULT_UNBOUNDED_INIT_RANGE,
            callback: None,
            termination: None,
        }
    }
}

impl fmt::Debug for DEConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DEConfig")
            .field("population_size", &self.population_size)
            .field("seed", &self.seed)
            .field("f", &self.f)
            .field("cr", &self.cr)
            .field("enforce_constraints", &self.enforce_constraints)
            .field("max_constraint_retries", &self.max_constraint_retries)
            .field("unbounded_init_range", &self.unbounded_init_range)
            .field("callback", &self.callback.is_some())
            .field("termination", &self.termination.is_some())
            .finish()
    }
}

impl DEConfig {
    /// Check the numeric settings
    pub fn validate(&self) -> Result<()> {
        if self.population_size < 4 {
            return Err(DEError::PopulationTooSmall { pop_size: self.population_size });
        }
        if !(0.0..=2.0).contains(&self.f) {
            return Err(DEError::InvalidMutationFactor { factor: self.f });
        }
        if !(0.0..=1.0).contains(&self.cr) {
            return Err(DEError::InvalidCrossoverRate { rate: self.cr });
        }
        if self.max_constraint_retries == 0 {
            return Err(DEError::InvalidRetryLimit);
        }
        let (lower, upper) = self.unbounded_init_range;
        if !lower.is_finite()
            || !upper.is_finite()
            || !(upper - lower).is_finite()
            || lower > upper
        {
            return Err(DEError::InvalidUnboundedRange { lower, upper });
        }
        Ok(())
    }
}

/// Fluent builder for `DEConfig` for ergonomic configuration.
pub struct DEConfigBuilder {
    cfg: DEConfig,
}

impl Default for DEConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DEConfigBuilder {
    pub fn new() -> Self {
        Self { cfg: DEConfig::default() }
    }
    pub fn population_size(mut self, v: usize) -> Self {
        self.cfg.population_size = v;
        self
    }
    pub fn seed(mut self, v: u64) -> Self {
        self.cfg.seed = v;
        self
    }
    pub fn f(mut self, v: f64) -> Self {
        self.cfg.f = v;
        self
    }
    pub fn cr(mut self, v: f64) -> Self {
        self.cfg.cr = v;
        self
    }
    pub fn enforce_constraints(mut self, v: bool) -> Self {
        self.cfg.enforce_constraints = v;
        self
    }
    pub fn max_constraint_retries(mut self, v: usize) -> Self {
        self.cfg.max_constraint_retries = v;
        self
    }
    pub fn unbounded_init_range(mut self, lower: f64, upper: f64) -> Self {
        self.cfg.unbounded_init_range = (lower, upper);
        self
    }
    pub fn callback<FN>(mut self, cb: FN) -> Self
    where
        FN: FnMut(&DEView<'_>) + 'static,
    {
        self.cfg.callback = Some(Box::new(cb));
        self
    }
    pub fn termination<FN>(mut self, pred: FN) -> Self
    where
        FN: Fn(&DEView<'_>) -> bool + 'static,
    {
        self.cfg.termination = Some(Box::new(pred));
        self
    }
    pub fn build(self) -> Result<DEConfig> {
        self.cfg.validate()?;
        Ok(self.cfg)
    }
}

/// Where the engine is in its run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunState {
    Uninitialized,
    Initialized,
    Running,
    Completed,
}

/// Why `optimize_step` stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Termination {
    /// The termination predicate was satisfied
    ConditionMet,
    /// All generations ran and the predicate was absent or unsatisfied
    BudgetExhausted,
}

/// Read-only view of the engine handed to the hooks
pub struct DEView<'a> {
    pub population: ArrayView2<'a, f64>,
    pub costs: ArrayView1<'a, f64>,
    pub best_index: usize,
    pub best_cost: f64,
    pub generation: usize,
    pub nfev: usize,
}

impl DEView<'_> {
    pub fn best_agent(&self) -> Array1<f64> {
        self.population.row(self.best_index).to_owned()
    }
}

/// Result/Report of a DE optimization run
#[derive(Clone, Serialize)]
pub struct DEReport {
    pub x: Array1<f64>,
    pub fun: f64,
    pub termination: Termination,
    pub message: String,
    pub nit: usize,
    pub nfev: usize,
    pub population: Array2<f64>,
    pub population_costs: Array1<f64>,
}

impl fmt::Debug for DEReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DEReport")
            .field("x", &format!("len={}", self.x.len()))
            .field("fun", &self.fun)
            .field("termination", &self.termination)
            .field("message", &self.message)
            .field("nit", &self.nit)
            .field("nfev", &self.nfev)
            .field(
                "population",
                &format!("{}x{}", self.population.nrows(), self.population.ncols()),
            )
            .field("population_costs", &format!("len={}", self.population_costs.len()))
            .finish()
    }
}

/// Differential Evolution optimizer bound to one cost function
pub struct DifferentialEvolution<'a, C>
where
    C: CostFunction + ?Sized,
{
    cost_function: &'a C,
    config: DEConfig,
    n_params: usize,
    constraints: Vec<Constraint>,
    rng: StdRng,
    population: Array2<f64>,
    costs: Array1<f64>,
    best_index: usize,
    best_cost: f64,
    state: RunState,
    generation: usize,
    nfev: usize,
}

impl<'a, C> DifferentialEvolution<'a, C>
where
    C: CostFunction + ?Sized,
{
    /// Bind a new optimizer to `cost_function`.
    ///
    /// Parameter count and constraints are read once here. Fails if the
    /// configuration is invalid, the cost function declares no parameter,
    /// its constraint list has the wrong length or an enabled constraint has
    /// lower > upper.
    pub fn new(cost_function: &'a C, config: DEConfig) -> Result<Self> {
        config.validate()?;

        let n_params = cost_function.parameter_count();
        if n_params == 0 {
            return Err(DEError::NoParameters);
        }
        let constraints = cost_function.constraints();
        if constraints.len() != n_params {
            return Err(DEError::ConstraintCountMismatch {
                expected: n_params,
                got: constraints.len(),
            });
        }
        if let Some((index, c)) = constraints.iter().enumerate().find(|(_, c)| !c.is_valid()) {
            return Err(DEError::InvalidConstraint { index, lower: c.lower, upper: c.upper });
        }

        let npop = config.population_size;
        Ok(Self {
            cost_function,
            rng: StdRng::seed_from_u64(config.seed),
            config,
            n_params,
            constraints,
            population: Array2::zeros((npop, n_params)),
            costs: Array1::from_elem(npop, f64::INFINITY),
            best_index: 0,
            best_cost: f64::INFINITY,
            state: RunState::Uninitialized,
            generation: 0,
            nfev: 0,
        })
    }

    /// Sample a fresh population and evaluate it. Any previous population is discarded.
    pub fn initialize_population(&mut self) {
        use init_random::init_random;

        let npop = self.config.population_size;
        self.population = init_random(
            self.n_params,
            npop,
            &self.constraints,
            self.config.unbounded_init_range,
            &mut self.rng,
        );
        for i in 0..npop {
            self.costs[i] = self.cost_function.evaluate_cost(&self.population.row(i).to_owned());
        }
        self.nfev += npop;

        // +inf baseline so that the first finite cost always wins; NaN never compares lower
        self.best_index = 0;
        self.best_cost = f64::INFINITY;
        for (i, &cost) in self.costs.iter().enumerate() {
            if cost < self.best_cost {
                self.best_cost = cost;
                self.best_index = i;
            }
        }
        if self.best_cost == f64::INFINITY {
            log::warn!(
                "DE init: no finite cost in the initial population (NaN or +inf everywhere), best index defaults to 0"
            );
        }
        self.generation = 0;
        self.state = RunState::Initialized;

        log::debug!(
            "DE init: {} dimensions, population={}, best_f={:.6e} at index {}",
            self.n_params,
            npop,
            self.best_cost,
            self.best_index
        );
    }

    /// Run exactly one generation and return how many slots were replaced.
    ///
    /// Donors, mutants and trials are all built from the population as it was
    /// when the generation started. On `DEError::InfeasibleTrial` the slots
    /// before the failing one keep their update and the generation is not
    /// counted.
    pub fn select_and_cross(&mut self) -> Result<usize> {
        if self.state == RunState::Uninitialized {
            return Err(DEError::NotInitialized);
        }
        self.state = RunState::Running;

        let snapshot = self.population.clone();
        let mut accepted = 0;
        for k in 0..self.config.population_size {
            let trial = self.feasible_trial(k, &snapshot)?;
            let trial_cost = self.cost_function.evaluate_cost(&trial);
            self.nfev += 1;

            // ties keep the incumbent
            if trial_cost < self.costs[k] {
                self.population.row_mut(k).assign(&trial);
                self.costs[k] = trial_cost;
                accepted += 1;
            }
            if self.costs[k] < self.best_cost {
                self.best_cost = self.costs[k];
                self.best_index = k;
            }
        }
        self.generation += 1;
        Ok(accepted)
    }

    /// Mutation + crossover for slot `k`, regenerated until the trial
    /// satisfies every constraint or the retry budget is spent.
    fn feasible_trial(&mut self, k: usize, snapshot: &Array2<f64>) -> Result<Array1<f64>> {
        use crossover_binomial::binomial_crossover;
        use mutant_rand1::mutant_rand1;

        let attempts = self.config.max_constraint_retries;
        for attempt in 1..=attempts {
            let mutant = mutant_rand1(k, snapshot, self.config.f, &mut self.rng);
            let (trial, _forced) =
                binomial_crossover(snapshot.row(k), &mutant, self.config.cr, &mut self.rng);
            if !self.config.enforce_constraints || constraint::check_all(&self.constraints, &trial)
            {
                return Ok(trial);
            }
            log::trace!("slot {k}: trial {attempt}/{attempts} violates constraints");
        }
        log::warn!("slot {k}: no feasible trial after {attempts} attempts");
        Err(DEError::InfeasibleTrial { slot: k, attempts })
    }

    /// Initialize, run `iterations` generations, then invoke the hooks.
    ///
    /// With `verbose` each generation is logged at info level, otherwise at
    /// debug level.
    pub fn optimize_step(&mut self, iterations: usize, verbose: bool) -> Result<DEReport> {
        self.initialize_population();

        let npop = self.config.population_size;
        for _ in 0..iterations {
            let accepted = self.select_and_cross()?;
            if verbose {
                log::info!(
                    "DE iter {:4}  best_f={:.6e}  accepted={}/{}  best_x={}",
                    self.generation,
                    self.best_cost,
                    accepted,
                    npop,
                    self.population.row(self.best_index)
                );
            } else {
                log::debug!(
                    "DE iter {:4}  best_f={:.6e}  accepted={}/{}",
                    self.generation,
                    self.best_cost,
                    accepted,
                    npop
                );
            }
        }
        self.state = RunState::Completed;

        let view = DEView {
            population: self.population.view(),
            costs: self.costs.view(),
            best_index: self.best_index,
            best_cost: self.best_cost,
            generation: self.generation,
            nfev: self.nfev,
        };
        if let Some(cb) = self.config.callback.as_mut() {
            cb(&view);
        }
        let condition_met = self.config.termination.as_ref().is_some_and(|pred| pred(&view));

        let (termination, message) = if condition_met {
            (Termination::ConditionMet, "Termination condition is met".to_string())
        } else {
            (
                Termination::BudgetExhausted,
                format!("Terminated after the full budget of {iterations} generations"),
            )
        };
        if verbose {
            log::info!("DE finished: {message}");
        } else {
            log::debug!("DE finished: {message}");
        }

        Ok(self.report(termination, message))
    }

    fn report(&self, termination: Termination, message: String) -> DEReport {
        DEReport {
            x: self.get_best_agent(),
            fun: self.best_cost,
            termination,
            message,
            nit: self.generation,
            nfev: self.nfev,
            population: self.population.clone(),
            population_costs: self.costs.clone(),
        }
    }

    /// Copy of the best candidate seen during the run
    pub fn get_best_agent(&self) -> Array1<f64> {
        self.population.row(self.best_index).to_owned()
    }

    /// Cost of the best candidate seen during the run.
    ///
    /// +inf before initialization, and also while no candidate has produced a
    /// cost below +inf: NaN costs are never selected, so `best_index` then
    /// stays at 0 and its cost may differ from this value.
    pub fn get_best_cost(&self) -> f64 {
        self.best_cost
    }

    /// Owned (candidate, cost) pairs, one per slot
    pub fn get_population_cost(&self) -> Vec<(Array1<f64>, f64)> {
        self.population
            .rows()
            .into_iter()
            .zip(self.costs.iter())
            .map(|(row, &cost)| (row.to_owned(), cost))
            .collect()
    }

    pub fn population(&self) -> ArrayView2<'_, f64> {
        self.population.view()
    }

    pub fn population_costs(&self) -> ArrayView1<'_, f64> {
        self.costs.view()
    }

    pub fn best_index(&self) -> usize {
        self.best_index
    }

    pub fn parameter_count(&self) -> usize {
        self.n_params
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Generations completed since the last initialization
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Cost evaluations performed by this engine
    pub fn nfev(&self) -> usize {
        self.nfev
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// One line per slot: the candidate values then its cost
    pub fn population_dump(&self) -> String {
        let mut out = String::new();
        for (i, (row, cost)) in self.population.rows().into_iter().zip(self.costs.iter()).enumerate() {
            let values: Vec<String> = row.iter().map(|v| format!("{v:.6}")).collect();
            out.push_str(&format!("{i:4}: {}  cost={cost:.6e}\n", values.join(" ")));
        }
        out
    }
}
