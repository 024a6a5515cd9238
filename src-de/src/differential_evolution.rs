use crate::{CostFunction, DEConfig, DEReport, DifferentialEvolution, Result};

/// Convenience function: build an optimizer for `cost_function`, run
/// `iterations` generations quietly and return the report.
pub fn differential_evolution<C>(
    cost_function: &C,
    iterations: usize,
    config: DEConfig,
) -> Result<DEReport>
where
    C: CostFunction + ?Sized,
{
    let mut de = DifferentialEvolution::new(cost_function, config)?;
    de.optimize_step(iterations, false)
}
