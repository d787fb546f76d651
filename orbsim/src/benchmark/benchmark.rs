use std::time::Instant;

use crate::configuration::config::UpdateOrderConfig;
use crate::error::SimulationError;
use crate::simulation::energy::EnergyReport;
use crate::simulation::simulator::Simulator;

/// Timing and energy drift of one full run
#[derive(Debug, Clone, Copy)]
pub struct BenchResult {
    pub update_order: UpdateOrderConfig,
    pub steps_per_second: f64,
    pub relative_ke_change: f64, // (KE_end - KE_start) / KE_start, NaN when KE_start == 0
}

/// Run the scenario to completion once per update order, starting each run
/// from the same initial state as `simulator`
pub fn bench_update_orders(simulator: &Simulator) -> Result<Vec<BenchResult>, SimulationError> {
    let mut results = Vec::new();

    for order in [UpdateOrderConfig::Sequential, UpdateOrderConfig::Snapshot] {
        let mut sim = simulator.clone();
        sim.set_update_order(order);

        let ke_start = sim.total_kinetic_energy();
        let ticks = sim.parameters().iteration_count - sim.tick();
        let mut reports: Vec<EnergyReport> = Vec::new();

        let t0 = Instant::now();
        sim.run(&mut reports)?;
        let secs = t0.elapsed().as_secs_f64();

        let ke_end = sim.total_kinetic_energy();
        let result = BenchResult {
            update_order: order,
            steps_per_second: ticks as f64 / secs.max(f64::EPSILON),
            relative_ke_change: (ke_end - ke_start) / ke_start,
        };

        println!(
            "{:?}: {} ticks, {:12.0} steps/s, KE change = {:+.3e}",
            result.update_order, ticks, result.steps_per_second, result.relative_ke_change
        );
        results.push(result);
    }

    Ok(results)
}
