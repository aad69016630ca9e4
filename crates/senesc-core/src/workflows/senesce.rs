use tracing::{info, instrument};

use crate::core::senescence::params::SenescenceParameters;
use crate::engine::config::SimulationConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::simulation::{Simulation, SimulationInputs, SimulationOutputs};

#[derive(Debug, Clone)]
pub struct SenescenceRun {
    pub steps_run: u64,
    pub final_inputs: SimulationInputs,
    pub last_outputs: SimulationOutputs,
}

/// Runs the senescence model for `steps` consecutive timesteps.
///
/// After each step the outputs are applied back onto the retained records,
/// so protein maxima and shrinking masses carry forward from one step to the
/// next. Returns the records after the last step together with the last
/// step's outputs.
#[instrument(skip_all, name = "senescence_workflow")]
pub fn run(
    inputs: SimulationInputs,
    params: SenescenceParameters,
    config: SimulationConfig,
    steps: u64,
    reporter: &ProgressReporter,
) -> Result<SenescenceRun, EngineError> {
    info!(
        roots = inputs.roots.len(),
        elements = inputs.elements.len(),
        steps,
        "Starting senescence workflow."
    );
    reporter.report(Progress::RunStart { total_steps: steps });

    let mut simulation = Simulation::new(params, config);
    simulation.initialize(inputs);

    for step in 1..=steps {
        simulation.run()?;
        simulation.apply_outputs()?;
        reporter.report(Progress::StepFinish { step });
    }

    reporter.report(Progress::RunFinish);
    info!(steps, "Senescence workflow complete.");

    let (final_inputs, last_outputs) = simulation.into_parts();
    Ok(SenescenceRun {
        steps_run: steps,
        final_inputs,
        last_outputs,
    })
}
