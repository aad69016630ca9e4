use crate::cli::RunArgs;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use senescwheat::{
    core::io::tables,
    core::models::records::InvalidRecordPolicy,
    core::senescence::params::SenescenceParameters,
    engine::config::SimulationConfigBuilder,
    engine::progress::ProgressReporter,
    engine::simulation::SimulationInputs,
    workflows,
};
use tracing::info;

pub fn run(args: RunArgs) -> Result<()> {
    let params = match &args.params {
        Some(path) => {
            info!("Loading model parameters from {:?}", path);
            SenescenceParameters::load(path)?
        }
        None => SenescenceParameters::default(),
    };

    let policy = if args.skip_invalid {
        InvalidRecordPolicy::SkipWithWarning
    } else {
        InvalidRecordPolicy::Fail
    };

    let mut builder = SimulationConfigBuilder::new()
        .delta_t(args.delta_t)
        .postflowering_stages(args.postflowering)
        .invalid_records(policy);
    if let Some(area) = args.min_green_area {
        builder = builder.min_green_area(area);
    }
    let config = builder.build()?;

    info!("Loading input tables from {:?} and {:?}", &args.roots, &args.elements);
    let inputs = SimulationInputs {
        roots: tables::read_roots_table(&args.roots, policy)?,
        elements: tables::read_elements_table(&args.elements, policy)?,
    };
    info!(
        roots = inputs.roots.len(),
        elements = inputs.elements.len(),
        "Input tables loaded."
    );

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Starting senescence run...");
    info!("Invoking the core senescence workflow...");

    let result = workflows::senesce::run(inputs, params, config, args.steps, &reporter)?;

    info!(
        steps = result.steps_run,
        "Workflow finished, writing output tables."
    );

    tables::write_roots_outputs(&args.out_roots, &result.last_outputs.roots)?;
    tables::write_elements_outputs(&args.out_elements, &result.last_outputs.elements)?;

    println!(
        "✓ Roots outputs ({} record(s)) written to: {}",
        result.last_outputs.roots.len(),
        args.out_roots.display()
    );
    println!(
        "✓ Element outputs ({} record(s)) written to: {}",
        result.last_outputs.elements.len(),
        args.out_elements.display()
    );

    Ok(())
}
