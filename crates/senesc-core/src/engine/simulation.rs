use std::collections::{HashMap, HashSet};

use tracing::{info, instrument, warn};

use crate::core::models::ids::{ElementId, RootsId};
use crate::core::models::records::{
    ElementOutput, ElementRecord, InvalidRecordPolicy, RootsOutput, RootsRecord,
};
use crate::core::senescence::params::SenescenceParameters;
use crate::core::senescence::rules::{self, ModelError};
use crate::engine::config::SimulationConfig;
use crate::engine::error::EngineError;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// The two record collections the model consumes.
#[derive(Debug, Clone, Default)]
pub struct SimulationInputs {
    pub roots: HashMap<RootsId, RootsRecord>,
    pub elements: HashMap<ElementId, ElementRecord>,
}

/// The record collections produced by one step.
#[derive(Debug, Clone, Default)]
pub struct SimulationOutputs {
    pub roots: HashMap<RootsId, RootsOutput>,
    pub elements: HashMap<ElementId, ElementOutput>,
}

type RootsStepResult = Result<Option<(RootsId, RootsOutput)>, EngineError>;
type ElementStepResult = Result<Option<(ElementId, ElementOutput)>, EngineError>;

/// Stateful front end of the senescence model.
///
/// A `Simulation` holds the current input records, the outputs of the last
/// step, the run configuration and the species parameters. One call to
/// [`run`](Simulation::run) advances every organ by `delta_t` seconds.
///
/// Each photosynthetic element moves through three effective states:
/// growing (immune to forced death), senescing (green area and structural
/// mass shrink monotonically) and dead (green area zero, an absorbing state
/// with no further remobilisation).
pub struct Simulation {
    inputs: SimulationInputs,
    outputs: SimulationOutputs,
    config: SimulationConfig,
    params: SenescenceParameters,
}

impl Simulation {
    pub fn new(params: SenescenceParameters, config: SimulationConfig) -> Self {
        Self {
            inputs: SimulationInputs::default(),
            outputs: SimulationOutputs::default(),
            config,
            params,
        }
    }

    /// Replaces the current inputs wholesale. Outputs are left untouched
    /// until the next [`run`](Simulation::run).
    pub fn initialize(&mut self, inputs: SimulationInputs) {
        self.inputs = inputs;
    }

    pub fn inputs(&self) -> &SimulationInputs {
        &self.inputs
    }

    pub fn outputs(&self) -> &SimulationOutputs {
        &self.outputs
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn params(&self) -> &SenescenceParameters {
        &self.params
    }

    pub fn into_parts(self) -> (SimulationInputs, SimulationOutputs) {
        (self.inputs, self.outputs)
    }

    /// Advances every organ by one timestep.
    pub fn run(&mut self) -> Result<&SimulationOutputs, EngineError> {
        self.run_with_forced_max_proteins(&HashSet::new())
    }

    /// Variant of [`run`](Simulation::run) for callers that pin the protein
    /// maximum of some elements: ids in `forced_max_proteins` keep their
    /// tracked maximum even when the current concentration exceeds it.
    #[instrument(skip_all, name = "senescence_step")]
    pub fn run_with_forced_max_proteins(
        &mut self,
        forced_max_proteins: &HashSet<ElementId>,
    ) -> Result<&SimulationOutputs, EngineError> {
        info!(
            roots = self.inputs.roots.len(),
            elements = self.inputs.elements.len(),
            delta_t = self.config.delta_t,
            "Running one senescence step."
        );
        self.outputs.roots = self.run_roots()?;
        self.outputs.elements = self.run_elements(forced_max_proteins)?;
        Ok(&self.outputs)
    }

    /// Writes the last outputs back onto the retained input records, so the
    /// next step starts from the updated state. Fails if an output has no
    /// matching input record.
    pub fn apply_outputs(&mut self) -> Result<(), EngineError> {
        for (id, output) in &self.outputs.roots {
            let record =
                self.inputs
                    .roots
                    .get_mut(id)
                    .ok_or_else(|| EngineError::MissingRootsRecord {
                        id: id.to_string(),
                    })?;
            record.apply(output);
        }
        for (id, output) in &self.outputs.elements {
            let record =
                self.inputs
                    .elements
                    .get_mut(id)
                    .ok_or_else(|| EngineError::MissingElementRecord {
                        id: id.to_string(),
                    })?;
            record.apply(output);
        }
        Ok(())
    }

    fn run_roots(&self) -> Result<HashMap<RootsId, RootsOutput>, EngineError> {
        #[cfg(not(feature = "parallel"))]
        let iterator = self.inputs.roots.iter();

        #[cfg(feature = "parallel")]
        let iterator = self.inputs.roots.par_iter();

        let results: Vec<RootsStepResult> = iterator
            .map(|(id, record)| self.roots_output(id, record))
            .collect();

        let mut outputs = HashMap::with_capacity(results.len());
        for result in results {
            if let Some((id, output)) = result? {
                outputs.insert(id, output);
            }
        }
        Ok(outputs)
    }

    fn run_elements(
        &self,
        forced_max_proteins: &HashSet<ElementId>,
    ) -> Result<HashMap<ElementId, ElementOutput>, EngineError> {
        #[cfg(not(feature = "parallel"))]
        let iterator = self.inputs.elements.iter();

        #[cfg(feature = "parallel")]
        let iterator = self.inputs.elements.par_iter();

        let results: Vec<ElementStepResult> = iterator
            .map(|(id, record)| self.element_output(id, record, forced_max_proteins))
            .collect();

        let mut outputs = HashMap::with_capacity(results.len());
        for result in results {
            if let Some((id, output)) = result? {
                outputs.insert(id, output);
            }
        }
        Ok(outputs)
    }

    fn roots_output(&self, id: &RootsId, record: &RootsRecord) -> RootsStepResult {
        if let Err(error) = record.validate() {
            return self.reject(EngineError::InvalidRoots {
                id: id.to_string(),
                source: error,
            });
        }

        let rates = rules::roots_senescence_rates(
            &self.params,
            record.mstruct,
            record.nstruct,
            self.config.postflowering_stages,
        );
        let relative_delta_mstruct = match rules::relative_mstruct_loss_roots(
            rates.rate_mstruct_death,
            record.mstruct,
            self.config.delta_t,
        ) {
            Ok(delta) => delta,
            Err(source) => {
                return self.reject(EngineError::RootsRule {
                    id: id.to_string(),
                    source,
                });
            }
        };
        // Losses of nitrates, amino acids and sucrose are neglected.
        let loss_cytokinins = rules::remobilisation(record.cytokinins, relative_delta_mstruct);

        Ok(Some((
            id.clone(),
            RootsOutput {
                mstruct: record.mstruct - rates.rate_mstruct_death * self.config.delta_t,
                rate_mstruct_death: rates.rate_mstruct_death,
                nstruct: record.nstruct - rates.rate_nstruct_death * self.config.delta_t,
                cytokinins: record.cytokinins - loss_cytokinins,
            },
        )))
    }

    fn element_output(
        &self,
        id: &ElementId,
        record: &ElementRecord,
        forced_max_proteins: &HashSet<ElementId>,
    ) -> ElementStepResult {
        if let Err(error) = record.validate() {
            return self.reject(EngineError::InvalidElement {
                id: id.to_string(),
                source: error,
            });
        }

        // Forced death of shrunken elements. Growing elements are immune.
        if record.green_area < self.config.min_green_area && !record.is_growing {
            return Ok(Some((id.clone(), ElementOutput::dead(record))));
        }
        // Growing elements with no emerged area yet pass through unchanged.
        if record.green_area == 0.0 {
            return Ok(Some((id.clone(), ElementOutput::passthrough(record))));
        }
        if record.mstruct <= 0.0 {
            return self.reject(EngineError::ElementRule {
                id: id.to_string(),
                source: ModelError::NonPositiveMass(record.mstruct),
            });
        }

        let update_max_proteins = !forced_max_proteins.contains(id);
        let loss = match rules::green_area_loss(
            &self.params,
            id.organ,
            record.green_area,
            record.proteins / record.mstruct,
            record.max_proteins,
            self.config.delta_t,
            update_max_proteins,
        ) {
            Ok(loss) => loss,
            Err(source) => {
                return self.reject(EngineError::ElementRule {
                    id: id.to_string(),
                    source,
                });
            }
        };

        let (mstruct, nstruct) =
            rules::structural_mass_loss(loss.relative_delta, record.mstruct, record.nstruct);
        let remob_starch = rules::remobilisation(record.starch, loss.relative_delta);
        let remob_fructan = rules::remobilisation(record.fructan, loss.relative_delta);
        let remob_proteins = rules::remobilisation(record.proteins, loss.relative_delta);
        let loss_cytokinins = rules::remobilisation(record.cytokinins, loss.relative_delta);

        Ok(Some((
            id.clone(),
            ElementOutput {
                green_area: loss.new_green_area,
                mstruct,
                nstruct,
                starch: record.starch - remob_starch,
                sucrose: record.sucrose + remob_starch + remob_fructan,
                fructan: record.fructan - remob_fructan,
                proteins: record.proteins - remob_proteins,
                amino_acids: record.amino_acids + remob_proteins,
                cytokinins: record.cytokinins - loss_cytokinins,
                max_proteins: loss.max_proteins,
            },
        )))
    }

    fn reject<T>(&self, error: EngineError) -> Result<Option<T>, EngineError> {
        match self.config.invalid_records {
            InvalidRecordPolicy::Fail => Err(error),
            InvalidRecordPolicy::SkipWithWarning => {
                warn!(%error, "Skipping record");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::ids::PhotosyntheticOrgan;
    use crate::engine::config::SimulationConfigBuilder;

    const TOLERANCE: f64 = 1e-9;

    fn f64_approx_equal(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    fn setup_config() -> SimulationConfig {
        SimulationConfigBuilder::new()
            .delta_t(3600.0)
            .postflowering_stages(true)
            .build()
            .unwrap()
    }

    fn setup_roots() -> (RootsId, RootsRecord) {
        (
            RootsId {
                plant: 1,
                axis: "MS".to_string(),
            },
            RootsRecord {
                mstruct: 10.0,
                nstruct: 0.2,
                cytokinins: 200.0,
                sucrose: 300.0,
                amino_acids: 120.0,
            },
        )
    }

    fn setup_blade(metamer: u32, record: ElementRecord) -> (ElementId, ElementRecord) {
        (
            ElementId {
                plant: 1,
                axis: "MS".to_string(),
                metamer,
                organ: PhotosyntheticOrgan::Blade,
                element: "LeafElement1".to_string(),
            },
            record,
        )
    }

    fn senescing_blade_record() -> ElementRecord {
        // Protein concentration 4.0 / 0.1 = 40, below half of max_proteins.
        ElementRecord {
            green_area: 1e-3,
            mstruct: 0.1,
            nstruct: 0.002,
            proteins: 4.0,
            max_proteins: 100.0,
            amino_acids: 60.0,
            nitrates: 25.0,
            starch: 40.0,
            fructan: 30.0,
            sucrose: 80.0,
            cytokinins: 15.0,
            is_growing: false,
        }
    }

    fn setup_simulation(
        roots: Vec<(RootsId, RootsRecord)>,
        elements: Vec<(ElementId, ElementRecord)>,
        config: SimulationConfig,
    ) -> Simulation {
        let mut simulation = Simulation::new(SenescenceParameters::default(), config);
        simulation.initialize(SimulationInputs {
            roots: roots.into_iter().collect(),
            elements: elements.into_iter().collect(),
        });
        simulation
    }

    #[test]
    fn postflowering_roots_shrink_at_the_reference_rate() {
        let (id, record) = setup_roots();
        let mut simulation = setup_simulation(vec![(id.clone(), record)], vec![], setup_config());

        let outputs = simulation.run().unwrap();
        let output = outputs.roots.get(&id).unwrap();

        let rate = 10.0 * 3.5e-7 * 0.45;
        assert!(f64_approx_equal(output.rate_mstruct_death, rate));
        assert!(f64_approx_equal(output.mstruct, 10.0 - rate * 3600.0));
        assert!((output.mstruct - 9.99433).abs() < 1e-9);
        assert!(f64_approx_equal(
            output.nstruct,
            0.2 - 0.2 * 3.5e-7 * 0.45 * 3600.0
        ));
        let relative_delta = rate * 3600.0 / 10.0;
        assert!(f64_approx_equal(
            output.cytokinins,
            200.0 - 200.0 * relative_delta
        ));
    }

    #[test]
    fn preflowering_roots_are_left_unchanged() {
        let config = SimulationConfigBuilder::new().delta_t(3600.0).build().unwrap();
        let (id, record) = setup_roots();
        let mut simulation = setup_simulation(vec![(id.clone(), record)], vec![], config);

        let outputs = simulation.run().unwrap();
        let output = outputs.roots.get(&id).unwrap();
        assert_eq!(output.rate_mstruct_death, 0.0);
        assert_eq!(output.mstruct, 10.0);
        assert_eq!(output.nstruct, 0.2);
        assert_eq!(output.cytokinins, 200.0);
    }

    #[test]
    fn senescing_blade_loses_area_and_remobilises_every_pool() {
        let record = senescing_blade_record();
        let (id, record) = setup_blade(1, record);
        let mut simulation =
            setup_simulation(vec![], vec![(id.clone(), record)], setup_config());

        let outputs = simulation.run().unwrap();
        let output = outputs.elements.get(&id).unwrap();

        let senesced_area = 0.2e-8 * 0.45 * 3600.0;
        let relative_delta = senesced_area / record.green_area;
        assert!(f64_approx_equal(
            output.green_area,
            record.green_area - senesced_area
        ));
        assert!(f64_approx_equal(
            output.mstruct,
            record.mstruct * (1.0 - relative_delta)
        ));
        assert!(f64_approx_equal(
            output.nstruct,
            record.nstruct * (1.0 - relative_delta)
        ));
        assert!(f64_approx_equal(
            output.starch,
            record.starch * (1.0 - relative_delta)
        ));
        assert!(f64_approx_equal(
            output.fructan,
            record.fructan * (1.0 - relative_delta)
        ));
        assert!(f64_approx_equal(
            output.sucrose,
            record.sucrose + (record.starch + record.fructan) * relative_delta
        ));
        assert!(f64_approx_equal(
            output.proteins,
            record.proteins * (1.0 - relative_delta)
        ));
        assert!(f64_approx_equal(
            output.amino_acids,
            record.amino_acids + record.proteins * relative_delta
        ));
        assert_eq!(output.max_proteins, record.max_proteins);
    }

    #[test]
    fn healthy_blade_raises_its_protein_maximum_without_senescing() {
        let record = ElementRecord {
            proteins: 12.0,
            max_proteins: 110.0,
            ..senescing_blade_record()
        };
        let (id, record) = setup_blade(1, record);
        let mut simulation =
            setup_simulation(vec![], vec![(id.clone(), record)], setup_config());

        let outputs = simulation.run().unwrap();
        let output = outputs.elements.get(&id).unwrap();
        // Concentration 12.0 / 0.1 = 120 exceeds the previous maximum.
        assert_eq!(output.max_proteins, 120.0);
        assert_eq!(output.green_area, record.green_area);
        assert_eq!(output.mstruct, record.mstruct);
        assert_eq!(output.sucrose, record.sucrose);
    }

    #[test]
    fn forced_max_proteins_pins_the_tracked_maximum() {
        let record = ElementRecord {
            proteins: 12.0,
            max_proteins: 110.0,
            ..senescing_blade_record()
        };
        let (id, record) = setup_blade(1, record);
        let mut simulation =
            setup_simulation(vec![], vec![(id.clone(), record)], setup_config());

        let forced: HashSet<ElementId> = [id.clone()].into_iter().collect();
        let outputs = simulation.run_with_forced_max_proteins(&forced).unwrap();
        let output = outputs.elements.get(&id).unwrap();
        // 120 / 110 is still above the blade threshold, so nothing senesces,
        // but the maximum must stay pinned.
        assert_eq!(output.max_proteins, 110.0);
        assert_eq!(output.green_area, record.green_area);
    }

    #[test]
    fn tiny_non_growing_elements_are_forced_dead() {
        let record = ElementRecord {
            green_area: 1e-5,
            ..senescing_blade_record()
        };
        let (id, record) = setup_blade(1, record);
        let mut simulation =
            setup_simulation(vec![], vec![(id.clone(), record)], setup_config());

        let outputs = simulation.run().unwrap();
        let output = outputs.elements.get(&id).unwrap();
        assert_eq!(output.green_area, 0.0);
        // Everything else passes through untouched.
        assert_eq!(output.mstruct, record.mstruct);
        assert_eq!(output.starch, record.starch);
        assert_eq!(output.sucrose, record.sucrose);
        assert_eq!(output.max_proteins, record.max_proteins);
    }

    #[test]
    fn tiny_growing_elements_escape_forced_death() {
        let record = ElementRecord {
            green_area: 1e-5,
            is_growing: true,
            ..senescing_blade_record()
        };
        let (id, record) = setup_blade(1, record);
        let mut simulation =
            setup_simulation(vec![], vec![(id.clone(), record)], setup_config());

        let outputs = simulation.run().unwrap();
        let output = outputs.elements.get(&id).unwrap();
        // The senescence rule applies normally instead.
        let senesced_area = 0.2e-8 * 0.45 * 3600.0;
        assert!(f64_approx_equal(
            output.green_area,
            (record.green_area - senesced_area).max(0.0)
        ));
        assert!(output.green_area > 0.0);
    }

    #[test]
    fn unemerged_growing_elements_pass_through() {
        let record = ElementRecord {
            green_area: 0.0,
            is_growing: true,
            ..senescing_blade_record()
        };
        let (id, record) = setup_blade(1, record);
        let mut simulation =
            setup_simulation(vec![], vec![(id.clone(), record)], setup_config());

        let outputs = simulation.run().unwrap();
        let output = outputs.elements.get(&id).unwrap();
        assert_eq!(output.green_area, 0.0);
        assert_eq!(output.mstruct, record.mstruct);
        assert_eq!(output.proteins, record.proteins);
        assert_eq!(output.amino_acids, record.amino_acids);
    }

    #[test]
    fn dead_elements_stay_dead_across_steps() {
        let record = ElementRecord {
            green_area: 0.0,
            ..senescing_blade_record()
        };
        let (id, record) = setup_blade(1, record);
        let mut simulation =
            setup_simulation(vec![], vec![(id.clone(), record)], setup_config());

        let first = simulation.run().unwrap().elements.get(&id).copied().unwrap();
        simulation.apply_outputs().unwrap();
        let second = simulation.run().unwrap().elements.get(&id).copied().unwrap();

        assert_eq!(first.green_area, 0.0);
        assert_eq!(first, second);
    }

    #[test]
    fn invalid_elements_fail_the_run_under_the_strict_policy() {
        let record = ElementRecord {
            green_area: f64::NAN,
            ..senescing_blade_record()
        };
        let (id, record) = setup_blade(1, record);
        let mut simulation = setup_simulation(vec![], vec![(id, record)], setup_config());

        let result = simulation.run();
        assert!(matches!(
            result,
            Err(EngineError::InvalidElement { .. })
        ));
    }

    #[test]
    fn invalid_elements_are_dropped_under_the_lenient_policy() {
        let config = SimulationConfigBuilder::new()
            .delta_t(3600.0)
            .invalid_records(InvalidRecordPolicy::SkipWithWarning)
            .build()
            .unwrap();
        let bad = setup_blade(
            1,
            ElementRecord {
                green_area: f64::NAN,
                ..senescing_blade_record()
            },
        );
        let good = setup_blade(2, senescing_blade_record());
        let good_id = good.0.clone();
        let mut simulation = setup_simulation(vec![], vec![bad, good], config);

        let outputs = simulation.run().unwrap();
        assert_eq!(outputs.elements.len(), 1);
        assert!(outputs.elements.contains_key(&good_id));
    }

    #[test]
    fn massless_live_elements_are_a_rule_error() {
        let record = ElementRecord {
            mstruct: 0.0,
            ..senescing_blade_record()
        };
        let (id, record) = setup_blade(1, record);
        let mut simulation = setup_simulation(vec![], vec![(id, record)], setup_config());

        let result = simulation.run();
        assert!(matches!(result, Err(EngineError::ElementRule { .. })));
    }

    #[test]
    fn apply_outputs_updates_the_retained_records() {
        let (roots_id, roots_record) = setup_roots();
        let (element_id, element_record) = setup_blade(1, senescing_blade_record());
        let mut simulation = setup_simulation(
            vec![(roots_id.clone(), roots_record)],
            vec![(element_id.clone(), element_record)],
            setup_config(),
        );

        simulation.run().unwrap();
        simulation.apply_outputs().unwrap();

        let roots = simulation.inputs().roots.get(&roots_id).unwrap();
        assert!(roots.mstruct < 10.0);
        // Pools the model does not touch keep their previous values.
        assert_eq!(roots.sucrose, 300.0);
        assert_eq!(roots.amino_acids, 120.0);

        let element = simulation.inputs().elements.get(&element_id).unwrap();
        assert!(element.green_area < 1e-3);
        assert!(element.amino_acids > 60.0);
        assert_eq!(element.nitrates, 25.0);
        assert!(!element.is_growing);
    }

    #[test]
    fn apply_outputs_requires_a_matching_record() {
        let (id, record) = setup_blade(1, senescing_blade_record());
        let mut simulation =
            setup_simulation(vec![], vec![(id, record)], setup_config());

        simulation.run().unwrap();
        simulation.initialize(SimulationInputs::default());
        let result = simulation.apply_outputs();
        assert!(matches!(
            result,
            Err(EngineError::MissingElementRecord { .. })
        ));
    }

    #[test]
    fn masses_never_increase_across_two_applied_steps() {
        let (roots_id, roots_record) = setup_roots();
        let (element_id, element_record) = setup_blade(1, senescing_blade_record());
        let mut simulation = setup_simulation(
            vec![(roots_id.clone(), roots_record)],
            vec![(element_id.clone(), element_record)],
            setup_config(),
        );

        let mut previous_roots_mstruct = roots_record.mstruct;
        let mut previous_element_mstruct = element_record.mstruct;
        for _ in 0..2 {
            simulation.run().unwrap();
            simulation.apply_outputs().unwrap();
            let roots = simulation.inputs().roots.get(&roots_id).unwrap();
            let element = simulation.inputs().elements.get(&element_id).unwrap();
            assert!(roots.mstruct <= previous_roots_mstruct);
            assert!(element.mstruct <= previous_element_mstruct);
            previous_roots_mstruct = roots.mstruct;
            previous_element_mstruct = element.mstruct;
        }
    }
}
