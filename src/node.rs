//! Driving one node through time, and many nodes through one step.
//!
//! A node's steps are strictly sequential: step `t + 1` starts from the output of step
//! `t`. Distinct nodes share nothing, so [`step_nodes`] advances them in parallel.
use log::{debug, info};
use rayon::prelude::*;
use serde::Serialize;

use crate::compartments::CompartmentState;
use crate::config::NodeConfig;
use crate::error::SeqiahrError;
use crate::model::NodeModel;
use crate::parameters::{InitialConditions, ModelParameters};
use crate::step::SimulationContext;

/// What one step of one node produced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StepRecord {
    pub simstep: u32,
    pub state: CompartmentState,
    pub new_infections: f64,
    pub migrating_infectious: f64,
    pub recovered: f64,
}

/// The time series of a single node.
#[derive(Debug, Clone)]
pub struct NodeSeries {
    label: Option<String>,
    totpop: f64,
    initial_conditions: InitialConditions,
    state: CompartmentState,
    history: Vec<StepRecord>,
}

impl NodeSeries {
    #[must_use]
    pub fn new(totpop: f64, initial_conditions: InitialConditions) -> Self {
        NodeSeries {
            label: None,
            totpop,
            initial_conditions,
            state: initial_conditions.to_state(),
            history: Vec::new(),
        }
    }

    /// Names the node; the label is handed to every step as the context's `model`.
    #[must_use]
    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    #[must_use]
    pub fn totpop(&self) -> f64 {
        self.totpop
    }

    /// Current state: the initial conditions before the first step, the latest
    /// output afterwards.
    #[must_use]
    pub fn state(&self) -> &CompartmentState {
        &self.state
    }

    /// Number of steps taken so far.
    #[must_use]
    pub fn steps_taken(&self) -> u32 {
        u32::try_from(self.history.len()).unwrap_or(u32::MAX)
    }

    #[must_use]
    pub fn history(&self) -> &[StepRecord] {
        &self.history
    }

    #[must_use]
    pub fn last(&self) -> Option<&StepRecord> {
        self.history.last()
    }

    /// Runs the next step, re-feeding the previous output as `inits`.
    ///
    /// # Errors
    ///
    /// Propagates the model's error; the node is left unchanged.
    pub fn advance(
        &mut self,
        model: &dyn NodeModel,
        parameters: &ModelParameters,
        theta: f64,
        npass: f64,
    ) -> Result<&StepRecord, SeqiahrError> {
        let mut context =
            SimulationContext::new(self.steps_taken() + 1, self.totpop).with_coupling(theta, npass);
        context.model = self.label.clone();

        let output = model.step(
            &self.state,
            &context,
            &self.initial_conditions,
            parameters,
        )?;
        self.state = output.next_state;
        self.history.push(StepRecord {
            simstep: context.simstep,
            state: output.next_state,
            new_infections: output.new_infections,
            migrating_infectious: output.migrating_infectious,
            recovered: output.recovered,
        });
        Ok(&self.history[self.history.len() - 1])
    }

    /// Cumulative new infections over all steps taken.
    #[must_use]
    pub fn cumulative_incidence(&self) -> f64 {
        self.history.iter().map(|r| r.new_infections).sum()
    }
}

/// Runs a node described by `config` for `config.steps` steps.
///
/// # Errors
///
/// Stops at and returns the first error raised by the model.
pub fn run_node(model: &dyn NodeModel, config: &NodeConfig) -> Result<NodeSeries, SeqiahrError> {
    info!(
        "Running {} for {} steps on a population of {}",
        model.name(),
        config.steps,
        config.totpop
    );
    let mut node = NodeSeries::new(config.totpop, config.initial_conditions);
    for simstep in 1..=config.steps {
        let parameters = config.parameters_at(simstep);
        if parameters.vaccine_now {
            debug!("vaccinating {} of susceptibles at step {}", parameters.vaccov, simstep);
        }
        node.advance(model, &parameters, config.theta, config.npass)?;
    }
    info!("Cumulative incidence: {}", node.cumulative_incidence());
    Ok(node)
}

/// Per-node inputs for one step of [`step_nodes`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NodeInput {
    pub parameters: ModelParameters,
    pub theta: f64,
    pub npass: f64,
}

/// Advances every node by one step in parallel. `inputs[k]` drives `nodes[k]`; the
/// records come back in node order.
///
/// # Errors
///
/// Returns an error if the slices differ in length, or the first model error in node
/// order. Nodes that stepped successfully keep their new state.
pub fn step_nodes(
    model: &dyn NodeModel,
    nodes: &mut [NodeSeries],
    inputs: &[NodeInput],
) -> Result<Vec<StepRecord>, SeqiahrError> {
    if nodes.len() != inputs.len() {
        return Err(format!(
            "got {} nodes but {} node inputs",
            nodes.len(),
            inputs.len()
        )
        .into());
    }
    nodes
        .par_iter_mut()
        .zip(inputs.par_iter())
        .map(|(node, input)| {
            node.advance(model, &input.parameters, input.theta, input.npass)
                .copied()
        })
        .collect::<Vec<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_almost_eq;
    use crate::model::Seqiahr;
    use crate::numeric::ACC;
    use crate::step::{step, Validation};

    fn parameters() -> ModelParameters {
        ModelParameters {
            beta: 0.0005,
            alpha: 0.2,
            phi: 0.1,
            delta: 0.1,
            rho: 0.5,
            p: 0.3,
            ..ModelParameters::default()
        }
    }

    fn initial() -> InitialConditions {
        InitialConditions {
            e: 0.0,
            i: 10.0,
            a: 0.0,
            h: 0.0,
            s: 990.0,
        }
    }

    #[test]
    fn advance_feeds_output_back() {
        let model = Seqiahr::default();
        let mut node = NodeSeries::new(1000.0, initial());
        assert_eq!(node.steps_taken(), 0);
        assert_eq!(node.state(), &initial().to_state());

        let first = *node.advance(&model, &parameters(), 0.0, 0.0).unwrap();
        assert_eq!(first.simstep, 1);
        let second = *node.advance(&model, &parameters(), 0.0, 0.0).unwrap();
        assert_eq!(second.simstep, 2);

        let expected = step(
            &first.state,
            &SimulationContext::new(2, 1000.0),
            &InitialConditions::default(),
            &parameters(),
        );
        assert_eq!(second.state, expected.next_state);
        assert_eq!(node.state(), &second.state);
        assert_eq!(node.history().len(), 2);
        assert_almost_eq!(
            node.cumulative_incidence(),
            first.new_infections + second.new_infections,
            ACC
        );
    }

    #[test]
    fn failed_step_leaves_node_unchanged() {
        let model = Seqiahr::new(Validation::Strict);
        let mut node = NodeSeries::new(1000.0, initial()).with_label("Rio");
        let harsh = ModelParameters {
            beta: 1.0,
            ..parameters()
        };
        assert!(node.advance(&model, &harsh, 0.0, 0.0).is_err());
        assert_eq!(node.steps_taken(), 0);
        assert_eq!(node.state(), &initial().to_state());
        assert_eq!(node.label(), Some("Rio"));
    }

    #[test]
    fn run_node_applies_scheduled_vaccination() {
        let config = NodeConfig {
            model: "seqiahr".to_string(),
            totpop: 1000.0,
            steps: 6,
            initial_conditions: initial(),
            parameters: ModelParameters {
                vaccov: 0.5,
                ..parameters()
            },
            vaccination_steps: vec![4],
            theta: 0.0,
            npass: 0.0,
        };
        let node = run_node(&Seqiahr::default(), &config).unwrap();
        assert_eq!(node.steps_taken(), 6);

        let history = node.history();
        let s3 = history[2].state.susceptible;
        let l4 = history[3].new_infections;
        assert_almost_eq!(history[3].state.susceptible, 0.5 * s3 - l4, ACC);
        let s4 = history[3].state.susceptible;
        let l5 = history[4].new_infections;
        assert_almost_eq!(history[4].state.susceptible, s4 - l5, ACC);
    }

    #[test]
    fn step_nodes_matches_sequential_stepping() {
        let model = Seqiahr::default();
        let mut nodes: Vec<NodeSeries> = (1..=8)
            .map(|k| {
                NodeSeries::new(
                    1000.0 * f64::from(k),
                    InitialConditions {
                        s: 1000.0 * f64::from(k) - 10.0,
                        ..initial()
                    },
                )
            })
            .collect();
        let mut sequential = nodes.clone();
        let inputs: Vec<NodeInput> = (1..=8)
            .map(|k| NodeInput {
                parameters: ModelParameters {
                    beta: 0.0001 * f64::from(k),
                    ..parameters()
                },
                theta: f64::from(k),
                npass: 10.0 * f64::from(k),
            })
            .collect();

        for _ in 0..3 {
            let records = step_nodes(&model, &mut nodes, &inputs).unwrap();
            for ((node, input), record) in sequential.iter_mut().zip(&inputs).zip(&records) {
                let expected = *node
                    .advance(&model, &input.parameters, input.theta, input.npass)
                    .unwrap();
                assert_eq!(*record, expected);
            }
        }
        for (a, b) in nodes.iter().zip(&sequential) {
            assert_eq!(a.state(), b.state());
        }
    }

    #[test]
    fn step_nodes_rejects_mismatched_inputs() {
        let model = Seqiahr::default();
        let mut nodes = vec![NodeSeries::new(1000.0, initial())];
        assert!(step_nodes(&model, &mut nodes, &[]).is_err());
        assert_eq!(nodes[0].steps_taken(), 0);
    }
}
