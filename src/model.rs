//! Models a host engine can call per node, and the registry it looks them up in.
//!
//! A host registers factories under a name once at startup and creates a model by name
//! when it sets up a run. Every model shares the step contract of [`NodeModel`].
use std::collections::BTreeMap;

use log::debug;

use crate::compartments::{CompartmentState, VARIABLE_NAMES};
use crate::error::SeqiahrError;
use crate::parameters::{InitialConditions, ModelParameters};
use crate::step::{step_validated, SimulationContext, StepOutput, Validation};

pub trait NodeModel: Send + Sync {
    /// Name the model is registered under by default.
    fn name(&self) -> &'static str;

    /// Names of the returned compartments, in the order they are returned.
    fn variable_names(&self) -> &'static [&'static str];

    /// Advances one node by one step.
    ///
    /// # Errors
    ///
    /// Returns an error when the model rejects its inputs or its result.
    fn step(
        &self,
        inits: &CompartmentState,
        context: &SimulationContext,
        initial_conditions: &InitialConditions,
        parameters: &ModelParameters,
    ) -> Result<StepOutput, SeqiahrError>;
}

pub type ModelFactory = fn() -> Box<dyn NodeModel>;

/// The SEQIAHR step as a [`NodeModel`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Seqiahr {
    pub validation: Validation,
}

impl Seqiahr {
    #[must_use]
    pub fn new(validation: Validation) -> Self {
        Seqiahr { validation }
    }

    #[must_use]
    pub fn strict() -> Self {
        Seqiahr::new(Validation::Strict)
    }
}

impl NodeModel for Seqiahr {
    fn name(&self) -> &'static str {
        "seqiahr"
    }

    fn variable_names(&self) -> &'static [&'static str] {
        &VARIABLE_NAMES
    }

    fn step(
        &self,
        inits: &CompartmentState,
        context: &SimulationContext,
        initial_conditions: &InitialConditions,
        parameters: &ModelParameters,
    ) -> Result<StepOutput, SeqiahrError> {
        step_validated(
            inits,
            context,
            initial_conditions,
            parameters,
            self.validation,
        )
    }
}

/// Named model factories.
#[derive(Default)]
pub struct ModelRegistry {
    factories: BTreeMap<String, ModelFactory>,
}

impl ModelRegistry {
    #[must_use]
    pub fn new() -> Self {
        ModelRegistry::default()
    }

    /// A registry holding `seqiahr` and `seqiahr-strict`.
    #[must_use]
    pub fn with_builtin() -> Self {
        let mut registry = ModelRegistry::new();
        registry
            .factories
            .insert("seqiahr".to_string(), || Box::new(Seqiahr::default()));
        registry
            .factories
            .insert("seqiahr-strict".to_string(), || Box::new(Seqiahr::strict()));
        registry
    }

    /// Registers `factory` under `name`.
    ///
    /// # Errors
    ///
    /// Returns `SeqiahrError::DuplicateModel` if `name` is already taken.
    pub fn register(&mut self, name: &str, factory: ModelFactory) -> Result<(), SeqiahrError> {
        if self.factories.contains_key(name) {
            return Err(SeqiahrError::DuplicateModel(name.to_string()));
        }
        debug!("registering model {}", name);
        self.factories.insert(name.to_string(), factory);
        Ok(())
    }

    /// Builds a fresh instance of the model registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns `SeqiahrError::UnknownModel` if nothing is registered under `name`.
    pub fn create(&self, name: &str) -> Result<Box<dyn NodeModel>, SeqiahrError> {
        self.factories
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| SeqiahrError::UnknownModel(name.to_string()))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names in sorted order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }
}
