//! JSON description of a single-node run, as consumed by the runner.
//!
//! ```json
//! {
//!   "model": "seqiahr",
//!   "totpop": 1000,
//!   "steps": 50,
//!   "initial_conditions": {"e": 0, "i": 10, "a": 0, "h": 0, "s": 990},
//!   "parameters": {"beta": 0.0005, "alpha": 0.2, "chi": 0, "phi": 0.1, "delta": 0.1,
//!                  "rho": 0.5, "q": 0, "p": 0.3, "vaccineNow": false, "vaccov": 0.1},
//!   "vaccination_steps": [10]
//! }
//! ```
use std::fs;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::compartments::Compartment;
use crate::error::SeqiahrError;
use crate::parameters::{InitialConditions, ModelParameters, PARAMETER_KEYS};

fn default_model() -> String {
    "seqiahr".to_string()
}

// Reports an absent key of the `section` object the same way the host-map decoders
// do. A missing or mistyped section is left for serde to report.
fn require_keys<'a>(
    config: &Value,
    section: &str,
    keys: impl IntoIterator<Item = &'a str>,
) -> Result<(), SeqiahrError> {
    let Some(Value::Object(entries)) = config.get(section) else {
        return Ok(());
    };
    match keys.into_iter().find(|key| !entries.contains_key(*key)) {
        Some(key) => Err(SeqiahrError::MissingParameter(key.to_string())),
        None => Ok(()),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Registry name of the model to run.
    #[serde(default = "default_model")]
    pub model: String,
    pub totpop: f64,
    pub steps: u32,
    pub initial_conditions: InitialConditions,
    pub parameters: ModelParameters,
    /// Steps on which the vaccination event fires, in addition to any step where
    /// `parameters.vaccineNow` is already set.
    #[serde(default)]
    pub vaccination_steps: Vec<u32>,
    /// Constant coupling inputs handed to every step.
    #[serde(default)]
    pub theta: f64,
    #[serde(default)]
    pub npass: f64,
}

impl NodeConfig {
    /// Reads a node configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not describe a node.
    pub fn load(path: &Path) -> Result<Self, SeqiahrError> {
        info!("Loading node configuration from: {}", path.display());
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Parses a node configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns `SeqiahrError::MissingParameter` for an absent parameter or
    /// initial-condition key, `SeqiahrError::JsonError` for any other malformed or
    /// incomplete JSON, and a `SeqiahrError` message for a non-positive population.
    pub fn from_json_str(contents: &str) -> Result<Self, SeqiahrError> {
        let value: Value = serde_json::from_str(contents)?;
        require_keys(&value, "initial_conditions", Compartment::ALL.map(Compartment::key))?;
        require_keys(&value, "parameters", PARAMETER_KEYS)?;
        let config: NodeConfig = serde_json::from_value(value)?;
        if config.totpop.is_nan() || config.totpop <= 0.0 {
            return Err(format!("totpop must be positive, got {}", config.totpop).into());
        }
        Ok(config)
    }

    /// Parameters for `simstep`, with the vaccination flag raised on scheduled steps.
    #[must_use]
    pub fn parameters_at(&self, simstep: u32) -> ModelParameters {
        let scheduled = self.vaccination_steps.contains(&simstep);
        self.parameters
            .with_vaccination(self.parameters.vaccine_now || scheduled)
    }
}
