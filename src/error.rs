use std::fmt::{self, Debug, Display};
use std::io;

use crate::compartments::Compartment;

/// Provides `SeqiahrError` and maps to other errors to
/// convert to a `SeqiahrError`
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub enum SeqiahrError {
    IoError(io::Error),
    JsonError(serde_json::Error),
    CSVError(csv::Error),
    /// A required initial-condition or parameter key was not supplied.
    MissingParameter(String),
    /// A compartment left the admissible range after a step. Only raised
    /// under `Validation::Strict`.
    InvalidState {
        simstep: u32,
        compartment: Compartment,
        value: f64,
    },
    UnknownModel(String),
    DuplicateModel(String),
    SeqiahrError(String),
}

impl From<io::Error> for SeqiahrError {
    fn from(error: io::Error) -> Self {
        SeqiahrError::IoError(error)
    }
}

impl From<serde_json::Error> for SeqiahrError {
    fn from(error: serde_json::Error) -> Self {
        SeqiahrError::JsonError(error)
    }
}

impl From<csv::Error> for SeqiahrError {
    fn from(error: csv::Error) -> Self {
        SeqiahrError::CSVError(error)
    }
}

impl From<String> for SeqiahrError {
    fn from(error: String) -> Self {
        SeqiahrError::SeqiahrError(error)
    }
}

impl From<&str> for SeqiahrError {
    fn from(error: &str) -> Self {
        SeqiahrError::SeqiahrError(error.to_string())
    }
}

impl std::error::Error for SeqiahrError {}

impl Display for SeqiahrError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SeqiahrError::MissingParameter(key) => {
                write!(f, "Error: missing required key `{key}`")
            }
            SeqiahrError::InvalidState {
                simstep,
                compartment,
                value,
            } => write!(
                f,
                "Error: {compartment} is {value} after step {simstep}, \
                 expected a finite non-negative count"
            ),
            SeqiahrError::UnknownModel(name) => write!(f, "Error: no model registered as `{name}`"),
            SeqiahrError::DuplicateModel(name) => {
                write!(f, "Error: a model is already registered as `{name}`")
            }
            _ => write!(f, "Error: {self:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_parameter_names_the_key() {
        let error = SeqiahrError::MissingParameter("beta".to_string());
        assert_eq!(error.to_string(), "Error: missing required key `beta`");
    }

    #[test]
    fn invalid_state_names_the_compartment() {
        let error = SeqiahrError::InvalidState {
            simstep: 4,
            compartment: Compartment::Susceptible,
            value: -1.5,
        };
        assert_eq!(
            error.to_string(),
            "Error: Susceptible is -1.5 after step 4, expected a finite non-negative count"
        );
    }

    #[test]
    fn string_conversions() {
        let error: SeqiahrError = "boom".into();
        assert!(matches!(error, SeqiahrError::SeqiahrError(ref s) if s == "boom"));
    }
}
