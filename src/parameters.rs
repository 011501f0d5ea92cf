//! Typed model parameters and initial conditions, plus the adapter that decodes the
//! host engine's key-value maps into them.
//!
//! Host engines hand parameters over as flat maps whose keys may be text or raw bytes.
//! `from_map` reads such a map exactly once; a missing key surfaces as
//! [`SeqiahrError::MissingParameter`] and the rest of the crate works with plain fields.
use std::borrow::Borrow;
use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::compartments::{Compartment, CompartmentState};
use crate::error::SeqiahrError;

/// Parameter keys the host engine must supply, in the order it lists them.
pub const PARAMETER_KEYS: [&str; 10] = [
    "beta",
    "alpha",
    "chi",
    "phi",
    "delta",
    "rho",
    "q",
    "p",
    "vaccineNow",
    "vaccov",
];

/// Rate coefficients for one node. All rates are per step.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ModelParameters {
    /// Transmission rate.
    pub beta: f64,
    /// Progression rate out of Exposed.
    pub alpha: f64,
    /// Accepted for compatibility; does not enter the step.
    pub chi: f64,
    /// Progression rate from Infectious to Hospitalized.
    pub phi: f64,
    /// Recovery (removal) rate of Infectious, Asymptomatic and Hospitalized.
    pub delta: f64,
    /// Reduction in infectiousness of Hospitalized individuals.
    pub rho: f64,
    /// Accepted for compatibility; does not enter the step.
    pub q: f64,
    /// Fraction of progressing Exposed who become Asymptomatic.
    pub p: f64,
    /// Apply the vaccination event on this step.
    #[serde(rename = "vaccineNow", deserialize_with = "deserialize_truthy")]
    pub vaccine_now: bool,
    /// Fraction of Susceptible removed by the vaccination event.
    pub vaccov: f64,
}

impl ModelParameters {
    /// Decodes parameters from a map keyed by text or bytes. `vaccineNow` is true for
    /// any non-zero value.
    ///
    /// # Errors
    ///
    /// Returns `SeqiahrError::MissingParameter` naming the first absent key.
    pub fn from_map<K, V, I>(entries: I) -> Result<Self, SeqiahrError>
    where
        K: AsRef<[u8]>,
        V: Borrow<f64>,
        I: IntoIterator<Item = (K, V)>,
    {
        let values = KeyedValues::collect(entries);
        Ok(ModelParameters {
            beta: values.require("beta")?,
            alpha: values.require("alpha")?,
            chi: values.require("chi")?,
            phi: values.require("phi")?,
            delta: values.require("delta")?,
            rho: values.require("rho")?,
            q: values.require("q")?,
            p: values.require("p")?,
            vaccine_now: values.require("vaccineNow")? != 0.0,
            vaccov: values.require("vaccov")?,
        })
    }

    /// A copy of these parameters with the vaccination flag set to `vaccine_now`.
    #[must_use]
    pub fn with_vaccination(mut self, vaccine_now: bool) -> Self {
        self.vaccine_now = vaccine_now;
        self
    }
}

/// Starting compartment values for a node, consulted only on the first step.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct InitialConditions {
    pub e: f64,
    pub i: f64,
    pub a: f64,
    pub h: f64,
    pub s: f64,
}

impl InitialConditions {
    /// Decodes initial conditions from a map with keys `e, i, a, h, s`.
    ///
    /// # Errors
    ///
    /// Returns `SeqiahrError::MissingParameter` naming the first absent key.
    pub fn from_map<K, V, I>(entries: I) -> Result<Self, SeqiahrError>
    where
        K: AsRef<[u8]>,
        V: Borrow<f64>,
        I: IntoIterator<Item = (K, V)>,
    {
        let values = KeyedValues::collect(entries);
        let mut state = [0.0; 5];
        for compartment in Compartment::ALL {
            state[compartment.index()] = values.require(compartment.key())?;
        }
        Ok(CompartmentState::from(state).into())
    }

    #[must_use]
    pub fn to_state(&self) -> CompartmentState {
        CompartmentState::new(self.e, self.i, self.a, self.h, self.s)
    }
}

impl From<CompartmentState> for InitialConditions {
    fn from(state: CompartmentState) -> Self {
        InitialConditions {
            e: state.exposed,
            i: state.infectious,
            a: state.asymptomatic,
            h: state.hospitalized,
            s: state.susceptible,
        }
    }
}

struct KeyedValues(HashMap<Vec<u8>, f64>);

impl KeyedValues {
    fn collect<K, V, I>(entries: I) -> Self
    where
        K: AsRef<[u8]>,
        V: Borrow<f64>,
        I: IntoIterator<Item = (K, V)>,
    {
        KeyedValues(
            entries
                .into_iter()
                .map(|(k, v)| (k.as_ref().to_vec(), *v.borrow()))
                .collect(),
        )
    }

    fn require(&self, key: &str) -> Result<f64, SeqiahrError> {
        self.0
            .get(key.as_bytes())
            .copied()
            .ok_or_else(|| SeqiahrError::MissingParameter(key.to_string()))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Truthy {
    Flag(bool),
    Number(f64),
}

fn deserialize_truthy<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match Truthy::deserialize(deserializer)? {
        Truthy::Flag(flag) => flag,
        Truthy::Number(n) => n != 0.0,
    })
}
