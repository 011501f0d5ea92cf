//! The five compartments carried from one step to the next, and the fixed order in which
//! they travel.
//!
//! A host engine stores a node's state as a positional list and hands it back on the
//! following step, so the order `Exposed, Infectious, Asymptomatic, Hospitalized,
//! Susceptible` is part of the calling convention. Recovered is never carried: it is
//! whatever is left of the node population.
use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, IntoStaticStr};

/// Number of values in a node's carried state.
pub const STATE_LEN: usize = Compartment::COUNT;

/// Names under which the host records the returned compartments, in return order.
pub const VARIABLE_NAMES: [&str; STATE_LEN] = [
    "Exposed",
    "Infectious",
    "Asymptomatic",
    "Hospitalized",
    "Susceptible",
];

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumIter,
    EnumCount,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
pub enum Compartment {
    Exposed,
    Infectious,
    Asymptomatic,
    Hospitalized,
    Susceptible,
}

impl Compartment {
    /// All compartments in state order.
    pub const ALL: [Compartment; STATE_LEN] = [
        Compartment::Exposed,
        Compartment::Infectious,
        Compartment::Asymptomatic,
        Compartment::Hospitalized,
        Compartment::Susceptible,
    ];

    /// Position of this compartment in the state tuple.
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Key used for this compartment in initial-condition maps.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Compartment::Exposed => "e",
            Compartment::Infectious => "i",
            Compartment::Asymptomatic => "a",
            Compartment::Hospitalized => "h",
            Compartment::Susceptible => "s",
        }
    }
}

/// Values of `(E, I, A, H, S)` for one node at one step.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CompartmentState {
    pub exposed: f64,
    pub infectious: f64,
    pub asymptomatic: f64,
    pub hospitalized: f64,
    pub susceptible: f64,
}

impl CompartmentState {
    #[must_use]
    pub fn new(
        exposed: f64,
        infectious: f64,
        asymptomatic: f64,
        hospitalized: f64,
        susceptible: f64,
    ) -> Self {
        CompartmentState {
            exposed,
            infectious,
            asymptomatic,
            hospitalized,
            susceptible,
        }
    }

    #[must_use]
    pub fn get(&self, compartment: Compartment) -> f64 {
        match compartment {
            Compartment::Exposed => self.exposed,
            Compartment::Infectious => self.infectious,
            Compartment::Asymptomatic => self.asymptomatic,
            Compartment::Hospitalized => self.hospitalized,
            Compartment::Susceptible => self.susceptible,
        }
    }

    /// The state in `[E, I, A, H, S]` order.
    #[must_use]
    pub fn to_array(&self) -> [f64; STATE_LEN] {
        [
            self.exposed,
            self.infectious,
            self.asymptomatic,
            self.hospitalized,
            self.susceptible,
        ]
    }

    #[must_use]
    pub fn from_array(values: [f64; STATE_LEN]) -> Self {
        let [exposed, infectious, asymptomatic, hospitalized, susceptible] = values;
        CompartmentState::new(exposed, infectious, asymptomatic, hospitalized, susceptible)
    }

    /// Iterates `(compartment, value)` pairs in state order.
    pub fn iter(&self) -> impl Iterator<Item = (Compartment, f64)> + '_ {
        Compartment::ALL.into_iter().map(move |c| (c, self.get(c)))
    }

    /// `E + I + A + H + S`
    #[must_use]
    pub fn total(&self) -> f64 {
        self.to_array().iter().sum()
    }

    /// `E + I + A + H`, everyone currently carrying the infection.
    #[must_use]
    pub fn infected(&self) -> f64 {
        self.exposed + self.infectious + self.asymptomatic + self.hospitalized
    }

    /// `I + A + H`, the compartments that recover at rate `delta`.
    #[must_use]
    pub fn removable(&self) -> f64 {
        self.infectious + self.asymptomatic + self.hospitalized
    }

    /// Recovered count implied by a node population of `totpop`.
    #[must_use]
    pub fn recovered(&self, totpop: f64) -> f64 {
        totpop - self.total()
    }
}

impl From<[f64; STATE_LEN]> for CompartmentState {
    fn from(values: [f64; STATE_LEN]) -> Self {
        CompartmentState::from_array(values)
    }
}

impl From<CompartmentState> for [f64; STATE_LEN] {
    fn from(state: CompartmentState) -> Self {
        state.to_array()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn variable_names_follow_state_order() {
        let names: Vec<&'static str> = Compartment::iter().map(Into::into).collect();
        assert_eq!(names, VARIABLE_NAMES);
        for (i, compartment) in Compartment::ALL.iter().enumerate() {
            assert_eq!(compartment.index(), i);
            assert_eq!(compartment.to_string(), VARIABLE_NAMES[i]);
        }
    }

    #[test]
    fn state_length_counts_every_compartment() {
        assert_eq!(STATE_LEN, 5);
        assert_eq!(Compartment::iter().count(), STATE_LEN);
        assert_eq!(CompartmentState::default().to_array().len(), STATE_LEN);
    }

    #[test]
    fn keys_are_lowercase_initials() {
        let keys: Vec<&str> = Compartment::ALL.iter().map(|c| c.key()).collect();
        assert_eq!(keys, ["e", "i", "a", "h", "s"]);
    }

    #[test]
    fn array_order_matches_fields() {
        let state = CompartmentState::from([1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(state.exposed, 1.0);
        assert_eq!(state.infectious, 2.0);
        assert_eq!(state.asymptomatic, 3.0);
        assert_eq!(state.hospitalized, 4.0);
        assert_eq!(state.susceptible, 5.0);
        assert_eq!(<[f64; 5]>::from(state), [1.0, 2.0, 3.0, 4.0, 5.0]);
        for (compartment, value) in state.iter() {
            assert_eq!(state.to_array()[compartment.index()], value);
        }
    }

    #[test]
    fn totals() {
        let state = CompartmentState::new(5.0, 10.0, 3.0, 2.0, 970.0);
        assert_eq!(state.total(), 990.0);
        assert_eq!(state.infected(), 20.0);
        assert_eq!(state.removable(), 15.0);
        assert_eq!(state.recovered(1000.0), 10.0);
    }

    #[test]
    fn serializes_with_field_names() {
        let state = CompartmentState::new(0.0, 10.0, 0.0, 0.0, 990.0);
        let json = serde_json::to_value(state).unwrap();
        assert_eq!(json["infectious"], 10.0);
        assert_eq!(json["susceptible"], 990.0);
    }
}
