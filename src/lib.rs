//! One discrete-time step of an SEQIAHR epidemic model for a single node of a
//! metapopulation simulation.
//!
//! The population of a node is split into Exposed, Infectious (symptomatic),
//! Asymptomatic, Hospitalized and Susceptible compartments, plus an implicit Recovered
//! compartment holding the rest of the node population. A host engine calls the step
//! once per node per time step and feeds each output back in as the next call's
//! `inits`. Spatial coupling between nodes belongs to the host; the step accepts the
//! coupling inputs and returns the migration signal the host needs.
//!
//! The crate is organised as:
//! * [`step`]: the update equations, optional result validation, and an adapter that
//!   runs a step straight from the host's key-value maps.
//! * [`compartments`] and [`parameters`]: the typed state, parameters and initial
//!   conditions the step works on.
//! * [`model`]: the [`model::NodeModel`] trait and a registry hosts use to look models
//!   up by name.
//! * [`node`]: a per-node time-series driver and a parallel one-step driver for many
//!   nodes.
//! * [`config`], [`report`] and [`runner`]: the JSON configuration, CSV report and
//!   command line runner behind the `seqiahr` binary.
//!
//! ```
//! use seqiahr::prelude::*;
//!
//! let parameters = ModelParameters {
//!     beta: 0.0005,
//!     alpha: 0.2,
//!     phi: 0.1,
//!     delta: 0.1,
//!     rho: 0.5,
//!     p: 0.3,
//!     ..ModelParameters::default()
//! };
//! let inits = CompartmentState::new(0.0, 10.0, 0.0, 0.0, 990.0);
//! let output = step(
//!     &inits,
//!     &SimulationContext::new(2, 1000.0),
//!     &InitialConditions::default(),
//!     &parameters,
//! );
//! assert_state_eq!(output.next_state, [4.95, 8.0, 0.0, 1.0, 985.05], 1e-9);
//! assert_almost_eq!(output.migrating_infectious, 8.0, 1e-9);
//! ```
pub mod compartments;
pub mod config;
pub mod error;
pub mod log;
pub mod macros;
pub mod model;
pub mod node;
pub mod numeric;
pub mod parameters;
pub mod prelude;
pub mod report;
pub mod runner;
pub mod step;

pub use error::SeqiahrError;
