//! One discrete-time SEQIAHR step for a single node.
//!
//! The step is an explicit Euler update of length one:
//!
//! ```text
//! L  = beta * S * (I + A + (1 - rho) * H)
//! E' = E + L - alpha*E
//! I' = I + (1-p)*alpha*E - (phi+delta)*I
//! A' = A + p*alpha*E - delta*A
//! H' = H + phi*I - delta*H
//! S' = S - L
//! ```
//!
//! Every right-hand side reads the values selected at the start of the step (after the
//! optional vaccination event), never a value updated earlier in the same step.
//!
//! Nothing is clamped. Rates outside their natural ranges produce negative or
//! non-finite compartments; callers that want those rejected use
//! [`step_validated`] with [`Validation::Strict`].
use std::borrow::Borrow;

use log::trace;
use serde::{Deserialize, Serialize};

use crate::compartments::{CompartmentState, STATE_LEN};
use crate::error::SeqiahrError;
use crate::parameters::{InitialConditions, ModelParameters};

/// Everything the host engine knows about the call besides state and parameters.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SimulationContext {
    /// 1-based step counter. Step 1 starts from the initial conditions.
    pub simstep: u32,
    /// Total node population `N`.
    pub totpop: f64,
    /// Infectious individuals arriving from neighbouring nodes. Not used by the step.
    pub theta: f64,
    /// Total individuals arriving from neighbouring nodes. Not used by the step.
    pub npass: f64,
    /// Extra per-node values supplied by the host. Not used by the step.
    pub values: Vec<f64>,
    /// Label of the owning simulation, if the host provides one. Not used by the step.
    pub model: Option<String>,
}

impl SimulationContext {
    #[must_use]
    pub fn new(simstep: u32, totpop: f64) -> Self {
        SimulationContext {
            simstep,
            totpop,
            ..Default::default()
        }
    }

    /// Sets the coupling signals from neighbouring nodes.
    #[must_use]
    pub fn with_coupling(mut self, theta: f64, npass: f64) -> Self {
        self.theta = theta;
        self.npass = npass;
        self
    }

    #[must_use]
    pub fn is_first_step(&self) -> bool {
        self.simstep == 1
    }
}

/// Result of one step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepOutput {
    /// `(E', I', A', H', S')`, fed back as `inits` on the next step.
    pub next_state: CompartmentState,
    /// New cases this step, `L`.
    pub new_infections: f64,
    /// `I' + A'`, infectious individuals available to travel.
    pub migrating_infectious: f64,
    /// `N - S + E + I + A + H` over the values the step started from. Reported only.
    pub recovered: f64,
}

impl StepOutput {
    /// The host engine's return shape: state in variable order, incidence, migrating
    /// infectious.
    #[must_use]
    pub fn into_parts(self) -> ([f64; STATE_LEN], f64, f64) {
        (
            self.next_state.to_array(),
            self.new_infections,
            self.migrating_infectious,
        )
    }
}

/// Whether a step checks its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Validation {
    /// Return whatever the arithmetic produced.
    #[default]
    Off,
    /// Reject negative or non-finite compartments with `SeqiahrError::InvalidState`.
    Strict,
}

/// Picks the state a step starts from: the initial conditions on step 1, `inits`
/// otherwise.
#[must_use]
pub fn select_state(
    inits: &CompartmentState,
    context: &SimulationContext,
    initial_conditions: &InitialConditions,
) -> CompartmentState {
    if context.is_first_step() {
        initial_conditions.to_state()
    } else {
        *inits
    }
}

/// Advances one node by one step. `inits` is ignored on step 1 and
/// `initial_conditions` on every other step.
#[must_use]
pub fn step(
    inits: &CompartmentState,
    context: &SimulationContext,
    initial_conditions: &InitialConditions,
    parameters: &ModelParameters,
) -> StepOutput {
    let CompartmentState {
        exposed: e,
        infectious: i,
        asymptomatic: a,
        hospitalized: h,
        susceptible: mut s,
    } = select_state(inits, context, initial_conditions);
    let n = context.totpop;
    let &ModelParameters {
        beta,
        alpha,
        phi,
        delta,
        rho,
        p,
        vaccine_now,
        vaccov,
        ..
    } = parameters;

    if vaccine_now {
        s -= vaccov * s;
    }

    let new_infections = beta * s * (i + a + (1.0 - rho) * h);

    let next_state = CompartmentState {
        exposed: e + new_infections - alpha * e,
        infectious: i + (1.0 - p) * alpha * e - (phi + delta) * i,
        asymptomatic: a + p * alpha * e - delta * a,
        hospitalized: h + phi * i - delta * h,
        susceptible: s - new_infections,
    };
    let recovered = n - s + e + i + a + h;
    let migrating_infectious = next_state.infectious + next_state.asymptomatic;

    trace!(
        "step {}: new infections {}, migrating infectious {}",
        context.simstep,
        new_infections,
        migrating_infectious
    );

    StepOutput {
        next_state,
        new_infections,
        migrating_infectious,
        recovered,
    }
}

/// Checks that every compartment is finite and non-negative.
///
/// # Errors
///
/// Returns `SeqiahrError::InvalidState` for the first offending compartment.
pub fn validate_state(state: &CompartmentState, simstep: u32) -> Result<(), SeqiahrError> {
    match state
        .iter()
        .find(|(_, value)| !value.is_finite() || *value < 0.0)
    {
        Some((compartment, value)) => Err(SeqiahrError::InvalidState {
            simstep,
            compartment,
            value,
        }),
        None => Ok(()),
    }
}

/// [`step`] followed by a check of the result according to `validation`.
///
/// # Errors
///
/// Under `Validation::Strict`, returns `SeqiahrError::InvalidState` when a compartment
/// of the next state is negative or non-finite.
pub fn step_validated(
    inits: &CompartmentState,
    context: &SimulationContext,
    initial_conditions: &InitialConditions,
    parameters: &ModelParameters,
    validation: Validation,
) -> Result<StepOutput, SeqiahrError> {
    let output = step(inits, context, initial_conditions, parameters);
    if validation == Validation::Strict {
        validate_state(&output.next_state, context.simstep)?;
    }
    Ok(output)
}

/// Runs a step directly on the host engine's containers: a positional `inits` list and
/// key-value maps for initial conditions and parameters.
///
/// On step 1 the initial-condition map is decoded and `inits` is ignored. On every
/// later step the map is ignored and `inits` must hold exactly five values.
///
/// # Errors
///
/// Returns `SeqiahrError::MissingParameter` for an absent key, or a `SeqiahrError`
/// message when `inits` has the wrong length.
pub fn step_from_maps<K1, V1, I1, K2, V2, I2>(
    inits: &[f64],
    context: &SimulationContext,
    initial_conditions: I1,
    parameters: I2,
) -> Result<StepOutput, SeqiahrError>
where
    K1: AsRef<[u8]>,
    V1: Borrow<f64>,
    I1: IntoIterator<Item = (K1, V1)>,
    K2: AsRef<[u8]>,
    V2: Borrow<f64>,
    I2: IntoIterator<Item = (K2, V2)>,
{
    let parameters = ModelParameters::from_map(parameters)?;
    if context.is_first_step() {
        let initial_conditions = InitialConditions::from_map(initial_conditions)?;
        return Ok(step(
            &CompartmentState::default(),
            context,
            &initial_conditions,
            &parameters,
        ));
    }
    let values: [f64; STATE_LEN] = inits.try_into().map_err(|_| {
        SeqiahrError::SeqiahrError(format!(
            "expected {} state values, got {}",
            STATE_LEN,
            inits.len()
        ))
    })?;
    Ok(step(
        &CompartmentState::from(values),
        context,
        &InitialConditions::default(),
        &parameters,
    ))
}
