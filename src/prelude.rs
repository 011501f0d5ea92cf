pub use crate::compartments::{Compartment, CompartmentState, STATE_LEN, VARIABLE_NAMES};
pub use crate::config::NodeConfig;
pub use crate::error::SeqiahrError;
pub use crate::log::{debug, error, info, trace, warn};
pub use crate::model::{ModelRegistry, NodeModel, Seqiahr};
pub use crate::node::{run_node, step_nodes, NodeInput, NodeSeries, StepRecord};
pub use crate::parameters::{InitialConditions, ModelParameters};
pub use crate::report::StepReport;
pub use crate::step::{
    step, step_from_maps, step_validated, SimulationContext, StepOutput, Validation,
};
pub use crate::{assert_almost_eq, assert_state_eq};
