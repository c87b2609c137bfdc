pub mod ctx;
pub mod flow;
pub mod registry;
pub mod steps;

pub use ctx::WorkflowCtx;
pub use flow::WorkflowFlow;
pub use registry::{definition, definitions, StepKind, WorkflowDefinition};
pub use steps::PlannedStep;
