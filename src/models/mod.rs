pub mod comparison;
pub mod llm_model;
pub mod loaders;
pub mod paper;
pub mod results;
pub mod state;
pub mod workflow;

pub use comparison::{ComparisonItem, ComparisonResult};
pub use llm_model::{available_models, model_info, ModelInfo, DEFAULT_MODEL};
pub use loaders::{load_all_requests, load_request};
pub use paper::Paper;
pub use results::{ResultEntry, ResultKey, WorkflowResults};
pub use state::{Progress, StateUpdate, WorkflowState, WorkflowStatus};
pub use workflow::{WorkflowId, WorkflowRequest, WorkflowType};
