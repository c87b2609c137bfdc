//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责工作流生命周期和批量调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `state_store` - 工作流状态存储
//! - 编排器唯一的共享资源（`RwLock<HashMap>`）
//! - 插入 / 查询 / 单写者更新 / 列表
//!
//! ### `workflow_orchestrator` - 工作流编排器
//! - 分配 ID，登记 Running 状态
//! - 后台执行 `workflow::WorkflowFlow`，立即返回 ID
//! - 状态查询
//!
//! ### `batch_processor` - 批量工作流执行器
//! - 加载请求文件，启动所有工作流
//! - 并发轮询，记录进度，输出全局统计
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<WorkflowRequest>)
//!     ↓
//! workflow_orchestrator (start / status)
//!     ↓
//! workflow::WorkflowFlow (执行单个工作流)
//!     ↓
//! services (能力层：paper_source / analyzer / result_store)
//!     ↓
//! clients (arXiv / LLM)
//! ```

pub mod batch_processor;
pub mod state_store;
pub mod workflow_orchestrator;

// 重新导出主要类型
pub use batch_processor::{App, BatchStats};
pub use state_store::{InMemoryWorkflowStore, WorkflowStore};
pub use workflow_orchestrator::WorkflowOrchestrator;
