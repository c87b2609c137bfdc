//! # Research Automation
//!
//! 对 arXiv 论文检索结果运行多步骤 LLM 分析工作流的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 客户端层（Clients）
//! - `clients/` - 对外部服务的 HTTP 调用
//! - `ArxivClient` - arXiv 检索与 Atom 解析
//! - `LlmClient` - OpenAI 兼容的对话接口
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，对编排器而言是不透明的调用
//! - `PaperSource` - 检索论文能力
//! - `Analyzer` - 分析论文能力（总结 / 对比 / 空白 / 趋势 / 自定义）
//! - `ResultStore` - 持久化结果能力
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个工作流"的完整执行流程
//! - `registry` - 工作流定义（名称、描述、步骤）
//! - `WorkflowCtx` - 上下文封装（workflow_id + request）
//! - `WorkflowFlow` - 流程编排（检索 → 分析 → 合成 → 持久化）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/state_store` - 工作流状态存储
//! - `orchestrator/workflow_orchestrator` - 启动、后台执行、状态查询
//! - `orchestrator/batch_processor` - 批量执行请求文件
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{
    Paper, Progress, ResultEntry, ResultKey, WorkflowId, WorkflowRequest, WorkflowResults,
    WorkflowState, WorkflowStatus, WorkflowType,
};
pub use orchestrator::{App, InMemoryWorkflowStore, WorkflowOrchestrator, WorkflowStore};
pub use services::{AnalysisOutput, Analyzer, PaperSource, ResultStore, TaskKind};
pub use workflow::{WorkflowDefinition, WorkflowFlow};
