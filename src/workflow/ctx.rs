//! 工作流执行上下文
//!
//! 封装"我正在执行哪个工作流"这一信息

use std::fmt::Display;

use crate::models::workflow::{WorkflowId, WorkflowRequest};

/// 工作流执行上下文
#[derive(Debug, Clone)]
pub struct WorkflowCtx {
    /// 工作流 ID
    pub workflow_id: WorkflowId,

    /// 原始请求（不可变）
    pub request: WorkflowRequest,
}

impl WorkflowCtx {
    pub fn new(workflow_id: WorkflowId, request: WorkflowRequest) -> Self {
        Self {
            workflow_id,
            request,
        }
    }
}

impl Display for WorkflowCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[工作流 {} {}]",
            self.workflow_id, self.request.workflow_type
        )
    }
}
