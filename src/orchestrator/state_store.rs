//! 工作流状态存储
//!
//! 编排器持有的唯一共享资源。每个条目只有一个写者（该工作流自己的执行例程），
//! 插入和查询可以被多个工作流并发调用。

use async_trait::async_trait;
use chrono::Local;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::WorkflowError;
use crate::models::state::{StateUpdate, WorkflowState};
use crate::models::workflow::WorkflowId;

/// 状态存储（可注入测试替身）
#[async_trait]
pub trait WorkflowStore: Send + Sync {
    /// 登记新工作流；ID 已存在时返回 `DuplicateId`
    async fn insert(&self, state: WorkflowState) -> Result<(), WorkflowError>;

    /// 获取状态快照
    async fn get(&self, id: &WorkflowId) -> Option<WorkflowState>;

    /// 对某个工作流应用一次修改
    async fn update(&self, id: &WorkflowId, update: StateUpdate) -> Result<(), WorkflowError>;

    /// 所有工作流的快照（按创建时间排序）
    async fn list(&self) -> Vec<WorkflowState>;
}

/// 内存状态存储
///
/// 进程生命周期内保留所有工作流，不做过期清理
pub struct InMemoryWorkflowStore {
    workflows: Arc<RwLock<HashMap<WorkflowId, WorkflowState>>>,
}

impl InMemoryWorkflowStore {
    pub fn new() -> Self {
        Self {
            workflows: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryWorkflowStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WorkflowStore for InMemoryWorkflowStore {
    async fn insert(&self, state: WorkflowState) -> Result<(), WorkflowError> {
        let mut store = self.workflows.write().await;
        if store.contains_key(&state.workflow_id) {
            return Err(WorkflowError::DuplicateId {
                workflow_id: state.workflow_id.to_string(),
            });
        }
        store.insert(state.workflow_id.clone(), state);
        Ok(())
    }

    async fn get(&self, id: &WorkflowId) -> Option<WorkflowState> {
        let store = self.workflows.read().await;
        store.get(id).cloned()
    }

    async fn update(&self, id: &WorkflowId, update: StateUpdate) -> Result<(), WorkflowError> {
        let mut store = self.workflows.write().await;
        match store.get_mut(id) {
            Some(state) => state.apply(update, Local::now()),
            None => Err(WorkflowError::NotFound {
                workflow_id: id.to_string(),
            }),
        }
    }

    async fn list(&self) -> Vec<WorkflowState> {
        let store = self.workflows.read().await;
        let mut states: Vec<WorkflowState> = store.values().cloned().collect();
        states.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.workflow_id.cmp(&b.workflow_id))
        });
        states
    }
}
