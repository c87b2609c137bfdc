//! 工作流编排器 - 编排层
//!
//! ## 职责
//!
//! - 分配工作流 ID，登记 Running 状态
//! - 把执行例程作为独立任务放到后台运行，立即返回 ID
//! - 提供状态查询（任意时刻都是一致的快照）
//!
//! 编排器只保留工作流 ID 作为句柄，与执行例程的所有交互都经过状态存储。

use chrono::Local;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::clients::LlmClient;
use crate::config::Config;
use crate::error::{AppResult, WorkflowError};
use crate::models::state::WorkflowState;
use crate::models::workflow::{WorkflowId, WorkflowRequest};
use crate::orchestrator::state_store::{InMemoryWorkflowStore, WorkflowStore};
use crate::services::{
    Analyzer, ArxivPaperSource, JsonFileResultStore, LlmAnalyzer, PaperSource, ResultStore,
};
use crate::workflow::{registry, WorkflowCtx, WorkflowDefinition, WorkflowFlow};

/// 分配 ID 时的最大尝试次数
const MAX_ID_ATTEMPTS: usize = 8;

/// 工作流编排器
#[derive(Clone)]
pub struct WorkflowOrchestrator {
    flow: Arc<WorkflowFlow>,
    store: Arc<dyn WorkflowStore>,
}

impl WorkflowOrchestrator {
    /// 用给定的协作者创建编排器
    pub fn new(
        paper_source: Arc<dyn PaperSource>,
        analyzer: Arc<dyn Analyzer>,
        result_store: Arc<dyn ResultStore>,
        store: Arc<dyn WorkflowStore>,
    ) -> Self {
        let flow = WorkflowFlow::new(paper_source, analyzer, result_store, Arc::clone(&store));
        Self {
            flow: Arc::new(flow),
            store,
        }
    }

    /// 按配置创建：arXiv 检索 + LLM 分析 + JSON 文件存储 + 内存状态存储
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let paper_source = ArxivPaperSource::new(config)?;
        let analyzer = LlmAnalyzer::new(LlmClient::new(config));
        let result_store = JsonFileResultStore::new(&config.results_dir);

        Ok(Self::new(
            Arc::new(paper_source),
            Arc::new(analyzer),
            Arc::new(result_store),
            Arc::new(InMemoryWorkflowStore::new()),
        ))
    }

    /// 启动工作流
    ///
    /// 返回时新状态已经可以通过 `status()` 查到；执行在后台进行
    pub async fn start(&self, request: WorkflowRequest) -> AppResult<WorkflowId> {
        request.validate()?;

        let workflow_id = self.register(&request).await?;
        let ctx = WorkflowCtx::new(workflow_id.clone(), request);
        info!("{} 📝 已登记，后台执行", ctx);

        let flow = Arc::clone(&self.flow);
        tokio::spawn(execute(flow, ctx));

        Ok(workflow_id)
    }

    /// 分配 ID 并登记 Running 状态（ID 冲突时重新生成）
    async fn register(&self, request: &WorkflowRequest) -> Result<WorkflowId, WorkflowError> {
        let mut last_err = None;
        for _ in 0..MAX_ID_ATTEMPTS {
            let workflow_id = WorkflowId::generate();
            let state = WorkflowState::new(workflow_id.clone(), request, Local::now());

            match self.store.insert(state).await {
                Ok(()) => return Ok(workflow_id),
                Err(e @ WorkflowError::DuplicateId { .. }) => {
                    warn!("工作流 ID 冲突，重新生成: {}", workflow_id);
                    last_err = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_err.unwrap_or_else(|| WorkflowError::InvalidRequest {
            reason: "无法分配工作流 ID".to_string(),
        }))
    }

    /// 查询工作流状态快照
    pub async fn status(&self, workflow_id: &WorkflowId) -> Result<WorkflowState, WorkflowError> {
        match self.store.get(workflow_id).await {
            Some(state) => Ok(state),
            None => {
                debug!("查询不存在的工作流: {}", workflow_id);
                Err(WorkflowError::NotFound {
                    workflow_id: workflow_id.to_string(),
                })
            }
        }
    }

    /// 所有已知工作流的快照
    pub async fn workflows(&self) -> Vec<WorkflowState> {
        self.store.list().await
    }

    /// 可用的工作流定义
    pub fn definitions(&self) -> Vec<WorkflowDefinition> {
        registry::definitions()
    }
}

/// 后台执行例程
///
/// 执行例程 panic 时以失败结束，保留已有的部分结果
async fn execute(flow: Arc<WorkflowFlow>, ctx: WorkflowCtx) {
    let runner = Arc::clone(&flow);
    let run_ctx = ctx.clone();
    let handle = tokio::spawn(async move { runner.run(&run_ctx).await });

    if let Err(e) = handle.await {
        error!("{} ❌ 执行例程异常退出: {}", ctx, e);
        flow.abort(&ctx, format!("Workflow execution aborted: {}", e)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::workflow::WorkflowType;

    #[tokio::test]
    async fn test_invalid_request_rejected_before_registration() {
        let orchestrator = WorkflowOrchestrator::from_config(&Config::default()).unwrap();

        let request = WorkflowRequest::new("   ", WorkflowType::LiteratureReview);
        let err = orchestrator.start(request).await.unwrap_err();
        assert!(err.to_string().contains("工作流请求无效"));
        assert!(orchestrator.workflows().await.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let orchestrator = WorkflowOrchestrator::from_config(&Config::default()).unwrap();
        let err = orchestrator
            .status(&WorkflowId::from("00000000"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            WorkflowError::NotFound {
                workflow_id: "00000000".into()
            }
        );
    }

    #[test]
    fn test_definitions_cover_all_types() {
        let defs = registry::definitions();
        let types: Vec<_> = defs.iter().map(|d| d.workflow_type).collect();
        assert_eq!(types, WorkflowType::ALL.to_vec());
    }
}
