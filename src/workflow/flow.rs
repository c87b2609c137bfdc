//! 工作流执行流程 - 流程层
//!
//! 核心职责：定义"一个工作流"从检索到完成的完整执行流程
//!
//! 流程顺序：
//! 1. 检索论文（失败 → Failed）
//! 2. 没有论文 → Completed（附说明）
//! 3. 记录论文列表
//! 4. 按类型逐步执行（分析失败只降级该步骤的结果）
//! 5. 持久化结果（失败只记录警告）→ Completed
//!
//! 该工作流的状态只由这里写入。

use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::error::{AppError, WorkflowError};
use crate::models::results::WorkflowResults;
use crate::models::state::{Progress, StateUpdate};
use crate::orchestrator::state_store::WorkflowStore;
use crate::services::{Analyzer, PaperSource, ResultStore};
use crate::utils::logging::truncate_text;
use crate::workflow::ctx::WorkflowCtx;
use crate::workflow::registry::StepKind;
use crate::workflow::steps::{self, PlannedStep};

/// 没有检索到论文时的说明
pub const NO_PAPERS_NOTE: &str = "No papers found for the given query";

/// 工作流执行流程
///
/// - 编排单个工作流的步骤顺序
/// - 决定何时调用分析器、何时本地合成、何时降级
/// - 只依赖业务能力（services）和状态存储
pub struct WorkflowFlow {
    paper_source: Arc<dyn PaperSource>,
    analyzer: Arc<dyn Analyzer>,
    result_store: Arc<dyn ResultStore>,
    store: Arc<dyn WorkflowStore>,
}

impl WorkflowFlow {
    pub fn new(
        paper_source: Arc<dyn PaperSource>,
        analyzer: Arc<dyn Analyzer>,
        result_store: Arc<dyn ResultStore>,
        store: Arc<dyn WorkflowStore>,
    ) -> Self {
        Self {
            paper_source,
            analyzer,
            result_store,
            store,
        }
    }

    /// 执行工作流直到终止状态
    pub async fn run(&self, ctx: &WorkflowCtx) {
        let request = &ctx.request;
        let plan = steps::plan(request.workflow_type, request.instructions().is_some());
        let mut results = WorkflowResults::new(request.workflow_type);

        info!("{} 🚀 开始执行: {}", ctx, truncate_text(&request.query, 60));

        if let Err(e) = self.execute(ctx, &plan, &mut results).await {
            error!("{} ❌ 工作流失败: {}", ctx, e);
            self.fail(ctx, e.to_string(), results).await;
        }
    }

    /// 执行例程异常退出后，以存储中已有的部分结果结束为失败
    pub(crate) async fn abort(&self, ctx: &WorkflowCtx, error: String) {
        let partial = match self.store.get(&ctx.workflow_id).await {
            Some(state) => state.results,
            None => WorkflowResults::new(ctx.request.workflow_type),
        };
        self.fail(ctx, error, partial).await;
    }

    /// 以失败结束（携带已有的部分结果）
    async fn fail(&self, ctx: &WorkflowCtx, error: String, partial: WorkflowResults) {
        let update = StateUpdate::Fail { error, partial };
        if let Err(e) = self.store.update(&ctx.workflow_id, update).await {
            error!("{} 无法记录失败状态: {}", ctx, e);
        }
    }

    async fn execute(
        &self,
        ctx: &WorkflowCtx,
        plan: &[PlannedStep],
        results: &mut WorkflowResults,
    ) -> Result<(), AppError> {
        let request = &ctx.request;
        let total = plan.len();

        // ========== 步骤 1: 检索论文 ==========
        self.report(ctx, 1, total, steps::SEARCH_STEP_NAME).await?;

        let papers = self
            .paper_source
            .search(&request.query, request.max_results)
            .await?;

        if papers.is_empty() {
            info!("{} ⚠️ {}", ctx, NO_PAPERS_NOTE);
            self.store
                .update(
                    &ctx.workflow_id,
                    StateUpdate::Complete(WorkflowResults::no_papers(
                        request.workflow_type,
                        NO_PAPERS_NOTE,
                    )),
                )
                .await?;
            return Ok(());
        }

        info!("{} ✓ 找到 {} 篇论文", ctx, papers.len());
        results.record_papers(papers);
        self.publish(ctx, results).await?;

        // ========== 步骤 2..N: 按类型执行 ==========
        for (index, step) in plan.iter().enumerate().skip(1) {
            self.report(ctx, index + 1, total, step.name).await?;
            self.run_step(ctx, step.kind, results).await;
            self.publish(ctx, results).await?;
        }

        // ========== 持久化 ==========
        match self
            .result_store
            .save(&ctx.workflow_id, &request.query, results)
            .await
        {
            Ok(path) => info!("{} 💾 结果已保存: {}", ctx, path.display()),
            Err(e) => warn!("{} ⚠️ 结果保存失败（不影响完成状态）: {}", ctx, e),
        }

        self.store
            .update(&ctx.workflow_id, StateUpdate::Complete(results.clone()))
            .await?;

        info!("{} ✅ 工作流完成", ctx);
        Ok(())
    }

    /// 执行单个步骤；分析失败时写入降级结果，不向上传播
    async fn run_step(&self, ctx: &WorkflowCtx, kind: StepKind, results: &mut WorkflowResults) {
        let Some(task) = kind.task() else {
            match steps::synthesize(kind, results) {
                Some(entry) => results.insert(entry),
                None => debug!("{} 收尾步骤，无需处理", ctx),
            }
            return;
        };

        let request = &ctx.request;
        let outcome = {
            let papers = results.papers();
            match self
                .analyzer
                .run(papers, task, &request.model, request.instructions())
                .await
            {
                Ok(output) => steps::analysis_entry(kind, output, papers).map(|e| (e, false)),
                Err(e) => {
                    warn!("{} ⚠️ 分析步骤 {} 失败，使用降级结果: {}", ctx, task, e);
                    steps::degraded_entry(kind, &e, papers).map(|e| (e, true))
                }
            }
        };

        match outcome {
            Some((entry, false)) => results.insert(entry),
            Some((entry, true)) => results.insert_degraded(entry),
            None => debug!("{} 步骤 {:?} 没有结果项", ctx, kind),
        }
    }

    async fn report(
        &self,
        ctx: &WorkflowCtx,
        current: usize,
        total: usize,
        step_name: &str,
    ) -> Result<(), WorkflowError> {
        info!("{} ▶ [{}/{}] {}", ctx, current, total, step_name);
        self.store
            .update(
                &ctx.workflow_id,
                StateUpdate::Progress(Progress::new(current, total, step_name)),
            )
            .await
    }

    /// 公开当前的部分结果
    async fn publish(
        &self,
        ctx: &WorkflowCtx,
        results: &WorkflowResults,
    ) -> Result<(), WorkflowError> {
        self.store
            .update(&ctx.workflow_id, StateUpdate::Results(results.clone()))
            .await
    }
}
