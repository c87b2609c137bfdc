//! 批量工作流执行器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责批量工作流的启动和跟踪。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：日志文件、编排器（检索 / 分析 / 存储）
//! 2. **批量加载**：扫描并加载所有工作流请求（`*.toml`）
//! 3. **后台执行**：每个请求一个工作流，全部立即启动
//! 4. **并发轮询**：同时轮询所有工作流，记录进度变化
//! 5. **全局统计**：汇总完成与失败数量

use anyhow::{Context, Result};
use futures::future::join_all;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::models::loaders::load_all_requests;
use crate::models::state::{WorkflowState, WorkflowStatus};
use crate::models::workflow::{WorkflowId, WorkflowRequest};
use crate::orchestrator::workflow_orchestrator::WorkflowOrchestrator;
use crate::utils::logging::{
    init_log_file, log_progress, log_requests_loaded, log_startup, log_terminal, print_final_stats,
};

/// 应用主结构
pub struct App {
    config: Config,
    orchestrator: WorkflowOrchestrator,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        init_log_file(&config.output_log_file)?;

        log_startup(&config.llm_model_name, &config.results_dir);

        let orchestrator =
            WorkflowOrchestrator::from_config(&config).context("无法创建工作流编排器")?;

        Ok(Self::with_orchestrator(config, orchestrator))
    }

    /// 使用已有的编排器创建应用
    pub fn with_orchestrator(config: Config, orchestrator: WorkflowOrchestrator) -> Self {
        Self {
            config,
            orchestrator,
        }
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<BatchStats> {
        let requests = self.load_requests().await?;

        if requests.is_empty() {
            warn!("⚠️ 没有找到待执行的TOML请求文件，程序结束");
            return Ok(BatchStats::default());
        }

        log_requests_loaded(requests.len());

        let stats = self.run_all(requests).await;

        print_final_stats(
            stats.completed,
            stats.failed,
            stats.total,
            &self.config.output_log_file,
        );

        Ok(stats)
    }

    /// 加载请求
    async fn load_requests(&self) -> Result<Vec<(PathBuf, WorkflowRequest)>> {
        info!("\n📁 正在扫描待执行的工作流请求...");
        load_all_requests(&self.config.requests_folder).await
    }

    /// 启动所有请求并等待它们结束
    pub async fn run_all(&self, requests: Vec<(PathBuf, WorkflowRequest)>) -> BatchStats {
        let mut stats = BatchStats {
            total: requests.len(),
            ..Default::default()
        };

        let mut started = Vec::new();
        for (path, request) in requests {
            let label = path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| request.query.clone());

            match self.orchestrator.start(request).await {
                Ok(workflow_id) => {
                    info!("[{}] 🚀 已启动工作流 {}", label, workflow_id);
                    started.push((label, workflow_id));
                }
                Err(e) => {
                    error!("[{}] ❌ 工作流启动失败: {}", label, e);
                    stats.failed += 1;
                }
            }
        }

        let poll_interval = Duration::from_millis(self.config.poll_interval_ms);
        let watchers = started
            .iter()
            .map(|(label, id)| self.watch(label, id, poll_interval));

        for outcome in join_all(watchers).await {
            match outcome {
                Some(state) if state.status == WorkflowStatus::Completed => stats.completed += 1,
                _ => stats.failed += 1,
            }
        }

        stats
    }

    /// 轮询单个工作流直到终止状态，进度变化时记录日志
    async fn watch(
        &self,
        label: &str,
        workflow_id: &WorkflowId,
        poll_interval: Duration,
    ) -> Option<WorkflowState> {
        let label = format!("[{} {}]", label, workflow_id);
        let mut last_progress = None;

        loop {
            let state = match self.orchestrator.status(workflow_id).await {
                Ok(state) => state,
                Err(e) => {
                    error!("{} 状态查询失败: {}", label, e);
                    return None;
                }
            };

            if last_progress.as_ref() != Some(&state.progress) {
                log_progress(&label, &state.progress);
                last_progress = Some(state.progress.clone());
            }

            if state.is_terminal() {
                log_terminal(&label, state.status, state.error.as_deref());
                return Some(state);
            }

            tokio::time::sleep(poll_interval).await;
        }
    }
}

/// 批量执行统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchStats {
    pub completed: usize,
    pub failed: usize,
    pub total: usize,
}
