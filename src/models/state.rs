//! 工作流状态机
//!
//! `Running → Completed` 或 `Running → Failed`，两个终止状态都不可再迁移。
//! 进度的当前步骤单调不减，且不超过总步骤数。

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::error::WorkflowError;
use crate::models::results::WorkflowResults;
use crate::models::workflow::{WorkflowId, WorkflowRequest, WorkflowType};

/// 初始进度的步骤名称
pub const INITIAL_STEP_NAME: &str = "Initializing";

/// 工作流状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    Running,
    Completed,
    Failed,
}

impl WorkflowStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, WorkflowStatus::Running)
    }
}

impl std::fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            WorkflowStatus::Running => "running",
            WorkflowStatus::Completed => "completed",
            WorkflowStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// 工作流进度
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub current_step: usize,
    pub total_steps: usize,
    pub step_name: String,
}

impl Progress {
    pub fn new(current_step: usize, total_steps: usize, step_name: impl Into<String>) -> Self {
        Self {
            current_step,
            total_steps,
            step_name: step_name.into(),
        }
    }

    /// {0, 0, "Initializing"}
    pub fn initializing() -> Self {
        Self::new(0, 0, INITIAL_STEP_NAME)
    }
}

impl std::fmt::Display for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{} {}",
            self.current_step, self.total_steps, self.step_name
        )
    }
}

/// 对工作流状态的一次修改
#[derive(Debug, Clone)]
pub enum StateUpdate {
    /// 进入下一步
    Progress(Progress),
    /// 用最新的部分结果替换当前结果
    Results(WorkflowResults),
    /// 成功完成
    Complete(WorkflowResults),
    /// 失败（携带失败时已有的部分结果）
    Fail {
        error: String,
        partial: WorkflowResults,
    },
}

/// 工作流状态快照
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowState {
    pub workflow_id: WorkflowId,
    pub workflow_type: WorkflowType,
    pub query: String,
    pub status: WorkflowStatus,
    pub progress: Progress,
    pub results: WorkflowResults,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: DateTime<Local>,
    pub updated_at: DateTime<Local>,
}

impl WorkflowState {
    /// 新建一个 Running 状态，进度为 {0, 0, "Initializing"}，结果为空
    pub fn new(workflow_id: WorkflowId, request: &WorkflowRequest, now: DateTime<Local>) -> Self {
        Self {
            workflow_id,
            workflow_type: request.workflow_type,
            query: request.query.clone(),
            status: WorkflowStatus::Running,
            progress: Progress::initializing(),
            results: WorkflowResults::new(request.workflow_type),
            error: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// 应用一次修改
    ///
    /// 终止状态拒绝任何修改；进度回退或越界会被拒绝。
    pub fn apply(
        &mut self,
        update: StateUpdate,
        now: DateTime<Local>,
    ) -> Result<(), WorkflowError> {
        if self.is_terminal() {
            return Err(WorkflowError::AlreadyTerminal {
                workflow_id: self.workflow_id.to_string(),
                status: self.status.to_string(),
            });
        }

        match update {
            StateUpdate::Progress(progress) => {
                if progress.current_step < self.progress.current_step
                    || progress.current_step > progress.total_steps
                {
                    return Err(WorkflowError::InvalidProgress {
                        workflow_id: self.workflow_id.to_string(),
                        previous: self.progress.current_step,
                        current: progress.current_step,
                        total: progress.total_steps,
                    });
                }
                self.progress = progress;
            }
            StateUpdate::Results(results) => {
                self.results = results;
            }
            StateUpdate::Complete(results) => {
                self.results = results;
                self.status = WorkflowStatus::Completed;
            }
            StateUpdate::Fail { error, partial } => {
                self.results = partial;
                self.error = Some(error);
                self.status = WorkflowStatus::Failed;
            }
        }

        // updated_at 不回退
        self.updated_at = now.max(self.updated_at);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::results::ResultEntry;
    use chrono::Duration;

    fn running_state() -> WorkflowState {
        let request = WorkflowRequest::new("diffusion models", WorkflowType::LiteratureReview);
        WorkflowState::new(WorkflowId::from("abcd1234"), &request, Local::now())
    }

    #[test]
    fn test_new_state_is_initializing() {
        let state = running_state();
        assert_eq!(state.status, WorkflowStatus::Running);
        assert_eq!(state.progress, Progress::new(0, 0, "Initializing"));
        assert!(state.results.is_empty());
        assert!(state.error.is_none());
        assert_eq!(state.created_at, state.updated_at);
    }

    #[test]
    fn test_progress_must_not_regress() {
        let mut state = running_state();
        let now = Local::now();
        state.apply(StateUpdate::Progress(Progress::new(2, 5, "Generating Summary")), now).unwrap();

        let err = state
            .apply(StateUpdate::Progress(Progress::new(1, 5, "Searching arXiv")), now)
            .unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidProgress { previous: 2, current: 1, .. }));
        assert_eq!(state.progress.current_step, 2);
    }

    #[test]
    fn test_progress_must_not_exceed_total() {
        let mut state = running_state();
        let err = state
            .apply(StateUpdate::Progress(Progress::new(4, 3, "Overflow")), Local::now())
            .unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidProgress { .. }));
    }

    #[test]
    fn test_terminal_states_are_absorbing() {
        let mut state = running_state();
        let mut results = WorkflowResults::new(WorkflowType::LiteratureReview);
        results.insert(ResultEntry::Summary("done".into()));
        state.apply(StateUpdate::Complete(results.clone()), Local::now()).unwrap();
        assert_eq!(state.status, WorkflowStatus::Completed);

        let err = state
            .apply(
                StateUpdate::Fail {
                    error: "late failure".into(),
                    partial: WorkflowResults::new(WorkflowType::LiteratureReview),
                },
                Local::now(),
            )
            .unwrap_err();
        assert!(matches!(err, WorkflowError::AlreadyTerminal { .. }));
        assert_eq!(state.status, WorkflowStatus::Completed);
        assert_eq!(state.results, results);
        assert!(state.error.is_none());
    }

    #[test]
    fn test_fail_keeps_partial_results() {
        let mut state = running_state();
        let mut partial = WorkflowResults::new(WorkflowType::LiteratureReview);
        partial.insert(ResultEntry::Summary("half".into()));

        state
            .apply(
                StateUpdate::Fail {
                    error: "boom".into(),
                    partial,
                },
                Local::now(),
            )
            .unwrap();

        assert_eq!(state.status, WorkflowStatus::Failed);
        assert_eq!(state.error.as_deref(), Some("boom"));
        assert!(state.results.contains(crate::models::results::ResultKey::Summary));
    }

    #[test]
    fn test_updated_at_never_goes_backwards() {
        let mut state = running_state();
        let later = state.updated_at + Duration::seconds(10);
        state.apply(StateUpdate::Progress(Progress::new(1, 5, "a")), later).unwrap();
        assert_eq!(state.updated_at, later);

        let earlier = later - Duration::seconds(60);
        state.apply(StateUpdate::Progress(Progress::new(2, 5, "b")), earlier).unwrap();
        assert_eq!(state.updated_at, later);
    }
}
