//! 工作流定义注册表
//!
//! 每种工作流类型对应一个展示名称、一段描述和一组有序步骤。
//! 这里只是声明式元数据，供调用方列出可用工作流；
//! 实际执行顺序由 `steps::plan` 给出，两者必须保持一致。

use serde::Serialize;

use crate::models::workflow::WorkflowType;
use crate::services::TaskKind;

/// 抽象步骤类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Search,
    Summarize,
    Compare,
    GapAnalysis,
    TrendAnalysis,
    CustomAnalysis,
    SynthesizeKeyFindings,
    GenerateRecommendations,
    ExtractMethodologyInsights,
    ExtractFutureDirections,
    Finalize,
}

impl StepKind {
    /// 需要调用分析器的步骤返回对应任务；本地合成步骤返回 None
    pub fn task(self) -> Option<TaskKind> {
        match self {
            StepKind::Summarize => Some(TaskKind::Summarize),
            StepKind::Compare => Some(TaskKind::Compare),
            StepKind::GapAnalysis => Some(TaskKind::GapAnalysis),
            StepKind::TrendAnalysis => Some(TaskKind::TrendAnalysis),
            StepKind::CustomAnalysis => Some(TaskKind::Custom),
            StepKind::Search
            | StepKind::SynthesizeKeyFindings
            | StepKind::GenerateRecommendations
            | StepKind::ExtractMethodologyInsights
            | StepKind::ExtractFutureDirections
            | StepKind::Finalize => None,
        }
    }
}

/// 工作流定义
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WorkflowDefinition {
    pub workflow_type: WorkflowType,
    pub name: &'static str,
    pub description: &'static str,
    pub steps: &'static [StepKind],
}

const LITERATURE_REVIEW_STEPS: &[StepKind] = &[
    StepKind::Search,
    StepKind::Summarize,
    StepKind::Compare,
    StepKind::GapAnalysis,
    StepKind::SynthesizeKeyFindings,
];

const GAP_ANALYSIS_STEPS: &[StepKind] = &[
    StepKind::Search,
    StepKind::Compare,
    StepKind::GapAnalysis,
    StepKind::GenerateRecommendations,
];

const METHODOLOGY_COMPARISON_STEPS: &[StepKind] = &[
    StepKind::Search,
    StepKind::Compare,
    StepKind::ExtractMethodologyInsights,
];

const TREND_ANALYSIS_STEPS: &[StepKind] = &[
    StepKind::Search,
    StepKind::TrendAnalysis,
    StepKind::ExtractFutureDirections,
];

const CUSTOM_STEPS: &[StepKind] = &[
    StepKind::Search,
    StepKind::CustomAnalysis,
    StepKind::Finalize,
];

/// 查询工作流定义（对所有类型都有定义）
pub fn definition(workflow_type: WorkflowType) -> WorkflowDefinition {
    match workflow_type {
        WorkflowType::LiteratureReview => WorkflowDefinition {
            workflow_type,
            name: "Literature Review",
            description: "Comprehensive analysis of research papers including summary, comparison, and key findings",
            steps: LITERATURE_REVIEW_STEPS,
        },
        WorkflowType::GapAnalysis => WorkflowDefinition {
            workflow_type,
            name: "Research Gap Analysis",
            description: "Identify gaps and opportunities in current research",
            steps: GAP_ANALYSIS_STEPS,
        },
        WorkflowType::MethodologyComparison => WorkflowDefinition {
            workflow_type,
            name: "Methodology Comparison",
            description: "Detailed comparison of research methods and approaches",
            steps: METHODOLOGY_COMPARISON_STEPS,
        },
        WorkflowType::TrendAnalysis => WorkflowDefinition {
            workflow_type,
            name: "Trend Analysis",
            description: "Analyze research trends and emerging topics",
            steps: TREND_ANALYSIS_STEPS,
        },
        WorkflowType::Custom => WorkflowDefinition {
            workflow_type,
            name: "Custom Workflow",
            description: "Custom analysis based on user instructions",
            steps: CUSTOM_STEPS,
        },
    }
}

/// 所有工作流定义
pub fn definitions() -> Vec<WorkflowDefinition> {
    WorkflowType::ALL.iter().copied().map(definition).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_type_has_definition() {
        let defs = definitions();
        assert_eq!(defs.len(), WorkflowType::ALL.len());
        for def in defs {
            assert_eq!(def.steps.first(), Some(&StepKind::Search));
            assert!(!def.name.is_empty());
            assert!(!def.description.is_empty());
        }
    }

    #[test]
    fn test_step_counts() {
        assert_eq!(definition(WorkflowType::LiteratureReview).steps.len(), 5);
        assert_eq!(definition(WorkflowType::GapAnalysis).steps.len(), 4);
        assert_eq!(definition(WorkflowType::MethodologyComparison).steps.len(), 3);
        assert_eq!(definition(WorkflowType::TrendAnalysis).steps.len(), 3);
        assert_eq!(definition(WorkflowType::Custom).steps.len(), 3);
    }

    #[test]
    fn test_synthesis_steps_have_no_task() {
        assert_eq!(StepKind::Compare.task(), Some(TaskKind::Compare));
        assert_eq!(StepKind::CustomAnalysis.task(), Some(TaskKind::Custom));
        assert!(StepKind::SynthesizeKeyFindings.task().is_none());
        assert!(StepKind::Finalize.task().is_none());
    }
}
