//! 各工作流类型的步骤序列与本地合成步骤
//!
//! 合成/提取步骤是对已有结果的纯变换，不调用分析器，不会失败。

use crate::error::AnalysisError;
use crate::models::comparison::ComparisonResult;
use crate::models::paper::Paper;
use crate::models::results::{ResultEntry, ResultKey, WorkflowResults};
use crate::models::workflow::WorkflowType;
use crate::services::AnalysisOutput;
use crate::workflow::registry::StepKind;

/// 关键发现中每段引用的最大字符数
const KEY_FINDINGS_EXCERPT_CHARS: usize = 500;

/// 计划中的一步
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedStep {
    pub kind: StepKind,
    /// 进度中显示的步骤名
    pub name: &'static str,
}

const fn step(kind: StepKind, name: &'static str) -> PlannedStep {
    PlannedStep { kind, name }
}

/// 检索步骤名（所有类型的第 1 步）
pub const SEARCH_STEP_NAME: &str = "Searching arXiv";

const SEARCH: PlannedStep = step(StepKind::Search, SEARCH_STEP_NAME);

const LITERATURE_REVIEW: &[PlannedStep] = &[
    SEARCH,
    step(StepKind::Summarize, "Generating Summary"),
    step(StepKind::Compare, "Comparing Papers"),
    step(StepKind::GapAnalysis, "Analyzing Gaps"),
    step(StepKind::SynthesizeKeyFindings, "Finalizing"),
];

const GAP_ANALYSIS: &[PlannedStep] = &[
    SEARCH,
    step(StepKind::Compare, "Comparing Papers"),
    step(StepKind::GapAnalysis, "Analyzing Gaps"),
    step(StepKind::GenerateRecommendations, "Generating Recommendations"),
];

const METHODOLOGY_COMPARISON: &[PlannedStep] = &[
    SEARCH,
    step(StepKind::Compare, "Detailed Comparison"),
    step(StepKind::ExtractMethodologyInsights, "Methodology Analysis"),
];

const TREND_ANALYSIS: &[PlannedStep] = &[
    SEARCH,
    step(StepKind::TrendAnalysis, "Trend Analysis"),
    step(StepKind::ExtractFutureDirections, "Future Directions"),
];

const CUSTOM: &[PlannedStep] = &[
    SEARCH,
    step(StepKind::CustomAnalysis, "Custom Analysis"),
    step(StepKind::Finalize, "Finalizing"),
];

/// 给出某类工作流的执行步骤（第 1 步总是检索）
///
/// 自定义工作流没有指令时跳过自定义分析步骤
pub fn plan(workflow_type: WorkflowType, has_instructions: bool) -> Vec<PlannedStep> {
    let steps = match workflow_type {
        WorkflowType::LiteratureReview => LITERATURE_REVIEW,
        WorkflowType::GapAnalysis => GAP_ANALYSIS,
        WorkflowType::MethodologyComparison => METHODOLOGY_COMPARISON,
        WorkflowType::TrendAnalysis => TREND_ANALYSIS,
        WorkflowType::Custom => CUSTOM,
    };

    steps
        .iter()
        .copied()
        .filter(|s| has_instructions || s.kind != StepKind::CustomAnalysis)
        .collect()
}

// ========== 分析步骤的结果 ==========

/// 分析器输出 → 对应结果项
///
/// 只对需要调用分析器的步骤有意义，其余步骤返回 None
pub fn analysis_entry(
    kind: StepKind,
    output: AnalysisOutput,
    papers: &[Paper],
) -> Option<ResultEntry> {
    let entry = match kind {
        StepKind::Summarize => ResultEntry::Summary(output.into_text()),
        StepKind::Compare => ResultEntry::Comparison(output.into_comparison(papers)),
        StepKind::GapAnalysis => ResultEntry::GapAnalysis(output.into_text()),
        StepKind::TrendAnalysis => ResultEntry::TrendAnalysis(output.into_text()),
        StepKind::CustomAnalysis => ResultEntry::CustomAnalysis(output.into_text()),
        _ => return None,
    };
    Some(entry)
}

/// 分析失败时的降级结果项
pub fn degraded_entry(
    kind: StepKind,
    error: &AnalysisError,
    papers: &[Paper],
) -> Option<ResultEntry> {
    let entry = match kind {
        StepKind::Summarize => ResultEntry::Summary(format!("Summarization failed: {}", error)),
        StepKind::Compare => ResultEntry::Comparison(ComparisonResult::placeholder(
            papers,
            format!("Comparison failed: {}", error),
        )),
        StepKind::GapAnalysis => {
            ResultEntry::GapAnalysis(format!("Gap analysis failed: {}", error))
        }
        StepKind::TrendAnalysis => {
            ResultEntry::TrendAnalysis(format!("Trend analysis failed: {}", error))
        }
        StepKind::CustomAnalysis => {
            ResultEntry::CustomAnalysis(format!("Custom analysis failed: {}", error))
        }
        _ => return None,
    };
    Some(entry)
}

// ========== 本地合成步骤 ==========

/// 执行本地合成步骤；检索、分析和收尾步骤返回 None
pub fn synthesize(kind: StepKind, results: &WorkflowResults) -> Option<ResultEntry> {
    let text = |key: ResultKey| results.text(key).unwrap_or_default();

    let entry = match kind {
        StepKind::SynthesizeKeyFindings => ResultEntry::KeyFindings(key_findings(
            text(ResultKey::Summary),
            text(ResultKey::GapAnalysis),
        )),
        StepKind::GenerateRecommendations => {
            ResultEntry::Recommendations(recommendations(text(ResultKey::GapAnalysis)))
        }
        StepKind::ExtractMethodologyInsights => {
            ResultEntry::MethodologyInsights(methodology_insights(results.comparison()))
        }
        StepKind::ExtractFutureDirections => {
            ResultEntry::FutureDirections(future_directions(text(ResultKey::TrendAnalysis)))
        }
        _ => return None,
    };
    Some(entry)
}

/// 按字符截取前 n 个
fn excerpt(text: &str, n: usize) -> String {
    text.chars().take(n).collect()
}

pub fn key_findings(summary: &str, gap_analysis: &str) -> String {
    format!(
        "Key findings synthesized from analysis:\n\nSummary Highlights:\n{}...\n\nGap Analysis Insights:\n{}...",
        excerpt(summary, KEY_FINDINGS_EXCERPT_CHARS),
        excerpt(gap_analysis, KEY_FINDINGS_EXCERPT_CHARS)
    )
}

pub fn recommendations(gap_analysis: &str) -> String {
    format!(
        "Research recommendations based on identified gaps:\n\n{}",
        gap_analysis
    )
}

pub fn methodology_insights(comparison: Option<&ComparisonResult>) -> String {
    let mut insights = String::from("Methodology Insights:\n\n");
    if let Some(comparison) = comparison {
        for item in &comparison.comparison_table {
            insights.push_str(&format!("- {}: {}\n", item.paper_title, item.methodology));
        }
    }
    insights
}

pub fn future_directions(trend_analysis: &str) -> String {
    format!(
        "Future research directions based on trends:\n\n{}",
        trend_analysis
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::comparison::ComparisonItem;
    use crate::workflow::registry::definition;

    #[test]
    fn test_plan_matches_registry() {
        for workflow_type in WorkflowType::ALL {
            let kinds: Vec<StepKind> = plan(workflow_type, true).iter().map(|s| s.kind).collect();
            assert_eq!(kinds, definition(workflow_type).steps, "{}", workflow_type);
        }
    }

    #[test]
    fn test_custom_plan_without_instructions() {
        let steps = plan(WorkflowType::Custom, false);
        let names: Vec<_> = steps.iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Searching arXiv", "Finalizing"]);
    }

    #[test]
    fn test_literature_review_step_names() {
        let names: Vec<_> = plan(WorkflowType::LiteratureReview, false)
            .iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(
            names,
            vec![
                "Searching arXiv",
                "Generating Summary",
                "Comparing Papers",
                "Analyzing Gaps",
                "Finalizing"
            ]
        );
    }

    #[test]
    fn test_key_findings_truncates_by_chars() {
        let summary = "摘".repeat(600);
        let text = key_findings(&summary, "short gap");

        let expected_head = format!(
            "Key findings synthesized from analysis:\n\nSummary Highlights:\n{}...",
            "摘".repeat(500)
        );
        assert!(text.starts_with(&expected_head));
        assert!(text.ends_with("Gap Analysis Insights:\nshort gap..."));
    }

    #[test]
    fn test_methodology_insights_lists_rows() {
        let comparison = ComparisonResult {
            comparison_table: vec![
                ComparisonItem {
                    methodology: "CNN".into(),
                    ..ComparisonItem::placeholder("Paper A")
                },
                ComparisonItem::placeholder("Paper B"),
            ],
            comparison_text: String::new(),
        };

        assert_eq!(
            methodology_insights(Some(&comparison)),
            "Methodology Insights:\n\n- Paper A: CNN\n- Paper B: Based on paper content\n"
        );
        assert_eq!(methodology_insights(None), "Methodology Insights:\n\n");
    }

    #[test]
    fn test_synthesize_reads_prior_results() {
        let mut results = WorkflowResults::new(WorkflowType::TrendAnalysis);
        results.insert(ResultEntry::TrendAnalysis("more agents".into()));

        let entry = synthesize(StepKind::ExtractFutureDirections, &results).unwrap();
        assert_eq!(
            entry,
            ResultEntry::FutureDirections(
                "Future research directions based on trends:\n\nmore agents".into()
            )
        );
        assert!(synthesize(StepKind::Compare, &results).is_none());
        assert!(synthesize(StepKind::Finalize, &results).is_none());
    }

    #[test]
    fn test_degraded_compare_is_placeholder() {
        let papers = vec![Paper::new("A", vec![], "a", "l")];
        let err = AnalysisError::EmptyContent { model: "m".into() };

        let Some(ResultEntry::Comparison(c)) = degraded_entry(StepKind::Compare, &err, &papers) else {
            panic!("expected comparison entry");
        };
        assert!(c.is_placeholder());
        assert!(c.comparison_text.starts_with("Comparison failed: "));
    }
}
