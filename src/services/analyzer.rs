//! 论文分析服务 - 业务能力层
//!
//! 只负责"把论文交给 LLM 并取回文本/结构化结果"能力，不关心流程

use async_trait::async_trait;
use tracing::debug;

use crate::clients::LlmClient;
use crate::error::AnalysisError;
use crate::models::comparison::ComparisonResult;
use crate::models::paper::Paper;

/// 分析任务类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    Summarize,
    Compare,
    GapAnalysis,
    TrendAnalysis,
    Custom,
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TaskKind::Summarize => "summarize",
            TaskKind::Compare => "compare",
            TaskKind::GapAnalysis => "gap_analysis",
            TaskKind::TrendAnalysis => "trend_analysis",
            TaskKind::Custom => "custom",
        };
        f.write_str(s)
    }
}

/// 分析结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisOutput {
    Text(String),
    Comparison(ComparisonResult),
}

impl AnalysisOutput {
    /// 取文本；结构化结果取其说明文本
    pub fn into_text(self) -> String {
        match self {
            AnalysisOutput::Text(text) => text,
            AnalysisOutput::Comparison(c) => c.comparison_text,
        }
    }

    /// 取对比结果；文本结果按对比输出解析（可能退化为占位记录）
    pub fn into_comparison(self, papers: &[Paper]) -> ComparisonResult {
        match self {
            AnalysisOutput::Comparison(c) => c,
            AnalysisOutput::Text(text) => ComparisonResult::parse(papers, &text),
        }
    }
}

/// 分析器
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// # 参数
    /// - `papers`: 待分析论文
    /// - `task`: 任务类型
    /// - `model`: 模型名称
    /// - `instructions`: 自定义指令（仅 Custom 任务使用）
    async fn run(
        &self,
        papers: &[Paper],
        task: TaskKind,
        model: &str,
        instructions: Option<&str>,
    ) -> Result<AnalysisOutput, AnalysisError>;
}

/// 基于 LLM 的分析器
pub struct LlmAnalyzer {
    client: LlmClient,
}

impl LlmAnalyzer {
    pub fn new(client: LlmClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Analyzer for LlmAnalyzer {
    async fn run(
        &self,
        papers: &[Paper],
        task: TaskKind,
        model: &str,
        instructions: Option<&str>,
    ) -> Result<AnalysisOutput, AnalysisError> {
        if papers.is_empty() {
            return Ok(empty_output(task));
        }

        let prompt = build_prompt(papers, task, instructions)?;
        debug!("开始 LLM 分析: 任务 {}, 论文 {} 篇, 模型 {}", task, papers.len(), model);

        let response = self
            .client
            .chat(
                model,
                &prompt.user_message,
                Some(&prompt.system_message),
                self.client.options(prompt.temperature),
            )
            .await?;

        match task {
            TaskKind::Compare => Ok(AnalysisOutput::Comparison(ComparisonResult::parse(
                papers, &response,
            ))),
            _ => Ok(AnalysisOutput::Text(response)),
        }
    }
}

// ========== 提示词构建 ==========

/// 一次分析请求的消息
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisPrompt {
    pub system_message: String,
    pub user_message: String,
    pub temperature: f32,
}

/// 没有论文时的固定输出（不调用模型）
fn empty_output(task: TaskKind) -> AnalysisOutput {
    match task {
        TaskKind::Summarize => AnalysisOutput::Text("No papers found for summarization.".to_string()),
        TaskKind::Compare => AnalysisOutput::Comparison(ComparisonResult::no_papers()),
        TaskKind::GapAnalysis => AnalysisOutput::Text("No papers found for gap analysis.".to_string()),
        TaskKind::TrendAnalysis => AnalysisOutput::Text("No papers found for trend analysis.".to_string()),
        TaskKind::Custom => AnalysisOutput::Text("No papers found for custom analysis.".to_string()),
    }
}

/// 拼接论文信息
fn combined_text(papers: &[Paper], include_authors: bool) -> String {
    let mut text = String::new();
    for (i, paper) in papers.iter().enumerate() {
        text.push_str(&format!("=== Paper {} ===\n", i + 1));
        text.push_str(&format!("Title: {}\n", paper.title));
        if include_authors {
            text.push_str(&format!("Authors: {}\n", paper.authors_joined()));
        }
        text.push_str(&format!("Abstract: {}\n\n", paper.abstract_text));
    }
    text
}

/// 按任务构建提示词
pub fn build_prompt(
    papers: &[Paper],
    task: TaskKind,
    instructions: Option<&str>,
) -> Result<AnalysisPrompt, AnalysisError> {
    let prompt = match task {
        TaskKind::Summarize => AnalysisPrompt {
            system_message: "You are a research assistant specializing in summarizing academic papers. \
                Analyze the following research paper abstracts from arXiv and provide a comprehensive summary. \
                Focus on:\n\
                1. Common themes and findings across the papers\n\
                2. Key innovations and methodologies\n\
                3. Overall implications and future directions\n\
                4. Relationships between different papers\n\n\
                Provide a clear, well-structured synthesis that helps researchers understand the current state of this field."
                .to_string(),
            user_message: format!(
                "Please summarize these research papers:\n\n{}",
                combined_text(papers, true)
            ),
            temperature: 0.2,
        },
        TaskKind::Compare => AnalysisPrompt {
            system_message: "You are a scientific analyst. Compare the research papers and return a JSON array where each object has:\n\
                - paper_title: The title of the paper\n\
                - research_focus: Main research focus/objective\n\
                - methodology: Research methods and approaches used\n\
                - tools_techniques: Specific tools, algorithms, or techniques\n\
                - advantages: Key advantages and strengths\n\
                - limitations: Limitations and weaknesses\n\n\
                Return ONLY valid JSON, no other text. Make the comparison concise but informative."
                .to_string(),
            user_message: format!(
                "Compare these papers and return JSON:\n\n{}",
                combined_text(papers, true)
            ),
            temperature: 0.1,
        },
        TaskKind::GapAnalysis => AnalysisPrompt {
            system_message: "You are a research analyst specializing in identifying research gaps. \
                Analyze the following papers and identify:\n\
                1. Unexplored research questions\n\
                2. Methodological limitations\n\
                3. Contradictory findings\n\
                4. Emerging opportunities\n\
                5. Future research directions\n\n\
                Provide a structured analysis of research gaps and opportunities."
                .to_string(),
            user_message: format!(
                "Identify research gaps in these papers:\n\n{}",
                combined_text(papers, false)
            ),
            temperature: 0.3,
        },
        TaskKind::TrendAnalysis => AnalysisPrompt {
            system_message: "You are a research trend analyst. Analyze the following papers and identify:\n\
                1. Emerging research themes\n\
                2. Evolution of methodologies\n\
                3. Collaborative patterns\n\
                4. Impactful contributions\n\
                5. Future trajectory predictions\n\n\
                Provide insights about research trends and their implications."
                .to_string(),
            user_message: format!(
                "Analyze research trends in these papers:\n\n{}",
                combined_text(papers, false)
            ),
            temperature: 0.3,
        },
        TaskKind::Custom => {
            let instructions = instructions
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .ok_or_else(|| AnalysisError::UnusableContent {
                    reason: "自定义分析缺少指令".to_string(),
                })?;
            AnalysisPrompt {
                system_message: format!(
                    "You are a research analyst. Follow these instructions: {}",
                    instructions
                ),
                user_message: format!(
                    "Analyze these papers according to the instructions:\n\n{}",
                    combined_text(papers, false)
                ),
                temperature: 0.3,
            }
        }
    };

    Ok(prompt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn papers() -> Vec<Paper> {
        vec![
            Paper::new("Paper A", vec!["Alice".into(), "Carol".into()], "abstract a", "l1"),
            Paper::new("Paper B", vec!["Bob".into()], "abstract b", "l2"),
        ]
    }

    #[test]
    fn test_prompt_includes_every_paper() {
        let prompt = build_prompt(&papers(), TaskKind::Summarize, None).unwrap();
        assert!(prompt.user_message.contains("=== Paper 1 ===\nTitle: Paper A\nAuthors: Alice, Carol"));
        assert!(prompt.user_message.contains("=== Paper 2 ===\nTitle: Paper B"));
        assert!((prompt.temperature - 0.2).abs() < f32::EPSILON);
    }

    #[test]
    fn test_gap_prompt_omits_authors() {
        let prompt = build_prompt(&papers(), TaskKind::GapAnalysis, None).unwrap();
        assert!(!prompt.user_message.contains("Authors:"));
        assert!(prompt.user_message.contains("Abstract: abstract b"));
    }

    #[test]
    fn test_custom_prompt_requires_instructions() {
        assert!(build_prompt(&papers(), TaskKind::Custom, None).is_err());
        assert!(build_prompt(&papers(), TaskKind::Custom, Some("  ")).is_err());

        let prompt = build_prompt(&papers(), TaskKind::Custom, Some("List datasets")).unwrap();
        assert!(prompt.system_message.ends_with("Follow these instructions: List datasets"));
    }

    #[tokio::test]
    async fn test_empty_papers_skip_model_call() {
        // 无可用 LLM 端点，空论文列表不应发起调用
        let config = Config {
            llm_api_base_url: "http://127.0.0.1:9/v1".to_string(),
            ..Config::default()
        };
        let analyzer = LlmAnalyzer::new(LlmClient::new(&config));

        let output = analyzer.run(&[], TaskKind::Compare, "m", None).await.unwrap();
        assert_eq!(output, AnalysisOutput::Comparison(ComparisonResult::no_papers()));

        let output = analyzer.run(&[], TaskKind::Summarize, "m", None).await.unwrap();
        assert_eq!(output.into_text(), "No papers found for summarization.");
    }

    #[test]
    fn test_text_output_into_comparison_parses() {
        let output = AnalysisOutput::Text("not json".to_string());
        let comparison = output.into_comparison(&papers());
        assert!(comparison.is_placeholder());
        assert_eq!(comparison.comparison_text, "not json");
    }
}
