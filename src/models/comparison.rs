//! 论文对比结果
//!
//! LLM 的对比输出应为 JSON 数组，每项包含六个固定文本字段。
//! 无法解析时退化为"每篇论文一行占位记录 + 原始文本"，该路径永不报错。

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::models::paper::Paper;

/// 字段缺失时的默认值
pub const MISSING_FIELD: &str = "N/A";

/// 解析成功时的说明文本
pub const COMPARISON_SUCCESS_TEXT: &str = "Comparison generated successfully.";

/// 没有论文时的说明文本
pub const NO_PAPERS_TEXT: &str = "No papers found for comparison.";

// 占位记录的固定字段值
pub const PLACEHOLDER_RESEARCH_FOCUS: &str = "Extracted from analysis";
pub const PLACEHOLDER_METHODOLOGY: &str = "Based on paper content";
pub const PLACEHOLDER_TOOLS_TECHNIQUES: &str = "Detailed in research";
pub const PLACEHOLDER_ADVANTAGES: &str = "Key strengths identified";
pub const PLACEHOLDER_LIMITATIONS: &str = "Areas for improvement";

/// 对比表中的一行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonItem {
    pub paper_title: String,
    pub research_focus: String,
    pub methodology: String,
    pub tools_techniques: String,
    pub advantages: String,
    pub limitations: String,
}

impl ComparisonItem {
    /// 占位记录（只保留论文标题）
    pub fn placeholder(paper_title: impl Into<String>) -> Self {
        Self {
            paper_title: paper_title.into(),
            research_focus: PLACEHOLDER_RESEARCH_FOCUS.to_string(),
            methodology: PLACEHOLDER_METHODOLOGY.to_string(),
            tools_techniques: PLACEHOLDER_TOOLS_TECHNIQUES.to_string(),
            advantages: PLACEHOLDER_ADVANTAGES.to_string(),
            limitations: PLACEHOLDER_LIMITATIONS.to_string(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.research_focus == PLACEHOLDER_RESEARCH_FOCUS
            && self.methodology == PLACEHOLDER_METHODOLOGY
            && self.tools_techniques == PLACEHOLDER_TOOLS_TECHNIQUES
            && self.advantages == PLACEHOLDER_ADVANTAGES
            && self.limitations == PLACEHOLDER_LIMITATIONS
    }

    /// 从 JSON 对象构建，非对象返回 None
    fn from_json(item: &Value) -> Option<Self> {
        let obj = item.as_object()?;
        let field = |name: &str| -> String {
            match obj.get(name) {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Null) | None => MISSING_FIELD.to_string(),
                Some(other) => other.to_string(),
            }
        };

        Some(Self {
            paper_title: field("paper_title"),
            research_focus: field("research_focus"),
            methodology: field("methodology"),
            tools_techniques: field("tools_techniques"),
            advantages: field("advantages"),
            limitations: field("limitations"),
        })
    }
}

/// 论文对比结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub comparison_table: Vec<ComparisonItem>,
    /// 说明文本（退化时为原始输出或失败原因）
    pub comparison_text: String,
}

impl ComparisonResult {
    /// 解析 LLM 的对比输出
    ///
    /// 取第一个 `[` 到最后一个 `]` 之间的内容按 JSON 数组解析；
    /// 失败时为每篇论文生成占位记录，并保留原始文本。
    pub fn parse(papers: &[Paper], raw: &str) -> Self {
        match Self::parse_table(raw) {
            Some(table) => {
                debug!("对比结果解析成功，共 {} 条记录", table.len());
                Self {
                    comparison_table: table,
                    comparison_text: COMPARISON_SUCCESS_TEXT.to_string(),
                }
            }
            None => {
                warn!("对比结果 JSON 解析失败，使用占位记录");
                Self::placeholder(papers, raw)
            }
        }
    }

    /// 每篇论文一行占位记录
    pub fn placeholder(papers: &[Paper], explanation: impl Into<String>) -> Self {
        Self {
            comparison_table: papers
                .iter()
                .map(|p| ComparisonItem::placeholder(p.title.clone()))
                .collect(),
            comparison_text: explanation.into(),
        }
    }

    pub fn no_papers() -> Self {
        Self {
            comparison_table: Vec::new(),
            comparison_text: NO_PAPERS_TEXT.to_string(),
        }
    }

    /// 对比表非空且全部为占位记录
    pub fn is_placeholder(&self) -> bool {
        !self.comparison_table.is_empty()
            && self.comparison_table.iter().all(ComparisonItem::is_placeholder)
    }

    fn parse_table(raw: &str) -> Option<Vec<ComparisonItem>> {
        let start = raw.find('[')?;
        let end = raw.rfind(']')?;
        if end < start {
            return None;
        }

        let json_str = &raw[start..=end];
        let value: Value = match serde_json::from_str(json_str) {
            Ok(v) => v,
            Err(e) => {
                debug!("对比 JSON 解析错误: {}", e);
                return None;
            }
        };

        let items = value.as_array()?;
        Some(items.iter().filter_map(ComparisonItem::from_json).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn papers() -> Vec<Paper> {
        vec![
            Paper::new("Paper A", vec!["Alice".into()], "abstract a", "http://arxiv.org/abs/1"),
            Paper::new("Paper B", vec!["Bob".into()], "abstract b", "http://arxiv.org/abs/2"),
        ]
    }

    #[test]
    fn test_parse_valid_json_verbatim() {
        let raw = r#"Here is the comparison:
[
  {"paper_title": "Paper A", "research_focus": "RL", "methodology": "PPO", "tools_techniques": "JAX", "advantages": "fast", "limitations": "unstable"},
  {"paper_title": "Paper B", "research_focus": "NLP", "methodology": "BERT", "tools_techniques": "PyTorch", "advantages": "accurate", "limitations": "large"}
]
Hope this helps."#;

        let result = ComparisonResult::parse(&papers(), raw);

        assert_eq!(result.comparison_text, COMPARISON_SUCCESS_TEXT);
        assert_eq!(
            result.comparison_table,
            vec![
                ComparisonItem {
                    paper_title: "Paper A".into(),
                    research_focus: "RL".into(),
                    methodology: "PPO".into(),
                    tools_techniques: "JAX".into(),
                    advantages: "fast".into(),
                    limitations: "unstable".into(),
                },
                ComparisonItem {
                    paper_title: "Paper B".into(),
                    research_focus: "NLP".into(),
                    methodology: "BERT".into(),
                    tools_techniques: "PyTorch".into(),
                    advantages: "accurate".into(),
                    limitations: "large".into(),
                },
            ]
        );
        assert!(!result.is_placeholder());
    }

    #[test]
    fn test_parse_missing_fields_default_to_na() {
        let raw = r#"[{"paper_title": "Paper A", "methodology": 3}]"#;
        let result = ComparisonResult::parse(&papers(), raw);

        assert_eq!(result.comparison_table.len(), 1);
        let row = &result.comparison_table[0];
        assert_eq!(row.paper_title, "Paper A");
        assert_eq!(row.methodology, "3");
        assert_eq!(row.research_focus, MISSING_FIELD);
        assert_eq!(row.limitations, MISSING_FIELD);
    }

    #[test]
    fn test_parse_unparseable_falls_back_to_placeholders() {
        let raw = "Paper A uses PPO while Paper B uses BERT.";
        let result = ComparisonResult::parse(&papers(), raw);

        assert_eq!(result.comparison_table.len(), 2);
        assert_eq!(result.comparison_table[0].paper_title, "Paper A");
        assert_eq!(result.comparison_table[1].paper_title, "Paper B");
        assert!(result.is_placeholder());
        assert_eq!(result.comparison_text, raw);
    }

    #[test]
    fn test_parse_broken_json_falls_back_to_placeholders() {
        let raw = r#"[{"paper_title": "Paper A", "methodology": "PPO"#;
        let result = ComparisonResult::parse(&papers(), raw);
        assert!(result.is_placeholder());
        assert_eq!(result.comparison_text, raw);
    }

    #[test]
    fn test_parse_non_array_json_falls_back() {
        let raw = r#"[1, 2] and then ] {"a": 1}"#;
        // 第一个 '[' 到最后一个 ']' 不是合法 JSON
        let result = ComparisonResult::parse(&papers(), raw);
        assert!(result.is_placeholder());
    }

    #[test]
    fn test_no_papers() {
        let result = ComparisonResult::no_papers();
        assert!(result.comparison_table.is_empty());
        assert!(!result.is_placeholder());
        assert_eq!(result.comparison_text, NO_PAPERS_TEXT);
    }
}
