use phf::phf_map;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::WorkflowError;
use crate::models::llm_model::DEFAULT_MODEL;

/// 工作流类型（封闭枚举）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum WorkflowType {
    /// 文献综述
    #[serde(rename = "literature_review")]
    LiteratureReview,
    /// 研究空白分析
    #[serde(rename = "research_gap_analysis")]
    GapAnalysis,
    /// 方法论对比
    #[serde(rename = "methodology_comparison")]
    MethodologyComparison,
    /// 趋势分析
    #[serde(rename = "trend_analysis")]
    TrendAnalysis,
    /// 自定义工作流
    #[serde(rename = "custom_workflow")]
    Custom,
}

/// 字符串别名 → 工作流类型
static WORKFLOW_TYPE_ALIASES: phf::Map<&'static str, WorkflowType> = phf_map! {
    "literature_review" => WorkflowType::LiteratureReview,
    "literature-review" => WorkflowType::LiteratureReview,
    "research_gap_analysis" => WorkflowType::GapAnalysis,
    "gap_analysis" => WorkflowType::GapAnalysis,
    "gap-analysis" => WorkflowType::GapAnalysis,
    "methodology_comparison" => WorkflowType::MethodologyComparison,
    "methodology-comparison" => WorkflowType::MethodologyComparison,
    "trend_analysis" => WorkflowType::TrendAnalysis,
    "trend-analysis" => WorkflowType::TrendAnalysis,
    "custom_workflow" => WorkflowType::Custom,
    "custom" => WorkflowType::Custom,
};

impl WorkflowType {
    pub const ALL: [WorkflowType; 5] = [
        WorkflowType::LiteratureReview,
        WorkflowType::GapAnalysis,
        WorkflowType::MethodologyComparison,
        WorkflowType::TrendAnalysis,
        WorkflowType::Custom,
    ];

    /// 标准名称（与序列化结果一致）
    pub fn as_str(self) -> &'static str {
        match self {
            WorkflowType::LiteratureReview => "literature_review",
            WorkflowType::GapAnalysis => "research_gap_analysis",
            WorkflowType::MethodologyComparison => "methodology_comparison",
            WorkflowType::TrendAnalysis => "trend_analysis",
            WorkflowType::Custom => "custom_workflow",
        }
    }
}

impl FromStr for WorkflowType {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        WORKFLOW_TYPE_ALIASES
            .get(key.as_str())
            .copied()
            .ok_or_else(|| WorkflowError::InvalidRequest {
                reason: format!("未知的工作流类型: {}", s),
            })
    }
}

impl TryFrom<String> for WorkflowType {
    type Error = WorkflowError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::fmt::Display for WorkflowType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 工作流 ID（短的不透明标识）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkflowId(String);

impl WorkflowId {
    /// 长度：8 个十六进制字符
    pub const LEN: usize = 8;

    /// 基于 UUID v4 生成新的 ID
    pub fn generate() -> Self {
        let uuid = uuid::Uuid::new_v4().simple().to_string();
        Self(uuid[..Self::LEN].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for WorkflowId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for WorkflowId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for WorkflowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn default_max_results() -> usize {
    10
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_true() -> bool {
    true
}

/// 工作流请求（不可变输入）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowRequest {
    pub query: String,
    #[serde(alias = "automation_type")]
    pub workflow_type: WorkflowType,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    #[serde(default = "default_model")]
    pub model: String,
    /// 仅 custom 类型需要
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_instructions: Option<String>,
    // 以下开关仅作提示，状态机不强制
    #[serde(default = "default_true")]
    pub include_summary: bool,
    #[serde(default = "default_true")]
    pub include_comparison: bool,
    #[serde(default)]
    pub include_trends: bool,
}

impl WorkflowRequest {
    pub fn new(query: impl Into<String>, workflow_type: WorkflowType) -> Self {
        Self {
            query: query.into(),
            workflow_type,
            max_results: default_max_results(),
            model: default_model(),
            custom_instructions: None,
            include_summary: true,
            include_comparison: true,
            include_trends: false,
        }
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.custom_instructions = Some(instructions.into());
        self
    }

    /// 去除空白后的自定义指令（空字符串视为未提供）
    pub fn instructions(&self) -> Option<&str> {
        self.custom_instructions
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// 校验请求参数
    pub fn validate(&self) -> Result<(), WorkflowError> {
        if self.query.trim().is_empty() {
            return Err(WorkflowError::InvalidRequest {
                reason: "查询内容不能为空".to_string(),
            });
        }
        if self.max_results == 0 {
            return Err(WorkflowError::InvalidRequest {
                reason: "max_results 必须为正整数".to_string(),
            });
        }
        if self.model.trim().is_empty() {
            return Err(WorkflowError::InvalidRequest {
                reason: "模型名称不能为空".to_string(),
            });
        }
        Ok(())
    }
}
