//! 工作流结果
//!
//! 结果键是固定集合，每个键对应一种带类型的结果项，
//! 这样每种工作流写入哪些键可以在编译期检查。

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::models::comparison::ComparisonResult;
use crate::models::paper::Paper;
use crate::models::workflow::WorkflowType;

/// 结果键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultKey {
    Papers,
    Summary,
    Comparison,
    GapAnalysis,
    TrendAnalysis,
    CustomAnalysis,
    KeyFindings,
    Recommendations,
    MethodologyInsights,
    FutureDirections,
}

impl ResultKey {
    pub fn as_str(self) -> &'static str {
        match self {
            ResultKey::Papers => "papers",
            ResultKey::Summary => "summary",
            ResultKey::Comparison => "comparison",
            ResultKey::GapAnalysis => "gap_analysis",
            ResultKey::TrendAnalysis => "trend_analysis",
            ResultKey::CustomAnalysis => "custom_analysis",
            ResultKey::KeyFindings => "key_findings",
            ResultKey::Recommendations => "recommendations",
            ResultKey::MethodologyInsights => "methodology_insights",
            ResultKey::FutureDirections => "future_directions",
        }
    }
}

impl std::fmt::Display for ResultKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 单个结果项
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultEntry {
    Papers(Vec<Paper>),
    Summary(String),
    Comparison(ComparisonResult),
    GapAnalysis(String),
    TrendAnalysis(String),
    CustomAnalysis(String),
    KeyFindings(String),
    Recommendations(String),
    MethodologyInsights(String),
    FutureDirections(String),
}

impl ResultEntry {
    pub fn key(&self) -> ResultKey {
        match self {
            ResultEntry::Papers(_) => ResultKey::Papers,
            ResultEntry::Summary(_) => ResultKey::Summary,
            ResultEntry::Comparison(_) => ResultKey::Comparison,
            ResultEntry::GapAnalysis(_) => ResultKey::GapAnalysis,
            ResultEntry::TrendAnalysis(_) => ResultKey::TrendAnalysis,
            ResultEntry::CustomAnalysis(_) => ResultKey::CustomAnalysis,
            ResultEntry::KeyFindings(_) => ResultKey::KeyFindings,
            ResultEntry::Recommendations(_) => ResultKey::Recommendations,
            ResultEntry::MethodologyInsights(_) => ResultKey::MethodologyInsights,
            ResultEntry::FutureDirections(_) => ResultKey::FutureDirections,
        }
    }

    /// 文本类结果项的内容
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResultEntry::Summary(s)
            | ResultEntry::GapAnalysis(s)
            | ResultEntry::TrendAnalysis(s)
            | ResultEntry::CustomAnalysis(s)
            | ResultEntry::KeyFindings(s)
            | ResultEntry::Recommendations(s)
            | ResultEntry::MethodologyInsights(s)
            | ResultEntry::FutureDirections(s) => Some(s),
            ResultEntry::Papers(_) | ResultEntry::Comparison(_) => None,
        }
    }

    fn serialize_value<M: SerializeMap>(&self, map: &mut M) -> Result<(), M::Error> {
        let key = self.key().as_str();
        match self {
            ResultEntry::Papers(papers) => map.serialize_entry(key, papers),
            ResultEntry::Comparison(comparison) => map.serialize_entry(key, comparison),
            other => map.serialize_entry(key, other.as_text().unwrap_or_default()),
        }
    }
}

/// 工作流结果集合（逐步填充）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowResults {
    workflow_type: WorkflowType,
    papers_found: usize,
    note: Option<String>,
    entries: BTreeMap<ResultKey, ResultEntry>,
    degraded: BTreeSet<ResultKey>,
}

impl WorkflowResults {
    pub fn new(workflow_type: WorkflowType) -> Self {
        Self {
            workflow_type,
            papers_found: 0,
            note: None,
            entries: BTreeMap::new(),
            degraded: BTreeSet::new(),
        }
    }

    /// 没有检索到论文时的结果
    pub fn no_papers(workflow_type: WorkflowType, note: impl Into<String>) -> Self {
        Self {
            note: Some(note.into()),
            ..Self::new(workflow_type)
        }
    }

    /// 记录论文数量和论文列表
    pub fn record_papers(&mut self, papers: Vec<Paper>) {
        self.papers_found = papers.len();
        self.insert(ResultEntry::Papers(papers));
    }

    pub fn insert(&mut self, entry: ResultEntry) {
        let key = entry.key();
        self.degraded.remove(&key);
        self.entries.insert(key, entry);
    }

    /// 插入降级结果（该步骤分析失败后的兜底内容）
    pub fn insert_degraded(&mut self, entry: ResultEntry) {
        let key = entry.key();
        self.entries.insert(key, entry);
        self.degraded.insert(key);
    }

    pub fn workflow_type(&self) -> WorkflowType {
        self.workflow_type
    }

    pub fn papers_found(&self) -> usize {
        self.papers_found
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    pub fn get(&self, key: ResultKey) -> Option<&ResultEntry> {
        self.entries.get(&key)
    }

    pub fn contains(&self, key: ResultKey) -> bool {
        self.entries.contains_key(&key)
    }

    pub fn text(&self, key: ResultKey) -> Option<&str> {
        self.get(key).and_then(ResultEntry::as_text)
    }

    pub fn papers(&self) -> &[Paper] {
        match self.get(ResultKey::Papers) {
            Some(ResultEntry::Papers(papers)) => papers,
            _ => &[],
        }
    }

    pub fn comparison(&self) -> Option<&ComparisonResult> {
        match self.get(ResultKey::Comparison) {
            Some(ResultEntry::Comparison(c)) => Some(c),
            _ => None,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = ResultKey> + '_ {
        self.entries.keys().copied()
    }

    pub fn is_degraded(&self, key: ResultKey) -> bool {
        self.degraded.contains(&key)
    }

    pub fn degraded_keys(&self) -> impl Iterator<Item = ResultKey> + '_ {
        self.degraded.iter().copied()
    }

    /// 没有任何结果项
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for WorkflowResults {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("workflow_type", &self.workflow_type)?;
        map.serialize_entry("papers_found", &self.papers_found)?;
        if let Some(note) = &self.note {
            map.serialize_entry("note", note)?;
        }
        for entry in self.entries.values() {
            entry.serialize_value(&mut map)?;
        }
        if !self.degraded.is_empty() {
            map.serialize_entry("degraded_steps", &self.degraded)?;
        }
        map.end()
    }
}
