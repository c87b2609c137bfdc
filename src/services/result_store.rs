//! 结果持久化服务 - 业务能力层
//!
//! 只负责"把一份结果文档写到磁盘"能力，不关心流程

use async_trait::async_trait;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::error::PersistenceError;
use crate::models::results::WorkflowResults;
use crate::models::workflow::WorkflowId;

/// 结果存储
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// 保存一份结果文档，返回存储位置
    async fn save(
        &self,
        workflow_id: &WorkflowId,
        query: &str,
        results: &WorkflowResults,
    ) -> Result<PathBuf, PersistenceError>;
}

/// JSON 文件结果存储
///
/// 职责：
/// - 每个工作流写一个独立文件，写后不再修改
/// - 文件名由查询、时间戳和工作流 ID 决定
pub struct JsonFileResultStore {
    dir: PathBuf,
}

impl JsonFileResultStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl ResultStore for JsonFileResultStore {
    async fn save(
        &self,
        workflow_id: &WorkflowId,
        query: &str,
        results: &WorkflowResults,
    ) -> Result<PathBuf, PersistenceError> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| PersistenceError::CreateDirFailed {
                path: self.dir.display().to_string(),
                source,
            })?;

        let path = self
            .dir
            .join(result_file_name(query, Local::now(), workflow_id));
        let body = serde_json::to_string_pretty(results)?;

        debug!("写入结果文件: {} ({} 字节)", path.display(), body.len());

        fs::write(&path, body)
            .await
            .map_err(|source| PersistenceError::WriteFailed {
                path: path.display().to_string(),
                source,
            })?;

        Ok(path)
    }
}

/// 生成结果文件名：`{查询}_{YYYYmmdd_HHMMSS}_{工作流ID}.json`
pub fn result_file_name(
    query: &str,
    timestamp: DateTime<Local>,
    workflow_id: &WorkflowId,
) -> String {
    format!(
        "{}_{}_{}.json",
        sanitize_query(query),
        timestamp.format("%Y%m%d_%H%M%S"),
        workflow_id
    )
}

/// 文件名中查询部分的最大字符数
const MAX_QUERY_CHARS: usize = 100;

/// 查询文本中非 `[A-Za-z0-9-_.]` 的字符替换为 `_`，最多保留前 100 个字符
fn sanitize_query(query: &str) -> String {
    query
        .trim()
        .chars()
        .take(MAX_QUERY_CHARS)
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::paper::Paper;
    use crate::models::results::ResultEntry;
    use crate::models::workflow::WorkflowType;
    use chrono::TimeZone;

    #[test]
    fn test_result_file_name() {
        let ts = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        let id = WorkflowId::from("1a2b3c4d");

        assert_eq!(
            result_file_name("graph neural/networks?", ts, &id),
            "graph_neural_networks__20240309_140507_1a2b3c4d.json"
        );
        assert_eq!(
            result_file_name("  v1.2-beta_x  ", ts, &id),
            "v1.2-beta_x_20240309_140507_1a2b3c4d.json"
        );
    }

    #[test]
    fn test_result_file_name_bounds_long_query() {
        let ts = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        let id = WorkflowId::from("1a2b3c4d");
        let query = "retrieval augmented generation ".repeat(20);

        let name = result_file_name(&query, ts, &id);
        assert!(name.starts_with(&"retrieval_augmented_generation_".repeat(3)));
        assert!(name.ends_with("_20240309_140507_1a2b3c4d.json"));
        assert_eq!(name.len(), 100 + "_20240309_140507_1a2b3c4d.json".len());
    }

    #[tokio::test]
    async fn test_save_long_query() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileResultStore::new(dir.path());
        let query = "抽象".repeat(200);

        let path = store
            .save(
                &WorkflowId::from("0f0f0f0f"),
                &query,
                &WorkflowResults::new(WorkflowType::Custom),
            )
            .await
            .unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_save_writes_pretty_json() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileResultStore::new(dir.path().join("nested").join("workflows"));

        let mut results = WorkflowResults::new(WorkflowType::TrendAnalysis);
        results.record_papers(vec![Paper::new("T", vec!["A".into()], "abs", "http://x")]);
        results.insert(ResultEntry::TrendAnalysis("rising".into()));

        let id = WorkflowId::from("deadbeef");
        let path = store.save(&id, "llm agents", &results).await.unwrap();

        assert!(path.starts_with(store.dir()));
        let file_name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(file_name.starts_with("llm_agents_"));
        assert!(file_name.ends_with("_deadbeef.json"));

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains('\n'));
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["workflow_type"], "trend_analysis");
        assert_eq!(value["papers_found"], 1);
        assert_eq!(value["trend_analysis"], "rising");
        assert_eq!(value["papers"][0]["abstract"], "abs");
    }

    #[tokio::test]
    async fn test_save_into_file_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();

        let store = JsonFileResultStore::new(&blocker);
        let results = WorkflowResults::new(WorkflowType::Custom);
        let err = store
            .save(&WorkflowId::from("00000000"), "q", &results)
            .await
            .unwrap_err();
        assert!(matches!(err, PersistenceError::CreateDirFailed { .. }));
    }
}
