use crate::models::workflow::WorkflowRequest;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// 从 TOML 文件加载单个工作流请求
pub async fn load_request(toml_file_path: &Path) -> Result<WorkflowRequest> {
    let content = fs::read_to_string(toml_file_path)
        .await
        .with_context(|| format!("无法读取TOML文件: {}", toml_file_path.display()))?;

    let request: WorkflowRequest = toml::from_str(&content)
        .with_context(|| format!("无法解析TOML文件: {}", toml_file_path.display()))?;

    Ok(request)
}

/// 从文件夹中加载所有 TOML 工作流请求（按文件名排序）
///
/// 单个文件解析失败只记录警告并跳过
pub async fn load_all_requests(folder_path: &str) -> Result<Vec<(PathBuf, WorkflowRequest)>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        anyhow::bail!("文件夹不存在: {}", folder_path);
    }

    let mut toml_files = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .with_context(|| format!("无法读取文件夹: {}", folder_path))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            toml_files.push(path);
        }
    }
    toml_files.sort();

    let mut requests = Vec::new();
    for path in toml_files {
        tracing::info!(
            "正在加载: {}",
            path.file_name().unwrap_or_default().to_string_lossy()
        );

        match load_request(&path).await {
            Ok(request) => {
                tracing::info!(
                    "成功加载请求: {} ({})",
                    request.query,
                    request.workflow_type
                );
                requests.push((path, request));
            }
            Err(e) => {
                tracing::warn!("加载文件失败 {}: {:#}", path.display(), e);
            }
        }
    }

    Ok(requests)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::workflow::WorkflowType;

    #[tokio::test]
    async fn test_load_all_requests_skips_invalid_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("a_review.toml"),
            r#"
            query = "graph neural networks"
            workflow_type = "literature_review"
            max_results = 3
            "#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("b_custom.toml"),
            r#"
            query = "protein folding"
            workflow_type = "custom"
            custom_instructions = "List the datasets used"
            "#,
        )
        .unwrap();
        std::fs::write(dir.path().join("c_broken.toml"), "query = ").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let requests = load_all_requests(dir.path().to_str().unwrap()).await.unwrap();

        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].1.workflow_type, WorkflowType::LiteratureReview);
        assert_eq!(requests[0].1.max_results, 3);
        assert_eq!(requests[1].1.workflow_type, WorkflowType::Custom);
        assert_eq!(requests[1].1.instructions(), Some("List the datasets used"));
    }

    #[tokio::test]
    async fn test_load_all_requests_missing_folder() {
        let result = load_all_requests("/definitely/not/a/folder").await;
        assert!(result.is_err());
    }
}
