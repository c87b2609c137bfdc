//! 论文检索服务 - 业务能力层
//!
//! 只负责"给定查询返回论文列表"能力，不关心流程

use async_trait::async_trait;
use tracing::info;

use crate::clients::ArxivClient;
use crate::config::Config;
use crate::error::{ConfigError, RetrievalError};
use crate::models::paper::Paper;

/// 论文来源
///
/// 对编排层而言是纯函数：`(query, limit) → 有序论文列表 | 检索错误`
#[async_trait]
pub trait PaperSource: Send + Sync {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Paper>, RetrievalError>;
}

/// 基于 arXiv 的论文来源
pub struct ArxivPaperSource {
    client: ArxivClient,
}

impl ArxivPaperSource {
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            client: ArxivClient::new(config)?,
        })
    }
}

#[async_trait]
impl PaperSource for ArxivPaperSource {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Paper>, RetrievalError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(RetrievalError::InvalidQuery {
                query: query.to_string(),
            });
        }

        let papers = self.client.search(query, limit).await?;
        info!("🔍 arXiv 检索完成: {} → {} 篇论文", query, papers.len());
        Ok(papers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_blank_query_rejected_without_request() {
        // 指向不可达地址，确保不会真正发出请求
        let config = Config {
            arxiv_api_base_url: "http://127.0.0.1:9/api/query".to_string(),
            ..Config::default()
        };
        let source = ArxivPaperSource::new(&config).unwrap();

        let err = source.search("   ", 5).await.unwrap_err();
        assert!(matches!(err, RetrievalError::InvalidQuery { .. }));
    }
}
