//! arXiv API 客户端
//!
//! 封装对 arXiv 检索接口的 HTTP 调用和 Atom 结果解析

use crate::config::Config;
use crate::error::{ConfigError, RetrievalError};
use crate::models::paper::Paper;
use regex::Regex;
use tracing::{debug, warn};

/// arXiv 客户端
pub struct ArxivClient {
    http: reqwest::Client,
    base_url: String,
}

impl ArxivClient {
    /// 创建新的 arXiv 客户端
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout())
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.arxiv_api_base_url.clone(),
        })
    }

    /// 检索论文
    ///
    /// # 参数
    /// - `query`: 检索关键词（原样作为 `search_query`）
    /// - `max_results`: 最大结果数
    ///
    /// # 返回
    /// 按 arXiv 返回顺序排列的论文列表
    pub async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<Paper>, RetrievalError> {
        debug!("arXiv 检索: {} (max_results={})", query, max_results);

        let max_results = max_results.to_string();
        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("search_query", query),
                ("start", "0"),
                ("max_results", max_results.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                warn!("arXiv 请求失败: {}", e);
                RetrievalError::RequestFailed {
                    endpoint: self.base_url.clone(),
                    source: Box::new(e),
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RetrievalError::BadStatus {
                endpoint: self.base_url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| RetrievalError::RequestFailed {
                endpoint: self.base_url.clone(),
                source: Box::new(e),
            })?;

        parse_atom_feed(&body)
    }
}

// ========== Atom 解析 ==========

/// 解析 arXiv 返回的 Atom XML
///
/// 缺少标题、摘要或 ID 的条目会被跳过
pub fn parse_atom_feed(xml: &str) -> Result<Vec<Paper>, RetrievalError> {
    let entry_re = compile(r"(?s)<entry>(.*?)</entry>")?;
    let author_re = compile(r"(?s)<author>.*?<name>(.*?)</name>.*?</author>")?;

    let mut papers = Vec::new();
    for cap in entry_re.captures_iter(xml) {
        let entry = &cap[1];

        let title = extract_tag_text(entry, "title")?;
        let summary = extract_tag_text(entry, "summary")?;
        let link = extract_tag_text(entry, "id")?;

        let (Some(title), Some(summary), Some(link)) = (title, summary, link) else {
            debug!("跳过不完整的 arXiv 条目");
            continue;
        };

        let authors = author_re
            .captures_iter(entry)
            .filter_map(|c| c.get(1).map(|m| decode_entities(m.as_str().trim())))
            .collect();

        papers.push(Paper::new(
            normalize_whitespace(&title),
            authors,
            normalize_whitespace(&summary),
            link.trim().to_string(),
        ));
    }

    Ok(papers)
}

fn compile(pattern: &str) -> Result<Regex, RetrievalError> {
    Regex::new(pattern).map_err(|e| RetrievalError::ParseFailed {
        message: e.to_string(),
    })
}

/// 提取 `<tag ...>text</tag>` 的文本内容
fn extract_tag_text(xml: &str, tag: &str) -> Result<Option<String>, RetrievalError> {
    let re = compile(&format!(r"(?s)<{tag}(?:\s[^>]*)?>(.*?)</{tag}>"))?;
    Ok(re
        .captures(xml)
        .and_then(|c| c.get(1))
        .map(|m| decode_entities(m.as_str())))
}

fn decode_entities(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// 合并连续空白
fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
