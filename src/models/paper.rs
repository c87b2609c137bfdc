use serde::{Deserialize, Serialize};

/// 检索得到的论文（检索后不可变）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paper {
    pub title: String,
    pub authors: Vec<String>,
    /// 摘要
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub link: String,
}

impl Paper {
    pub fn new(
        title: impl Into<String>,
        authors: Vec<String>,
        abstract_text: impl Into<String>,
        link: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            authors,
            abstract_text: abstract_text.into(),
            link: link.into(),
        }
    }

    /// 作者列表（逗号分隔）
    pub fn authors_joined(&self) -> String {
        self.authors.join(", ")
    }
}

impl std::fmt::Display for Paper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // 截断标题以便显示（最多80个字符）
        let title_preview = if self.title.chars().count() > 80 {
            self.title.chars().take(80).collect::<String>() + "..."
        } else {
            self.title.clone()
        };

        if self.authors.is_empty() {
            write!(f, "{} [作者: 未知]", title_preview)
        } else {
            write!(f, "{} [作者: {}]", title_preview, self.authors_joined())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abstract_serialized_under_abstract_key() {
        let paper = Paper::new(
            "Attention Is All You Need",
            vec!["Ashish Vaswani".to_string()],
            "The dominant sequence transduction models...",
            "http://arxiv.org/abs/1706.03762v7",
        );
        let json = serde_json::to_value(&paper).unwrap();
        assert_eq!(json["abstract"], "The dominant sequence transduction models...");
        assert!(json.get("abstract_text").is_none());
    }

    #[test]
    fn test_display_truncates_long_title() {
        let paper = Paper::new("t".repeat(120), vec![], "", "");
        let shown = paper.to_string();
        assert!(shown.starts_with(&"t".repeat(80)));
        assert!(shown.ends_with("... [作者: 未知]"));
    }
}
