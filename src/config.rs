/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    // --- arXiv 检索配置 ---
    pub arxiv_api_base_url: String,
    /// 检索与 LLM 调用的 HTTP 超时（秒）
    pub http_timeout_secs: u64,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    /// 请求未指定模型时使用的默认模型
    pub llm_model_name: String,
    pub llm_max_tokens: u32,
    // --- 工作流配置 ---
    /// 工作流结果保存目录
    pub results_dir: String,
    /// 待执行的工作流请求（TOML）存放目录
    pub requests_folder: String,
    /// 状态轮询间隔（毫秒）
    pub poll_interval_ms: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            arxiv_api_base_url: "http://export.arxiv.org/api/query".to_string(),
            http_timeout_secs: 30,
            llm_api_key: String::new(),
            llm_api_base_url: "http://localhost:11434/v1".to_string(),
            llm_model_name: crate::models::llm_model::DEFAULT_MODEL.to_string(),
            llm_max_tokens: 4000,
            results_dir: "workflows".to_string(),
            requests_folder: "requests".to_string(),
            poll_interval_ms: 1000,
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            arxiv_api_base_url: std::env::var("ARXIV_API_BASE_URL").unwrap_or(default.arxiv_api_base_url),
            http_timeout_secs: std::env::var("HTTP_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.http_timeout_secs),
            llm_api_key: std::env::var("LLM_API_KEY").unwrap_or(default.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
            llm_max_tokens: std::env::var("LLM_MAX_TOKENS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.llm_max_tokens),
            results_dir: std::env::var("RESULTS_DIR").unwrap_or(default.results_dir),
            requests_folder: std::env::var("REQUESTS_FOLDER").unwrap_or(default.requests_folder),
            poll_interval_ms: std::env::var("POLL_INTERVAL_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.poll_interval_ms),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
        }
    }

    /// HTTP 超时
    pub fn http_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.http_timeout_secs)
    }
}
