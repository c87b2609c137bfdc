use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 论文检索错误（对工作流是致命的）
    #[error("检索错误: {0}")]
    Retrieval(#[from] RetrievalError),
    /// 分析错误（单个步骤内降级处理）
    #[error("分析错误: {0}")]
    Analysis(#[from] AnalysisError),
    /// 持久化错误（只记录日志，不影响完成状态）
    #[error("持久化错误: {0}")]
    Persistence(#[from] PersistenceError),
    /// 工作流状态错误
    #[error("工作流错误: {0}")]
    Workflow(#[from] WorkflowError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 论文检索错误
#[derive(Debug, Error)]
pub enum RetrievalError {
    /// 网络请求失败（包括超时）
    #[error("论文检索请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 检索服务返回非成功状态码
    #[error("论文检索服务返回错误状态 ({endpoint}): {status}")]
    BadStatus { endpoint: String, status: u16 },
    /// 响应体无法解析
    #[error("论文检索结果解析失败: {message}")]
    ParseFailed { message: String },
    /// 查询无效
    #[error("无效的检索查询: {query:?}")]
    InvalidQuery { query: String },
}

/// 分析（LLM）错误
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// API 调用失败
    #[error("LLM API调用失败 (模型: {model}): {source}")]
    ApiCallFailed {
        model: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 请求构建失败
    #[error("LLM 请求构建失败: {source}")]
    RequestBuildFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 调用超时
    #[error("LLM API调用超时 (模型: {model}, {secs}s)")]
    Timeout { model: String, secs: u64 },
    /// 返回内容为空
    #[error("LLM返回内容为空 (模型: {model})")]
    EmptyContent { model: String },
    /// 返回内容不可用
    #[error("LLM返回内容不可用: {reason}")]
    UnusableContent { reason: String },
}

/// 结果持久化错误
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// 创建目录失败
    #[error("创建目录失败 ({path}): {source}")]
    CreateDirFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 序列化失败
    #[error("结果序列化失败: {0}")]
    SerializeFailed(#[from] serde_json::Error),
}

/// 工作流状态机错误
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    /// 工作流不存在
    #[error("工作流不存在: {workflow_id}")]
    NotFound { workflow_id: String },
    /// 工作流已处于终止状态，不能再修改
    #[error("工作流 {workflow_id} 已处于终止状态 ({status})")]
    AlreadyTerminal { workflow_id: String, status: String },
    /// 进度回退或越界
    #[error("工作流 {workflow_id} 进度非法: {current}/{total} (之前为 {previous})")]
    InvalidProgress {
        workflow_id: String,
        previous: usize,
        current: usize,
        total: usize,
    },
    /// 工作流 ID 冲突
    #[error("工作流 ID 已存在: {workflow_id}")]
    DuplicateId { workflow_id: String },
    /// 请求参数无效
    #[error("工作流请求无效: {reason}")]
    InvalidRequest { reason: String },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// HTTP 客户端构建失败
    #[error("HTTP 客户端构建失败: {0}")]
    HttpClient(String),
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建工作流不存在错误
    pub fn not_found(workflow_id: impl Into<String>) -> Self {
        AppError::Workflow(WorkflowError::NotFound {
            workflow_id: workflow_id.into(),
        })
    }

    /// 是否为"工作流不存在"
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::Workflow(WorkflowError::NotFound { .. }))
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
