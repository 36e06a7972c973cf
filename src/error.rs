use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    /// 查询字符串或标识符无法解析
    #[error("Malformed query: {0}")]
    MalformedQuery(String),

    /// 查询没有匹配到任何测试文件
    #[error("No matching tests for query: {0}")]
    NoMatchingTests(String),

    /// 单个规格加载失败，只影响该条目
    #[error("Failed to load specification {id}: {message}")]
    SpecificationLoadFailure { id: String, message: String },

    /// 运行器被错误调用（不是测试结果）
    #[error("Harness fault: {0}")]
    HarnessFault(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    ConfigError(#[from] toml::de::Error),

    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for HarnessError {
    fn from(err: anyhow::Error) -> Self {
        HarnessError::Other(err.to_string())
    }
}

/// Result type for caseflow crate
pub type Result<T> = std::result::Result<T, HarnessError>;
