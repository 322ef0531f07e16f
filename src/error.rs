use std::fmt;

/// 应用程序错误类型
#[derive(Debug)]
pub enum AppError {
    /// 文档解析错误
    Parse(ParseError),
    /// 缓存读写错误
    Cache(CacheError),
    /// Token 预算错误
    Budget(BudgetError),
    /// LLM 服务错误
    Llm(LlmError),
    /// 结果记录错误
    Logging(LoggingError),
    /// 配置错误
    Config(ConfigError),
    /// 其他错误（用于包装第三方库错误）
    Other(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Parse(e) => write!(f, "解析错误: {}", e),
            AppError::Cache(e) => write!(f, "缓存错误: {}", e),
            AppError::Budget(e) => write!(f, "预算错误: {}", e),
            AppError::Llm(e) => write!(f, "LLM错误: {}", e),
            AppError::Logging(e) => write!(f, "记录错误: {}", e),
            AppError::Config(e) => write!(f, "配置错误: {}", e),
            AppError::Other(msg) => write!(f, "错误: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Parse(e) => Some(e),
            AppError::Cache(e) => Some(e),
            AppError::Budget(e) => Some(e),
            AppError::Llm(e) => Some(e),
            AppError::Logging(e) => Some(e),
            AppError::Config(e) => Some(e),
            AppError::Other(_) => None,
        }
    }
}

/// 文档解析错误
#[derive(Debug)]
pub enum ParseError {
    /// 读取源文件失败
    ReadFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// PDF 解析失败
    PdfFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// Office 文档的 ZIP 容器损坏
    ArchiveCorrupt {
        entry: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// XML 内容解析失败
    XmlFailed {
        entry: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::ReadFailed { path, source } => {
                write!(f, "读取文件失败 ({}): {}", path, source)
            }
            ParseError::PdfFailed { source } => {
                write!(f, "PDF解析失败: {}", source)
            }
            ParseError::ArchiveCorrupt { entry, source } => {
                write!(f, "文档容器损坏 ({}): {}", entry, source)
            }
            ParseError::XmlFailed { entry, source } => {
                write!(f, "XML解析失败 ({}): {}", entry, source)
            }
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::ReadFailed { source, .. }
            | ParseError::PdfFailed { source }
            | ParseError::ArchiveCorrupt { source, .. }
            | ParseError::XmlFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
        }
    }
}

/// 缓存读写错误
#[derive(Debug)]
pub enum CacheError {
    /// 缓存条目写入失败
    WriteFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 缓存目录创建失败
    DirCreationFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheError::WriteFailed { path, source } => {
                write!(f, "写入缓存失败 ({}): {}", path, source)
            }
            CacheError::DirCreationFailed { path, source } => {
                write!(f, "创建缓存目录失败 ({}): {}", path, source)
            }
        }
    }
}

impl std::error::Error for CacheError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CacheError::WriteFailed { source, .. }
            | CacheError::DirCreationFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
        }
    }
}

/// Token 预算错误
#[derive(Debug)]
pub enum BudgetError {
    /// 拼装后的 prompt 超出 token 上限
    Exceeded {
        token_count: usize,
        max_tokens: usize,
    },
}

impl fmt::Display for BudgetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BudgetError::Exceeded {
                token_count,
                max_tokens,
            } => {
                write!(
                    f,
                    "Token 数量 {} 超出上限 {}，已跳过 LLM 调用",
                    token_count, max_tokens
                )
            }
        }
    }
}

impl std::error::Error for BudgetError {}

/// LLM 服务错误
#[derive(Debug)]
pub enum LlmError {
    /// API 调用失败
    ApiCallFailed {
        model: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 返回结果为空
    EmptyResponse {
        model: String,
    },
    /// 返回内容为空
    EmptyContent {
        model: String,
    },
}

impl fmt::Display for LlmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LlmError::ApiCallFailed { model, source } => {
                write!(f, "LLM API调用失败 (模型: {}): {}", model, source)
            }
            LlmError::EmptyResponse { model } => {
                write!(f, "LLM返回结果为空 (模型: {})", model)
            }
            LlmError::EmptyContent { model } => {
                write!(f, "LLM返回内容为空 (模型: {})", model)
            }
        }
    }
}

impl std::error::Error for LlmError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LlmError::ApiCallFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// 结果记录错误
#[derive(Debug)]
pub enum LoggingError {
    /// 请求发送失败
    RequestFailed {
        endpoint: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 外部服务返回错误状态
    BadStatus {
        endpoint: String,
        status: u16,
    },
}

impl fmt::Display for LoggingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoggingError::RequestFailed { endpoint, source } => {
                write!(f, "记录请求失败 ({}): {}", endpoint, source)
            }
            LoggingError::BadStatus { endpoint, status } => {
                write!(f, "记录服务返回错误状态 ({}): {}", endpoint, status)
            }
        }
    }
}

impl std::error::Error for LoggingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoggingError::RequestFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// 配置错误
#[derive(Debug)]
pub enum ConfigError {
    /// 凭证解码失败
    CredentialDecodeFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 分词器初始化失败
    TokenizerInitFailed {
        message: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::CredentialDecodeFailed { source } => {
                write!(f, "凭证解码失败: {}", source)
            }
            ConfigError::TokenizerInitFailed { message } => {
                write!(f, "分词器初始化失败: {}", message)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::CredentialDecodeFailed { source } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            ConfigError::TokenizerInitFailed { .. } => None,
        }
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建文件读取错误
    pub fn read_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Parse(ParseError::ReadFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建缓存写入错误
    pub fn cache_write_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Cache(CacheError::WriteFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建预算超限错误
    pub fn budget_exceeded(token_count: usize, max_tokens: usize) -> Self {
        AppError::Budget(BudgetError::Exceeded {
            token_count,
            max_tokens,
        })
    }

    /// 创建LLM API调用错误
    pub fn llm_api_failed(
        model: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Llm(LlmError::ApiCallFailed {
            model: model.into(),
            source: Box::new(source),
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
