use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 评分后端错误
///
/// 网关边界上的所有失败都归入这几类，调用方不会看到裸的 reqwest / serde 错误。
#[derive(Debug, Error)]
pub enum GatewayError {
    /// 后端无法连接（网络错误、超时）
    #[error("无法连接评分后端 ({endpoint}): {source}")]
    Unreachable {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// 后端可达，但返回了非 2xx 状态
    #[error("评分后端返回错误状态 ({endpoint}): {status}, message={message:?}")]
    HttpStatus {
        endpoint: String,
        status: u16,
        message: Option<String>,
    },
    /// 2xx 但响应体不是合法 JSON
    #[error("评分后端响应无法解析 ({endpoint}): {source}")]
    MalformedResponse {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
    /// JSON 解析成功但内容未通过校验
    #[error("评分后端返回的数据不合法 ({endpoint}): {reason}")]
    InvalidPayload { endpoint: String, reason: String },
}

/// 错误类别，由 HTTP 状态推导
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// 4xx
    Client,
    /// 5xx
    Server,
    /// 网络不可达
    Unreachable,
    /// 响应格式错误
    Malformed,
}

/// 统一的错误返回结构 `{status: "error", message, ...}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    pub status: String,
    pub message: String,
    pub category: ErrorCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    pub endpoint: String,
}

impl GatewayError {
    pub fn endpoint(&self) -> &str {
        match self {
            GatewayError::Unreachable { endpoint, .. }
            | GatewayError::HttpStatus { endpoint, .. }
            | GatewayError::MalformedResponse { endpoint, .. }
            | GatewayError::InvalidPayload { endpoint, .. } => endpoint,
        }
    }

    /// 按状态码归类
    pub fn category(&self) -> ErrorCategory {
        match self {
            GatewayError::Unreachable { .. } => ErrorCategory::Unreachable,
            GatewayError::HttpStatus { status, .. } if *status >= 500 => ErrorCategory::Server,
            GatewayError::HttpStatus { .. } => ErrorCategory::Client,
            GatewayError::MalformedResponse { .. } | GatewayError::InvalidPayload { .. } => {
                ErrorCategory::Malformed
            }
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            GatewayError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// 转换为界面可直接显示的错误结构
    pub fn to_envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope {
            status: "error".to_string(),
            message: self.to_string(),
            category: self.category(),
            status_code: self.status_code(),
            endpoint: self.endpoint().to_string(),
        }
    }
}

impl From<&GatewayError> for ErrorEnvelope {
    fn from(err: &GatewayError) -> Self {
        err.to_envelope()
    }
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 目录不存在
    #[error("目录不存在: {path}")]
    DirectoryNotFound { path: String },
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
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
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// 评分逻辑错误
#[derive(Debug, Error, PartialEq)]
pub enum GradingError {
    /// 题目索引越界
    #[error("题目索引 {index} 超出范围 (共 {len} 题)")]
    QuestionIndexOutOfRange { index: usize, len: usize },
    /// 评分项索引越界
    #[error("题目 {question_index} 的评分项索引 {index} 超出范围 (共 {len} 项)")]
    CriterionIndexOutOfRange {
        question_index: usize,
        index: usize,
        len: usize,
    },
    /// 评分标准声明的总分与各项之和不一致
    #[error("评分标准总分 {declared} 与各项分值之和 {computed} 不一致")]
    RubricTotalMismatch { declared: f64, computed: f64 },
    /// 题目数据不合法
    #[error("题目 {question_id} 不合法: {reason}")]
    InvalidQuestion { question_id: String, reason: String },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 后端地址无法解析
    #[error("后端地址无法解析: '{url}'")]
    InvalidBaseUrl { url: String },
    /// HTTP 客户端构建失败
    #[error("HTTP 客户端构建失败: {0}")]
    ClientBuildFailed(#[source] reqwest::Error),
}
