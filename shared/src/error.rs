use thiserror::Error;

// =========================================================
// 核心错误类型
// =========================================================

/// API 调用错误
///
/// 区分传输层失败（网络、HTTP 状态、解析）与业务层拒绝（`RestBean.code != 200`）。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// 请求未能送达或未收到响应
    #[error("网络错误: {0}")]
    Network(String),
    /// 非 2xx 且响应体不是合法的 RestBean
    #[error("HTTP 状态异常: {status}")]
    Http { status: u16 },
    /// 未登录或登录已失效
    #[error("未授权: {0}")]
    Unauthorized(String),
    /// 已登录但权限不足（或账户被封禁）
    #[error("权限不足: {0}")]
    Forbidden(String),
    /// 后端返回的业务错误
    #[error("请求失败 ({code}): {message}")]
    Rejected { code: i32, message: String },
    /// 请求或响应体序列化失败
    #[error("数据解析失败: {0}")]
    Decode(String),
}

impl ApiError {
    /// 机器可读的错误代码
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Network(_) => "NETWORK_ERROR",
            ApiError::Http { .. } => "HTTP_ERROR",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::Rejected { .. } => "REJECTED",
            ApiError::Decode(_) => "DECODE_ERROR",
        }
    }

    /// 是否应当视为会话失效（需要清空会话并回到登录页）
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_) | ApiError::Http { status: 401 })
    }

    /// 适合直接展示给用户的消息
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Rejected { message, .. }
            | ApiError::Unauthorized(message)
            | ApiError::Forbidden(message)
                if !message.is_empty() =>
            {
                message.clone()
            }
            other => other.to_string(),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_classification() {
        assert!(ApiError::Unauthorized(String::new()).is_unauthorized());
        assert!(ApiError::Http { status: 401 }.is_unauthorized());
        assert!(!ApiError::Http { status: 500 }.is_unauthorized());
        assert!(!ApiError::Forbidden("x".into()).is_unauthorized());
    }

    #[test]
    fn test_user_message_prefers_backend_text() {
        let e = ApiError::Rejected {
            code: 400,
            message: "图片上传失败".into(),
        };
        assert_eq!(e.user_message(), "图片上传失败");
        assert_eq!(e.error_code(), "REJECTED");

        let empty = ApiError::Forbidden(String::new());
        assert_eq!(empty.user_message(), "权限不足: ");
    }
}
