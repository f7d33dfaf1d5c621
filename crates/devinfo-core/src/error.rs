//! 统一错误处理系统

use thiserror::Error;

/// 核心错误类型
#[derive(Error, Debug)]
pub enum CoreError {
    // === 配置错误 ===
    #[error("Config error: {message}")]
    Config { message: String },

    // === 文件和IO错误 ===
    #[error("IO error: {path} - {message}")]
    Io { path: String, message: String },

    // === 系统错误 ===
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CoreError {
    /// 创建配置错误
    pub fn config_error(message: impl Into<String>) -> Self {
        CoreError::Config {
            message: message.into(),
        }
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        CoreError::Internal {
            message: message.into(),
        }
    }

    /// 从 IO 错误创建文件错误，保留文件路径上下文
    pub fn from_io_with_path(err: std::io::Error, path: impl Into<String>) -> Self {
        CoreError::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

/// Core 操作的 Result 类型别名
pub type Result<T> = std::result::Result<T, CoreError>;

impl From<figment::Error> for CoreError {
    fn from(err: figment::Error) -> Self {
        CoreError::Config {
            message: format!("Failed to load config via Figment: {}", err),
        }
    }
}
