//! devinfo 公共基础设施
//!
//! 配置加载、错误类型、日志初始化与优雅停机，供服务端与部署声明工具共用。

pub mod config;
pub mod constants;
pub mod error;
pub mod shutdown;
pub mod telemetry;

pub use config::DevinfoConfig;
pub use constants::*;
