//! 实验环境的部署声明
//!
//! 类型化资源图与命名输出，渲染为 JSON 清单交给外部部署引擎执行。

pub mod config;
pub mod error;
pub mod graph;
pub mod manifest;
pub mod outputs;
pub mod resources;
pub mod stack;

pub use config::InfraConfig;
pub use error::{InfraError, Result};
pub use manifest::Manifest;
pub use stack::{Stack, declare_stack, read_public_key};
