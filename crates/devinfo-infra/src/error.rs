//! 部署声明错误：任何错误都会中止本次运行

use devinfo_core::error::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InfraError {
    #[error(transparent)]
    Config(#[from] CoreError),

    #[error("Missing required config key: {key}")]
    MissingKey { key: &'static str },

    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },

    #[error("Failed to read SSH public key {path}: {source}")]
    SshKey {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("SSH public key {path} is empty")]
    EmptySshKey { path: String },

    #[error("Resource declared twice: {name}")]
    DuplicateResource { name: String },

    #[error("Resource {from} references undeclared resource {to}")]
    UnknownReference { from: String, to: String },

    #[error("Dependency cycle between resources: {}", involved.join(", "))]
    Cycle { involved: Vec<String> },

    #[error("Output {output} references undeclared resource {to}")]
    UnknownOutputReference { output: String, to: String },

    #[error("Failed to serialize manifest: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {path} - {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, InfraError>;
