//! # 统一错误处理模块
//!
//! 定义 dcmbatch 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// dcmbatch 统一错误类型
#[derive(Error, Debug)]
pub enum DcmBatchError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    #[error("Invalid DICOM tag '{tag}': {reason}")]
    InvalidTag { tag: String, reason: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ─────────────────────────────────────────────────────────────
    // 外部命令错误
    // ─────────────────────────────────────────────────────────────
    #[error("External command '{command}' not found in PATH")]
    CommandNotFound { command: String },

    #[error("External command failed: {command}\n{stderr}")]
    CommandFailed { command: String, stderr: String },

    // ─────────────────────────────────────────────────────────────
    // 环境与配置错误
    // ─────────────────────────────────────────────────────────────
    #[error("dcm4che environment is not usable:\n{report}")]
    EnvironmentInvalid { report: String },

    #[error("Failed to parse config file: {path}\nReason: {reason}")]
    ConfigParseError { path: String, reason: String },

    // ─────────────────────────────────────────────────────────────
    // 批处理错误
    // ─────────────────────────────────────────────────────────────
    #[error("No DICOM files found under: {path}")]
    NoFilesFound { path: String },

    #[error("All {total} files failed to process")]
    BatchFailed { total: usize },
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, DcmBatchError>;
