//! # 工具模块
//!
//! 终端输出、进度条、配置与环境校验等通用工具。
//!
//! ## 依赖关系
//! - 被 `commands/`, `batch/` 模块使用
//! - 子模块: config, output, progress, validator

pub mod config;
pub mod output;
pub mod progress;
pub mod validator;
