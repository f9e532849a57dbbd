//! # send 子命令 CLI 定义
//!
//! 批量发送 DICOM 文件到 PACS。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/send.rs`

use crate::cli::ConnectionArgs;

use clap::Args;
use std::path::PathBuf;

/// send 子命令参数
#[derive(Args, Debug)]
pub struct SendArgs {
    /// DICOM file or folder to send (folders are scanned recursively)
    pub input: PathBuf,

    #[command(flatten)]
    pub conn: ConnectionArgs,

    /// Number of worker threads (0 = number of CPUs)
    #[arg(long, default_value_t = 4)]
    pub workers: usize,
}
