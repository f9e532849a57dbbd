//! # modify-send 子命令 CLI 定义
//!
//! 改写任意标签后发送到 PACS。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/modify_send.rs`

use crate::cli::ConnectionArgs;

use clap::Args;
use std::path::PathBuf;

/// modify-send 子命令参数
#[derive(Args, Debug)]
pub struct ModifySendArgs {
    /// DICOM file or folder to process (folders are scanned recursively)
    pub input: PathBuf,

    #[command(flatten)]
    pub conn: ConnectionArgs,

    /// Tag to modify, format TAG=VALUE (e.g. '00100020=ANONYMOUS'); repeatable.
    /// An empty value clears the field.
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    /// Number of worker threads (0 = number of CPUs)
    #[arg(long, default_value_t = 4)]
    pub workers: usize,
}
