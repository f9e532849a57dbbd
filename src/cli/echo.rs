//! # echo 子命令 CLI 定义
//!
//! PACS 连通性探测。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/echo.rs`

use crate::cli::ConnectionArgs;

use clap::Args;

/// echo 子命令参数
#[derive(Args, Debug)]
pub struct EchoArgs {
    #[command(flatten)]
    pub conn: ConnectionArgs,

    /// Save these connection settings to config.json as defaults on success
    #[arg(long)]
    pub save: bool,
}
