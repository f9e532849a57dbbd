//! # dcmbatch - 批量 DICOM 匿名化与发送工具
//!
//! 把分散的 DICOM 处理脚本用 Rust 重构，统一成单一可执行文件。
//!
//! ## 子命令
//! - `send` - 批量发送 DICOM 文件到 PACS
//! - `anonymize` - 批量匿名化识别字段
//! - `modify-send` - 改写标签后发送
//! - `echo` - PACS 连通性探测
//! - `doctor` - 校验本机 dcm4che 环境
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── batch/   (批处理引擎)
//!   │     └── dicom/   (dcm4che 协作者)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod cli;
mod commands;
mod dicom;
mod error;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
