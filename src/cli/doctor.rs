//! # doctor 子命令 CLI 定义
//!
//! 校验本机 java/dcm4che 环境。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/doctor.rs`

use clap::Args;
use std::path::PathBuf;

/// doctor 子命令参数
#[derive(Args, Debug)]
pub struct DoctorArgs {
    /// Directory containing the dcm4che jars
    #[arg(long, env = "DCM4CHE_LIB")]
    pub lib_dir: Option<PathBuf>,
}
