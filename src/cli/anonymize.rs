//! # anonymize 子命令 CLI 定义
//!
//! 批量匿名化 DICOM 识别字段。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/anonymize.rs`

use clap::Args;
use std::path::PathBuf;

/// anonymize 子命令参数
#[derive(Args, Debug)]
pub struct AnonymizeArgs {
    /// DICOM file or folder to anonymize (folders are scanned recursively)
    pub input: PathBuf,

    /// Directory to write anonymized files (defaults to alongside each input)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Use random values instead of fixed 'ANONYMOUS' values
    #[arg(long, default_value_t = false)]
    pub randomize: bool,

    /// Directory containing the dcm4che jars
    #[arg(long, env = "DCM4CHE_LIB")]
    pub lib_dir: Option<PathBuf>,

    /// Number of worker threads (0 = number of CPUs)
    #[arg(long, default_value_t = 4)]
    pub workers: usize,
}
