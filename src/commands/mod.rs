//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `batch/`, `dicom/`, `utils/`
//! - 子模块: anonymize, doctor, echo, modify_send, send

pub mod anonymize;
pub mod doctor;
pub mod echo;
pub mod modify_send;
pub mod send;

use crate::batch::aggregator::BatchSummary;
use crate::batch::operation::Services;
use crate::batch::reporter::ProgressObserver;
use crate::dicom::{Dcm4cheEnv, DicmHeaderProbe, ExternalTagRewriter, StoreScuTransfer};
use crate::error::{DcmBatchError, Result};
use crate::utils::output;

use std::path::{Path, PathBuf};

use indicatif::ProgressBar;
use tabled::{Table, Tabled};

/// 执行命令
pub fn run(cmd: crate::cli::Commands) -> Result<()> {
    use crate::cli::Commands;
    match cmd {
        Commands::Send(args) => send::execute(args),
        Commands::Anonymize(args) => anonymize::execute(args),
        Commands::ModifySend(args) => modify_send::execute(args),
        Commands::Echo(args) => echo::execute(args),
        Commands::Doctor(args) => doctor::execute(args),
    }
}

/// 构造真实的协作者服务集
pub(crate) fn build_services(lib_dir: Option<PathBuf>) -> Services {
    let env = Dcm4cheEnv::locate(lib_dir);
    Services {
        transfer: Box::new(StoreScuTransfer::new(env.clone())),
        rewriter: Box::new(ExternalTagRewriter::new(env)),
        probe: Box::new(DicmHeaderProbe),
    }
}

/// 把进度快照接到 indicatif 进度条上
pub(crate) fn progress_observer(pb: &ProgressBar) -> ProgressObserver {
    let pb = pb.clone();
    Box::new(move |snap| {
        pb.set_length(snap.total as u64);
        pb.set_position(snap.processed as u64);
        pb.set_message(format!(
            "{} ok, {} failed, {} left",
            snap.succeeded,
            snap.failed,
            snap.remaining()
        ));
    })
}

/// 失败明细表格行
#[derive(Tabled)]
struct FailureRow {
    #[tabled(rename = "File")]
    file: String,
    #[tabled(rename = "Error")]
    error: String,
}

/// 打印批处理汇总并应用成败策略
///
/// 零候选文件报 `NoFilesFound`；全部失败时整个命令视为失败，
/// 部分失败只在汇总里体现。
pub(crate) fn finish_batch(input: &Path, summary: &BatchSummary) -> Result<()> {
    if summary.total == 0 {
        return Err(DcmBatchError::NoFilesFound {
            path: input.display().to_string(),
        });
    }

    output::print_separator();

    if summary.failed > 0 {
        let rows: Vec<FailureRow> = summary
            .outcomes
            .iter()
            .filter(|o| !o.success)
            .map(|o| FailureRow {
                file: o.file.display().to_string(),
                error: first_line(&o.error),
            })
            .collect();
        println!("{}", Table::new(rows));
    }

    output::print_done(&format!(
        "Processed {} files: {} succeeded, {} failed",
        summary.total, summary.succeeded, summary.failed
    ));

    if summary.succeeded == 0 {
        return Err(DcmBatchError::BatchFailed {
            total: summary.total,
        });
    }
    Ok(())
}

/// 诊断文本的首个非空行，表格里放不下整段输出
fn first_line(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::operation::Outcome;

    #[test]
    fn test_first_line_skips_blank_lines() {
        assert_eq!(first_line("\n\n  boom\nmore"), "boom");
        assert_eq!(first_line(""), "");
    }

    #[test]
    fn test_finish_batch_policy() {
        let empty = BatchSummary::empty();
        assert!(matches!(
            finish_batch(Path::new("/scans"), &empty),
            Err(DcmBatchError::NoFilesFound { .. })
        ));

        let all_failed = BatchSummary {
            total: 2,
            succeeded: 0,
            failed: 2,
            outcomes: vec![
                Outcome::failure(PathBuf::from("/a"), "x"),
                Outcome::failure(PathBuf::from("/b"), "y"),
            ],
        };
        assert!(matches!(
            finish_batch(Path::new("/scans"), &all_failed),
            Err(DcmBatchError::BatchFailed { total: 2 })
        ));

        let partial = BatchSummary {
            total: 2,
            succeeded: 1,
            failed: 1,
            outcomes: vec![
                Outcome::success(PathBuf::from("/a"), "ok"),
                Outcome::failure(PathBuf::from("/b"), "y"),
            ],
        };
        assert!(finish_batch(Path::new("/scans"), &partial).is_ok());
    }
}
