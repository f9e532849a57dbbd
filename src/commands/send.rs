//! # send 命令实现
//!
//! 批量发送 DICOM 文件到 PACS。
//!
//! ## 功能
//! - 解析连接参数（命令行优先，config.json 兜底）
//! - 运行批处理控制器，进度条实时反馈
//! - 打印汇总与失败明细
//!
//! ## 依赖关系
//! - 使用 `cli/send.rs` 定义的参数
//! - 使用 `batch/controller.rs`, `utils/output.rs`, `utils/progress.rs`

use crate::batch::controller::BatchController;
use crate::batch::operation::{Operation, TransmitParams};
use crate::cli::send::SendArgs;
use crate::cli::validate_workers;
use crate::commands::{build_services, finish_batch, progress_observer};
use crate::error::Result;
use crate::utils::config::Config;
use crate::utils::{output, progress};

/// 执行 send 命令
pub fn execute(args: SendArgs) -> Result<()> {
    output::print_header("Batch DICOM Send");

    let workers = validate_workers(args.workers)?;
    let config = Config::load_or_default();
    let dest = args.conn.resolve(&config)?;

    output::print_info(&format!("Destination: {}", dest.connection_string()));

    let pb = progress::create_progress_bar(0, "Sending");
    let controller = BatchController::new(build_services(args.conn.lib_dir.clone()))
        .with_workers(workers)
        .with_observer(progress_observer(&pb));
    output::print_info(&format!("Workers: {}", controller.worker_count()));

    let summary = controller.run(&args.input, Operation::Transmit(TransmitParams { dest }))?;
    pb.finish_and_clear();

    finish_batch(&args.input, &summary)
}
