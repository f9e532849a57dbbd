//! # modify-send 命令实现
//!
//! 改写任意标签到临时副本并发送，临时文件用后即删。
//!
//! ## 功能
//! - 解析 `--tag TAG=VALUE` 列表（空值表示清空字段）
//! - 运行批处理控制器并打印汇总
//!
//! ## 依赖关系
//! - 使用 `cli/modify_send.rs` 定义的参数
//! - 使用 `batch/controller.rs`, `dicom/tags.rs`

use crate::batch::controller::BatchController;
use crate::batch::operation::{ModifySendParams, Operation};
use crate::cli::modify_send::ModifySendArgs;
use crate::cli::validate_workers;
use crate::commands::{build_services, finish_batch, progress_observer};
use crate::dicom::tags::TagSet;
use crate::error::Result;
use crate::utils::config::Config;
use crate::utils::{output, progress};

/// 执行 modify-send 命令
pub fn execute(args: ModifySendArgs) -> Result<()> {
    output::print_header("Batch Modify and Send");

    let workers = validate_workers(args.workers)?;
    let config = Config::load_or_default();
    let dest = args.conn.resolve(&config)?;
    let tags = TagSet::from_specs(&args.tags)?;

    output::print_info(&format!("Destination: {}", dest.connection_string()));
    output::print_info(&format!("Modifying {} tag(s)", tags.len()));

    let pb = progress::create_progress_bar(0, "Processing");
    let controller = BatchController::new(build_services(args.conn.lib_dir.clone()))
        .with_workers(workers)
        .with_observer(progress_observer(&pb));
    output::print_info(&format!("Workers: {}", controller.worker_count()));

    let summary = controller.run(
        &args.input,
        Operation::ModifyAndTransmit(ModifySendParams { dest, tags }),
    )?;
    pb.finish_and_clear();

    finish_batch(&args.input, &summary)
}
