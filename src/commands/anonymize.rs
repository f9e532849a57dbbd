//! # anonymize 命令实现
//!
//! 批量匿名化 DICOM 识别字段并写出结果文件。
//!
//! ## 功能
//! - 固定 "ANONYMOUS" 值或随机值两种模式
//! - 指定输出目录时镜像输入目录的相对结构
//!
//! ## 依赖关系
//! - 使用 `cli/anonymize.rs` 定义的参数
//! - 使用 `batch/controller.rs`, `utils/output.rs`, `utils/progress.rs`

use crate::batch::controller::BatchController;
use crate::batch::operation::{AnonymizeParams, Operation};
use crate::cli::anonymize::AnonymizeArgs;
use crate::cli::validate_workers;
use crate::commands::{build_services, finish_batch, progress_observer};
use crate::error::Result;
use crate::utils::{output, progress};

/// 执行 anonymize 命令
pub fn execute(args: AnonymizeArgs) -> Result<()> {
    output::print_header("Batch Anonymization");

    let workers = validate_workers(args.workers)?;

    if args.randomize {
        output::print_info("Using randomized replacement values");
    }
    if let Some(ref dir) = args.output_dir {
        output::print_info(&format!("Output directory: {}", dir.display()));
    }

    let input_root = if args.input.is_dir() {
        Some(args.input.clone())
    } else {
        None
    };

    let pb = progress::create_progress_bar(0, "Anonymizing");
    let controller = BatchController::new(build_services(args.lib_dir.clone()))
        .with_workers(workers)
        .with_observer(progress_observer(&pb));
    output::print_info(&format!("Workers: {}", controller.worker_count()));

    let operation = Operation::Anonymize(AnonymizeParams {
        output_dir: args.output_dir.clone(),
        input_root,
        randomize: args.randomize,
    });

    let summary = controller.run(&args.input, operation)?;
    pb.finish_and_clear();

    finish_batch(&args.input, &summary)
}
