//! # doctor 命令实现
//!
//! 校验本机 java/dcm4che 环境并打印报告。
//!
//! ## 依赖关系
//! - 使用 `cli/doctor.rs` 定义的参数
//! - 使用 `utils/validator.rs`

use crate::cli::doctor::DoctorArgs;
use crate::dicom::Dcm4cheEnv;
use crate::error::{DcmBatchError, Result};
use crate::utils::output;
use crate::utils::validator::validate_dcm4che_setup;

/// 执行 doctor 命令
pub fn execute(args: DoctorArgs) -> Result<()> {
    output::print_header("Environment Check");

    let env = Dcm4cheEnv::locate(args.lib_dir.clone());
    let report = validate_dcm4che_setup(&env);

    println!("{}", report.render());
    output::print_separator();

    if report.is_valid() {
        output::print_success("dcm4che environment looks good");
        Ok(())
    } else {
        Err(DcmBatchError::EnvironmentInvalid {
            report: report.render(),
        })
    }
}
