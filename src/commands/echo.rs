//! # echo 命令实现
//!
//! 对 PACS 做一次连通性探测。
//!
//! ## 依赖关系
//! - 使用 `cli/echo.rs` 定义的参数
//! - 使用 `dicom/dcm4che.rs` 的 echo 探测

use crate::cli::echo::EchoArgs;
use crate::dicom::dcm4che::{self, Dcm4cheEnv};
use crate::error::{DcmBatchError, Result};
use crate::utils::config::{Config, CONFIG_FILE};
use crate::utils::{output, progress};

use std::path::Path;

/// 执行 echo 命令
pub fn execute(args: EchoArgs) -> Result<()> {
    output::print_header("PACS Connectivity Check");

    let config = Config::load_or_default();
    let dest = args.conn.resolve(&config)?;
    let env = Dcm4cheEnv::locate(args.conn.lib_dir.clone());

    let spinner = progress::create_spinner(&format!("Connecting to {}", dest.connection_string()));
    let result = dcm4che::echo(&env, &dest)?;
    spinner.finish_and_clear();

    if result.succeeded() {
        output::print_success(&format!("Connected to {}", dest.connection_string()));
        if args.save {
            let config = Config {
                default_host: dest.host.clone(),
                default_port: dest.port,
                default_ae_title: dest.ae_title.clone(),
            };
            config.save(Path::new(CONFIG_FILE))?;
            output::print_info(&format!("Saved connection defaults to {CONFIG_FILE}"));
        }
        Ok(())
    } else {
        output::print_error(&format!(
            "Could not connect to {}",
            dest.connection_string()
        ));
        Err(DcmBatchError::CommandFailed {
            command: "storescu".to_string(),
            stderr: result.stderr,
        })
    }
}
