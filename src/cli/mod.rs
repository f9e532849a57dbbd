//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `send`: 批量发送 DICOM 文件到 PACS
//! - `anonymize`: 批量匿名化识别字段
//! - `modify-send`: 改写标签后发送
//! - `echo`: PACS 连通性探测
//! - `doctor`: 校验本机 dcm4che 环境
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: anonymize, doctor, echo, modify_send, send

pub mod anonymize;
pub mod doctor;
pub mod echo;
pub mod modify_send;
pub mod send;

use crate::batch::operation::Destination;
use crate::error::{DcmBatchError, Result};
use crate::utils::config::Config;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// dcmbatch - 批量 DICOM 匿名化与发送工具
#[derive(Parser)]
#[command(name = "dcmbatch")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "A batch DICOM anonymization and transmission toolkit", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Send DICOM files to a PACS server
    Send(send::SendArgs),

    /// Anonymize identifying fields in DICOM files
    Anonymize(anonymize::AnonymizeArgs),

    /// Modify DICOM tags and send the results to a PACS server
    ModifySend(modify_send::ModifySendArgs),

    /// Check connectivity to a PACS server
    Echo(echo::EchoArgs),

    /// Validate the local java/dcm4che environment
    Doctor(doctor::DoctorArgs),
}

/// PACS 连接参数，缺省时回退 `config.json` 中的默认值
#[derive(Args, Debug)]
pub struct ConnectionArgs {
    /// PACS server hostname or IP (defaults from config.json)
    #[arg(long)]
    pub host: Option<String>,

    /// PACS server port (defaults from config.json)
    #[arg(long)]
    pub port: Option<u16>,

    /// Called AE Title of the PACS server (defaults from config.json)
    #[arg(long)]
    pub ae_title: Option<String>,

    /// Directory containing the dcm4che jars
    #[arg(long, env = "DCM4CHE_LIB")]
    pub lib_dir: Option<PathBuf>,
}

impl ConnectionArgs {
    /// 合并命令行与配置默认值，得到完整连接参数
    pub fn resolve(&self, config: &Config) -> Result<Destination> {
        let dest = Destination {
            host: self
                .host
                .clone()
                .unwrap_or_else(|| config.default_host.clone()),
            port: self.port.unwrap_or(config.default_port),
            ae_title: self
                .ae_title
                .clone()
                .unwrap_or_else(|| config.default_ae_title.clone()),
        };
        dest.validate()?;
        Ok(dest)
    }
}

/// 校验 worker 数参数
pub fn validate_workers(workers: usize) -> Result<usize> {
    // 0 交给线程池解释为 CPU 核数
    if workers > 256 {
        return Err(DcmBatchError::InvalidArgument(format!(
            "worker count {workers} is unreasonably large"
        )));
    }
    Ok(workers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_args_fall_back_to_config() {
        let args = ConnectionArgs {
            host: None,
            port: Some(104),
            ae_title: None,
            lib_dir: None,
        };
        let config = Config::default();
        let dest = args.resolve(&config).unwrap();
        assert_eq!(dest.host, "127.0.0.1");
        assert_eq!(dest.port, 104);
        assert_eq!(dest.ae_title, "STORE_SCP");
    }

    #[test]
    fn test_workers_bound() {
        assert!(validate_workers(0).is_ok());
        assert!(validate_workers(16).is_ok());
        assert!(validate_workers(10_000).is_err());
    }
}
