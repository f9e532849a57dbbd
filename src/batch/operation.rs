//! # 批处理操作
//!
//! 对单个 DICOM 文件执行的可插拔操作：匿名化、发送、改写后发送。
//!
//! ## 功能
//! - 封闭的操作枚举，每批次选定一次
//! - 每文件的失败被隔离为失败的 `Outcome`，绝不越过边界抛出
//! - 临时文件在成功与失败路径上都会被清理
//! - 通过 trait 消费外部协作者，引擎可脱离真实 dcm4che 环境测试
//!
//! ## 依赖关系
//! - 被 `batch/pool.rs`, `batch/controller.rs` 使用
//! - 使用 `dicom/tags.rs` 的标签集合与匿名化配置
//! - 具体协作者实现位于 `dicom/dcm4che.rs`, `dicom/modifier.rs`, `dicom/probe.rs`

use crate::dicom::tags::{anonymize_tag_set, TagSet};
use crate::error::{DcmBatchError, Result};

use std::fs;
use std::path::{Path, PathBuf};

/// PACS 目标连接参数
#[derive(Debug, Clone)]
pub struct Destination {
    pub host: String,
    pub port: u16,
    pub ae_title: String,
}

impl Destination {
    /// 校验连接参数齐全
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(DcmBatchError::MissingParameter("host".to_string()));
        }
        if self.port == 0 {
            return Err(DcmBatchError::MissingParameter("port".to_string()));
        }
        if self.ae_title.trim().is_empty() {
            return Err(DcmBatchError::MissingParameter("ae-title".to_string()));
        }
        Ok(())
    }

    /// dcm4che 连接串形式 `AET@host:port`
    pub fn connection_string(&self) -> String {
        format!("{}@{}:{}", self.ae_title, self.host, self.port)
    }
}

/// 外部传输服务的原始执行结果
#[derive(Debug, Clone, Default)]
pub struct TransferOutput {
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TransferOutput {
    pub fn succeeded(&self) -> bool {
        self.status == 0
    }
}

/// 传输协作者：将一个文件发往 PACS
///
/// 必须支持多 worker 并发调用（各自处理不同文件）。
pub trait TransferService: Send + Sync {
    fn transmit(&self, file: &Path, dest: &Destination) -> TransferOutput;
}

/// 标签改写协作者：改写标签并写入新的临时文件
///
/// 失败以 `Err(诊断文本)` 返回，不得 panic；相同输入应当幂等。
pub trait TagRewriter: Send + Sync {
    fn rewrite(&self, file: &Path, tags: &TagSet) -> std::result::Result<PathBuf, String>;
}

/// 文件格式探测协作者：仅凭文件头判断是否为 DICOM 对象
pub trait FormatProbe: Send + Sync {
    fn is_valid_object(&self, file: &Path) -> bool;
}

/// 一次批处理所依赖的全部外部协作者
pub struct Services {
    pub transfer: Box<dyn TransferService>,
    pub rewriter: Box<dyn TagRewriter>,
    pub probe: Box<dyn FormatProbe>,
}

/// 单个文件的处理结果
#[derive(Debug, Clone)]
pub struct Outcome {
    /// 输入文件路径
    pub file: PathBuf,
    /// 是否成功
    pub success: bool,
    /// 成功时的输出（输出文件路径或传输工具 stdout）
    pub output: String,
    /// 失败时的诊断文本，逐字保留协作者的输出
    pub error: String,
}

impl Outcome {
    pub fn success(file: PathBuf, output: impl Into<String>) -> Self {
        Outcome {
            file,
            success: true,
            output: output.into(),
            error: String::new(),
        }
    }

    pub fn failure(file: PathBuf, error: impl Into<String>) -> Self {
        Outcome {
            file,
            success: false,
            output: String::new(),
            error: error.into(),
        }
    }
}

/// 匿名化操作参数
#[derive(Debug, Clone)]
pub struct AnonymizeParams {
    /// 输出目录；为 None 时写到输入文件旁
    pub output_dir: Option<PathBuf>,
    /// 批处理输入根目录，用于在输出目录下镜像相对路径
    pub input_root: Option<PathBuf>,
    /// 使用随机值而非固定 "ANONYMOUS" 值
    pub randomize: bool,
}

/// 发送操作参数
#[derive(Debug, Clone)]
pub struct TransmitParams {
    pub dest: Destination,
}

/// 改写后发送操作参数
#[derive(Debug, Clone)]
pub struct ModifySendParams {
    pub dest: Destination,
    pub tags: TagSet,
}

/// 每批次选定一次的操作
pub enum Operation {
    Anonymize(AnonymizeParams),
    Transmit(TransmitParams),
    ModifyAndTransmit(ModifySendParams),
}

impl Operation {
    /// 批处理开始前的参数校验
    pub fn validate(&self) -> Result<()> {
        match self {
            Operation::Anonymize(_) => Ok(()),
            Operation::Transmit(params) => params.dest.validate(),
            Operation::ModifyAndTransmit(params) => {
                params.dest.validate()?;
                if params.tags.is_empty() {
                    return Err(DcmBatchError::MissingParameter(
                        "at least one --tag is required for modify-send".to_string(),
                    ));
                }
                Ok(())
            }
        }
    }

    /// 对单个任务执行操作
    ///
    /// 任何内部失败都转换为失败的 `Outcome`，不向上传播。
    pub fn execute(&self, task: &Path, services: &Services) -> Outcome {
        match self {
            Operation::Anonymize(params) => execute_anonymize(task, params, services),
            Operation::Transmit(params) => execute_transmit(task, params, services),
            Operation::ModifyAndTransmit(params) => execute_modify_send(task, params, services),
        }
    }
}

/// 匿名化：改写识别字段，结果落到派生的输出路径
fn execute_anonymize(task: &Path, params: &AnonymizeParams, services: &Services) -> Outcome {
    let tags = anonymize_tag_set(params.randomize);

    let scratch = match services.rewriter.rewrite(task, &tags) {
        Ok(path) => path,
        Err(reason) => return Outcome::failure(task.to_path_buf(), reason),
    };

    let output_path = match derive_output_path(task, params) {
        Ok(path) => path,
        Err(e) => {
            cleanup_scratch(&scratch);
            return Outcome::failure(task.to_path_buf(), e.to_string());
        }
    };

    if let Some(parent) = output_path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            cleanup_scratch(&scratch);
            return Outcome::failure(
                task.to_path_buf(),
                format!("Failed to create output directory {}: {}", parent.display(), e),
            );
        }
    }

    let copied = fs::copy(&scratch, &output_path);
    cleanup_scratch(&scratch);

    match copied {
        Ok(_) => Outcome::success(task.to_path_buf(), output_path.display().to_string()),
        Err(e) => Outcome::failure(
            task.to_path_buf(),
            format!("Failed to write {}: {}", output_path.display(), e),
        ),
    }
}

/// 发送：成功与否由传输工具的退出码决定
fn execute_transmit(task: &Path, params: &TransmitParams, services: &Services) -> Outcome {
    let result = services.transfer.transmit(task, &params.dest);
    if result.succeeded() {
        Outcome::success(task.to_path_buf(), result.stdout)
    } else {
        let error = if result.stderr.trim().is_empty() {
            format!("storescu exited with status {}", result.status)
        } else {
            result.stderr
        };
        Outcome::failure(task.to_path_buf(), error)
    }
}

/// 改写后发送：临时文件无论传输成败都要删除
fn execute_modify_send(task: &Path, params: &ModifySendParams, services: &Services) -> Outcome {
    let scratch = match services.rewriter.rewrite(task, &params.tags) {
        Ok(path) => path,
        Err(reason) => return Outcome::failure(task.to_path_buf(), reason),
    };

    let result = services.transfer.transmit(&scratch, &params.dest);
    cleanup_scratch(&scratch);

    if result.succeeded() {
        Outcome::success(task.to_path_buf(), result.stdout)
    } else {
        let error = if result.stderr.trim().is_empty() {
            format!("storescu exited with status {}", result.status)
        } else {
            result.stderr
        };
        Outcome::failure(task.to_path_buf(), error)
    }
}

/// 派生匿名化输出路径
///
/// 指定输出目录时在其下镜像输入根目录的相对路径，
/// 否则写到输入文件旁，文件名追加 `_anonymized`。
fn derive_output_path(task: &Path, params: &AnonymizeParams) -> Result<PathBuf> {
    let stem = task
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| DcmBatchError::InvalidArgument(format!("bad file name: {}", task.display())))?;
    let ext = task.extension().and_then(|e| e.to_str()).unwrap_or("dcm");
    let file_name = format!("{}_anonymized.{}", stem, ext);

    match &params.output_dir {
        Some(output_dir) => {
            let relative_dir = params
                .input_root
                .as_deref()
                .and_then(|root| task.parent().and_then(|p| p.strip_prefix(root).ok()))
                .unwrap_or_else(|| Path::new(""));
            Ok(output_dir.join(relative_dir).join(file_name))
        }
        None => {
            let dir = task.parent().unwrap_or_else(|| Path::new("."));
            Ok(dir.join(file_name))
        }
    }
}

/// 删除临时文件；失败只作为警告，不影响任务的成败归类
fn cleanup_scratch(scratch: &Path) {
    if let Err(e) = fs::remove_file(scratch) {
        crate::utils::output::print_warning(&format!(
            "Failed to remove temporary file {}: {}",
            scratch.display(),
            e
        ));
    }
}
