//! # 外部标签改写服务
//!
//! 调用随附的 DicomModifier java 工具，把标签替换写入新的临时文件。
//!
//! ## 功能
//! - 每次调用生成唯一、不可预测的临时文件名，worker 并发下互不碰撞
//! - 空替换值照样传给工具：语义是清空字段，不是保留原值
//! - 失败以诊断文本返回，绝不 panic
//!
//! ## 依赖关系
//! - 实现 `batch/operation.rs` 的 `TagRewriter`
//! - 使用 `dicom/dcm4che.rs` 的环境定位与 classpath
//! - 使用 `rand` 生成临时文件名后缀

use crate::batch::operation::TagRewriter;
use crate::dicom::dcm4che::Dcm4cheEnv;
use crate::dicom::tags::TagSet;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use rand::Rng;

const MODIFIER_CLASS: &str = "DicomModifier";

/// 基于 DicomModifier 工具的标签改写服务
pub struct ExternalTagRewriter {
    env: Dcm4cheEnv,
}

impl ExternalTagRewriter {
    pub fn new(env: Dcm4cheEnv) -> Self {
        ExternalTagRewriter { env }
    }
}

impl TagRewriter for ExternalTagRewriter {
    fn rewrite(&self, file: &Path, tags: &TagSet) -> Result<PathBuf, String> {
        let scratch = scratch_path(file);

        let output = Command::new("java")
            .args(modifier_args(&self.env, file, &scratch, tags))
            .output()
            .map_err(|e| format!("Failed to run java: {e}"))?;

        if output.status.success() {
            Ok(scratch)
        } else {
            // 工具可能留下半成品输出文件
            let _ = fs::remove_file(&scratch);
            let stderr = String::from_utf8_lossy(&output.stderr);
            if stderr.trim().is_empty() {
                Err("Failed to modify DICOM tags".to_string())
            } else {
                Err(stderr.to_string())
            }
        }
    }
}

/// 生成唯一临时输出路径
///
/// 名字带随机后缀，并发 worker 处理同名文件时不会互相覆盖。
fn scratch_path(input: &Path) -> PathBuf {
    const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();
    let suffix: String = (0..8)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();

    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "unnamed.dcm".to_string());

    std::env::temp_dir().join(format!("modified_{suffix}_{name}"))
}

/// 拼装 DicomModifier 的命令行参数
///
/// 空值的标签同样传入（`tag=`），由工具写入空字段。
fn modifier_args(env: &Dcm4cheEnv, input: &Path, output: &Path, tags: &TagSet) -> Vec<String> {
    let mut args = vec![
        "-cp".to_string(),
        env.modifier_classpath(),
        MODIFIER_CLASS.to_string(),
        input.display().to_string(),
        output.display().to_string(),
    ];
    for (tag, value) in tags.iter() {
        args.push(format!("{tag}={value}"));
    }
    args
}
