//! # DICOM 文件头探测
//!
//! 只读文件头判断是否为 DICOM Part 10 对象，用于发现阶段
//! 处理无扩展名的候选文件。
//!
//! ## 功能
//! - 读取 132 字节前导，校验偏移 128 处的 `DICM` 魔数
//! - 绝不读取整个文件
//!
//! ## 依赖关系
//! - 被 `batch/controller.rs`（经 `FormatProbe` trait）使用
//! - 无外部 crate 依赖

use crate::batch::operation::FormatProbe;

use std::fs::File;
use std::io::Read;
use std::path::Path;

/// DICM 魔数之前的前导长度
const PREAMBLE_LEN: usize = 128;

/// 判断文件是否带有 DICOM Part 10 文件头
pub fn is_dicom_file(path: &Path) -> bool {
    let mut file = match File::open(path) {
        Ok(f) => f,
        Err(_) => return false,
    };

    let mut header = [0u8; PREAMBLE_LEN + 4];
    match file.read_exact(&mut header) {
        Ok(()) => &header[PREAMBLE_LEN..] == b"DICM",
        Err(_) => false,
    }
}

/// 基于文件头魔数的格式探测
pub struct DicmHeaderProbe;

impl FormatProbe for DicmHeaderProbe {
    fn is_valid_object(&self, file: &Path) -> bool {
        is_dicom_file(file)
    }
}
