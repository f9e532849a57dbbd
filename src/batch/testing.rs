//! # 引擎测试替身
//!
//! 脱离真实 dcm4che 环境测试批处理引擎所用的协作者模拟实现。
//!
//! ## 依赖关系
//! - 仅在 `cfg(test)` 下编译
//! - 被 `batch/` 各模块的测试使用

use crate::batch::operation::{
    Destination, FormatProbe, Services, TagRewriter, TransferOutput, TransferService,
};
use crate::dicom::tags::TagSet;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// 总是成功的传输服务
pub struct MockTransfer;

impl MockTransfer {
    pub fn new() -> Self {
        MockTransfer
    }
}

impl TransferService for MockTransfer {
    fn transmit(&self, _file: &Path, _dest: &Destination) -> TransferOutput {
        TransferOutput {
            status: 0,
            stdout: "1 object sent".to_string(),
            stderr: String::new(),
        }
    }
}

/// 可定向失败的传输服务
pub struct FailingTransfer {
    substring: Option<String>,
    message: String,
}

impl FailingTransfer {
    /// 对所有文件失败
    pub fn new(message: &str) -> Self {
        FailingTransfer {
            substring: None,
            message: message.to_string(),
        }
    }

    /// 仅对路径含指定子串的文件失败
    pub fn for_substring(substring: &str, message: &str) -> Self {
        FailingTransfer {
            substring: Some(substring.to_string()),
            message: message.to_string(),
        }
    }
}

impl TransferService for FailingTransfer {
    fn transmit(&self, file: &Path, _dest: &Destination) -> TransferOutput {
        let matches = match &self.substring {
            Some(sub) => file.to_string_lossy().contains(sub.as_str()),
            None => true,
        };
        if matches {
            TransferOutput {
                status: 1,
                stdout: String::new(),
                stderr: self.message.clone(),
            }
        } else {
            TransferOutput {
                status: 0,
                stdout: "1 object sent".to_string(),
                stderr: String::new(),
            }
        }
    }
}

/// 模拟耗时传输的服务，总是成功
pub struct SlowTransfer {
    delay: std::time::Duration,
}

impl SlowTransfer {
    pub fn new(delay: std::time::Duration) -> Self {
        SlowTransfer { delay }
    }
}

impl TransferService for SlowTransfer {
    fn transmit(&self, _file: &Path, _dest: &Destination) -> TransferOutput {
        std::thread::sleep(self.delay);
        TransferOutput {
            status: 0,
            stdout: "1 object sent".to_string(),
            stderr: String::new(),
        }
    }
}

/// 将标签写成 `tag=value` 文本行的改写服务
///
/// 记录自己创建的临时文件，供清理断言使用。
pub struct MockRewriter {
    created: Arc<Mutex<Vec<PathBuf>>>,
}

impl MockRewriter {
    pub fn new() -> Self {
        MockRewriter {
            created: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// 该服务创建过的全部临时文件
    pub fn created_files(&self) -> Arc<Mutex<Vec<PathBuf>>> {
        Arc::clone(&self.created)
    }
}

impl TagRewriter for MockRewriter {
    fn rewrite(&self, file: &Path, tags: &TagSet) -> Result<PathBuf, String> {
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "unnamed".to_string());
        let scratch =
            std::env::temp_dir().join(format!("dcmbatch_test_{}_{}", uuid::Uuid::new_v4(), name));

        let mut body = String::new();
        for (tag, value) in tags.iter() {
            body.push_str(&format!("{}={}\n", tag, value));
        }
        fs::write(&scratch, body).map_err(|e| e.to_string())?;

        self.created.lock().unwrap().push(scratch.clone());
        Ok(scratch)
    }
}

/// 总是失败的改写服务
pub struct FailingRewriter;

impl TagRewriter for FailingRewriter {
    fn rewrite(&self, _file: &Path, _tags: &TagSet) -> Result<PathBuf, String> {
        Err("Failed to modify DICOM tags".to_string())
    }
}

/// 拒绝一切文件的格式探测
pub struct RejectAllProbe;

impl FormatProbe for RejectAllProbe {
    fn is_valid_object(&self, _file: &Path) -> bool {
        false
    }
}

/// 全部协作者都成功的服务集
pub fn services_ok() -> Services {
    Services {
        transfer: Box::new(MockTransfer::new()),
        rewriter: Box::new(MockRewriter::new()),
        probe: Box::new(RejectAllProbe),
    }
}

/// 替换传输服务的服务集
pub fn services_with_transfer(transfer: Box<dyn TransferService>) -> Services {
    Services {
        transfer,
        rewriter: Box::new(MockRewriter::new()),
        probe: Box::new(RejectAllProbe),
    }
}
