//! # dcm4che 工具链封装
//!
//! 通过外部 java 进程调用 dcm4che 的 StoreSCU 工具完成发送与连通性探测。
//!
//! ## 功能
//! - 定位 dcm4che jar 目录（`DCM4CHE_LIB` 环境变量或默认 `lib/dcm4che/lib`）
//! - 拼装 classpath 并执行 `org.dcm4che3.tool.storescu.StoreSCU`
//! - 退出码与 stdout/stderr 逐字捕获，发送失败不抛出
//!
//! ## 依赖关系
//! - 实现 `batch/operation.rs` 的 `TransferService`
//! - 被 `commands/send.rs`, `commands/modify_send.rs`, `commands/echo.rs` 使用

use crate::batch::operation::{Destination, TransferOutput, TransferService};
use crate::error::{DcmBatchError, Result};

use std::path::{Path, PathBuf};
use std::process::Command;

/// StoreSCU 所需的 dcm4che 5.33.1 jar 清单
pub const DCM4CHE_JARS: &[&str] = &[
    "dcm4che-core-5.33.1.jar",
    "dcm4che-net-5.33.1.jar",
    "dcm4che-tool-common-5.33.1.jar",
    "commons-cli-1.9.0.jar",
    "slf4j-api-2.0.16.jar",
    "logback-core-1.5.12.jar",
    "logback-classic-1.5.12.jar",
    "dcm4che-tool-storescu-5.33.1.jar",
];

/// 标签改写工具的 jar
pub const MODIFIER_JAR: &str = "DicomModifier.jar";

const STORESCU_CLASS: &str = "org.dcm4che3.tool.storescu.StoreSCU";

/// echo 探测使用的本端 AE Title
const LOCAL_AE_TITLE: &str = "DCMBATCH";

/// classpath 条目分隔符
pub const CLASSPATH_SEP: &str = if cfg!(windows) { ";" } else { ":" };

/// dcm4che 安装环境
#[derive(Debug, Clone)]
pub struct Dcm4cheEnv {
    lib_dir: PathBuf,
}

impl Dcm4cheEnv {
    /// 定位 jar 目录
    ///
    /// 优先显式指定，其次 `DCM4CHE_LIB` 环境变量，最后默认相对路径。
    pub fn locate(lib_dir: Option<PathBuf>) -> Self {
        let lib_dir = lib_dir
            .or_else(|| std::env::var_os("DCM4CHE_LIB").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("lib").join("dcm4che").join("lib"));
        Dcm4cheEnv { lib_dir }
    }

    pub fn lib_dir(&self) -> &Path {
        &self.lib_dir
    }

    /// StoreSCU 的 classpath
    pub fn storescu_classpath(&self) -> String {
        DCM4CHE_JARS
            .iter()
            .map(|jar| self.lib_dir.join(jar).display().to_string())
            .collect::<Vec<_>>()
            .join(CLASSPATH_SEP)
    }

    /// 标签改写工具的 classpath（dcm4che 核心 jar 加改写器自身）
    pub fn modifier_classpath(&self) -> String {
        format!(
            "{}{}{}",
            self.storescu_classpath(),
            CLASSPATH_SEP,
            self.lib_dir.join(MODIFIER_JAR).display()
        )
    }
}

/// 基于 StoreSCU 的传输服务
pub struct StoreScuTransfer {
    env: Dcm4cheEnv,
}

impl StoreScuTransfer {
    pub fn new(env: Dcm4cheEnv) -> Self {
        StoreScuTransfer { env }
    }
}

impl TransferService for StoreScuTransfer {
    fn transmit(&self, file: &Path, dest: &Destination) -> TransferOutput {
        let output = Command::new("java")
            .arg("-cp")
            .arg(self.env.storescu_classpath())
            .arg(STORESCU_CLASS)
            .arg("-c")
            .arg(dest.connection_string())
            .arg("--")
            .arg(file)
            .output();

        match output {
            Ok(out) => TransferOutput {
                status: out.status.code().unwrap_or(-1),
                stdout: String::from_utf8_lossy(&out.stdout).to_string(),
                stderr: String::from_utf8_lossy(&out.stderr).to_string(),
            },
            Err(e) => TransferOutput {
                status: -1,
                stdout: String::new(),
                stderr: format!("Failed to run java: {e}"),
            },
        }
    }
}

/// 连通性探测
///
/// 只建立关联不发送对象；stdout 出现 "Connected to" 即视为成功。
pub fn echo(env: &Dcm4cheEnv, dest: &Destination) -> Result<TransferOutput> {
    let output = Command::new("java")
        .arg("-cp")
        .arg(env.storescu_classpath())
        .arg(STORESCU_CLASS)
        .arg("-b")
        .arg(LOCAL_AE_TITLE)
        .arg("-c")
        .arg(dest.connection_string())
        .output()
        .map_err(|_| DcmBatchError::CommandNotFound {
            command: "java".to_string(),
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let status = if stdout.contains("Connected to") {
        0
    } else {
        output.status.code().unwrap_or(-1).max(1)
    };

    Ok(TransferOutput {
        status,
        stdout,
        stderr,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_prefers_explicit_dir() {
        let env = Dcm4cheEnv::locate(Some(PathBuf::from("/opt/dcm4che/lib")));
        assert_eq!(env.lib_dir(), Path::new("/opt/dcm4che/lib"));
    }

    #[test]
    fn test_storescu_classpath_contains_all_jars() {
        let env = Dcm4cheEnv::locate(Some(PathBuf::from("libs")));
        let cp = env.storescu_classpath();
        for jar in DCM4CHE_JARS {
            assert!(cp.contains(jar), "classpath missing {jar}");
        }
        assert_eq!(cp.matches(CLASSPATH_SEP).count(), DCM4CHE_JARS.len() - 1);
    }

    #[test]
    fn test_modifier_classpath_appends_modifier_jar() {
        let env = Dcm4cheEnv::locate(Some(PathBuf::from("libs")));
        assert!(env.modifier_classpath().ends_with(MODIFIER_JAR));
    }

    #[test]
    fn test_connection_string_format() {
        let dest = Destination {
            host: "pacs.example.org".to_string(),
            port: 11112,
            ae_title: "STORE_SCP".to_string(),
        };
        assert_eq!(dest.connection_string(), "STORE_SCP@pacs.example.org:11112");
    }
}
