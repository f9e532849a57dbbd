//! # dcm4che 环境校验
//!
//! 检查 java 运行时与 dcm4che jar 是否齐备，生成可读的诊断报告。
//!
//! ## 功能
//! - 探测 `java -version` 是否可执行
//! - 检查 jar 目录及每个必需 jar 的存在性
//!
//! ## 依赖关系
//! - 被 `commands/doctor.rs` 使用
//! - 使用 `dicom/dcm4che.rs` 的 jar 清单

use crate::dicom::dcm4che::{Dcm4cheEnv, DCM4CHE_JARS, MODIFIER_JAR};

use std::process::Command;

/// 单项检查结果
#[derive(Debug)]
pub struct Check {
    pub name: String,
    pub passed: bool,
    pub detail: String,
}

/// 环境校验报告
#[derive(Debug)]
pub struct ValidationReport {
    pub checks: Vec<Check>,
}

impl ValidationReport {
    /// 全部检查是否通过
    pub fn is_valid(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    /// 渲染为多行文本
    pub fn render(&self) -> String {
        self.checks
            .iter()
            .map(|c| {
                let mark = if c.passed { "[OK]" } else { "[MISSING]" };
                if c.detail.is_empty() {
                    format!("{} {}", mark, c.name)
                } else {
                    format!("{} {} - {}", mark, c.name, c.detail)
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// 校验 dcm4che 环境
pub fn validate_dcm4che_setup(env: &Dcm4cheEnv) -> ValidationReport {
    let mut checks = Vec::new();

    checks.push(check_java());

    let lib_dir = env.lib_dir();
    checks.push(Check {
        name: format!("jar directory {}", lib_dir.display()),
        passed: lib_dir.is_dir(),
        detail: String::new(),
    });

    for jar in DCM4CHE_JARS.iter().chain(std::iter::once(&MODIFIER_JAR)) {
        checks.push(Check {
            name: jar.to_string(),
            passed: lib_dir.join(jar).is_file(),
            detail: String::new(),
        });
    }

    ValidationReport { checks }
}

fn check_java() -> Check {
    match Command::new("java").arg("-version").output() {
        Ok(out) if out.status.success() => {
            // java 把版本信息写到 stderr
            let version = String::from_utf8_lossy(&out.stderr)
                .lines()
                .next()
                .unwrap_or("")
                .to_string();
            Check {
                name: "java runtime".to_string(),
                passed: true,
                detail: version,
            }
        }
        Ok(out) => Check {
            name: "java runtime".to_string(),
            passed: false,
            detail: String::from_utf8_lossy(&out.stderr).trim().to_string(),
        },
        Err(e) => Check {
            name: "java runtime".to_string(),
            passed: false,
            detail: format!("not found in PATH: {e}"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_missing_lib_dir_fails_validation() {
        let env = Dcm4cheEnv::locate(Some(PathBuf::from("/no/such/dir")));
        let report = validate_dcm4che_setup(&env);
        assert!(!report.is_valid());
        assert!(report.render().contains("dcm4che-tool-storescu-5.33.1.jar"));
    }

    #[test]
    fn test_report_lists_every_jar() {
        let env = Dcm4cheEnv::locate(Some(PathBuf::from("libs")));
        let report = validate_dcm4che_setup(&env);
        // java + 目录 + 各 jar + 改写器
        assert_eq!(report.checks.len(), 2 + DCM4CHE_JARS.len() + 1);
    }
}
