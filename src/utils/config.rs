//! # 连接默认值配置
//!
//! 加载/保存 `config.json` 中的 PACS 连接默认值，命令行未显式给出
//! `--host` 等参数时作为兜底。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 使用 `serde`, `serde_json`

use crate::error::{DcmBatchError, Result};

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// 默认配置文件名（工作目录下）
pub const CONFIG_FILE: &str = "config.json";

/// PACS 连接默认值
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub default_host: String,
    #[serde(default = "default_port")]
    pub default_port: u16,
    #[serde(default = "default_ae_title")]
    pub default_ae_title: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    11112
}

fn default_ae_title() -> String {
    "STORE_SCP".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            default_host: default_host(),
            default_port: default_port(),
            default_ae_title: default_ae_title(),
        }
    }
}

impl Config {
    /// 从指定文件加载配置
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| DcmBatchError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;
        serde_json::from_str(&text).map_err(|e| DcmBatchError::ConfigParseError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// 加载工作目录下的配置；不存在或损坏时回退默认值
    pub fn load_or_default() -> Self {
        let path = Path::new(CONFIG_FILE);
        if !path.exists() {
            return Config::default();
        }
        match Config::load(path) {
            Ok(config) => config,
            Err(e) => {
                crate::utils::output::print_warning(&format!("{e}, using built-in defaults"));
                Config::default()
            }
        }
    }

    /// 保存配置
    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self).map_err(|e| {
            DcmBatchError::ConfigParseError {
                path: path.display().to_string(),
                reason: e.to_string(),
            }
        })?;
        fs::write(path, text).map_err(|e| DcmBatchError::FileWriteError {
            path: path.display().to_string(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = Config {
            default_host: "pacs.example.org".to_string(),
            default_port: 104,
            default_ae_title: "ARCHIVE".to_string(),
        };
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.default_host, "pacs.example.org");
        assert_eq!(loaded.default_port, 104);
        assert_eq!(loaded.default_ae_title, "ARCHIVE");
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"default_host": "10.0.0.5"}"#).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.default_host, "10.0.0.5");
        assert_eq!(loaded.default_port, 11112);
        assert_eq!(loaded.default_ae_title, "STORE_SCP");
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{not json").unwrap();
        assert!(Config::load(&path).is_err());
    }
}
