//! # DICOM 标签集合与匿名化配置
//!
//! 标签标识符的规范化、校验，以及识别字段的替换值生成。
//!
//! ## 功能
//! - 标签写法规范化：剥离逗号、空白、括号后统一为 8 位十六进制
//! - 解析命令行 `tag=value` 写法
//! - 固定 / 随机两种匿名化配置
//!
//! ## 依赖关系
//! - 被 `batch/operation.rs`, `dicom/modifier.rs`, `commands/` 使用
//! - 使用 `rand`, `uuid`, `chrono` 生成随机替换值

use crate::error::{DcmBatchError, Result};

use std::collections::BTreeMap;

use chrono::{Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use regex::Regex;
use uuid::Uuid;

// 识别字段
pub const TAG_PATIENT_NAME: &str = "00100010";
pub const TAG_PATIENT_ID: &str = "00100020";
pub const TAG_BIRTH_DATE: &str = "00100030";
pub const TAG_PATIENT_SEX: &str = "00100040";
pub const TAG_STUDY_DESCRIPTION: &str = "00081030";
pub const TAG_SOP_INSTANCE_UID: &str = "00080018";
pub const TAG_OPERATOR_NAME: &str = "00081070";
pub const TAG_MODEL_NAME: &str = "00081090";
pub const TAG_REFERRING_PHYSICIAN: &str = "00080090";

/// 随机 SOP Instance UID 的根
const UID_ROOT: &str = "1.2.826.0.1.3680043.8.498";

/// 一组标签替换，键为规范化后的标签标识符
///
/// 空字符串的替换值表示清空该字段，不是保留原值。
#[derive(Debug, Clone, Default)]
pub struct TagSet {
    entries: BTreeMap<String, String>,
}

impl TagSet {
    /// 创建空集合
    pub fn new() -> Self {
        TagSet::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 插入一条替换，标签先规范化再校验
    pub fn insert(&mut self, tag: &str, value: &str) -> Result<()> {
        let normalized = normalize_tag(tag);
        let pattern = Regex::new(r"^[0-9A-F]{8}$").unwrap();
        if !pattern.is_match(&normalized) {
            return Err(DcmBatchError::InvalidTag {
                tag: tag.to_string(),
                reason: "expected 8 hex digits, e.g. 00100020 or 0010,0020".to_string(),
            });
        }
        self.entries.insert(normalized, value.to_string());
        Ok(())
    }

    /// 从命令行 `tag=value` 写法构造
    pub fn from_specs(specs: &[String]) -> Result<Self> {
        let mut tags = TagSet::new();
        for spec in specs {
            let (tag, value) = spec.split_once('=').ok_or_else(|| {
                DcmBatchError::InvalidArgument(format!(
                    "bad tag spec '{spec}', expected TAG=VALUE (e.g. '00100020=ANONYMOUS')"
                ))
            })?;
            tags.insert(tag, value)?;
        }
        Ok(tags)
    }

    /// 按标签顺序迭代
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn get(&self, tag: &str) -> Option<&str> {
        self.entries.get(&normalize_tag(tag)).map(|v| v.as_str())
    }
}

/// 规范化标签写法
///
/// `0010,0020`、`(0010,0020)`、`0010 0020` 都折叠为 `00100020`，
/// 保证同一字段的不同写法落到同一个键上。
pub fn normalize_tag(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, ',' | '(' | ')') && !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

/// 构造匿名化标签集
///
/// `randomize=false` 时使用固定 "ANONYMOUS" 值，两次调用结果一致；
/// `randomize=true` 时识别字段使用随机值并刷新 SOP Instance UID。
pub fn anonymize_tag_set(randomize: bool) -> TagSet {
    let mut tags = TagSet::new();

    if randomize {
        tags.entries
            .insert(TAG_PATIENT_NAME.to_string(), random_patient_name());
        tags.entries
            .insert(TAG_PATIENT_ID.to_string(), random_patient_id(8));
        tags.entries
            .insert(TAG_BIRTH_DATE.to_string(), random_past_date());
        tags.entries
            .insert(TAG_PATIENT_SEX.to_string(), random_sex());
        tags.entries.insert(
            TAG_STUDY_DESCRIPTION.to_string(),
            format!("ANONYMOUS STUDY {}", random_patient_id(4)),
        );
        tags.entries
            .insert(TAG_SOP_INSTANCE_UID.to_string(), random_sop_instance_uid());
    } else {
        tags.entries
            .insert(TAG_PATIENT_NAME.to_string(), "ANONYMOUS^PATIENT".to_string());
        tags.entries
            .insert(TAG_PATIENT_ID.to_string(), "ANONYMOUS".to_string());
        // 出生日期清空
        tags.entries.insert(TAG_BIRTH_DATE.to_string(), String::new());
        tags.entries
            .insert(TAG_PATIENT_SEX.to_string(), "O".to_string());
        tags.entries.insert(
            TAG_STUDY_DESCRIPTION.to_string(),
            "ANONYMOUS STUDY".to_string(),
        );
    }

    // 两种模式都清理的附加字段
    tags.entries.insert(TAG_OPERATOR_NAME.to_string(), String::new());
    tags.entries.insert(TAG_MODEL_NAME.to_string(), String::new());
    tags.entries.insert(
        TAG_REFERRING_PHYSICIAN.to_string(),
        "ANONYMOUS^DOCTOR".to_string(),
    );

    tags
}

/// 随机病人姓名，DICOM `LAST^FIRST` 形式
fn random_patient_name() -> String {
    const LAST: &[&str] = &[
        "SMITH", "JONES", "WILLIAMS", "BROWN", "TAYLOR", "ANONYMOUS", "TEST", "DOE",
    ];
    const FIRST: &[&str] = &[
        "JOHN", "JANE", "MICHAEL", "ROBERT", "SARAH", "MARY", "JAMES", "TEST",
    ];
    let mut rng = rand::thread_rng();
    format!(
        "{}^{}",
        LAST.choose(&mut rng).unwrap(),
        FIRST.choose(&mut rng).unwrap()
    )
}

/// 随机大写字母数字 ID
fn random_patient_id(len: usize) -> String {
    const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

/// 过去五年内的随机日期，YYYYMMDD
fn random_past_date() -> String {
    let mut rng = rand::thread_rng();
    let days_back = rng.gen_range(0..365 * 5);
    let date = Utc::now().date_naive() - Duration::days(days_back);
    date.format("%Y%m%d").to_string()
}

fn random_sex() -> String {
    let mut rng = rand::thread_rng();
    ["M", "F", "O"].choose(&mut rng).unwrap().to_string()
}

/// 随机 SOP Instance UID
fn random_sop_instance_uid() -> String {
    let a = Uuid::new_v4().as_u128() % 10_000_000;
    let b = Uuid::new_v4().as_u128() % 10_000_000;
    let c = Uuid::new_v4().as_u128() % 10_000_000;
    format!("{UID_ROOT}.{a}.{b}.{c}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_separators() {
        assert_eq!(normalize_tag("0010,0020"), "00100020");
        assert_eq!(normalize_tag("(0010,0020)"), "00100020");
        assert_eq!(normalize_tag("0010 0020"), "00100020");
        assert_eq!(normalize_tag("0008103e"), "0008103E");
    }

    #[test]
    fn test_equivalent_spellings_collide() {
        let mut tags = TagSet::new();
        tags.insert("0010,0020", "FIRST").unwrap();
        tags.insert("00100020", "SECOND").unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags.get("0010,0020"), Some("SECOND"));
    }

    #[test]
    fn test_invalid_tag_rejected() {
        let mut tags = TagSet::new();
        assert!(tags.insert("PatientID", "X").is_err());
        assert!(tags.insert("0010", "X").is_err());
        assert!(tags.insert("001000ZZ", "X").is_err());
    }

    #[test]
    fn test_empty_value_means_clear_not_skip() {
        let mut tags = TagSet::new();
        tags.insert("00100020", "").unwrap();
        assert_eq!(tags.get("00100020"), Some(""));
        assert_eq!(tags.len(), 1);
    }

    #[test]
    fn test_from_specs() {
        let tags = TagSet::from_specs(&[
            "00100020=ANON".to_string(),
            "0010,0030=".to_string(),
        ])
        .unwrap();
        assert_eq!(tags.get("00100020"), Some("ANON"));
        assert_eq!(tags.get("00100030"), Some(""));

        assert!(TagSet::from_specs(&["no-equals-sign".to_string()]).is_err());
    }

    #[test]
    fn test_fixed_profile_is_deterministic() {
        let a = anonymize_tag_set(false);
        let b = anonymize_tag_set(false);
        let a_pairs: Vec<_> = a.iter().collect();
        let b_pairs: Vec<_> = b.iter().collect();
        assert_eq!(a_pairs, b_pairs);

        assert_eq!(a.get(TAG_PATIENT_ID), Some("ANONYMOUS"));
        assert_eq!(a.get(TAG_BIRTH_DATE), Some(""));
        assert_eq!(a.get(TAG_OPERATOR_NAME), Some(""));
    }

    #[test]
    fn test_randomized_profile_differs_between_runs() {
        let a = anonymize_tag_set(true);
        let b = anonymize_tag_set(true);
        // SOP Instance UID 基于 UUID，两次相同的概率可以忽略
        assert_ne!(a.get(TAG_SOP_INSTANCE_UID), b.get(TAG_SOP_INSTANCE_UID));
        assert!(a
            .get(TAG_SOP_INSTANCE_UID)
            .unwrap()
            .starts_with("1.2.826.0.1.3680043.8.498."));
    }
}
