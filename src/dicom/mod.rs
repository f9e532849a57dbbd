//! # DICOM 协作者模块
//!
//! 批处理引擎消费的外部协作者：dcm4che 传输、标签改写、文件头探测。
//!
//! ## 依赖关系
//! - 被 `batch/`, `commands/` 使用
//! - 子模块: dcm4che, modifier, probe, tags

pub mod dcm4che;
pub mod modifier;
pub mod probe;
pub mod tags;

pub use dcm4che::{Dcm4cheEnv, StoreScuTransfer};
pub use modifier::ExternalTagRewriter;
pub use probe::DicmHeaderProbe;
pub use tags::TagSet;
