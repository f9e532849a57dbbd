//! # 批处理引擎
//!
//! dcmbatch 的核心并发子系统：任务队列、worker 池、结果聚合与进度上报。
//!
//! ## 功能
//! - 发现阶段把输入路径展开成任务集合
//! - 固定数量的 worker 并发执行选定的操作
//! - 单文件失败被隔离，不会中断整批
//! - 独立线程按固定节奏向观察者上报进度
//!
//! ## 依赖关系
//! - 被 `commands/` 各模块使用
//! - 具体协作者实现位于 `dicom/`

pub mod aggregator;
pub mod controller;
pub mod operation;
pub mod pool;
pub mod queue;
pub mod reporter;

#[cfg(test)]
pub mod testing;

pub use aggregator::{Aggregator, BatchSummary, Snapshot};
pub use controller::{BatchController, BatchState};
pub use operation::{
    AnonymizeParams, Destination, ModifySendParams, Operation, Outcome, Services, TransmitParams,
};
pub use pool::WorkerPool;
pub use queue::TaskQueue;
pub use reporter::{ProgressObserver, ProgressReporter};
