//! # 结果聚合器
//!
//! 多个 worker 并发上报处理结果，聚合为计数与结果列表。
//!
//! ## 功能
//! - 单把互斥锁同时保护计数与结果列表，无丢失更新
//! - `snapshot()` 供进度上报线程读取，允许读到稍旧的值
//! - 批处理结束后转换为最终 `BatchSummary`
//!
//! ## 依赖关系
//! - 被 `batch/pool.rs`, `batch/reporter.rs`, `batch/controller.rs` 使用
//! - 使用 `batch/operation.rs` 的 `Outcome`

use crate::batch::operation::Outcome;

use std::sync::Mutex;

/// 批处理最终汇总
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// 任务总数（发现阶段结束后固定）
    pub total: usize,
    /// 成功数量
    pub succeeded: usize,
    /// 失败数量
    pub failed: usize,
    /// 全部结果，按完成顺序排列
    pub outcomes: Vec<Outcome>,
}

impl BatchSummary {
    /// 零任务时的空汇总
    pub fn empty() -> Self {
        BatchSummary::default()
    }
}

/// 某一时刻的进度快照，仅用于展示
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub processed: usize,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl Snapshot {
    /// 尚未处理的任务数
    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.processed)
    }
}

struct AggregateState {
    succeeded: usize,
    failed: usize,
    outcomes: Vec<Outcome>,
}

/// 线程安全的结果聚合器
pub struct Aggregator {
    total: usize,
    state: Mutex<AggregateState>,
}

impl Aggregator {
    /// 创建聚合器，任务总数此后不变
    pub fn new(total: usize) -> Self {
        Aggregator {
            total,
            state: Mutex::new(AggregateState {
                succeeded: 0,
                failed: 0,
                outcomes: Vec::with_capacity(total),
            }),
        }
    }

    /// 记录一个处理结果（worker 并发调用）
    pub fn record(&self, outcome: Outcome) {
        let mut state = self.state.lock().unwrap();
        if outcome.success {
            state.succeeded += 1;
        } else {
            state.failed += 1;
        }
        state.outcomes.push(outcome);
    }

    /// 读取一致的进度快照
    pub fn snapshot(&self) -> Snapshot {
        let state = self.state.lock().unwrap();
        Snapshot {
            processed: state.succeeded + state.failed,
            total: self.total,
            succeeded: state.succeeded,
            failed: state.failed,
        }
    }

    /// 消费聚合器，产出最终汇总
    pub fn into_summary(self) -> BatchSummary {
        let state = self.state.into_inner().unwrap();
        BatchSummary {
            total: self.total,
            succeeded: state.succeeded,
            failed: state.failed,
            outcomes: state.outcomes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_record_and_summary_counts() {
        let agg = Aggregator::new(3);
        agg.record(Outcome::success(PathBuf::from("/a"), "ok"));
        agg.record(Outcome::failure(PathBuf::from("/b"), "boom"));
        agg.record(Outcome::success(PathBuf::from("/c"), "ok"));

        let summary = agg.into_summary();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.succeeded + summary.failed, summary.total);
        assert_eq!(summary.outcomes.len(), 3);
    }

    #[test]
    fn test_snapshot_never_exceeds_total() {
        let agg = Aggregator::new(2);
        agg.record(Outcome::success(PathBuf::from("/a"), "ok"));

        let snap = agg.snapshot();
        assert_eq!(snap.processed, 1);
        assert_eq!(snap.remaining(), 1);
        assert_eq!(snap.succeeded, 1);
        assert_eq!(snap.failed, 0);
    }

    #[test]
    fn test_concurrent_record_has_no_lost_updates() {
        let agg = Arc::new(Aggregator::new(400));
        let mut handles = Vec::new();
        for t in 0..4 {
            let agg = Arc::clone(&agg);
            handles.push(thread::spawn(move || {
                for i in 0..100 {
                    let path = PathBuf::from(format!("/f_{t}_{i}"));
                    if i % 2 == 0 {
                        agg.record(Outcome::success(path, "ok"));
                    } else {
                        agg.record(Outcome::failure(path, "err"));
                    }
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }

        let summary = Arc::try_unwrap(agg).ok().unwrap().into_summary();
        assert_eq!(summary.succeeded, 200);
        assert_eq!(summary.failed, 200);
        assert_eq!(summary.outcomes.len(), 400);
    }
}
