//! # Worker 线程池
//!
//! 固定数量的 worker 线程循环取任务、执行操作、上报结果。
//!
//! ## 功能
//! - N 个独立 worker，互不阻塞
//! - 出队超时后继续轮询，队列封口取空即退出
//! - `catch_unwind` 兜底：worker 内部 panic 记为该任务失败，线程继续运行
//! - `run()` 在所有 worker 退出后才返回
//!
//! ## 依赖关系
//! - 被 `batch/controller.rs` 使用
//! - 使用 `batch/queue.rs`, `batch/operation.rs`, `batch/aggregator.rs`

use crate::batch::aggregator::Aggregator;
use crate::batch::operation::{Operation, Outcome, Services};
use crate::batch::queue::{DequeueError, TaskQueue};

use std::panic::{self, AssertUnwindSafe};
use std::thread;
use std::time::Duration;

/// 出队轮询间隔
const DEQUEUE_TIMEOUT: Duration = Duration::from_millis(500);

/// 固定大小的 worker 池
pub struct WorkerPool {
    workers: usize,
}

impl WorkerPool {
    /// 创建 worker 池，0 表示使用 CPU 核数
    pub fn new(workers: usize) -> Self {
        let workers = if workers == 0 {
            num_cpus::get()
        } else {
            workers
        };
        WorkerPool { workers }
    }

    /// 实际 worker 数
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// 运行所有 worker 直至队列耗尽
    pub fn run(&self, queue: &TaskQueue, operation: &Operation, services: &Services, aggregator: &Aggregator) {
        thread::scope(|scope| {
            for _ in 0..self.workers {
                scope.spawn(|| worker_loop(queue, operation, services, aggregator));
            }
        });
    }
}

/// 单个 worker 的主循环
fn worker_loop(queue: &TaskQueue, operation: &Operation, services: &Services, aggregator: &Aggregator) {
    loop {
        match queue.try_dequeue(DEQUEUE_TIMEOUT) {
            Ok(task) => {
                // Operation::execute 自身不会 panic；这里只是兜底，
                // 防止单个任务拖垮整个池
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                    operation.execute(&task, services)
                }))
                .unwrap_or_else(|_| {
                    Outcome::failure(task.clone(), "worker panicked while processing file")
                });
                aggregator.record(outcome);
            }
            Err(DequeueError::Empty) => continue,
            Err(DequeueError::Closed) => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::testing::{services_ok, services_with_transfer, FailingTransfer};
    use crate::batch::operation::{Destination, TransmitParams};
    use std::collections::HashSet;
    use std::path::PathBuf;

    fn dest() -> Destination {
        Destination {
            host: "127.0.0.1".to_string(),
            port: 11112,
            ae_title: "STORE_SCP".to_string(),
        }
    }

    #[test]
    fn test_zero_workers_falls_back_to_cpu_count() {
        assert!(WorkerPool::new(0).workers() >= 1);
        assert_eq!(WorkerPool::new(3).workers(), 3);
    }

    #[test]
    fn test_pool_processes_each_task_exactly_once() {
        let queue = TaskQueue::new();
        for i in 0..10 {
            queue.enqueue(PathBuf::from(format!("/scans/file_{i}.dcm")));
        }
        queue.close();

        let aggregator = Aggregator::new(10);
        let services = services_ok();
        let operation = Operation::Transmit(TransmitParams { dest: dest() });

        WorkerPool::new(4).run(&queue, &operation, &services, &aggregator);

        let summary = aggregator.into_summary();
        assert_eq!(summary.total, 10);
        assert_eq!(summary.succeeded + summary.failed, 10);

        let files: HashSet<_> = summary.outcomes.iter().map(|o| o.file.clone()).collect();
        assert_eq!(files.len(), 10, "each task recorded exactly once");
    }

    #[test]
    fn test_single_failure_does_not_abort_pool() {
        let queue = TaskQueue::new();
        for i in 0..3 {
            queue.enqueue(PathBuf::from(format!("/scans/file_{i}.dcm")));
        }
        queue.close();

        let aggregator = Aggregator::new(3);
        let services =
            services_with_transfer(Box::new(FailingTransfer::for_substring("file_1", "refused")));
        let operation = Operation::Transmit(TransmitParams { dest: dest() });

        WorkerPool::new(2).run(&queue, &operation, &services, &aggregator);

        let summary = aggregator.into_summary();
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 1);

        let failed = summary
            .outcomes
            .iter()
            .find(|o| !o.success)
            .expect("one failed outcome");
        assert!(failed.file.to_string_lossy().contains("file_1"));
        assert!(!failed.error.is_empty());
    }
}
