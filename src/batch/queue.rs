//! # 任务队列
//!
//! 线程安全的待处理文件队列，供多个 worker 并发取任务。
//!
//! ## 功能
//! - 静态填充：生产者入队完毕后调用 `close()` 封口
//! - 带超时的出队，每个任务恰好交付给一个 worker
//! - 队列封口且取空后出队返回 `Closed`，worker 据此退出
//!
//! ## 依赖关系
//! - 被 `batch/pool.rs`, `batch/controller.rs` 使用
//! - 无外部 crate 依赖

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Condvar, Mutex};
use std::time::{Duration, Instant};

use thiserror::Error;

/// 出队失败的两种情形
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DequeueError {
    /// 超时内没有任务到达，但队列尚未封口
    #[error("queue empty after timeout")]
    Empty,
    /// 队列已封口且任务全部取走
    #[error("queue closed and drained")]
    Closed,
}

struct QueueInner {
    tasks: VecDeque<PathBuf>,
    closed: bool,
}

/// 线程安全任务队列
pub struct TaskQueue {
    inner: Mutex<QueueInner>,
    not_empty: Condvar,
}

impl TaskQueue {
    /// 创建空队列
    pub fn new() -> Self {
        TaskQueue {
            inner: Mutex::new(QueueInner {
                tasks: VecDeque::new(),
                closed: false,
            }),
            not_empty: Condvar::new(),
        }
    }

    /// 入队一个任务（仅在 worker 启动前由生产者调用）
    pub fn enqueue(&self, task: PathBuf) {
        let mut inner = self.inner.lock().unwrap();
        inner.tasks.push_back(task);
        self.not_empty.notify_one();
    }

    /// 封口队列：此后不再有新任务，取空即为 `Closed`
    pub fn close(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.closed = true;
        self.not_empty.notify_all();
    }

    /// 当前待处理任务数
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().tasks.len()
    }

    /// 队列是否为空
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 带超时出队
    ///
    /// 返回一个任务，或在超时/封口时返回对应的 `DequeueError`。
    pub fn try_dequeue(&self, timeout: Duration) -> std::result::Result<PathBuf, DequeueError> {
        let deadline = Instant::now() + timeout;
        let mut inner = self.inner.lock().unwrap();

        loop {
            if let Some(task) = inner.tasks.pop_front() {
                return Ok(task);
            }
            if inner.closed {
                return Err(DequeueError::Closed);
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(DequeueError::Empty);
            }

            let (guard, result) = self
                .not_empty
                .wait_timeout(inner, deadline - now)
                .unwrap();
            inner = guard;

            if result.timed_out() && inner.tasks.is_empty() {
                if inner.closed {
                    return Err(DequeueError::Closed);
                }
                return Err(DequeueError::Empty);
            }
        }
    }
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}
