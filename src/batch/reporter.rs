//! # 进度上报器
//!
//! 独立于 worker 执行节奏，按固定间隔采样聚合器并通知观察者。
//!
//! ## 功能
//! - 固定间隔（默认 2 秒）读取进度快照
//! - 与上次发出的快照相同则不重复通知
//! - 协作式停止标志，控制器在 worker 收尾后置位
//! - 停止前补发最终快照，保证观察者看到终态
//!
//! ## 依赖关系
//! - 被 `batch/controller.rs` 使用
//! - 使用 `batch/aggregator.rs` 的 `Snapshot`

use crate::batch::aggregator::{Aggregator, Snapshot};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// 进度观察者回调
pub type ProgressObserver = Box<dyn Fn(&Snapshot) + Send + Sync>;

/// 轮询停止标志的粒度，保证及时响应停止请求
const STOP_POLL: Duration = Duration::from_millis(50);

/// 周期性进度上报器
pub struct ProgressReporter {
    interval: Duration,
    stop: Arc<AtomicBool>,
}

impl ProgressReporter {
    /// 创建上报器
    pub fn new(interval: Duration) -> Self {
        ProgressReporter {
            stop: Arc::new(AtomicBool::new(false)),
            interval,
        }
    }

    /// 停止句柄，供控制器在批处理收尾时置位
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// 上报循环，在独立线程中运行直至停止标志置位
    pub fn run(&self, aggregator: &Aggregator, observer: &ProgressObserver) {
        let mut last: Option<Snapshot> = None;

        while !self.stop.load(Ordering::Acquire) {
            emit_if_changed(aggregator, observer, &mut last);
            self.sleep_interruptibly();
        }

        // 最终快照：worker 全部结束后保证观察者看到完整计数
        emit_if_changed(aggregator, observer, &mut last);
    }

    fn sleep_interruptibly(&self) {
        let mut remaining = self.interval;
        while !remaining.is_zero() && !self.stop.load(Ordering::Acquire) {
            let step = remaining.min(STOP_POLL);
            std::thread::sleep(step);
            remaining -= step;
        }
    }
}

fn emit_if_changed(aggregator: &Aggregator, observer: &ProgressObserver, last: &mut Option<Snapshot>) {
    let snapshot = aggregator.snapshot();
    if last.map_or(true, |prev| prev != snapshot) {
        observer(&snapshot);
        *last = Some(snapshot);
    }
}
