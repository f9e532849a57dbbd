//! # 批处理控制器
//!
//! 编排一次完整批处理：发现任务、启动 worker 池与进度上报、产出汇总。
//!
//! ## 功能
//! - 状态机 Idle → Discovering → Running → Draining → Completed
//! - 递归扫描目录，`.dcm` 扩展名直接接受，无扩展名文件仅凭文件头探测
//! - 零候选文件立即终止，返回空汇总，不启动任何 worker
//! - 配置错误在批处理开始前拒绝
//!
//! ## 依赖关系
//! - 被 `commands/` 各模块使用
//! - 使用 `batch/` 下全部子模块
//! - 使用 `walkdir` 遍历目录

use crate::batch::aggregator::{Aggregator, BatchSummary};
use crate::batch::operation::{Operation, Services};
use crate::batch::pool::WorkerPool;
use crate::batch::queue::TaskQueue;
use crate::batch::reporter::{ProgressObserver, ProgressReporter};
use crate::error::{DcmBatchError, Result};

use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use walkdir::WalkDir;

/// 默认 worker 数
pub const DEFAULT_WORKERS: usize = 4;

/// 默认进度上报间隔
pub const DEFAULT_REPORT_INTERVAL: Duration = Duration::from_secs(2);

/// 批处理生命周期状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    Idle,
    Discovering,
    Running,
    Draining,
    Completed,
    /// 发现阶段未找到任何候选文件
    CompletedEmpty,
}

/// 批处理控制器
pub struct BatchController {
    pool: WorkerPool,
    report_interval: Duration,
    services: Services,
    observer: Option<ProgressObserver>,
    state: Mutex<BatchState>,
}

impl BatchController {
    /// 创建控制器
    pub fn new(services: Services) -> Self {
        BatchController {
            pool: WorkerPool::new(DEFAULT_WORKERS),
            report_interval: DEFAULT_REPORT_INTERVAL,
            services,
            observer: None,
            state: Mutex::new(BatchState::Idle),
        }
    }

    /// 设置 worker 数，0 表示使用 CPU 核数
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.pool = WorkerPool::new(workers);
        self
    }

    /// 设置进度上报间隔
    pub fn with_report_interval(mut self, interval: Duration) -> Self {
        self.report_interval = interval;
        self
    }

    /// 注册进度观察者
    pub fn with_observer(mut self, observer: ProgressObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// 当前状态
    pub fn state(&self) -> BatchState {
        *self.state.lock().unwrap()
    }

    fn set_state(&self, state: BatchState) {
        *self.state.lock().unwrap() = state;
    }

    /// 实际 worker 数
    pub fn worker_count(&self) -> usize {
        self.pool.workers()
    }

    /// 运行一次批处理
    ///
    /// 输入可以是单个文件或目录。配置错误与输入路径不存在
    /// 在此处拒绝；单个文件的处理失败只体现在汇总计数里。
    pub fn run(&self, input: &Path, operation: Operation) -> Result<BatchSummary> {
        debug_assert!(matches!(
            self.state(),
            BatchState::Idle | BatchState::Completed | BatchState::CompletedEmpty
        ));

        operation.validate()?;

        if !input.exists() {
            return Err(DcmBatchError::FileNotFound {
                path: input.display().to_string(),
            });
        }

        self.set_state(BatchState::Discovering);
        let tasks = self.discover(input)?;
        let total = tasks.len();

        if total == 0 {
            self.set_state(BatchState::CompletedEmpty);
            return Ok(BatchSummary::empty());
        }

        let queue = TaskQueue::new();
        for task in tasks {
            queue.enqueue(task);
        }
        queue.close();

        let aggregator = Aggregator::new(total);
        let reporter = ProgressReporter::new(self.report_interval);
        let stop = reporter.stop_handle();

        self.set_state(BatchState::Running);

        let aggregator_ref = &aggregator;
        let reporter_ref = &reporter;
        thread::scope(|scope| {
            let reporter_handle = self
                .observer
                .as_ref()
                .map(|observer| scope.spawn(move || reporter_ref.run(aggregator_ref, observer)));

            self.pool
                .run(&queue, &operation, &self.services, &aggregator);

            self.set_state(BatchState::Draining);
            stop.store(true, Ordering::Release);

            if let Some(handle) = reporter_handle {
                handle.join().unwrap();
            }
        });
        debug_assert!(queue.is_empty());

        self.set_state(BatchState::Completed);
        Ok(aggregator.into_summary())
    }

    /// 发现候选文件
    ///
    /// `.dcm`（不区分大小写）直接接受；无扩展名文件经文件头探测
    /// 通过才接受；其余扩展名静默跳过。
    fn discover(&self, input: &Path) -> Result<Vec<PathBuf>> {
        if input.is_file() {
            return Ok(vec![input.to_path_buf()]);
        }

        if !input.is_dir() {
            return Err(DcmBatchError::DirectoryNotFound {
                path: input.display().to_string(),
            });
        }

        let mut tasks = Vec::new();
        for entry in WalkDir::new(input).into_iter().filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            match path.extension().and_then(|e| e.to_str()) {
                Some(ext) if ext.eq_ignore_ascii_case("dcm") => tasks.push(path.to_path_buf()),
                Some(_) => {}
                None => {
                    if self.services.probe.is_valid_object(path) {
                        tasks.push(path.to_path_buf());
                    }
                }
            }
        }
        Ok(tasks)
    }
}
