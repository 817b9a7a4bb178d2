//! 任务调度系统
//!
//! 提供统一的任务调度和管理：后台异步任务在 Tokio 线程池执行，
//! 需要回到引擎主线程的回调进入主线程任务队列，由主循环每帧泵出。
//!
//! ## 功能特性
//!
//! - 后台任务执行
//! - 主线程回调
//! - 任务取消

use crossbeam_channel::{unbounded, Receiver, Sender};
use std::future::Future;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

/// 任务句柄
///
/// 持有取消信号发送器。下载类任务不对外暴露取消（见 `network::downloader`），
/// 但调度器层保留该能力供其他子系统使用。
#[derive(Debug, Clone)]
pub struct TaskHandle {
    /// 任务 ID
    pub id: u64,
    /// 取消信号发送器
    cancel_tx: Arc<Mutex<Option<oneshot::Sender<()>>>>,
}

impl TaskHandle {
    /// 取消任务
    ///
    /// 发送取消信号给正在执行的任务。任务会在下一次检查取消信号时停止执行。
    pub fn cancel(&self) {
        if let Ok(mut tx_opt) = self.cancel_tx.lock() {
            if let Some(tx) = tx_opt.take() {
                let _ = tx.send(());
            }
        }
    }
}

/// 主线程任务
type MainThreadTask = Box<dyn FnOnce() + Send + 'static>;

/// 任务调度器
///
/// 管理后台任务和主线程回调。
///
/// # 示例
///
/// ```ignore
/// let scheduler = TaskScheduler::new(4);
///
/// // 后台任务
/// scheduler.spawn_background(async {
///     // 异步操作
/// });
///
/// // 主线程回调
/// scheduler.run_on_main_thread(|| {
///     // 必须在主线程执行的操作
/// });
///
/// // 主循环中每帧调用
/// scheduler.process_main_thread_tasks();
/// ```
pub struct TaskScheduler {
    /// Tokio 运行时
    runtime: tokio::runtime::Runtime,
    /// 主线程任务接收器
    main_thread_rx: Receiver<MainThreadTask>,
    /// 主线程任务发送器
    main_thread_tx: Sender<MainThreadTask>,
    /// 下一个任务 ID
    next_task_id: std::sync::atomic::AtomicU64,
    /// 工作线程数
    worker_count: usize,
}

impl TaskScheduler {
    /// 创建任务调度器
    ///
    /// # 参数
    /// - `worker_threads`: 工作线程数量，0 表示使用 CPU 核心数
    pub fn new(worker_threads: usize) -> Self {
        let workers = if worker_threads == 0 {
            num_cpus::get()
        } else {
            worker_threads
        };

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(workers)
            .thread_name("script-worker")
            .enable_all()
            .build()
            .expect("Failed to create tokio runtime");

        let (main_thread_tx, main_thread_rx) = unbounded();

        Self {
            runtime,
            main_thread_rx,
            main_thread_tx,
            next_task_id: std::sync::atomic::AtomicU64::new(1),
            worker_count: workers,
        }
    }

    /// 在后台线程执行异步任务
    ///
    /// 将异步任务提交到后台线程池执行，不阻塞当前线程。
    /// 返回任务句柄，可用于取消任务。
    pub fn spawn_background<F, T>(&self, task: F) -> TaskHandle
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let task_id = self
            .next_task_id
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        let (cancel_tx, cancel_rx) = oneshot::channel::<()>();

        self.runtime.spawn(async move {
            tokio::select! {
                _ = cancel_rx => {
                    // 任务被取消
                }
                _ = task => {
                    // 任务完成
                }
            }
        });

        TaskHandle {
            id: task_id,
            cancel_tx: Arc::new(Mutex::new(Some(cancel_tx))),
        }
    }

    /// 在后台线程执行阻塞任务
    ///
    /// 将阻塞任务提交到专门的阻塞线程池执行，避免阻塞异步运行时。
    pub fn spawn_blocking<F, T>(&self, task: F) -> TaskHandle
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let task_id = self
            .next_task_id
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        let (cancel_tx, _cancel_rx) = oneshot::channel::<()>();

        self.runtime.spawn_blocking(task);

        TaskHandle {
            id: task_id,
            cancel_tx: Arc::new(Mutex::new(Some(cancel_tx))),
        }
    }

    /// 在主线程执行任务
    ///
    /// 将任务加入主线程任务队列，等待下次调用 `process_main_thread_tasks()`
    /// 时执行。任务不会立即执行。
    pub fn run_on_main_thread<F>(&self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let _ = self.main_thread_tx.send(Box::new(task));
    }

    /// 处理主线程任务队列（应在主循环中调用）
    ///
    /// 处理队列中的所有主线程任务，直到队列为空。
    pub fn process_main_thread_tasks(&self) {
        while let Ok(task) = self.main_thread_rx.try_recv() {
            task();
        }
    }

    /// 处理指定数量的主线程任务
    ///
    /// 最多处理 `max_tasks` 个任务，避免单帧处理时间过长。
    pub fn process_main_thread_tasks_limited(&self, max_tasks: usize) {
        for _ in 0..max_tasks {
            match self.main_thread_rx.try_recv() {
                Ok(task) => task(),
                Err(_) => break,
            }
        }
    }

    /// 获取工作线程数
    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// 阻塞等待 Future 完成
    ///
    /// 在当前线程阻塞等待异步任务完成。用于同步下载路径和初始化阶段，
    /// 不可在运行时工作线程内调用。
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}

impl Default for TaskScheduler {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[test]
    fn test_scheduler_creation() {
        let scheduler = TaskScheduler::new(2);
        assert_eq!(scheduler.worker_count(), 2);
    }

    #[test]
    fn test_main_thread_queue() {
        let scheduler = TaskScheduler::new(1);
        let counter = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let c = Arc::clone(&counter);
            scheduler.run_on_main_thread(move || {
                c.fetch_add(1, Ordering::SeqCst);
            });
        }

        // 入队不等于执行
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        scheduler.process_main_thread_tasks();
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_main_thread_queue_limited() {
        let scheduler = TaskScheduler::new(1);
        let counter = Arc::new(AtomicUsize::new(0));

        for _ in 0..5 {
            let c = Arc::clone(&counter);
            scheduler.run_on_main_thread(move || {
                c.fetch_add(1, Ordering::SeqCst);
            });
        }

        scheduler.process_main_thread_tasks_limited(2);
        assert_eq!(counter.load(Ordering::SeqCst), 2);

        scheduler.process_main_thread_tasks();
        assert_eq!(counter.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn test_spawn_background_completes() {
        let scheduler = TaskScheduler::new(1);
        let (tx, rx) = crossbeam_channel::bounded(1);

        scheduler.spawn_background(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            let _ = tx.send(42u32);
        });

        let value = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_block_on() {
        let scheduler = TaskScheduler::new(1);
        let value = scheduler.block_on(async { 7 + 35 });
        assert_eq!(value, 42);
    }
}
