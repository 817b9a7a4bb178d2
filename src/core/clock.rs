//! 引擎单调时钟
//!
//! 提供 `performance.now()` 所需的进程级单调时钟：以引擎启动时刻为纪元，
//! 返回自纪元以来的毫秒数（微秒精度）。与墙钟无关，不受系统时间调整影响。

use std::sync::OnceLock;
use std::time::Instant;

/// 进程级时钟纪元
static ENGINE_EPOCH: OnceLock<Instant> = OnceLock::new();

/// 获取引擎纪元
///
/// 首次调用时捕获当前时刻，后续调用返回同一纪元。
fn engine_epoch() -> Instant {
    *ENGINE_EPOCH.get_or_init(Instant::now)
}

/// 在引擎启动时捕获纪元
///
/// 可选调用。未调用时纪元在首次 `performance_now()` 时惰性捕获。
pub fn init() {
    engine_epoch();
}

/// 自引擎纪元以来的毫秒数
///
/// 微秒精度的小数毫秒，单调不减。
pub fn performance_now() -> f64 {
    engine_epoch().elapsed().as_micros() as f64 * 0.001
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_epoch_is_stable() {
        let e1 = engine_epoch();
        let e2 = engine_epoch();
        assert_eq!(e1, e2);
    }

    #[test]
    fn test_performance_now_monotonic() {
        let t1 = performance_now();
        std::thread::sleep(Duration::from_millis(5));
        let t2 = performance_now();
        assert!(t2 >= t1);
        // 睡了 5ms，至少应该前进 1ms
        assert!(t2 - t1 >= 1.0);
    }

    #[test]
    fn test_performance_now_fractional() {
        init();
        let t = performance_now();
        assert!(t >= 0.0);
        assert!(t.is_finite());
    }
}
