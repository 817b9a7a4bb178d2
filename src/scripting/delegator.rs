//! 下载代理
//!
//! 桥接脚本侧"下载这张图并回调我"的请求与原生下载/缓存子系统。
//!
//! 生命周期契约：
//! - 构造时将脚本堆上的接收者对象与回调函数保存为 [`Persistent`]，
//!   即为 GC 根；恢复（restore）或析构时根随之释放，无需手工配对调用。
//! - 代理本身是 `Arc` 共享所有权：发起调用、后台任务、主线程投递各持一份，
//!   最后一个持有者析构时清理。
//! - 回调恰好触发一次：回调与接收者存放在 take-once 槽位里，
//!   投递路径整体 `take()`，结构上排除二次触发。
//!
//! 线程契约：完成回调（成功与失败）一律经调度器投递回引擎主线程，
//! 在主循环泵出主线程队列时执行，绝不在下载工作线程上触碰脚本堆。

use std::sync::{Arc, Mutex};

use rquickjs::{Context, Ctx, Function, Object, Persistent, Value};
use tracing::{debug, warn};

use crate::core::scheduler::TaskScheduler;
use crate::network::Downloader;
use crate::resources::{Texture2D, TextureCache};

/// 下载代理
///
/// 每个 `loadRemoteImage` 请求创建一个实例。
pub struct DownloadDelegator {
    /// 脚本执行上下文的持有句柄
    context: Context,
    /// 目标 URL，同时是缓存键
    url: String,
    /// 发起调用的接收者对象（GC 根）
    receiver: Mutex<Option<Persistent<Object<'static>>>>,
    /// 完成回调（GC 根）
    callback: Mutex<Option<Persistent<Function<'static>>>>,
    cache: TextureCache,
    downloader: Arc<Downloader>,
    scheduler: Arc<TaskScheduler>,
}

impl DownloadDelegator {
    /// 创建代理并立即扎根两个脚本堆句柄
    ///
    /// `receiver` 与 `callback` 允许缺失：缺失的回调在完成时静默跳过。
    #[allow(clippy::too_many_arguments)]
    pub fn create<'js>(
        ctx: &Ctx<'js>,
        context: Context,
        receiver: Option<Object<'js>>,
        callback: Option<Function<'js>>,
        url: String,
        cache: TextureCache,
        downloader: Arc<Downloader>,
        scheduler: Arc<TaskScheduler>,
    ) -> Arc<Self> {
        let receiver = receiver.map(|obj| Persistent::save(ctx, obj));
        let callback = callback.map(|func| Persistent::save(ctx, func));

        Arc::new(Self {
            context,
            url,
            receiver: Mutex::new(receiver),
            callback: Mutex::new(callback),
            cache,
            downloader,
            scheduler,
        })
    }

    /// 同步执行下载，阻塞调用线程直到完成投递入队
    pub fn download(self: &Arc<Self>) {
        let this = Arc::clone(self);
        self.scheduler.block_on(this.start_download());
    }

    /// 在后台工作线程执行下载，立即返回
    pub fn download_async(self: &Arc<Self>) {
        let this = Arc::clone(self);
        self.scheduler.spawn_background(this.start_download());
    }

    /// 下载主流程
    ///
    /// 缓存命中时直接报告成功，不产生任何网络请求；
    /// 未命中时拉取字节、解码、注册进缓存。解码失败与网络失败
    /// 对调用方不可区分，都以 `(false, null)` 结束。
    async fn start_download(self: Arc<Self>) {
        if let Some(texture) = self.cache.texture_for_key(&self.url) {
            debug!(target: "scripting", "texture cache hit for {}", self.url);
            self.on_success(texture);
            return;
        }

        match self.downloader.fetch_data(&self.url).await {
            Ok(data) => match Texture2D::from_image_data(&data) {
                Ok(texture) => {
                    let handle = self.cache.add_texture(&self.url, texture);
                    self.on_success(handle);
                }
                Err(e) => {
                    warn!(target: "scripting", "failed to decode image from {}: {}", self.url, e);
                    self.on_error();
                }
            },
            Err(e) => {
                warn!(target: "scripting", "download of {} failed: {}", self.url, e);
                self.on_error();
            }
        }
    }

    /// 将失败投递回主线程
    fn on_error(self: &Arc<Self>) {
        let this = Arc::clone(self);
        self.scheduler.run_on_main_thread(move || this.deliver(None));
    }

    /// 将成功投递回主线程
    fn on_success(self: &Arc<Self>, texture: Arc<Texture2D>) {
        let this = Arc::clone(self);
        self.scheduler
            .run_on_main_thread(move || this.deliver(Some(texture)));
    }

    /// 在主线程上执行终端投递
    ///
    /// 取出（take）两个根：接收者在运行时锁内恢复后随即释放；
    /// 回调恢复后以脚本调用约定触发。任何一步失败都静默跳过，
    /// 不崩溃、不重试。
    fn deliver(&self, texture: Option<Arc<Texture2D>>) {
        let receiver = self.receiver.lock().ok().and_then(|mut slot| slot.take());
        let callback = self.callback.lock().ok().and_then(|mut slot| slot.take());

        self.context.with(|ctx| {
            if let Some(receiver) = receiver {
                // 恢复并丢弃，根在运行时锁内释放
                let _ = receiver.restore(&ctx);
            }

            let Some(callback) = callback else {
                debug!(target: "scripting", "no callback registered for {}, skipping", self.url);
                return;
            };

            let callback = match callback.restore(&ctx) {
                Ok(func) => func,
                Err(e) => {
                    debug!(
                        target: "scripting",
                        "could not enter script scope for {}: {}", self.url, e
                    );
                    return;
                }
            };

            let result = match texture {
                Some(texture) => match image_object(&ctx, &self.url, &texture) {
                    Ok(image) => callback.call::<_, ()>((true, image)),
                    Err(e) => {
                        warn!(
                            target: "scripting",
                            "failed to wrap texture for {}: {}", self.url, e
                        );
                        callback.call::<_, ()>((false, Value::new_null(ctx.clone())))
                    }
                },
                None => callback.call::<_, ()>((false, Value::new_null(ctx.clone()))),
            };

            if let Err(e) = result {
                let detail = crate::scripting::host::describe_js_error(&ctx, e);
                warn!(target: "scripting", "image callback raised: {}", detail);
            }
        });
    }

    /// 目标 URL
    pub fn url(&self) -> &str {
        &self.url
    }

    #[cfg(test)]
    pub(crate) fn roots_released(&self) -> bool {
        let receiver_empty = self
            .receiver
            .lock()
            .map(|slot| slot.is_none())
            .unwrap_or(false);
        let callback_empty = self
            .callback
            .lock()
            .map(|slot| slot.is_none())
            .unwrap_or(false);
        receiver_empty && callback_empty
    }
}

/// 构造交给脚本的图片包装对象
fn image_object<'js>(
    ctx: &Ctx<'js>,
    url: &str,
    texture: &Texture2D,
) -> rquickjs::Result<Object<'js>> {
    let image = Object::new(ctx.clone())?;
    image.set("url", url)?;
    image.set("width", texture.width)?;
    image.set("height", texture.height)?;
    Ok(image)
}
