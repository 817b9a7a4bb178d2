//! 脚本宿主
//!
//! 持有 QuickJS 运行时与上下文，安装基础全局对象（`console`）和
//! Web 风格绑定（`jsb.loadRemoteImage`、`performance.now`），
//! 并在每帧泵出主线程回调队列。

use std::sync::Arc;

use bevy_ecs::prelude::Resource;
use rquickjs::function::Rest;
use rquickjs::{Context, Ctx, Function, Object, Runtime};

use crate::config::EngineConfig;
use crate::core::clock;
use crate::core::error::{EngineError, ScriptError};
use crate::core::scheduler::TaskScheduler;
use crate::network::Downloader;
use crate::resources::TextureCache;
use crate::scripting::web_bindings;

/// 脚本宿主资源
#[derive(Resource)]
pub struct ScriptHost {
    #[allow(dead_code)]
    runtime: Runtime,
    context: Context,
    scheduler: Arc<TaskScheduler>,
    downloader: Arc<Downloader>,
    cache: TextureCache,
    tasks_per_frame: usize,
}

impl ScriptHost {
    /// 用独立的纹理缓存创建宿主
    pub fn new(config: &EngineConfig) -> Result<Self, EngineError> {
        Self::with_cache(config, TextureCache::new())
    }

    /// 用外部共享的纹理缓存创建宿主
    ///
    /// 引擎世界已持有缓存时使用此入口，脚本下载的纹理对渲染侧可见。
    pub fn with_cache(config: &EngineConfig, cache: TextureCache) -> Result<Self, EngineError> {
        config.validate()?;
        clock::init();

        let runtime =
            Runtime::new().map_err(|e| ScriptError::RuntimeCreation(e.to_string()))?;
        let context =
            Context::full(&runtime).map_err(|e| ScriptError::ContextCreation(e.to_string()))?;
        let scheduler = Arc::new(TaskScheduler::new(config.scripting.worker_threads));
        let downloader = Downloader::new(&config.download)?;

        let host = Self {
            runtime,
            context,
            scheduler,
            downloader,
            cache,
            tasks_per_frame: config.scripting.tasks_per_frame,
        };

        host.setup_base_globals()?;
        web_bindings::register(
            &host.context,
            host.cache.clone(),
            Arc::clone(&host.downloader),
            Arc::clone(&host.scheduler),
        )?;

        Ok(host)
    }

    /// 安装 console 全局对象，输出路由到 tracing
    fn setup_base_globals(&self) -> Result<(), ScriptError> {
        self.context.with(|ctx| -> Result<(), ScriptError> {
            let globals = ctx.globals();

            let console = Object::new(ctx.clone())?;
            console.set(
                "log",
                Function::new(ctx.clone(), |args: Rest<String>| {
                    tracing::info!(target: "script.console", "{}", args.0.join(" "));
                })?,
            )?;
            console.set(
                "warn",
                Function::new(ctx.clone(), |args: Rest<String>| {
                    tracing::warn!(target: "script.console", "{}", args.0.join(" "));
                })?,
            )?;
            console.set(
                "error",
                Function::new(ctx.clone(), |args: Rest<String>| {
                    tracing::error!(target: "script.console", "{}", args.0.join(" "));
                })?,
            )?;
            globals.set("console", console)?;

            Ok(())
        })
    }

    /// 执行脚本代码
    pub fn eval(&self, code: &str) -> Result<(), ScriptError> {
        self.context.with(|ctx| match ctx.eval::<(), _>(code) {
            Ok(()) => Ok(()),
            Err(e) => Err(ScriptError::Eval(describe_js_error(&ctx, e))),
        })
    }

    /// 在脚本上下文内执行闭包
    ///
    /// 嵌入方与测试的逃生舱口。
    pub fn with_context<R>(&self, f: impl FnOnce(&Ctx<'_>) -> R) -> R {
        self.context.with(|ctx| f(&ctx))
    }

    /// 泵出主线程回调队列（应在主循环中每帧调用）
    ///
    /// 单帧最多处理配置的任务数，剩余任务留到下一帧。
    pub fn process_main_thread_tasks(&self) {
        self.scheduler
            .process_main_thread_tasks_limited(self.tasks_per_frame);
    }

    /// 脚本上下文句柄
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// 共享纹理缓存
    pub fn texture_cache(&self) -> &TextureCache {
        &self.cache
    }

    /// 下载器
    pub fn downloader(&self) -> &Arc<Downloader> {
        &self.downloader
    }

    /// 任务调度器
    pub fn scheduler(&self) -> &Arc<TaskScheduler> {
        &self.scheduler
    }
}

/// 将 JS 错误转成可读文本
///
/// 待决异常需要在同一上下文内捕获，否则只剩下 "exception occurred"。
pub(crate) fn describe_js_error(ctx: &Ctx<'_>, err: rquickjs::Error) -> String {
    match err {
        rquickjs::Error::Exception => {
            let caught = ctx.catch();
            if let Some(exception) = caught.as_exception() {
                exception
                    .message()
                    .unwrap_or_else(|| "unknown exception".to_string())
            } else {
                format!("{:?}", caught)
            }
        }
        other => other.to_string(),
    }
}
