//! # Game Engine Scripting
//!
//! JavaScript scripting subsystem for the game engine: a QuickJS host with
//! bindings that expose native engine facilities to scripts, plus the
//! lifecycle bridging (GC rooting, thread hand-off, callback invocation)
//! between the native heap and the scripting heap.
//!
//! ## Features
//!
//! - **Remote images**: `jsb.loadRemoteImage(url, cb)` downloads, decodes
//!   and caches a texture, then calls back with `(succeed, image)`
//! - **High-resolution clock**: `performance.now()` in fractional
//!   milliseconds since the engine epoch
//! - **Main-thread delivery**: all completion callbacks are marshaled onto
//!   the engine thread and run during the per-frame pump
//! - **Shared texture cache**: synchronized, last-writer-wins on concurrent
//!   writers of one key
//!
//! ## Example
//!
//! ```ignore
//! use game_engine_scripting::config::EngineConfig;
//! use game_engine_scripting::scripting::ScriptHost;
//!
//! let host = ScriptHost::new(&EngineConfig::default())?;
//! host.eval(r#"
//!     jsb.loadRemoteImage("https://example.com/hero.png", function(ok, image) {
//!         if (ok) console.log("got " + image.width + "x" + image.height);
//!     });
//! "#)?;
//!
//! // 主循环中每帧调用
//! host.process_main_thread_tasks();
//! ```
//!
//! ## Modules
//!
//! - [`core`]: 错误类型、任务调度器、引擎时钟
//! - [`config`]: 配置系统
//! - [`network`]: 异步 HTTP 下载器
//! - [`resources`]: 纹理与纹理缓存
//! - [`scripting`]: 脚本宿主、下载代理与绑定

/// Core functionality: errors, scheduler, clock
pub mod core;
/// Configuration system
pub mod config;
/// Async HTTP downloading
pub mod network;
/// Texture data model and cache
pub mod resources;
/// Scripting host, delegator and bindings
pub mod scripting;
