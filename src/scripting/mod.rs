//! 脚本模块
//!
//! QuickJS 脚本宿主、下载代理与 Web 风格绑定：
//! - `host` - 脚本宿主（运行时、上下文、全局对象）
//! - `delegator` - 远程图片下载代理
//! - `web_bindings` - `jsb.loadRemoteImage` / `performance.now` 注册
//! - `system` - ECS 接入

pub mod delegator;
pub mod host;
pub mod system;
pub mod web_bindings;

pub use delegator::DownloadDelegator;
pub use host::ScriptHost;
pub use system::{script_pump_system, setup_scripting};
