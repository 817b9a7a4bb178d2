//! 脚本运行器
//!
//! 执行命令行给出的脚本文件，并在退出前泵出主线程回调队列，
//! 让异步下载的回调有机会触发。

use std::time::{Duration, Instant};

use game_engine_scripting::config::{self, EngineConfig};
use game_engine_scripting::core::error::EngineError;
use game_engine_scripting::scripting::ScriptHost;

fn main() {
    if let Err(e) = run() {
        eprintln!("Script runner failed: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), EngineError> {
    let mut args = std::env::args().skip(1);
    let Some(script_path) = args.next() else {
        eprintln!("Usage: game_engine_scripting <script.js> [config.toml]");
        std::process::exit(2);
    };

    let engine_config = match args.next() {
        Some(path) => EngineConfig::from_toml_file(path)?,
        None => EngineConfig::default(),
    };
    config::init_logging(&engine_config.logging);

    let host = ScriptHost::new(&engine_config)?;
    let source = std::fs::read_to_string(&script_path)?;
    host.eval(&source)?;

    // 给异步回调留出触发窗口，按帧节奏泵出主线程队列
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        host.process_main_thread_tasks();
        std::thread::sleep(Duration::from_millis(16));
    }

    Ok(())
}
