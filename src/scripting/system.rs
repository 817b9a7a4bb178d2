//! 脚本系统的 ECS 接入
//!
//! 把脚本宿主和纹理缓存装入 World，并提供每帧泵出主线程回调队列的系统。

use bevy_ecs::prelude::*;

use crate::config::EngineConfig;
use crate::core::error::EngineError;
use crate::resources::TextureCache;
use crate::scripting::host::ScriptHost;

/// 初始化脚本系统
///
/// 纹理缓存与宿主共享同一存储，作为独立资源插入，渲染侧可直接查询。
pub fn setup_scripting(world: &mut World, config: &EngineConfig) -> Result<(), EngineError> {
    let cache = TextureCache::new();
    let host = ScriptHost::with_cache(config, cache.clone())?;

    world.insert_resource(cache);
    world.insert_resource(host);
    Ok(())
}

/// 脚本泵系统 - 每帧泵出主线程回调队列
///
/// 下载完成回调在这里回到引擎主线程执行。
pub fn script_pump_system(host: Res<ScriptHost>) {
    host.process_main_thread_tasks();
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_ecs::schedule::Schedule;

    #[test]
    fn test_setup_inserts_resources() {
        let mut world = World::default();
        setup_scripting(&mut world, &EngineConfig::default()).unwrap();

        assert!(world.get_resource::<ScriptHost>().is_some());
        assert!(world.get_resource::<TextureCache>().is_some());
    }

    #[test]
    fn test_pump_system_runs_in_schedule() {
        let mut world = World::default();
        setup_scripting(&mut world, &EngineConfig::default()).unwrap();

        let mut schedule = Schedule::default();
        schedule.add_systems(script_pump_system);
        schedule.run(&mut world);
    }

    #[test]
    fn test_world_cache_shares_host_storage() {
        let mut world = World::default();
        setup_scripting(&mut world, &EngineConfig::default()).unwrap();

        {
            let cache = world.resource::<TextureCache>();
            cache.add_texture(
                "k",
                crate::resources::Texture2D {
                    width: 1,
                    height: 1,
                    pixels: vec![0; 4],
                },
            );
        }

        let host = world.resource::<ScriptHost>();
        assert!(host.texture_cache().contains_key("k"));
    }
}
