//! 进程级纹理缓存
//!
//! 以 URL 为键的共享缓存。缓存是显式同步的键值存储：
//! 同一键的并发写入者按"后写者胜出"解决，读者总能看到某个完整的条目。
//! 不做淘汰，条目存活到显式移除或清空。

use bevy_ecs::prelude::Resource;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::texture::Texture2D;

/// 共享纹理缓存
///
/// `Clone` 共享同一底层存储，可同时作为 ECS 资源和被下载代理持有。
#[derive(Resource, Clone, Default)]
pub struct TextureCache {
    inner: Arc<RwLock<HashMap<String, Arc<Texture2D>>>>,
}

impl TextureCache {
    /// 创建空缓存
    pub fn new() -> Self {
        Self::default()
    }

    /// 按键查询纹理
    pub fn texture_for_key(&self, key: &str) -> Option<Arc<Texture2D>> {
        self.inner.read().ok()?.get(key).cloned()
    }

    /// 插入纹理并返回存入的句柄
    ///
    /// 键已存在时覆盖旧条目（后写者胜出）。
    pub fn add_texture(&self, key: &str, texture: Texture2D) -> Arc<Texture2D> {
        let handle = Arc::new(texture);
        if let Ok(mut map) = self.inner.write() {
            map.insert(key.to_string(), Arc::clone(&handle));
        }
        handle
    }

    /// 按键移除纹理
    pub fn remove_texture_for_key(&self, key: &str) -> Option<Arc<Texture2D>> {
        self.inner.write().ok()?.remove(key)
    }

    /// 是否包含键
    pub fn contains_key(&self, key: &str) -> bool {
        self.inner
            .read()
            .map(|map| map.contains_key(key))
            .unwrap_or(false)
    }

    /// 条目数量
    pub fn len(&self) -> usize {
        self.inner.read().map(|map| map.len()).unwrap_or(0)
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 清空缓存
    pub fn clear(&self) {
        if let Ok(mut map) = self.inner.write() {
            map.clear();
        }
    }
}
