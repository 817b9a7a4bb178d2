//! 资源模块
//!
//! 纹理数据模型与进程级共享纹理缓存。

pub mod cache;
pub mod texture;

pub use cache::TextureCache;
pub use texture::Texture2D;
