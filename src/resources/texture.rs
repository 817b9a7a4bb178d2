//! 纹理数据模型
//!
//! 解码后的 CPU 侧纹理：RGBA8 像素加尺寸。GPU 上传不在本 crate 范围内。

use crate::core::error::TextureError;

/// 解码后的 2D 纹理
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture2D {
    /// 宽度（像素）
    pub width: u32,
    /// 高度（像素）
    pub height: u32,
    /// RGBA8 像素数据，长度 = width * height * 4
    pub pixels: Vec<u8>,
}

impl Texture2D {
    /// 从编码的图片字节解码纹理
    ///
    /// 按字节内容猜测格式（启用的格式：PNG、JPEG），统一转换为 RGBA8。
    /// 零尺寸图片视为解码失败。
    pub fn from_image_data(data: &[u8]) -> Result<Self, TextureError> {
        let img = image::load_from_memory(data)?;
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        if width == 0 || height == 0 {
            return Err(TextureError::ZeroSized);
        }

        Ok(Self {
            width,
            height,
            pixels: rgba.into_raw(),
        })
    }

    /// 像素数据字节数
    pub fn byte_len(&self) -> usize {
        self.pixels.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn encode_png(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([255, 0, 0, 255]));
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageOutputFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn test_decode_png() {
        let data = encode_png(4, 2);
        let tex = Texture2D::from_image_data(&data).unwrap();
        assert_eq!(tex.width, 4);
        assert_eq!(tex.height, 2);
        assert_eq!(tex.byte_len(), 4 * 2 * 4);
    }

    #[test]
    fn test_decode_garbage_fails() {
        let result = Texture2D::from_image_data(b"definitely not an image");
        assert!(matches!(result, Err(TextureError::Decode(_))));
    }

    #[test]
    fn test_decode_empty_fails() {
        assert!(Texture2D::from_image_data(&[]).is_err());
    }
}
