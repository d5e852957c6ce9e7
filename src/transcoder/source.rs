//! # 数据源与中间模型
//!
//! ## 设计思路
//!
//! 将流水线各阶段的中间结果拆成独立类型：
//! - `RawImageBytes`：已读取但未解码的字节
//! - `DecodedImage`：完整解码后的原始像素（宽高均大于 0）
//! - `CroppedImage`：居中裁剪并缩放后的像素，创建后不再修改

use image::RgbaImage;

use super::TranscodeError;

/// 读取阶段输出：原始字节与来源标识。
pub(crate) struct RawImageBytes {
    pub(crate) bytes: Vec<u8>,
    pub(crate) source_hint: &'static str,
}

/// 解码后的位图。
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pixels: RgbaImage,
}

impl DecodedImage {
    /// 包装 RGBA 位图；任一边为 0 时拒绝。
    pub fn from_rgba(pixels: RgbaImage) -> Result<Self, TranscodeError> {
        let (width, height) = pixels.dimensions();
        if width == 0 || height == 0 {
            return Err(TranscodeError::UndecodableImage(format!(
                "图片尺寸无效：{}x{}",
                width, height
            )));
        }
        Ok(Self { pixels })
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// 按行优先取单个像素，返回 `0xAARRGGBB`；坐标越界时为 `None`。
    pub fn argb(&self, x: u32, y: u32) -> Option<u32> {
        self.pixels.get_pixel_checked(x, y).map(|p| pack_argb(p.0))
    }

    pub fn as_rgba(&self) -> &RgbaImage {
        &self.pixels
    }
}

/// 裁剪缩放后的位图。
#[derive(Debug, Clone, PartialEq)]
pub struct CroppedImage {
    pixels: RgbaImage,
}

impl CroppedImage {
    pub(crate) fn new(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn argb(&self, x: u32, y: u32) -> Option<u32> {
        self.pixels.get_pixel_checked(x, y).map(|p| pack_argb(p.0))
    }

    pub fn as_rgba(&self) -> &RgbaImage {
        &self.pixels
    }
}

fn pack_argb([r, g, b, a]: [u8; 4]) -> u32 {
    (u32::from(a) << 24) | (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn argb_packs_alpha_in_high_byte() {
        let mut pixels = RgbaImage::new(2, 1);
        pixels.put_pixel(1, 0, Rgba([0x11, 0x22, 0x33, 0x44]));
        let decoded = DecodedImage::from_rgba(pixels).expect("non-empty image");

        assert_eq!(decoded.argb(1, 0), Some(0x4411_2233));
        assert_eq!(decoded.argb(0, 0), Some(0));
    }

    #[test]
    fn argb_out_of_bounds_is_none() {
        let decoded = DecodedImage::from_rgba(RgbaImage::new(2, 1)).expect("non-empty image");
        assert_eq!(decoded.argb(2, 0), None);
        assert_eq!(decoded.argb(0, 1), None);

        let cropped = CroppedImage::new(RgbaImage::new(3, 3));
        assert_eq!(cropped.argb(2, 2), Some(0));
        assert_eq!(cropped.argb(3, 0), None);
    }

    #[test]
    fn empty_raster_is_rejected() {
        assert!(matches!(
            DecodedImage::from_rgba(RgbaImage::new(0, 10)),
            Err(TranscodeError::UndecodableImage(_))
        ));
    }
}
