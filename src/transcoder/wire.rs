//! # 二进制像素转储格式
//!
//! ## 设计思路
//!
//! 对端设备资源有限，格式保持最简：8 字节头部 + 未压缩像素，全部小端序。
//!
//! ```text
//! 0..4   color_mode  u32 = 256
//! 4..8   header      u32 = (width & 0xFFFF) | (height << 16)
//! 8..    width*height 个 [B, G, R, A]，行优先
//! ```
//!
//! ## 实现思路
//!
//! - 编码一次写满缓冲区，之后只读。
//! - `from_bytes` 供对端解析时校验长度，不做版本协商。

use image::RgbaImage;

use super::CroppedImage;

/// 颜色模式常量（`1 << 8`）。
pub const COLOR_MODE: u32 = 1 << 8;

/// 头部字节数。
pub const HEADER_LEN: usize = 8;

const BYTES_PER_PIXEL: usize = 4;

/// 对端解析错误。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PixelDumpError {
    #[error("数据过短：{0} 字节，至少需要 8 字节头部")]
    TooShort(usize),

    #[error("数据长度不匹配：期望 {expected} 字节，实际 {actual} 字节")]
    LengthMismatch { expected: usize, actual: usize },
}

/// 解析后的头部。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelDumpHeader {
    pub color_mode: u32,
    pub width: u16,
    pub height: u16,
}

impl PixelDumpHeader {
    /// 宽高按 16 位截断写入。
    pub fn for_dimensions(width: u32, height: u32) -> Self {
        Self {
            color_mode: COLOR_MODE,
            width: (width & 0xFFFF) as u16,
            height: (height & 0xFFFF) as u16,
        }
    }

    pub fn packed(&self) -> u32 {
        u32::from(self.width) | (u32::from(self.height) << 16)
    }

    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut out = [0u8; HEADER_LEN];
        out[..4].copy_from_slice(&self.color_mode.to_le_bytes());
        out[4..].copy_from_slice(&self.packed().to_le_bytes());
        out
    }

    pub fn parse(bytes: &[u8]) -> Result<Self, PixelDumpError> {
        if bytes.len() < HEADER_LEN {
            return Err(PixelDumpError::TooShort(bytes.len()));
        }
        let color_mode = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let packed = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        Ok(Self {
            color_mode,
            width: (packed & 0xFFFF) as u16,
            height: (packed >> 16) as u16,
        })
    }

    pub fn pixel_count(&self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }
}

/// 发往对端的完整字节序列。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryPixelDump {
    header: PixelDumpHeader,
    bytes: Vec<u8>,
}

impl BinaryPixelDump {
    pub fn encode(image: &CroppedImage) -> Self {
        Self::encode_rgba(image.as_rgba())
    }

    /// 直接编码任意 RGBA 位图。
    ///
    /// # 示例
    /// ```rust
    /// use image::{Rgba, RgbaImage};
    /// use wear_image_bridge::transcoder::BinaryPixelDump;
    ///
    /// let dump = BinaryPixelDump::encode_rgba(&RgbaImage::from_pixel(2, 1, Rgba([1, 2, 3, 4])));
    /// assert_eq!(dump.len(), 8 + 2 * 4);
    /// assert_eq!(&dump.as_bytes()[8..12], &[3, 2, 1, 4]);
    /// ```
    pub fn encode_rgba(pixels: &RgbaImage) -> Self {
        let (width, height) = pixels.dimensions();
        let pixel_bytes = (width as usize) * (height as usize) * BYTES_PER_PIXEL;

        let header = PixelDumpHeader::for_dimensions(width, height);
        let mut bytes = Vec::with_capacity(HEADER_LEN + pixel_bytes);
        bytes.extend_from_slice(&header.to_bytes());
        for pixel in pixels.pixels() {
            let [r, g, b, a] = pixel.0;
            bytes.extend_from_slice(&[b, g, r, a]);
        }

        Self { header, bytes }
    }

    /// 校验并包装对端收到的字节。
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, PixelDumpError> {
        let header = PixelDumpHeader::parse(&bytes)?;
        let expected = HEADER_LEN + header.pixel_count() * BYTES_PER_PIXEL;
        if bytes.len() != expected {
            return Err(PixelDumpError::LengthMismatch {
                expected,
                actual: bytes.len(),
            });
        }
        Ok(Self { header, bytes })
    }

    pub fn header(&self) -> PixelDumpHeader {
        self.header
    }

    pub fn pixel_count(&self) -> usize {
        (self.bytes.len() - HEADER_LEN) / BYTES_PER_PIXEL
    }

    /// 按顺序迭代 `[B, G, R, A]`。
    pub fn pixels(&self) -> impl Iterator<Item = [u8; 4]> + '_ {
        self.bytes[HEADER_LEN..]
            .chunks_exact(BYTES_PER_PIXEL)
            .map(|c| [c[0], c[1], c[2], c[3]])
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn header_packs_width_low_height_high() {
        let header = PixelDumpHeader::for_dimensions(454, 300);

        assert_eq!(header.packed(), 454 | (300 << 16));
        assert_eq!(
            header.to_bytes(),
            [0x00, 0x01, 0x00, 0x00, 0xC6, 0x01, 0x2C, 0x01]
        );
    }

    #[test]
    fn pixels_are_written_bgra_row_major() {
        let mut pixels = RgbaImage::new(2, 2);
        pixels.put_pixel(0, 0, Rgba([10, 20, 30, 40]));
        pixels.put_pixel(1, 0, Rgba([50, 60, 70, 80]));
        pixels.put_pixel(0, 1, Rgba([90, 100, 110, 120]));
        pixels.put_pixel(1, 1, Rgba([130, 140, 150, 160]));

        let dump = BinaryPixelDump::encode_rgba(&pixels);
        let collected: Vec<[u8; 4]> = dump.pixels().collect();

        assert_eq!(dump.len(), 8 + 16);
        assert_eq!(
            collected,
            vec![
                [30, 20, 10, 40],
                [70, 60, 50, 80],
                [110, 100, 90, 120],
                [150, 140, 130, 160],
            ]
        );
    }

    #[test]
    fn from_bytes_accepts_encoded_payload() {
        let dump = BinaryPixelDump::encode_rgba(&RgbaImage::from_pixel(3, 2, Rgba([0, 0, 0, 255])));
        let parsed = BinaryPixelDump::from_bytes(dump.as_bytes().to_vec()).expect("valid payload");

        assert_eq!(parsed.header(), PixelDumpHeader::for_dimensions(3, 2));
        assert_eq!(parsed.pixel_count(), 6);
    }

    #[test]
    fn from_bytes_rejects_truncated_payloads() {
        assert_eq!(
            BinaryPixelDump::from_bytes(vec![0; 5]),
            Err(PixelDumpError::TooShort(5))
        );

        let mut bytes = BinaryPixelDump::encode_rgba(&RgbaImage::new(2, 2)).into_bytes();
        bytes.pop();
        assert_eq!(
            BinaryPixelDump::from_bytes(bytes),
            Err(PixelDumpError::LengthMismatch { expected: 24, actual: 23 })
        );
    }
}
