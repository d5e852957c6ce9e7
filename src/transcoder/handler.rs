//! # 转码编排
//!
//! ## 设计思路
//!
//! `ImageTranscoder` 只负责流程编排，不关心字节从哪里来。处理链路固定为：
//! 1. 读取字节源
//! 2. 头部探测尺寸并做上限检查
//! 3. 完整解码
//! 4. 居中裁剪缩放
//! 5. 编码二进制转储
//! 6. 尽力写入预览图
//!
//! ## 实现思路
//!
//! - 每次调用只读配置，不保存跨调用的可变状态，可在多线程间共享引用。
//! - 记录 `probe/decode/crop/encode/preview/total` 阶段耗时，便于性能诊断。

use std::io::Read;
use std::path::PathBuf;
use std::time::Instant;

use super::config::validate_target_size;
use super::{BinaryPixelDump, CropPlan, TranscodeConfig, TranscodeError};
use crate::storage::StorageLayout;

/// 默认日志 target。
pub const TRANSCODER_LOG_TARGET: &str = "image_transcoder";

/// 图片转码器。
#[derive(Debug, Clone)]
pub struct ImageTranscoder {
    pub(super) config: TranscodeConfig,
    pub(super) storage: Option<StorageLayout>,
    pub(super) log_target: &'static str,
}

/// 单次转码的全部产物。
#[derive(Debug, Clone)]
pub struct TranscodeOutput {
    /// 预览图路径；未启用或写入失败时为 `None`。
    pub preview_path: Option<PathBuf>,
    pub dump: BinaryPixelDump,
    pub source_width: u32,
    pub source_height: u32,
    pub plan: CropPlan,
}

impl Default for ImageTranscoder {
    fn default() -> Self {
        Self::new(TranscodeConfig::default())
    }
}

impl ImageTranscoder {
    /// 创建转码器。未设置存储目录时不写预览图。
    ///
    /// # 示例
    /// ```rust
    /// use std::io::Cursor;
    /// use image::{DynamicImage, ImageFormat, RgbaImage};
    /// use wear_image_bridge::transcoder::{ImageTranscoder, TranscodeConfig};
    ///
    /// let mut png = Cursor::new(Vec::new());
    /// DynamicImage::ImageRgba8(RgbaImage::new(20, 40)).write_to(&mut png, ImageFormat::Png)?;
    ///
    /// let transcoder = ImageTranscoder::new(TranscodeConfig::default());
    /// let output = transcoder.transcode(Cursor::new(png.into_inner()), 10)?;
    /// assert_eq!(output.dump.len(), 8 + 4 * 10 * 10);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new(config: TranscodeConfig) -> Self {
        Self {
            config,
            storage: None,
            log_target: TRANSCODER_LOG_TARGET,
        }
    }

    /// 指定预览图的存储目录。
    pub fn with_storage(mut self, storage: StorageLayout) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn with_log_target(mut self, log_target: &'static str) -> Self {
        self.log_target = log_target;
        self
    }

    /// 使用配置中的目标边长转码。
    pub fn transcode_default<R: Read>(&self, source: R) -> Result<TranscodeOutput, TranscodeError> {
        self.transcode(source, self.config.target_size)
    }

    /// 处理主入口：读取、解码、裁剪缩放、编码。
    pub fn transcode<R: Read>(
        &self,
        source: R,
        target_size: u32,
    ) -> Result<TranscodeOutput, TranscodeError> {
        self.config.validate()?;
        validate_target_size(target_size)?;

        let total_start = Instant::now();

        let raw = self.read_source(source, "reader")?;

        let probe_start = Instant::now();
        let (header_width, header_height) = self.probe_dimensions(&raw)?;
        Self::validate_pixel_limits(&self.config, header_width, header_height)?;
        Self::validate_decoded_memory_limits(&self.config, header_width, header_height)?;
        let probe_elapsed = probe_start.elapsed();

        let decode_start = Instant::now();
        let decoded = self.decode_full(&raw)?;
        drop(raw);
        let decode_elapsed = decode_start.elapsed();

        let crop_start = Instant::now();
        let plan = CropPlan::compute(decoded.width(), decoded.height(), target_size);
        let cropped = self.crop_and_scale(&decoded, plan)?;
        let crop_elapsed = crop_start.elapsed();

        let encode_start = Instant::now();
        let dump = BinaryPixelDump::encode(&cropped);
        let encode_elapsed = encode_start.elapsed();

        let preview_start = Instant::now();
        let preview_path = self.write_preview(&decoded);
        let preview_elapsed = preview_start.elapsed();

        log::info!(
            target: self.log_target,
            "✅ 图片转码完成 - 原始尺寸: {}x{} 输出尺寸: {}x{} 字节: {} probe={}ms decode={}ms crop={}ms encode={}ms preview={}ms total={}ms",
            decoded.width(),
            decoded.height(),
            cropped.width(),
            cropped.height(),
            dump.len(),
            probe_elapsed.as_millis(),
            decode_elapsed.as_millis(),
            crop_elapsed.as_millis(),
            encode_elapsed.as_millis(),
            preview_elapsed.as_millis(),
            total_start.elapsed().as_millis()
        );

        Ok(TranscodeOutput {
            preview_path,
            dump,
            source_width: decoded.width(),
            source_height: decoded.height(),
            plan,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x % 255) as u8, (y % 255) as u8, ((x + y) % 255) as u8, 255])
        });
        let mut cursor = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut cursor, ImageFormat::Png)
            .expect("encode test png");
        cursor.into_inner()
    }

    #[test]
    fn wide_source_produces_square_dump() {
        let transcoder = ImageTranscoder::default();
        let output = transcoder
            .transcode(Cursor::new(png_bytes(300, 100)), 50)
            .expect("transcode");

        assert_eq!((output.source_width, output.source_height), (300, 100));
        assert_eq!(output.dump.len(), 8 + 4 * 50 * 50);
        assert_eq!(output.dump.header().width, 50);
        assert_eq!(output.dump.header().height, 50);
        assert!(output.preview_path.is_none());
    }

    #[test]
    fn transcode_default_uses_configured_target() {
        let mut config = TranscodeConfig::default();
        config.target_size = 16;
        let output = ImageTranscoder::new(config)
            .transcode_default(Cursor::new(png_bytes(32, 32)))
            .expect("transcode");

        assert_eq!(output.dump.len(), 8 + 4 * 16 * 16);
    }

    #[test]
    fn invalid_target_size_is_rejected() {
        let transcoder = ImageTranscoder::default();
        let result = transcoder.transcode(Cursor::new(png_bytes(4, 4)), 0);
        assert!(matches!(result, Err(TranscodeError::InvalidConfig(_))));
    }

    #[test]
    fn oversized_source_hits_resource_limit() {
        let mut config = TranscodeConfig::default();
        config.max_decoded_pixels = 1_000;
        let result = ImageTranscoder::new(config).transcode(Cursor::new(png_bytes(40, 40)), 10);

        assert!(matches!(result, Err(TranscodeError::ResourceLimit(_))));
    }
}
