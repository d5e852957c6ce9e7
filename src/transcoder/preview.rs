//! # 预览图写入
//!
//! 把解码后的原图（未裁剪）以 JPEG 写入图片目录，文件名为本地时间戳。
//! 预览只是附带产物：任何失败只记 `warn`，返回 `None`，不影响主产物。

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ExtendedColorType};

use super::source::DecodedImage;
use super::ImageTranscoder;
use crate::error::AppError;
use crate::storage::StorageLayout;

impl ImageTranscoder {
    pub(crate) fn write_preview(&self, image: &DecodedImage) -> Option<PathBuf> {
        if !self.config.write_preview {
            return None;
        }
        let storage = self.storage.as_ref()?;

        match Self::encode_preview(storage, image, self.config.preview_quality) {
            Ok(path) => {
                log::info!(target: self.log_target, "🖼️ 预览图已保存：{}", path.display());
                Some(path)
            }
            Err(err) => {
                log::warn!(target: self.log_target, "⚠️ 预览图写入失败，已忽略：{}", err);
                None
            }
        }
    }

    fn encode_preview(
        storage: &StorageLayout,
        image: &DecodedImage,
        quality: u8,
    ) -> Result<PathBuf, AppError> {
        let path = storage.timestamped_file("jpeg")?;

        // JPEG 不支持透明通道
        let rgb = DynamicImage::ImageRgba8(image.as_rgba().clone()).to_rgb8();

        let file = File::create(&path)?;
        let mut writer = BufWriter::new(file);
        JpegEncoder::new_with_quality(&mut writer, quality)
            .encode(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
            .map_err(|e| AppError::Storage(format!("JPEG 编码失败：{}", e)))?;
        writer.flush()?;

        Ok(path)
    }
}
