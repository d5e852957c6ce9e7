//! # 读取与解码流水线
//!
//! ## 设计思路
//!
//! 先只读头部拿到尺寸，做像素与内存上限检查，再完整解码。
//! 恶意或超大的输入在分配整幅位图前就被拒绝。
//!
//! ## 实现思路
//!
//! 1. 读满字节源；空输入视为解码失败
//! 2. `infer` 嗅探文件签名，非图片直接拒绝
//! 3. `ImageReader::into_dimensions` 读头部尺寸
//! 4. 上限检查
//! 5. 1:1 完整解码为 RGBA

use std::io::{Cursor, Read};

use image::ImageReader;

use super::source::{DecodedImage, RawImageBytes};
use super::{ImageTranscoder, TranscodeConfig, TranscodeError};

impl ImageTranscoder {
    /// 把字节源读入内存。
    pub(crate) fn read_source<R: Read>(
        &self,
        mut source: R,
        source_hint: &'static str,
    ) -> Result<RawImageBytes, TranscodeError> {
        let mut bytes = Vec::new();
        source
            .read_to_end(&mut bytes)
            .map_err(|e| TranscodeError::DecodeFailed(format!("读取字节源失败：{}", e)))?;

        if bytes.is_empty() {
            return Err(TranscodeError::DecodeFailed("字节源为空".to_string()));
        }

        Ok(RawImageBytes { bytes, source_hint })
    }

    /// 仅读取头部信息获取宽高。
    ///
    /// `infer` 只负责拒绝可识别的非图片类型（PDF、压缩包等）；签名未知时交给解码器判断。
    /// 格式已识别但头部读不完整，视为截断，归为解码失败。
    pub(crate) fn probe_dimensions(&self, raw: &RawImageBytes) -> Result<(u32, u32), TranscodeError> {
        if let Some(kind) = infer::get(&raw.bytes) {
            if kind.matcher_type() != infer::MatcherType::Image {
                return Err(TranscodeError::UndecodableImage(format!(
                    "不是图片：{}（来源：{}）",
                    kind.mime_type(),
                    raw.source_hint
                )));
            }
        }

        let reader = ImageReader::new(Cursor::new(raw.bytes.as_slice()))
            .with_guessed_format()
            .map_err(|e| TranscodeError::UndecodableImage(format!("无法识别图片格式：{}", e)))?;
        let format = reader.format();

        let (width, height) = reader.into_dimensions().map_err(|e| match (e, format) {
            (image::ImageError::Unsupported(err), _) => {
                TranscodeError::UndecodableImage(format!("不支持的图片格式：{}", err))
            }
            (image::ImageError::IoError(io), _) => {
                TranscodeError::DecodeFailed(format!("读取图片头部时数据不完整：{}", io))
            }
            (other, Some(format)) => TranscodeError::DecodeFailed(format!(
                "{:?} 头部不完整或已损坏：{}",
                format, other
            )),
            (other, None) => TranscodeError::UndecodableImage(format!("无法读取图片尺寸：{}", other)),
        })?;

        if width == 0 || height == 0 {
            return Err(TranscodeError::UndecodableImage(format!(
                "图片尺寸无效：{}x{}",
                width, height
            )));
        }

        Ok((width, height))
    }

    /// 完整解码。
    pub(crate) fn decode_full(&self, raw: &RawImageBytes) -> Result<DecodedImage, TranscodeError> {
        let decoded = image::load_from_memory(&raw.bytes).map_err(|e| match e {
            image::ImageError::Limits(limit) => {
                TranscodeError::ResourceLimit(format!("解码超出限制：{}", limit))
            }
            other => TranscodeError::DecodeFailed(format!("完整解码失败：{}", other)),
        })?;

        DecodedImage::from_rgba(decoded.to_rgba8()).map_err(|e| match e {
            TranscodeError::UndecodableImage(msg) => TranscodeError::DecodeFailed(msg),
            other => other,
        })
    }

    /// 校验像素数量是否超过配置上限。
    pub(crate) fn validate_pixel_limits(
        config: &TranscodeConfig,
        width: u32,
        height: u32,
    ) -> Result<(), TranscodeError> {
        let pixels = u64::from(width)
            .checked_mul(u64::from(height))
            .ok_or_else(|| TranscodeError::ResourceLimit("图片像素数溢出".to_string()))?;

        if pixels > config.max_decoded_pixels {
            return Err(TranscodeError::ResourceLimit(format!(
                "图片像素过大：{} 像素（限制：{} 像素）",
                pixels, config.max_decoded_pixels
            )));
        }

        Ok(())
    }

    pub(crate) fn validate_decoded_memory_limits(
        config: &TranscodeConfig,
        width: u32,
        height: u32,
    ) -> Result<(), TranscodeError> {
        let estimated = u64::from(width)
            .checked_mul(u64::from(height))
            .and_then(|pixels| pixels.checked_mul(4))
            .ok_or_else(|| TranscodeError::ResourceLimit("解码内存估算溢出".to_string()))?;

        if estimated > config.max_decoded_bytes {
            return Err(TranscodeError::ResourceLimit(format!(
                "预计解码内存过大：{}MB（限制：{}MB）",
                estimated / 1024 / 1024,
                config.max_decoded_bytes / 1024 / 1024
            )));
        }

        Ok(())
    }
}
