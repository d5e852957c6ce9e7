//! # 转码配置模块
//!
//! ## 设计思路
//!
//! 将所有“可调策略”集中到 `TranscodeConfig`：目标边长、缩放滤镜、预览图开关与质量、
//! 解码资源上限。目标边长默认 454（表盘设备的分辨率），可按设备调整。
//!
//! ## 实现思路
//!
//! - `Default` 提供与参考设备一致的配置。
//! - `ResampleQuality` 把 quality / balanced / speed 三档映射到具体滤镜。
//! - `validate` 在进入流水线前拒绝无法编码进 16 位头部的边长。

use std::str::FromStr;

use image::imageops::FilterType;
use serde::{Deserialize, Serialize};

use super::TranscodeError;

/// 参考设备的目标边长。
pub const DEFAULT_TARGET_SIZE: u32 = 454;

/// 转码配置。
#[derive(Debug, Clone)]
pub struct TranscodeConfig {
    /// 输出正方形边长（像素）。
    pub target_size: u32,
    /// 缩放滤镜。
    pub resize_filter: FilterType,
    /// 是否写入预览图。
    pub write_preview: bool,
    /// 预览 JPEG 质量（1~100）。
    pub preview_quality: u8,
    /// 解码后的像素上限（`width * height`）。
    pub max_decoded_pixels: u64,
    /// 解码阶段允许的预计内存上限（按 RGBA 估算，字节）。
    pub max_decoded_bytes: u64,
}

impl Default for TranscodeConfig {
    fn default() -> Self {
        Self {
            target_size: DEFAULT_TARGET_SIZE,
            resize_filter: FilterType::Triangle,
            write_preview: true,
            preview_quality: 100,
            max_decoded_pixels: 40_000_000,
            max_decoded_bytes: 160 * 1024 * 1024,
        }
    }
}

/// 缩放质量档位。
///
/// - `Quality`：CatmullRom
/// - `Balanced`：双线性（与平台位图过滤一致）
/// - `Speed`：最近邻
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResampleQuality {
    Quality,
    Balanced,
    Speed,
}

impl FromStr for ResampleQuality {
    type Err = TranscodeError;

    /// 从外部字符串解析档位（忽略大小写与首尾空白）。
    ///
    /// # 示例
    /// ```rust
    /// use wear_image_bridge::transcoder::ResampleQuality;
    ///
    /// let q: ResampleQuality = " Speed ".parse()?;
    /// assert_eq!(q.as_str(), "speed");
    /// # Ok::<(), wear_image_bridge::transcoder::TranscodeError>(())
    /// ```
    fn from_str(quality: &str) -> Result<Self, Self::Err> {
        match quality.trim().to_lowercase().as_str() {
            "quality" => Ok(Self::Quality),
            "balanced" => Ok(Self::Balanced),
            "speed" => Ok(Self::Speed),
            other => Err(TranscodeError::InvalidConfig(format!(
                "未知缩放档位：{}（可选：quality / balanced / speed）",
                other
            ))),
        }
    }
}

impl ResampleQuality {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Quality => "quality",
            Self::Balanced => "balanced",
            Self::Speed => "speed",
        }
    }

    pub fn filter(self) -> FilterType {
        match self {
            Self::Quality => FilterType::CatmullRom,
            Self::Balanced => FilterType::Triangle,
            Self::Speed => FilterType::Nearest,
        }
    }
}

impl TranscodeConfig {
    /// 应用缩放档位。
    pub fn apply_resample_quality(&mut self, quality: ResampleQuality) {
        self.resize_filter = quality.filter();
    }

    /// 从当前滤镜反推档位。
    pub fn resample_quality(&self) -> ResampleQuality {
        match self.resize_filter {
            FilterType::Nearest => ResampleQuality::Speed,
            FilterType::Triangle => ResampleQuality::Balanced,
            _ => ResampleQuality::Quality,
        }
    }

    /// 校验配置。
    pub fn validate(&self) -> Result<(), TranscodeError> {
        validate_target_size(self.target_size)?;
        if !(1..=100).contains(&self.preview_quality) {
            return Err(TranscodeError::InvalidConfig(format!(
                "preview_quality 必须在 1~100 之间：{}",
                self.preview_quality
            )));
        }
        if self.max_decoded_pixels == 0 || self.max_decoded_bytes == 0 {
            return Err(TranscodeError::InvalidConfig("解码上限不能为 0".to_string()));
        }
        Ok(())
    }
}

/// 目标边长必须能放进头部的 16 位字段。
pub(crate) fn validate_target_size(target_size: u32) -> Result<(), TranscodeError> {
    if target_size == 0 || target_size > u32::from(u16::MAX) {
        return Err(TranscodeError::InvalidConfig(format!(
            "target_size 必须在 1~{} 之间：{}",
            u16::MAX,
            target_size
        )));
    }
    Ok(())
}
