//! # 图片转码模块（transcoder）
//!
//! ## 设计思路
//!
//! 把任意尺寸的源图片变成对端设备可直接绘制的紧凑二进制格式。
//! 按职责拆分：
//!
//! - `config`：目标边长、缩放档位、预览与解码上限
//! - `error`：转码错误类型
//! - `source`：流水线中间模型
//! - `pipeline`：读取、头部探测、上限检查、完整解码
//! - `crop`：居中裁剪与等比缩放
//! - `wire`：二进制像素转储编码与解析
//! - `preview`：JPEG 预览图
//! - `handler`：编排入口 `ImageTranscoder`
//!
//! ## 调用链
//!
//! ```text
//! ImageTranscoder::transcode(reader, target)
//!    ↓
//! read_source → probe_dimensions → decode_full
//!    ↓
//! CropPlan::compute → crop_and_scale
//!    ↓
//! BinaryPixelDump::encode + write_preview（尽力）
//! ```

mod config;
mod crop;
mod error;
mod handler;
mod pipeline;
mod preview;
mod source;
mod wire;

pub use config::{ResampleQuality, TranscodeConfig, DEFAULT_TARGET_SIZE};
pub use crop::{CropPlan, CropRect};
pub use error::TranscodeError;
pub use handler::{ImageTranscoder, TranscodeOutput, TRANSCODER_LOG_TARGET};
pub use source::{CroppedImage, DecodedImage};
pub use wire::{BinaryPixelDump, PixelDumpError, PixelDumpHeader, COLOR_MODE, HEADER_LEN};
