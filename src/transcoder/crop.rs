//! # 居中裁剪与等比缩放
//!
//! ## 设计思路
//!
//! 目标是正方形，所以先按短边从图像中心截出一个正方形，再统一缩放到目标边长，
//! 两个方向使用同一个缩放系数，不做独立拉伸。
//!
//! ```text
//! w <= h（竖图）: s = t / w, y0 = (h - w) / 2, 裁剪区 [0, |y0|, |w|, |h - 2*y0|]
//! w >  h（横图）: s = t / h, x0 = (w - h) / 2, 裁剪区 [|x0|, 0, |w - 2*x0|, |h|]
//! ```
//!
//! ## 实现思路
//!
//! - 计算使用 `f32`，偏移量取绝对值后向零截断，与平台位图行为一致。
//! - 裁剪区退化（边长为 0 或越界）时返回原图，不缩放，保证总有输出。
//! - 优先用 `fast_image_resize`（带裁剪参数）完成一次性裁剪缩放；
//!   失败时回退到 `image::imageops`。

use fast_image_resize as fr;
use image::{DynamicImage, RgbaImage};

use super::{CroppedImage, DecodedImage, ImageTranscoder, TranscodeError};

/// 源图中的裁剪矩形（像素）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// 裁剪缩放计划。
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CropPlan {
    /// 居中裁剪后按 `scale` 等比缩放到 `output_width × output_height`。
    CenterCrop {
        rect: CropRect,
        scale: f32,
        output_width: u32,
        output_height: u32,
    },
    /// 裁剪区退化，原样输出。
    Passthrough { width: u32, height: u32 },
}

impl CropPlan {
    /// 计算把 `width × height` 转成 `target × target` 的计划。
    ///
    /// # 示例
    /// ```rust
    /// use wear_image_bridge::transcoder::{CropPlan, CropRect};
    ///
    /// let plan = CropPlan::compute(1000, 2000, 454);
    /// assert_eq!(plan.crop_rect(), Some(CropRect { x: 0, y: 500, width: 1000, height: 1000 }));
    /// assert_eq!(plan.output_dimensions(), (454, 454));
    /// ```
    pub fn compute(width: u32, height: u32, target: u32) -> Self {
        let passthrough = Self::Passthrough { width, height };
        if width == 0 || height == 0 || target == 0 {
            return passthrough;
        }

        let (w, h, t) = (width as f32, height as f32, target as f32);

        // 目标为正方形，宽高比阈值恒为 t / t。
        let (scale, x_begin, y_begin, result_w, result_h) = if w / h <= t / t {
            let y_begin = (h - w) / 2.0;
            (t / w, 0.0_f32, y_begin, w, h - 2.0 * y_begin)
        } else {
            let x_begin = (w - h) / 2.0;
            (t / h, x_begin, 0.0_f32, w - 2.0 * x_begin, h)
        };

        if !(w - x_begin > 0.0 && h - y_begin > 0.0) {
            return passthrough;
        }

        let rect = CropRect {
            x: x_begin.abs() as u32,
            y: y_begin.abs() as u32,
            width: result_w.abs() as u32,
            height: result_h.abs() as u32,
        };

        let out_of_bounds = u64::from(rect.x) + u64::from(rect.width) > u64::from(width)
            || u64::from(rect.y) + u64::from(rect.height) > u64::from(height);
        if rect.width == 0 || rect.height == 0 || out_of_bounds {
            return passthrough;
        }

        let output_width = ((rect.width as f32 * scale).round() as u32).max(1);
        let output_height = ((rect.height as f32 * scale).round() as u32).max(1);

        Self::CenterCrop {
            rect,
            scale,
            output_width,
            output_height,
        }
    }

    pub fn crop_rect(&self) -> Option<CropRect> {
        match self {
            Self::CenterCrop { rect, .. } => Some(*rect),
            Self::Passthrough { .. } => None,
        }
    }

    /// 统一缩放系数；原样输出时为 1。
    pub fn scale(&self) -> f32 {
        match self {
            Self::CenterCrop { scale, .. } => *scale,
            Self::Passthrough { .. } => 1.0,
        }
    }

    pub fn output_dimensions(&self) -> (u32, u32) {
        match self {
            Self::CenterCrop {
                output_width,
                output_height,
                ..
            } => (*output_width, *output_height),
            Self::Passthrough { width, height } => (*width, *height),
        }
    }

    pub fn is_passthrough(&self) -> bool {
        matches!(self, Self::Passthrough { .. })
    }
}

impl ImageTranscoder {
    /// 按计划裁剪缩放。
    pub(crate) fn crop_and_scale(
        &self,
        image: &DecodedImage,
        plan: CropPlan,
    ) -> Result<CroppedImage, TranscodeError> {
        let CropPlan::CenterCrop {
            rect,
            output_width,
            output_height,
            ..
        } = plan
        else {
            log::warn!(
                target: self.log_target,
                "⚠️ 裁剪区退化，按原图输出：{}x{}",
                image.width(),
                image.height()
            );
            return Ok(CroppedImage::new(image.as_rgba().clone()));
        };

        log::debug!(
            target: self.log_target,
            "✂️ 居中裁剪：{}x{} 取 ({}, {}, {}x{}) → {}x{}（filter={:?}）",
            image.width(),
            image.height(),
            rect.x,
            rect.y,
            rect.width,
            rect.height,
            output_width,
            output_height,
            self.config.resize_filter
        );

        let pixels = match Self::crop_resize_with_fast_image_resize(
            image.as_rgba(),
            rect,
            output_width,
            output_height,
            self.config.resize_filter,
        ) {
            Ok(pixels) => pixels,
            Err(err) => {
                log::warn!(
                    target: self.log_target,
                    "⚠️ fast_image_resize 裁剪缩放失败，回退 image::imageops：{}",
                    err
                );
                let cropped =
                    image::imageops::crop_imm(image.as_rgba(), rect.x, rect.y, rect.width, rect.height)
                        .to_image();
                DynamicImage::ImageRgba8(cropped)
                    .resize_exact(output_width, output_height, self.config.resize_filter)
                    .to_rgba8()
            }
        };

        Ok(CroppedImage::new(pixels))
    }

    fn crop_resize_with_fast_image_resize(
        source: &RgbaImage,
        rect: CropRect,
        target_width: u32,
        target_height: u32,
        filter: image::imageops::FilterType,
    ) -> Result<RgbaImage, TranscodeError> {
        let (src_width, src_height) = source.dimensions();

        let src_image = fr::images::Image::from_vec_u8(
            src_width,
            src_height,
            source.as_raw().clone(),
            fr::PixelType::U8x4,
        )
        .map_err(|e| TranscodeError::DecodeFailed(format!("构建源图像缓冲失败：{}", e)))?;

        let mut dst_image = fr::images::Image::new(target_width, target_height, fr::PixelType::U8x4);

        let mut resizer = fr::Resizer::new();
        let options = fr::ResizeOptions::new()
            .resize_alg(fr::ResizeAlg::Convolution(Self::to_fast_filter(filter)))
            .crop(
                f64::from(rect.x),
                f64::from(rect.y),
                f64::from(rect.width),
                f64::from(rect.height),
            );

        resizer
            .resize(&src_image, &mut dst_image, Some(&options))
            .map_err(|e| TranscodeError::DecodeFailed(format!("fast_image_resize 执行失败：{}", e)))?;

        RgbaImage::from_raw(target_width, target_height, dst_image.into_vec())
            .ok_or_else(|| TranscodeError::DecodeFailed("fast_image_resize 输出缓冲长度异常".to_string()))
    }

    fn to_fast_filter(filter: image::imageops::FilterType) -> fr::FilterType {
        match filter {
            image::imageops::FilterType::Nearest => fr::FilterType::Box,
            image::imageops::FilterType::Triangle => fr::FilterType::Bilinear,
            image::imageops::FilterType::CatmullRom => fr::FilterType::CatmullRom,
            image::imageops::FilterType::Gaussian => fr::FilterType::Mitchell,
            image::imageops::FilterType::Lanczos3 => fr::FilterType::Lanczos3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcoder::TranscodeConfig;
    use image::Rgba;

    #[test]
    fn tall_image_crops_vertical_center() {
        let plan = CropPlan::compute(1000, 2000, 454);

        assert_eq!(
            plan.crop_rect(),
            Some(CropRect { x: 0, y: 500, width: 1000, height: 1000 })
        );
        assert_eq!(plan.output_dimensions(), (454, 454));
        assert!((plan.scale() - 0.454).abs() < 1e-6);
    }

    #[test]
    fn wide_image_crops_horizontal_center() {
        let plan = CropPlan::compute(1920, 1080, 454);

        assert_eq!(
            plan.crop_rect(),
            Some(CropRect { x: 420, y: 0, width: 1080, height: 1080 })
        );
        assert_eq!(plan.output_dimensions(), (454, 454));
    }

    #[test]
    fn square_image_at_target_is_identity() {
        let plan = CropPlan::compute(454, 454, 454);

        assert_eq!(
            plan.crop_rect(),
            Some(CropRect { x: 0, y: 0, width: 454, height: 454 })
        );
        assert_eq!(plan.scale(), 1.0);
        assert_eq!(plan.output_dimensions(), (454, 454));
    }

    #[test]
    fn odd_difference_truncates_offset() {
        let plan = CropPlan::compute(1001, 1000, 454);

        assert_eq!(
            plan.crop_rect(),
            Some(CropRect { x: 0, y: 0, width: 1000, height: 1000 })
        );
    }

    #[test]
    fn zero_sized_input_is_passthrough() {
        let plan = CropPlan::compute(0, 10, 454);
        assert!(plan.is_passthrough());
        assert_eq!(plan.output_dimensions(), (0, 10));
    }

    #[test]
    fn small_image_is_upscaled_to_target() {
        let plan = CropPlan::compute(3, 5, 9);

        assert_eq!(
            plan.crop_rect(),
            Some(CropRect { x: 0, y: 1, width: 3, height: 3 })
        );
        assert_eq!(plan.output_dimensions(), (9, 9));
    }

    #[test]
    fn crop_and_scale_keeps_center_band() {
        // 上下两段红色，中间绿色；裁剪后只剩绿色。
        let pixels = RgbaImage::from_fn(4, 8, |_, y| {
            if (2..6).contains(&y) {
                Rgba([0, 255, 0, 255])
            } else {
                Rgba([255, 0, 0, 255])
            }
        });
        let decoded = DecodedImage::from_rgba(pixels).expect("decoded");
        let transcoder = ImageTranscoder::new(TranscodeConfig::default());
        let plan = CropPlan::compute(4, 8, 4);

        let cropped = transcoder.crop_and_scale(&decoded, plan).expect("crop");

        assert_eq!((cropped.width(), cropped.height()), (4, 4));
        assert!(cropped.as_rgba().pixels().all(|p| p.0 == [0, 255, 0, 255]));
    }

    #[test]
    fn passthrough_plan_returns_original_pixels() {
        let pixels = RgbaImage::from_pixel(3, 2, Rgba([1, 2, 3, 4]));
        let decoded = DecodedImage::from_rgba(pixels.clone()).expect("decoded");
        let transcoder = ImageTranscoder::new(TranscodeConfig::default());

        let cropped = transcoder
            .crop_and_scale(&decoded, CropPlan::Passthrough { width: 3, height: 2 })
            .expect("passthrough");

        assert_eq!(cropped.as_rgba(), &pixels);
    }
}
