//! # 服务层
//!
//! ## 设计思路
//!
//! `ImageBridge` 把解析器、转码器与存储目录组合成一条端到端链路：
//! 定位 → 路径 → 打开文件 → 转码 → 写入 `.bin` 主产物。
//! 传输层只需拿走返回的字节，不关心中间步骤。
//!
//! ## 实现思路
//!
//! - 各组件在构造时注入，测试可替换解析环境与存储目录。
//! - 解析与转码各自返回细粒度错误，这里统一汇总为 `AppError`。

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::error::AppError;
use crate::locator::{LocatorResolver, ResolverEnv, ResourceLocator};
use crate::settings::BridgeSettings;
use crate::storage::StorageLayout;
use crate::transcoder::{BinaryPixelDump, ImageTranscoder};

/// 默认日志 target。
pub const BRIDGE_LOG_TARGET: &str = "image_bridge";

/// 一次准备好的发送负载。
#[derive(Debug, Clone)]
pub struct PreparedPayload {
    /// 已写入磁盘的 `.bin` 文件。
    pub bin_path: PathBuf,
    pub preview_path: Option<PathBuf>,
    pub dump: BinaryPixelDump,
}

/// 端到端图片桥接服务。
pub struct ImageBridge<E> {
    resolver: LocatorResolver,
    transcoder: ImageTranscoder,
    storage: StorageLayout,
    env: E,
    log_target: &'static str,
}

impl<E: ResolverEnv> ImageBridge<E> {
    pub fn new(
        resolver: LocatorResolver,
        transcoder: ImageTranscoder,
        storage: StorageLayout,
        env: E,
    ) -> Self {
        Self {
            resolver,
            transcoder: transcoder.with_storage(storage.clone()),
            storage,
            env,
            log_target: BRIDGE_LOG_TARGET,
        }
    }

    /// 按设置组装全部组件。
    pub fn from_settings(settings: &BridgeSettings, env: E) -> Self {
        Self::new(
            LocatorResolver::new(settings.resolver.clone()),
            ImageTranscoder::new(settings.transcode_config()),
            settings.storage_layout(),
            env,
        )
    }

    pub fn with_log_target(mut self, log_target: &'static str) -> Self {
        self.log_target = log_target;
        self
    }

    pub fn resolve(&self, locator: &ResourceLocator) -> Result<PathBuf, AppError> {
        Ok(self.resolver.resolve(locator, &self.env)?)
    }

    /// 处理主入口：解析定位并生成发送负载。
    pub fn prepare_payload(&self, locator: &ResourceLocator) -> Result<PreparedPayload, AppError> {
        let resolve_start = Instant::now();
        let path = self.resolve(locator)?;
        log::info!(
            target: self.log_target,
            "📍 定位已解析：{} → {}（{}ms）",
            locator,
            path.display(),
            resolve_start.elapsed().as_millis()
        );

        self.prepare_payload_from_path(&path)
    }

    /// 跳过解析，直接处理本地文件。
    pub fn prepare_payload_from_path(&self, path: &Path) -> Result<PreparedPayload, AppError> {
        let file = File::open(path).map_err(|e| {
            log::error!(target: self.log_target, "❌ 打开图片失败：{}（{}）", path.display(), e);
            e
        })?;

        let output = self.transcoder.transcode_default(BufReader::new(file))?;

        let bin_path = self.storage.timestamped_file("bin")?;
        fs::write(&bin_path, output.dump.as_bytes())?;

        log::info!(
            target: self.log_target,
            "📦 负载已写入：{}（{} 字节）",
            bin_path.display(),
            output.dump.len()
        );

        Ok(PreparedPayload {
            bin_path,
            preview_path: output.preview_path,
            dump: output.dump,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::{DeviceEnv, NoContentStore, ResolveError};
    use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

    fn bridge(root: &Path) -> ImageBridge<DeviceEnv<NoContentStore>> {
        let settings = BridgeSettings {
            target_size: 8,
            external_root: Some(root.join("sdcard")),
            app_files_dir: root.join("files"),
            ..BridgeSettings::default()
        };
        ImageBridge::from_settings(&settings, DeviceEnv::new(root.join("sdcard"), NoContentStore))
    }

    #[test]
    fn prepare_payload_writes_bin_and_preview() {
        let dir = tempfile::tempdir().expect("temp dir");
        let source = dir.path().join("photo.png");
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(16, 24, Rgba([9, 8, 7, 255])))
            .save_with_format(&source, ImageFormat::Png)
            .expect("write source png");

        let bridge = bridge(dir.path());
        let payload = bridge
            .prepare_payload(&ResourceLocator::file(source.to_string_lossy()))
            .expect("payload");

        assert_eq!(payload.dump.len(), 8 + 4 * 8 * 8);
        assert_eq!(fs::read(&payload.bin_path).expect("read bin"), payload.dump.as_bytes());
        assert_eq!(payload.bin_path.parent(), Some(dir.path().join("files").join("Pictures").as_path()));

        let preview = payload.preview_path.expect("preview written");
        assert_eq!(preview.extension().and_then(|e| e.to_str()), Some("jpeg"));
        let decoded = image::open(&preview).expect("preview decodes");
        assert_eq!((decoded.width(), decoded.height()), (16, 24));
    }

    #[test]
    fn missing_file_surfaces_io_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let bridge = bridge(dir.path());

        let result = bridge.prepare_payload(&ResourceLocator::file(
            dir.path().join("absent.png").to_string_lossy(),
        ));

        assert!(matches!(result, Err(AppError::Io(_))));
    }

    #[test]
    fn unresolvable_locator_surfaces_resolve_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let bridge = bridge(dir.path());
        let locator = ResourceLocator::parse("content://media/external/images/media/7").expect("uri");

        assert!(matches!(
            bridge.prepare_payload(&locator),
            Err(AppError::Resolve(ResolveError::NotFound(_)))
        ));
    }
}
