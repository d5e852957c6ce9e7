//! 应用设置
//!
//! 设置以 JSON 文件保存。文件缺失或内容损坏时回退为默认值，不阻断启动；
//! 命令行参数在加载后覆盖对应字段。

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::locator::ResolverConfig;
use crate::storage::StorageLayout;
use crate::transcoder::{ResampleQuality, TranscodeConfig, DEFAULT_TARGET_SIZE};

/// 桥接服务设置。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeSettings {
    pub target_size: u32,
    pub resample_quality: ResampleQuality,
    pub write_preview: bool,
    pub preview_quality: u8,
    /// 外部存储根目录；为空表示未挂载。
    pub external_root: Option<PathBuf>,
    pub app_files_dir: PathBuf,
    /// 媒体库 SQLite 文件；为空时所有内容查询都走回退路径。
    pub media_db: Option<PathBuf>,
    pub resolver: ResolverConfig,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            target_size: DEFAULT_TARGET_SIZE,
            resample_quality: ResampleQuality::Balanced,
            write_preview: true,
            preview_quality: 100,
            external_root: None,
            app_files_dir: PathBuf::from("."),
            media_db: None,
            resolver: ResolverConfig::default(),
        }
    }
}

impl BridgeSettings {
    pub fn transcode_config(&self) -> TranscodeConfig {
        let mut config = TranscodeConfig {
            target_size: self.target_size,
            write_preview: self.write_preview,
            preview_quality: self.preview_quality,
            ..TranscodeConfig::default()
        };
        config.apply_resample_quality(self.resample_quality);
        config
    }

    pub fn storage_layout(&self) -> StorageLayout {
        StorageLayout::new(self.external_root.clone(), self.app_files_dir.clone())
    }
}

/// 从文件加载设置，失败时返回默认值。
pub fn load_settings_from_path(path: &Path) -> BridgeSettings {
    if path.exists() {
        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(settings) => return settings,
                Err(err) => log::warn!("⚠️ 解析设置文件失败，使用默认设置: {}", err),
            },
            Err(err) => log::warn!("⚠️ 读取设置文件失败，使用默认设置: {}", err),
        }
    }
    BridgeSettings::default()
}

pub fn save_settings_to_path(path: &Path, settings: &BridgeSettings) -> Result<(), AppError> {
    let content = serde_json::to_string_pretty(settings)
        .map_err(|e| AppError::Storage(format!("序列化设置失败: {}", e)))?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::imageops::FilterType;

    #[test]
    fn save_and_load_settings_roundtrip() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("settings.json");
        let settings = BridgeSettings {
            target_size: 320,
            resample_quality: ResampleQuality::Quality,
            external_root: Some(PathBuf::from("/storage/emulated/0")),
            ..BridgeSettings::default()
        };

        save_settings_to_path(&path, &settings).expect("save settings");
        let loaded = load_settings_from_path(&path);

        assert_eq!(loaded, settings);
    }

    #[test]
    fn bad_json_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("settings.json");
        fs::write(&path, "not-json").expect("write invalid settings");

        assert_eq!(load_settings_from_path(&path), BridgeSettings::default());
    }

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "target_size": 200, "resample_quality": "speed" }"#)
            .expect("write settings");

        let loaded = load_settings_from_path(&path);
        assert_eq!(loaded.target_size, 200);
        assert_eq!(loaded.resolver, ResolverConfig::default());

        let config = loaded.transcode_config();
        assert_eq!(config.target_size, 200);
        assert_eq!(config.resize_filter, FilterType::Nearest);
        assert!(config.write_preview);
    }
}
