//! 图片存储目录管理模块
//!
//! # 设计思路
//!
//! 统一管理转码产物（`.bin` 主产物与 `.jpeg` 预览图）的存放位置，
//! 目录不存在时自动创建。
//!
//! # 实现思路
//!
//! - 外部存储可用时使用 `<外部存储根>/Pictures`。
//! - 否则回退到应用私有目录下的 `Pictures` 子目录。
//! - 文件名为本地时间 `yyyyMMdd_HHmmss` 加扩展名。
//! - 所有可能失败的操作均返回 `Result`，不使用 `expect()` / `unwrap()`。

use std::fs;
use std::path::PathBuf;

use chrono::Local;

use crate::error::AppError;

/// 图片目录名
pub const PICTURES_DIR_NAME: &str = "Pictures";

const FILE_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// 产物存放位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLayout {
    external_root: Option<PathBuf>,
    app_files_dir: PathBuf,
}

impl StorageLayout {
    /// # 参数
    /// * `external_root` - 外部存储根目录（未挂载时为 `None`）
    /// * `app_files_dir` - 应用私有文件目录
    pub fn new(external_root: Option<PathBuf>, app_files_dir: impl Into<PathBuf>) -> Self {
        Self {
            external_root,
            app_files_dir: app_files_dir.into(),
        }
    }

    /// 获取图片目录，不存在时创建。
    ///
    /// # 返回
    /// - `Ok(PathBuf)`：可用的图片目录
    /// - `Err(AppError::Storage)`：无法创建目录
    pub fn pictures_dir(&self) -> Result<PathBuf, AppError> {
        let base = match &self.external_root {
            Some(root) if root.is_dir() => root,
            _ => &self.app_files_dir,
        };
        let dir = base.join(PICTURES_DIR_NAME);
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|e| {
                AppError::Storage(format!("创建图片目录 '{}' 失败: {}", dir.display(), e))
            })?;
        }
        Ok(dir)
    }

    /// 在图片目录下生成 `<时间戳>.<ext>` 路径（不创建文件）。
    pub fn timestamped_file(&self, ext: &str) -> Result<PathBuf, AppError> {
        let stamp = Local::now().format(FILE_STAMP_FORMAT);
        Ok(self.pictures_dir()?.join(format!("{}.{}", stamp, ext)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_mounted_external_storage() {
        let dir = tempfile::tempdir().expect("temp dir");
        let external = dir.path().join("sdcard");
        fs::create_dir_all(&external).expect("create external root");

        let layout = StorageLayout::new(Some(external.clone()), dir.path().join("files"));

        assert_eq!(layout.pictures_dir().expect("pictures dir"), external.join("Pictures"));
        assert!(external.join("Pictures").is_dir());
    }

    #[test]
    fn falls_back_to_app_files_when_external_missing() {
        let dir = tempfile::tempdir().expect("temp dir");
        let files = dir.path().join("files");
        let layout = StorageLayout::new(Some(dir.path().join("unmounted")), &files);

        assert_eq!(layout.pictures_dir().expect("pictures dir"), files.join("Pictures"));
        assert!(!dir.path().join("unmounted").exists());
    }

    #[test]
    fn timestamped_file_uses_compact_local_time() {
        let dir = tempfile::tempdir().expect("temp dir");
        let layout = StorageLayout::new(None, dir.path());

        let path = layout.timestamped_file("bin").expect("file path");
        let name = path.file_name().and_then(|n| n.to_str()).expect("utf-8 name");

        let pattern = regex::Regex::new(r"^\d{8}_\d{6}\.bin$").expect("regex");
        assert!(pattern.is_match(name), "unexpected name: {name}");
        assert_eq!(path.parent(), Some(dir.path().join("Pictures").as_path()));
    }
}
