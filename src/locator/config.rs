//! # 解析器配置
//!
//! 提供方 authority、数据列名与虚拟根目录段都集中在这里，
//! 默认值与 Android 平台保持一致，可通过设置文件覆盖。

use serde::{Deserialize, Serialize};

/// 外部存储文档提供方。
pub const EXTERNAL_STORAGE_AUTHORITY: &str = "com.android.externalstorage.documents";
/// 下载文档提供方。
pub const DOWNLOADS_DOCUMENTS_AUTHORITY: &str = "com.android.providers.downloads.documents";
/// 媒体文档提供方。
pub const MEDIA_DOCUMENTS_AUTHORITY: &str = "com.android.providers.media.documents";

/// 解析器配置。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub external_storage_authority: String,
    pub downloads_authority: String,
    pub media_authority: String,
    /// 查询投影的数据列。
    pub data_column: String,
    /// 查询失败时从地址路径剥离的虚拟根目录段。
    pub virtual_root_segment: String,
    /// 只支持该类型的外部存储文档（大小写不敏感）。
    pub primary_volume: String,
    /// 下载文档中表示“字面路径”的前缀。
    pub raw_prefix: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            external_storage_authority: EXTERNAL_STORAGE_AUTHORITY.to_string(),
            downloads_authority: DOWNLOADS_DOCUMENTS_AUTHORITY.to_string(),
            media_authority: MEDIA_DOCUMENTS_AUTHORITY.to_string(),
            data_column: "_data".to_string(),
            virtual_root_segment: "/root".to_string(),
            primary_volume: "primary".to_string(),
            raw_prefix: "raw:".to_string(),
        }
    }
}

/// 已知文档提供方。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Provider {
    ExternalStorage,
    Downloads,
    Media,
    Unknown,
}

impl ResolverConfig {
    pub(crate) fn provider_of(&self, authority: &str) -> Provider {
        if authority == self.external_storage_authority {
            Provider::ExternalStorage
        } else if authority == self.downloads_authority {
            Provider::Downloads
        } else if authority == self.media_authority {
            Provider::Media
        } else {
            Provider::Unknown
        }
    }
}
