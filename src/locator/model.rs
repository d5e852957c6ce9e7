//! # 定位数据模型
//!
//! ## 设计思路
//!
//! 平台选择器返回的是一串不透明 URI，这里把它拆成三元组
//! `(scheme, authority, opaque_id)`，并额外记录是否为“文档引用”。
//! 解析器只消费拆好的三元组，不再关心字符串细节。
//!
//! ## 实现思路
//!
//! - URI 拆分使用预编译正则（`once_cell::sync::Lazy`）。
//! - 文档 ID 与路径做百分号解码（`%3A` → `:`，`%2F` → `/`）。
//! - `ContentAddress` 表示可查询的内容地址，末尾的纯数字段视为追加行 ID。

use std::fmt;

use once_cell::sync::Lazy;
use percent_encoding::percent_decode_str;
use regex::Regex;

use super::ResolveError;

static URI_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<scheme>[A-Za-z][A-Za-z0-9+.\-]*)://(?P<authority>[^/?#]*)(?P<path>[^?#]*)")
        .expect("URI pattern must compile")
});

static DOCUMENT_PATH_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:/tree/[^/]+)?/document/(?P<id>[^/]+)/?$")
        .expect("document path pattern must compile")
});

/// 下载内容地址（`content://downloads/public_downloads`）。
pub const DOWNLOADS_AUTHORITY: &str = "downloads";
pub const DOWNLOADS_COLLECTION: &str = "/public_downloads";

/// 媒体库 authority（`content://media/...`）。
pub const MEDIA_AUTHORITY: &str = "media";

/// 定位 scheme。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scheme {
    Content,
    File,
    Other(String),
}

impl Scheme {
    /// 大小写不敏感地解析 scheme。
    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("content") {
            Self::Content
        } else if raw.eq_ignore_ascii_case("file") {
            Self::File
        } else {
            Self::Other(raw.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Content => "content",
            Self::File => "file",
            Self::Other(raw) => raw,
        }
    }
}

/// 平台资源定位。
///
/// 由 UI 层根据用户操作创建，解析器消费一次，不做持久化。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLocator {
    scheme: Scheme,
    authority: String,
    opaque_id: String,
    document: bool,
}

impl ResourceLocator {
    /// 文档引用：`opaque_id` 为提供方定义的文档 ID（通常是 `type:value`）。
    pub fn document(authority: impl Into<String>, document_id: impl Into<String>) -> Self {
        Self {
            scheme: Scheme::Content,
            authority: authority.into(),
            opaque_id: document_id.into(),
            document: true,
        }
    }

    /// 普通 content 地址：`opaque_id` 为地址路径。
    pub fn content(authority: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            scheme: Scheme::Content,
            authority: authority.into(),
            opaque_id: path.into(),
            document: false,
        }
    }

    /// 文件定位：`opaque_id` 即绝对路径。
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            scheme: Scheme::File,
            authority: String::new(),
            opaque_id: path.into(),
            document: false,
        }
    }

    /// 任意 scheme 的三元组。
    pub fn new(scheme: Scheme, authority: impl Into<String>, opaque_id: impl Into<String>) -> Self {
        Self {
            scheme,
            authority: authority.into(),
            opaque_id: opaque_id.into(),
            document: false,
        }
    }

    /// 解析选择器/相机返回的 URI 字符串。
    ///
    /// # 示例
    /// ```rust
    /// use wear_image_bridge::locator::{ResourceLocator, Scheme};
    ///
    /// let locator = ResourceLocator::parse(
    ///     "content://com.android.providers.media.documents/document/image%3A42",
    /// )?;
    /// assert_eq!(locator.scheme(), &Scheme::Content);
    /// assert!(locator.is_document());
    /// assert_eq!(locator.opaque_id(), "image:42");
    /// # Ok::<(), wear_image_bridge::locator::ResolveError>(())
    /// ```
    pub fn parse(uri: &str) -> Result<Self, ResolveError> {
        let trimmed = uri.trim();
        let captures = URI_PATTERN
            .captures(trimmed)
            .ok_or_else(|| ResolveError::MalformedLocator(trimmed.to_string()))?;

        let scheme = Scheme::parse(&captures["scheme"]);
        let authority = captures["authority"].to_string();
        let raw_path = &captures["path"];

        if scheme == Scheme::Content {
            if let Some(doc) = DOCUMENT_PATH_PATTERN.captures(raw_path) {
                return Ok(Self::document(authority, decode_component(&doc["id"])));
            }
        }

        Ok(Self {
            scheme,
            authority,
            opaque_id: decode_component(raw_path),
            document: false,
        })
    }

    pub fn scheme(&self) -> &Scheme {
        &self.scheme
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    pub fn opaque_id(&self) -> &str {
        &self.opaque_id
    }

    /// 是否为结构化文档引用（携带 `type:value` 形式的 ID）。
    pub fn is_document(&self) -> bool {
        self.document
    }
}

impl fmt::Display for ResourceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.document {
            write!(f, "{}://{}/document/{}", self.scheme.as_str(), self.authority, self.opaque_id)
        } else {
            write!(f, "{}://{}{}", self.scheme.as_str(), self.authority, self.opaque_id)
        }
    }
}

fn decode_component(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}

/// 媒体地址族。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaFamily {
    Image,
    Video,
    Audio,
}

impl MediaFamily {
    /// 从文档 ID 的 `type` 部分解析；大小写敏感，与提供方保持一致。
    pub fn from_type(kind: &str) -> Option<Self> {
        match kind {
            "image" => Some(Self::Image),
            "video" => Some(Self::Video),
            "audio" => Some(Self::Audio),
            _ => None,
        }
    }

    /// 外部存储上的媒体集合地址。
    pub fn address(self) -> ContentAddress {
        let collection = match self {
            Self::Image => "/external/images/media",
            Self::Video => "/external/video/media",
            Self::Audio => "/external/audio/media",
        };
        ContentAddress::new(MEDIA_AUTHORITY, collection)
    }
}

/// 可查询的内容地址。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentAddress {
    authority: String,
    collection: String,
    row_id: Option<i64>,
}

impl ContentAddress {
    pub fn new(authority: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            authority: authority.into(),
            collection: collection.into(),
            row_id: None,
        }
    }

    /// 下载内容地址。
    pub fn downloads() -> Self {
        Self::new(DOWNLOADS_AUTHORITY, DOWNLOADS_COLLECTION)
    }

    /// 从原始路径构建地址；末尾纯数字段视为追加的行 ID。
    pub fn from_path(authority: impl Into<String>, path: &str) -> Self {
        let authority = authority.into();
        if let Some((collection, last)) = path.rsplit_once('/') {
            if !collection.is_empty() && !last.is_empty() && last.bytes().all(|b| b.is_ascii_digit()) {
                if let Ok(row_id) = last.parse::<i64>() {
                    return Self {
                        authority,
                        collection: collection.to_string(),
                        row_id: Some(row_id),
                    };
                }
            }
        }
        Self::new(authority, path)
    }

    /// 追加行 ID（对应平台的 `withAppendedId`）。
    pub fn with_appended_id(mut self, row_id: i64) -> Self {
        self.row_id = Some(row_id);
        self
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn row_id(&self) -> Option<i64> {
        self.row_id
    }

    /// 完整路径（集合 + 可选行 ID）。
    pub fn path(&self) -> String {
        match self.row_id {
            Some(id) => format!("{}/{}", self.collection, id),
            None => self.collection.clone(),
        }
    }
}

impl fmt::Display for ContentAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "content://{}{}", self.authority, self.path())
    }
}
