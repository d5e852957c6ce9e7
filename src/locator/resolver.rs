//! # 定位解析器
//!
//! ## 设计思路
//!
//! 按 `(scheme, 是否文档, 提供方)` 做一次 `match` 分派，替代层层字符串比较：
//!
//! ```text
//! content + 文档 ──┬─ 外部存储  primary:<rel>   → <外部存储根>/<rel>
//!                  ├─ 下载      raw:<path>      → <path>
//!                  │            <row id>        → 通用列查询（downloads 地址 + 追加 ID）
//!                  ├─ 媒体      image|video|audio:<id> → 通用列查询（媒体族地址 + _id 过滤）
//!                  └─ 其他                      → UnknownProvider
//! content（非文档）                             → 通用列查询（自身地址）
//! file                                          → opaque_id 原样返回
//! 其他                                          → UnsupportedScheme
//! ```
//!
//! ## 实现思路
//!
//! 通用列查询失败（无结果 / 存储拒绝地址）时，尝试剥离虚拟根目录段得到路径。
//! 这条回退只是尽力而为，会以 `warn` 级别记录。

use std::path::PathBuf;

use super::config::Provider;
use super::{
    ContentAddress, ContentQuery, MediaFamily, ResolveError, ResolverConfig, ResolverEnv,
    ResourceLocator, Scheme,
};

/// 默认日志 target。
pub const RESOLVER_LOG_TARGET: &str = "locator_resolver";

/// 资源定位解析器。
///
/// 无内部可变状态，同一实例可以重复调用。
#[derive(Debug, Clone)]
pub struct LocatorResolver {
    config: ResolverConfig,
    log_target: &'static str,
}

impl Default for LocatorResolver {
    fn default() -> Self {
        Self::new(ResolverConfig::default())
    }
}

impl LocatorResolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self {
            config,
            log_target: RESOLVER_LOG_TARGET,
        }
    }

    /// 替换日志 target，便于宿主按组件过滤。
    pub fn with_log_target(mut self, target: &'static str) -> Self {
        self.log_target = target;
        self
    }

    /// 将定位解析为绝对路径。
    ///
    /// # 示例
    /// ```rust
    /// use wear_image_bridge::locator::{DeviceEnv, LocatorResolver, NoContentStore, ResourceLocator};
    ///
    /// let env = DeviceEnv::new("/storage/emulated/0", NoContentStore);
    /// let resolver = LocatorResolver::default();
    /// let path = resolver.resolve(&ResourceLocator::file("/tmp/a.jpg"), &env)?;
    /// assert_eq!(path, std::path::PathBuf::from("/tmp/a.jpg"));
    /// # Ok::<(), wear_image_bridge::locator::ResolveError>(())
    /// ```
    pub fn resolve(
        &self,
        locator: &ResourceLocator,
        env: &dyn ResolverEnv,
    ) -> Result<PathBuf, ResolveError> {
        log::debug!(target: self.log_target, "🔎 解析定位：{}", locator);

        match (locator.scheme(), locator.is_document()) {
            (Scheme::Content, true) => self.resolve_document(locator, env),
            (Scheme::Content, false) => {
                let address = ContentAddress::from_path(locator.authority(), locator.opaque_id());
                self.lookup_data_column(env, &address, None)
            }
            (Scheme::File, _) => {
                if locator.opaque_id().is_empty() {
                    return Err(ResolveError::NotFound(locator.to_string()));
                }
                Ok(PathBuf::from(locator.opaque_id()))
            }
            (Scheme::Other(scheme), _) => {
                log::warn!(target: self.log_target, "⚠️ 不支持的 scheme：{}", scheme);
                Err(ResolveError::UnsupportedScheme(scheme.clone()))
            }
        }
    }

    fn resolve_document(
        &self,
        locator: &ResourceLocator,
        env: &dyn ResolverEnv,
    ) -> Result<PathBuf, ResolveError> {
        let document_id = locator.opaque_id();

        match self.config.provider_of(locator.authority()) {
            Provider::ExternalStorage => {
                let (kind, value) = split_document_id(document_id)?;
                if !kind.eq_ignore_ascii_case(&self.config.primary_volume) {
                    return Err(ResolveError::UnsupportedDocumentType(kind.to_string()));
                }
                let root = env.external_storage_root().ok_or_else(|| {
                    log::warn!(target: self.log_target, "⚠️ 外部存储未挂载：{}", locator);
                    ResolveError::ExternalStorageUnavailable(locator.to_string())
                })?;
                Ok(root.join(value.trim_start_matches('/')))
            }
            Provider::Downloads => {
                if let Some(raw) = document_id.strip_prefix(self.config.raw_prefix.as_str()) {
                    return Ok(PathBuf::from(raw));
                }
                let row_id = parse_row_id(document_id)?;
                let address = ContentAddress::downloads().with_appended_id(row_id);
                self.lookup_data_column(env, &address, None)
            }
            Provider::Media => {
                let (kind, value) = split_document_id(document_id)?;
                let family = MediaFamily::from_type(kind)
                    .ok_or_else(|| ResolveError::UnsupportedMediaType(kind.to_string()))?;
                self.lookup_data_column(env, &family.address(), Some(value))
            }
            Provider::Unknown => {
                log::warn!(target: self.log_target, "⚠️ 未知文档提供方：{}", locator.authority());
                Err(ResolveError::UnknownProvider(locator.authority().to_string()))
            }
        }
    }

    /// 通用列查询：读取数据列，失败时走虚拟根目录回退。
    fn lookup_data_column(
        &self,
        env: &dyn ResolverEnv,
        address: &ContentAddress,
        row_filter: Option<&str>,
    ) -> Result<PathBuf, ResolveError> {
        let query = ContentQuery {
            address,
            column: &self.config.data_column,
            row_filter,
        };

        // 游标只活在这个 match 分支里，离开即释放。
        let outcome = match env.content_store().query(&query) {
            Ok(mut cursor) => cursor.first_string(),
            Err(err) => Err(err),
        };

        match outcome {
            Ok(Some(path)) if !path.is_empty() => {
                log::debug!(target: self.log_target, "✅ {} → {}", address, path);
                Ok(PathBuf::from(path))
            }
            Ok(_) => {
                log::debug!(target: self.log_target, "查询无结果：{}", address);
                self.fallback_from_address(address)
            }
            Err(err) => {
                log::warn!(target: self.log_target, "⚠️ 内容查询失败：{}", err);
                self.fallback_from_address(address)
            }
        }
    }

    fn fallback_from_address(&self, address: &ContentAddress) -> Result<PathBuf, ResolveError> {
        let path = address.path();
        let segment = self.config.virtual_root_segment.as_str();

        let stripped = match path.strip_prefix(segment) {
            Some(rest) if !segment.is_empty() && rest.starts_with('/') => rest,
            _ => return Err(ResolveError::NotFound(address.to_string())),
        };

        log::warn!(
            target: self.log_target,
            "↩️ 使用虚拟根目录回退：{} → {}",
            address,
            stripped
        );
        Ok(PathBuf::from(stripped))
    }
}

fn split_document_id(document_id: &str) -> Result<(&str, &str), ResolveError> {
    document_id
        .split_once(':')
        .ok_or_else(|| ResolveError::MalformedDocumentId(document_id.to_string()))
}

fn parse_row_id(document_id: &str) -> Result<i64, ResolveError> {
    match document_id.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ResolveError::InvalidRowId(document_id.to_string())),
    }
}
