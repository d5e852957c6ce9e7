//! # 解析环境
//!
//! ## 设计思路
//!
//! 解析器不直接依赖平台 API，而是通过 `ResolverEnv` 获取两样东西：
//! - 外部存储根目录（`primary:` 文档拼接路径用）
//! - 内容存储（按内容地址查询 `_data` 列）
//!
//! 游标通过 `Box<dyn ContentCursor>` 交给调用方，离开作用域即由 `Drop` 释放，
//! 成功、失败、回退三条路径都不需要手动关闭。

use std::path::{Path, PathBuf};

use super::{ContentAddress, QueryError};

/// 单列查询请求。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentQuery<'a> {
    /// 查询目标地址。
    pub address: &'a ContentAddress,
    /// 投影列名（固定为数据列）。
    pub column: &'a str,
    /// 可选的行 ID 相等过滤（`_id = ?`）。
    pub row_filter: Option<&'a str>,
}

/// 查询游标。
///
/// 实现方应在 `Drop` 中释放底层句柄。
pub trait ContentCursor {
    /// 读取第一行的投影列；没有行或列为空时返回 `Ok(None)`。
    fn first_string(&mut self) -> Result<Option<String>, QueryError>;
}

/// 内容寻址的数据存储。
pub trait ContentStore {
    /// 打开查询游标；地址不可查询时返回 [`QueryError::UnknownAddress`]。
    fn query<'s>(&'s self, query: &ContentQuery<'_>) -> Result<Box<dyn ContentCursor + 's>, QueryError>;
}

/// 解析器运行环境。
pub trait ResolverEnv {
    /// 外部存储根目录；未挂载时为 `None`。
    fn external_storage_root(&self) -> Option<&Path>;
    fn content_store(&self) -> &dyn ContentStore;
}

/// 默认环境：外部存储根目录（可能未挂载）+ 任意内容存储。
pub struct DeviceEnv<S> {
    external_root: Option<PathBuf>,
    store: S,
}

impl<S: ContentStore> DeviceEnv<S> {
    pub fn new(external_root: impl Into<PathBuf>, store: S) -> Self {
        Self {
            external_root: Some(external_root.into()),
            store,
        }
    }

    /// 外部存储未挂载的环境，`primary:` 文档将无法解析。
    pub fn without_external_storage(store: S) -> Self {
        Self {
            external_root: None,
            store,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: ContentStore> ResolverEnv for DeviceEnv<S> {
    fn external_storage_root(&self) -> Option<&Path> {
        self.external_root.as_deref()
    }

    fn content_store(&self) -> &dyn ContentStore {
        &self.store
    }
}

/// 空内容存储：拒绝所有地址。
///
/// 用于只处理 `file://`、`raw:` 与 `primary:` 的场景（例如命令行未提供媒体库）。
#[derive(Debug, Default, Clone, Copy)]
pub struct NoContentStore;

impl ContentStore for NoContentStore {
    fn query<'s>(&'s self, query: &ContentQuery<'_>) -> Result<Box<dyn ContentCursor + 's>, QueryError> {
        Err(QueryError::UnknownAddress(query.address.to_string()))
    }
}

impl<T: ContentStore + ?Sized> ContentStore for Box<T> {
    fn query<'s>(&'s self, query: &ContentQuery<'_>) -> Result<Box<dyn ContentCursor + 's>, QueryError> {
        (**self).query(query)
    }
}
