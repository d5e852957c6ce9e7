//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 各子模块各自定义细粒度错误（`ResolveError`、`TranscodeError`、`PixelDumpError`），
//! 应用层用 `AppError` 汇总，调用方只需处理一种类型。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 子模块错误通过 `#[from]` 自动转换，`?` 即可向上传播。

use crate::locator::ResolveError;
use crate::transcoder::{PixelDumpError, TranscodeError};

/// 应用级统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 内容定位无法解析为路径
    #[error("{0}")]
    Resolve(#[from] ResolveError),

    /// 转码流水线错误（探测 / 解码 / 资源限制）
    #[error("{0}")]
    Transcode(#[from] TranscodeError),

    /// 对端数据格式错误
    #[error("{0}")]
    PixelDump(#[from] PixelDumpError),

    /// 文件系统 I/O 错误
    #[error("文件系统错误: {0}")]
    Io(#[from] std::io::Error),

    /// 存储目录不可用
    #[error("存储目录不可用: {0}")]
    Storage(String),

    /// 数据库操作失败
    #[error("数据库错误: {0}")]
    Database(String),
}
