//! # 定位解析错误模型
//!
//! ## 设计思路
//!
//! 每一种解析失败对应一个可匹配的分支，调用方（UI 层）据此决定提示文案，
//! 本模块只负责“可区分的错误类型”，不负责最终展示。
//! 所有分支都是可恢复的：解析失败不会终止进程，只会让上层放弃本次发送。

/// 资源定位解析错误。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("不支持的 scheme：{0}")]
    UnsupportedScheme(String),

    #[error("未知的内容提供方：{0}")]
    UnknownProvider(String),

    #[error("不支持的文档类型：{0}")]
    UnsupportedDocumentType(String),

    #[error("不支持的媒体类型：{0}")]
    UnsupportedMediaType(String),

    #[error("文档 ID 格式错误：{0}")]
    MalformedDocumentId(String),

    #[error("无效的行 ID：{0}")]
    InvalidRowId(String),

    #[error("未找到资源对应的文件路径：{0}")]
    NotFound(String),

    #[error("定位字符串格式错误：{0}")]
    MalformedLocator(String),

    /// 外部存储未挂载，`primary:` 文档没有可拼接的根目录。
    #[error("外部存储不可用：{0}")]
    ExternalStorageUnavailable(String),
}

/// 内容存储查询错误。
///
/// 查询失败不会直接暴露给调用方，解析器会先尝试路径回退，
/// 回退失败后统一映射为 [`ResolveError::NotFound`]。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// 存储拒绝该地址（未注册的集合、无法识别的 authority）。
    #[error("内容地址不可查询：{0}")]
    UnknownAddress(String),

    /// 底层存储故障。
    #[error("内容存储查询失败：{0}")]
    Backend(String),
}
