//! # 转码错误模型
//!
//! ## 设计思路
//!
//! 单一错误枚举覆盖转码链路的所有致命失败，调用方可按分支匹配。
//! 预览图写入失败不在此列：它只记日志，不会中断主产物。

/// 图片转码错误。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TranscodeError {
    /// 尺寸探测失败（非图片、格式不支持、宽高未知或为 0）。
    #[error("无法识别图片：{0}")]
    UndecodableImage(String),

    /// 读取或完整解码失败（空输入、截断、数据损坏、I/O 错误）。
    #[error("图片解码失败：{0}")]
    DecodeFailed(String),

    #[error("资源限制：{0}")]
    ResourceLimit(String),

    #[error("配置错误：{0}")]
    InvalidConfig(String),
}
