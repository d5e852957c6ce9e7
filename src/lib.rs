//! # 表盘图片桥接：库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │        宿主（选择器 / 相机 / 传输层，均在本库之外）        │
//! │            ↓ 内容定位                 ↑ .bin 字节          │
//! └────────────┼──────────────────────────┼──────────────────┘
//! ┌────────────┼──────────────────────────┼──────────────────┐
//! │            ↓          库 (Rust)       │                  │
//! │                                                          │
//! │  ┌─ service ──── ImageBridge 端到端编排                   │
//! │  │                                                       │
//! │  ├─ locator ──── 定位 → 绝对路径                          │
//! │  │   ├─ resolver       按提供方分派 + 虚拟根目录回退       │
//! │  │   └─ sqlite_store   媒体库查询 (rusqlite)              │
//! │  │                                                       │
//! │  ├─ transcoder ─ 探测·解码·居中裁剪·二进制编码·预览图      │
//! │  ├─ storage      Pictures 目录与时间戳文件名               │
//! │  ├─ settings     JSON 设置（缺失/损坏回退默认）             │
//! │  └─ error ────── AppError (统一错误类型)                  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `AppError` |
//! | [`locator`] | 内容定位解析为文件路径 |
//! | [`transcoder`] | 图片转为 `8 + 4·w·h` 字节的像素转储 |
//! | [`storage`] | 产物目录的获取与自动创建 |
//! | [`settings`] | 设置文件读写 |
//! | [`service`] | 解析 + 转码 + 落盘的端到端入口 |

pub mod error;
pub mod locator;
pub mod service;
pub mod settings;
pub mod storage;
pub mod transcoder;
