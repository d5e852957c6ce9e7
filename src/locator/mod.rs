//! # 资源定位解析模块（locator）
//!
//! ## 设计思路
//!
//! 平台选择器/相机只给出一个不透明的内容定位，本模块负责把它变成可读取的绝对路径。
//! 按职责拆分：
//!
//! - `model`：定位三元组、内容地址、媒体地址族
//! - `config`：提供方 authority 与回退策略配置
//! - `env`：解析环境（外部存储根目录 + 内容存储）与游标抽象
//! - `resolver`：按提供方分派的解析流程
//! - `sqlite_store`：基于 SQLite 的内容存储实现
//! - `error`：解析错误与查询错误
//!
//! ## 调用链
//!
//! ```text
//! ResourceLocator::parse(uri)
//!    ↓
//! LocatorResolver::resolve(locator, env)
//!    ├─ 文档：外部存储 / 下载 / 媒体
//!    ├─ 普通 content：通用列查询 → 虚拟根目录回退
//!    └─ file：原样返回
//!    ↓
//! PathBuf 或 ResolveError
//! ```

mod config;
mod env;
mod error;
mod model;
mod resolver;
mod sqlite_store;

pub use config::{
    ResolverConfig, DOWNLOADS_DOCUMENTS_AUTHORITY, EXTERNAL_STORAGE_AUTHORITY,
    MEDIA_DOCUMENTS_AUTHORITY,
};
pub use env::{ContentCursor, ContentQuery, ContentStore, DeviceEnv, NoContentStore, ResolverEnv};
pub use error::{QueryError, ResolveError};
pub use model::{
    ContentAddress, MediaFamily, ResourceLocator, Scheme, DOWNLOADS_AUTHORITY,
    DOWNLOADS_COLLECTION, MEDIA_AUTHORITY,
};
pub use resolver::{LocatorResolver, RESOLVER_LOG_TARGET};
pub use sqlite_store::{SqliteContentStore, DATA_COLUMN};
