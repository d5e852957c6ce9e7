//! # SQLite 内容存储
//!
//! ## 职责
//! - 以 SQLite 表模拟宿主媒体库：集合注册表 + 行表（`_id`、`_data`）
//! - 实现 `ContentStore`，供解析器做通用列查询
//!
//! ## 错误语义
//! - 集合未注册：`QueryError::UnknownAddress`（解析器据此走回退）
//! - SQL 执行失败：`QueryError::Backend`
//! - 建库、写入失败：`AppError::Database`

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{Connection, OptionalExtension, params};

use super::{ContentAddress, ContentCursor, ContentQuery, ContentStore, MediaFamily, QueryError};
use crate::error::AppError;

/// 行表中的数据列。
pub const DATA_COLUMN: &str = "_data";

/// SQLite 内容存储。
pub struct SqliteContentStore {
    conn: Mutex<Connection>,
}

/// 已读取完毕的游标；语句句柄在 `query` 返回前就已释放。
struct SqliteCursor {
    value: Option<String>,
}

impl ContentCursor for SqliteCursor {
    fn first_string(&mut self) -> Result<Option<String>, QueryError> {
        Ok(self.value.take())
    }
}

impl SqliteContentStore {
    /// 打开（或创建）磁盘上的内容库。
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|e| {
            AppError::Database(format!("打开内容库 '{}' 失败: {}", path.display(), e))
        })?;
        log::info!("内容库路径: {}", path.display());
        Self::from_connection(conn)
    }

    /// 内存库，主要用于测试与一次性会话。
    pub fn open_in_memory() -> Result<Self, AppError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| AppError::Database(format!("打开内存内容库失败: {}", e)))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, AppError> {
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn with_conn<T>(&self, op: impl FnOnce(&Connection) -> Result<T, AppError>) -> Result<T, AppError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| AppError::Database(format!("获取内容库锁失败: {}", e)))?;
        op(&conn)
    }

    /// 注册下载与三类媒体集合。
    pub fn register_standard_collections(&self) -> Result<(), AppError> {
        self.register_collection(&ContentAddress::downloads())?;
        for family in [MediaFamily::Image, MediaFamily::Video, MediaFamily::Audio] {
            self.register_collection(&family.address())?;
        }
        Ok(())
    }

    /// 注册一个可查询集合（忽略地址上的行 ID）。
    pub fn register_collection(&self, address: &ContentAddress) -> Result<(), AppError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT OR IGNORE INTO content_collections (authority, collection) VALUES (?1, ?2)",
                params![address.authority(), address.collection()],
            )
            .map_err(|e| AppError::Database(format!("注册集合 {} 失败: {}", address, e)))?;
            Ok(())
        })
    }

    /// 写入一行；地址必须带行 ID，集合不存在时自动注册。
    pub fn insert_row(&self, address: &ContentAddress, data: &str) -> Result<(), AppError> {
        let row_id = address
            .row_id()
            .ok_or_else(|| AppError::Database(format!("写入行缺少行 ID: {}", address)))?;

        self.register_collection(address)?;
        self.with_conn(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO content_rows (authority, collection, _id, _data)
                 VALUES (?1, ?2, ?3, ?4)",
                params![address.authority(), address.collection(), row_id, data],
            )
            .map_err(|e| AppError::Database(format!("写入内容行 {} 失败: {}", address, e)))?;
            Ok(())
        })
    }

    fn query_first(&self, query: &ContentQuery<'_>) -> Result<Option<String>, QueryError> {
        if query.column != DATA_COLUMN {
            return Err(QueryError::Backend(format!("不支持的投影列：{}", query.column)));
        }

        let conn = self
            .conn
            .lock()
            .map_err(|e| QueryError::Backend(format!("获取内容库锁失败: {}", e)))?;
        let address = query.address;

        let registered = conn
            .query_row(
                "SELECT 1 FROM content_collections WHERE authority = ?1 AND collection = ?2",
                params![address.authority(), address.collection()],
                |_| Ok(()),
            )
            .optional()
            .map_err(|e| QueryError::Backend(e.to_string()))?;

        if registered.is_none() {
            return Err(QueryError::UnknownAddress(address.to_string()));
        }

        let mut stmt = conn
            .prepare_cached(
                "SELECT _data FROM content_rows
                 WHERE authority = ?1 AND collection = ?2
                   AND (?3 IS NULL OR _id = ?3)
                   AND (?4 IS NULL OR _id = ?4)
                 ORDER BY _id
                 LIMIT 1",
            )
            .map_err(|e| QueryError::Backend(e.to_string()))?;

        let value = stmt
            .query_row(
                params![address.authority(), address.collection(), address.row_id(), query.row_filter],
                |row| row.get::<_, Option<String>>(0),
            )
            .optional()
            .map_err(|e| QueryError::Backend(e.to_string()))?;

        Ok(value.flatten())
    }
}

impl ContentStore for SqliteContentStore {
    fn query<'s>(&'s self, query: &ContentQuery<'_>) -> Result<Box<dyn ContentCursor + 's>, QueryError> {
        let value = self.query_first(query)?;
        Ok(Box::new(SqliteCursor { value }))
    }
}

fn initialize_schema(conn: &Connection) -> Result<(), AppError> {
    conn.execute_batch(
        "PRAGMA foreign_keys=ON;
         CREATE TABLE IF NOT EXISTS content_collections (
            authority TEXT NOT NULL,
            collection TEXT NOT NULL,
            PRIMARY KEY (authority, collection)
         );
         CREATE TABLE IF NOT EXISTS content_rows (
            authority TEXT NOT NULL,
            collection TEXT NOT NULL,
            _id INTEGER NOT NULL,
            _data TEXT,
            PRIMARY KEY (authority, collection, _id),
            FOREIGN KEY (authority, collection)
                REFERENCES content_collections(authority, collection) ON DELETE CASCADE
         );",
    )
    .map_err(|e| AppError::Database(format!("创建内容库表失败: {}", e)))
}
