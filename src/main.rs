//! # 表盘图片桥接：命令行入口
//!
//! 本文件只负责参数解析、日志初始化与组件装配，业务逻辑见 `lib.rs` 架构文档。

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use wear_image_bridge::error::AppError;
use wear_image_bridge::locator::{
    ContentStore, DeviceEnv, NoContentStore, ResourceLocator, SqliteContentStore,
};
use wear_image_bridge::service::ImageBridge;
use wear_image_bridge::settings::{load_settings_from_path, BridgeSettings};
use wear_image_bridge::transcoder::ResampleQuality;

/// 把内容定位转成表盘设备可绘制的二进制像素转储。
#[derive(Debug, Parser)]
#[command(name = "wear-image-bridge", version, about)]
struct Cli {
    /// 内容定位（content://、file://）或本地路径
    locator: String,

    /// 输出正方形边长
    #[arg(long)]
    target_size: Option<u32>,

    /// 外部存储根目录
    #[arg(long)]
    external_root: Option<PathBuf>,

    /// 应用私有文件目录
    #[arg(long)]
    files_dir: Option<PathBuf>,

    /// 媒体库 SQLite 文件
    #[arg(long)]
    media_db: Option<PathBuf>,

    /// JSON 设置文件
    #[arg(long)]
    settings: Option<PathBuf>,

    /// 缩放档位：quality / balanced / speed
    #[arg(long)]
    quality: Option<ResampleQuality>,

    /// 不写预览图
    #[arg(long)]
    no_preview: bool,
}

impl Cli {
    fn settings(&self) -> BridgeSettings {
        let mut settings = self
            .settings
            .as_deref()
            .map(load_settings_from_path)
            .unwrap_or_default();

        if let Some(target_size) = self.target_size {
            settings.target_size = target_size;
        }
        if let Some(root) = &self.external_root {
            settings.external_root = Some(root.clone());
        }
        if let Some(dir) = &self.files_dir {
            settings.app_files_dir = dir.clone();
        }
        if let Some(db) = &self.media_db {
            settings.media_db = Some(db.clone());
        }
        if let Some(quality) = self.quality {
            settings.resample_quality = quality;
        }
        if self.no_preview {
            settings.write_preview = false;
        }
        settings
    }

    fn locator(&self) -> Result<ResourceLocator, AppError> {
        if self.locator.contains("://") {
            Ok(ResourceLocator::parse(&self.locator)?)
        } else {
            Ok(ResourceLocator::file(self.locator.as_str()))
        }
    }
}

fn run(cli: &Cli) -> Result<(), AppError> {
    let settings = cli.settings();
    let locator = cli.locator()?;

    let store: Box<dyn ContentStore> = match &settings.media_db {
        Some(path) => Box::new(SqliteContentStore::open(path)?),
        None => Box::new(NoContentStore),
    };
    let env = match &settings.external_root {
        Some(root) => DeviceEnv::new(root.clone(), store),
        None => DeviceEnv::without_external_storage(store),
    };
    let bridge = ImageBridge::from_settings(&settings, env);

    let payload = bridge.prepare_payload(&locator)?;

    println!("bin: {}", payload.bin_path.display());
    match &payload.preview_path {
        Some(path) => println!("preview: {}", path.display()),
        None => println!("preview: -"),
    }
    println!("bytes: {}", payload.dump.len());
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("❌ {}", err);
            ExitCode::FAILURE
        }
    }
}
