//! 核心模块 - 配置与环境初始化

pub mod config;

pub use config::{Config, DEFAULT_BASE_PRICE};

/// 设置环境 (dotenv, 工作目录, 日志)
///
/// Loads `.env` if present, makes sure the work directory exists and
/// initializes logging from the resulting [`Config`].
pub fn setup_environment() -> anyhow::Result<Config> {
    // .env 文件是可选的
    let _ = dotenv::dotenv();

    let config = Config::from_env()?;
    std::fs::create_dir_all(&config.work_dir)?;

    crate::utils::logger::init_logger_with_file(
        &config.log_level,
        config.is_production(),
        config.log_dir.as_deref(),
    )?;

    if let Some(dir) = config.log_dir.as_deref()
        && let Err(e) = crate::utils::logger::cleanup_old_logs(std::path::Path::new(dir))
    {
        tracing::warn!(error = %e, "Failed to clean up old log files");
    }

    Ok(config)
}
