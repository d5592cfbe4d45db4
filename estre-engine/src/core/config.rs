use shared::error::{AppError, AppResult};
use std::path::PathBuf;

/// Fallback base price used before a sofa model has loaded
pub const DEFAULT_BASE_PRICE: f64 = 45000.0;

/// 引擎配置 - 配置器进程的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./.estre | 工作目录 |
/// | CART_DB_PATH | $WORK_DIR/cart.redb | 购物车数据库 |
/// | FABRIC_CATALOG_PATH | (内置数据) | 面料目录 JSON |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | (无) | 日志文件目录 |
/// | ENVIRONMENT | development | 运行环境 |
/// | DEFAULT_BASE_PRICE | 45000 | 未选型号时的基础价格 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/estre LOG_LEVEL=debug estre cart list
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储购物车数据库、日志等文件
    pub work_dir: PathBuf,
    /// 购物车 redb 文件路径
    pub cart_db_path: PathBuf,
    /// 面料目录 JSON 路径 (None = 内置数据)
    pub fabric_catalog_path: Option<PathBuf>,
    /// 日志级别
    pub log_level: String,
    /// 日志文件目录 (None = 仅控制台)
    pub log_dir: Option<String>,
    /// 运行环境: development | production
    pub environment: String,
    /// 未选型号时使用的基础价格
    pub default_base_price: f64,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值；`DEFAULT_BASE_PRICE` 不是非负数字时报错
    pub fn from_env() -> AppResult<Self> {
        let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "./.estre".into());
        let mut config = Self::defaults(work_dir);

        if let Ok(path) = std::env::var("CART_DB_PATH") {
            config.cart_db_path = PathBuf::from(path);
        }
        config.fabric_catalog_path = std::env::var("FABRIC_CATALOG_PATH").ok().map(PathBuf::from);
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.log_level = level;
        }
        config.log_dir = std::env::var("LOG_DIR").ok();
        if let Ok(environment) = std::env::var("ENVIRONMENT") {
            config.environment = environment;
        }
        if let Ok(raw) = std::env::var("DEFAULT_BASE_PRICE") {
            config.default_base_price = parse_base_price(&raw)?;
        }

        Ok(config)
    }

    /// 使用自定义工作目录, 其余取默认值 (不读取环境变量)
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<PathBuf>) -> Self {
        Self::defaults(work_dir)
    }

    fn defaults(work_dir: impl Into<PathBuf>) -> Self {
        let work_dir = work_dir.into();
        Self {
            cart_db_path: work_dir.join("cart.redb"),
            fabric_catalog_path: None,
            log_level: "info".into(),
            log_dir: None,
            environment: "development".into(),
            default_base_price: DEFAULT_BASE_PRICE,
            work_dir,
        }
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

fn parse_base_price(raw: &str) -> AppResult<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|price| price.is_finite() && *price >= 0.0)
        .ok_or_else(|| {
            AppError::config(format!(
                "DEFAULT_BASE_PRICE must be a non-negative number, got '{}'",
                raw
            ))
            .with_detail("variable", "DEFAULT_BASE_PRICE")
        })
}
