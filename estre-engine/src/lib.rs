//! Estre Engine - 家具配置器核心
//!
//! # 架构概述
//!
//! 配置器的计算核心与其周边设施：
//!
//! - **面料** (`fabric`): 面料目录、用量估算、面料费用
//! - **定价** (`pricing`): 统一的价格规则表 (目录驱动 / 固定价目)
//! - **配置器** (`configurator`): 依赖可见性与配置会话状态机
//! - **购物车** (`cart`): 价格冻结的购物车、redb 持久化、结账
//!
//! # 模块结构
//!
//! ```text
//! estre-engine/src/
//! ├── core/          # 配置、环境初始化
//! ├── utils/         # 日志、金额工具
//! ├── fabric/        # 面料目录与估算
//! ├── pricing/       # 价格规则引擎
//! ├── configurator/  # 配置会话
//! └── cart/          # 购物车与结账
//! ```
//!
//! Data flows one way: fabric catalog → estimator → price calculator →
//! configuration session → cart.

pub mod cart;
pub mod configurator;
pub mod core;
pub mod fabric;
pub mod pricing;
pub mod utils;

// Re-export 公共类型
pub use cart::{CartStorage, CartStore};
pub use configurator::{CategoryCatalog, ConfigurationSession, SessionState, is_visible};
pub use crate::core::{Config, setup_environment};
pub use fabric::{
    FabricCatalog, FabricCost, FabricRequirement, FabricYieldTable, aggregate_fabric_cost,
    estimate_fabric_meters, estimate_fabric_requirement,
};
pub use pricing::{PriceCalculator, PricingPolicy, RuleTable, calculate_price};
pub use utils::{AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{cleanup_old_logs, init_logger, init_logger_with_file};
