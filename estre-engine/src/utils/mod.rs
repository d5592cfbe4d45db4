//! 工具模块 - 通用工具函数和类型
//!
//! # 内容
//!
//! - [`AppError`] - 应用错误类型 (from shared::error)
//! - [`money`] - Decimal 金额/米数换算与格式化
//! - [`logger`] - 日志初始化

pub mod logger;
pub mod money;

pub use money::{ceil_meters, format_inr, round_price, to_decimal, to_f64};
pub use shared::error::{AppError, AppResult, ErrorCategory, ErrorCode};
