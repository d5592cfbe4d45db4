//! Unified error system for the Estre configurator
//!
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//!
//! # Error Code Ranges
//!
//! - 4xxx: Configuration errors
//! - 5xxx: Cart errors
//! - 6xxx: Catalog errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode};
//!
//! let err = AppError::new(ErrorCode::CartItemNotFound);
//!
//! let err = AppError::malformed_configuration("value for 'seats' must be a string")
//!     .with_detail("field", "seats");
//! assert_eq!(err.code, ErrorCode::MalformedConfiguration);
//! ```

mod category;
mod codes;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult};
