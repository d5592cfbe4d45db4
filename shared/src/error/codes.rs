//! Unified error codes for the Estre configurator
//!
//! Error codes are organized by category:
//! - 4xxx: Configuration errors
//! - 5xxx: Cart errors
//! - 6xxx: Catalog errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so the storefront layer can
/// switch on them without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 4xxx: Configuration ====================
    /// Configuration payload is structurally invalid
    MalformedConfiguration = 4001,
    /// A field holds a value of the wrong shape
    InvalidFieldValue = 4002,
    /// Attribute is not part of the active category
    UnknownAttribute = 4003,
    /// A save for this configuration is still in flight
    SaveInProgress = 4004,

    // ==================== 5xxx: Cart ====================
    /// Cart item not found
    CartItemNotFound = 5001,
    /// Cart is empty
    CartEmpty = 5002,
    /// Price is not a valid amount
    InvalidPrice = 5003,

    // ==================== 6xxx: Catalog ====================
    /// Sofa model not found
    ModelNotFound = 6001,
    /// Fabric code not found
    FabricNotFound = 6002,
    /// Catalog data could not be loaded
    CatalogLoadFailed = 6003,

    // ==================== 9xxx: System ====================
    /// Storage error
    StorageError = 9002,
    /// Configuration (environment) error
    ConfigError = 9003,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // Configuration
            ErrorCode::MalformedConfiguration => "Configuration is malformed",
            ErrorCode::InvalidFieldValue => "Invalid configuration field value",
            ErrorCode::UnknownAttribute => "Unknown configuration attribute",
            ErrorCode::SaveInProgress => "A save is already in progress",

            // Cart
            ErrorCode::CartItemNotFound => "Cart item not found",
            ErrorCode::CartEmpty => "Cart is empty",
            ErrorCode::InvalidPrice => "Invalid price",

            // Catalog
            ErrorCode::ModelNotFound => "Sofa model not found",
            ErrorCode::FabricNotFound => "Fabric not found",
            ErrorCode::CatalogLoadFailed => "Failed to load catalog data",

            // System
            ErrorCode::StorageError => "Storage error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // Configuration
            4001 => Ok(ErrorCode::MalformedConfiguration),
            4002 => Ok(ErrorCode::InvalidFieldValue),
            4003 => Ok(ErrorCode::UnknownAttribute),
            4004 => Ok(ErrorCode::SaveInProgress),

            // Cart
            5001 => Ok(ErrorCode::CartItemNotFound),
            5002 => Ok(ErrorCode::CartEmpty),
            5003 => Ok(ErrorCode::InvalidPrice),

            // Catalog
            6001 => Ok(ErrorCode::ModelNotFound),
            6002 => Ok(ErrorCode::FabricNotFound),
            6003 => Ok(ErrorCode::CatalogLoadFailed),

            // System
            9002 => Ok(ErrorCode::StorageError),
            9003 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
