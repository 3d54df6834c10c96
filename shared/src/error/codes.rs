//! Unified error codes
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 4xxx: Order errors
//! - 6xxx: Menu errors (categories, menu items, images)
//! - 7xxx: Table errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Serialized as a bare `u16` so the HTTP envelope stays language neutral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has no line items
    OrderEmpty = 4002,
    /// Status change not allowed by the lifecycle
    InvalidStatusTransition = 4003,
    /// Only cancelled orders may be deleted
    OrderNotCancelled = 4004,
    /// Menu prices changed since the cart was built
    PriceChanged = 4005,
    /// A line references a menu item that is not available
    MenuItemUnavailable = 4006,

    // ==================== 6xxx: Menu ====================
    /// Menu item not found
    MenuItemNotFound = 6001,
    /// Category not found
    CategoryNotFound = 6002,
    /// Category still has menu items
    CategoryHasItems = 6003,
    /// Menu item is referenced by order history
    MenuItemHasOrders = 6004,
    /// Price must be a positive amount
    InvalidPrice = 6005,
    /// Uploaded image exceeds the size limit
    ImageTooLarge = 6006,
    /// Uploaded image format is not supported
    UnsupportedImageFormat = 6007,

    // ==================== 7xxx: Table ====================
    /// Table not found
    TableNotFound = 7001,
    /// Table number already in use
    TableNumberTaken = 7002,
    /// Table is referenced by orders
    TableHasOrders = 7003,
    /// Table number must be a positive integer
    InvalidTableNumber = 7004,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Object storage error
    StorageError = 9003,
    /// Configuration error
    ConfigError = 9004,
}

impl ErrorCode {
    /// Numeric value of this code
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Default human-readable message
    pub fn message(&self) -> &'static str {
        match self {
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderEmpty => "Order must contain at least one item",
            ErrorCode::InvalidStatusTransition => "Order status change is not allowed",
            ErrorCode::OrderNotCancelled => "Only cancelled orders can be deleted",
            ErrorCode::PriceChanged => "Menu prices changed, please review your cart",
            ErrorCode::MenuItemUnavailable => "Menu item is not available",

            ErrorCode::MenuItemNotFound => "Menu item not found",
            ErrorCode::CategoryNotFound => "Category not found",
            ErrorCode::CategoryHasItems => "Category has menu items",
            ErrorCode::MenuItemHasOrders => {
                "Menu item has order history, toggle availability instead"
            }
            ErrorCode::InvalidPrice => "Price must be greater than zero",
            ErrorCode::ImageTooLarge => "Image is too large",
            ErrorCode::UnsupportedImageFormat => "Unsupported image format",

            ErrorCode::TableNotFound => "Table not found",
            ErrorCode::TableNumberTaken => "Table number already exists",
            ErrorCode::TableHasOrders => "Table has orders",
            ErrorCode::InvalidTableNumber => "Table number must be a positive integer",

            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::StorageError => "Storage error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code as u16
    }
}

/// Returned when a numeric value does not name an [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid error code: {0}")]
pub struct InvalidErrorCode(pub u16);

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderEmpty),
            4003 => Ok(ErrorCode::InvalidStatusTransition),
            4004 => Ok(ErrorCode::OrderNotCancelled),
            4005 => Ok(ErrorCode::PriceChanged),
            4006 => Ok(ErrorCode::MenuItemUnavailable),

            // Menu
            6001 => Ok(ErrorCode::MenuItemNotFound),
            6002 => Ok(ErrorCode::CategoryNotFound),
            6003 => Ok(ErrorCode::CategoryHasItems),
            6004 => Ok(ErrorCode::MenuItemHasOrders),
            6005 => Ok(ErrorCode::InvalidPrice),
            6006 => Ok(ErrorCode::ImageTooLarge),
            6007 => Ok(ErrorCode::UnsupportedImageFormat),

            // Table
            7001 => Ok(ErrorCode::TableNotFound),
            7002 => Ok(ErrorCode::TableNumberTaken),
            7003 => Ok(ErrorCode::TableHasOrders),
            7004 => Ok(ErrorCode::InvalidTableNumber),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::StorageError),
            9004 => Ok(ErrorCode::ConfigError),

            other => Err(InvalidErrorCode(other)),
        }
    }
}
