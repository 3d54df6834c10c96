//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::OrderNotFound
            | Self::MenuItemNotFound
            | Self::CategoryNotFound
            | Self::TableNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict: referential guards and lifecycle conflicts
            Self::AlreadyExists
            | Self::TableNumberTaken
            | Self::CategoryHasItems
            | Self::MenuItemHasOrders
            | Self::TableHasOrders
            | Self::InvalidStatusTransition
            | Self::OrderNotCancelled
            | Self::PriceChanged => StatusCode::CONFLICT,

            // 422 Unprocessable: well-formed but not orderable
            Self::OrderEmpty | Self::MenuItemUnavailable => StatusCode::UNPROCESSABLE_ENTITY,

            // 413 Payload Too Large
            Self::ImageTooLarge => StatusCode::PAYLOAD_TOO_LARGE,

            // 415 Unsupported Media Type
            Self::UnsupportedImageFormat => StatusCode::UNSUPPORTED_MEDIA_TYPE,

            // 400 Bad Request
            Self::ValidationFailed
            | Self::InvalidRequest
            | Self::InvalidFormat
            | Self::RequiredField
            | Self::ValueOutOfRange
            | Self::InvalidPrice
            | Self::InvalidTableNumber => StatusCode::BAD_REQUEST,

            // 500 Internal Server Error
            Self::Unknown
            | Self::InternalError
            | Self::DatabaseError
            | Self::StorageError
            | Self::ConfigError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
