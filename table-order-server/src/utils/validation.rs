//! Input validation helpers
//!
//! Text length limits and field checks shared by the CRUD handlers.
//! SQLite TEXT has no built-in length enforcement.

use shared::error::{AppError, ErrorCode};

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: category, menu item
pub const MAX_NAME_LEN: usize = 200;

/// Descriptions, special requests
pub const MAX_NOTE_LEN: usize = 500;

/// URLs / image paths
pub const MAX_URL_LEN: usize = 2048;

/// Allergen tags per item
pub const MAX_ALLERGENS: usize = 30;

/// Lines per order
pub const MAX_ORDER_LINES: usize = 100;

/// Upper bound for a menu price, in yen
pub const MAX_PRICE: i64 = 10_000_000;

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.chars().count() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.chars().count()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.chars().count() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.chars().count()
        )));
    }
    Ok(())
}

/// Prices are whole yen, strictly positive and at most [`MAX_PRICE`]
pub fn validate_price(price: i64) -> Result<(), AppError> {
    if price <= 0 {
        return Err(
            AppError::with_message(ErrorCode::InvalidPrice, format!("Price must be positive, got {price}"))
                .with_detail("price", price),
        );
    }
    if price > MAX_PRICE {
        return Err(AppError::with_message(
            ErrorCode::InvalidPrice,
            format!("Price {price} exceeds {MAX_PRICE}"),
        )
        .with_detail("price", price));
    }
    Ok(())
}

pub fn validate_table_number(table_number: i32) -> Result<(), AppError> {
    if table_number < 1 {
        return Err(AppError::with_message(
            ErrorCode::InvalidTableNumber,
            format!("Table number must be at least 1, got {table_number}"),
        )
        .with_detail("table_number", table_number));
    }
    Ok(())
}

/// Trim, drop empty and duplicate tags, keep first-seen order
pub fn normalize_allergens(tags: Vec<String>) -> Result<Vec<String>, AppError> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if tag.is_empty() || out.iter().any(|t| t == tag) {
            continue;
        }
        validate_required_text(tag, "allergen", MAX_NAME_LEN)?;
        out.push(tag.to_string());
    }
    if out.len() > MAX_ALLERGENS {
        return Err(AppError::validation(format!(
            "Too many allergens ({}, max {MAX_ALLERGENS})",
            out.len()
        )));
    }
    Ok(out)
}
