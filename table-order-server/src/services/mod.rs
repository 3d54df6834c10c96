//! 服务层
//!
//! - [`ImageStore`] - 菜品图片存储

pub mod image_store;

pub use image_store::{ImageStore, StoredImage};
