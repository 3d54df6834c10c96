//! Menu Item API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::models::{MenuItem, MenuItemCreate, MenuItemQuery, MenuItemUpdate, MenuItemWithCategory};

use crate::core::{ServerState, ServiceResult};
use crate::db::repository::menu_item;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_URL_LEN, normalize_allergens, validate_optional_text,
    validate_price, validate_required_text,
};

/// GET /api/menu-items - 获取菜品 (可按 category_id / available_only 筛选)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<MenuItemQuery>,
) -> ServiceResult<Json<Vec<MenuItemWithCategory>>> {
    let items = menu_item::find_all(&state.pool, &query).await?;
    Ok(Json(items))
}

/// GET /api/menu-items/{id} - 获取单个菜品
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> ServiceResult<Json<MenuItem>> {
    let item = menu_item::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| menu_item::not_found(id))?;
    Ok(Json(item))
}

/// POST /api/menu-items - 创建菜品
pub async fn create(
    State(state): State<ServerState>,
    Json(mut payload): Json<MenuItemCreate>,
) -> ServiceResult<Json<MenuItem>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.image_url, "image_url", MAX_URL_LEN)?;
    validate_price(payload.price)?;
    payload.allergens = Some(normalize_allergens(payload.allergens.unwrap_or_default())?);

    let item = menu_item::create(&state.pool, payload).await?;
    tracing::info!(menu_item_id = item.id, name = %item.name, price = item.price, "Menu item created");
    Ok(Json(item))
}

/// PUT /api/menu-items/{id} - 更新菜品
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(mut payload): Json<MenuItemUpdate>,
) -> ServiceResult<Json<MenuItem>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.image_url, "image_url", MAX_URL_LEN)?;
    if let Some(price) = payload.price {
        validate_price(price)?;
    }
    if let Some(tags) = payload.allergens.take() {
        payload.allergens = Some(normalize_allergens(tags)?);
    }

    let item = menu_item::update(&state.pool, id, payload).await?;
    Ok(Json(item))
}

/// POST /api/menu-items/{id}/toggle-availability - 切换供应状态
pub async fn toggle_availability(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> ServiceResult<Json<MenuItem>> {
    let item = menu_item::toggle_availability(&state.pool, id).await?;
    tracing::info!(menu_item_id = id, is_available = item.is_available, "Availability toggled");
    Ok(Json(item))
}

/// DELETE /api/menu-items/{id} - 删除菜品 (有订单记录时拒绝)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> ServiceResult<Json<bool>> {
    let item = menu_item::delete(&state.pool, id).await?;
    if let Some(url) = item.image_url.as_deref() {
        state.images.delete_by_url(url).await;
    }
    tracing::info!(menu_item_id = id, "Menu item deleted");
    Ok(Json(true))
}
