//! Category REST API handlers

use crate::{
    ApiError, ApiResult, AppState, CategoryDto, CategoryListResponse, CategoryResponse,
    CreateCategoryRequest, UserId,
};

use bc_core::Category;

use axum::{Json, extract::State};

const MAX_CATEGORY_NAME_LENGTH: usize = 100;

/// GET /api/v1/categories
pub async fn list_categories(
    State(state): State<AppState>,
    UserId(user_id): UserId,
) -> ApiResult<Json<CategoryListResponse>> {
    let categories = state.contacts.find_categories(user_id).await?;

    Ok(Json(CategoryListResponse {
        categories: categories.into_iter().map(CategoryDto::from).collect(),
    }))
}

/// POST /api/v1/categories
pub async fn create_category(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Json(req): Json<CreateCategoryRequest>,
) -> ApiResult<Json<CategoryResponse>> {
    let name = req.name.trim();
    if name.is_empty() || name.chars().count() > MAX_CATEGORY_NAME_LENGTH {
        return Err(ApiError::validation(
            format!("Category name must be 1-{} characters", MAX_CATEGORY_NAME_LENGTH),
            Some("name"),
        ));
    }

    let category = Category::new(user_id, name);
    state.contacts.create_category(&category).await?;
    log::info!("Created category {} for owner {}", category.id, user_id);

    Ok(Json(CategoryResponse {
        category: category.into(),
    }))
}
