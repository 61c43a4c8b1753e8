//! `/api/users` handlers
//!
//! Field syntax is validated here; the store only enforces id existence and
//! email uniqueness.

use actix_web::{web, HttpResponse};
use serde_json::json;
use user_directory_app::AppState;
use user_directory_core::schema::{validate_user_form, USER_FIELDS};
use user_directory_core::types::UserFormData;

use crate::error::ApiError;

/// 列出所有用户
#[tracing_attributes::instrument(skip(state))]
pub async fn list_users(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let users = state
        .user_service
        .list_users()
        .await
        .map_err(|e| ApiError::from_core(e, "Failed to fetch users"))?;
    Ok(HttpResponse::Ok().json(users))
}

/// 创建用户
#[tracing_attributes::instrument(skip(state, body))]
pub async fn create_user(
    state: web::Data<AppState>,
    body: web::Json<UserFormData>,
) -> Result<HttpResponse, ApiError> {
    let form = body.into_inner();
    validate_user_form(&form).map_err(ApiError::Validation)?;

    let user = state
        .user_service
        .create_user(form)
        .await
        .map_err(|e| ApiError::from_core(e, "Failed to create user"))?;
    Ok(HttpResponse::Created().json(user))
}

/// 获取单个用户
#[tracing_attributes::instrument(skip(state))]
pub async fn get_user(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let user = state
        .user_service
        .get_user(&id)
        .await
        .map_err(|e| ApiError::from_core(e, "Failed to fetch user"))?
        .ok_or(ApiError::NotFound)?;
    Ok(HttpResponse::Ok().json(user))
}

/// 更新用户（完整替换）
#[tracing_attributes::instrument(skip(state, body))]
pub async fn update_user(
    state: web::Data<AppState>,
    id: web::Path<String>,
    body: web::Json<UserFormData>,
) -> Result<HttpResponse, ApiError> {
    let form = body.into_inner();
    validate_user_form(&form).map_err(ApiError::Validation)?;

    let user = state
        .user_service
        .update_user(&id, form)
        .await
        .map_err(|e| ApiError::from_core(e, "Failed to update user"))?;
    Ok(HttpResponse::Ok().json(user))
}

/// 删除用户
#[tracing_attributes::instrument(skip(state))]
pub async fn delete_user(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    state
        .user_service
        .delete_user(&id)
        .await
        .map_err(|e| ApiError::from_core(e, "Failed to delete user"))?;
    Ok(HttpResponse::Ok().json(json!({ "message": "User deleted successfully" })))
}

/// Field constraint table for form generation
pub async fn list_fields() -> HttpResponse {
    HttpResponse::Ok().json(&USER_FIELDS)
}
