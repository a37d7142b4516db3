// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

use axum::{
    extract::{Path, Query, State},
    Json,
};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;
use uuid::Uuid;

use crate::api::routes::{fetched, mutation, ApiResponse, DeleteQuery, Deleted, ListQuery, Toast};
use crate::api::AppState;
use crate::error::{AdminError, Result};
use crate::integrity::{ensure_no_dependents, DependentCheck};
use crate::models::service::{DirectoryOption, ServiceCategory, ServiceCategoryDraft};
use crate::schema::{service_categories, service_subcategories};
use crate::search::filter_rows;

const ENTITY: &str = "service_categories";
const DELETE_PROMPT: &str = "Are you sure you want to delete this category? This will also delete all subcategories and service providers.";

pub async fn fetch_categories(state: &AppState, query: &ListQuery) -> Result<Vec<ServiceCategory>> {
    let mut conn = state.db.get_connection().await?;

    let rows = service_categories::table
        .select(ServiceCategory::as_select())
        .order(service_categories::created_at.desc())
        .load::<ServiceCategory>(&mut conn)
        .await
        .map_err(AdminError::database("Failed to fetch categories"))?;

    Ok(filter_rows(rows, query.term()))
}

pub async fn list_categories(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<ServiceCategory>>>> {
    debug!("Listing service categories, search: {:?}", query.search);
    let rows = fetched(ENTITY, fetch_categories(&state, &query).await)?;
    Ok(Json(ApiResponse::success(rows)))
}

pub async fn category_options(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<DirectoryOption>>>> {
    let mut conn = state.db.get_connection().await?;

    let options = service_categories::table
        .select((
            service_categories::id,
            service_categories::name,
            service_categories::icon,
        ))
        .order(service_categories::name.asc())
        .load::<(Uuid, String, Option<String>)>(&mut conn)
        .await
        .map_err(AdminError::database("Failed to fetch categories"))?
        .into_iter()
        .map(|(id, name, icon)| DirectoryOption {
            id,
            name,
            icon,
            category: None,
        })
        .collect();

    Ok(Json(ApiResponse::success(options)))
}

/// Updates never touch `created_at`, so list order survives renames
pub async fn save_category(
    state: &AppState,
    editing: Option<Uuid>,
    draft: ServiceCategoryDraft,
) -> Result<ServiceCategory> {
    let changes = draft.into_changes()?;
    let mut conn = state.db.get_connection().await?;

    match editing {
        Some(id) => diesel::update(service_categories::table.find(id))
            .set(&changes)
            .returning(ServiceCategory::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(AdminError::database("Failed to save category"))?
            .ok_or_else(|| AdminError::NotFound("Category".to_string())),
        None => diesel::insert_into(service_categories::table)
            .values(&changes)
            .returning(ServiceCategory::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AdminError::database("Failed to save category")),
    }
}

pub async fn create_category(
    State(state): State<AppState>,
    Json(draft): Json<ServiceCategoryDraft>,
) -> Result<Json<ApiResponse<ServiceCategory>>> {
    let category = mutation(ENTITY, "create", save_category(&state, None, draft).await)?;
    Ok(Json(ApiResponse::with_toast(
        category,
        Toast::success("Category created successfully"),
    )))
}

pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(draft): Json<ServiceCategoryDraft>,
) -> Result<Json<ApiResponse<ServiceCategory>>> {
    let category = mutation(ENTITY, "update", save_category(&state, Some(id), draft).await)?;
    Ok(Json(ApiResponse::with_toast(
        category,
        Toast::success("Category updated successfully"),
    )))
}

async fn remove_category(state: &AppState, id: Uuid) -> Result<()> {
    let mut conn = state.db.get_connection().await?;

    let subcategory_count = service_subcategories::table
        .filter(service_subcategories::category_id.eq(id))
        .count()
        .get_result::<i64>(&mut conn)
        .await
        .map_err(AdminError::database("Failed to check category dependencies"))?;

    ensure_no_dependents(&[DependentCheck {
        table: "service_subcategories",
        count: subcategory_count,
        title: "Cannot Delete Category",
        message: "This category has subcategories and cannot be deleted. Please remove all subcategories first.",
    }])?;

    let deleted = diesel::delete(service_categories::table.find(id))
        .execute(&mut conn)
        .await
        .map_err(AdminError::database(
            "Failed to delete category. It might be referenced by other records.",
        ))?;
    if deleted == 0 {
        return Err(AdminError::NotFound("Category".to_string()));
    }
    Ok(())
}

pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(confirm): Query<DeleteQuery>,
) -> Result<Json<ApiResponse<Deleted>>> {
    confirm.require(DELETE_PROMPT)?;
    mutation(ENTITY, "delete", remove_category(&state, id).await)?;

    Ok(Json(ApiResponse::with_toast(
        Deleted { id },
        Toast::success("Category deleted successfully"),
    )))
}
