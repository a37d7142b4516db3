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

use crate::api::routes::{
    fetched, mutation, parent_filter, ApiResponse, DeleteQuery, Deleted, ListQuery, Toast,
};
use crate::api::AppState;
use crate::error::{AdminError, Result};
use crate::integrity::map_delete_error;
use crate::models::service::{
    DirectoryOption, ServiceCategory, ServiceSubcategory, ServiceSubcategoryDraft,
    SubcategoryWithCategory,
};
use crate::schema::{service_categories, service_subcategories};
use crate::search::filter_rows;

const ENTITY: &str = "service_subcategories";
const DELETE_PROMPT: &str = "Are you sure you want to delete this subcategory? This will also delete all service providers.";

pub async fn fetch_subcategories(
    state: &AppState,
    query: &ListQuery,
) -> Result<Vec<SubcategoryWithCategory>> {
    let mut conn = state.db.get_connection().await?;

    let rows = service_subcategories::table
        .inner_join(service_categories::table)
        .select((ServiceSubcategory::as_select(), ServiceCategory::as_select()))
        .order(service_subcategories::created_at.desc())
        .load::<(ServiceSubcategory, ServiceCategory)>(&mut conn)
        .await
        .map_err(AdminError::database("Failed to fetch data"))?;

    let category_filter = parent_filter(query.category_id.as_deref());
    let subcategories = rows
        .into_iter()
        .filter(|(subcategory, _)| {
            category_filter.map_or(true, |id| subcategory.category_id == id)
        })
        .map(|(subcategory, category)| SubcategoryWithCategory {
            subcategory,
            category,
        })
        .collect();
    Ok(filter_rows(subcategories, query.term()))
}

pub async fn list_subcategories(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<SubcategoryWithCategory>>>> {
    debug!(
        "Listing service subcategories, search: {:?}, category: {:?}",
        query.search, query.category_id
    );
    let rows = fetched(ENTITY, fetch_subcategories(&state, &query).await)?;
    Ok(Json(ApiResponse::success(rows)))
}

/// Subcategories with their category name, for the provider form
pub async fn subcategory_options(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<DirectoryOption>>>> {
    let mut conn = state.db.get_connection().await?;

    let options = service_subcategories::table
        .inner_join(service_categories::table)
        .select((
            service_subcategories::id,
            service_subcategories::name,
            service_subcategories::icon,
            service_categories::name,
        ))
        .order(service_subcategories::name.asc())
        .load::<(Uuid, String, Option<String>, String)>(&mut conn)
        .await
        .map_err(AdminError::database("Failed to fetch data"))?
        .into_iter()
        .map(|(id, name, icon, category)| DirectoryOption {
            id,
            name,
            icon,
            category: Some(category),
        })
        .collect();

    Ok(Json(ApiResponse::success(options)))
}

pub async fn save_subcategory(
    state: &AppState,
    editing: Option<Uuid>,
    draft: ServiceSubcategoryDraft,
) -> Result<ServiceSubcategory> {
    let changes = draft.into_changes()?;
    let mut conn = state.db.get_connection().await?;

    match editing {
        Some(id) => diesel::update(service_subcategories::table.find(id))
            .set(&changes)
            .returning(ServiceSubcategory::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(AdminError::database("Failed to save subcategory"))?
            .ok_or_else(|| AdminError::NotFound("Subcategory".to_string())),
        None => diesel::insert_into(service_subcategories::table)
            .values(&changes)
            .returning(ServiceSubcategory::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AdminError::database("Failed to save subcategory")),
    }
}

pub async fn create_subcategory(
    State(state): State<AppState>,
    Json(draft): Json<ServiceSubcategoryDraft>,
) -> Result<Json<ApiResponse<ServiceSubcategory>>> {
    let row = mutation(ENTITY, "create", save_subcategory(&state, None, draft).await)?;
    Ok(Json(ApiResponse::with_toast(
        row,
        Toast::success("Subcategory created successfully"),
    )))
}

pub async fn update_subcategory(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(draft): Json<ServiceSubcategoryDraft>,
) -> Result<Json<ApiResponse<ServiceSubcategory>>> {
    let row = mutation(ENTITY, "update", save_subcategory(&state, Some(id), draft).await)?;
    Ok(Json(ApiResponse::with_toast(
        row,
        Toast::success("Subcategory updated successfully"),
    )))
}

async fn remove_subcategory(state: &AppState, id: Uuid) -> Result<()> {
    let mut conn = state.db.get_connection().await?;

    let deleted = diesel::delete(service_subcategories::table.find(id))
        .execute(&mut conn)
        .await
        .map_err(|e| {
            map_delete_error(
                e,
                "Cannot Delete Subcategory",
                "This subcategory has service providers and cannot be deleted. Please remove all service providers first.",
                "Failed to delete subcategory",
            )
        })?;
    if deleted == 0 {
        return Err(AdminError::NotFound("Subcategory".to_string()));
    }
    Ok(())
}

pub async fn delete_subcategory(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(confirm): Query<DeleteQuery>,
) -> Result<Json<ApiResponse<Deleted>>> {
    confirm.require(DELETE_PROMPT)?;
    mutation(ENTITY, "delete", remove_subcategory(&state, id).await)?;

    Ok(Json(ApiResponse::with_toast(
        Deleted { id },
        Toast::success("Subcategory deleted successfully"),
    )))
}
