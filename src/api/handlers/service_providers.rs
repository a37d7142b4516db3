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
use crate::integrity::{ensure_no_dependents, DependentCheck};
use crate::models::service::{
    ProviderWithDirectory, ServiceCategory, ServiceProvider, ServiceProviderDraft,
    ServiceSubcategory,
};
use crate::schema::{service_categories, service_providers, service_stats, service_subcategories};
use crate::search::filter_rows;

const ENTITY: &str = "service_providers";
const DELETE_PROMPT: &str = "Are you sure you want to delete this service provider?";

pub async fn fetch_providers(
    state: &AppState,
    query: &ListQuery,
) -> Result<Vec<ProviderWithDirectory>> {
    let mut conn = state.db.get_connection().await?;

    let rows = service_providers::table
        .inner_join(service_subcategories::table.inner_join(service_categories::table))
        .select((
            ServiceProvider::as_select(),
            ServiceSubcategory::as_select(),
            ServiceCategory::as_select(),
        ))
        .order(service_providers::created_at.desc())
        .load::<(ServiceProvider, ServiceSubcategory, ServiceCategory)>(&mut conn)
        .await
        .map_err(AdminError::database("Failed to fetch data"))?;

    let subcategory_filter = parent_filter(query.subcategory_id.as_deref());
    let providers = rows
        .into_iter()
        .filter(|(provider, _, _)| {
            subcategory_filter.map_or(true, |id| provider.subcategory_id == id)
        })
        .map(|(provider, subcategory, category)| ProviderWithDirectory {
            provider,
            subcategory,
            category,
        })
        .collect();
    Ok(filter_rows(providers, query.term()))
}

pub async fn list_providers(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<ProviderWithDirectory>>>> {
    debug!(
        "Listing service providers, search: {:?}, subcategory: {:?}",
        query.search, query.subcategory_id
    );
    let rows = fetched(ENTITY, fetch_providers(&state, &query).await)?;
    Ok(Json(ApiResponse::success(rows)))
}

pub async fn save_provider(
    state: &AppState,
    editing: Option<Uuid>,
    draft: ServiceProviderDraft,
) -> Result<ServiceProvider> {
    let changes = draft.into_changes()?;
    let mut conn = state.db.get_connection().await?;

    match editing {
        Some(id) => diesel::update(service_providers::table.find(id))
            .set(&changes)
            .returning(ServiceProvider::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(AdminError::database("Failed to save service provider"))?
            .ok_or_else(|| AdminError::NotFound("Service provider".to_string())),
        None => diesel::insert_into(service_providers::table)
            .values(&changes)
            .returning(ServiceProvider::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AdminError::database("Failed to save service provider")),
    }
}

pub async fn create_provider(
    State(state): State<AppState>,
    Json(draft): Json<ServiceProviderDraft>,
) -> Result<Json<ApiResponse<ServiceProvider>>> {
    let provider = mutation(ENTITY, "create", save_provider(&state, None, draft).await)?;
    Ok(Json(ApiResponse::with_toast(
        provider,
        Toast::success("Service provider created successfully"),
    )))
}

pub async fn update_provider(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(draft): Json<ServiceProviderDraft>,
) -> Result<Json<ApiResponse<ServiceProvider>>> {
    let provider = mutation(ENTITY, "update", save_provider(&state, Some(id), draft).await)?;
    Ok(Json(ApiResponse::with_toast(
        provider,
        Toast::success("Service provider updated successfully"),
    )))
}

async fn remove_provider(state: &AppState, id: Uuid) -> Result<()> {
    let mut conn = state.db.get_connection().await?;

    let stat_count = service_stats::table
        .filter(service_stats::service_provider_id.eq(id))
        .count()
        .get_result::<i64>(&mut conn)
        .await
        .map_err(AdminError::database("Failed to check service provider usage"))?;

    ensure_no_dependents(&[DependentCheck {
        table: "service_stats",
        count: stat_count,
        title: "Cannot Delete Service Provider",
        message: "This service provider has usage statistics and cannot be deleted. You can edit it instead.",
    }])?;

    let deleted = diesel::delete(service_providers::table.find(id))
        .execute(&mut conn)
        .await
        .map_err(AdminError::database(
            "Failed to delete service provider. It might be referenced by other records.",
        ))?;
    if deleted == 0 {
        return Err(AdminError::NotFound("Service provider".to_string()));
    }
    Ok(())
}

pub async fn delete_provider(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(confirm): Query<DeleteQuery>,
) -> Result<Json<ApiResponse<Deleted>>> {
    confirm.require(DELETE_PROMPT)?;
    mutation(ENTITY, "delete", remove_provider(&state, id).await)?;

    Ok(Json(ApiResponse::with_toast(
        Deleted { id },
        Toast::success("Service provider deleted successfully"),
    )))
}
