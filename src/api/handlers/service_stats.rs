// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::api::routes::{fetched, ApiResponse};
use crate::api::AppState;
use crate::error::{AdminError, Result};
use crate::schema::{service_categories, service_providers, service_stats, service_subcategories};
use crate::stats::{aggregate_usage, AccessRecord, ProviderCategory, UsageReport};

const ENTITY: &str = "service_stats";

type AccessRow = (Uuid, Option<Uuid>, DateTime<Utc>, String, String, String);

/// Access log rolled up per provider and per category
pub async fn fetch_usage_report(state: &AppState) -> Result<UsageReport> {
    let mut conn = state.db.get_connection().await?;

    let rows = service_stats::table
        .inner_join(
            service_providers::table
                .inner_join(service_subcategories::table.inner_join(service_categories::table)),
        )
        .select((
            service_stats::service_provider_id,
            service_stats::user_id,
            service_stats::accessed_at,
            service_providers::name,
            service_subcategories::name,
            service_categories::name,
        ))
        .load::<AccessRow>(&mut conn)
        .await
        .map_err(AdminError::database("Failed to fetch service statistics"))?;

    let records: Vec<AccessRecord> = rows
        .into_iter()
        .map(
            |(provider_id, user_id, accessed_at, provider_name, subcategory, category)| {
                AccessRecord {
                    provider_id,
                    provider_name,
                    subcategory: Some(subcategory),
                    category: Some(category),
                    user_id,
                    accessed_at,
                }
            },
        )
        .collect();

    // Provider counts are decoration; the report stands without them
    let providers = match service_providers::table
        .inner_join(service_subcategories::table.inner_join(service_categories::table))
        .select((service_providers::id, service_categories::name))
        .load::<(Uuid, String)>(&mut conn)
        .await
    {
        Ok(rows) => rows
            .into_iter()
            .map(|(provider_id, category)| ProviderCategory {
                provider_id,
                category: Some(category),
            })
            .collect(),
        Err(e) => {
            warn!("Failed to count providers per category: {}", e);
            Vec::new()
        }
    };

    debug!(
        "Aggregating {} access records over {} providers",
        records.len(),
        providers.len()
    );
    Ok(aggregate_usage(&records, &providers))
}

pub async fn get_usage_report(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<UsageReport>>> {
    let report = fetched(ENTITY, fetch_usage_report(&state).await)?;
    Ok(Json(ApiResponse::success(report)))
}
