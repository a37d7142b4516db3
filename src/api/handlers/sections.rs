// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::debug;

use crate::api::handlers::{
    couples, daily_questions, dashboard, questions, quiz_questions, quiz_themes, quizzes,
    service_categories, service_providers, service_stats, service_subcategories, users,
};
use crate::api::routes::{ApiResponse, ListQuery};
use crate::api::AppState;
use crate::error::Result;
use crate::shell::{menu, MenuItem, Section};

pub async fn get_menu() -> Json<ApiResponse<Vec<MenuItem>>> {
    Json(ApiResponse::success(menu()))
}

/// Rendered section: which screen is active plus its freshly fetched rows
#[derive(Debug, Serialize)]
pub struct RenderedSection<T> {
    pub section: Section,
    pub label: &'static str,
    pub rows: T,
}

fn rendered<T: Serialize>(section: Section, rows: T) -> Response {
    Json(ApiResponse::success(RenderedSection {
        section,
        label: section.label(),
        rows,
    }))
    .into_response()
}

/// Render the selected section; unknown ids show the dashboard
pub async fn render_section(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Response> {
    let section = Section::from_id(&id);
    debug!("Rendering section {} (requested {:?})", section, id);

    let response = match section {
        Section::Dashboard => rendered(section, dashboard::fetch_dashboard(&state).await),
        Section::Users => rendered(section, users::fetch_users(&state, &query).await?),
        Section::Couples => rendered(section, couples::fetch_couples(&state, &query).await?),
        Section::QuizThemes => {
            rendered(section, quiz_themes::fetch_quiz_themes(&state, &query).await?)
        }
        Section::Quizzes => rendered(section, quizzes::fetch_quizzes(&state, &query).await?),
        Section::QuizQuestions => rendered(
            section,
            quiz_questions::fetch_quiz_questions(&state, &query).await?,
        ),
        Section::Questions => rendered(section, questions::fetch_questions(&state, &query).await?),
        Section::DailyQuestions => rendered(
            section,
            daily_questions::fetch_daily_questions(&state, &query).await?,
        ),
        Section::ServiceCategories => rendered(
            section,
            service_categories::fetch_categories(&state, &query).await?,
        ),
        Section::ServiceSubcategories => rendered(
            section,
            service_subcategories::fetch_subcategories(&state, &query).await?,
        ),
        Section::ServiceProviders => rendered(
            section,
            service_providers::fetch_providers(&state, &query).await?,
        ),
        Section::ServiceStats => {
            rendered(section, service_stats::fetch_usage_report(&state).await?)
        }
    };

    Ok(response)
}
