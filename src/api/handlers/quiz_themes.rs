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
use crate::models::service::DirectoryOption;
use crate::models::{QuizTheme, QuizThemeDraft};
use crate::schema::{quiz_themes, quizzes};
use crate::search::filter_rows;

const ENTITY: &str = "quiz_themes";
const DELETE_PROMPT: &str = "Are you sure you want to delete this quiz theme?";

/// Themes, newest first, narrowed by the search term
pub async fn fetch_quiz_themes(state: &AppState, query: &ListQuery) -> Result<Vec<QuizTheme>> {
    let mut conn = state.db.get_connection().await?;

    let themes = quiz_themes::table
        .select(QuizTheme::as_select())
        .order(quiz_themes::created_at.desc())
        .load::<QuizTheme>(&mut conn)
        .await
        .map_err(AdminError::database("Failed to fetch quiz themes"))?;

    Ok(filter_rows(themes, query.term()))
}

pub async fn list_quiz_themes(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<QuizTheme>>>> {
    debug!("Listing quiz themes, search: {:?}", query.search);
    let themes = fetched(ENTITY, fetch_quiz_themes(&state, &query).await)?;
    Ok(Json(ApiResponse::success(themes)))
}

/// Themes by name, for the quiz form
pub async fn quiz_theme_options(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<DirectoryOption>>>> {
    let mut conn = state.db.get_connection().await?;

    let options = quiz_themes::table
        .select((quiz_themes::id, quiz_themes::name))
        .order(quiz_themes::name.asc())
        .load::<(Uuid, String)>(&mut conn)
        .await
        .map_err(AdminError::database("Failed to fetch quiz themes"))?
        .into_iter()
        .map(|(id, name)| DirectoryOption {
            id,
            name,
            icon: None,
            category: None,
        })
        .collect();

    Ok(Json(ApiResponse::success(options)))
}

/// Insert when `editing` is empty, update the referenced theme otherwise
pub async fn save_quiz_theme(
    state: &AppState,
    editing: Option<Uuid>,
    draft: QuizThemeDraft,
) -> Result<QuizTheme> {
    let changes = draft.into_changes()?;
    let mut conn = state.db.get_connection().await?;

    match editing {
        Some(id) => diesel::update(quiz_themes::table.find(id))
            .set(&changes)
            .returning(QuizTheme::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(AdminError::database("Failed to save quiz theme"))?
            .ok_or_else(|| AdminError::NotFound("Quiz theme".to_string())),
        None => diesel::insert_into(quiz_themes::table)
            .values(&changes)
            .returning(QuizTheme::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AdminError::database("Failed to save quiz theme")),
    }
}

pub async fn create_quiz_theme(
    State(state): State<AppState>,
    Json(draft): Json<QuizThemeDraft>,
) -> Result<Json<ApiResponse<QuizTheme>>> {
    let theme = mutation(ENTITY, "create", save_quiz_theme(&state, None, draft).await)?;
    Ok(Json(ApiResponse::with_toast(
        theme,
        Toast::success("Quiz theme created successfully"),
    )))
}

pub async fn update_quiz_theme(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(draft): Json<QuizThemeDraft>,
) -> Result<Json<ApiResponse<QuizTheme>>> {
    let theme = mutation(ENTITY, "update", save_quiz_theme(&state, Some(id), draft).await)?;
    Ok(Json(ApiResponse::with_toast(
        theme,
        Toast::success("Quiz theme updated successfully"),
    )))
}

async fn remove_quiz_theme(state: &AppState, id: Uuid) -> Result<()> {
    let mut conn = state.db.get_connection().await?;

    let quiz_count = quizzes::table
        .filter(quizzes::theme_id.eq(id))
        .count()
        .get_result::<i64>(&mut conn)
        .await
        .map_err(AdminError::database("Failed to check theme dependencies"))?;

    ensure_no_dependents(&[DependentCheck {
        table: "quizzes",
        count: quiz_count,
        title: "Cannot Delete Theme",
        message: "This theme has quizzes and cannot be deleted. Please remove all quizzes first.",
    }])?;

    let deleted = diesel::delete(quiz_themes::table.find(id))
        .execute(&mut conn)
        .await
        .map_err(AdminError::database("Failed to delete quiz theme"))?;
    if deleted == 0 {
        return Err(AdminError::NotFound("Quiz theme".to_string()));
    }
    Ok(())
}

pub async fn delete_quiz_theme(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(confirm): Query<DeleteQuery>,
) -> Result<Json<ApiResponse<Deleted>>> {
    confirm.require(DELETE_PROMPT)?;
    mutation(ENTITY, "delete", remove_quiz_theme(&state, id).await)?;

    Ok(Json(ApiResponse::with_toast(
        Deleted { id },
        Toast::success("Quiz theme deleted successfully"),
    )))
}
