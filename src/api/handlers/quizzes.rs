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
use crate::models::{Quiz, QuizDraft, QuizTheme, QuizWithTheme};
use crate::schema::{quiz_answers, quiz_questions, quiz_themes, quizzes};
use crate::search::filter_rows;

const ENTITY: &str = "quizzes";
const DELETE_PROMPT: &str = "Are you sure you want to delete this quiz?";
const CANNOT_DELETE: &str = "Cannot Delete Quiz";

pub async fn fetch_quizzes(state: &AppState, query: &ListQuery) -> Result<Vec<QuizWithTheme>> {
    let mut conn = state.db.get_connection().await?;

    let rows = quizzes::table
        .inner_join(quiz_themes::table)
        .select((Quiz::as_select(), QuizTheme::as_select()))
        .order(quizzes::created_at.desc())
        .load::<(Quiz, QuizTheme)>(&mut conn)
        .await
        .map_err(AdminError::database("Failed to fetch quizzes"))?;

    let quizzes = rows
        .into_iter()
        .map(|(quiz, theme)| QuizWithTheme { quiz, theme })
        .collect();
    Ok(filter_rows(quizzes, query.term()))
}

pub async fn list_quizzes(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<QuizWithTheme>>>> {
    debug!("Listing quizzes, search: {:?}", query.search);
    let quizzes = fetched(ENTITY, fetch_quizzes(&state, &query).await)?;
    Ok(Json(ApiResponse::success(quizzes)))
}

/// Quizzes by title, for the quiz question form and filter
pub async fn quiz_options(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<DirectoryOption>>>> {
    let mut conn = state.db.get_connection().await?;

    let options = quizzes::table
        .select((quizzes::id, quizzes::title))
        .order(quizzes::title.asc())
        .load::<(Uuid, String)>(&mut conn)
        .await
        .map_err(AdminError::database("Failed to fetch quizzes"))?
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

pub async fn save_quiz(state: &AppState, editing: Option<Uuid>, draft: QuizDraft) -> Result<Quiz> {
    let changes = draft.into_changes()?;
    let mut conn = state.db.get_connection().await?;

    match editing {
        Some(id) => diesel::update(quizzes::table.find(id))
            .set(&changes)
            .returning(Quiz::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(AdminError::database("Failed to save quiz"))?
            .ok_or_else(|| AdminError::NotFound("Quiz".to_string())),
        None => diesel::insert_into(quizzes::table)
            .values(&changes)
            .returning(Quiz::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AdminError::database("Failed to save quiz")),
    }
}

pub async fn create_quiz(
    State(state): State<AppState>,
    Json(draft): Json<QuizDraft>,
) -> Result<Json<ApiResponse<Quiz>>> {
    let quiz = mutation(ENTITY, "create", save_quiz(&state, None, draft).await)?;
    Ok(Json(ApiResponse::with_toast(
        quiz,
        Toast::success("Quiz created successfully"),
    )))
}

pub async fn update_quiz(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(draft): Json<QuizDraft>,
) -> Result<Json<ApiResponse<Quiz>>> {
    let quiz = mutation(ENTITY, "update", save_quiz(&state, Some(id), draft).await)?;
    Ok(Json(ApiResponse::with_toast(
        quiz,
        Toast::success("Quiz updated successfully"),
    )))
}

async fn remove_quiz(state: &AppState, id: Uuid) -> Result<()> {
    let mut conn = state.db.get_connection().await?;

    let question_count = quiz_questions::table
        .filter(quiz_questions::quiz_id.eq(id))
        .count()
        .get_result::<i64>(&mut conn)
        .await
        .map_err(AdminError::database("Failed to check quiz dependencies"))?;
    ensure_no_dependents(&[DependentCheck {
        table: "quiz_questions",
        count: question_count,
        title: CANNOT_DELETE,
        message: "This quiz has questions and cannot be deleted. Please remove all questions first.",
    }])?;

    let answer_count = quiz_answers::table
        .filter(quiz_answers::quiz_id.eq(id))
        .count()
        .get_result::<i64>(&mut conn)
        .await
        .map_err(AdminError::database("Failed to check quiz dependencies"))?;
    ensure_no_dependents(&[DependentCheck {
        table: "quiz_answers",
        count: answer_count,
        title: CANNOT_DELETE,
        message: "This quiz has user responses and cannot be deleted to preserve data integrity.",
    }])?;

    let deleted = diesel::delete(quizzes::table.find(id))
        .execute(&mut conn)
        .await
        .map_err(AdminError::database(
            "Failed to delete quiz. It might be referenced by other records.",
        ))?;
    if deleted == 0 {
        return Err(AdminError::NotFound("Quiz".to_string()));
    }
    Ok(())
}

pub async fn delete_quiz(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(confirm): Query<DeleteQuery>,
) -> Result<Json<ApiResponse<Deleted>>> {
    confirm.require(DELETE_PROMPT)?;
    mutation(ENTITY, "delete", remove_quiz(&state, id).await)?;

    Ok(Json(ApiResponse::with_toast(
        Deleted { id },
        Toast::success("Quiz deleted successfully"),
    )))
}
