// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

use axum::{extract::State, Json};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde::Serialize;
use tracing::{debug, error};

use crate::api::routes::ApiResponse;
use crate::api::AppState;
use crate::schema::{couples, daily_questions, profiles, questions, quiz_answers, quizzes};

/// Row totals shown on the overview cards
#[derive(Debug, Default, Clone, Serialize)]
pub struct DashboardStats {
    pub total_users: i64,
    pub total_couples: i64,
    pub total_quizzes: i64,
    pub total_questions: i64,
    pub total_daily_questions: i64,
    pub total_quiz_answers: i64,
}

// Each count takes its own pooled connection; a failure counts as zero
macro_rules! count_rows {
    ($state:expr, $table:ident) => {
        async {
            let mut conn = match $state.db.get_connection().await {
                Ok(conn) => conn,
                Err(e) => {
                    error!("Database connection error counting {}: {}", stringify!($table), e);
                    return 0;
                }
            };
            match $table::table.count().get_result::<i64>(&mut conn).await {
                Ok(count) => count,
                Err(e) => {
                    error!("Failed to count {}: {}", stringify!($table), e);
                    0
                }
            }
        }
    };
}

pub async fn fetch_dashboard(state: &AppState) -> DashboardStats {
    let (users, couples, quizzes, questions, daily_questions, quiz_answers) = tokio::join!(
        count_rows!(state, profiles),
        count_rows!(state, couples),
        count_rows!(state, quizzes),
        count_rows!(state, questions),
        count_rows!(state, daily_questions),
        count_rows!(state, quiz_answers),
    );

    DashboardStats {
        total_users: users,
        total_couples: couples,
        total_quizzes: quizzes,
        total_questions: questions,
        total_daily_questions: daily_questions,
        total_quiz_answers: quiz_answers,
    }
}

pub async fn get_dashboard(State(state): State<AppState>) -> Json<ApiResponse<DashboardStats>> {
    let stats = fetch_dashboard(&state).await;
    debug!("Dashboard totals: {:?}", stats);
    Json(ApiResponse::success(stats))
}
