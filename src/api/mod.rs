// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

pub mod routes;
pub mod handlers;

use crate::auth::{self, SessionRegistry};
use crate::config::Config;
use crate::db::Database;
use crate::functions;
use crate::metrics;
use crate::upload::ImageHost;
use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, patch, post, put},
    Router,
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use handlers::{
    couples, daily_questions, dashboard, health, questions, quiz_questions, quiz_themes, quizzes,
    sections, service_categories, service_providers, service_stats, service_subcategories,
    session, uploads, users,
};

/// Shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub config: Arc<Config>,
    pub sessions: Arc<SessionRegistry>,
    pub images: Arc<dyn ImageHost>,
}

impl AppState {
    pub fn new(db: Arc<Database>, config: Arc<Config>, images: Arc<dyn ImageHost>) -> Self {
        Self {
            db,
            config,
            sessions: Arc::new(SessionRegistry::new()),
            images,
        }
    }
}

/// Build the complete router: admin API behind the auth layer, health and
/// metrics, and the server-side functions
pub fn build_router(state: AppState) -> Router {
    // Room for the multipart envelope around the largest accepted image
    let upload_limit = (state.config.images.max_bytes as usize) * 4 + 1024 * 1024;

    let mut admin = Router::new()
        // Shell
        .route("/api/sections", get(sections::get_menu))
        .route("/api/sections/:id", get(sections::render_section))
        .route("/api/dashboard", get(dashboard::get_dashboard))

        // Session
        .route("/api/session", get(session::get_session))
        .route("/api/session/logout", post(session::logout))
        .route("/api/admin/accounts", get(session::list_accounts))

        // Users and couples
        .route("/api/users", get(users::list_users))
        .route("/api/users/:id", put(users::update_user).delete(users::delete_user))
        .route("/api/couples", get(couples::list_couples))
        .route("/api/couples/options", get(couples::couple_options))
        .route("/api/couples/:id", axum::routing::delete(couples::delete_couple))

        // Quizzes
        .route(
            "/api/quiz-themes",
            get(quiz_themes::list_quiz_themes).post(quiz_themes::create_quiz_theme),
        )
        .route("/api/quiz-themes/options", get(quiz_themes::quiz_theme_options))
        .route(
            "/api/quiz-themes/:id",
            put(quiz_themes::update_quiz_theme).delete(quiz_themes::delete_quiz_theme),
        )
        .route(
            "/api/quizzes",
            get(quizzes::list_quizzes).post(quizzes::create_quiz),
        )
        .route("/api/quizzes/options", get(quizzes::quiz_options))
        .route(
            "/api/quizzes/:id",
            put(quizzes::update_quiz).delete(quizzes::delete_quiz),
        )
        .route(
            "/api/quiz-questions",
            get(quiz_questions::list_quiz_questions).post(quiz_questions::create_quiz_question),
        )
        .route(
            "/api/quiz-questions/:id",
            put(quiz_questions::update_quiz_question).delete(quiz_questions::delete_quiz_question),
        )
        .route(
            "/api/quiz-questions/:id/order",
            patch(quiz_questions::reorder_quiz_question),
        )

        // Daily questions
        .route(
            "/api/questions",
            get(questions::list_questions).post(questions::create_question),
        )
        .route("/api/questions/options", get(questions::question_options))
        .route(
            "/api/questions/:id",
            put(questions::update_question).delete(questions::delete_question),
        )
        .route(
            "/api/daily-questions",
            get(daily_questions::list_daily_questions).post(daily_questions::create_daily_question),
        )
        .route(
            "/api/daily-questions/:id",
            put(daily_questions::update_daily_question)
                .delete(daily_questions::delete_daily_question),
        )

        // Service directory
        .route(
            "/api/service-categories",
            get(service_categories::list_categories).post(service_categories::create_category),
        )
        .route(
            "/api/service-categories/options",
            get(service_categories::category_options),
        )
        .route(
            "/api/service-categories/:id",
            put(service_categories::update_category).delete(service_categories::delete_category),
        )
        .route(
            "/api/service-subcategories",
            get(service_subcategories::list_subcategories)
                .post(service_subcategories::create_subcategory),
        )
        .route(
            "/api/service-subcategories/options",
            get(service_subcategories::subcategory_options),
        )
        .route(
            "/api/service-subcategories/:id",
            put(service_subcategories::update_subcategory)
                .delete(service_subcategories::delete_subcategory),
        )
        .route(
            "/api/service-providers",
            get(service_providers::list_providers).post(service_providers::create_provider),
        )
        .route(
            "/api/service-providers/:id",
            put(service_providers::update_provider).delete(service_providers::delete_provider),
        )
        .route("/api/service-stats", get(service_stats::get_usage_report))

        // Uploads
        .route(
            "/api/uploads/image",
            post(uploads::upload_image).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_session,
        ))

        // General routes
        .route("/health", get(health::health_check))
        .route("/metrics", get(metrics::metrics_handler));

    if state.config.api.enable_cors {
        admin = admin.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    Router::new()
        .merge(admin)
        .merge(functions::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the API server and run until `shutdown` resolves
pub async fn start_api_server(
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let addr = format!("{}:{}", state.config.api.host, state.config.api.port)
        .parse::<SocketAddr>()?;
    let app = build_router(state);

    info!("Starting API server on {}", addr);
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
