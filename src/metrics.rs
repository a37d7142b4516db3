// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

//! Prometheus counters for console mutations.

use anyhow::Result;
use axum::http::{header, StatusCode};
use axum::response::Response;
use once_cell::sync::OnceCell;
use prometheus::{register_int_counter_vec, Encoder, IntCounterVec};

static MUTATIONS_TOTAL: OnceCell<IntCounterVec> = OnceCell::new();
static FAILURES_TOTAL: OnceCell<IntCounterVec> = OnceCell::new();

/// Register the counters with the default registry; safe to call twice
pub fn init_metrics() -> Result<()> {
    MUTATIONS_TOTAL.get_or_try_init(|| {
        register_int_counter_vec!(
            "admin_mutations_total",
            "Successful create, update and delete operations",
            &["entity", "op"]
        )
    })?;
    FAILURES_TOTAL.get_or_try_init(|| {
        register_int_counter_vec!(
            "admin_failures_total",
            "Failed console operations",
            &["entity"]
        )
    })?;
    Ok(())
}

pub fn record_mutation(entity: &str, op: &str) {
    if let Some(counter) = MUTATIONS_TOTAL.get() {
        counter.with_label_values(&[entity, op]).inc();
    }
}

pub fn record_failure(entity: &str) {
    if let Some(counter) = FAILURES_TOTAL.get() {
        counter.with_label_values(&[entity]).inc();
    }
}

/// Metrics endpoint handler
pub async fn metrics_handler() -> Result<Response<String>, StatusCode> {
    let encoder = prometheus::TextEncoder::new();
    let metric_families = prometheus::gather();

    let body = encoder
        .encode_to_string(&metric_families)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, encoder.format_type())
        .body(body)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}
