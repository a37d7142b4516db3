// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod schema;
pub mod search;
pub mod integrity;
pub mod stats;
pub mod upload;
pub mod auth;
pub mod shell;
pub mod metrics;
pub mod functions;
pub mod api;
