// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

pub mod health;
pub mod dashboard;
pub mod sections;
pub mod session;
pub mod users;
pub mod couples;
pub mod quiz_themes;
pub mod quizzes;
pub mod quiz_questions;
pub mod questions;
pub mod daily_questions;
pub mod service_categories;
pub mod service_subcategories;
pub mod service_providers;
pub mod service_stats;
pub mod uploads;
