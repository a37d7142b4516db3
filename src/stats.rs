// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

//! Rollups of the service directory access log.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// Name used when a join did not resolve
pub const UNKNOWN: &str = "Unknown";

/// One row of `service_stats` joined to its provider's directory names
#[derive(Debug, Clone)]
pub struct AccessRecord {
    pub provider_id: Uuid,
    pub provider_name: String,
    pub subcategory: Option<String>,
    pub category: Option<String>,
    pub user_id: Option<Uuid>,
    pub accessed_at: DateTime<Utc>,
}

/// Category of one provider, views or not
#[derive(Debug, Clone)]
pub struct ProviderCategory {
    pub provider_id: Uuid,
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderUsage {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub subcategory: String,
    pub total_views: u64,
    pub unique_users: u64,
    pub last_accessed: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryUsage {
    pub name: String,
    pub total_views: u64,
    pub provider_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UsageReport {
    pub providers: Vec<ProviderUsage>,
    pub categories: Vec<CategoryUsage>,
    pub total_views: u64,
    /// Providers with at least one recorded view
    pub total_providers: u64,
}

struct ProviderAccumulator {
    usage: ProviderUsage,
    users: HashSet<Uuid>,
}

fn or_unknown(name: Option<&str>) -> String {
    match name.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => UNKNOWN.to_string(),
    }
}

/// Aggregate the access log per provider and per category
pub fn aggregate_usage(records: &[AccessRecord], providers: &[ProviderCategory]) -> UsageReport {
    let mut by_provider: HashMap<Uuid, ProviderAccumulator> = HashMap::new();
    let mut category_views: HashMap<String, u64> = HashMap::new();

    for record in records {
        let entry = by_provider
            .entry(record.provider_id)
            .or_insert_with(|| ProviderAccumulator {
                usage: ProviderUsage {
                    id: record.provider_id,
                    name: record.provider_name.clone(),
                    category: or_unknown(record.category.as_deref()),
                    subcategory: or_unknown(record.subcategory.as_deref()),
                    total_views: 0,
                    unique_users: 0,
                    last_accessed: record.accessed_at,
                },
                users: HashSet::new(),
            });

        entry.usage.total_views += 1;
        if record.accessed_at > entry.usage.last_accessed {
            entry.usage.last_accessed = record.accessed_at;
        }
        if let Some(user_id) = record.user_id {
            entry.users.insert(user_id);
        }

        *category_views
            .entry(or_unknown(record.category.as_deref()))
            .or_default() += 1;
    }

    let mut providers_per_category: HashMap<String, u64> = HashMap::new();
    for provider in providers {
        *providers_per_category
            .entry(or_unknown(provider.category.as_deref()))
            .or_default() += 1;
    }

    let mut provider_rows: Vec<ProviderUsage> = by_provider
        .into_values()
        .map(|mut acc| {
            acc.usage.unique_users = acc.users.len() as u64;
            acc.usage
        })
        .collect();
    provider_rows.sort_by(|a, b| {
        b.total_views
            .cmp(&a.total_views)
            .then_with(|| a.name.cmp(&b.name))
    });

    let mut category_rows: Vec<CategoryUsage> = category_views
        .into_iter()
        .map(|(name, total_views)| CategoryUsage {
            provider_count: providers_per_category.get(&name).copied().unwrap_or(0),
            name,
            total_views,
        })
        .collect();
    category_rows.sort_by(|a, b| {
        b.total_views
            .cmp(&a.total_views)
            .then_with(|| a.name.cmp(&b.name))
    });

    UsageReport {
        total_views: records.len() as u64,
        total_providers: provider_rows.len() as u64,
        providers: provider_rows,
        categories: category_rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, hour, 0, 0).unwrap()
    }

    fn record(
        provider_id: Uuid,
        name: &str,
        category: Option<&str>,
        user_id: Option<Uuid>,
        hour: u32,
    ) -> AccessRecord {
        AccessRecord {
            provider_id,
            provider_name: name.to_string(),
            subcategory: Some("Italian".to_string()),
            category: category.map(str::to_string),
            user_id,
            accessed_at: at(hour),
        }
    }

    #[test]
    fn empty_log_gives_empty_report() {
        let report = aggregate_usage(&[], &[]);
        assert_eq!(report, UsageReport::default());
    }

    #[test]
    fn provider_rollup_counts_views_users_and_latest_access() {
        let trattoria = Uuid::new_v4();
        let (alex, sam) = (Uuid::new_v4(), Uuid::new_v4());
        let records = vec![
            record(trattoria, "Trattoria", Some("Restaurants"), Some(alex), 9),
            record(trattoria, "Trattoria", Some("Restaurants"), Some(alex), 12),
            record(trattoria, "Trattoria", Some("Restaurants"), Some(sam), 10),
            record(trattoria, "Trattoria", Some("Restaurants"), None, 11),
        ];

        let report = aggregate_usage(&records, &[]);
        let row = &report.providers[0];

        assert_eq!(row.total_views, 4);
        assert_eq!(row.unique_users, 2);
        assert_eq!(row.last_accessed, at(12));
        assert_eq!(report.total_views, 4);
        assert_eq!(report.total_providers, 1);
    }

    #[test]
    fn rows_sort_by_views_then_name() {
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let records = vec![
            record(a, "Zen Spa", Some("Wellness"), None, 8),
            record(b, "Bistro", Some("Restaurants"), None, 8),
            record(c, "Cinema", Some("Leisure"), None, 8),
            record(c, "Cinema", Some("Leisure"), None, 9),
        ];

        let report = aggregate_usage(&records, &[]);
        let names: Vec<_> = report.providers.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Cinema", "Bistro", "Zen Spa"]);

        let categories: Vec<_> = report.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(categories, vec!["Leisure", "Restaurants", "Wellness"]);
    }

    #[test]
    fn category_provider_count_includes_providers_without_views() {
        let (viewed, quiet) = (Uuid::new_v4(), Uuid::new_v4());
        let records = vec![record(viewed, "Bistro", Some("Restaurants"), None, 8)];
        let providers = vec![
            ProviderCategory {
                provider_id: viewed,
                category: Some("Restaurants".to_string()),
            },
            ProviderCategory {
                provider_id: quiet,
                category: Some("Restaurants".to_string()),
            },
            ProviderCategory {
                provider_id: Uuid::new_v4(),
                category: Some("Wellness".to_string()),
            },
        ];

        let report = aggregate_usage(&records, &providers);

        assert_eq!(report.categories.len(), 1);
        assert_eq!(report.categories[0].provider_count, 2);
        assert_eq!(report.categories[0].total_views, 1);
    }

    #[test]
    fn missing_names_collapse_to_unknown() {
        let id = Uuid::new_v4();
        let mut orphan = record(id, "Popup", None, None, 8);
        orphan.subcategory = None;

        let report = aggregate_usage(&[orphan], &[]);

        assert_eq!(report.providers[0].category, UNKNOWN);
        assert_eq!(report.providers[0].subcategory, UNKNOWN);
        assert_eq!(report.categories[0].name, UNKNOWN);
    }
}
