// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{blank_to_none, required};
use crate::schema::service_providers;
use super::{ServiceCategory, ServiceSubcategory};

/// Business listed in the service directory
#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = service_providers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ServiceProvider {
    pub id: Uuid,
    pub subcategory_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<BigDecimal>,
    pub longitude: Option<BigDecimal>,
    pub phone: Option<String>,
    pub opening_hours: Option<Value>,
    pub price_range: Option<String>,
    pub image_url: Option<String>,
    pub website: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = service_providers)]
#[diesel(treat_none_as_null = true)]
pub struct ServiceProviderChanges {
    pub subcategory_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<BigDecimal>,
    pub longitude: Option<BigDecimal>,
    pub phone: Option<String>,
    pub opening_hours: Option<Value>,
    pub price_range: Option<String>,
    pub image_url: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ServiceProviderDraft {
    pub subcategory_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub latitude: Option<BigDecimal>,
    #[serde(default)]
    pub longitude: Option<BigDecimal>,
    #[serde(default)]
    pub phone: Option<String>,
    /// Either structured JSON or the raw text typed in the form
    #[serde(default)]
    pub opening_hours: Option<Value>,
    #[serde(default)]
    pub price_range: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

impl ServiceProviderDraft {
    pub fn into_changes(self) -> Result<ServiceProviderChanges> {
        Ok(ServiceProviderChanges {
            subcategory_id: self.subcategory_id,
            name: required(self.name, "Name")?,
            description: blank_to_none(self.description),
            address: blank_to_none(self.address),
            city: blank_to_none(self.city),
            latitude: self.latitude,
            longitude: self.longitude,
            phone: blank_to_none(self.phone),
            opening_hours: normalize_opening_hours(self.opening_hours),
            price_range: blank_to_none(self.price_range),
            image_url: blank_to_none(self.image_url),
            website: blank_to_none(self.website),
        })
    }
}

/// Free-form opening hours: text holding JSON is parsed, any other text is
/// kept under a `general` key, blank text is NULL.
pub fn normalize_opening_hours(value: Option<Value>) -> Option<Value> {
    match value? {
        Value::Null => None,
        Value::String(text) => {
            let text = text.trim();
            if text.is_empty() {
                return None;
            }
            Some(serde_json::from_str(text).unwrap_or_else(|_| json!({ "general": text })))
        }
        structured => Some(structured),
    }
}

/// Provider with its subcategory and category
#[derive(Debug, Clone, Serialize)]
pub struct ProviderWithDirectory {
    #[serde(flatten)]
    pub provider: ServiceProvider,
    pub subcategory: ServiceSubcategory,
    pub category: ServiceCategory,
}
