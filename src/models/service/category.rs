// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{blank_to_none, required};
use crate::schema::{service_categories, service_subcategories};

/// Top level of the service directory
#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = service_categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ServiceCategory {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = service_categories)]
#[diesel(treat_none_as_null = true)]
pub struct ServiceCategoryChanges {
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ServiceCategoryDraft {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

impl ServiceCategoryDraft {
    pub fn into_changes(self) -> Result<ServiceCategoryChanges> {
        Ok(ServiceCategoryChanges {
            name: required(self.name, "Name")?,
            description: blank_to_none(self.description),
            icon: blank_to_none(self.icon),
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = service_subcategories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ServiceSubcategory {
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = service_subcategories)]
#[diesel(treat_none_as_null = true)]
pub struct ServiceSubcategoryChanges {
    pub category_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ServiceSubcategoryDraft {
    pub category_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

impl ServiceSubcategoryDraft {
    pub fn into_changes(self) -> Result<ServiceSubcategoryChanges> {
        Ok(ServiceSubcategoryChanges {
            category_id: self.category_id,
            name: required(self.name, "Name")?,
            description: blank_to_none(self.description),
            icon: blank_to_none(self.icon),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SubcategoryWithCategory {
    #[serde(flatten)]
    pub subcategory: ServiceSubcategory,
    pub category: ServiceCategory,
}

/// Compact row for select boxes
#[derive(Debug, Clone, Serialize)]
pub struct DirectoryOption {
    pub id: Uuid,
    pub name: String,
    pub icon: Option<String>,
    /// Parent category name, set for subcategory options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}
