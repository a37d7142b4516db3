// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

use crate::config::DatabaseConfig;
use anyhow::Result;
use deadpool::Runtime;
use diesel_async::{
    pooled_connection::{AsyncDieselConnectionManager, PoolError},
    AsyncPgConnection,
};
use tracing::info;

pub type DbPool = deadpool::managed::Pool<AsyncDieselConnectionManager<AsyncPgConnection>>;
pub type DbConnection = deadpool::managed::Object<AsyncDieselConnectionManager<AsyncPgConnection>>;
pub type DbPoolError = deadpool::managed::PoolError<PoolError>;

/// Handle to the hosted Postgres backend shared by every screen
pub struct Database {
    pool: DbPool,
}

impl Database {
    /// Build the connection pool without touching the network
    pub fn connect_lazy(config: &DatabaseConfig) -> Result<Self> {
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(&config.url);

        let pool = DbPool::builder(manager)
            .max_size(config.max_connections)
            .runtime(Runtime::Tokio1)
            .build()?;

        Ok(Self { pool })
    }

    /// Create a new database manager and verify the backend is reachable
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let db = Self::connect_lazy(config)?;

        // Test connection by getting a connection from the pool
        let _conn = db.get_connection().await?;
        info!("Successfully connected to the database");

        Ok(db)
    }

    /// Get a database connection from the pool
    pub async fn get_connection(&self) -> Result<DbConnection, DbPoolError> {
        self.pool.get().await
    }
}

/// Initialize the database connection pool
pub async fn init_database(config: &DatabaseConfig) -> Result<Database> {
    Database::new(config).await
}
