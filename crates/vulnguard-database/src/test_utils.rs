//! Test utilities for database integration tests
//!
//! Provides an in-memory SQLite database with all migrations applied,
//! reused by service-level tests across the workspace. Every call gets
//! an isolated database, so tests never observe each other's rows.

use crate::DbConnection;
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use std::sync::Arc;
use vulnguard_migrations::Migrator;

/// Fresh in-memory database with the full schema.
pub struct TestDatabase {
    pub db: Arc<DbConnection>,
}

impl TestDatabase {
    pub async fn new() -> anyhow::Result<Self> {
        let db = Database::connect("sqlite::memory:").await?;
        Migrator::up(&db, None).await?;

        Ok(Self { db: Arc::new(db) })
    }
}

/// Convenience wrapper for tests that only need the connection.
pub async fn setup_test_db() -> Arc<DbConnection> {
    TestDatabase::new()
        .await
        .expect("failed to set up test database")
        .db
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{ActiveModelTrait, EntityTrait, Set};
    use vulnguard_entities::prelude::*;

    #[tokio::test]
    async fn test_setup_creates_empty_schema() {
        let db = setup_test_db().await;

        let assets = Assets::find().all(db.as_ref()).await.unwrap();
        assert!(assets.is_empty());

        let vulns = Vulnerabilities::find().all(db.as_ref()).await.unwrap();
        assert!(vulns.is_empty());
    }

    #[tokio::test]
    async fn test_databases_are_isolated() {
        let first = setup_test_db().await;
        let second = setup_test_db().await;

        vulnguard_entities::assets::ActiveModel {
            name: Set("edge-gateway".to_string()),
            asset_type: Set(AssetType::Domain),
            address: Set("gw.example.com".to_string()),
            criticality: Set(3),
            active: Set(true),
            ..Default::default()
        }
        .insert(first.as_ref())
        .await
        .unwrap();

        assert_eq!(Assets::find().all(first.as_ref()).await.unwrap().len(), 1);
        assert!(Assets::find().all(second.as_ref()).await.unwrap().is_empty());
    }
}
