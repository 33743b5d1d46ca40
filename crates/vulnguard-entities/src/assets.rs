use async_trait::async_trait;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::Set, ConnectionTrait, DbErr};
use serde::{Deserialize, Serialize};
use vulnguard_core::DBDateTime;

use super::types::AssetType;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "assets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Display name, 2-100 characters
    pub name: String,
    pub asset_type: AssetType,
    /// Where the asset lives: hostname, IP, URL or resource identifier
    pub address: String,
    pub description: Option<String>,
    /// Business importance 1 (low) to 5 (critical); amplifies risk scores
    pub criticality: i32,
    /// Soft-delete flag; scans are only run against active assets
    pub active: bool,
    pub created_at: DBDateTime,
    /// Updated by the scan simulator on every completed scan
    pub last_scanned_at: Option<DBDateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::vulnerabilities::Entity")]
    Vulnerabilities,
}

impl Related<super::vulnerabilities::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vulnerabilities.def()
    }
}

#[async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if insert && self.created_at.is_not_set() {
            self.created_at = Set(chrono::Utc::now());
        }

        Ok(self)
    }
}
