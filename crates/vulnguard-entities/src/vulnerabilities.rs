use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use vulnguard_core::DBDateTime;

use super::types::Severity;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vulnerabilities")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// CVE-style identifier, e.g. "CVE-2026-12345"
    pub cve_id: String,
    pub title: String,
    pub severity: Severity,
    /// CVSS base score, 0.0-10.0, consistent with the severity band
    pub cvss_score: f64,
    pub discovered_at: DBDateTime,
    pub age_in_days: i32,
    /// One-way flag; there is no un-remediate operation
    pub remediated: bool,
    /// Cached result of the last scoring pass. NOT kept up to date when
    /// age or asset criticality change; rankings must re-score first.
    pub risk_score: f64,
    pub asset_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::assets::Entity",
        from = "Column::AssetId",
        to = "super::assets::Column::Id"
    )]
    Asset,
}

impl Related<super::assets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Asset.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
