use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use std::sync::Arc;
use tracing::{debug, info};

use vulnguard_database::DbConnection;
use vulnguard_entities::types::AssetType;
use vulnguard_entities::{assets, vulnerabilities};

use super::types::{AssetError, CreateAssetRequest, UpdateAssetRequest};

const NAME_MIN: usize = 2;
const NAME_MAX: usize = 100;
const DESCRIPTION_MAX: usize = 500;
const CRITICALITY_MIN: i32 = 1;
const CRITICALITY_MAX: i32 = 5;

#[derive(Clone)]
pub struct AssetService {
    db: Arc<DbConnection>,
}

impl AssetService {
    pub fn new(db: Arc<DbConnection>) -> Self {
        Self { db }
    }

    pub async fn get_all_active(&self) -> Result<Vec<assets::Model>, AssetError> {
        Ok(assets::Entity::find()
            .filter(assets::Column::Active.eq(true))
            .order_by_asc(assets::Column::Id)
            .all(self.db.as_ref())
            .await?)
    }

    pub async fn get_all(&self) -> Result<Vec<assets::Model>, AssetError> {
        Ok(assets::Entity::find()
            .order_by_asc(assets::Column::Id)
            .all(self.db.as_ref())
            .await?)
    }

    pub async fn get_by_id(&self, id: i32) -> Result<assets::Model, AssetError> {
        assets::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or(AssetError::NotFound(id))
    }

    pub async fn get_by_type(&self, asset_type: AssetType) -> Result<Vec<assets::Model>, AssetError> {
        Ok(assets::Entity::find()
            .filter(assets::Column::AssetType.eq(asset_type))
            .order_by_asc(assets::Column::Id)
            .all(self.db.as_ref())
            .await?)
    }

    pub async fn create(&self, request: CreateAssetRequest) -> Result<assets::Model, AssetError> {
        validate_fields(
            &request.name,
            &request.address,
            request.description.as_deref(),
            request.criticality,
        )?;

        let asset = assets::ActiveModel {
            name: Set(request.name.trim().to_string()),
            asset_type: Set(request.asset_type),
            address: Set(request.address.trim().to_string()),
            description: Set(request.description),
            criticality: Set(request.criticality),
            active: Set(true),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await?;

        info!(asset_id = asset.id, name = %asset.name, "registered asset");
        Ok(asset)
    }

    pub async fn update(
        &self,
        id: i32,
        request: UpdateAssetRequest,
    ) -> Result<assets::Model, AssetError> {
        validate_fields(
            &request.name,
            &request.address,
            request.description.as_deref(),
            request.criticality,
        )?;

        let existing = self.get_by_id(id).await?;

        let mut model: assets::ActiveModel = existing.into();
        model.name = Set(request.name.trim().to_string());
        model.asset_type = Set(request.asset_type);
        model.address = Set(request.address.trim().to_string());
        model.description = Set(request.description);
        model.criticality = Set(request.criticality);
        model.active = Set(request.active);

        let updated = model.update(self.db.as_ref()).await?;
        debug!(asset_id = updated.id, "updated asset");
        Ok(updated)
    }

    /// Soft delete: flips `active` to false. The row and its findings
    /// stay in place.
    pub async fn soft_delete(&self, id: i32) -> Result<(), AssetError> {
        let existing = self.get_by_id(id).await?;

        let mut model: assets::ActiveModel = existing.into();
        model.active = Set(false);
        model.update(self.db.as_ref()).await?;

        info!(asset_id = id, "soft-deleted asset");
        Ok(())
    }

    /// Hard delete: removes the asset and every finding it owns as one
    /// transaction.
    pub async fn hard_delete(&self, id: i32) -> Result<(), AssetError> {
        self.get_by_id(id).await?;

        let txn = self.db.begin().await?;

        vulnerabilities::Entity::delete_many()
            .filter(vulnerabilities::Column::AssetId.eq(id))
            .exec(&txn)
            .await?;

        assets::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;

        info!(asset_id = id, "hard-deleted asset and its findings");
        Ok(())
    }
}

/// Collect every violation before rejecting, so the caller sees the
/// full list instead of fixing one field at a time.
fn validate_fields(
    name: &str,
    address: &str,
    description: Option<&str>,
    criticality: i32,
) -> Result<(), AssetError> {
    let mut violations = Vec::new();

    let name = name.trim();
    // Bounds are in characters, not bytes; multibyte names count once
    // per character.
    let name_chars = name.chars().count();
    if name.is_empty() {
        violations.push("name is required".to_string());
    } else if !(NAME_MIN..=NAME_MAX).contains(&name_chars) {
        violations.push(format!(
            "name must be {}-{} characters",
            NAME_MIN, NAME_MAX
        ));
    }

    if address.trim().is_empty() {
        violations.push("address is required".to_string());
    }

    if let Some(description) = description {
        if description.chars().count() > DESCRIPTION_MAX {
            violations.push(format!(
                "description must be at most {} characters",
                DESCRIPTION_MAX
            ));
        }
    }

    if !(CRITICALITY_MIN..=CRITICALITY_MAX).contains(&criticality) {
        violations.push(format!(
            "criticality must be between {} and {}",
            CRITICALITY_MIN, CRITICALITY_MAX
        ));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(AssetError::Validation(violations))
    }
}
