use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ========================================
        // USERS TABLE
        // ========================================
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(ColumnDef::new(Users::Email).string().not_null())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_users_email")
                    .table(Users::Table)
                    .col(Users::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ========================================
        // API_TOKENS TABLE
        // ========================================
        manager
            .create_table(
                Table::create()
                    .table(ApiTokens::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ApiTokens::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ApiTokens::UserId).integer().not_null())
                    .col(
                        ColumnDef::new(ApiTokens::TokenHash)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(ApiTokens::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ApiTokens::ExpiresAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_api_tokens_user")
                            .from(ApiTokens::Table, ApiTokens::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ========================================
        // ASSETS TABLE
        // ========================================
        manager
            .create_table(
                Table::create()
                    .table(Assets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Assets::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Assets::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Assets::AssetType).text().not_null())
                    .col(ColumnDef::new(Assets::Address).string_len(255).not_null())
                    .col(ColumnDef::new(Assets::Description).string_len(500).null())
                    .col(ColumnDef::new(Assets::Criticality).integer().not_null())
                    .col(
                        ColumnDef::new(Assets::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Assets::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Assets::LastScannedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_assets_active")
                    .table(Assets::Table)
                    .col(Assets::Active)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_assets_asset_type")
                    .table(Assets::Table)
                    .col(Assets::AssetType)
                    .to_owned(),
            )
            .await?;

        // ========================================
        // VULNERABILITIES TABLE
        // ========================================
        manager
            .create_table(
                Table::create()
                    .table(Vulnerabilities::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Vulnerabilities::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Vulnerabilities::CveId).string().not_null())
                    .col(ColumnDef::new(Vulnerabilities::Title).string().not_null())
                    .col(ColumnDef::new(Vulnerabilities::Severity).text().not_null())
                    .col(
                        ColumnDef::new(Vulnerabilities::CvssScore)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Vulnerabilities::DiscoveredAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Vulnerabilities::AgeInDays)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Vulnerabilities::Remediated)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Vulnerabilities::RiskScore)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Vulnerabilities::AssetId)
                            .integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vulnerabilities_asset")
                            .from(Vulnerabilities::Table, Vulnerabilities::AssetId)
                            .to(Assets::Table, Assets::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_vulnerabilities_asset_id")
                    .table(Vulnerabilities::Table)
                    .col(Vulnerabilities::AssetId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_vulnerabilities_remediated")
                    .table(Vulnerabilities::Table)
                    .col(Vulnerabilities::Remediated)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_vulnerabilities_severity")
                    .table(Vulnerabilities::Table)
                    .col(Vulnerabilities::Severity)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Vulnerabilities::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Assets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ApiTokens::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Name,
    Email,
    PasswordHash,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ApiTokens {
    Table,
    Id,
    UserId,
    TokenHash,
    CreatedAt,
    ExpiresAt,
}

#[derive(DeriveIden)]
enum Assets {
    Table,
    Id,
    Name,
    AssetType,
    Address,
    Description,
    Criticality,
    Active,
    CreatedAt,
    LastScannedAt,
}

#[derive(DeriveIden)]
enum Vulnerabilities {
    Table,
    Id,
    CveId,
    Title,
    Severity,
    CvssScore,
    DiscoveredAt,
    AgeInDays,
    Remediated,
    RiskScore,
    AssetId,
}
