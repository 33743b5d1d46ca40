//! Database migrations for the VulnGuard application

pub use sea_orm_migration::prelude::*;

mod migration;

pub use migration::Migrator;
