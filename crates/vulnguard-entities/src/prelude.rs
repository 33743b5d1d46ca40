pub use super::api_tokens::Entity as ApiTokens;
pub use super::assets::Entity as Assets;
pub use super::types::{AssetType, Severity};
pub use super::users::Entity as Users;
pub use super::vulnerabilities::Entity as Vulnerabilities;
