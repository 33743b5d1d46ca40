pub mod api_tokens;
pub mod assets;
pub mod types;
pub mod users;
pub mod vulnerabilities;

pub mod prelude;
