//! Closed enumerations shared by entities and services

use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use utoipa::ToSchema;

/// Severity rating of a finding.
///
/// The name-to-weight table is a fixed wire contract and must not
/// drift: CRITICAL 10.0, HIGH 7.0, MEDIUM 4.0, LOW 1.0, INFO 0.5.
/// NOTE: Use db_type = "Text" for SQLite compatibility.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, DeriveActiveEnum, EnumIter, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    #[sea_orm(string_value = "CRITICAL")]
    Critical,
    #[sea_orm(string_value = "HIGH")]
    High,
    #[sea_orm(string_value = "MEDIUM")]
    Medium,
    #[sea_orm(string_value = "LOW")]
    Low,
    #[sea_orm(string_value = "INFO")]
    Info,
}

impl Severity {
    /// All severities, most to least severe.
    pub const ALL: [Severity; 5] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
        Severity::Info,
    ];

    /// Fixed numeric weight feeding the risk score formula.
    pub fn weight(&self) -> f64 {
        match self {
            Severity::Critical => 10.0,
            Severity::High => 7.0,
            Severity::Medium => 4.0,
            Severity::Low => 1.0,
            Severity::Info => 0.5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
            Severity::Low => "LOW",
            Severity::Info => "INFO",
        }
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "CRITICAL" => Ok(Severity::Critical),
            "HIGH" => Ok(Severity::High),
            "MEDIUM" => Ok(Severity::Medium),
            "LOW" => Ok(Severity::Low),
            "INFO" => Ok(Severity::Info),
            other => Err(format!("Invalid severity: {}", other)),
        }
    }
}

/// Kind of monitored asset. Fixed enumeration.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, DeriveActiveEnum, EnumIter, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetType {
    #[sea_orm(string_value = "DOMAIN")]
    Domain,
    #[sea_orm(string_value = "IP_ADDRESS")]
    IpAddress,
    #[sea_orm(string_value = "API_ENDPOINT")]
    ApiEndpoint,
    #[sea_orm(string_value = "CLOUD_RESOURCE")]
    CloudResource,
    #[sea_orm(string_value = "WEB_APPLICATION")]
    WebApplication,
}

impl AssetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Domain => "DOMAIN",
            AssetType::IpAddress => "IP_ADDRESS",
            AssetType::ApiEndpoint => "API_ENDPOINT",
            AssetType::CloudResource => "CLOUD_RESOURCE",
            AssetType::WebApplication => "WEB_APPLICATION",
        }
    }
}

impl Display for AssetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AssetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DOMAIN" => Ok(AssetType::Domain),
            "IP_ADDRESS" => Ok(AssetType::IpAddress),
            "API_ENDPOINT" => Ok(AssetType::ApiEndpoint),
            "CLOUD_RESOURCE" => Ok(AssetType::CloudResource),
            "WEB_APPLICATION" => Ok(AssetType::WebApplication),
            other => Err(format!("Invalid asset type: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_weight_table_is_fixed() {
        assert_eq!(Severity::Critical.weight(), 10.0);
        assert_eq!(Severity::High.weight(), 7.0);
        assert_eq!(Severity::Medium.weight(), 4.0);
        assert_eq!(Severity::Low.weight(), 1.0);
        assert_eq!(Severity::Info.weight(), 0.5);
    }

    #[test]
    fn test_severity_from_str_roundtrip() {
        for severity in Severity::ALL {
            assert_eq!(severity.as_str().parse::<Severity>().unwrap(), severity);
        }
        assert!("BOGUS".parse::<Severity>().is_err());
    }

    #[test]
    fn test_severity_from_str_is_case_insensitive() {
        assert_eq!("critical".parse::<Severity>().unwrap(), Severity::Critical);
    }

    #[test]
    fn test_asset_type_from_str_roundtrip() {
        for raw in [
            "DOMAIN",
            "IP_ADDRESS",
            "API_ENDPOINT",
            "CLOUD_RESOURCE",
            "WEB_APPLICATION",
        ] {
            assert_eq!(raw.parse::<AssetType>().unwrap().as_str(), raw);
        }
        assert!("SERVER".parse::<AssetType>().is_err());
    }

    #[test]
    fn test_severity_serde_uses_uppercase_names() {
        let json = serde_json::to_string(&Severity::High).unwrap();
        assert_eq!(json, r#""HIGH""#);
        let back: Severity = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Severity::High);
    }
}
