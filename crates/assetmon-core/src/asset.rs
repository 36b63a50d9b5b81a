//! Asset records as delivered by `GET /api/assets`.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One monitored asset.
///
/// Snapshots are owned by the pull layer and replaced wholesale on every
/// successful fetch; they are never edited in place.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetRecord {
    /// Stable unique identifier (e.g., "AST-001").
    pub id: String,
    /// Display name.
    pub name: String,
    /// Category tag (e.g., "pump", "compressor").
    #[serde(rename = "type")]
    pub asset_type: String,
    /// Site or building.
    pub location: String,
    /// Category tag (e.g., "operational", "standby", "maintenance").
    pub status: String,
    /// Timestamp of the last update, as sent by the server.
    pub last_updated: String,
}

impl AssetRecord {
    /// Get the value of a field by key.
    pub fn field(&self, field: AssetField) -> &str {
        match field {
            AssetField::Id => &self.id,
            AssetField::Name => &self.name,
            AssetField::Type => &self.asset_type,
            AssetField::Location => &self.location,
            AssetField::Status => &self.status,
            AssetField::LastUpdated => &self.last_updated,
        }
    }
}

/// Addressable fields of an [`AssetRecord`].
///
/// Used as the table's sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetField {
    Id,
    #[default]
    Name,
    #[serde(rename = "type")]
    Type,
    Location,
    Status,
    LastUpdated,
}

impl AssetField {
    /// All fields, in table column order.
    pub const ALL: [AssetField; 6] = [
        AssetField::Name,
        AssetField::Type,
        AssetField::Location,
        AssetField::Status,
        AssetField::LastUpdated,
        AssetField::Id,
    ];

    /// Wire/column name of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Type => "type",
            Self::Location => "location",
            Self::Status => "status",
            Self::LastUpdated => "last_updated",
        }
    }
}

impl std::fmt::Display for AssetField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetField {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "id" => Ok(Self::Id),
            "name" => Ok(Self::Name),
            "type" => Ok(Self::Type),
            "location" => Ok(Self::Location),
            "status" => Ok(Self::Status),
            "last_updated" | "last-updated" => Ok(Self::LastUpdated),
            other => Err(CoreError::UnknownField(other.to_string())),
        }
    }
}
