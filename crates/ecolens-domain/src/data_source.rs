//! Life-cycle inventory data sources

use serde::{Deserialize, Serialize};
use std::fmt;

/// Dataset the backend uses for analysis and gap-filling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// Live OpenLCA instance
    #[serde(rename = "openlca")]
    OpenLca,
    /// Ecoinvent database
    Ecoinvent,
    /// Indian LCA database
    Indian,
    /// Dataset bundled with the backend
    #[default]
    Builtin,
}

impl DataSource {
    /// All selectable sources
    pub const ALL: [DataSource; 4] = [
        DataSource::OpenLca,
        DataSource::Ecoinvent,
        DataSource::Indian,
        DataSource::Builtin,
    ];

    /// Wire tag
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSource::OpenLca => "openlca",
            DataSource::Ecoinvent => "ecoinvent",
            DataSource::Indian => "indian",
            DataSource::Builtin => "builtin",
        }
    }

    /// Display name
    pub fn display_name(&self) -> &'static str {
        match self {
            DataSource::OpenLca => "OpenLCA",
            DataSource::Ecoinvent => "Ecoinvent",
            DataSource::Indian => "Indian LCA",
            DataSource::Builtin => "Built-in",
        }
    }

    /// Parse a wire tag
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "openlca" => Some(DataSource::OpenLca),
            "ecoinvent" => Some(DataSource::Ecoinvent),
            "indian" => Some(DataSource::Indian),
            "builtin" | "built-in" => Some(DataSource::Builtin),
            _ => None,
        }
    }
}

impl std::str::FromStr for DataSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid data source: {}", s))
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_matches_as_str() {
        for source in DataSource::ALL {
            let json = serde_json::to_string(&source).unwrap();
            assert_eq!(json, format!("\"{}\"", source.as_str()));
        }
    }

    #[test]
    fn test_default_is_builtin() {
        assert_eq!(DataSource::default(), DataSource::Builtin);
    }
}
