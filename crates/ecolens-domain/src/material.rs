//! Material categories

use serde::{Deserialize, Serialize};
use std::fmt;

/// Material a product is primarily made of
///
/// The analysis service is free to report categories outside the known list;
/// those are carried as [`MaterialType::Other`] so a response is never
/// rejected for an unfamiliar material. User edits must pick a known one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MaterialType {
    /// Aluminium and its alloys
    Aluminum,
    /// Steel (including stainless)
    Steel,
    /// Copper
    Copper,
    /// Any polymer
    Plastic,
    /// Glass
    Glass,
    /// Paper
    Paper,
    /// Corrugated or folding board
    Cardboard,
    /// Wood
    Wood,
    /// Woven or knitted fabric
    Textile,
    /// Multi-material laminate
    Composite,
    /// Category reported by the service that is not in the known list
    Other(String),
}

impl MaterialType {
    /// All categories a user may choose from
    pub const KNOWN: [MaterialType; 10] = [
        MaterialType::Aluminum,
        MaterialType::Steel,
        MaterialType::Copper,
        MaterialType::Plastic,
        MaterialType::Glass,
        MaterialType::Paper,
        MaterialType::Cardboard,
        MaterialType::Wood,
        MaterialType::Textile,
        MaterialType::Composite,
    ];

    /// Wire names of the known categories, in the same order as [`Self::KNOWN`]
    pub const KNOWN_NAMES: [&'static str; 10] = [
        "aluminum",
        "steel",
        "copper",
        "plastic",
        "glass",
        "paper",
        "cardboard",
        "wood",
        "textile",
        "composite",
    ];

    /// Wire name of the category
    pub fn as_str(&self) -> &str {
        match self {
            MaterialType::Aluminum => "aluminum",
            MaterialType::Steel => "steel",
            MaterialType::Copper => "copper",
            MaterialType::Plastic => "plastic",
            MaterialType::Glass => "glass",
            MaterialType::Paper => "paper",
            MaterialType::Cardboard => "cardboard",
            MaterialType::Wood => "wood",
            MaterialType::Textile => "textile",
            MaterialType::Composite => "composite",
            MaterialType::Other(name) => name,
        }
    }

    /// Parse one of the known categories, case-insensitively
    ///
    /// Returns `None` for anything outside the known list.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "aluminum" | "aluminium" => Some(MaterialType::Aluminum),
            "steel" | "stainless steel" => Some(MaterialType::Steel),
            "copper" => Some(MaterialType::Copper),
            "plastic" => Some(MaterialType::Plastic),
            "glass" => Some(MaterialType::Glass),
            "paper" => Some(MaterialType::Paper),
            "cardboard" => Some(MaterialType::Cardboard),
            "wood" => Some(MaterialType::Wood),
            "textile" => Some(MaterialType::Textile),
            "composite" => Some(MaterialType::Composite),
            _ => None,
        }
    }

    /// Whether this is one of the known categories
    pub fn is_known(&self) -> bool {
        !matches!(self, MaterialType::Other(_))
    }

    /// Display name with the first letter capitalized
    pub fn label(&self) -> String {
        let name = self.as_str();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl From<String> for MaterialType {
    fn from(s: String) -> Self {
        MaterialType::parse(&s).unwrap_or(MaterialType::Other(s))
    }
}

impl From<MaterialType> for String {
    fn from(m: MaterialType) -> Self {
        m.as_str().to_string()
    }
}

impl fmt::Display for MaterialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
