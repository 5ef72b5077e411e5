//! Provenance tags for record fields

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a field's value came from
///
/// Every field shown to the user carries one of these. A field without an
/// explicit tag is displayed as [`Provenance::Ai`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Provenance {
    /// Extracted by the analysis service
    #[default]
    Ai,
    /// Filled with a system default
    Default,
    /// Looked up in the life-cycle inventory database
    Database,
    /// Entered or edited by the user
    User,
}

impl Provenance {
    /// Wire tag
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::Ai => "ai",
            Provenance::Default => "default",
            Provenance::Database => "openlca",
            Provenance::User => "user",
        }
    }

    /// Badge text
    pub fn label(&self) -> &'static str {
        match self {
            Provenance::Ai => "AI Extracted",
            Provenance::Default => "System Default",
            Provenance::Database => "OpenLCA Data",
            Provenance::User => "User Edited",
        }
    }

    /// Parse a tag, accepting the legacy aliases. Unknown tags map to `Ai`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "default" | "system" => Provenance::Default,
            "openlca" | "database" => Provenance::Database,
            "user" | "manual" => Provenance::User,
            _ => Provenance::Ai,
        }
    }
}

impl From<String> for Provenance {
    fn from(s: String) -> Self {
        Provenance::parse(&s)
    }
}

impl From<Provenance> for String {
    fn from(p: Provenance) -> Self {
        p.as_str().to_string()
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
