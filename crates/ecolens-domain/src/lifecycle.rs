//! Lifecycle stages

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stage of the product life cycle the record describes
///
/// Stages the analysis service reports outside the known list are carried as
/// [`LifecycleStage::Other`]; user edits must pick a known one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LifecycleStage {
    /// Extraction of raw materials
    RawMaterial,
    /// Manufacturing of parts
    Manufacturing,
    /// Assembly and production
    Production,
    /// Transport and distribution
    Distribution,
    /// Use phase
    Use,
    /// Disposal or recycling
    EndOfLife,
    /// Stage reported by the service that is not in the known list
    Other(String),
}

impl LifecycleStage {
    /// Known stages in life-cycle order
    pub const ALL: [LifecycleStage; 6] = [
        LifecycleStage::RawMaterial,
        LifecycleStage::Manufacturing,
        LifecycleStage::Production,
        LifecycleStage::Distribution,
        LifecycleStage::Use,
        LifecycleStage::EndOfLife,
    ];

    /// Wire names of the known stages, in the same order as [`Self::ALL`]
    pub const KNOWN_NAMES: [&'static str; 6] = [
        "raw-material",
        "manufacturing",
        "production",
        "distribution",
        "use",
        "end-of-life",
    ];

    /// Wire name of the stage
    pub fn as_str(&self) -> &str {
        match self {
            LifecycleStage::RawMaterial => "raw-material",
            LifecycleStage::Manufacturing => "manufacturing",
            LifecycleStage::Production => "production",
            LifecycleStage::Distribution => "distribution",
            LifecycleStage::Use => "use",
            LifecycleStage::EndOfLife => "end-of-life",
            LifecycleStage::Other(name) => name,
        }
    }

    /// Human-readable stage name
    ///
    /// Unknown stages are shown with their first letter capitalized.
    pub fn label(&self) -> String {
        let label = match self {
            LifecycleStage::RawMaterial => "Raw Material Extraction",
            LifecycleStage::Manufacturing => "Manufacturing",
            LifecycleStage::Production => "Production",
            LifecycleStage::Distribution => "Distribution",
            LifecycleStage::Use => "Use Phase",
            LifecycleStage::EndOfLife => "End of Life",
            LifecycleStage::Other(name) => {
                let mut chars = name.chars();
                return match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                };
            }
        };
        label.to_string()
    }

    /// Parse a known stage, tolerating case and `_`/space separators
    ///
    /// Returns `None` for anything outside the known list.
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "raw-material" | "raw-materials" | "raw-material-extraction" => {
                Some(LifecycleStage::RawMaterial)
            }
            "manufacturing" => Some(LifecycleStage::Manufacturing),
            "production" => Some(LifecycleStage::Production),
            "distribution" => Some(LifecycleStage::Distribution),
            "use" | "use-phase" => Some(LifecycleStage::Use),
            "end-of-life" | "eol" => Some(LifecycleStage::EndOfLife),
            _ => None,
        }
    }

    /// Whether this is one of the known stages
    pub fn is_known(&self) -> bool {
        !matches!(self, LifecycleStage::Other(_))
    }
}

impl From<String> for LifecycleStage {
    fn from(s: String) -> Self {
        LifecycleStage::parse(&s).unwrap_or(LifecycleStage::Other(s))
    }
}

impl From<LifecycleStage> for String {
    fn from(stage: LifecycleStage) -> Self {
        stage.as_str().to_string()
    }
}

impl fmt::Display for LifecycleStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
