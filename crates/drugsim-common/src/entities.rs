//! Core entity types for the simulated design-and-test workflow.
//! Both records are session-scoped and replaced wholesale on every action.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// Candidate side-effect names that drugs and test results draw from.
pub const SIDE_EFFECT_VOCABULARY: [&str; 7] = [
    "Nausea",
    "Headache",
    "Dizziness",
    "Fatigue",
    "Insomnia",
    "Dry mouth",
    "Rash",
];

// ---------------------------------------------------------------------------
// Variant
// ---------------------------------------------------------------------------

/// Which flavour of the workflow the server runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Single page, pure randomness.
    Basic,
    /// Three-step wizard backed by the placeholder network.
    #[default]
    Enhanced,
}

impl Variant {
    /// Suffix appended to the reversed input to form the structure string.
    pub fn structure_suffix(self) -> &'static str {
        match self {
            Variant::Basic => "-mol",
            Variant::Enhanced => "-MOL",
        }
    }

    /// Number of base-36 characters after the `FX-` prefix.
    pub fn name_token_len(self) -> usize {
        match self {
            Variant::Basic => 5,
            Variant::Enhanced => 6,
        }
    }

    /// Size of the side-effect list attached to a freshly created drug.
    pub fn drug_side_effect_count(self) -> usize {
        match self {
            Variant::Basic => 3,
            Variant::Enhanced => 2,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Basic => f.write_str("basic"),
            Variant::Enhanced => f.write_str("enhanced"),
        }
    }
}

// ---------------------------------------------------------------------------
// FixedDecimal
// ---------------------------------------------------------------------------

/// A decimal value carried together with its display precision.
///
/// Serializes as a string such as `"42.7"` so clients see exactly the
/// precision the generator chose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedDecimal {
    value: f64,
    places: u8,
}

impl FixedDecimal {
    pub fn new(value: f64, places: u8) -> Self {
        Self { value, places }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn places(&self) -> u8 {
        self.places
    }
}

impl fmt::Display for FixedDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.*}", self.places as usize, self.value)
    }
}

impl Serialize for FixedDecimal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FixedDecimal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let value: f64 = raw.trim().parse().map_err(serde::de::Error::custom)?;
        let places = raw
            .split_once('.')
            .map(|(_, frac)| frac.len().min(u8::MAX as usize) as u8)
            .unwrap_or(0);
        Ok(Self { value, places })
    }
}

// ---------------------------------------------------------------------------
// Drug
// ---------------------------------------------------------------------------

/// The session's current fabricated compound.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Drug {
    pub id: Uuid,
    pub name: String,
    pub structure: String,
    /// Basic variant only.
    pub description: Option<String>,
    /// Enhanced variant only, g/mol.
    pub mol_weight: Option<FixedDecimal>,
    /// Enhanced variant only.
    pub log_p: Option<FixedDecimal>,
    pub side_effects: Vec<String>,
    pub variant: Variant,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// TestResult
// ---------------------------------------------------------------------------

/// The session's current fabricated prediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    pub drug_id: Uuid,
    /// Percentage in [0, 100], one decimal place.
    pub efficacy: FixedDecimal,
    /// Percentage in [0, 100], one decimal place.
    pub toxicity: FixedDecimal,
    pub side_effects: Vec<String>,
    pub tested_at: DateTime<Utc>,
}
