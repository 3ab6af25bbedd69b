use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Borrow;
use std::fmt;

/// Department name exactly as it appears in the table (e.g., `Department of Physics`).
///
/// Names are compared byte-for-byte; no trimming or case folding happens on
/// either side of a lookup.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DepartmentName(pub String);

impl Borrow<str> for DepartmentName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Thematic grouping used for reporting and filtering.
///
/// The set is closed: tables naming any other label are rejected when loaded,
/// so there is no catch-all variant.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum CategoryLabel {
    EngineeringFutures,
    ScienceAndSolutions,
    HealthFutures,
    SustainabilityTransitions,
    DigitalAndAi,
    EnterpriseAndInnovation,
}

impl CategoryLabel {
    /// Every label, in declaration order.
    pub const ALL: [CategoryLabel; 6] = [
        CategoryLabel::EngineeringFutures,
        CategoryLabel::ScienceAndSolutions,
        CategoryLabel::HealthFutures,
        CategoryLabel::SustainabilityTransitions,
        CategoryLabel::DigitalAndAi,
        CategoryLabel::EnterpriseAndInnovation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryLabel::EngineeringFutures => "Engineering Futures",
            CategoryLabel::ScienceAndSolutions => "Science and Solutions",
            CategoryLabel::HealthFutures => "Health Futures",
            CategoryLabel::SustainabilityTransitions => "Sustainability Transitions",
            CategoryLabel::DigitalAndAi => "Digital & AI",
            CategoryLabel::EnterpriseAndInnovation => "Enterprise & Innovation",
        }
    }

    /// Parse a label by its exact display string.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|label| label.as_str() == value)
    }
}

impl fmt::Display for CategoryLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CategoryLabel {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CategoryLabel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown category label '{value}'")))
    }
}
