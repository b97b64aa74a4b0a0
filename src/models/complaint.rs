use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Urgency tier assigned to a complaint
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, EnumString, Display,
)]
pub enum Severity {
    S, // Critical - life or infrastructure at risk
    A, // High - essential service disrupted
    B, // Medium - sanitation
    #[default]
    C, // No keyword matched
}

impl Severity {
    /// Get numeric priority (lower is more urgent)
    pub fn priority(&self) -> u8 {
        match self {
            Severity::S => 0,
            Severity::A => 1,
            Severity::B => 2,
            Severity::C => 3,
        }
    }
}

/// Outcome of classifying one complaint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Classification {
    pub department: String,
    pub severity: Severity,
}

/// A labelled sentence used to build department profiles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingExample {
    pub text: String,
    pub department: String,
}

impl TrainingExample {
    pub fn new(text: impl Into<String>, department: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            department: department.into(),
        }
    }
}

/// A complete row of the CSV training dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetRow {
    pub text: String,
    pub location: String,
    pub state: String,
    pub department: String,
}

impl DatasetRow {
    /// Feature string the trained pipeline learns from
    pub fn feature_text(&self) -> String {
        format!("{} {} {}", self.text, self.location, self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_severity_serializes_as_bare_code() {
        assert_eq!(serde_json::to_string(&Severity::S).unwrap(), "\"S\"");
        assert_eq!(Severity::from_str("B").unwrap(), Severity::B);
        assert_eq!(Severity::A.to_string(), "A");
    }

    #[test]
    fn test_severity_priority_order() {
        assert!(Severity::S.priority() < Severity::A.priority());
        assert!(Severity::A.priority() < Severity::B.priority());
        assert!(Severity::B.priority() < Severity::C.priority());
        assert_eq!(Severity::default(), Severity::C);
    }

    #[test]
    fn test_dataset_row_feature_text() {
        let row = DatasetRow {
            text: "no water".to_string(),
            location: "Pune".to_string(),
            state: "Maharashtra".to_string(),
            department: "State Water Supply".to_string(),
        };
        assert_eq!(row.feature_text(), "no water Pune Maharashtra");
    }
}
