//! Sentiment and urgency classification labels.
//!
//! These are the label sets the text oracle is asked to choose from.
//! Oracle output is free text, so parsing is lenient: an unrecognized
//! label degrades to the non-escalating default instead of failing, since
//! classification noise must never block triage.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Emotional tone of a client message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    #[default]
    Neutral,
    Angry,
    Frustrated,
    Stressed,
}

impl Sentiment {
    /// Parses an oracle label, falling back to `Neutral` on anything
    /// unrecognized (including garbled or empty output).
    pub fn parse_or_neutral(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "angry" => Self::Angry,
            "frustrated" => Self::Frustrated,
            "stressed" => Self::Stressed,
            "neutral" => Self::Neutral,
            _ => Self::Neutral,
        }
    }

    /// Returns true for the sentiments that trigger escalation.
    pub fn is_heated(&self) -> bool {
        matches!(self, Self::Angry | Self::Frustrated)
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Neutral => "Neutral",
            Self::Angry => "Angry",
            Self::Frustrated => "Frustrated",
            Self::Stressed => "Stressed",
        };
        write!(f, "{}", s)
    }
}

/// How time-critical an issue is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl Urgency {
    /// Parses an oracle label, falling back to `Low` on anything
    /// unrecognized.
    pub fn parse_or_low(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "low" => Self::Low,
            "medium" => Self::Medium,
            "high" => Self::High,
            "critical" => Self::Critical,
            _ => Self::Low,
        }
    }

    /// Returns true for the urgency levels that trigger escalation.
    pub fn is_pressing(&self) -> bool {
        matches!(self, Self::High | Self::Critical)
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod sentiment {
        use super::*;

        #[test]
        fn parses_known_labels_case_insensitively() {
            assert_eq!(Sentiment::parse_or_neutral("Angry"), Sentiment::Angry);
            assert_eq!(Sentiment::parse_or_neutral("FRUSTRATED"), Sentiment::Frustrated);
            assert_eq!(Sentiment::parse_or_neutral(" stressed "), Sentiment::Stressed);
            assert_eq!(Sentiment::parse_or_neutral("neutral"), Sentiment::Neutral);
        }

        #[test]
        fn unknown_label_degrades_to_neutral() {
            assert_eq!(Sentiment::parse_or_neutral("ecstatic"), Sentiment::Neutral);
            assert_eq!(Sentiment::parse_or_neutral(""), Sentiment::Neutral);
            assert_eq!(Sentiment::parse_or_neutral("{garbage"), Sentiment::Neutral);
        }

        #[test]
        fn only_angry_and_frustrated_are_heated() {
            assert!(Sentiment::Angry.is_heated());
            assert!(Sentiment::Frustrated.is_heated());
            assert!(!Sentiment::Neutral.is_heated());
            assert!(!Sentiment::Stressed.is_heated());
        }

        #[test]
        fn serializes_to_snake_case() {
            let json = serde_json::to_string(&Sentiment::Frustrated).unwrap();
            assert_eq!(json, "\"frustrated\"");
        }
    }

    mod urgency {
        use super::*;

        #[test]
        fn parses_known_labels() {
            assert_eq!(Urgency::parse_or_low("Critical"), Urgency::Critical);
            assert_eq!(Urgency::parse_or_low("high"), Urgency::High);
            assert_eq!(Urgency::parse_or_low("Medium"), Urgency::Medium);
        }

        #[test]
        fn unknown_label_degrades_to_low() {
            assert_eq!(Urgency::parse_or_low("urgent-ish"), Urgency::Low);
            assert_eq!(Urgency::parse_or_low(""), Urgency::Low);
        }

        #[test]
        fn only_high_and_critical_are_pressing() {
            assert!(Urgency::High.is_pressing());
            assert!(Urgency::Critical.is_pressing());
            assert!(!Urgency::Low.is_pressing());
            assert!(!Urgency::Medium.is_pressing());
        }

        #[test]
        fn display_matches_oracle_label_set() {
            assert_eq!(Urgency::Critical.to_string(), "Critical");
            assert_eq!(Sentiment::Angry.to_string(), "Angry");
        }
    }
}
