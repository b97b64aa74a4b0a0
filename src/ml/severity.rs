use crate::models::Severity;

/// Trigger keywords per tier
const SEVERITY_RULES: &[(Severity, &[&str])] = &[
    (Severity::S, &["power", "electricity", "outage", "exploded"]),
    (Severity::A, &["water", "sewage"]),
    (Severity::B, &["waste", "garbage"]),
];

/// Assign a severity tier from complaint text.
///
/// The text is lower-cased and every tier with a keyword occurring anywhere
/// in it (substring match) is a candidate; the most urgent candidate by
/// [`Severity::priority`] wins. Text with no trigger keyword is
/// [`Severity::C`].
pub fn assess_severity(text: &str) -> Severity {
    let text = text.to_lowercase();

    SEVERITY_RULES
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|keyword| text.contains(keyword)))
        .map(|(severity, _)| *severity)
        .min_by_key(Severity::priority)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highest_tier_wins() {
        assert_eq!(assess_severity("power outage and garbage overflow"), Severity::S);
        assert_eq!(assess_severity("sewage and waste everywhere"), Severity::A);
    }

    #[test]
    fn test_each_tier() {
        assert_eq!(assess_severity("transformer exploded"), Severity::S);
        assert_eq!(assess_severity("no water supply for three days"), Severity::A);
        assert_eq!(assess_severity("garbage not collected on my street"), Severity::B);
    }

    #[test]
    fn test_default_tier() {
        assert_eq!(assess_severity("my neighbor's dog barks at night"), Severity::C);
        assert_eq!(assess_severity(""), Severity::C);
    }

    #[test]
    fn test_case_insensitive_substring_match() {
        assert_eq!(assess_severity("POWER cut"), Severity::S);
        // "powerful" contains "power"
        assert_eq!(assess_severity("a powerful smell"), Severity::S);
        assert_eq!(assess_severity("Wastewater pooling"), Severity::A);
    }

    #[test]
    fn test_every_rule_outranks_default() {
        for (severity, keywords) in SEVERITY_RULES {
            assert!(severity.priority() < Severity::default().priority());
            assert!(!keywords.is_empty());
        }
    }

    #[test]
    fn test_deterministic() {
        let text = "Leaking pipe causing water wastage in Mumbai";
        assert_eq!(assess_severity(text), assess_severity(text));
        assert_eq!(assess_severity(text), Severity::A);
    }
}
