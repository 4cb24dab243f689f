use crate::domain::ports::TravelClassifier;
use crate::domain::travel::{TierPolicy, TravelTier};
use crate::utils::error::{MatchError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// One configured rule: a regex and the tier it selects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelRuleConfig {
    pub pattern: String,
    pub tier: TravelTier,
}

impl TravelRuleConfig {
    pub fn new(pattern: &str, tier: TravelTier) -> Self {
        Self {
            pattern: pattern.to_string(),
            tier,
        }
    }
}

/// Rules used when the settings file does not override them. First match wins.
pub fn default_rules() -> Vec<TravelRuleConfig> {
    vec![
        TravelRuleConfig::new(r"10.15\s*mile", TravelTier::UpTo15Miles),
        TravelRuleConfig::new(r"20.30\s*mile", TravelTier::UpTo30Miles),
        TravelRuleConfig::new(r"(?i)no.*transportation", TravelTier::NoTransportation),
        TravelRuleConfig::new(r"(?i)need.*site.*within", TravelTier::LocalArea),
    ]
}

#[derive(Debug, Clone)]
struct CompiledRule {
    regex: Regex,
    tier: TravelTier,
}

/// Ordered regex rules over the free-text travel answer.
#[derive(Debug, Clone)]
pub struct PatternClassifier {
    rules: Vec<CompiledRule>,
    policy: TierPolicy,
}

impl PatternClassifier {
    pub fn new(rules: &[TravelRuleConfig], policy: TierPolicy) -> Result<Self> {
        let compiled = rules
            .iter()
            .map(|rule| {
                Regex::new(&rule.pattern)
                    .map(|regex| CompiledRule {
                        regex,
                        tier: rule.tier,
                    })
                    .map_err(|e| MatchError::InvalidConfigValueError {
                        field: "travel.rules.pattern".to_string(),
                        value: rule.pattern.clone(),
                        reason: format!("Invalid regular expression: {}", e),
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            rules: compiled,
            policy,
        })
    }

    pub fn with_defaults(policy: TierPolicy) -> Result<Self> {
        Self::new(&default_rules(), policy)
    }

    pub fn policy(&self) -> TierPolicy {
        self.policy
    }
}

impl TravelClassifier for PatternClassifier {
    fn classify(&self, text: &str) -> Result<TravelTier> {
        self.rules
            .iter()
            .find(|rule| rule.regex.is_match(text))
            .map(|rule| rule.tier)
            .ok_or_else(|| MatchError::UnrecognizedTravelCapacity {
                text: text.to_string(),
            })
    }

    fn max_distance(&self, text: &str) -> Result<u32> {
        let tier = self.classify(text)?;
        let miles = self.policy.miles(tier);
        tracing::debug!("Travel answer '{}' classified as {} ({} miles)", text, tier, miles);
        Ok(miles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> PatternClassifier {
        PatternClassifier::with_defaults(TierPolicy::default()).unwrap()
    }

    #[test]
    fn test_default_rules_cover_survey_answers() {
        let c = classifier();
        assert_eq!(
            c.classify("I can drive 10-15 miles").unwrap(),
            TravelTier::UpTo15Miles
        );
        assert_eq!(c.classify("20-30 miles is fine").unwrap(), TravelTier::UpTo30Miles);
        assert_eq!(
            c.classify("I have No reliable Transportation").unwrap(),
            TravelTier::NoTransportation
        );
        assert_eq!(
            c.classify("I NEED a site WITHIN Iowa City").unwrap(),
            TravelTier::LocalArea
        );
    }

    #[test]
    fn test_max_distance_applies_policy() {
        let c = classifier();
        assert_eq!(c.max_distance("no transportation").unwrap(), 1);
        assert_eq!(c.max_distance("need a site within town").unwrap(), 8);
        assert_eq!(c.max_distance("10-15 miles").unwrap(), 15);
        // 10 與 15 之間只允許一個字元
        assert!(c.max_distance("10 to 15 miles").is_err());

        let strict = PatternClassifier::with_defaults(TierPolicy {
            no_transportation_miles: 0,
        })
        .unwrap();
        assert_eq!(strict.policy().no_transportation_miles, 0);
        assert_eq!(strict.max_distance("no transportation").unwrap(), 0);
    }

    #[test]
    fn test_unmatched_text_is_rejected() {
        let err = classifier().classify("depends on the weather").unwrap_err();
        assert!(matches!(
            err,
            MatchError::UnrecognizedTravelCapacity { text } if text == "depends on the weather"
        ));
        assert!(classifier().classify("").is_err());
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let rules = vec![
            TravelRuleConfig::new(r"(?i)miles", TravelTier::UpTo20Miles),
            TravelRuleConfig::new(r"10.15\s*mile", TravelTier::UpTo15Miles),
        ];
        let c = PatternClassifier::new(&rules, TierPolicy::default()).unwrap();
        assert_eq!(c.classify("10-15 miles").unwrap(), TravelTier::UpTo20Miles);
    }

    #[test]
    fn test_invalid_pattern_is_config_error() {
        let rules = vec![TravelRuleConfig::new(r"(unclosed", TravelTier::LocalArea)];
        let err = PatternClassifier::new(&rules, TierPolicy::default()).unwrap_err();
        assert!(matches!(err, MatchError::InvalidConfigValueError { .. }));
    }
}
