use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::super::domain::{AssignmentCategory, ParticipantId};

/// How a computed percentage or point value is rounded before comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundingMethod {
    None,
    Decimals,
    Floor,
    Ceil,
    #[serde(other)]
    Unrecognized,
}

/// Declarative rounding configuration attached to a rule.
///
/// `decimals` is only read for [`RoundingMethod::Decimals`]; negative values
/// round to tens, hundreds, ... left of the decimal point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundingSpec {
    pub method: RoundingMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimals: Option<i32>,
}

impl RoundingSpec {
    pub const fn none() -> Self {
        Self {
            method: RoundingMethod::None,
            decimals: None,
        }
    }

    pub const fn decimals(decimals: i32) -> Self {
        Self {
            method: RoundingMethod::Decimals,
            decimals: Some(decimals),
        }
    }

    pub const fn floor() -> Self {
        Self {
            method: RoundingMethod::Floor,
            decimals: None,
        }
    }

    pub const fn ceil() -> Self {
        Self {
            method: RoundingMethod::Ceil,
            decimals: None,
        }
    }
}

impl Default for RoundingSpec {
    fn default() -> Self {
        Self::none()
    }
}

/// Tag selecting which rule variant a specification describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleKind {
    /// Total achieved points across the category reach a percentage.
    #[serde(rename = "OVERALL_PERCENT")]
    OverallPercent,
    /// Every assignment reaches a percentage, with a number of tolerated misses.
    #[serde(rename = "ALLOWED_FAILURES")]
    IndividualPercentWithAllowedFailures,
    /// A share of the assignments each reach a percentage.
    #[serde(rename = "PASSED_ASSIGNMENTS")]
    PassedXPercentWithAtLeastYPercent,
    /// Per-assignment pass list for detail views; never gates admission.
    #[serde(rename = "INDIVIDUAL_PERCENT")]
    IndividualPercent,
    #[serde(other, rename = "UNRECOGNIZED")]
    Unrecognized,
}

impl RuleKind {
    pub const fn label(self) -> &'static str {
        match self {
            RuleKind::OverallPercent => "overall percent",
            RuleKind::IndividualPercentWithAllowedFailures => {
                "individual percent with allowed failures"
            }
            RuleKind::PassedXPercentWithAtLeastYPercent => {
                "passed assignments with minimum percent"
            }
            RuleKind::IndividualPercent => "individual percent",
            RuleKind::Unrecognized => "unrecognized",
        }
    }
}

/// A configured admission rule as stored with the course.
///
/// `required_percent` is validated to lie in `[0, 100]` before it reaches the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionRuleSpec {
    pub kind: RuleKind,
    pub applies_to_category: AssignmentCategory,
    pub required_percent: f64,
    #[serde(default)]
    pub points_rounding: RoundingSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passed_assignments_percent: Option<f64>,
    #[serde(default)]
    pub passed_assignments_rounding: RoundingSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_failures: Option<u32>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub ignored_participants: BTreeSet<ParticipantId>,
}

impl AdmissionRuleSpec {
    fn base(kind: RuleKind, category: AssignmentCategory, required_percent: f64) -> Self {
        Self {
            kind,
            applies_to_category: category,
            required_percent,
            points_rounding: RoundingSpec::none(),
            passed_assignments_percent: None,
            passed_assignments_rounding: RoundingSpec::none(),
            allowed_failures: None,
            ignored_participants: BTreeSet::new(),
        }
    }

    pub fn overall_percent(category: AssignmentCategory, required_percent: f64) -> Self {
        Self::base(RuleKind::OverallPercent, category, required_percent)
    }

    pub fn allowed_failures(
        category: AssignmentCategory,
        required_percent: f64,
        allowed_failures: u32,
    ) -> Self {
        Self {
            allowed_failures: Some(allowed_failures),
            ..Self::base(
                RuleKind::IndividualPercentWithAllowedFailures,
                category,
                required_percent,
            )
        }
    }

    pub fn passed_assignments(
        category: AssignmentCategory,
        required_percent: f64,
        passed_assignments_percent: f64,
    ) -> Self {
        Self {
            passed_assignments_percent: Some(passed_assignments_percent),
            ..Self::base(
                RuleKind::PassedXPercentWithAtLeastYPercent,
                category,
                required_percent,
            )
        }
    }

    pub fn individual_percent(category: AssignmentCategory, required_percent: f64) -> Self {
        Self::base(RuleKind::IndividualPercent, category, required_percent)
    }

    pub fn with_points_rounding(mut self, rounding: RoundingSpec) -> Self {
        self.points_rounding = rounding;
        self
    }

    pub fn with_passed_assignments_rounding(mut self, rounding: RoundingSpec) -> Self {
        self.passed_assignments_rounding = rounding;
        self
    }

    pub fn ignoring(mut self, participant: ParticipantId) -> Self {
        self.ignored_participants.insert(participant);
        self
    }
}

/// Course-level configuration problems. Any of these stops the whole computation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AdmissionConfigError {
    #[error("course has no admission criteria")]
    NoAdmissionCriteria,
    #[error("unrecognized admission rule kind")]
    UnrecognizedRuleKind,
    #[error("unrecognized rounding method")]
    UnrecognizedRoundingMethod,
    #[error("{} rule is missing required field `{field}`", .kind.label())]
    MissingRuleField { kind: RuleKind, field: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_camel_case_rule_payload() {
        let spec: AdmissionRuleSpec = serde_json::from_value(json!({
            "kind": "PASSED_ASSIGNMENTS",
            "appliesToCategory": "HOMEWORK",
            "requiredPercent": 50.0,
            "pointsRounding": { "method": "DECIMALS", "decimals": 1 },
            "passedAssignmentsPercent": 75.0,
            "passedAssignmentsRounding": { "method": "CEIL" },
            "ignoredParticipants": ["s-007"]
        }))
        .expect("spec parses");

        assert_eq!(spec.kind, RuleKind::PassedXPercentWithAtLeastYPercent);
        assert_eq!(spec.applies_to_category, AssignmentCategory::Homework);
        assert_eq!(spec.points_rounding, RoundingSpec::decimals(1));
        assert_eq!(spec.passed_assignments_rounding, RoundingSpec::ceil());
        assert_eq!(spec.passed_assignments_percent, Some(75.0));
        assert!(spec
            .ignored_participants
            .contains(&ParticipantId("s-007".to_string())));
    }

    #[test]
    fn unknown_tags_deserialize_as_unrecognized() {
        let spec: AdmissionRuleSpec = serde_json::from_value(json!({
            "kind": "LEGACY_BONUS_RULE",
            "appliesToCategory": "PROJECT",
            "requiredPercent": 40.0,
            "pointsRounding": { "method": "BANKERS" }
        }))
        .expect("spec parses");

        assert_eq!(spec.kind, RuleKind::Unrecognized);
        assert_eq!(spec.points_rounding.method, RoundingMethod::Unrecognized);
    }

    #[test]
    fn rounding_defaults_to_none_when_omitted() {
        let spec: AdmissionRuleSpec = serde_json::from_value(json!({
            "kind": "OVERALL_PERCENT",
            "appliesToCategory": "ATTENDANCE",
            "requiredPercent": 80.0
        }))
        .expect("spec parses");

        assert_eq!(spec.points_rounding, RoundingSpec::none());
        assert!(spec.ignored_participants.is_empty());
        assert_eq!(spec.allowed_failures, None);
    }
}
