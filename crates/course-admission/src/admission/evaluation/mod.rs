mod config;
mod percent;
mod policy;
mod rounding;
mod rules;

pub use config::{AdmissionConfigError, AdmissionRuleSpec, RoundingMethod, RoundingSpec, RuleKind};
pub use percent::{amount_of_percent, percent_of};
pub use policy::AdmissionStatus;
pub use rounding::Rounding;
pub use rules::{
    AdmissionRule, AllowedFailuresRule, IndividualPercentRule, OverallPercentRule,
    PassThreshold, PassedAssignmentsRule, RuleCheck,
};

use super::domain::{
    evaluated_only, AssignmentCategory, AssignmentId, AssignmentSummary, ParticipantAssessments,
};
use policy::decide_admission;
use serde::{Deserialize, Serialize};

/// Rule set of one course, built once and evaluated against any number of participants.
///
/// Holds no mutable state after construction, so a shared reference can be handed to
/// several threads evaluating disjoint participants.
#[derive(Debug, Clone)]
pub struct AdmissionEngine {
    rules: Vec<AdmissionRule>,
}

impl AdmissionEngine {
    /// Filter to evaluated assignments and build one rule per specification.
    ///
    /// Fails with [`AdmissionConfigError::NoAdmissionCriteria`] unless at least one rule
    /// takes part in the admission decision.
    pub fn new(
        criteria: &[AdmissionRuleSpec],
        assignments: &[AssignmentSummary],
    ) -> Result<Self, AdmissionConfigError> {
        if criteria.is_empty() {
            return Err(AdmissionConfigError::NoAdmissionCriteria);
        }

        let evaluated = evaluated_only(assignments);
        let rules = criteria
            .iter()
            .map(|spec| AdmissionRule::create(spec, &evaluated))
            .collect::<Result<Vec<_>, _>>()?;

        // Detail-view rules alone cannot decide admission.
        if !rules.iter().any(AdmissionRule::gates_admission) {
            return Err(AdmissionConfigError::NoAdmissionCriteria);
        }

        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[AdmissionRule] {
        &self.rules
    }

    pub fn evaluate(&self, participant: &ParticipantAssessments) -> AdmissionStatus {
        let results = self
            .rules
            .iter()
            .filter(|rule| rule.gates_admission())
            .filter_map(|rule| {
                match rule.check(&participant.assessments, &participant.participant) {
                    RuleCheck::Verdict(result) => Some(result),
                    RuleCheck::Breakdown(_) => None,
                }
            })
            .collect();

        decide_admission(&participant.participant, results)
    }

    pub fn evaluate_all(&self, participants: &[ParticipantAssessments]) -> Vec<AdmissionStatus> {
        participants
            .iter()
            .map(|participant| self.evaluate(participant))
            .collect()
    }

    /// Per-assignment lists of every detail-view rule, in configuration order.
    pub fn breakdown(&self, participant: &ParticipantAssessments) -> Vec<AssignmentBreakdown> {
        self.rules
            .iter()
            .filter(|rule| !rule.gates_admission())
            .filter_map(|rule| {
                match rule.check(&participant.assessments, &participant.participant) {
                    RuleCheck::Breakdown(breakdown) => Some(breakdown),
                    RuleCheck::Verdict(_) => None,
                }
            })
            .collect()
    }
}

/// Result of checking one gating rule for one participant.
///
/// For the allowed-failures and passed-assignments rules `achieved_points` holds a count
/// (failed or passed assignments) rather than points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleCheckResult {
    pub passed: bool,
    pub achieved_points: f64,
    pub achieved_percent: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub rule_kind: RuleKind,
    pub assignment_category: AssignmentCategory,
}

/// Parallel per-assignment lists produced by the individual-percent rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentBreakdown {
    pub rule_kind: RuleKind,
    pub assignment_category: AssignmentCategory,
    pub assignments: Vec<AssignmentId>,
    pub achieved_points: Vec<f64>,
    pub achieved_percent: Vec<f64>,
    pub passed: Vec<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}
