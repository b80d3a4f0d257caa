use std::collections::BTreeSet;

use super::super::domain::{
    AssessmentLookup, AssessmentRecord, AssignmentCategory, AssignmentId, AssignmentSummary,
    ParticipantId,
};
use super::config::{AdmissionConfigError, AdmissionRuleSpec, RuleKind};
use super::percent::{amount_of_percent, percent_of};
use super::rounding::Rounding;
use super::{AssignmentBreakdown, RuleCheckResult};

pub(crate) const IGNORED_COMMENT: &str = "Rule ignored for this participant.";
pub(crate) const NO_ACHIEVABLE_POINTS_COMMENT: &str = "No achievable points.";

/// Parts of a rule specification every variant needs while checking.
#[derive(Debug, Clone)]
struct RuleScope {
    kind: RuleKind,
    category: AssignmentCategory,
    required_percent: f64,
    points_rounding: Rounding,
    ignored: BTreeSet<ParticipantId>,
}

impl RuleScope {
    fn new(spec: &AdmissionRuleSpec) -> Result<Self, AdmissionConfigError> {
        Ok(Self {
            kind: spec.kind,
            category: spec.applies_to_category,
            required_percent: spec.required_percent,
            points_rounding: spec.points_rounding.resolve()?,
            ignored: spec.ignored_participants.clone(),
        })
    }

    fn matching(&self, assignments: &[AssignmentSummary]) -> Vec<AssignmentSummary> {
        assignments
            .iter()
            .filter(|assignment| assignment.category == self.category)
            .cloned()
            .collect()
    }

    fn is_ignored(&self, participant: &ParticipantId) -> bool {
        self.ignored.contains(participant)
    }

    fn result(
        &self,
        passed: bool,
        achieved_points: f64,
        achieved_percent: f64,
        comment: Option<&str>,
    ) -> RuleCheckResult {
        RuleCheckResult {
            passed,
            achieved_points,
            achieved_percent,
            comment: comment.map(str::to_string),
            rule_kind: self.kind,
            assignment_category: self.category,
        }
    }

    fn ignored_result(&self) -> RuleCheckResult {
        self.result(true, 0.0, 100.0, Some(IGNORED_COMMENT))
    }
}

/// Passes when the points achieved over all matching assignments reach the required share
/// of the achievable total.
#[derive(Debug, Clone)]
pub struct OverallPercentRule {
    scope: RuleScope,
    assignments: Vec<AssignmentId>,
    total_achievable: f64,
}

impl OverallPercentRule {
    fn new(
        spec: &AdmissionRuleSpec,
        assignments: &[AssignmentSummary],
    ) -> Result<Self, AdmissionConfigError> {
        let scope = RuleScope::new(spec)?;
        let matching = scope.matching(assignments);
        let total_achievable = matching
            .iter()
            .map(|assignment| assignment.max_points)
            .sum();

        Ok(Self {
            scope,
            assignments: matching
                .into_iter()
                .map(|assignment| assignment.id)
                .collect(),
            total_achievable,
        })
    }

    pub fn total_achievable(&self) -> f64 {
        self.total_achievable
    }

    pub fn check(
        &self,
        assessments: &[AssessmentRecord],
        participant: &ParticipantId,
    ) -> RuleCheckResult {
        if self.scope.is_ignored(participant) {
            return self.scope.ignored_result();
        }

        if self.total_achievable == 0.0 {
            return self
                .scope
                .result(true, 0.0, 100.0, Some(NO_ACHIEVABLE_POINTS_COMMENT));
        }

        let lookup = AssessmentLookup::new(assessments);
        let achieved: f64 = self.assignments.iter().map(|id| lookup.achieved(id)).sum();
        let achieved_percent = self
            .scope
            .points_rounding
            .apply(percent_of(achieved, self.total_achievable));

        self.scope.result(
            achieved_percent >= self.scope.required_percent,
            achieved,
            achieved_percent,
            None,
        )
    }
}

/// Every matching assignment has to reach the required percentage, but up to
/// `allowed_failures` of them may miss it.
///
/// `achieved_points` on the result carries the number of failed assignments.
#[derive(Debug, Clone)]
pub struct AllowedFailuresRule {
    scope: RuleScope,
    assignments: Vec<AssignmentSummary>,
    allowed_failures: u32,
}

impl AllowedFailuresRule {
    fn new(
        spec: &AdmissionRuleSpec,
        assignments: &[AssignmentSummary],
    ) -> Result<Self, AdmissionConfigError> {
        let allowed_failures = spec
            .allowed_failures
            .ok_or(AdmissionConfigError::MissingRuleField {
                kind: spec.kind,
                field: "allowedFailures",
            })?;
        let scope = RuleScope::new(spec)?;
        let assignments = scope.matching(assignments);

        Ok(Self {
            scope,
            assignments,
            allowed_failures,
        })
    }

    pub fn allowed_failures(&self) -> u32 {
        self.allowed_failures
    }

    pub fn check(
        &self,
        assessments: &[AssessmentRecord],
        participant: &ParticipantId,
    ) -> RuleCheckResult {
        if self.scope.is_ignored(participant) {
            return self.scope.ignored_result();
        }

        let lookup = AssessmentLookup::new(assessments);
        let failures = self
            .assignments
            .iter()
            .filter(|assignment| {
                let percent = assignment_percent(
                    lookup.achieved(&assignment.id),
                    assignment.max_points,
                    self.scope.points_rounding,
                );
                percent < self.scope.required_percent
            })
            .count() as u32;

        let achieved_percent = match (failures, self.allowed_failures) {
            (0, 0) => 0.0,
            (_, 0) => 100.0,
            (failures, allowed) => percent_of(failures as f64, allowed as f64),
        };

        self.scope.result(
            failures <= self.allowed_failures,
            failures as f64,
            achieved_percent,
            None,
        )
    }
}

/// Minimum points needed on one assignment under a [`PassedAssignmentsRule`].
#[derive(Debug, Clone, PartialEq)]
pub struct PassThreshold {
    pub assignment_id: AssignmentId,
    pub required_points: f64,
}

/// A share of the matching assignments has to be passed, each with at least the required
/// percentage of its points.
///
/// `achieved_points` on the result carries the number of passed assignments.
#[derive(Debug, Clone)]
pub struct PassedAssignmentsRule {
    scope: RuleScope,
    thresholds: Vec<PassThreshold>,
    required_assignment_count: f64,
}

impl PassedAssignmentsRule {
    fn new(
        spec: &AdmissionRuleSpec,
        assignments: &[AssignmentSummary],
    ) -> Result<Self, AdmissionConfigError> {
        let passed_assignments_percent = spec.passed_assignments_percent.ok_or(
            AdmissionConfigError::MissingRuleField {
                kind: spec.kind,
                field: "passedAssignmentsPercent",
            },
        )?;
        let count_rounding = spec.passed_assignments_rounding.resolve()?;
        let scope = RuleScope::new(spec)?;
        let matching = scope.matching(assignments);

        let thresholds = matching
            .iter()
            .map(|assignment| PassThreshold {
                assignment_id: assignment.id.clone(),
                required_points: scope
                    .points_rounding
                    .apply(amount_of_percent(assignment.max_points, scope.required_percent)),
            })
            .collect();
        let required_assignment_count = count_rounding.apply(amount_of_percent(
            matching.len() as f64,
            passed_assignments_percent,
        ));

        Ok(Self {
            scope,
            thresholds,
            required_assignment_count,
        })
    }

    pub fn thresholds(&self) -> &[PassThreshold] {
        &self.thresholds
    }

    pub fn required_points(&self, assignment_id: &AssignmentId) -> Option<f64> {
        self.thresholds
            .iter()
            .find(|threshold| &threshold.assignment_id == assignment_id)
            .map(|threshold| threshold.required_points)
    }

    pub fn required_assignment_count(&self) -> f64 {
        self.required_assignment_count
    }

    pub fn check(
        &self,
        assessments: &[AssessmentRecord],
        participant: &ParticipantId,
    ) -> RuleCheckResult {
        if self.scope.is_ignored(participant) {
            return self.scope.ignored_result();
        }

        let lookup = AssessmentLookup::new(assessments);
        let passed_count = self
            .thresholds
            .iter()
            .filter(|threshold| {
                lookup.achieved(&threshold.assignment_id) >= threshold.required_points
            })
            .count() as f64;

        if self.required_assignment_count == 0.0 {
            return self.scope.result(true, passed_count, 100.0, None);
        }

        self.scope.result(
            passed_count >= self.required_assignment_count,
            passed_count,
            percent_of(passed_count, self.required_assignment_count),
            None,
        )
    }
}

/// Per-assignment pass list used by detail views.
#[derive(Debug, Clone)]
pub struct IndividualPercentRule {
    scope: RuleScope,
    assignments: Vec<AssignmentSummary>,
}

impl IndividualPercentRule {
    fn new(
        spec: &AdmissionRuleSpec,
        assignments: &[AssignmentSummary],
    ) -> Result<Self, AdmissionConfigError> {
        let scope = RuleScope::new(spec)?;
        let assignments = scope.matching(assignments);
        Ok(Self { scope, assignments })
    }

    pub fn check(
        &self,
        assessments: &[AssessmentRecord],
        participant: &ParticipantId,
    ) -> AssignmentBreakdown {
        let count = self.assignments.len();
        let mut breakdown = AssignmentBreakdown {
            rule_kind: self.scope.kind,
            assignment_category: self.scope.category,
            assignments: self
                .assignments
                .iter()
                .map(|assignment| assignment.id.clone())
                .collect(),
            achieved_points: Vec::with_capacity(count),
            achieved_percent: Vec::with_capacity(count),
            passed: Vec::with_capacity(count),
            comment: None,
        };

        if self.scope.is_ignored(participant) {
            breakdown.achieved_points = vec![0.0; count];
            breakdown.achieved_percent = vec![100.0; count];
            breakdown.passed = vec![true; count];
            breakdown.comment = Some(IGNORED_COMMENT.to_string());
            return breakdown;
        }

        let lookup = AssessmentLookup::new(assessments);
        for assignment in &self.assignments {
            let achieved = lookup.achieved(&assignment.id);
            let percent =
                assignment_percent(achieved, assignment.max_points, self.scope.points_rounding);
            breakdown.achieved_points.push(achieved);
            breakdown.achieved_percent.push(percent);
            breakdown.passed.push(percent >= self.scope.required_percent);
        }

        breakdown
    }
}

/// Rounded percentage on a single assignment; an assignment worth nothing counts as complete.
fn assignment_percent(achieved: f64, max_points: f64, rounding: Rounding) -> f64 {
    if max_points == 0.0 {
        return 100.0;
    }
    rounding.apply(percent_of(achieved, max_points))
}

/// Outcome of checking one rule against one participant.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleCheck {
    /// A single verdict that takes part in the admission decision.
    Verdict(RuleCheckResult),
    /// A per-assignment list that is reported but never gates admission.
    Breakdown(AssignmentBreakdown),
}

/// Closed set of rule variants, built once per specification and shared by every
/// participant of a computation.
#[derive(Debug, Clone)]
pub enum AdmissionRule {
    OverallPercent(OverallPercentRule),
    AllowedFailures(AllowedFailuresRule),
    PassedAssignments(PassedAssignmentsRule),
    IndividualPercent(IndividualPercentRule),
}

impl AdmissionRule {
    /// Build the variant named by `spec.kind`, doing all participant-independent work up front.
    ///
    /// `assignments` is expected to hold evaluated assignments only.
    pub fn create(
        spec: &AdmissionRuleSpec,
        assignments: &[AssignmentSummary],
    ) -> Result<Self, AdmissionConfigError> {
        match spec.kind {
            RuleKind::OverallPercent => {
                OverallPercentRule::new(spec, assignments).map(AdmissionRule::OverallPercent)
            }
            RuleKind::IndividualPercentWithAllowedFailures => {
                AllowedFailuresRule::new(spec, assignments).map(AdmissionRule::AllowedFailures)
            }
            RuleKind::PassedXPercentWithAtLeastYPercent => {
                PassedAssignmentsRule::new(spec, assignments).map(AdmissionRule::PassedAssignments)
            }
            RuleKind::IndividualPercent => {
                IndividualPercentRule::new(spec, assignments).map(AdmissionRule::IndividualPercent)
            }
            RuleKind::Unrecognized => Err(AdmissionConfigError::UnrecognizedRuleKind),
        }
    }

    pub fn kind(&self) -> RuleKind {
        self.scope().kind
    }

    pub fn category(&self) -> AssignmentCategory {
        self.scope().category
    }

    /// Whether the rule contributes to the admission decision.
    pub fn gates_admission(&self) -> bool {
        !matches!(self, AdmissionRule::IndividualPercent(_))
    }

    pub fn check(
        &self,
        assessments: &[AssessmentRecord],
        participant: &ParticipantId,
    ) -> RuleCheck {
        match self {
            AdmissionRule::OverallPercent(rule) => {
                RuleCheck::Verdict(rule.check(assessments, participant))
            }
            AdmissionRule::AllowedFailures(rule) => {
                RuleCheck::Verdict(rule.check(assessments, participant))
            }
            AdmissionRule::PassedAssignments(rule) => {
                RuleCheck::Verdict(rule.check(assessments, participant))
            }
            AdmissionRule::IndividualPercent(rule) => {
                RuleCheck::Breakdown(rule.check(assessments, participant))
            }
        }
    }

    fn scope(&self) -> &RuleScope {
        match self {
            AdmissionRule::OverallPercent(rule) => &rule.scope,
            AdmissionRule::AllowedFailures(rule) => &rule.scope,
            AdmissionRule::PassedAssignments(rule) => &rule.scope,
            AdmissionRule::IndividualPercent(rule) => &rule.scope,
        }
    }
}
