use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier wrapper for courses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CourseId(pub String);

/// Identifier wrapper for course participants (students).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParticipantId(pub String);

/// Identifier wrapper for assignments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssignmentId(pub String);

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for AssignmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Assignment type tag that admission rules are scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignmentCategory {
    Homework,
    Presentation,
    Attendance,
    Project,
    Seminar,
    Other,
}

impl AssignmentCategory {
    pub const fn label(self) -> &'static str {
        match self {
            AssignmentCategory::Homework => "homework",
            AssignmentCategory::Presentation => "presentation",
            AssignmentCategory::Attendance => "attendance",
            AssignmentCategory::Project => "project",
            AssignmentCategory::Seminar => "seminar",
            AssignmentCategory::Other => "other",
        }
    }
}

/// Grading workflow state of an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkflowState {
    Created,
    Published,
    InReview,
    Evaluated,
}

impl WorkflowState {
    pub const fn label(self) -> &'static str {
        match self {
            WorkflowState::Created => "created",
            WorkflowState::Published => "published",
            WorkflowState::InReview => "in_review",
            WorkflowState::Evaluated => "evaluated",
        }
    }
}

/// Snapshot of an assignment as handed over by the course subsystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentSummary {
    pub id: AssignmentId,
    pub category: AssignmentCategory,
    pub max_points: f64,
    pub workflow_state: WorkflowState,
}

impl AssignmentSummary {
    pub fn is_evaluated(&self) -> bool {
        self.workflow_state == WorkflowState::Evaluated
    }
}

/// Keep only assignments whose grading has finished, preserving order.
///
/// Both the admission pipeline and the points overview go through this filter.
pub fn evaluated_only(assignments: &[AssignmentSummary]) -> Vec<AssignmentSummary> {
    assignments
        .iter()
        .filter(|assignment| assignment.is_evaluated())
        .cloned()
        .collect()
}

/// Graded result of one participant for one assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentRecord {
    pub assignment_id: AssignmentId,
    #[serde(default)]
    pub achieved_points: Option<f64>,
}

/// A participant together with every assessment recorded for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantAssessments {
    pub participant: ParticipantId,
    #[serde(default)]
    pub assessments: Vec<AssessmentRecord>,
}

/// Assessment records of one participant keyed by assignment.
///
/// Missing records and records without points both read as 0.
pub(crate) struct AssessmentLookup<'a> {
    points: BTreeMap<&'a AssignmentId, f64>,
}

impl<'a> AssessmentLookup<'a> {
    pub(crate) fn new(assessments: &'a [AssessmentRecord]) -> Self {
        let points = assessments
            .iter()
            .map(|record| {
                (
                    &record.assignment_id,
                    record.achieved_points.unwrap_or(0.0),
                )
            })
            .collect();
        Self { points }
    }

    pub(crate) fn achieved(&self, assignment_id: &AssignmentId) -> f64 {
        self.points.get(assignment_id).copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment(id: &str, state: WorkflowState) -> AssignmentSummary {
        AssignmentSummary {
            id: AssignmentId(id.to_string()),
            category: AssignmentCategory::Homework,
            max_points: 10.0,
            workflow_state: state,
        }
    }

    #[test]
    fn evaluated_only_keeps_order_and_drops_open_assignments() {
        let assignments = vec![
            assignment("a1", WorkflowState::Evaluated),
            assignment("a2", WorkflowState::InReview),
            assignment("a3", WorkflowState::Evaluated),
            assignment("a4", WorkflowState::Published),
        ];

        let ids: Vec<_> = evaluated_only(&assignments)
            .into_iter()
            .map(|assignment| assignment.id.0)
            .collect();

        assert_eq!(ids, vec!["a1", "a3"]);
    }

    #[test]
    fn lookup_defaults_missing_points_to_zero() {
        let records = vec![
            AssessmentRecord {
                assignment_id: AssignmentId("graded".to_string()),
                achieved_points: Some(7.5),
            },
            AssessmentRecord {
                assignment_id: AssignmentId("ungraded".to_string()),
                achieved_points: None,
            },
        ];
        let lookup = AssessmentLookup::new(&records);

        assert_eq!(lookup.achieved(&AssignmentId("graded".to_string())), 7.5);
        assert_eq!(lookup.achieved(&AssignmentId("ungraded".to_string())), 0.0);
        assert_eq!(lookup.achieved(&AssignmentId("absent".to_string())), 0.0);
    }

    #[test]
    fn assignment_summary_uses_camel_case_wire_names() {
        let json = serde_json::to_value(assignment("a1", WorkflowState::Evaluated))
            .expect("serializes");
        assert_eq!(json["maxPoints"], 10.0);
        assert_eq!(json["workflowState"], "EVALUATED");
        assert_eq!(json["category"], "HOMEWORK");
        assert_eq!(json["id"], "a1");
    }
}
