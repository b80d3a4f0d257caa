use serde::{Deserialize, Serialize};

use super::domain::{
    evaluated_only, AssessmentLookup, AssignmentSummary, ParticipantAssessments, ParticipantId,
};

/// Achieved points of one participant, positionally aligned with
/// [`PointsOverview::assignments`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantPoints {
    pub participant: ParticipantId,
    pub achieved_points: Vec<f64>,
}

impl ParticipantPoints {
    pub fn total(&self) -> f64 {
        self.achieved_points.iter().sum()
    }
}

/// Tabular report of achieved points per participant per evaluated assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointsOverview {
    pub assignments: Vec<AssignmentSummary>,
    #[serde(rename = "results")]
    pub per_participant: Vec<ParticipantPoints>,
}

impl PointsOverview {
    /// Build the overview over evaluated assignments only; missing assessments read as 0.
    pub fn compute(
        assignments: &[AssignmentSummary],
        participants: &[ParticipantAssessments],
    ) -> Self {
        let assignments = evaluated_only(assignments);
        let per_participant = participants
            .iter()
            .map(|participant| {
                let lookup = AssessmentLookup::new(&participant.assessments);
                ParticipantPoints {
                    participant: participant.participant.clone(),
                    achieved_points: assignments
                        .iter()
                        .map(|assignment| lookup.achieved(&assignment.id))
                        .collect(),
                }
            })
            .collect();

        Self {
            assignments,
            per_participant,
        }
    }

    pub fn max_points(&self) -> f64 {
        self.assignments
            .iter()
            .map(|assignment| assignment.max_points)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admission::domain::{
        AssessmentRecord, AssignmentCategory, AssignmentId, WorkflowState,
    };

    fn assignment(id: &str, max_points: f64, state: WorkflowState) -> AssignmentSummary {
        AssignmentSummary {
            id: AssignmentId(id.to_string()),
            category: AssignmentCategory::Homework,
            max_points,
            workflow_state: state,
        }
    }

    fn record(id: &str, points: Option<f64>) -> AssessmentRecord {
        AssessmentRecord {
            assignment_id: AssignmentId(id.to_string()),
            achieved_points: points,
        }
    }

    #[test]
    fn missing_assessments_are_reported_as_zero() {
        let assignments = vec![
            assignment("h1", 10.0, WorkflowState::Evaluated),
            assignment("h2", 20.0, WorkflowState::Evaluated),
            assignment("h3", 30.0, WorkflowState::Evaluated),
        ];
        let participants = vec![ParticipantAssessments {
            participant: ParticipantId("s-1".to_string()),
            assessments: vec![record("h1", Some(8.0)), record("h3", None)],
        }];

        let overview = PointsOverview::compute(&assignments, &participants);

        assert_eq!(overview.per_participant.len(), 1);
        assert_eq!(overview.per_participant[0].achieved_points, vec![8.0, 0.0, 0.0]);
        assert_eq!(overview.per_participant[0].total(), 8.0);
        assert_eq!(overview.max_points(), 60.0);
    }

    #[test]
    fn only_evaluated_assignments_are_columns() {
        let assignments = vec![
            assignment("h1", 10.0, WorkflowState::InReview),
            assignment("h2", 20.0, WorkflowState::Evaluated),
        ];
        let participants = vec![ParticipantAssessments {
            participant: ParticipantId("s-1".to_string()),
            assessments: vec![record("h1", Some(9.0)), record("h2", Some(15.0))],
        }];

        let overview = PointsOverview::compute(&assignments, &participants);

        assert_eq!(overview.assignments.len(), 1);
        assert_eq!(overview.assignments[0].id, AssignmentId("h2".to_string()));
        assert_eq!(overview.per_participant[0].achieved_points, vec![15.0]);
    }

    #[test]
    fn serializes_participants_under_results() {
        let overview = PointsOverview::compute(&[], &[]);
        let json = serde_json::to_value(&overview).expect("serializes");
        assert!(json.get("results").is_some());
        assert!(json.get("per_participant").is_none());
    }
}
