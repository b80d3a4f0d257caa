use serde::{Deserialize, Serialize};

use super::domain::{AssignmentSummary, CourseId, ParticipantAssessments, ParticipantId};
use super::evaluation::AdmissionRuleSpec;

/// Read-only access to the course data the engine consumes.
///
/// Implementations resolve persistence, access control and any fan-out to backing
/// services; the engine only sees the returned snapshots.
pub trait CourseDataSource: Send + Sync {
    fn evaluated_assignments(
        &self,
        course: &CourseId,
    ) -> Result<Vec<AssignmentSummary>, RepositoryError>;

    fn admission_criteria(
        &self,
        course: &CourseId,
    ) -> Result<Vec<AdmissionRuleSpec>, RepositoryError>;

    fn participants_with_assessments(
        &self,
        course: &CourseId,
    ) -> Result<Vec<ParticipantAssessments>, RepositoryError>;

    fn participant_with_assessments(
        &self,
        course: &CourseId,
        participant: &ParticipantId,
    ) -> Result<ParticipantAssessments, RepositoryError>;
}

/// Error enumeration for data source failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("course {0} not found")]
    CourseNotFound(CourseId),
    #[error("participant {participant} not found in course {course}")]
    ParticipantNotFound {
        course: CourseId,
        participant: ParticipantId,
    },
    #[error("course data unavailable: {0}")]
    Unavailable(String),
}

/// Everything known about one course, as exchanged in snapshot files and fixtures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRecord {
    pub id: CourseId,
    #[serde(default)]
    pub assignments: Vec<AssignmentSummary>,
    #[serde(default)]
    pub admission_criteria: Vec<AdmissionRuleSpec>,
    #[serde(default)]
    pub participants: Vec<ParticipantAssessments>,
}

impl CourseRecord {
    pub fn participant(&self, participant: &ParticipantId) -> Option<&ParticipantAssessments> {
        self.participants
            .iter()
            .find(|entry| &entry.participant == participant)
    }
}
