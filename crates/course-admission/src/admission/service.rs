use std::sync::Arc;

use tracing::{debug, info, warn};

use super::domain::{CourseId, ParticipantAssessments, ParticipantId};
use super::evaluation::{
    AdmissionConfigError, AdmissionEngine, AdmissionStatus, AssignmentBreakdown,
};
use super::points::PointsOverview;
use super::repository::{CourseDataSource, RepositoryError};

/// Service composing the course data source with the admission engine.
pub struct AdmissionService<S> {
    source: Arc<S>,
}

impl<S> AdmissionService<S>
where
    S: CourseDataSource + 'static,
{
    pub fn new(source: Arc<S>) -> Self {
        Self { source }
    }

    /// Admission status of every participant of the course.
    pub fn compute_admission_status_for_all(
        &self,
        course: &CourseId,
    ) -> Result<Vec<AdmissionStatus>, AdmissionServiceError> {
        let engine = self.engine(course)?;
        let participants = self.source.participants_with_assessments(course)?;
        Ok(self.evaluate(course, &engine, &participants))
    }

    /// Admission status of a single participant, evaluated exactly like the course-wide path.
    pub fn compute_admission_status_for_one(
        &self,
        course: &CourseId,
        participant: &ParticipantId,
    ) -> Result<AdmissionStatus, AdmissionServiceError> {
        let engine = self.engine(course)?;
        let participant = self
            .source
            .participant_with_assessments(course, participant)?;
        let participant_id = participant.participant.clone();

        self.evaluate(course, &engine, &[participant])
            .pop()
            .ok_or_else(|| {
                RepositoryError::ParticipantNotFound {
                    course: course.clone(),
                    participant: participant_id,
                }
                .into()
            })
    }

    /// Points table over all evaluated assignments and participants of the course.
    pub fn compute_points_overview(
        &self,
        course: &CourseId,
    ) -> Result<PointsOverview, AdmissionServiceError> {
        let assignments = self.source.evaluated_assignments(course)?;
        let participants = self.source.participants_with_assessments(course)?;
        let overview = PointsOverview::compute(&assignments, &participants);

        debug!(
            course = %course,
            assignments = overview.assignments.len(),
            participants = overview.per_participant.len(),
            "computed points overview"
        );
        Ok(overview)
    }

    pub fn compute_points_overview_for_one(
        &self,
        course: &CourseId,
        participant: &ParticipantId,
    ) -> Result<PointsOverview, AdmissionServiceError> {
        let assignments = self.source.evaluated_assignments(course)?;
        let participant = self
            .source
            .participant_with_assessments(course, participant)?;

        Ok(PointsOverview::compute(&assignments, &[participant]))
    }

    /// Per-assignment detail lists of the course's individual-percent rules.
    pub fn compute_assignment_breakdown_for_one(
        &self,
        course: &CourseId,
        participant: &ParticipantId,
    ) -> Result<Vec<AssignmentBreakdown>, AdmissionServiceError> {
        let engine = self.engine(course)?;
        let participant = self
            .source
            .participant_with_assessments(course, participant)?;

        Ok(engine.breakdown(&participant))
    }

    fn engine(&self, course: &CourseId) -> Result<AdmissionEngine, AdmissionServiceError> {
        let criteria = self.source.admission_criteria(course)?;
        let assignments = self.source.evaluated_assignments(course)?;

        AdmissionEngine::new(&criteria, &assignments).map_err(|error| {
            warn!(course = %course, %error, "admission criteria rejected");
            AdmissionServiceError::from(error)
        })
    }

    fn evaluate(
        &self,
        course: &CourseId,
        engine: &AdmissionEngine,
        participants: &[ParticipantAssessments],
    ) -> Vec<AdmissionStatus> {
        let statuses = engine.evaluate_all(participants);
        let admitted = statuses.iter().filter(|status| status.has_admission).count();

        info!(
            course = %course,
            rules = engine.rules().len(),
            participants = statuses.len(),
            admitted,
            "computed admission status"
        );
        statuses
    }
}

/// Error raised by the admission service.
#[derive(Debug, thiserror::Error)]
pub enum AdmissionServiceError {
    #[error(transparent)]
    Configuration(#[from] AdmissionConfigError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
