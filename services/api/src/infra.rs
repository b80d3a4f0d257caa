use course_admission::admission::{
    AdmissionRuleSpec, AssessmentRecord, AssignmentCategory, AssignmentId, AssignmentSummary,
    CourseDataSource, CourseId, CourseRecord, ParticipantAssessments, ParticipantId,
    RepositoryError, RoundingSpec, WorkflowState,
};
use course_admission::error::AppError;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, RwLock};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// File format of `APP_COURSE_SNAPSHOT`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct CourseSnapshot {
    pub(crate) courses: Vec<CourseRecord>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryCourseSource {
    courses: Arc<RwLock<HashMap<CourseId, CourseRecord>>>,
}

impl InMemoryCourseSource {
    pub(crate) fn from_records(records: impl IntoIterator<Item = CourseRecord>) -> Self {
        let courses = records
            .into_iter()
            .map(|record| (record.id.clone(), record))
            .collect();
        Self {
            courses: Arc::new(RwLock::new(courses)),
        }
    }

    pub(crate) fn from_snapshot_path(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path)?;
        let snapshot: CourseSnapshot = serde_json::from_str(&raw)?;
        info!(
            path = %path.display(),
            courses = snapshot.courses.len(),
            "loaded course snapshot"
        );
        Ok(Self::from_records(snapshot.courses))
    }

    /// Snapshot file if configured, otherwise the bundled demo course.
    pub(crate) fn load(snapshot: Option<&Path>) -> Result<Self, AppError> {
        match snapshot {
            Some(path) => Self::from_snapshot_path(path),
            None => Ok(Self::from_records([demo_course()])),
        }
    }

    pub(crate) fn course_ids(&self) -> Vec<CourseId> {
        let guard = self.courses.read().expect("course store lock poisoned");
        let mut ids: Vec<_> = guard.keys().cloned().collect();
        ids.sort();
        ids
    }

    fn course(&self, course: &CourseId) -> Result<CourseRecord, RepositoryError> {
        let guard = self
            .courses
            .read()
            .map_err(|_| RepositoryError::Unavailable("course store lock poisoned".to_string()))?;
        guard
            .get(course)
            .cloned()
            .ok_or_else(|| RepositoryError::CourseNotFound(course.clone()))
    }
}

impl CourseDataSource for InMemoryCourseSource {
    fn evaluated_assignments(
        &self,
        course: &CourseId,
    ) -> Result<Vec<AssignmentSummary>, RepositoryError> {
        Ok(self
            .course(course)?
            .assignments
            .into_iter()
            .filter(AssignmentSummary::is_evaluated)
            .collect())
    }

    fn admission_criteria(
        &self,
        course: &CourseId,
    ) -> Result<Vec<AdmissionRuleSpec>, RepositoryError> {
        Ok(self.course(course)?.admission_criteria)
    }

    fn participants_with_assessments(
        &self,
        course: &CourseId,
    ) -> Result<Vec<ParticipantAssessments>, RepositoryError> {
        Ok(self.course(course)?.participants)
    }

    fn participant_with_assessments(
        &self,
        course: &CourseId,
        participant: &ParticipantId,
    ) -> Result<ParticipantAssessments, RepositoryError> {
        self.course(course)?
            .participant(participant)
            .cloned()
            .ok_or_else(|| RepositoryError::ParticipantNotFound {
                course: course.clone(),
                participant: participant.clone(),
            })
    }
}

pub(crate) const DEMO_COURSE: &str = "demo-course";

fn sheet(id: &str, category: AssignmentCategory, max_points: f64) -> AssignmentSummary {
    AssignmentSummary {
        id: AssignmentId(id.to_string()),
        category,
        max_points,
        workflow_state: WorkflowState::Evaluated,
    }
}

fn scores(points: &[(&str, Option<f64>)]) -> Vec<AssessmentRecord> {
    points
        .iter()
        .map(|(id, achieved)| AssessmentRecord {
            assignment_id: AssignmentId(id.to_string()),
            achieved_points: *achieved,
        })
        .collect()
}

/// Small course used by `serve` without a snapshot and by the CLI demo.
pub(crate) fn demo_course() -> CourseRecord {
    let mut assignments = vec![
        sheet("sheet-1", AssignmentCategory::Homework, 20.0),
        sheet("sheet-2", AssignmentCategory::Homework, 20.0),
        sheet("sheet-3", AssignmentCategory::Homework, 20.0),
        sheet("talk", AssignmentCategory::Presentation, 10.0),
    ];
    assignments.push(AssignmentSummary {
        workflow_state: WorkflowState::InReview,
        ..sheet("sheet-4", AssignmentCategory::Homework, 20.0)
    });

    CourseRecord {
        id: CourseId(DEMO_COURSE.to_string()),
        assignments,
        admission_criteria: vec![
            AdmissionRuleSpec::overall_percent(AssignmentCategory::Homework, 50.0)
                .with_points_rounding(RoundingSpec::decimals(0)),
            AdmissionRuleSpec::passed_assignments(AssignmentCategory::Homework, 40.0, 60.0)
                .with_passed_assignments_rounding(RoundingSpec::ceil()),
            AdmissionRuleSpec::allowed_failures(AssignmentCategory::Presentation, 50.0, 0)
                .ignoring(ParticipantId("exchange-student".to_string())),
            AdmissionRuleSpec::individual_percent(AssignmentCategory::Homework, 50.0),
        ],
        participants: vec![
            ParticipantAssessments {
                participant: ParticipantId("ada".to_string()),
                assessments: scores(&[
                    ("sheet-1", Some(18.0)),
                    ("sheet-2", Some(15.5)),
                    ("sheet-3", Some(12.0)),
                    ("talk", Some(8.0)),
                ]),
            },
            ParticipantAssessments {
                participant: ParticipantId("brendan".to_string()),
                assessments: scores(&[
                    ("sheet-1", Some(10.0)),
                    ("sheet-2", Some(9.9)),
                    ("sheet-3", Some(10.0)),
                    ("talk", Some(4.0)),
                ]),
            },
            ParticipantAssessments {
                participant: ParticipantId("exchange-student".to_string()),
                assessments: scores(&[
                    ("sheet-1", Some(14.0)),
                    ("sheet-2", None),
                    ("sheet-3", Some(16.0)),
                ]),
            },
        ],
    }
}
