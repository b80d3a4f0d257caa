use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::admission::domain::{
    AssessmentRecord, AssignmentCategory, AssignmentId, AssignmentSummary, CourseId,
    ParticipantAssessments, ParticipantId, WorkflowState,
};
use crate::admission::evaluation::AdmissionRuleSpec;
use crate::admission::repository::{CourseDataSource, CourseRecord, RepositoryError};
use crate::admission::service::AdmissionService;

pub(super) const COURSE: &str = "algo-2025";

pub(super) fn course_id() -> CourseId {
    CourseId(COURSE.to_string())
}

pub(super) fn participant_id(raw: &str) -> ParticipantId {
    ParticipantId(raw.to_string())
}

pub(super) fn homework(id: &str, max_points: f64) -> AssignmentSummary {
    AssignmentSummary {
        id: AssignmentId(id.to_string()),
        category: AssignmentCategory::Homework,
        max_points,
        workflow_state: WorkflowState::Evaluated,
    }
}

pub(super) fn presentation(id: &str, max_points: f64) -> AssignmentSummary {
    AssignmentSummary {
        category: AssignmentCategory::Presentation,
        ..homework(id, max_points)
    }
}

pub(super) fn graded(id: &str, points: f64) -> AssessmentRecord {
    AssessmentRecord {
        assignment_id: AssignmentId(id.to_string()),
        achieved_points: Some(points),
    }
}

pub(super) fn ungraded(id: &str) -> AssessmentRecord {
    AssessmentRecord {
        assignment_id: AssignmentId(id.to_string()),
        achieved_points: None,
    }
}

/// Four homework sheets worth 25 points each.
pub(super) fn four_sheets() -> Vec<AssignmentSummary> {
    (1..=4)
        .map(|index| homework(&format!("sheet-{index}"), 25.0))
        .collect()
}

/// Assessments spreading `total` evenly over the four sheets.
pub(super) fn spread_over_sheets(total: f64) -> Vec<AssessmentRecord> {
    (1..=4)
        .map(|index| graded(&format!("sheet-{index}"), total / 4.0))
        .collect()
}

pub(super) fn participant(raw: &str, assessments: Vec<AssessmentRecord>) -> ParticipantAssessments {
    ParticipantAssessments {
        participant: participant_id(raw),
        assessments,
    }
}

pub(super) fn approx_eq(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() < 1e-9
}

/// Course with two rules: 50% overall on homework and at most one failed presentation.
pub(super) fn course_record() -> CourseRecord {
    let mut assignments = four_sheets();
    assignments.push(presentation("talk-1", 10.0));
    assignments.push(presentation("talk-2", 10.0));
    assignments.push(AssignmentSummary {
        workflow_state: WorkflowState::InReview,
        ..homework("sheet-5", 25.0)
    });

    let mut strong = spread_over_sheets(80.0);
    strong.push(graded("talk-1", 9.0));
    strong.push(graded("talk-2", 8.0));

    let mut weak_homework = spread_over_sheets(40.0);
    weak_homework.push(graded("talk-1", 10.0));
    weak_homework.push(graded("talk-2", 10.0));

    CourseRecord {
        id: course_id(),
        assignments,
        admission_criteria: vec![
            AdmissionRuleSpec::overall_percent(AssignmentCategory::Homework, 50.0),
            AdmissionRuleSpec::allowed_failures(AssignmentCategory::Presentation, 50.0, 1),
        ],
        participants: vec![
            participant("s-strong", strong),
            participant("s-weak", weak_homework),
            participant("s-absent", Vec::new()),
        ],
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryCourses {
    courses: Arc<Mutex<HashMap<CourseId, CourseRecord>>>,
}

impl MemoryCourses {
    pub(super) fn with_course(record: CourseRecord) -> Self {
        let source = Self::default();
        source
            .courses
            .lock()
            .expect("lock")
            .insert(record.id.clone(), record);
        source
    }

    fn course(&self, course: &CourseId) -> Result<CourseRecord, RepositoryError> {
        self.courses
            .lock()
            .expect("lock")
            .get(course)
            .cloned()
            .ok_or_else(|| RepositoryError::CourseNotFound(course.clone()))
    }
}

impl CourseDataSource for MemoryCourses {
    fn evaluated_assignments(
        &self,
        course: &CourseId,
    ) -> Result<Vec<AssignmentSummary>, RepositoryError> {
        Ok(self.course(course)?.assignments)
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

pub(super) struct UnavailableCourses;

impl CourseDataSource for UnavailableCourses {
    fn evaluated_assignments(
        &self,
        _course: &CourseId,
    ) -> Result<Vec<AssignmentSummary>, RepositoryError> {
        Err(RepositoryError::Unavailable("course service offline".to_string()))
    }

    fn admission_criteria(
        &self,
        _course: &CourseId,
    ) -> Result<Vec<AdmissionRuleSpec>, RepositoryError> {
        Err(RepositoryError::Unavailable("course service offline".to_string()))
    }

    fn participants_with_assessments(
        &self,
        _course: &CourseId,
    ) -> Result<Vec<ParticipantAssessments>, RepositoryError> {
        Err(RepositoryError::Unavailable("course service offline".to_string()))
    }

    fn participant_with_assessments(
        &self,
        _course: &CourseId,
        _participant: &ParticipantId,
    ) -> Result<ParticipantAssessments, RepositoryError> {
        Err(RepositoryError::Unavailable("course service offline".to_string()))
    }
}

pub(super) fn build_service(record: CourseRecord) -> AdmissionService<MemoryCourses> {
    AdmissionService::new(Arc::new(MemoryCourses::with_course(record)))
}
