//! Exam admission evaluation for course participants.
//!
//! The engine in [`evaluation`] is a pure computation over snapshots handed in by a
//! [`CourseDataSource`]; [`AdmissionService`] wires the two together and [`admission_router`]
//! exposes the service over HTTP.

pub mod domain;
pub mod evaluation;
pub mod points;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    AssessmentRecord, AssignmentCategory, AssignmentId, AssignmentSummary, CourseId,
    ParticipantAssessments, ParticipantId, WorkflowState,
};
pub use evaluation::{
    AdmissionConfigError, AdmissionEngine, AdmissionRule, AdmissionRuleSpec, AdmissionStatus,
    AssignmentBreakdown, RoundingMethod, RoundingSpec, RuleCheckResult, RuleKind,
};
pub use points::{ParticipantPoints, PointsOverview};
pub use repository::{CourseDataSource, CourseRecord, RepositoryError};
pub use router::admission_router;
pub use service::{AdmissionService, AdmissionServiceError};
