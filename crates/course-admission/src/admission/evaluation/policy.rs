use serde::{Deserialize, Serialize};

use super::super::domain::ParticipantId;
use super::RuleCheckResult;

/// Admission verdict for one participant together with the per-rule trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionStatus {
    pub participant: ParticipantId,
    pub has_admission: bool,
    pub results: Vec<RuleCheckResult>,
}

impl AdmissionStatus {
    pub fn failed_rules(&self) -> impl Iterator<Item = &RuleCheckResult> {
        self.results.iter().filter(|result| !result.passed)
    }

    pub fn summary(&self) -> String {
        if self.has_admission {
            return format!(
                "{} admitted ({} rule(s) passed)",
                self.participant,
                self.results.len()
            );
        }

        let failed: Vec<String> = self
            .failed_rules()
            .map(|result| {
                format!(
                    "{} on {} at {:.2}%",
                    result.rule_kind.label(),
                    result.assignment_category.label(),
                    result.achieved_percent
                )
            })
            .collect();
        format!("{} not admitted: {}", self.participant, failed.join("; "))
    }
}

/// Combine the verdicts of all gating rules; a single failed rule denies admission.
pub(crate) fn decide_admission(
    participant: &ParticipantId,
    results: Vec<RuleCheckResult>,
) -> AdmissionStatus {
    let has_admission = results.iter().all(|result| result.passed);

    AdmissionStatus {
        participant: participant.clone(),
        has_admission,
        results,
    }
}
