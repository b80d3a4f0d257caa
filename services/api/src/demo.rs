use crate::infra::{InMemoryCourseSource, DEMO_COURSE};
use clap::Args;
use course_admission::admission::{
    AdmissionService, AdmissionStatus, AssignmentBreakdown, CourseId, ParticipantId,
    PointsOverview,
};
use course_admission::error::AppError;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Participant whose per-assignment breakdown is printed. Defaults to every participant.
    #[arg(long)]
    pub(crate) participant: Option<String>,
    /// Skip the points overview table.
    #[arg(long)]
    pub(crate) skip_points: bool,
}

#[derive(Args, Debug)]
pub(crate) struct AdmissionReportArgs {
    /// JSON course snapshot to evaluate (defaults to the built-in demo course)
    #[arg(long)]
    pub(crate) snapshot: Option<PathBuf>,
    /// Course to report on (defaults to the first course in the snapshot)
    #[arg(long)]
    pub(crate) course: Option<String>,
    /// Restrict the report to a single participant
    #[arg(long)]
    pub(crate) participant: Option<String>,
    /// Print the admission statuses as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_admission_report(args: AdmissionReportArgs) -> Result<(), AppError> {
    let AdmissionReportArgs {
        snapshot,
        course,
        participant,
        json,
    } = args;

    let source = InMemoryCourseSource::load(snapshot.as_deref())?;
    let course = match course {
        Some(course) => CourseId(course),
        None => default_course(&source),
    };
    let service = AdmissionService::new(Arc::new(source));

    let statuses = match participant {
        Some(participant) => vec![
            service.compute_admission_status_for_one(&course, &ParticipantId(participant))?,
        ],
        None => service.compute_admission_status_for_all(&course)?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&statuses)?);
    } else {
        render_admission_report(&course, &statuses);
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        participant,
        skip_points,
    } = args;

    let course = CourseId(DEMO_COURSE.to_string());
    let service = AdmissionService::new(Arc::new(InMemoryCourseSource::load(None)?));

    println!("Course admission demo");
    let statuses = service.compute_admission_status_for_all(&course)?;
    render_admission_report(&course, &statuses);

    if !skip_points {
        let overview = service.compute_points_overview(&course)?;
        render_points_overview(&overview);
    }

    let focus: Vec<ParticipantId> = match participant {
        Some(participant) => vec![ParticipantId(participant)],
        None => statuses
            .iter()
            .map(|status| status.participant.clone())
            .collect(),
    };

    println!("\nPer-assignment breakdown");
    for participant in &focus {
        let breakdowns = service.compute_assignment_breakdown_for_one(&course, participant)?;
        render_breakdowns(participant, &breakdowns);
    }

    Ok(())
}

fn default_course(source: &InMemoryCourseSource) -> CourseId {
    source
        .course_ids()
        .into_iter()
        .next()
        .unwrap_or_else(|| CourseId(DEMO_COURSE.to_string()))
}

pub(crate) fn render_admission_report(course: &CourseId, statuses: &[AdmissionStatus]) {
    let admitted = statuses.iter().filter(|status| status.has_admission).count();
    println!(
        "Admission report for {} ({} of {} admitted)",
        course,
        admitted,
        statuses.len()
    );

    for status in statuses {
        println!("\n- {}", status.summary());
        for result in &status.results {
            let verdict = if result.passed { "pass" } else { "fail" };
            println!(
                "    [{}] {} on {}: {} ({:.2}%)",
                verdict,
                result.rule_kind.label(),
                result.assignment_category.label(),
                result.achieved_points,
                result.achieved_percent
            );
            if let Some(comment) = &result.comment {
                println!("      note: {}", comment);
            }
        }
    }
}

fn render_points_overview(overview: &PointsOverview) {
    println!("\nPoints overview (max {} points)", overview.max_points());
    let header: Vec<String> = overview
        .assignments
        .iter()
        .map(|assignment| format!("{} /{}", assignment.id, assignment.max_points))
        .collect();
    println!("  participant | {} | total", header.join(" | "));

    for row in &overview.per_participant {
        let cells: Vec<String> = row
            .achieved_points
            .iter()
            .map(|points| points.to_string())
            .collect();
        println!(
            "  {} | {} | {}",
            row.participant,
            cells.join(" | "),
            row.total()
        );
    }
}

fn render_breakdowns(participant: &ParticipantId, breakdowns: &[AssignmentBreakdown]) {
    if breakdowns.is_empty() {
        println!("- {}: no individual-percent rules configured", participant);
        return;
    }

    for breakdown in breakdowns {
        println!(
            "- {} ({}):",
            participant,
            breakdown.assignment_category.label()
        );
        if let Some(comment) = &breakdown.comment {
            println!("    note: {}", comment);
        }
        let rows = breakdown
            .assignments
            .iter()
            .zip(&breakdown.achieved_points)
            .zip(&breakdown.achieved_percent)
            .zip(&breakdown.passed);
        for (((assignment, points), percent), passed) in rows {
            let verdict = if *passed { "pass" } else { "fail" };
            println!(
                "    {} {}: {} points ({:.2}%)",
                verdict, assignment, points, percent
            );
        }
    }
}
