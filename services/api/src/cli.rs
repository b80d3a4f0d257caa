use crate::demo::{run_admission_report, run_demo, AdmissionReportArgs, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use course_admission::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Course Admission Service",
    about = "Evaluate exam admission rules for course participants",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Evaluate admission for a course snapshot
    Admission {
        #[command(subcommand)]
        command: AdmissionCommand,
    },
    /// Walk through admission and points reports for the built-in demo course
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum AdmissionCommand {
    /// Print admission verdicts and rule results for a course
    Report(AdmissionReportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Serve courses from this JSON snapshot instead of APP_COURSE_SNAPSHOT
    #[arg(long)]
    pub(crate) snapshot: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Admission {
            command: AdmissionCommand::Report(args),
        } => run_admission_report(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_defaults_to_serve() {
        let cli = Cli::try_parse_from(["course-admission-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_admission_report_arguments() {
        let cli = Cli::try_parse_from([
            "course-admission-api",
            "admission",
            "report",
            "--snapshot",
            "course.json",
            "--course",
            "algo-2025",
            "--participant",
            "s-001",
            "--json",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Admission {
                command: AdmissionCommand::Report(args),
            }) => {
                assert_eq!(args.snapshot, Some(PathBuf::from("course.json")));
                assert_eq!(args.course.as_deref(), Some("algo-2025"));
                assert_eq!(args.participant.as_deref(), Some("s-001"));
                assert!(args.json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn serve_accepts_overrides() {
        let cli = Cli::try_parse_from([
            "course-admission-api",
            "serve",
            "--port",
            "9090",
            "--snapshot",
            "snap.json",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Serve(args)) => {
                assert_eq!(args.port, Some(9090));
                assert_eq!(args.host, None);
                assert_eq!(args.snapshot, Some(PathBuf::from("snap.json")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
