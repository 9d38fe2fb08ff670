use crate::infra::{parse_date, parse_period, parse_status};
use crate::report::{run_classify, run_coverage, run_dashboard};
use crate::server;
use chrono::NaiveDate;
use childminder_compliance::error::AppError;
use childminder_compliance::workflows::coverage::ResidencePeriod;
use childminder_compliance::workflows::vetting::CheckStatus;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Childminder Compliance",
    about = "Address-history coverage and DBS compliance checks for a childminder agency",
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
    /// Measure how much of the required window an address history covers
    Coverage(CoverageArgs),
    /// Classify a single DBS vetting record
    Classify(ClassifyArgs),
    /// Evaluate a household roster export and print the compliance dashboard
    Dashboard(DashboardArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

#[derive(Args, Debug)]
pub(crate) struct CoverageArgs {
    /// Residence period as START..END or START..present; repeat for each address
    #[arg(long = "period", value_parser = parse_period)]
    pub(crate) periods: Vec<ResidencePeriod>,
    /// Required window in years (defaults to COVERAGE_WINDOW_YEARS)
    #[arg(long)]
    pub(crate) window_years: Option<u32>,
    /// Evaluation date (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
    /// Explanation offered for any gaps
    #[arg(long)]
    pub(crate) explanation: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct ClassifyArgs {
    /// Check status: not-requested, requested, received or expired
    #[arg(long, value_parser = parse_status)]
    pub(crate) status: CheckStatus,
    /// Date of birth (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) dob: NaiveDate,
    #[arg(long, value_parser = parse_date)]
    pub(crate) requested_on: Option<NaiveDate>,
    #[arg(long, value_parser = parse_date)]
    pub(crate) issued_on: Option<NaiveDate>,
    #[arg(long, value_parser = parse_date)]
    pub(crate) expires_on: Option<NaiveDate>,
    /// Fill a missing expiry from the issue date and certificate validity
    #[arg(long)]
    pub(crate) suggest_expiry: bool,
    /// Evaluation date (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub(crate) struct DashboardArgs {
    /// Household roster CSV export
    #[arg(long)]
    pub(crate) roster: PathBuf,
    /// Optional address history CSV export (Member ID, From, To)
    #[arg(long)]
    pub(crate) addresses: Option<PathBuf>,
    /// Evaluation date (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Days ahead to include in the review schedule (defaults to REVIEW_HORIZON_DAYS)
    #[arg(long)]
    pub(crate) horizon_days: Option<u32>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Coverage(args) => run_coverage(args),
        Command::Classify(args) => run_classify(args),
        Command::Dashboard(args) => run_dashboard(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coverage_accepts_repeated_periods() {
        let cli = Cli::try_parse_from([
            "childminder-compliance-api",
            "coverage",
            "--period",
            "2019-01-01..2021-06-01",
            "--period",
            "2021-07-01..present",
            "--as-of",
            "2024-01-01",
        ])
        .expect("arguments parse");

        match cli.command {
            Some(Command::Coverage(args)) => {
                assert_eq!(args.periods.len(), 2);
                assert!(args.periods[1].is_present());
                assert!(args.window_years.is_none());
            }
            other => panic!("expected coverage command, got {other:?}"),
        }
    }

    #[test]
    fn classify_rejects_unknown_status() {
        let result = Cli::try_parse_from([
            "childminder-compliance-api",
            "classify",
            "--status",
            "misplaced",
            "--dob",
            "1990-01-01",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["childminder-compliance-api"]).expect("arguments parse");
        assert!(cli.command.is_none());
    }
}
