use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use ecn_super_analysis::{AnalyzerContext, RunReport, SuperAnalyzer};
use ecn_super_core::config::{CliOverrides, GroupingMode, ResolutionPolicy, SuperConfig};
use ecn_super_core::errors::{AnalyzerError, EcnErrorCode};
use ecn_super_core::tracing::init_tracing;
use ecn_super_core::types::ValidityPosition;
use ecn_super_storage::DatabaseManager;

#[derive(Parser)]
#[command(author, version, about = "Aggregate ECN connectivity observations into per-destination super conditions")]
struct Cli {
    /// Directory searched for ecn-super.toml
    #[arg(long, default_value = ".")]
    config_root: PathBuf,
    /// Observation database (overrides config)
    #[arg(long)]
    database: Option<String>,
    /// disagreement-aware | first-seen-consensus
    #[arg(long)]
    policy: Option<ResolutionPolicy>,
    /// in-process | in-store
    #[arg(long)]
    grouping: Option<GroupingMode>,
    #[arg(long)]
    timespan_hours: Option<u32>,
    /// Which action entry decides validity: first | last
    #[arg(long)]
    validity_position: Option<ValidityPosition>,
    /// Keep observations from testing campaigns
    #[arg(long)]
    no_campaign_filter: bool,
    /// Print the run summary as JSON on stdout
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            resolution_policy: self.policy,
            grouping: self.grouping,
            timespan_hours: self.timespan_hours,
            campaign_filter: self.no_campaign_filter.then_some(false),
            validity_position: self.validity_position,
            database_path: self.database.clone(),
        }
    }
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    tracing::info!(version = ecn_super_core::constants::VERSION, "ecn-super starting");

    let code = match run(&cli) {
        Ok(report) => {
            for defect in &report.errors {
                tracing::warn!(error = %defect.coded_string(), "group defect");
            }
            if cli.json {
                match serde_json::to_string_pretty(&report.data) {
                    Ok(json) => println!("{json}"),
                    Err(e) => tracing::error!(error = %e, "failed to serialize run summary"),
                }
            }
            ExitCode::SUCCESS
        }
        Err(e @ AnalyzerError::NoWindowAvailable { .. }) => {
            tracing::warn!(error = %e.coded_string(), "nothing to do");
            ExitCode::from(2)
        }
        Err(e) => {
            tracing::error!(error = %e.coded_string(), "run aborted");
            ExitCode::FAILURE
        }
    };

    tracing::info!("ecn-super finished");
    code
}

fn run(cli: &Cli) -> Result<RunReport, AnalyzerError> {
    let config = SuperConfig::load(&cli.config_root, Some(&cli.overrides()))?;
    let db = Arc::new(DatabaseManager::from_config(&config.storage)?);
    let context = AnalyzerContext::sqlite(db, &config.analyzer);
    SuperAnalyzer::new(config.analyzer, context).run()
}
