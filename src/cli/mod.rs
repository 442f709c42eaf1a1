use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::info;

use crate::config::{AnalysisConfig, DEFAULT_REGION};
use crate::export::{self, ExportFormat};
use crate::providers::{ServiceAnalyzer, SnapshotProvider};
use crate::services::cache::DEFAULT_TTL_SECS;
use crate::services::regions::{RegionFanout, DEFAULT_MAX_WORKERS};
use crate::services::AnalysisService;

/// Cloud cost-optimization reporter
#[derive(Parser)]
#[command(name = "finops-lens")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an analysis and print or export the report
    Analyze(AnalyzeArgs),

    /// List the regions a multi-region scan would cover
    Regions {
        /// Recorded account snapshot (JSON)
        #[arg(long, env = "FINOPS_SNAPSHOT")]
        snapshot: PathBuf,
    },
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Recorded account snapshot (JSON)
    #[arg(long, env = "FINOPS_SNAPSHOT")]
    snapshot: PathBuf,

    /// Home region for the all-services analysis and advisors
    #[arg(long, env = "FINOPS_REGION", default_value = DEFAULT_REGION)]
    region: String,

    /// Also scan every enabled region
    #[arg(long, env = "FINOPS_MULTI_REGION")]
    multi_region: bool,

    /// Concurrent region workers
    #[arg(long, env = "FINOPS_MAX_WORKERS", default_value_t = DEFAULT_MAX_WORKERS)]
    max_workers: usize,

    /// Result cache lifetime in seconds
    #[arg(long, env = "FINOPS_CACHE_TTL", default_value_t = DEFAULT_TTL_SECS)]
    cache_ttl: u64,

    /// Skip the all-services analyzer collection
    #[arg(long)]
    no_services: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = ExportFormat::Summary)]
    format: ExportFormat,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl AnalyzeArgs {
    fn config(&self) -> AnalysisConfig {
        AnalysisConfig {
            region: self.region.clone(),
            include_multi_region: self.multi_region,
            max_workers: self.max_workers,
            cache_ttl: Duration::from_secs(self.cache_ttl),
        }
    }
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        match self.command {
            Commands::Analyze(args) => run_analyze(args),
            Commands::Regions { snapshot } => {
                let provider = load_provider(&snapshot)?;
                for region in RegionFanout::new(&provider, 1).enabled_regions() {
                    println!("{}", region);
                }
                Ok(())
            }
        }
    }
}

fn load_provider(path: &Path) -> anyhow::Result<SnapshotProvider> {
    SnapshotProvider::load(path).with_context(|| format!("loading snapshot {}", path.display()))
}

fn run_analyze(args: AnalyzeArgs) -> anyhow::Result<()> {
    let provider = Arc::new(load_provider(&args.snapshot)?);
    let analyzer: Option<Arc<dyn ServiceAnalyzer>> = if args.no_services {
        None
    } else {
        let shared: Arc<dyn ServiceAnalyzer> = provider.clone();
        Some(shared)
    };

    let service = AnalysisService::new(provider, analyzer, args.config())?;
    let result = service.get_cached()?;
    let rendered = export::render(&result, args.format)?;

    match &args.output {
        Some(path) => {
            fs::write(path, rendered).with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), format = args.format.extension(), "Report written");
        }
        None => print!("{}", rendered),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_cli_parse_analyze_defaults() {
        let cli = Cli::try_parse_from(["finops-lens", "analyze", "--snapshot", "snap.json"]).unwrap();
        match cli.command {
            Commands::Analyze(args) => {
                assert_eq!(args.snapshot, PathBuf::from("snap.json"));
                assert_eq!(args.format, ExportFormat::Summary);
                assert!(!args.no_services);
                assert!(args.output.is_none());
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_cli_parse_analyze_options() {
        let cli = Cli::try_parse_from([
            "finops-lens",
            "-vv",
            "analyze",
            "--snapshot",
            "snap.json",
            "--region",
            "eu-west-1",
            "--multi-region",
            "--max-workers",
            "5",
            "--format",
            "csv",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Analyze(args) => {
                let config = args.config();
                assert_eq!(config.region, "eu-west-1");
                assert!(config.include_multi_region);
                assert_eq!(config.max_workers, 5);
                assert_eq!(args.format, ExportFormat::Csv);
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_cli_parse_regions() {
        let cli = Cli::try_parse_from(["finops-lens", "regions", "--snapshot", "s.json"]).unwrap();
        assert!(matches!(cli.command, Commands::Regions { .. }));
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        let result = Cli::try_parse_from([
            "finops-lens",
            "analyze",
            "--snapshot",
            "s.json",
            "--format",
            "xml",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_analyze_writes_report_file() {
        let temp_dir = TempDir::new().unwrap();
        let snapshot = temp_dir.path().join("snapshot.json");
        let output = temp_dir.path().join("report.json");
        fs::write(
            &snapshot,
            r#"{"account_id": "111122223333", "costs": [{"service": "Amazon EC2", "amount": 10.0}]}"#,
        )
        .unwrap();

        let cli = Cli::try_parse_from([
            "finops-lens",
            "analyze",
            "--snapshot",
            snapshot.to_str().unwrap(),
            "--format",
            "json",
            "--output",
            output.to_str().unwrap(),
        ])
        .unwrap();
        cli.run().unwrap();

        let report: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(report["account_id"], "111122223333");
        assert_eq!(report["costs"]["total"], 10.0);
    }

    #[test]
    fn test_analyze_missing_snapshot_fails() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope.json");
        let cli = Cli::try_parse_from(["finops-lens", "analyze", "--snapshot", missing.to_str().unwrap()]).unwrap();

        let err = cli.run().unwrap_err();
        assert!(err.to_string().contains("loading snapshot"));
    }
}
