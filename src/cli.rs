use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Terminal,
    Json,
    Csv,
}

#[derive(Parser, Debug)]
#[command(
    name = "cloud-audit",
    version,
    about = "Security audit for cloud account snapshots",
    long_about = "cloud-audit replays an account snapshot through the built-in security checks and reports misconfigured resources before they reach production."
)]
pub struct Cli {
    /// Path to the account snapshot (JSON export)
    pub snapshot: PathBuf,

    /// Services to audit (comma-separated, defaults to all)
    #[arg(short, long, value_delimiter = ',')]
    pub services: Vec<String>,

    /// Audit only the services covered by a compliance framework
    #[arg(long)]
    pub compliance: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Terminal)]
    pub format: OutputFormat,

    /// Append the per-resource inventory after the report
    #[arg(long)]
    pub inventory: bool,

    /// Region the snapshot was captured in
    #[arg(long)]
    pub region: Option<String>,

    /// Named credential profile the snapshot was captured with
    #[arg(long)]
    pub profile: Option<String>,

    /// Abort collectors that run longer than this many seconds
    #[arg(long, value_name = "SECONDS")]
    pub deadline: Option<u64>,

    /// Maximum number of collectors fetching at the same time
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Path to a config file (overrides discovery)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Strict mode: any finding at all fails the run
    #[arg(long)]
    pub strict: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_basic_args() {
        let cli = Cli::try_parse_from(["cloud-audit", "account.json"]).unwrap();
        assert_eq!(cli.snapshot, PathBuf::from("account.json"));
        assert!(cli.services.is_empty());
        assert!(!cli.strict);
        assert!(!cli.inventory);
    }

    #[test]
    fn test_snapshot_path_is_required() {
        assert!(Cli::try_parse_from(["cloud-audit"]).is_err());
    }

    #[test]
    fn test_parse_services_list() {
        let cli =
            Cli::try_parse_from(["cloud-audit", "-s", "storage,iam", "account.json"]).unwrap();
        assert_eq!(cli.services, vec!["storage", "iam"]);
    }

    #[test]
    fn test_parse_repeated_services_flag() {
        let cli = Cli::try_parse_from([
            "cloud-audit",
            "--services",
            "storage",
            "--services",
            "iam",
            "account.json",
        ])
        .unwrap();
        assert_eq!(cli.services, vec!["storage", "iam"]);
    }

    #[test]
    fn test_parse_compliance_framework() {
        let cli =
            Cli::try_parse_from(["cloud-audit", "--compliance", "hipaa", "account.json"]).unwrap();
        assert_eq!(cli.compliance.as_deref(), Some("hipaa"));
    }

    #[test]
    fn test_parse_format_json() {
        let cli = Cli::try_parse_from(["cloud-audit", "--format", "json", "account.json"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn test_parse_format_csv() {
        let cli = Cli::try_parse_from(["cloud-audit", "-f", "csv", "account.json"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Csv);
    }

    #[test]
    fn test_parse_run_limits() {
        let cli = Cli::try_parse_from([
            "cloud-audit",
            "--deadline",
            "30",
            "--concurrency",
            "2",
            "account.json",
        ])
        .unwrap();
        assert_eq!(cli.deadline, Some(30));
        assert_eq!(cli.concurrency, Some(2));
    }

    #[test]
    fn test_parse_scope_flags() {
        let cli = Cli::try_parse_from([
            "cloud-audit",
            "--region",
            "eu-west-1",
            "--profile",
            "prod",
            "account.json",
        ])
        .unwrap();
        assert_eq!(cli.region.as_deref(), Some("eu-west-1"));
        assert_eq!(cli.profile.as_deref(), Some("prod"));
    }

    #[test]
    fn test_parse_all_options() {
        let cli = Cli::try_parse_from([
            "cloud-audit",
            "--format",
            "json",
            "--strict",
            "--inventory",
            "--no-color",
            "--verbose",
            "--compliance",
            "hipaa",
            "-s",
            "storage",
            "account.json",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.strict);
        assert!(cli.inventory);
        assert!(cli.no_color);
        assert!(cli.verbose);
        assert_eq!(cli.compliance.as_deref(), Some("hipaa"));
        assert_eq!(cli.services, vec!["storage"]);
    }

    #[test]
    fn test_default_values() {
        let cli = Cli::try_parse_from(["cloud-audit", "account.json"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Terminal);
        assert!(cli.compliance.is_none());
        assert!(cli.region.is_none());
        assert!(cli.profile.is_none());
        assert!(cli.deadline.is_none());
        assert!(cli.concurrency.is_none());
        assert!(cli.config.is_none());
        assert!(!cli.no_color);
        assert!(!cli.verbose);
    }
}
