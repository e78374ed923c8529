use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use cloud_audit::aggregate::aggregate;
use cloud_audit::cli::{Cli, OutputFormat};
use cloud_audit::compliance;
use cloud_audit::config::Config;
use cloud_audit::error::{AuditError, Result};
use cloud_audit::inventory::Inventory;
use cloud_audit::provider::SnapshotApi;
use cloud_audit::reporter::{CsvReporter, JsonReporter, Reporter, TerminalReporter};
use cloud_audit::runner::AuditRunner;
use cloud_audit::scope::Scope;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if cli.no_color {
        colored::control::set_override(false);
    }

    match execute(&cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::from(2)
        }
    }
}

/// Diagnostics go to stderr so piped report output stays parseable.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn execute(cli: &Cli) -> Result<ExitCode> {
    let config = Config::load(cli.config.as_deref()).map_err(AuditError::Config)?;
    let services = resolve_services(cli)?;

    let mut scope = Scope::new();
    if let Some(region) = &cli.region {
        scope = scope.with_region(region);
    }
    if let Some(profile) = &cli.profile {
        scope = scope.with_profile(profile);
    }

    let mut options = config.run_options();
    if let Some(concurrency) = cli.concurrency {
        options.concurrency = concurrency;
    }
    if let Some(secs) = cli.deadline {
        options.deadline = Some(Duration::from_secs(secs));
    }

    let api = SnapshotApi::from_file(&cli.snapshot).map_err(|source| AuditError::Snapshot {
        path: cli.snapshot.clone(),
        source,
    })?;

    let runner = AuditRunner::new().with_options(options).with_thresholds(
        config.thresholds.access_key_max_age_days,
        config.thresholds.certificate_expiry_days,
    );

    let results = runner.collect_all(&services, &scope, Arc::new(api)).await?;
    let report = aggregate(&results, runner.rules(), &runner.context());

    match cli.format {
        OutputFormat::Terminal => {
            print!(
                "{}",
                TerminalReporter::new(cli.strict, cli.verbose).report(&report)
            );
        }
        OutputFormat::Json => println!("{}", JsonReporter::new().report(&report)),
        OutputFormat::Csv => print!("{}", CsvReporter::new().report(&report)),
    }

    if cli.inventory {
        let inventory = Inventory::build(&results, &report);
        match cli.format {
            OutputFormat::Terminal => print!("\n{}", inventory.to_terminal()),
            OutputFormat::Json => println!("{}", inventory.to_json()),
            OutputFormat::Csv => print!("\n{}", inventory.to_csv()),
        }
    }

    let passed = if cli.strict {
        report.findings.is_empty() && report.collector_errors == 0
    } else {
        report.passed()
    };
    Ok(if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

/// Resolves the service selection from `--services` and `--compliance`.
/// Both together audit the intersection; services the framework does not
/// cover are skipped with a warning.
fn resolve_services(cli: &Cli) -> Result<Vec<String>> {
    let Some(framework) = &cli.compliance else {
        return Ok(cli.services.clone());
    };

    let preset = compliance::framework_services(framework)?;
    if cli.services.is_empty() {
        return Ok(preset.iter().map(|s| (*s).to_string()).collect());
    }

    let (kept, excluded) = compliance::intersect(preset, &cli.services);
    for service in &excluded {
        warn!(
            service = %service,
            framework = %framework,
            "service not covered by framework, skipping"
        );
    }
    if kept.is_empty() {
        return Err(AuditError::EmptySelection {
            framework: framework.clone(),
        });
    }
    Ok(kept)
}
