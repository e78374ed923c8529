pub mod aggregate;
pub mod cli;
pub mod collect;
pub mod compliance;
pub mod config;
pub mod error;
pub mod findings;
pub mod inventory;
pub mod model;
pub mod provider;
pub mod reporter;
pub mod rules;
pub mod runner;
pub mod scope;

#[cfg(test)]
pub mod test_utils;

pub use cli::{Cli, OutputFormat};
pub use collect::{Collector, CollectorResult, Registry};
pub use error::{AuditError, Result};
pub use findings::{Finding, Report, Severity, Summary};
pub use provider::{CloudApi, SnapshotApi};
pub use reporter::{
    Reporter, csv::CsvReporter, json::JsonReporter, terminal::TerminalReporter,
};
pub use runner::{AuditRunner, RunOptions};
pub use scope::Scope;
