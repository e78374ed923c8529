pub mod csv;
pub mod json;
pub mod terminal;

use crate::findings::Report;

pub use csv::CsvReporter;
pub use json::JsonReporter;
pub use terminal::TerminalReporter;

pub trait Reporter {
    fn report(&self, report: &Report) -> String;
}
