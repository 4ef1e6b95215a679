use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

use crate::error::Result;
use crate::report::ReportKind;

#[derive(Parser, Debug)]
#[command(
    name = "logstat",
    about = "Aggregate line-delimited JSON access logs into endpoint and user-agent reports",
    version,
    long_about = None
)]
pub struct Args {
    /// Log files to read, in order
    #[arg(short, long, num_args = 1.., required = true)]
    pub files: Vec<PathBuf>,

    /// Report to generate (average, user-agent)
    #[arg(short, long)]
    pub report: String,

    /// Only count requests from this day in the average report (YYYY-MM-DD)
    #[arg(short, long, value_parser = parse_date)]
    pub date: Option<NaiveDate>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn report_kind(&self) -> Result<ReportKind> {
        self.report.parse()
    }
}

fn parse_date(value: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| format!("expected a date as YYYY-MM-DD: {}", e))
}
