use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use logstat::utils::setup_logging;
use logstat::{aggregate, generate_report, print_report, Args};

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.verbose);

    let kind = match args.report_kind() {
        Ok(kind) => kind,
        Err(e) => {
            println!("{}", e);
            return Ok(());
        }
    };

    info!(
        action = "start",
        component = "main",
        report = %kind,
        file_count = args.files.len(),
        "Generating report"
    );

    let aggregation = match aggregate(&args.files, args.date) {
        Ok(aggregation) => aggregation,
        Err(e) => {
            error!(
                action = "fail",
                component = "main",
                error = %e,
                "Aggregation failed"
            );
            return Err(e).context("Failed to aggregate access logs");
        }
    };
    let report = generate_report(kind, &aggregation);
    print_report(&report);

    info!(
        action = "complete",
        component = "main",
        row_count = report.rows.len(),
        "Report printed"
    );
    Ok(())
}
