use prettytable::{format, Cell, Row, Table};

use crate::report::{Report, ReportRow};
use crate::utils::{format_average, format_number};

/// Title, an `=` underline of the same width, then the report table.
pub fn render_report(report: &Report) -> String {
    let mut out = String::new();
    out.push_str(&report.title);
    out.push('\n');
    out.push_str(&"=".repeat(report.title.chars().count()));
    out.push('\n');
    out.push_str(&build_table(report).to_string());
    out
}

pub fn print_report(report: &Report) {
    print!("{}", render_report(report));
}

fn build_table(report: &Report) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);

    table.set_titles(Row::new(
        report
            .kind
            .headers()
            .iter()
            .map(|header| Cell::new(header).style_spec("c"))
            .collect(),
    ));

    for row in &report.rows {
        let cells = match row {
            ReportRow::Average {
                endpoint,
                count,
                average_response_time,
            } => vec![
                Cell::new(endpoint),
                Cell::new(&format_number(*count)).style_spec("r"),
                Cell::new(&format_average(*average_response_time)).style_spec("r"),
            ],
            ReportRow::UserAgent { agent, count } => vec![
                Cell::new(agent),
                Cell::new(&format_number(*count)).style_spec("r"),
            ],
        };
        table.add_row(Row::new(cells));
    }

    table
}
