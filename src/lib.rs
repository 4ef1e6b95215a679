pub mod aggregate;
pub mod args;
pub mod error;
pub mod record;
pub mod render;
pub mod report;
pub mod stats;
pub mod utils;

pub use aggregate::aggregate;
pub use args::Args;
pub use error::{Error, Result};
pub use record::LogRecord;
pub use render::{print_report, render_report};
pub use report::{generate_report, Report, ReportGenerator, ReportKind, ReportRow};
pub use stats::{AgentStats, Aggregation, EndpointStats, EndpointTotals};
