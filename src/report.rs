use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::record::LogRecord;
use crate::stats::{AgentStats, Aggregation, EndpointStats};

pub const AVERAGE_REPORT_TITLE: &str = "Average Response Time Report";
pub const USER_AGENT_REPORT_TITLE: &str = "User Agent Report";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Average,
    UserAgent,
}

impl ReportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Average => "average",
            ReportKind::UserAgent => "user-agent",
        }
    }

    pub fn headers(&self) -> &'static [&'static str] {
        match self {
            ReportKind::Average => &["Endpoint", "Request Count", "Average Response Time"],
            ReportKind::UserAgent => &["User-Agent", "Count"],
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "average" => Ok(ReportKind::Average),
            "user-agent" => Ok(ReportKind::UserAgent),
            _ => Err(Error::Configuration(
                "Currently, only 'average' and 'user-agent' report types are supported."
                    .to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReportRow {
    Average {
        endpoint: String,
        count: u64,
        average_response_time: f64,
    },
    UserAgent {
        agent: String,
        count: u64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub kind: ReportKind,
    pub title: String,
    pub rows: Vec<ReportRow>,
}

/// Turns one aggregated view into a [`Report`].
pub trait ReportGenerator {
    type Input: ?Sized;

    fn generate(&self, input: &Self::Input) -> Report;
}

pub struct AverageResponseTimeReport {
    pub title: String,
}

impl Default for AverageResponseTimeReport {
    fn default() -> Self {
        Self {
            title: AVERAGE_REPORT_TITLE.to_string(),
        }
    }
}

impl ReportGenerator for AverageResponseTimeReport {
    type Input = EndpointStats;

    /// One row per endpoint, in the order endpoints were first seen. Averages are not rounded.
    fn generate(&self, endpoint_stats: &EndpointStats) -> Report {
        let rows = endpoint_stats
            .iter()
            .map(|(endpoint, totals)| ReportRow::Average {
                endpoint: endpoint.to_string(),
                count: totals.count,
                average_response_time: totals.average(),
            })
            .collect();

        Report {
            kind: ReportKind::Average,
            title: self.title.clone(),
            rows,
        }
    }
}

pub struct UserAgentReport {
    pub title: String,
}

impl Default for UserAgentReport {
    fn default() -> Self {
        Self {
            title: USER_AGENT_REPORT_TITLE.to_string(),
        }
    }
}

impl ReportGenerator for UserAgentReport {
    type Input = [LogRecord];

    fn generate(&self, records: &[LogRecord]) -> Report {
        let rows = agent_stats(records)
            .iter()
            .map(|(agent, count)| ReportRow::UserAgent {
                agent: agent.to_string(),
                count: *count,
            })
            .collect();

        Report {
            kind: ReportKind::UserAgent,
            title: self.title.clone(),
            rows,
        }
    }
}

/// Counts requests per client agent over every record, missing agents as `"Unknown"`.
pub fn agent_stats(records: &[LogRecord]) -> AgentStats {
    let mut stats = AgentStats::new();
    for record in records {
        stats.record(record.user_agent());
    }
    stats
}

/// Feeds the matching view of `aggregation` to the generator for `kind`.
///
/// The average report sees date-filtered endpoint statistics; the user-agent report
/// always sees the full record list.
pub fn generate_report(kind: ReportKind, aggregation: &Aggregation) -> Report {
    match kind {
        ReportKind::Average => {
            AverageResponseTimeReport::default().generate(&aggregation.endpoint_stats)
        }
        ReportKind::UserAgent => UserAgentReport::default().generate(&aggregation.records),
    }
}
