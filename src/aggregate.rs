use chrono::NaiveDate;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::record::LogRecord;
use crate::stats::Aggregation;

/// Reads every file in order and aggregates its records.
///
/// `filter_date` only narrows the endpoint statistics. The returned record list always
/// holds every decoded line from every file, in read order. Any unreadable file or
/// malformed line aborts the whole run.
pub fn aggregate<P: AsRef<Path>>(
    paths: &[P],
    filter_date: Option<NaiveDate>,
) -> Result<Aggregation> {
    let start_time = Instant::now();
    info!(
        action = "start",
        component = "aggregation",
        file_count = paths.len(),
        filter_date = ?filter_date,
        "Starting log aggregation"
    );

    let mut aggregation = Aggregation::default();

    for path in paths {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        aggregate_reader(BufReader::new(file), path, filter_date, &mut aggregation)?;
    }

    info!(
        action = "complete",
        component = "aggregation",
        record_count = aggregation.records.len(),
        endpoint_count = aggregation.endpoint_stats.len(),
        request_count = aggregation.endpoint_stats.total_requests(),
        duration_ms = start_time.elapsed().as_millis(),
        "Log aggregation completed"
    );

    Ok(aggregation)
}

/// Folds one already-open source into `aggregation`. `path` is only used for error
/// reporting and logging.
pub fn aggregate_reader<R: BufRead>(
    reader: R,
    path: &Path,
    filter_date: Option<NaiveDate>,
    aggregation: &mut Aggregation,
) -> Result<()> {
    let start_time = Instant::now();
    let mut read = 0usize;
    let mut filtered_out = 0usize;

    // Split raw bytes; invalid UTF-8 surfaces as a decode error for its line
    for (line_index, line) in reader.split(b'\n').enumerate() {
        let line = line.map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let line = line.strip_suffix(b"\r").unwrap_or(&line);
        let record = LogRecord::decode_slice(line).map_err(|source| Error::Decode {
            path: path.to_path_buf(),
            line: line_index + 1,
            source,
        })?;
        read += 1;

        let in_range = match filter_date {
            Some(date) => record.date() == Some(date),
            None => true,
        };

        if in_range {
            if let Some((endpoint, response_time)) = record.timing() {
                aggregation.endpoint_stats.record(endpoint, response_time);
            }
        } else {
            filtered_out += 1;
        }

        aggregation.records.push(record);
    }

    debug!(
        action = "filter",
        component = "file_reader",
        file_path = ?path,
        filtered_out,
        "Records outside the requested date"
    );
    info!(
        action = "read",
        component = "file_reader",
        file_path = ?path,
        record_count = read,
        duration_ms = start_time.elapsed().as_millis(),
        "Read log file"
    );

    Ok(())
}
