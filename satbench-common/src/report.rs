//! Result records and the sinks that store them

use crate::{formula::Expected, parser::open_file_for_writing};
use serde_derive::Serialize;
use std::{
    fs::File,
    io::{BufWriter, Result, Write},
};

/// One row per processed instance, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRecord {
    /// Variable count derived by the engine from the literals.
    pub variables: usize,
    /// Clause count as declared in the instance header.
    pub clauses: u64,
    /// Wall-clock seconds spent in the search call.
    pub seconds: f64,
    /// The search verdict.
    pub satisfiable: bool,
    /// Ground-truth label, if the batch file carried one.
    pub expected: Option<Expected>,
}

/// Parallel per-instance sequences, the handoff point for plotting tools.
#[derive(Debug, Default, PartialEq, Serialize)]
pub struct BatchSummary {
    pub sizes: Vec<usize>,
    pub times: Vec<f64>,
    pub answers: Vec<bool>,
}

impl BatchSummary {
    pub fn push(&mut self, record: &ResultRecord) {
        self.sizes.push(record.variables);
        self.times.push(record.seconds);
        self.answers.push(record.satisfiable);
    }
    pub fn len(&self) -> usize {
        self.sizes.len()
    }
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }
}

/// Where result records and the final batch summary end up.
pub trait ResultSink {
    /// Accept the record of one processed instance.
    fn record(&mut self, record: &ResultRecord);
    /// Accept the summary of a batch that ran to completion.
    fn summary(&mut self, summary: &BatchSummary);
}

/// The CSV column header, matching the reference output files.
pub const CSV_HEADER: &str =
    "Number of Variables,Number of Clauses,Time (seconds),Satisfiable (Solver),Expected";

/// Write one record as a CSV row; an absent label becomes an empty field.
pub fn write_csv_record(out: &mut impl Write, record: &ResultRecord) -> Result<()> {
    writeln!(
        out,
        "{},{},{:.6},{},{}",
        record.variables,
        record.clauses,
        record.seconds,
        record.satisfiable,
        record.expected.map_or("", Expected::letter)
    )
}

/// Render the summary in TOML format for downstream plotting tools.
pub fn summary_to_toml(summary: &BatchSummary) -> String {
    toml::to_string(summary).unwrap_or_else(|err| die!("failed to serialize batch summary: {}", err))
}

/// Sink writing records to an optional CSV file and the summary to an
/// optional TOML file.
///
/// Rows are flushed one by one so that a fatal abort still leaves every
/// emitted record on disk.
pub struct FileReport {
    csv: Option<BufWriter<File>>,
    summary_filename: Option<String>,
}

impl FileReport {
    pub fn new(results_filename: Option<&str>, summary_filename: Option<&str>) -> FileReport {
        let csv = results_filename.map(|filename| {
            let mut file = open_file_for_writing(filename);
            writeln!(file, "{}", CSV_HEADER)
                .unwrap_or_else(|err| die!("failed to write result header: {}", err));
            file
        });
        FileReport {
            csv,
            summary_filename: summary_filename.map(String::from),
        }
    }
}

impl ResultSink for FileReport {
    fn record(&mut self, record: &ResultRecord) {
        if let Some(file) = &mut self.csv {
            write_csv_record(file, record)
                .and_then(|()| file.flush())
                .unwrap_or_else(|err| die!("failed to write result record: {}", err));
        }
    }
    fn summary(&mut self, summary: &BatchSummary) {
        if let Some(filename) = &self.summary_filename {
            let mut file = open_file_for_writing(filename);
            write!(file, "{}", summary_to_toml(summary))
                .and_then(|()| file.flush())
                .unwrap_or_else(|err| die!("failed to write batch summary: {}", err));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(expected: Option<Expected>) -> ResultRecord {
        ResultRecord {
            variables: 3,
            clauses: 2,
            seconds: 0.001,
            satisfiable: true,
            expected,
        }
    }

    #[test]
    fn csv_rows_match_the_reference_format() {
        let mut out = Vec::new();
        write_csv_record(&mut out, &record(Some(Expected::Satisfiable))).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "3,2,0.001000,true,S\n");
    }

    #[test]
    fn an_absent_label_becomes_an_empty_csv_field() {
        let mut out = Vec::new();
        write_csv_record(&mut out, &record(None)).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "3,2,0.001000,true,\n");
    }

    #[test]
    fn summaries_serialize_to_toml_arrays() {
        let mut summary = BatchSummary::default();
        summary.push(&record(Some(Expected::Satisfiable)));
        assert_eq!(summary.len(), 1);
        assert_eq!(
            summary_to_toml(&summary),
            "sizes = [3]\ntimes = [0.001]\nanswers = [true]\n"
        );
    }
}
