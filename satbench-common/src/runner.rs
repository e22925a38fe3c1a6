//! Batch driver for the search engine

use crate::{
    formula::{puts_clause, Expected, Instance},
    report::{BatchSummary, ResultRecord, ResultSink},
    solver::Search,
};
use std::{fmt, time::Instant};

/// The search verdict for an instance contradicts its ground-truth label.
///
/// This is a correctness-verification failure, not an input problem: it is
/// never retried, and it aborts the whole batch.
#[derive(Debug, PartialEq, Eq)]
pub struct FatalMismatch {
    /// 1-based position of the offending instance in the batch.
    pub instance: usize,
    /// What the search reported.
    pub satisfiable: bool,
    /// What the label says.
    pub expected: Expected,
}

impl fmt::Display for FatalMismatch {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "mismatch in instance {}: search found it {} but it is labeled {}",
            self.instance,
            if self.satisfiable {
                "satisfiable"
            } else {
                "unsatisfiable"
            },
            match self.expected {
                Expected::Satisfiable => "satisfiable",
                Expected::Unsatisfiable => "unsatisfiable",
            },
        )
    }
}

/// Run the search engine over every instance in input order.
///
/// Each instance gets a fresh engine; the search call is timed and its
/// record goes to the sink before the verdict is compared against the
/// label, so a contradicting instance still produces a record. On the
/// first contradiction the batch stops: later instances are not touched
/// and the sink never sees a summary. Unlabeled instances accept any
/// verdict.
pub fn run_batch(
    instances: &[Instance],
    sink: &mut impl ResultSink,
    verbose: bool,
) -> Result<BatchSummary, FatalMismatch> {
    let mut summary = BatchSummary::default();
    for (index, instance) in instances.iter().enumerate() {
        if verbose {
            comment!("instance {}:", index + 1);
            for clause in instance.formula.clauses() {
                puts!("c ");
                puts_clause(clause);
                puts!("\n");
            }
        }
        let mut search = Search::new(&instance.formula);
        let variables = search.number_of_variables();
        if variables as u64 > u64::from(instance.declared_variables) {
            warn!(
                "instance {} declares {} variables but its literals reach {}",
                index + 1,
                instance.declared_variables,
                variables
            );
        }
        let start = Instant::now();
        let satisfiable = search.search();
        let seconds = start.elapsed().as_secs_f64();
        let record = ResultRecord {
            variables,
            clauses: instance.declared_clauses,
            seconds,
            satisfiable,
            expected: instance.expected,
        };
        comment!(
            "vars: {:>4} clauses: {:>6} time: {:>10.6} satisfiable: {:<5} expected: {}",
            record.variables,
            record.clauses,
            record.seconds,
            record.satisfiable,
            record.expected.map_or("-", Expected::letter)
        );
        sink.record(&record);
        summary.push(&record);
        if let Some(expected) = instance.expected {
            let contradicted = match expected {
                Expected::Satisfiable => !satisfiable,
                Expected::Unsatisfiable => satisfiable,
            };
            if contradicted {
                return Err(FatalMismatch {
                    instance: index + 1,
                    satisfiable,
                    expected,
                });
            }
        }
    }
    sink.summary(&summary);
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{formula::Formula, literal::Literal};

    #[derive(Default)]
    struct CollectingSink {
        records: Vec<ResultRecord>,
        summaries: usize,
    }

    impl ResultSink for CollectingSink {
        fn record(&mut self, record: &ResultRecord) {
            self.records.push(record.clone());
        }
        fn summary(&mut self, _summary: &BatchSummary) {
            self.summaries += 1;
        }
    }

    fn instance(clauses: &[&[i32]], expected: Option<Expected>) -> Instance {
        let mut formula = Formula::new();
        for clause in clauses {
            formula.open_clause();
            for &literal in *clause {
                formula.push_literal(Literal::new(literal));
            }
        }
        Instance {
            declared_variables: formula.maximum_variable().0,
            declared_clauses: clauses.len() as u64,
            formula,
            expected,
        }
    }

    #[test]
    fn a_clean_batch_produces_full_parallel_sequences() {
        let instances = vec![
            instance(&[&[1, 2], &[-1, -2]], Some(Expected::Satisfiable)),
            instance(&[&[1], &[-1]], Some(Expected::Unsatisfiable)),
            instance(&[&[3]], None),
        ];
        let mut sink = CollectingSink::default();
        let summary = run_batch(&instances, &mut sink, false).unwrap();
        assert_eq!(summary.len(), 3);
        assert_eq!(summary.answers, vec![true, false, true]);
        assert_eq!(summary.sizes, vec![2, 1, 3]);
        assert!(summary.times.iter().all(|&seconds| seconds >= 0.0));
        assert_eq!(sink.records.len(), 3);
        assert_eq!(sink.summaries, 1);
    }

    #[test]
    fn the_first_mismatch_stops_the_batch() {
        let instances = vec![
            instance(&[&[1]], Some(Expected::Satisfiable)),
            instance(&[&[1]], Some(Expected::Unsatisfiable)),
            instance(&[&[2]], Some(Expected::Satisfiable)),
        ];
        let mut sink = CollectingSink::default();
        let mismatch = run_batch(&instances, &mut sink, false).unwrap_err();
        assert_eq!(
            mismatch,
            FatalMismatch {
                instance: 2,
                satisfiable: true,
                expected: Expected::Unsatisfiable,
            }
        );
        // The contradicting instance still produced its record, later
        // instances did not run, and no summary was emitted.
        assert_eq!(sink.records.len(), 2);
        assert_eq!(sink.summaries, 0);
    }

    #[test]
    fn an_unsatisfiable_result_contradicts_a_satisfiable_label() {
        let instances = vec![instance(&[&[1], &[-1]], Some(Expected::Satisfiable))];
        let mut sink = CollectingSink::default();
        let mismatch = run_batch(&instances, &mut sink, false).unwrap_err();
        assert_eq!(mismatch.instance, 1);
        assert!(!mismatch.satisfiable);
    }

    #[test]
    fn unlabeled_instances_accept_any_verdict() {
        let instances = vec![
            instance(&[&[1], &[-1]], None),
            instance(&[&[1]], None),
        ];
        let mut sink = CollectingSink::default();
        let summary = run_batch(&instances, &mut sink, false).unwrap();
        assert_eq!(summary.answers, vec![false, true]);
    }

    #[test]
    fn records_carry_the_derived_variable_count() {
        // The header understates the variable count; the record reports
        // what the literals actually reach.
        let mut wrong_header = instance(&[&[1, -4]], None);
        wrong_header.declared_variables = 1;
        let mut sink = CollectingSink::default();
        let summary = run_batch(&[wrong_header], &mut sink, false).unwrap();
        assert_eq!(summary.sizes, vec![4]);
        assert_eq!(sink.records[0].variables, 4);
    }
}
