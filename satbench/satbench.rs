//! Timed batch checker for a naive exhaustive CNF satisfiability search

use clap::{Arg, ArgMatches};
use satbench_common::{
    as_error, comment, config, die,
    formula::Instance,
    output::{install_signal_handler, print_key_value, print_solution, Timer},
    parser::{parse_instances, read_compressed_file_or_stdin},
    puts,
    report::FileReport,
    runner::run_batch,
};
use std::io;

/// Run `satbench`.
fn main() {
    std::process::exit(run_frontend());
}

/// Run `satbench`, returning its exit code.
///
/// This is a separate function because `std::process::exit` does not
/// call destructors.
fn run_frontend() -> i32 {
    install_signal_handler();
    let mut app = clap::App::new("satbench")
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .after_help(
            "The input file may be compressed - supported file extensions are: zst, gz, bz2, xz and lz4.
Use \"-\" to read the batch from standard input.",
        )
        .arg(
            Arg::with_name("INPUT")
                .required(true)
                .help("labeled CNF batch file"),
        )
        .arg(
            Arg::with_name("RESULTS_FILE")
                .takes_value(true)
                .short("o")
                .long("results")
                .help("Write one CSV result record per instance to this file."),
        )
        .arg(
            Arg::with_name("SUMMARY_FILE")
                .takes_value(true)
                .short("S")
                .long("summary")
                .help("Write the batch summary in TOML format to this file."),
        );
    if config::ENABLE_LOGGING {
        app = app.arg(
            Arg::with_name("v")
                .short("v")
                .help("Verbose output. Print every parsed instance."),
        );
    }

    let flags = Flags::new(app.get_matches());
    let timer = Timer::name("total time");
    let instances = parse_batch(&flags.input_filename);
    comment!("parsed {} instances", instances.len());
    let mut report = FileReport::new(
        flags.results_filename.as_deref(),
        flags.summary_filename.as_deref(),
    );
    let result = run_batch(&instances, &mut report, flags.verbose);
    if let Ok(summary) = &result {
        let satisfiable = summary.answers.iter().filter(|&&answer| answer).count();
        print_key_value("instances", summary.len());
        print_key_value("satisfiable", satisfiable);
        print_key_value("unsatisfiable", summary.len() - satisfiable);
    }
    drop(timer);
    match result {
        Ok(_) => {
            print_solution("VERIFIED");
            0
        }
        Err(mismatch) => {
            as_error!({
                puts!("c {}\n", mismatch);
            });
            print_solution("NOT VERIFIED");
            1
        }
    }
}

/// Parse the whole batch file, reporting progress and timing.
fn parse_batch(filename: &str) -> Vec<Instance> {
    let _timer = Timer::name("parsing");
    let stdin = io::stdin();
    let mut input = read_compressed_file_or_stdin(filename, stdin.lock());
    parse_instances(&mut input).unwrap_or_else(|err| die!("failed to parse {}: {}", filename, err))
}

/// Parsed arguments. See `satbench --help`.
#[derive(Debug)]
pub struct Flags {
    pub verbose: bool,
    pub input_filename: String,
    pub results_filename: Option<String>,
    pub summary_filename: Option<String>,
}

impl Flags {
    /// Create a flags instance from commandline arguments.
    pub fn new(matches: ArgMatches) -> Flags {
        Flags {
            verbose: matches.is_present("v"),
            input_filename: matches.value_of("INPUT").unwrap().to_string(),
            results_filename: matches.value_of("RESULTS_FILE").map(String::from),
            summary_filename: matches.value_of("SUMMARY_FILE").map(String::from),
        }
    }
}
