//! Labeled DIMACS batch parser

use crate::{
    formula::{Expected, Formula, Instance},
    input::Input,
    literal::Literal,
    output::unreachable,
};
use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Result, StdinLock},
};

/// Open a file for reading.
/// # Panics
/// Panics on error.
pub fn open_file(filename: &str) -> File {
    File::open(filename).unwrap_or_else(|err| die!("cannot open file: {}", err))
}

/// Open a file for writing.
/// # Panics
/// Panics on error.
pub fn open_file_for_writing(filename: &str) -> BufWriter<File> {
    BufWriter::new(
        File::create(filename).unwrap_or_else(|err| die!("cannot open file for writing: {}", err)),
    )
}

/// File extension of Zstandard archives.
const ZSTD: &str = ".zst";
/// File extension of Gzip archives.
const GZIP: &str = ".gz";
/// File extension of Bzip2 archives.
const BZIP2: &str = ".bz2";
/// File extension of XZ archives.
const XZ: &str = ".xz";
/// File extension of LZ4 archives.
const LZ4: &str = ".lz4";

/// Strip the compression format off a filename.
///
/// If the filename ends with a known archive extension,
/// return the filename without extension and the extension.
/// Otherwise return the unmodified filename and the empty string.
fn compression_format_by_extension(filename: &str) -> (&str, &str) {
    let mut basename = filename;
    let mut compression_format = "";
    for extension in &[ZSTD, GZIP, BZIP2, LZ4, XZ] {
        if filename.ends_with(extension) {
            compression_format = extension;
            basename = &filename[0..filename.len() - extension.len()];
            break;
        }
    }
    (basename, compression_format)
}

/// Return an [Input](struct.Input.html) to read from a possibly compressed file.
///
/// If the file is compressed it is transparently uncompressed.
/// If the filename is "-", returns an [Input](struct.Input.html) reading data from stdin.
pub fn read_compressed_file_or_stdin<'a>(filename: &'a str, stdin: StdinLock<'a>) -> Input<'a> {
    match filename {
        "-" => Input::new(Box::new(stdin.bytes().map(panic_on_error))),
        filename => read_compressed_file(filename),
    }
}

/// Return an [Input](struct.Input.html) to read from a possibly compressed file.
///
/// If the file is compressed it is transparently uncompressed.
pub fn read_compressed_file(filename: &str) -> Input {
    let file = open_file(filename);
    Input::new(read_from_compressed_file(file, filename))
}

/// Return an Iterator to read from a possibly compressed file.
///
/// If the file is compressed it is transparently uncompressed.
fn read_from_compressed_file(file: File, filename: &str) -> Box<dyn Iterator<Item = u8>> {
    let (_basename, compression_format) = compression_format_by_extension(filename);
    if compression_format == "" {
        return Box::new(BufReader::new(file).bytes().map(panic_on_error));
    }
    match compression_format {
        ZSTD => {
            let de = zstd::stream::read::Decoder::new(file)
                .unwrap_or_else(|err| die!("failed to decompress ZST archive: {}", err));
            Box::new(de.bytes().map(panic_on_error))
        }
        GZIP => {
            let de = flate2::read::GzDecoder::new(file);
            Box::new(de.bytes().map(panic_on_error))
        }
        BZIP2 => {
            let de = bzip2::read::BzDecoder::new(file);
            Box::new(de.bytes().map(panic_on_error))
        }
        XZ => {
            let de = xz2::read::XzDecoder::new(file);
            Box::new(de.bytes().map(panic_on_error))
        }
        LZ4 => {
            let de = lz4::Decoder::new(file)
                .unwrap_or_else(|err| die!("failed to decode LZ4 archive: {}", err));
            Box::new(de.bytes().map(panic_on_error))
        }
        _ => unreachable(),
    }
}

/// Unwraps a result, panicking on error.
pub fn panic_on_error<T>(result: Result<T>) -> T {
    result.unwrap_or_else(|error| die!("{}", error))
}

/// Parse a batch of labeled problems.
///
/// A comment line whose last whitespace-separated token is `S` or `U` sets
/// the expected label for the problem it precedes (or, when it occurs
/// between the clauses of a problem, for that problem). Each `p cnf` header
/// is followed by exactly as many clauses as it declares.
pub fn parse_instances(input: &mut Input) -> Result<Vec<Instance>> {
    let mut instances = Vec::new();
    let mut pending_label = None;
    loop {
        input.skip_any_whitespace();
        match input.peek() {
            None => break,
            Some(b'c') => {
                if let Some(label) = parse_comment(input)? {
                    pending_label = Some(label);
                }
            }
            Some(b'p') => {
                instances.push(parse_problem(input, &mut pending_label)?);
                pending_label = None;
            }
            Some(_) => return Err(input.error(Input::P_CNF)),
        }
    }
    Ok(instances)
}

/// Parse a DIMACS comment, returning the label it carries, if any.
///
/// Consumes a leading "c" and any characters until (including) the next
/// newline; a comment may also be ended by EOF.
fn parse_comment(input: &mut Input) -> Result<Option<Expected>> {
    requires!(input.peek() == Some(b'c'));
    input.next();
    let mut text = Vec::new();
    while let Some(c) = input.next() {
        if c == b'\n' {
            break;
        }
        text.push(c);
    }
    let text = String::from_utf8_lossy(&text);
    Ok(match text.split_whitespace().last() {
        Some("S") => Some(Expected::Satisfiable),
        Some("U") => Some(Expected::Unsatisfiable),
        _ => None,
    })
}

/// Parse a problem header.
fn parse_problem_header(input: &mut Input) -> Result<(u32, u64)> {
    for &expected in b"p cnf" {
        if input.peek().map_or(true, |c| c != expected) {
            return Err(input.error(Input::P_CNF));
        }
        input.next();
    }
    input.skip_some_whitespace()?;
    let declared_variables = input.parse_dec32()?;
    if declared_variables < 0 {
        return Err(input.error(Input::P_CNF));
    }
    input.skip_some_whitespace()?;
    let declared_clauses = input.parse_dec64()?;
    if declared_clauses < 0 {
        return Err(input.error(Input::P_CNF));
    }
    input.skip_some_whitespace()?;
    Ok((declared_variables as u32, declared_clauses as u64))
}

/// Parse one problem: its header, then clauses until the declared count is
/// reached. Comments between clauses may still change the label.
fn parse_problem(input: &mut Input, label: &mut Option<Expected>) -> Result<Instance> {
    let (declared_variables, declared_clauses) = parse_problem_header(input)?;
    let mut formula = Formula::new();
    while (formula.number_of_clauses() as u64) < declared_clauses {
        input.skip_any_whitespace();
        match input.peek() {
            None => return Err(input.error(Input::EOF)),
            Some(b'c') => {
                if let Some(found) = parse_comment(input)? {
                    *label = Some(found);
                }
            }
            Some(c) if Input::is_digit_or_dash(c) => parse_clause(input, &mut formula)?,
            Some(_) => return Err(input.error(Input::NUMBER)),
        }
    }
    Ok(Instance {
        declared_variables,
        declared_clauses,
        formula,
        expected: *label,
    })
}

/// Parse one clause, terminated by a 0 literal.
fn parse_clause(input: &mut Input, formula: &mut Formula) -> Result<()> {
    formula.open_clause();
    loop {
        let literal = parse_literal(input)?;
        if literal.is_zero() {
            return Ok(());
        }
        formula.push_literal(literal);
    }
}

/// Parse a literal and the whitespace after it.
fn parse_literal(input: &mut Input) -> Result<Literal> {
    match input.peek() {
        None => Err(input.error(Input::EOF)),
        Some(c) if Input::is_digit_or_dash(c) => {
            let literal = Literal::new(input.parse_dec32()?);
            input.skip_some_whitespace()?;
            Ok(literal)
        }
        Some(_) => Err(input.error(Input::NUMBER)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(example: &str) -> Result<Vec<Instance>> {
        let mut input = Input::new(Box::new(example.as_bytes().iter().cloned()));
        parse_instances(&mut input)
    }

    fn literals(clause: &[Literal]) -> Vec<i32> {
        clause.iter().map(|literal| literal.decode()).collect()
    }

    #[test]
    fn parses_a_labeled_batch() {
        let instances = parse(
            "c crafted uf2-01 S\n\
             p cnf 2 2\n\
             1 2 0\n\
             -1 -2 0\n\
             c crafted uuf1-01 U\n\
             p cnf 1 2\n\
             1 0\n\
             -1 0\n",
        )
        .unwrap();
        assert_eq!(instances.len(), 2);
        assert_eq!(instances[0].declared_variables, 2);
        assert_eq!(instances[0].declared_clauses, 2);
        assert_eq!(instances[0].expected, Some(Expected::Satisfiable));
        assert_eq!(literals(instances[0].formula.clause(0)), vec![1, 2]);
        assert_eq!(literals(instances[0].formula.clause(1)), vec![-1, -2]);
        assert_eq!(instances[1].expected, Some(Expected::Unsatisfiable));
        assert_eq!(instances[1].formula.number_of_clauses(), 2);
    }

    #[test]
    fn label_is_consumed_by_the_next_problem() {
        let instances = parse("c 1 S\np cnf 1 1\n1 0\np cnf 1 1\n-1 0\n").unwrap();
        assert_eq!(instances[0].expected, Some(Expected::Satisfiable));
        assert_eq!(instances[1].expected, None);
    }

    #[test]
    fn comment_without_label_is_ignored() {
        let instances = parse("c nothing to see\np cnf 1 1\n1 0\n").unwrap();
        assert_eq!(instances[0].expected, None);
    }

    #[test]
    fn label_between_clauses_applies_to_the_surrounding_problem() {
        let instances = parse("p cnf 1 2\n1 0\nc late U\n-1 0\n").unwrap();
        assert_eq!(instances[0].expected, Some(Expected::Unsatisfiable));
    }

    #[test]
    fn zero_clause_header_yields_an_empty_instance() {
        let instances = parse("p cnf 3 0\n").unwrap();
        assert_eq!(instances.len(), 1);
        assert_eq!(instances[0].declared_variables, 3);
        assert_eq!(instances[0].formula.number_of_clauses(), 0);
    }

    #[test]
    fn truncated_problem_is_an_error() {
        assert!(parse("p cnf 3 2\n1 -3 0\n").is_err());
        assert!(parse("p cnf 1 1\n1\n").is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(parse("x 1 0\n").is_err());
        assert!(parse("p dnf 1 1\n1 0\n").is_err());
    }
}
