//! Clause storage and parsed instances

use crate::literal::{Literal, Variable};
use static_assertions::const_assert;
use std::{fmt, mem::size_of};

/// A CNF formula, its clauses stored back to back in one literal buffer.
///
/// Clause `i` occupies `literals[offsets[i]..offsets[i + 1]]` (the last
/// clause runs to the end of the buffer).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Formula {
    literals: Vec<Literal>,
    offsets: Vec<usize>,
}

impl Formula {
    pub fn new() -> Formula {
        Formula::default()
    }
    /// Start a new, initially empty clause and return its index.
    pub fn open_clause(&mut self) -> usize {
        self.offsets.push(self.literals.len());
        self.offsets.len() - 1
    }
    /// Append a literal to the clause that was opened last.
    pub fn push_literal(&mut self, literal: Literal) {
        requires!(!literal.is_zero());
        requires!(!self.offsets.is_empty());
        self.literals.push(literal);
    }
    pub fn number_of_clauses(&self) -> usize {
        self.offsets.len()
    }
    pub fn clause(&self, index: usize) -> &[Literal] {
        let end = self
            .offsets
            .get(index + 1)
            .cloned()
            .unwrap_or_else(|| self.literals.len());
        &self.literals[self.offsets[index]..end]
    }
    pub fn clauses(&self) -> impl Iterator<Item = &[Literal]> + '_ {
        (0..self.number_of_clauses()).map(move |index| self.clause(index))
    }
    /// The highest variable occurring in any clause, found by scanning the
    /// literals. Declared header counts play no role here.
    pub fn maximum_variable(&self) -> Variable {
        Variable(
            self.literals
                .iter()
                .map(|literal| literal.variable().0)
                .max()
                .unwrap_or(0),
        )
    }
}

/// Write the literals of one clause to stdout in DIMACS format.
///
/// Includes a terminating 0, but no newline.
pub fn puts_clause(clause: &[Literal]) {
    for &literal in clause {
        puts!("{} ", literal);
    }
    puts!("0");
}

/// Ground-truth satisfiability label attached to an instance.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Expected {
    Satisfiable,
    Unsatisfiable,
}

impl Expected {
    /// The single-letter form used in batch files and result records.
    pub fn letter(self) -> &'static str {
        match self {
            Expected::Satisfiable => "S",
            Expected::Unsatisfiable => "U",
        }
    }
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// One parsed problem: the header counts, the clauses and an optional label.
#[derive(Debug, PartialEq)]
pub struct Instance {
    /// The variable count declared in the `p cnf` header. The search engine
    /// derives the authoritative count from the literals instead.
    pub declared_variables: u32,
    /// The clause count declared in the `p cnf` header; the parser reads
    /// exactly this many clauses.
    pub declared_clauses: u64,
    pub formula: Formula,
    pub expected: Option<Expected>,
}

/// State the sizes of data types.
#[allow(dead_code)]
fn assert_primitive_sizes() {
    const_assert!(size_of::<Literal>() == 4);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clauses_are_sliced_from_the_flat_buffer() {
        let mut formula = Formula::new();
        formula.open_clause();
        formula.push_literal(Literal::new(1));
        formula.push_literal(Literal::new(-2));
        formula.open_clause();
        formula.push_literal(Literal::new(2));
        assert_eq!(formula.number_of_clauses(), 2);
        assert_eq!(formula.clause(0), &[Literal::new(1), Literal::new(-2)][..]);
        assert_eq!(formula.clause(1), &[Literal::new(2)][..]);
    }

    #[test]
    fn maximum_variable_of_an_empty_formula_is_zero() {
        assert_eq!(Formula::new().maximum_variable(), Variable::new(0));
    }
}
