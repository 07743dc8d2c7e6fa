//! Parser for the textual formula notation, e.g., `(A,B)(-A,C)(-B,-C)`.
//!
//! Every parenthesized group is a clause, literals are separated by `,` and a
//! leading `-` negates a literal. Text outside of groups is ignored, such that
//! malformed input results in fewer (or no) clauses instead of an error.

use crate::{
    clause::{db::ClauseDatabase, ClauseId},
    literal::{Lit, Var, VariableDatabase},
};
use tracing::{trace, warn};

/// A formula as it was loaded: the clause list and the derived variable set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Formula {
    pub(crate) variables: VariableDatabase,
    pub(crate) clauses: ClauseDatabase,
}

impl Formula {
    /// Parses `text` into clauses numbered from 1 in order of appearance.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut formula = Formula::default();
        for group in FormulaParser::new(text) {
            let lits: Vec<Lit> = group
                .split(',')
                .map(str::trim)
                .map(|token| formula.literal(token))
                .collect();
            let id: ClauseId = formula.clauses.add(&lits, false);
            trace!("clause {id}: {}", formula.variables.slice(&lits));
        }
        formula
    }

    fn literal(&mut self, token: &str) -> Lit {
        let (name, polarity) = split_literal(token);
        self.variables.intern(name).lit(polarity)
    }

    #[must_use]
    pub fn clauses(&self) -> &ClauseDatabase {
        &self.clauses
    }

    #[must_use]
    pub fn variables(&self) -> &VariableDatabase {
        &self.variables
    }

    /// The variables occurring in the clauses, in first-seen order.
    #[must_use]
    pub fn extract_variables(&self) -> Vec<Var> {
        let mut seen = vec![false; self.variables.var_count()];
        let mut vars = Vec::new();
        for lit in self.clauses.iter().flatten() {
            let var = lit.var();
            if !seen[var.as_index()] {
                seen[var.as_index()] = true;
                vars.push(var);
            }
        }
        vars
    }
}

impl std::fmt::Display for Formula {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for clause in &self.clauses {
            write!(f, "{}", self.variables.slice(clause.lits()))?;
        }
        Ok(())
    }
}

/// Splits a trimmed literal token into variable name and polarity.
pub(crate) fn split_literal(token: &str) -> (&str, bool) {
    match token.strip_prefix('-') {
        Some(name) => (name, false),
        None => (token, true),
    }
}

/// Iterates over the contents of the parenthesized groups of the input.
///
/// A group ends at the first `)` after its `(`. If a line break or the end of
/// the input comes first, the `(` is skipped and the search continues after it.
#[derive(Debug)]
struct FormulaParser<'a> {
    input: &'a str,
    offset: usize,
}

impl<'a> FormulaParser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, offset: 0 }
    }
}

impl<'a> Iterator for FormulaParser<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let open = self.input[self.offset..].find('(')?;
            let start = self.offset + open + 1;
            let body = &self.input[start..];
            match body.find(|c: char| matches!(c, ')' | '\n' | '\r')) {
                Some(end) if body[end..].starts_with(')') => {
                    self.offset = start + end + 1;
                    return Some(&body[..end]);
                }
                _ => {
                    warn!("ignoring unterminated clause starting at offset {}", start - 1);
                    self.offset = start;
                }
            }
        }
    }
}


#[cfg(test)]
mod test {
    use super::*;
    use proptest::prelude::*;

    fn names(formula: &Formula) -> Vec<&str> {
        formula.extract_variables().into_iter().map(|v| &formula.variables()[v]).collect()
    }

    proptest! {
        #[test]
        fn doesnt_crash(s in ".*") {
            let _formula = Formula::parse(&s);
        }

        #[test]
        fn roundtrip(input in strategy::formula(6, 0..20, 1..5)) {
            let parsed = Formula::parse(&input);
            prop_assert_eq!(parsed.to_string(), input);
        }
    }

    #[test]
    fn simple() {
        let formula = Formula::parse("(A,B)(-A,C)(-B,-C)");
        assert_eq!(formula.clauses().num_clauses(), 3);
        assert_eq!(names(&formula), ["A", "B", "C"]);
        let first = formula.clauses().iter().next().unwrap();
        assert_eq!(first.id().to_string(), "1");
        assert!(!first.is_learned());
        assert_eq!(formula.to_string(), "(A,B)(-A,C)(-B,-C)");
    }

    #[test]
    fn whitespace_is_trimmed() {
        let formula = Formula::parse("  ( x1 ,  -x2 )\t(-x1)  ");
        assert_eq!(formula.to_string(), "(x1,-x2)(-x1)");
        assert_eq!(names(&formula), ["x1", "x2"]);
    }

    #[test]
    fn first_seen_order() {
        let formula = Formula::parse("(-C,B)(A,C)");
        assert_eq!(names(&formula), ["C", "B", "A"]);
    }

    #[test]
    fn malformed_input() {
        assert!(Formula::parse("").clauses().is_empty());
        assert!(Formula::parse("A,B").clauses().is_empty());
        assert!(Formula::parse("(A,B").clauses().is_empty());
        assert!(Formula::parse("(A,\nB)").clauses().is_empty());
        assert!(Formula::parse("(A,B").variables().is_empty());
    }

    #[test]
    fn unterminated_group_is_skipped() {
        let formula = Formula::parse("(A,\n(B,C)");
        assert_eq!(formula.to_string(), "(B,C)");
    }

    #[test]
    fn nested_open_paren_belongs_to_literal() {
        let formula = Formula::parse("((A)");
        assert_eq!(names(&formula), ["(A"]);
    }

    #[test]
    fn empty_tokens_are_variables() {
        let formula = Formula::parse("()(A,,B)( )(-)");
        assert_eq!(formula.clauses().num_clauses(), 4);
        assert_eq!(names(&formula), ["", "A", "B"]);
        let first = formula.clauses().iter().next().unwrap();
        assert_eq!(first.lits(), &[formula.variables().lookup("").unwrap().positive()]);
        assert_eq!(formula.to_string(), "()(A,,B)()(-)");
    }

    #[test]
    fn literal_polarity() {
        assert_eq!(split_literal("-A"), ("A", false));
        assert_eq!(split_literal("A"), ("A", true));
        assert_eq!(split_literal("--A"), ("-A", false));
    }
}
