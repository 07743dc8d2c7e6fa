//! Generic SAT solver interface used as an oracle for the engine state.

use crate::literal::Lit;

pub(crate) mod varisat;

/// Incremental SAT solver interface.
///
/// We assume variables to be index-based, such that mapping from
/// [`crate::literal::Lit`] to [`SatSolver::Lit`] is cheap.
pub(crate) trait SatSolver: Default {
    type Lit: SatSolverLit + From<Lit> + Into<Lit>;
    type Err: std::error::Error + 'static;

    fn add_clause(&mut self, lits: &[Self::Lit]);
    fn solve_with_assumptions(&mut self, assumptions: &[Self::Lit]) -> Result<bool, Self::Err>;
    fn model(&mut self) -> Option<&[Self::Lit]>;

    fn solve(&mut self) -> Result<bool, Self::Err> {
        self.solve_with_assumptions(&[])
    }
}

pub(crate) trait SatSolverLit: Copy + Eq + std::ops::Not<Output = Self> {}

fn load<'a, S: SatSolver>(clauses: impl IntoIterator<Item = &'a [Lit]>) -> S {
    let mut solver = S::default();
    for clause in clauses {
        let lits: Vec<S::Lit> = clause.iter().map(|&lit| lit.into()).collect();
        solver.add_clause(&lits);
    }
    solver
}

/// A satisfying assignment of `clauses`, or `None` if they are unsatisfiable.
pub(crate) fn find_model<'a, S: SatSolver>(
    clauses: impl IntoIterator<Item = &'a [Lit]>,
) -> Result<Option<Vec<Lit>>, S::Err> {
    let mut solver: S = load(clauses);
    if !solver.solve()? {
        return Ok(None);
    }
    Ok(solver.model().map(|model| model.iter().map(|&lit| lit.into()).collect()))
}

/// Checks whether `clause` follows from `clauses`, i.e., whether the clauses are
/// unsatisfiable under the assumption that every literal of `clause` is false.
pub(crate) fn is_implied<'a, S: SatSolver>(
    clauses: impl IntoIterator<Item = &'a [Lit]>,
    clause: &[Lit],
) -> Result<bool, S::Err> {
    let mut solver: S = load(clauses);
    let assumptions: Vec<S::Lit> = clause.iter().map(|&lit| (!lit).into()).collect();
    Ok(!solver.solve_with_assumptions(&assumptions)?)
}
