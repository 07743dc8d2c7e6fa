//! Unit propagation

use super::{
    trail::{DecLvl, Decision},
    Engine,
};
use crate::{
    clause::ClauseId,
    datastructure::VarVec,
    literal::{filter_var, Lit},
};
use tracing::{debug, trace};

/// An assignment forced by a clause whose other literals are all false.
#[derive(Debug, Clone)]
struct Implication {
    lit: Lit,
    level: DecLvl,
    clause: ClauseId,
    parents: Vec<Lit>,
}

impl Engine {
    /// Repeats propagation passes until no clause forces an assignment.
    pub(crate) fn propagate(&mut self) {
        while self.propagate_once() > 0 {}
    }

    /// A single pass over the clause list. Implications are collected against
    /// the assignment at the start of the pass and applied afterwards.
    /// Returns the number of applied implications.
    pub(crate) fn propagate_once(&mut self) -> usize {
        let implications = self.collect_implications();
        let count = implications.len();
        for implication in implications {
            self.apply(implication);
        }
        count
    }

    fn collect_implications(&self) -> Vec<Implication> {
        let mut queued: VarVec<bool> = VarVec::default();
        queued.set_var_count(self.formula.variables.var_count());
        let mut implications = Vec::new();
        for clause in &self.formula.clauses {
            if clause.iter().any(|&lit| self.assignment.is_true(lit)) {
                continue;
            }
            let mut unassigned =
                clause.iter().filter(|lit| !self.assignment.is_assigned(lit.var()));
            let (Some(&pivot), None) = (unassigned.next(), unassigned.next()) else {
                continue;
            };
            if std::mem::replace(&mut queued[pivot.var()], true) {
                continue;
            }
            let level = clause
                .iter()
                .filter(filter_var(pivot.var()))
                .filter_map(|lit| self.trail.level(lit.var()))
                .max()
                .unwrap_or(DecLvl::ROOT);
            let parents = clause.iter().filter(filter_var(pivot.var())).map(|&lit| !lit).collect();
            trace!("clause {} is unit on {}", clause.id(), self.formula.variables.lit(pivot));
            implications.push(Implication { lit: pivot, level, clause: clause.id(), parents });
        }
        implications
    }

    fn apply(&mut self, implication: Implication) {
        let Implication { lit, level, clause, parents } = implication;
        debug!(
            "{} implied by clause {clause} at level {level}",
            self.formula.variables.lit(lit)
        );
        self.assignment.assign(lit);
        if level.is_root() {
            debug!("root level implication, formula is unsatisfiable");
            self.unsat = true;
            self.sentinel = Some(Decision::conflict(DecLvl::ROOT, clause, vec![lit]));
        }
        self.trail.insert(lit.var(), Decision::implied(lit, level, clause, parents));
        self.stats.implications += 1;
    }
}
