//! Step-wise CDCL engine.
//!
//! The engine never picks a decision variable on its own. Assignments are supplied
//! one at a time through [`Engine::decide`] and every mutation re-runs the pipeline
//! of unit propagation, conflict detection, and the satisfaction check.

use self::{
    assignment::Assignment,
    history::{History, Snapshot},
    stats::Statistics,
    trail::Trail,
};
use crate::{
    clause::{db::ClauseDatabase, Clause, ClauseId},
    formula::Formula,
    literal::{Lit, Var, VariableDatabase},
    sat::{self, varisat::Varisat},
    Status,
};
use derivative::Derivative;
use miette::Diagnostic;
use thiserror::Error;
use tracing::debug;

pub(crate) mod assignment;
pub(crate) mod conflict;
pub(crate) mod graph;
pub(crate) mod history;
pub(crate) mod learn;
pub(crate) mod propagation;
pub(crate) mod stats;
pub(crate) mod trail;


// Re-export
pub use conflict::Conflict;
pub use graph::{GraphDisplay, ImplGraph, Node};
pub use learn::{Heuristic, UnknownHeuristic};
pub use trail::{DecLvl, Decision};

#[derive(Debug, Error, Diagnostic)]
pub enum EngineError {
    #[error("Unknown variable `{name}`")]
    #[diagnostic(help("decisions can only be made on variables of the loaded formula"))]
    UnknownVariable { name: String },

    #[error("The SAT oracle has failed")]
    Oracle(#[from] varisat::solver::SolverError),
}

#[derive(Derivative)]
#[derivative(Debug, Default)]
pub struct Engine {
    formula: Formula,
    assignment: Assignment,
    trail: Trail,
    /// level of the next manual decision
    #[derivative(Default(value = "DecLvl::FIRST"))]
    current_level: DecLvl,
    #[derivative(Debug = "ignore")]
    history: History,
    heuristic: Heuristic,
    /// the conflict node `κ`, present while a conflict or an UNSAT verdict is active
    sentinel: Option<Decision>,
    /// set by a forced assignment at the root level
    unsat: bool,
    conflict: Option<Conflict>,
    satisfied: Option<String>,
    stats: Statistics,
}

impl Engine {
    #[must_use]
    pub fn new(heuristic: Heuristic) -> Self {
        Self { heuristic, ..Self::default() }
    }

    /// Replaces the loaded formula by the clauses of `text` and starts over.
    pub fn submit_formula(&mut self, text: &str) {
        self.reset();
        self.formula = Formula::parse(text);
        let var_count = self.formula.variables.var_count();
        self.assignment.set_var_count(var_count);
        self.trail.set_var_count(var_count);
        debug!(
            "loaded {} clauses over {} variables",
            self.formula.clauses.num_clauses(),
            var_count
        );
        self.evaluate();
    }

    /// Assigns `polarity` to the variable called `name` at the current level.
    ///
    /// Deciding an already assigned variable overrides its value.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownVariable`] if the loaded formula has no such
    /// variable. The engine state is unchanged in that case.
    pub fn decide(&mut self, name: &str, polarity: bool) -> Result<(), EngineError> {
        let var = self
            .formula
            .variables
            .lookup(name)
            .ok_or_else(|| EngineError::UnknownVariable { name: name.to_owned() })?;
        let snapshot = self.snapshot();
        self.history.push(snapshot);
        let lit = var.lit(polarity);
        debug!("decide {} at level {}", self.formula.variables.lit(lit), self.current_level);
        self.assignment.assign(lit);
        self.trail.insert(var, Decision::manual(polarity, self.current_level));
        self.current_level = self.current_level.successor();
        self.stats.decisions += 1;
        self.evaluate();
        Ok(())
    }

    /// Reverts the last decision. Returns `false` if there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        if !self.history.can_undo() {
            return false;
        }
        let current = self.snapshot();
        let Some(previous) = self.history.undo(current) else {
            return false;
        };
        self.restore(previous);
        self.current_level = self.current_level.predecessor();
        self.stats.undos += 1;
        debug!("undo, back at level {}", self.current_level);
        self.evaluate();
        true
    }

    /// Replays the last undone decision. Returns `false` if there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        if !self.history.can_redo() {
            return false;
        }
        let current = self.snapshot();
        let Some(next) = self.history.redo(current) else {
            return false;
        };
        self.restore(next);
        self.current_level = self.current_level.successor();
        self.stats.redos += 1;
        debug!("redo, now at level {}", self.current_level);
        self.evaluate();
        true
    }

    /// Drops the formula and all derived state. The heuristic is kept.
    pub fn reset(&mut self) {
        self.formula = Formula::default();
        self.restart();
    }

    /// Appends the pending learned clause to the formula and starts a new round
    /// over the augmented formula.
    /// The undo and redo history is dropped.
    ///
    /// Returns the id of the new clause, or `None` if no clause is pending.
    pub fn commit_learned_clause(&mut self) -> Option<ClauseId> {
        let learned = self.learned_clause()?.to_vec();
        let id = self.formula.clauses.add(&learned, true);
        debug!("learned clause {id}: {}", self.formula.variables.slice(&learned));
        self.stats.learned_clauses += 1;
        self.restart();
        let var_count = self.formula.variables.var_count();
        self.assignment.set_var_count(var_count);
        self.trail.set_var_count(var_count);
        self.evaluate();
        Some(id)
    }

    /// Selects the learning heuristic; a pending learned clause is recomputed.
    pub fn set_heuristic(&mut self, heuristic: Heuristic) {
        debug!("heuristic set to {heuristic}");
        self.heuristic = heuristic;
        self.evaluate();
    }

    /// Clears everything except the formula, the heuristic, and the statistics.
    fn restart(&mut self) {
        self.assignment.clear();
        self.trail.clear();
        self.history.clear();
        self.current_level = DecLvl::FIRST;
        self.sentinel = None;
        self.unsat = false;
        self.conflict = None;
        self.satisfied = None;
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            assignment: self.assignment.clone(),
            trail: self.trail.clone(),
            unsat: self.unsat,
            sentinel: self.sentinel.clone(),
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        let Snapshot { assignment, trail, unsat, sentinel } = snapshot;
        self.assignment = assignment;
        self.trail = trail;
        self.unsat = unsat;
        self.sentinel = sentinel;
    }

    /// Propagation, conflict detection, and the satisfaction check.
    fn evaluate(&mut self) {
        if !self.unsat {
            self.sentinel = None;
        }
        self.conflict = None;
        self.propagate();
        if !self.unsat {
            self.conflict = self.detect_conflict();
            if self.conflict.is_some() {
                self.stats.conflicts += 1;
            }
        }
        self.satisfied = self.check_satisfaction();
        if let Some(assignment) = &self.satisfied {
            debug!("formula satisfied by {assignment}");
        }
    }

    fn check_satisfaction(&self) -> Option<String> {
        if self.formula.clauses.is_empty()
            || !self.formula.clauses.iter().all(|clause| self.is_clause_satisfied(clause))
        {
            return None;
        }
        let tokens: Vec<String> = self
            .trail
            .iter()
            .map(|(var, decision)| self.formula.variables.lit(decision.lit(var)).to_string())
            .collect();
        Some(format!("({})", tokens.join(" ∧ ")))
    }

    #[must_use]
    pub fn formula(&self) -> &Formula {
        &self.formula
    }

    #[must_use]
    pub fn clauses(&self) -> &ClauseDatabase {
        &self.formula.clauses
    }

    #[must_use]
    pub fn variables(&self) -> &VariableDatabase {
        &self.formula.variables
    }

    /// The decision map in the order the variables were first assigned.
    pub fn decisions(&self) -> impl Iterator<Item = (Var, &Decision)> {
        self.trail.iter()
    }

    #[must_use]
    pub fn decision(&self, name: &str) -> Option<&Decision> {
        self.trail.get(self.formula.variables.lookup(name)?)
    }

    /// The decision record of the conflict node `κ`.
    #[must_use]
    pub fn sentinel(&self) -> Option<&Decision> {
        self.sentinel.as_ref()
    }

    #[must_use]
    pub fn value(&self, var: Var) -> Option<bool> {
        self.assignment[var]
    }

    #[must_use]
    pub fn is_clause_satisfied(&self, clause: &Clause) -> bool {
        clause.iter().any(|&lit| self.assignment.is_true(lit))
    }

    /// The satisfying assignment in decision map order, e.g., `(A ∧ -B)`.
    #[must_use]
    pub fn satisfying_assignment(&self) -> Option<&str> {
        self.satisfied.as_deref()
    }

    #[must_use]
    pub fn is_unsat(&self) -> bool {
        self.unsat
    }

    #[must_use]
    pub fn is_conflict(&self) -> bool {
        self.conflict.is_some()
    }

    #[must_use]
    pub fn conflict(&self) -> Option<&Conflict> {
        self.conflict.as_ref()
    }

    /// The clause learned from the active conflict. An empty learned clause is
    /// never pending.
    #[must_use]
    pub fn learned_clause(&self) -> Option<&[Lit]> {
        self.conflict.as_ref().map(Conflict::learned).filter(|learned| !learned.is_empty())
    }

    #[must_use]
    pub fn current_level(&self) -> DecLvl {
        self.current_level
    }

    #[must_use]
    pub fn heuristic(&self) -> Heuristic {
        self.heuristic
    }

    #[must_use]
    pub fn status(&self) -> Status {
        if self.unsat {
            Status::Unsat
        } else if self.conflict.is_some() {
            Status::Conflict
        } else if self.satisfied.is_some() {
            Status::Satisfied
        } else {
            Status::Unresolved
        }
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub(crate) fn stats(&self) -> &Statistics {
        &self.stats
    }

    /// Asks the SAT oracle for a model of the current clause list.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Oracle`] if the SAT solver fails.
    pub fn check_satisfiable(&self) -> Result<Option<Vec<Lit>>, EngineError> {
        let model = sat::find_model::<Varisat>(self.formula.clauses.iter().map(Clause::lits))?;
        Ok(model)
    }

    /// Asks the SAT oracle whether the pending learned clause follows from the
    /// current clause list. Returns `None` if no clause is pending.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Oracle`] if the SAT solver fails.
    pub fn check_learned_clause(&self) -> Result<Option<bool>, EngineError> {
        let Some(learned) = self.learned_clause() else {
            return Ok(None);
        };
        let implied =
            sat::is_implied::<Varisat>(self.formula.clauses.iter().map(Clause::lits), learned)?;
        Ok(Some(implied))
    }
}
