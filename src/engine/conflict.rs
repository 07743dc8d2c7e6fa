//! Conflict detection and implication graph construction

use super::{
    graph::{ImplGraph, Node},
    trail::{DecLvl, Decision},
    Engine,
};
use crate::{
    clause::ClauseId,
    literal::{Lit, Var},
};
use tracing::debug;

/// Analysis of the falsified clause of the current snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub(crate) clause: ClauseId,
    pub(crate) level_graph: ImplGraph,
    pub(crate) full_graph: ImplGraph,
    pub(crate) uips: Vec<Lit>,
    pub(crate) learned: Vec<Lit>,
}

impl Conflict {
    /// The first clause (by id) whose literals are all false.
    #[must_use]
    pub fn clause(&self) -> ClauseId {
        self.clause
    }

    /// Implication graph restricted to the highest decision level, including `κ`.
    #[must_use]
    pub fn level_graph(&self) -> &ImplGraph {
        &self.level_graph
    }

    /// Implication graph over all decisions, including `κ`.
    #[must_use]
    pub fn full_graph(&self) -> &ImplGraph {
        &self.full_graph
    }

    #[must_use]
    pub fn uip_candidates(&self) -> &[Lit] {
        &self.uips
    }

    /// The clause learned from this conflict, not yet part of the formula.
    #[must_use]
    pub fn learned(&self) -> &[Lit] {
        &self.learned
    }
}

impl Engine {
    /// Looks for a falsified clause and analyzes it.
    /// Records the conflict node as a side effect.
    pub(crate) fn detect_conflict(&mut self) -> Option<Conflict> {
        let clause = self
            .formula
            .clauses
            .iter()
            .find(|clause| clause.iter().all(|&lit| self.assignment.is_false(lit)))?;

        let highest_level = self.trail.highest_level().unwrap_or(DecLvl::ROOT);
        let at_highest_level: Vec<(Var, &Decision)> =
            self.trail.iter().filter(|(_, decision)| decision.level == highest_level).collect();
        let level_nodes: Vec<Lit> =
            at_highest_level.iter().map(|&(var, decision)| decision.lit(var)).collect();

        let mut level_graph = ImplGraph::default();
        for &(var, decision) in &at_highest_level {
            let parents = decision.parents.iter().filter(|parent| level_nodes.contains(parent));
            let parents = parents.map(|&parent| Node::Lit(parent));
            level_graph.insert(Node::Lit(decision.lit(var)), parents);
        }
        let conflict_parents: Vec<Lit> =
            level_nodes.iter().copied().filter(|&lit| clause.lits().contains(&!lit)).collect();
        level_graph.insert(Node::Conflict, conflict_parents.iter().map(|&lit| Node::Lit(lit)));

        let mut full_graph = ImplGraph::default();
        for (var, decision) in self.trail.iter() {
            let parents = decision.parents.iter().map(|&lit| Node::Lit(lit));
            full_graph.insert(Node::Lit(decision.lit(var)), parents);
        }
        full_graph.insert(Node::Conflict, conflict_parents.iter().map(|&lit| Node::Lit(lit)));

        let uips = level_graph.uip_candidates();
        let learned = self.heuristic.learn(&self.trail, &full_graph, &uips);
        debug!(
            "conflict in clause {} at level {highest_level}, uip candidates {}, learned {}",
            clause.id(),
            self.formula.variables.slice(&uips),
            self.formula.variables.slice(&learned),
        );

        let conflict = Conflict { clause: clause.id(), level_graph, full_graph, uips, learned };
        let level = self.current_level.predecessor();
        self.sentinel = Some(Decision::conflict(level, conflict.clause, conflict_parents));
        Some(conflict)
    }
}
