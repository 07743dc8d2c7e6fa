//! Clause database

use super::{Clause, ClauseId};
use crate::literal::Lit;

/// The clause list of a formula; original clauses first, learned clauses are appended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClauseDatabase {
    clauses: Vec<Clause>,
}

impl ClauseDatabase {
    #[must_use]
    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Clauses in id order.
    pub fn iter(&self) -> std::slice::Iter<'_, Clause> {
        self.clauses.iter()
    }

    #[must_use]
    pub fn get(&self, id: ClauseId) -> Option<&Clause> {
        self.clauses.get(id.as_index())
    }

    /// The id the next added clause will receive.
    pub(crate) fn next_id(&self) -> ClauseId {
        ClauseId::from_position(self.clauses.len())
    }

    pub(crate) fn add(&mut self, clause: &[Lit], learned: bool) -> ClauseId {
        let id = self.next_id();
        self.clauses.push(Clause::new(id, clause, learned));
        id
    }
}

impl std::ops::Index<ClauseId> for ClauseDatabase {
    type Output = Clause;

    fn index(&self, index: ClauseId) -> &Self::Output {
        &self.clauses[index.as_index()]
    }
}

impl<'a> IntoIterator for &'a ClauseDatabase {
    type Item = &'a Clause;
    type IntoIter = std::slice::Iter<'a, Clause>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
