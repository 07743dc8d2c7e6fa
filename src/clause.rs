use crate::literal::Lit;

pub(crate) mod db;

/// Identifier of a clause, 1-based in the order the clauses were added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClauseId(u32);

impl ClauseId {
    pub(crate) fn from_position(pos: usize) -> Self {
        Self(u32::try_from(pos + 1).expect("clause count fits into u32"))
    }

    pub(crate) fn as_index(self) -> usize {
        self.0 as usize - 1
    }
}

impl std::fmt::Display for ClauseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    id: ClauseId,
    lits: Vec<Lit>,
    learned: bool,
}

impl Clause {
    pub(crate) fn new(id: ClauseId, literals: &[Lit], learned: bool) -> Self {
        Self { id, lits: literals.to_vec(), learned }
    }

    #[must_use]
    pub fn id(&self) -> ClauseId {
        self.id
    }

    #[must_use]
    pub fn is_learned(&self) -> bool {
        self.learned
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Lit> {
        self.lits.iter()
    }

    #[must_use]
    pub fn lits(&self) -> &[Lit] {
        &self.lits
    }
}

impl<'a> IntoIterator for &'a Clause {
    type Item = &'a Lit;
    type IntoIter = std::slice::Iter<'a, Lit>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
