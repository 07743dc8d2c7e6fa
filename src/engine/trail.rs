//! The decision map: at most one [`Decision`] per variable, iterated in the
//! order the variables were first assigned.

use crate::{
    clause::ClauseId,
    datastructure::VarVec,
    literal::{Lit, Var},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct DecLvl(usize);

impl DecLvl {
    pub const ROOT: DecLvl = DecLvl(0);

    /// Level of the first manual decision.
    pub const FIRST: DecLvl = DecLvl(1);

    #[must_use]
    pub fn new(level: usize) -> Self {
        Self(level)
    }

    #[must_use]
    pub fn get(self) -> usize {
        self.0
    }

    #[must_use]
    pub fn is_root(self) -> bool {
        self == Self::ROOT
    }

    pub(crate) fn successor(self) -> Self {
        Self(self.0 + 1)
    }

    pub(crate) fn predecessor(self) -> Self {
        Self(self.0.saturating_sub(1))
    }
}

impl std::fmt::Display for DecLvl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a variable (or the conflict node) got its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub polarity: bool,
    pub level: DecLvl,
    /// `false` for manual decisions
    pub implied: bool,
    /// the clause that forced the assignment, `None` for manual decisions
    pub antecedent: Option<ClauseId>,
    /// the negated co-members of the antecedent, i.e., the literals that implied this one
    pub parents: Vec<Lit>,
    pub conflict: bool,
}

impl Decision {
    pub(crate) fn manual(polarity: bool, level: DecLvl) -> Self {
        Self {
            polarity,
            level,
            implied: false,
            antecedent: None,
            parents: Vec::new(),
            conflict: false,
        }
    }

    pub(crate) fn implied(
        lit: Lit,
        level: DecLvl,
        antecedent: ClauseId,
        parents: Vec<Lit>,
    ) -> Self {
        Self {
            polarity: lit.is_positive(),
            level,
            implied: true,
            antecedent: Some(antecedent),
            parents,
            conflict: false,
        }
    }

    /// The decision record of the conflict node.
    pub(crate) fn conflict(level: DecLvl, antecedent: ClauseId, parents: Vec<Lit>) -> Self {
        Self {
            polarity: true,
            level,
            implied: true,
            antecedent: Some(antecedent),
            parents,
            conflict: true,
        }
    }

    /// The literal this decision makes true for `var`.
    #[must_use]
    pub fn lit(&self, var: Var) -> Lit {
        var.lit(self.polarity)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Trail {
    /// variables in the order of their first decision
    order: Vec<Var>,
    decisions: VarVec<Option<Decision>>,
}

impl Trail {
    pub(crate) fn set_var_count(&mut self, count: usize) {
        self.decisions.set_var_count(count);
    }

    /// Records `decision` for `var`. A replaced decision keeps its position.
    pub(crate) fn insert(&mut self, var: Var, decision: Decision) {
        if self.decisions[var].replace(decision).is_none() {
            self.order.push(var);
        }
    }

    pub(crate) fn get(&self, var: Var) -> Option<&Decision> {
        self.decisions.get(var).and_then(Option::as_ref)
    }

    pub(crate) fn level(&self, var: Var) -> Option<DecLvl> {
        self.get(var).map(|decision| decision.level)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (Var, &Decision)> {
        self.order.iter().filter_map(|&var| Some((var, self.get(var)?)))
    }

    /// Manual decisions in decision-map order.
    pub(crate) fn iter_manual(&self) -> impl Iterator<Item = (Var, &Decision)> {
        self.iter().filter(|(_, decision)| !decision.implied)
    }

    pub(crate) fn highest_level(&self) -> Option<DecLvl> {
        self.iter().map(|(_, decision)| decision.level).max()
    }

    pub(crate) fn clear(&mut self) {
        self.order.clear();
        self.decisions.clear();
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn replaced_decision_keeps_position() {
        let (a, b) = (Var::from_index(0), Var::from_index(1));
        let mut trail = Trail::default();
        trail.set_var_count(2);
        trail.insert(a, Decision::manual(true, DecLvl::FIRST));
        trail.insert(b, Decision::manual(false, DecLvl::FIRST.successor()));
        trail.insert(a, Decision::manual(false, DecLvl::new(3)));
        assert_eq!(trail.iter().count(), 2);
        let order: Vec<_> = trail.iter().map(|(var, d)| d.lit(var)).collect();
        assert_eq!(order, [a.negative(), b.negative()]);
        assert_eq!(trail.highest_level(), Some(DecLvl::new(3)));
        assert_eq!(trail.level(b), Some(DecLvl::new(2)));
    }

    #[test]
    fn levels() {
        assert!(DecLvl::ROOT.is_root());
        assert_eq!(DecLvl::ROOT.predecessor(), DecLvl::ROOT);
        assert_eq!(DecLvl::FIRST.predecessor(), DecLvl::ROOT);
        assert_eq!(DecLvl::ROOT.successor(), DecLvl::FIRST);
    }
}
