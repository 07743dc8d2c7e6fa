use crate::{
    datastructure::VarVec,
    literal::{Lit, Var},
};

/// Current value of every variable, `None` if unassigned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Assignment {
    assignment: VarVec<Option<bool>>,
}

impl Assignment {
    pub(crate) fn set_var_count(&mut self, count: usize) {
        self.assignment.set_var_count(count);
    }

    /// Makes `lit` true.
    pub(crate) fn assign(&mut self, lit: Lit) {
        self.assignment[lit.var()] = Some(lit.is_positive());
    }

    pub(crate) fn is_assigned(&self, var: Var) -> bool {
        self.assignment[var].is_some()
    }

    pub(crate) fn is_true(&self, lit: Lit) -> bool {
        self.assignment[lit.var()] == Some(lit.is_positive())
    }

    pub(crate) fn is_false(&self, lit: Lit) -> bool {
        self.assignment[lit.var()] == Some(lit.is_negative())
    }

    pub(crate) fn clear(&mut self) {
        self.assignment.clear();
    }
}

impl std::ops::Index<Var> for Assignment {
    type Output = Option<bool>;

    fn index(&self, index: Var) -> &Self::Output {
        &self.assignment[index]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn assignment() {
        let mut assignment = Assignment::default();
        assignment.set_var_count(10);
        let var1 = Var::from_index(1);
        assert_eq!(assignment[var1], None);
        assert!(!assignment.is_true(var1.positive()));
        assert!(!assignment.is_false(var1.positive()));
        assignment.assign(var1.negative());
        assert_eq!(assignment[var1], Some(false));
        assert!(assignment.is_true(var1.negative()));
        assert!(assignment.is_false(var1.positive()));
        assert!(assignment.is_assigned(var1));
    }
}
