use crate::literal::Var;
use std::ops::{Index, IndexMut};

/// Wrapper around a `Vec` that is indexed by [`Var`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct VarVec<T>(Vec<T>);

impl<T: Default> VarVec<T> {
    pub(crate) fn set_var_count(&mut self, count: usize) {
        self.0.resize_with(count, Default::default);
    }
}

impl<T> Default for VarVec<T> {
    fn default() -> Self {
        Self(Vec::default())
    }
}

impl<T> VarVec<T> {
    pub(crate) fn get(&self, index: Var) -> Option<&T> {
        self.0.get(index.as_index())
    }

    pub(crate) fn clear(&mut self) {
        self.0.clear();
    }
}

impl<T> Index<Var> for VarVec<T> {
    type Output = T;

    fn index(&self, index: Var) -> &Self::Output {
        &self.0[index.as_index()]
    }
}

impl<T> IndexMut<Var> for VarVec<T> {
    fn index_mut(&mut self, index: Var) -> &mut Self::Output {
        &mut self.0[index.as_index()]
    }
}
