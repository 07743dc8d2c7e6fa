//! Variable database

use super::{Lit, LitSlice, NamedLit, Var};
use std::collections::HashMap;

/// Interns variable names in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableDatabase {
    names: Vec<String>,
    lookup: HashMap<String, Var>,
}

impl VariableDatabase {
    /// Returns the variable for `name`, allocating the next index if the name is new.
    pub(crate) fn intern(&mut self, name: &str) -> Var {
        if let Some(&var) = self.lookup.get(name) {
            return var;
        }
        let var = self.next_variable();
        self.names.push(name.to_owned());
        self.lookup.insert(name.to_owned(), var);
        var
    }

    pub(crate) fn next_variable(&self) -> Var {
        Var::from_index(u32::try_from(self.names.len()).expect("too many variables"))
    }

    #[must_use]
    pub fn var_count(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<Var> {
        self.lookup.get(name).copied()
    }

    /// # Panics
    ///
    /// Panics if `var` was not allocated by this database.
    #[must_use]
    pub fn name(&self, var: Var) -> &str {
        &self.names[var.as_index()]
    }

    /// Variables in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = Var> + '_ {
        (0..self.names.len()).map(|idx| Var::from_index(u32::try_from(idx).unwrap_or(u32::MAX)))
    }

    #[must_use]
    pub fn lit(&self, lit: Lit) -> NamedLit<'_> {
        NamedLit { names: self, lit }
    }

    #[must_use]
    pub fn slice<'a>(&'a self, lits: &'a [Lit]) -> LitSlice<'a> {
        LitSlice { names: self, lits }
    }
}

impl std::ops::Index<Var> for VariableDatabase {
    type Output = str;

    fn index(&self, index: Var) -> &Self::Output {
        self.name(index)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn first_seen_order() {
        let mut db = VariableDatabase::default();
        let b = db.intern("B");
        let a = db.intern("A");
        assert_eq!(db.intern("B"), b);
        assert_eq!(db.var_count(), 2);
        assert_eq!(db.iter().map(|v| &db[v]).collect::<Vec<_>>(), ["B", "A"]);
        assert_eq!(db.lookup("A"), Some(a));
        assert_eq!(db.lookup("C"), None);
    }
}
