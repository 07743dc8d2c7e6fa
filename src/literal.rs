use std::fmt::Display;

pub(crate) mod db;

pub use db::VariableDatabase;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Var {
    index: u32,
}

impl Var {
    pub(crate) const MAX_VAR: Var = Var { index: (u32::MAX >> 1) - 1 };

    pub(crate) fn from_index(index: u32) -> Self {
        assert!(index <= Self::MAX_VAR.index);
        Self { index }
    }

    pub(crate) fn to_dimacs(self) -> i32 {
        (self.index + 1).try_into().expect("index + 1 should always be smaller than i32::MAX")
    }

    pub(crate) fn as_index(self) -> usize {
        self.index as usize
    }

    #[must_use]
    pub fn positive(self) -> Lit {
        Lit::positive(self)
    }

    #[must_use]
    pub fn negative(self) -> Lit {
        Lit::negative(self)
    }

    #[must_use]
    pub fn lit(self, polarity: bool) -> Lit {
        Lit::from_var(self, polarity)
    }
}

impl Display for Var {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_dimacs())
    }
}

/// A variable together with its polarity.
///
/// The polarity is packed into the lowest bit, so negation and comparison are
/// single integer operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Lit {
    /// internal representation of a literal
    repr: u32,
}

const _: () = assert!(std::mem::size_of::<Lit>() == 4);

impl Lit {
    pub(crate) const fn from_var(variable: Var, polarity: bool) -> Self {
        assert!(variable.index <= Var::MAX_VAR.index);
        Self { repr: (variable.index << 1) | (!polarity as u32) }
    }

    pub(crate) const fn positive(variable: Var) -> Self {
        Self::from_var(variable, true)
    }

    pub(crate) const fn negative(variable: Var) -> Self {
        Self::from_var(variable, false)
    }

    #[must_use]
    pub fn var(self) -> Var {
        Var { index: self.repr >> 1 }
    }

    #[must_use]
    pub fn is_negative(self) -> bool {
        (self.repr & 1) == 1
    }

    #[must_use]
    pub fn is_positive(self) -> bool {
        !self.is_negative()
    }

    #[must_use]
    pub fn negated(self) -> Self {
        Self { repr: self.repr ^ 1 }
    }

    pub(crate) fn to_dimacs(self) -> i32 {
        if self.is_negative() {
            -self.var().to_dimacs()
        } else {
            self.var().to_dimacs()
        }
    }
}

impl Display for Lit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_dimacs())
    }
}

impl std::ops::Not for Lit {
    type Output = Self;

    fn not(self) -> Self::Output {
        Self { repr: self.repr ^ 1 }
    }
}

/// Helper function to remove `var` from a [`Lit`] iterator
pub(crate) fn filter_var(var: Var) -> impl Fn(&&Lit) -> bool {
    move |l| l.var() != var
}

/// Helper struct which implements [`Display`] for a [`Lit`] using the
/// variable names of the loaded formula, e.g., `-A`.
#[derive(Debug, Clone, Copy)]
pub struct NamedLit<'a> {
    pub(crate) names: &'a VariableDatabase,
    pub(crate) lit: Lit,
}

impl<'a> Display for NamedLit<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if self.lit.is_negative() {
            write!(f, "-")?;
        }
        write!(f, "{}", self.names.name(self.lit.var()))
    }
}

/// Helper struct which implements [`Display`] for [`Lit`] slices in the
/// formula input notation, e.g., `(A,-B)`.
#[derive(Debug, Clone, Copy)]
pub struct LitSlice<'a> {
    pub(crate) names: &'a VariableDatabase,
    pub(crate) lits: &'a [Lit],
}

impl<'a> Display for LitSlice<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "(")?;
        for (idx, &lit) in self.lits.iter().enumerate() {
            if idx > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", self.names.lit(lit))?;
        }
        write!(f, ")")
    }
}
