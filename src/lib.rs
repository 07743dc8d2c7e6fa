#![deny(unsafe_code)]
#![deny(unused_must_use)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_panics_doc, clippy::module_name_repetitions)]
//#![warn(clippy::cargo)]

use std::{
    fmt::Display,
    process::{ExitCode, Termination},
};

mod clause;
pub mod cli;
pub mod command;
mod datastructure;
pub mod engine;
pub mod formula;
mod literal;
mod sat;

// Re-export
pub use clause::{db::ClauseDatabase, Clause, ClauseId};
pub use engine::{Engine, EngineError, Heuristic};
pub use formula::Formula;
pub use literal::{Lit, LitSlice, NamedLit, Var, VariableDatabase};

/// Observable state of the engine after the last operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Status {
    Unresolved = 0,
    Satisfied = 10,
    Unsat = 20,
    Conflict = 30,
}

impl Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Unresolved => write!(f, "unresolved"),
            Status::Satisfied => write!(f, "satisfied"),
            Status::Unsat => write!(f, "unsatisfiable"),
            Status::Conflict => write!(f, "conflict"),
        }
    }
}

impl Termination for Status {
    fn report(self) -> ExitCode {
        ExitCode::from(self as u8)
    }
}
