use crate::engine::Heuristic;
use clap::Parser;
use miette::{Diagnostic, Result};
use std::{io::Read, path::PathBuf};
use thiserror::Error;

/// Drives the step-wise CDCL engine with a script of commands.
#[derive(Parser, Debug)]
#[command(name = "stepsat", version)]
pub struct Args {
    /// Clause learning heuristic
    #[arg(short = 'H', long, value_enum, default_value_t = Heuristic::Uip)]
    pub heuristic: Heuristic,

    /// Formula submitted before the script runs, e.g., `(A,B)(-A,C)`
    #[arg(short, long)]
    pub formula: Option<String>,

    /// Script file with one command per line, read from stdin if absent
    pub script: Option<PathBuf>,
}

#[derive(Debug, Error, Diagnostic)]
pub enum ArgError {
    #[error("Path {} does not exist", path.display())]
    FileDoesNotExist { path: PathBuf },

    #[error("{} is not a file", path.display())]
    NotAFile { path: PathBuf },

    #[error("Cannot read file {}: {}", path.display(), err)]
    CannotReadFile { path: PathBuf, err: std::io::Error },

    #[error("Cannot read from stdin: {}", err)]
    CannotReadStdIn { err: std::io::Error },
}

/// Reads the script named by `args`, or stdin if there is none.
pub fn script_from_args(args: &Args) -> Result<String> {
    let Some(file_path) = &args.script else {
        tracing::info!("No script provided, read from stdin");
        let mut buffer = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buffer)
            .map_err(|err| ArgError::CannotReadStdIn { err })?;
        return Ok(String::from_utf8_lossy(&buffer).into_owned());
    };
    if !file_path.exists() {
        return Err(ArgError::FileDoesNotExist { path: file_path.clone() }.into());
    }
    if !file_path.is_file() {
        return Err(ArgError::NotAFile { path: file_path.clone() }.into());
    }
    let contents = std::fs::read(file_path)
        .map_err(|err| ArgError::CannotReadFile { path: file_path.clone(), err })?;
    Ok(String::from_utf8_lossy(&contents).into_owned())
}
