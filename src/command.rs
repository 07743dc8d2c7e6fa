//! Line-based command language of the `stepsat` script driver.
//!
//! Every non-empty line holds one command, `#` starts a comment:
//!
//! ```text
//! formula (A,B)(-A,C)(-B,-C)
//! decide A
//! decide B
//! show
//! learn
//! ```

use crate::{
    engine::{Engine, EngineError, Heuristic},
    formula::split_literal,
    Status,
};
use miette::{Diagnostic, SourceSpan};
use std::fmt::Display;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error, Diagnostic)]
#[error("Cannot parse script")]
#[diagnostic()]
pub struct ScriptError {
    #[source_code]
    pub source_code: String,

    #[related]
    pub related: Vec<CommandError>,
}

#[derive(Debug, Error, Diagnostic)]
pub enum CommandError {
    #[error("Unknown command `{name}`")]
    #[diagnostic(help(
        "expected one of `formula`, `decide`, `undo`, `redo`, `reset`, `learn`, `heuristic`, \
         `show`, `check`"
    ))]
    UnknownCommand {
        name: String,

        #[label]
        err_span: SourceSpan,
    },

    #[error("Command `{command}` expects an argument")]
    MissingArgument {
        command: &'static str,

        #[label]
        err_span: SourceSpan,
    },

    #[error("Command `{command}` takes no argument")]
    UnexpectedArgument {
        command: &'static str,

        #[label]
        err_span: SourceSpan,
    },

    #[error("Unknown heuristic `{name}`")]
    #[diagnostic(help("expected `uip` or `neg`"))]
    UnknownHeuristic {
        name: String,

        #[label]
        err_span: SourceSpan,
    },

    #[error("Malformed literal `{token}`")]
    #[diagnostic(help("a literal is a variable name, optionally prefixed by `-`"))]
    MalformedLiteral {
        token: String,

        #[label]
        err_span: SourceSpan,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Formula(String),
    Decide { name: String, polarity: bool },
    Undo,
    Redo,
    Reset,
    Learn,
    Heuristic(Heuristic),
    Show,
    Check,
}

/// Parses a whole script. All malformed lines are reported together.
///
/// # Errors
///
/// Returns a [`ScriptError`] that carries the script and every [`CommandError`].
pub fn parse_script(script: &str) -> Result<Vec<Command>, ScriptError> {
    let mut commands = Vec::new();
    let mut errors = Vec::new();
    let mut offset = 0;
    for line in script.split_inclusive('\n') {
        match parse_line(line, offset) {
            Ok(Some(command)) => commands.push(command),
            Ok(None) => {}
            Err(err) => errors.push(err),
        }
        offset += line.len();
    }
    if errors.is_empty() {
        Ok(commands)
    } else {
        Err(ScriptError { source_code: script.to_owned(), related: errors })
    }
}

/// Parses a single line starting at `offset` in the script.
fn parse_line(line: &str, offset: usize) -> Result<Option<Command>, CommandError> {
    let line = line.split('#').next().unwrap_or_default();
    let start = offset + (line.len() - line.trim_start().len());
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (keyword, argument) = match line.split_once(char::is_whitespace) {
        Some((keyword, argument)) => (keyword, argument.trim()),
        None => (line, ""),
    };
    let keyword_span: SourceSpan = (start..start + keyword.len()).into();
    let argument_start = start + (line.len() - argument.len());
    let argument_span: SourceSpan = (argument_start..argument_start + argument.len()).into();

    let command = match keyword {
        "formula" => {
            if argument.is_empty() {
                return Err(CommandError::MissingArgument {
                    command: "formula",
                    err_span: keyword_span,
                });
            }
            Command::Formula(argument.to_owned())
        }
        "decide" => {
            if argument.is_empty() {
                return Err(CommandError::MissingArgument {
                    command: "decide",
                    err_span: keyword_span,
                });
            }
            let (name, polarity) = split_literal(argument);
            if name.is_empty()
                || name.contains(|c: char| c.is_whitespace() || matches!(c, ',' | '(' | ')'))
            {
                return Err(CommandError::MalformedLiteral {
                    token: argument.to_owned(),
                    err_span: argument_span,
                });
            }
            Command::Decide { name: name.to_owned(), polarity }
        }
        "heuristic" => {
            if argument.is_empty() {
                return Err(CommandError::MissingArgument {
                    command: "heuristic",
                    err_span: keyword_span,
                });
            }
            let heuristic = argument.parse().map_err(|_| CommandError::UnknownHeuristic {
                name: argument.to_owned(),
                err_span: argument_span,
            })?;
            Command::Heuristic(heuristic)
        }
        "undo" | "redo" | "reset" | "learn" | "show" | "check" => {
            let (command, parsed) = match keyword {
                "undo" => ("undo", Command::Undo),
                "redo" => ("redo", Command::Redo),
                "reset" => ("reset", Command::Reset),
                "learn" => ("learn", Command::Learn),
                "show" => ("show", Command::Show),
                _ => ("check", Command::Check),
            };
            if !argument.is_empty() {
                return Err(CommandError::UnexpectedArgument { command, err_span: argument_span });
            }
            parsed
        }
        _ => {
            return Err(CommandError::UnknownCommand {
                name: keyword.to_owned(),
                err_span: keyword_span,
            })
        }
    };
    Ok(Some(command))
}

/// Owns the engine while a script is executed.
#[derive(Debug, Default)]
pub struct Session {
    engine: Engine,
}

impl Session {
    #[must_use]
    pub fn new(engine: Engine) -> Self {
        Self { engine }
    }

    #[must_use]
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Runs `command` and returns the text to print.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] for decisions on unknown variables and oracle failures.
    pub fn execute(&mut self, command: &Command) -> Result<String, EngineError> {
        let engine = &mut self.engine;
        let prefix = match command {
            Command::Formula(text) => {
                engine.submit_formula(text);
                format!("loaded {}\n", engine.formula())
            }
            Command::Decide { name, polarity } => {
                engine.decide(name, *polarity)?;
                String::new()
            }
            Command::Undo => {
                if engine.undo() {
                    String::new()
                } else {
                    "nothing to undo\n".to_owned()
                }
            }
            Command::Redo => {
                if engine.redo() {
                    String::new()
                } else {
                    "nothing to redo\n".to_owned()
                }
            }
            Command::Reset => {
                engine.reset();
                String::new()
            }
            Command::Learn => match engine.commit_learned_clause() {
                Some(id) => {
                    let clause = &engine.clauses()[id];
                    format!("learned clause {id}: {}\n", engine.variables().slice(clause.lits()))
                }
                None => "no learned clause pending\n".to_owned(),
            },
            Command::Heuristic(heuristic) => {
                engine.set_heuristic(*heuristic);
                String::new()
            }
            Command::Show => return Ok(Report(engine).to_string()),
            Command::Check => return check(engine),
        };
        Ok(format!("{prefix}{}", Summary(engine)))
    }

    #[must_use]
    pub fn status(&self) -> Status {
        self.engine.status()
    }

    /// Logs the statistics of the session.
    pub fn finish(&self) {
        let stats = self.engine.stats();
        info!(
            "{} decisions, {} undos, {} redos, {} implications, {} conflicts, {} learned clauses",
            stats.decisions,
            stats.undos,
            stats.redos,
            stats.implications,
            stats.conflicts,
            stats.learned_clauses
        );
    }
}

fn check(engine: &Engine) -> Result<String, EngineError> {
    let mut output = match engine.check_satisfiable()? {
        Some(model) => format!("oracle: satisfiable {}", engine.variables().slice(&model)),
        None => "oracle: unsatisfiable".to_owned(),
    };
    match engine.check_learned_clause()? {
        Some(true) => output.push_str(", learned clause is implied"),
        Some(false) => output.push_str(", learned clause is not implied"),
        None => {}
    }
    Ok(output)
}

/// Helper struct which implements [`Display`] for the one-line status of an engine.
struct Summary<'a>(&'a Engine);

impl<'a> Display for Summary<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let engine = self.0;
        write!(f, "level {}: {}", engine.current_level(), engine.status())?;
        if let Some(conflict) = engine.conflict() {
            write!(f, " in clause {}", conflict.clause())?;
            if let Some(learned) = engine.learned_clause() {
                write!(f, ", learned {}", engine.variables().slice(learned))?;
            }
        }
        if let Some(assignment) = engine.satisfying_assignment() {
            write!(f, ", satisfied by {assignment}")?;
        }
        Ok(())
    }
}

/// Helper struct which implements [`Display`] for the full state of an engine.
struct Report<'a>(&'a Engine);

impl<'a> Display for Report<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let engine = self.0;
        let names = engine.variables();
        writeln!(f, "heuristic: {}", engine.heuristic())?;
        writeln!(f, "clauses:")?;
        for clause in engine.clauses() {
            write!(f, "  {} {}", clause.id(), names.slice(clause.lits()))?;
            if clause.is_learned() {
                write!(f, " learned")?;
            }
            if engine.is_clause_satisfied(clause) {
                write!(f, " satisfied")?;
            }
            writeln!(f)?;
        }
        writeln!(f, "decisions:")?;
        for (var, decision) in engine.decisions() {
            write!(f, "  {} @{}", names.lit(decision.lit(var)), decision.level)?;
            if let Some(antecedent) = decision.antecedent {
                write!(f, " <- clause {antecedent} {}", names.slice(&decision.parents))?;
            }
            writeln!(f)?;
        }
        if let Some(sentinel) = engine.sentinel() {
            write!(f, "κ @{} <- ", sentinel.level)?;
            if let Some(antecedent) = sentinel.antecedent {
                write!(f, "clause {antecedent} ")?;
            }
            writeln!(f, "{}", names.slice(&sentinel.parents))?;
        }
        if let Some(conflict) = engine.conflict() {
            writeln!(f, "level graph:")?;
            for line in conflict.level_graph().display(names).to_string().lines() {
                writeln!(f, "  {line}")?;
            }
            writeln!(f, "uip candidates: {}", names.slice(conflict.uip_candidates()))?;
            writeln!(f, "learned: {}", names.slice(conflict.learned()))?;
        }
        write!(f, "{}", Summary(engine))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const SCRIPT: &str = "\
# the example from the tutorial
formula (A,B)(-A,C)(-B,-C)
decide A
decide B   # overrides -B

heuristic neg
learn
";

    #[test]
    fn parse() {
        let commands = parse_script(SCRIPT).unwrap();
        assert_eq!(
            commands,
            [
                Command::Formula("(A,B)(-A,C)(-B,-C)".to_owned()),
                Command::Decide { name: "A".to_owned(), polarity: true },
                Command::Decide { name: "B".to_owned(), polarity: true },
                Command::Heuristic(Heuristic::NegatedDecisions),
                Command::Learn,
            ]
        );
        assert_eq!(
            parse_script("decide -x1\nundo\nredo\nreset\nshow\ncheck").unwrap()[0],
            Command::Decide { name: "x1".to_owned(), polarity: false }
        );
    }

    #[test]
    fn errors_are_collected() {
        let script = "decide\nfoo bar\n  heuristic vsids\nundo now\ndecide (A)\ndecide -";
        let err = parse_script(script).unwrap_err();
        assert_eq!(err.related.len(), 6);
        assert!(matches!(err.related[0], CommandError::MissingArgument { command: "decide", .. }));
        match &err.related[1] {
            CommandError::UnknownCommand { name, err_span } => {
                assert_eq!(name, "foo");
                assert_eq!(err_span.offset(), 7);
                assert_eq!(err_span.len(), 3);
            }
            other => panic!("unexpected error {other:?}"),
        }
        match &err.related[2] {
            CommandError::UnknownHeuristic { name, err_span } => {
                assert_eq!(name, "vsids");
                assert_eq!(&script[err_span.offset()..err_span.offset() + err_span.len()], "vsids");
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(matches!(err.related[3], CommandError::UnexpectedArgument { command: "undo", .. }));
        assert!(matches!(err.related[4], CommandError::MalformedLiteral { .. }));
        assert!(matches!(err.related[5], CommandError::MalformedLiteral { .. }));
    }

    #[test]
    fn execute_script() {
        let mut session = Session::new(Engine::new(Heuristic::Uip));
        let mut outputs = Vec::new();
        for command in parse_script(SCRIPT).unwrap() {
            outputs.push(session.execute(&command).unwrap());
        }
        assert_eq!(outputs[0], "loaded (A,B)(-A,C)(-B,-C)\nlevel 1: unresolved");
        assert_eq!(outputs[1], "level 2: satisfied, satisfied by (A ∧ C ∧ -B)");
        assert_eq!(outputs[2], "level 3: conflict in clause 3, learned (-B)");
        assert_eq!(outputs[3], "level 3: conflict in clause 3, learned (-A,-B)");
        assert!(outputs[4].starts_with("learned clause 4: (-A,-B)\n"));
        assert_eq!(session.engine().clauses().num_clauses(), 4);
        session.finish();
    }

    #[test]
    fn unknown_variable_is_reported() {
        let mut session = Session::default();
        session.execute(&Command::Formula("(A)".to_owned())).unwrap();
        let err = session.execute(&Command::Decide { name: "B".to_owned(), polarity: true });
        assert!(matches!(err, Err(EngineError::UnknownVariable { .. })));
        assert_eq!(session.status(), Status::Unsat);
    }

    #[test]
    fn show_and_check() {
        let mut session = Session::default();
        session.execute(&Command::Formula("(A,B)(-A,C)(-B,-C)".to_owned())).unwrap();
        session.execute(&Command::Decide { name: "A".to_owned(), polarity: true }).unwrap();
        session.execute(&Command::Decide { name: "B".to_owned(), polarity: true }).unwrap();
        let report = session.execute(&Command::Show).unwrap();
        assert!(report.contains("  3 (-B,-C)\n"));
        assert!(report.contains("  C @1 <- clause 2 (A)\n"));
        assert!(report.contains("κ @2 <- clause 3 (B)\n"));
        assert!(report.contains("  κ <- (B)\n"));
        assert!(report.contains("uip candidates: (B)\n"));

        let check = session.execute(&Command::Check).unwrap();
        assert!(check.starts_with("oracle: satisfiable"));
        assert!(check.ends_with("learned clause is not implied"));
        assert_eq!(
            session.execute(&Command::Undo).unwrap(),
            "level 2: satisfied, satisfied by (A ∧ C ∧ -B)"
        );
        assert_eq!(
            session.execute(&Command::Redo).unwrap(),
            "level 3: conflict in clause 3, learned (-B)"
        );
        assert!(session.execute(&Command::Redo).unwrap().starts_with("nothing to redo\n"));
    }
}
