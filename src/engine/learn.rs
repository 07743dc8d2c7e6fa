//! Clause learning heuristics

use super::{graph::ImplGraph, trail::Trail};
use crate::literal::Lit;
use miette::Diagnostic;
use thiserror::Error;

/// Selects how a clause is learned from a conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Heuristic {
    /// Negate the first UIP and one of the grandparents of the conflict node.
    #[default]
    #[value(name = "uip")]
    Uip,
    /// Negate every manual decision.
    #[value(name = "neg")]
    NegatedDecisions,
}

#[derive(Debug, Error, Diagnostic)]
#[error("Unknown heuristic `{name}`")]
#[diagnostic(help("expected `uip` or `neg`"))]
pub struct UnknownHeuristic {
    pub name: String,
}

impl std::str::FromStr for Heuristic {
    type Err = UnknownHeuristic;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uip" => Ok(Heuristic::Uip),
            "neg" => Ok(Heuristic::NegatedDecisions),
            _ => Err(UnknownHeuristic { name: s.to_owned() }),
        }
    }
}

impl std::fmt::Display for Heuristic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Heuristic::Uip => write!(f, "uip"),
            Heuristic::NegatedDecisions => write!(f, "neg"),
        }
    }
}

impl Heuristic {
    /// Derives the clause for the conflict described by `full_graph` and `uips`.
    pub(crate) fn learn(self, trail: &Trail, full_graph: &ImplGraph, uips: &[Lit]) -> Vec<Lit> {
        match self {
            Heuristic::Uip => {
                let first_uip = uips.last().copied();
                let grandparent = full_graph.grandparents(uips).first().copied();
                grandparent.into_iter().chain(first_uip).map(|lit| !lit).collect()
            }
            Heuristic::NegatedDecisions => {
                trail.iter_manual().map(|(var, decision)| !decision.lit(var)).collect()
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        clause::ClauseId,
        engine::{
            graph::Node,
            trail::{DecLvl, Decision},
        },
        literal::Var,
    };

    #[test]
    fn parse() {
        assert_eq!("uip".parse::<Heuristic>().unwrap(), Heuristic::Uip);
        assert_eq!("neg".parse::<Heuristic>().unwrap(), Heuristic::NegatedDecisions);
        assert_eq!("NEG".parse::<Heuristic>().unwrap_err().name, "NEG");
        assert_eq!(Heuristic::default().to_string(), "uip");
    }

    #[test]
    fn learn() {
        let (a, b, c) = (Var::from_index(0), Var::from_index(1), Var::from_index(2));
        let mut trail = Trail::default();
        trail.set_var_count(3);
        trail.insert(a, Decision::manual(true, DecLvl::FIRST));
        let antecedent = ClauseId::from_position(0);
        let parents = vec![a.positive()];
        let implied = Decision::implied(c.negative(), DecLvl::FIRST, antecedent, parents);
        trail.insert(c, implied);
        trail.insert(b, Decision::manual(false, DecLvl::new(2)));

        let mut full_graph = ImplGraph::default();
        full_graph.insert(Node::Lit(a.positive()), []);
        full_graph.insert(Node::Lit(c.negative()), [Node::Lit(a.positive())]);
        full_graph.insert(Node::Lit(b.negative()), []);
        full_graph.insert(Node::Conflict, [Node::Lit(c.negative())]);

        let learned = Heuristic::NegatedDecisions.learn(&trail, &full_graph, &[]);
        assert_eq!(learned, [a.negative(), b.positive()]);

        let learned = Heuristic::Uip.learn(&trail, &full_graph, &[c.negative()]);
        assert_eq!(learned, [a.negative(), c.positive()]);

        // the grandparent is dropped if it is a UIP candidate itself
        let learned = Heuristic::Uip.learn(&trail, &full_graph, &[a.positive()]);
        assert_eq!(learned, [a.negative()]);

        assert!(Heuristic::Uip.learn(&trail, &ImplGraph::default(), &[]).is_empty());
    }
}
