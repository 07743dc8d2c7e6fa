//! Implication graph

use crate::literal::{Lit, VariableDatabase};
use std::collections::HashMap;

/// A node of the implication graph: an assigned literal or the conflict node `κ`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Node {
    Lit(Lit),
    Conflict,
}

impl Node {
    #[must_use]
    pub fn lit(self) -> Option<Lit> {
        match self {
            Node::Lit(lit) => Some(lit),
            Node::Conflict => None,
        }
    }
}

/// Maps every node to the nodes that implied it.
/// Iteration follows the order in which nodes were inserted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImplGraph {
    nodes: Vec<(Node, Vec<Node>)>,
    index: HashMap<Node, usize>,
}

impl ImplGraph {
    /// Sets the parents of `node`. A node that is already present keeps its position.
    pub(crate) fn insert(&mut self, node: Node, parents: impl IntoIterator<Item = Node>) {
        let parents = parents.into_iter().collect();
        match self.index.get(&node) {
            Some(&idx) => self.nodes[idx].1 = parents,
            None => {
                self.index.insert(node, self.nodes.len());
                self.nodes.push((node, parents));
            }
        }
    }

    #[must_use]
    pub fn contains(&self, node: Node) -> bool {
        self.index.contains_key(&node)
    }

    /// The parents of `node`, empty if the node is not part of the graph.
    #[must_use]
    pub fn parents(&self, node: Node) -> &[Node] {
        self.index.get(&node).map_or(&[][..], |&idx| self.nodes[idx].1.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (Node, &[Node])> {
        self.nodes.iter().map(|(node, parents)| (*node, parents.as_slice()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes without parents.
    fn leaves(&self) -> impl Iterator<Item = Node> + '_ {
        self.iter().filter(|(_, parents)| parents.is_empty()).map(|(node, _)| node)
    }

    /// Edges from parents to children.
    fn children(&self) -> HashMap<Node, Vec<Node>> {
        let mut children: HashMap<Node, Vec<Node>> = HashMap::new();
        for (node, parents) in self.iter() {
            for &parent in parents {
                children.entry(parent).or_default().push(node);
            }
        }
        children
    }

    /// Every maximal path that starts in a leaf and follows parent-to-child edges.
    pub(crate) fn paths(&self) -> Vec<Vec<Node>> {
        let children = self.children();
        let mut paths = Vec::new();
        let mut path = Vec::new();
        for leaf in self.leaves() {
            collect_paths(leaf, &children, &mut path, &mut paths);
        }
        paths
    }

    /// Literals shared by every leaf-to-sink path, in the order of the first path.
    /// The last candidate is the one closest to the conflict.
    #[must_use]
    pub fn uip_candidates(&self) -> Vec<Lit> {
        let paths = self.paths();
        let Some((first, rest)) = paths.split_first() else {
            return Vec::new();
        };
        first
            .iter()
            .filter(|node| rest.iter().all(|path| path.contains(node)))
            .filter_map(|node| node.lit())
            .collect()
    }

    /// Parents of the parents of `κ` that are neither parents of `κ` themselves,
    /// nor in `blacklist`, nor implied by a literal in `blacklist`.
    #[must_use]
    pub fn grandparents(&self, blacklist: &[Lit]) -> Vec<Lit> {
        let is_blacklisted = |node: &Node| node.lit().map_or(false, |lit| blacklist.contains(&lit));
        let conflict_parents = self.parents(Node::Conflict);
        let mut grandparents = Vec::new();
        for &parent in conflict_parents {
            for &grandparent in self.parents(parent) {
                if conflict_parents.contains(&grandparent)
                    || is_blacklisted(&grandparent)
                    || self.parents(grandparent).iter().any(is_blacklisted)
                {
                    continue;
                }
                if let Some(lit) = grandparent.lit() {
                    if !grandparents.contains(&lit) {
                        grandparents.push(lit);
                    }
                }
            }
        }
        grandparents
    }

    /// Helper to display the graph with variable names, one node per line.
    #[must_use]
    pub fn display<'a>(&'a self, names: &'a VariableDatabase) -> GraphDisplay<'a> {
        GraphDisplay { graph: self, names }
    }
}

fn collect_paths(
    node: Node,
    children: &HashMap<Node, Vec<Node>>,
    path: &mut Vec<Node>,
    paths: &mut Vec<Vec<Node>>,
) {
    path.push(node);
    let mut extended = false;
    for &child in children.get(&node).map_or(&[][..], Vec::as_slice) {
        // the graph is acyclic, this only guards against malformed input
        if path.contains(&child) {
            continue;
        }
        extended = true;
        collect_paths(child, children, path, paths);
    }
    if !extended {
        paths.push(path.clone());
    }
    path.pop();
}

pub struct GraphDisplay<'a> {
    graph: &'a ImplGraph,
    names: &'a VariableDatabase,
}

impl<'a> GraphDisplay<'a> {
    fn write_node(&self, f: &mut std::fmt::Formatter<'_>, node: Node) -> std::fmt::Result {
        match node {
            Node::Lit(lit) => write!(f, "{}", self.names.lit(lit)),
            Node::Conflict => write!(f, "κ"),
        }
    }
}

impl<'a> std::fmt::Display for GraphDisplay<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (node, parents) in self.graph.iter() {
            self.write_node(f, node)?;
            write!(f, " <- (")?;
            for (idx, &parent) in parents.iter().enumerate() {
                if idx > 0 {
                    write!(f, ",")?;
                }
                self.write_node(f, parent)?;
            }
            writeln!(f, ")")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::literal::Var;

    fn lit(idx: u32) -> Lit {
        Var::from_index(idx).positive()
    }

    fn node(idx: u32) -> Node {
        Node::Lit(lit(idx))
    }

    #[test]
    fn single_path() {
        let mut graph = ImplGraph::default();
        graph.insert(node(0), []);
        graph.insert(Node::Conflict, [node(0)]);
        assert_eq!(graph.paths(), vec![vec![node(0), Node::Conflict]]);
        assert_eq!(graph.uip_candidates(), [lit(0)]);
    }

    #[test]
    fn diamond() {
        // d -> x, d -> y, (x, y) -> z, z -> κ
        let mut graph = ImplGraph::default();
        graph.insert(node(0), []);
        graph.insert(node(1), [node(0)]);
        graph.insert(node(2), [node(0)]);
        graph.insert(node(3), [node(1), node(2)]);
        graph.insert(Node::Conflict, [node(3)]);
        assert_eq!(graph.paths().len(), 2);
        assert_eq!(graph.uip_candidates(), [lit(0), lit(3)]);
    }

    #[test]
    fn disjoint_leaves_have_no_candidate() {
        let mut graph = ImplGraph::default();
        graph.insert(node(0), []);
        graph.insert(node(1), []);
        graph.insert(Node::Conflict, [node(0), node(1)]);
        assert!(graph.uip_candidates().is_empty());
    }

    #[test]
    fn conflict_without_parents() {
        let mut graph = ImplGraph::default();
        graph.insert(Node::Conflict, []);
        assert_eq!(graph.paths(), vec![vec![Node::Conflict]]);
        assert!(graph.uip_candidates().is_empty());
        assert!(ImplGraph::default().uip_candidates().is_empty());
    }

    #[test]
    fn reinsert_keeps_position() {
        let mut graph = ImplGraph::default();
        graph.insert(node(0), []);
        graph.insert(node(1), []);
        graph.insert(node(0), [node(1)]);
        let order: Vec<_> = graph.iter().map(|(node, _)| node).collect();
        assert_eq!(order, [node(0), node(1)]);
        assert_eq!(graph.parents(node(0)), &[node(1)]);
        assert!(graph.parents(node(7)).is_empty());
    }

    #[test]
    fn grandparents() {
        // 0 and 4 imply 1, 1 and 2 imply κ, 3 implies 2
        let mut graph = ImplGraph::default();
        graph.insert(node(0), []);
        graph.insert(node(4), []);
        graph.insert(node(3), []);
        graph.insert(node(1), [node(0), node(4)]);
        graph.insert(node(2), [node(3), node(1)]);
        graph.insert(Node::Conflict, [node(1), node(2)]);
        // node 1 is a parent of κ itself
        assert_eq!(graph.grandparents(&[]), [lit(0), lit(4), lit(3)]);
        assert_eq!(graph.grandparents(&[lit(4)]), [lit(0), lit(3)]);
    }

    #[test]
    fn grandparent_implied_by_blacklisted_literal() {
        let mut graph = ImplGraph::default();
        graph.insert(node(0), []);
        graph.insert(node(1), [node(0)]);
        graph.insert(node(2), [node(1)]);
        graph.insert(Node::Conflict, [node(2)]);
        assert_eq!(graph.grandparents(&[]), [lit(1)]);
        assert!(graph.grandparents(&[lit(0)]).is_empty());
    }

    #[test]
    fn display() {
        let mut names = VariableDatabase::default();
        let a = names.intern("A");
        let mut graph = ImplGraph::default();
        graph.insert(Node::Lit(a.negative()), []);
        graph.insert(Node::Conflict, [Node::Lit(a.negative())]);
        assert_eq!(graph.display(&names).to_string(), "-A <- ()\nκ <- (-A)\n");
    }
}
