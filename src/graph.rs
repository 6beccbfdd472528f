//! In-memory weighted graphs over string node ids.
//!
//! Both kinds keep nodes and edges in ordered maps, so iteration (and anything
//! written from it) is deterministic regardless of construction order.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// Undirected graph with positive integer weights, no self-loops and at most one
/// edge per unordered pair.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UndirectedGraph {
    nodes: BTreeSet<String>,
    // key is (smaller, larger)
    edges: BTreeMap<(String, String), u64>,
}

fn unordered(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

impl UndirectedGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: impl Into<String>) {
        self.nodes.insert(node.into());
    }

    /// Insert or overwrite the edge `{a, b}`. Self-loops and zero weights are ignored
    /// and reported as `false`. Missing endpoints are added.
    pub fn add_edge(&mut self, a: &str, b: &str, weight: u64) -> bool {
        if a == b || weight == 0 {
            return false;
        }
        self.nodes.insert(a.to_string());
        self.nodes.insert(b.to_string());
        self.edges.insert(unordered(a, b), weight);
        true
    }

    pub fn weight(&self, a: &str, b: &str) -> Option<u64> {
        self.edges.get(&unordered(a, b)).copied()
    }

    pub fn contains_node(&self, node: &str) -> bool {
        self.nodes.contains(node)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(String::as_str)
    }

    /// Edges as `(smaller, larger, weight)`, ordered.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, u64)> {
        self.edges.iter().map(|((a, b), w)| (a.as_str(), b.as_str(), *w))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn degree(&self, node: &str) -> usize {
        self.edges().filter(|(a, b, _)| *a == node || *b == node).count()
    }

    pub fn weighted_degree(&self, node: &str) -> u64 {
        self.edges().filter(|(a, b, _)| *a == node || *b == node).map(|(_, _, w)| w).sum()
    }

    fn adjacency(&self) -> BTreeMap<&str, Vec<&str>> {
        let mut adj: BTreeMap<&str, Vec<&str>> = self.nodes().map(|n| (n, Vec::new())).collect();
        for (a, b, _) in self.edges() {
            adj.entry(a).or_default().push(b);
            adj.entry(b).or_default().push(a);
        }
        adj
    }

    /// Same nodes, only edges with `weight >= min_weight`.
    pub fn without_light_edges(&self, min_weight: u64) -> Self {
        Self {
            nodes: self.nodes.clone(),
            edges: self.edges.iter().filter(|(_, w)| **w >= min_weight).map(|(k, w)| (k.clone(), *w)).collect(),
        }
    }

    /// Induced subgraph on the listed nodes; names absent from the graph are ignored.
    pub fn subgraph<I, S>(&self, keep: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let nodes: BTreeSet<String> = keep
            .into_iter()
            .filter(|n| self.nodes.contains(n.as_ref()))
            .map(|n| n.as_ref().to_string())
            .collect();
        let edges = self
            .edges
            .iter()
            .filter(|((a, b), _)| nodes.contains(a) && nodes.contains(b))
            .map(|(k, w)| (k.clone(), *w))
            .collect();
        Self { nodes, edges }
    }

    /// Connected components, each sorted, listed in order of their smallest node.
    pub fn connected_components(&self) -> Vec<Vec<String>> {
        let adj = self.adjacency();
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        let mut out = Vec::new();
        for &start in adj.keys() {
            if !seen.insert(start) {
                continue;
            }
            let mut comp = vec![start.to_string()];
            let mut queue = VecDeque::from([start]);
            while let Some(u) = queue.pop_front() {
                for &v in adj.get(u).into_iter().flatten() {
                    if seen.insert(v) {
                        comp.push(v.to_string());
                        queue.push_back(v);
                    }
                }
            }
            comp.sort();
            out.push(comp);
        }
        out
    }

    /// Induced subgraph on the largest connected component. Among equally large
    /// components the one holding the smallest node id wins.
    pub fn dominant_component(&self) -> Self {
        let mut best: Option<Vec<String>> = None;
        for comp in self.connected_components() {
            if best.as_ref().map_or(true, |b| comp.len() > b.len()) {
                best = Some(comp);
            }
        }
        self.subgraph(best.unwrap_or_default())
    }
}

/// Directed graph with positive integer weights and at most one edge per ordered
/// pair. Self-loops are allowed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DirectedGraph {
    nodes: BTreeSet<String>,
    edges: BTreeMap<(String, String), u64>,
}

impl DirectedGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: impl Into<String>) {
        self.nodes.insert(node.into());
    }

    /// Insert or overwrite `source -> target`. Zero weights are ignored.
    pub fn add_edge(&mut self, source: &str, target: &str, weight: u64) -> bool {
        if weight == 0 {
            return false;
        }
        self.nodes.insert(source.to_string());
        self.nodes.insert(target.to_string());
        self.edges.insert((source.to_string(), target.to_string()), weight);
        true
    }

    pub fn weight(&self, source: &str, target: &str) -> Option<u64> {
        self.edges.get(&(source.to_string(), target.to_string())).copied()
    }

    pub fn contains_node(&self, node: &str) -> bool {
        self.nodes.contains(node)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(String::as_str)
    }

    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, u64)> {
        self.edges.iter().map(|((a, b), w)| (a.as_str(), b.as_str(), *w))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn out_degree(&self, node: &str) -> usize {
        self.edges().filter(|(s, _, _)| *s == node).count()
    }

    pub fn in_degree(&self, node: &str) -> usize {
        self.edges().filter(|(_, t, _)| *t == node).count()
    }
}
