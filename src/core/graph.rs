//! core::graph
//!
//! Dependency graph view over the lock table.
//!
//! # Architecture
//!
//! The lock graph is a directed graph where:
//! - Nodes are locked slugs
//! - Edges point from a mod to each of its direct dependencies
//! - Roots are the manually added mods
//!
//! # Invariants
//!
//! Registry dependency relations are expected to be acyclic, but nothing
//! guarantees it, so every traversal here carries a visited set and
//! terminates on cyclic input.

use std::collections::{BTreeMap, HashSet, VecDeque};

use super::repository::LockEntry;
use super::types::Slug;

/// Adjacency view of a lock table.
#[derive(Debug, Default)]
pub struct LockGraph {
    /// Direct dependencies of each locked slug.
    edges: BTreeMap<Slug, Vec<Slug>>,
}

impl LockGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph from a lock table.
    pub fn from_locks(locks: &BTreeMap<Slug, LockEntry>) -> Self {
        let mut graph = Self::new();
        for (slug, entry) in locks {
            graph.add_node(slug.clone());
            for dep in &entry.dependencies {
                graph.add_edge(slug.clone(), dep.clone());
            }
        }
        graph
    }

    /// Add a node with no edges (no-op if present).
    pub fn add_node(&mut self, slug: Slug) {
        self.edges.entry(slug).or_default();
    }

    /// Add a dependency edge `from -> to`.
    ///
    /// `to` is not added as a node: a dependency without its own lock entry
    /// stays visible as a dangling edge.
    pub fn add_edge(&mut self, from: Slug, to: Slug) {
        self.edges.entry(from).or_default().push(to);
    }

    /// Whether the slug has a node (a lock entry) in the graph.
    pub fn contains(&self, slug: &Slug) -> bool {
        self.edges.contains_key(slug)
    }

    /// Direct dependencies of a slug, in lock order.
    pub fn dependencies_of(&self, slug: &Slug) -> &[Slug] {
        self.edges.get(slug).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every slug reachable from `start` (including `start`).
    ///
    /// Breadth-first; each slug is visited once, so cycles terminate.
    ///
    /// # Example
    ///
    /// ```
    /// use tmod::core::graph::LockGraph;
    /// use tmod::core::types::Slug;
    ///
    /// let a = Slug::new("a").unwrap();
    /// let b = Slug::new("b").unwrap();
    ///
    /// let mut graph = LockGraph::new();
    /// graph.add_edge(a.clone(), b.clone());
    /// graph.add_edge(b.clone(), a.clone());
    ///
    /// let reachable = graph.reachable_from(&a);
    /// assert_eq!(reachable.len(), 2);
    /// ```
    pub fn reachable_from(&self, start: &Slug) -> HashSet<Slug> {
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([start.clone()]);

        while let Some(current) = queue.pop_front() {
            if seen.insert(current.clone()) {
                queue.extend(self.dependencies_of(&current).iter().cloned());
            }
        }

        seen
    }

    /// Dependencies named by some edge that have no node of their own.
    pub fn dangling(&self) -> Vec<(Slug, Slug)> {
        self.edges
            .iter()
            .flat_map(|(from, deps)| {
                deps.iter()
                    .filter(|dep| !self.contains(dep))
                    .map(move |dep| (from.clone(), dep.clone()))
            })
            .collect()
    }
}
