//! Low-level graph storage for family graphs.
//!
//! This module provides the index-based directed graph that backs
//! [`FamilyGraph`](super::FamilyGraph). Vertices are person records keyed by
//! [`PersonId`] and kept in insertion order; edges are parent-to-child links.
//!
//! # Architecture
//!
//! - [`VertexIndex`]: Dense index of a vertex, in insertion order
//! - [`EdgeIndex`]: Dense index of an edge, in insertion order
//! - [`Edge`]: Directed `(parent, child)` pair of vertex indices
//! - [`GraphInternal`]: Vertex map, edge list, and incoming/outgoing adjacency
//!
//! Dense indices let the layout stages keep per-vertex state in plain vectors
//! instead of hash maps.

use std::fmt;

use indexmap::IndexMap;

use lineage_core::{identifier::PersonId, person::Person};

/// Index of a vertex in a family graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VertexIndex(usize);

impl VertexIndex {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the numeric index.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for VertexIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Index of an edge in a family graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeIndex(usize);

impl EdgeIndex {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the numeric index.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A directed parent-to-child edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    parent: VertexIndex,
    child: VertexIndex,
}

impl Edge {
    fn new(parent: VertexIndex, child: VertexIndex) -> Self {
        Self { parent, child }
    }

    pub fn parent(self) -> VertexIndex {
        self.parent
    }

    pub fn child(self) -> VertexIndex {
        self.child
    }

    /// Returns true if the edge links a vertex to itself.
    pub fn is_self_loop(self) -> bool {
        self.parent == self.child
    }
}

/// Core graph data structure.
///
/// The graph is directed and allows self-loops. It does not deduplicate
/// edges; callers decide what counts as a duplicate.
#[derive(Debug)]
pub(super) struct GraphInternal<'a> {
    vertices: IndexMap<PersonId, &'a Person>,
    edges: Vec<Edge>,
    incoming: Vec<Vec<EdgeIndex>>,
    outgoing: Vec<Vec<EdgeIndex>>,
}

impl<'a> GraphInternal<'a> {
    /// Creates a new empty graph.
    pub(super) fn new() -> Self {
        GraphInternal {
            vertices: IndexMap::new(),
            edges: Vec::new(),
            incoming: Vec::new(),
            outgoing: Vec::new(),
        }
    }

    /// Adds a vertex for `person`.
    ///
    /// # Returns
    ///
    /// The new vertex index, or `Err` with the existing index if the
    /// identifier is already present. The existing vertex is left unchanged.
    pub(super) fn add_vertex(&mut self, person: &'a Person) -> Result<VertexIndex, VertexIndex> {
        if let Some(existing) = self.vertices.get_index_of(person.id()) {
            return Err(VertexIndex::new(existing));
        }
        let (index, _) = self.vertices.insert_full(person.id().clone(), person);
        self.incoming.push(Vec::new());
        self.outgoing.push(Vec::new());
        Ok(VertexIndex::new(index))
    }

    /// Looks up a vertex by identifier.
    pub(super) fn vertex_index(&self, id: &str) -> Option<VertexIndex> {
        self.vertices.get_index_of(id).map(VertexIndex::new)
    }

    /// Returns the person stored at `vertex`.
    ///
    /// # Panics
    /// Panics if the index does not belong to this graph.
    pub(super) fn person(&self, vertex: VertexIndex) -> &'a Person {
        self.vertices[vertex.0]
    }

    /// Returns the identifier of `vertex`.
    ///
    /// # Panics
    /// Panics if the index does not belong to this graph.
    pub(super) fn id(&self, vertex: VertexIndex) -> &PersonId {
        self.person(vertex).id()
    }

    pub(super) fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns an iterator over all vertices in insertion order.
    pub(super) fn vertices(&self) -> impl Iterator<Item = VertexIndex> + '_ {
        (0..self.vertices.len()).map(VertexIndex::new)
    }

    pub(super) fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns the edge at `idx`.
    ///
    /// # Panics
    /// Panics if the index does not belong to this graph.
    pub(super) fn edge(&self, idx: EdgeIndex) -> Edge {
        self.edges[idx.0]
    }

    /// Returns an iterator over all edges in insertion order.
    pub(super) fn edges(&self) -> impl Iterator<Item = (EdgeIndex, Edge)> + '_ {
        self.edges
            .iter()
            .enumerate()
            .map(|(idx, edge)| (EdgeIndex::new(idx), *edge))
    }

    /// Returns the edges pointing at `vertex` (from its parents).
    pub(super) fn incoming_edges(&self, vertex: VertexIndex) -> &[EdgeIndex] {
        &self.incoming[vertex.0]
    }

    /// Returns the edges leaving `vertex` (to its children).
    pub(super) fn outgoing_edges(&self, vertex: VertexIndex) -> &[EdgeIndex] {
        &self.outgoing[vertex.0]
    }

    /// Adds a directed edge between two existing vertices.
    ///
    /// # Panics
    /// Panics in debug mode if either vertex does not exist in the graph.
    pub(super) fn add_edge(&mut self, parent: VertexIndex, child: VertexIndex) -> EdgeIndex {
        debug_assert!(parent.0 < self.vertices.len(), "unknown parent {parent}");
        debug_assert!(child.0 < self.vertices.len(), "unknown child {child}");

        self.edges.push(Edge::new(parent, child));
        let idx = EdgeIndex::new(self.edges.len() - 1);
        self.outgoing[parent.0].push(idx);
        self.incoming[child.0].push(idx);
        idx
    }
}
