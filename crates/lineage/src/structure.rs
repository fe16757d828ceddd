//! Family graph construction.
//!
//! This module turns a flat snapshot of [`Person`] records into a
//! [`FamilyGraph`]: one vertex per person, one directed edge per
//! `(parent -> child)` link, and a separate list of spouse affinities.
//!
//! Spouse links never become directed edges because they say nothing about
//! generational precedence. They are kept as undirected pairs that only bias
//! the horizontal ordering of a generation.
//!
//! Building never fails on referential problems. Missing parents or spouses
//! and repeated parent entries are repaired and reported as [`Diagnostic`]s.
//! Duplicate identifiers are the one exception: they make vertex identity
//! ambiguous and abort the build with [`LineageError::DuplicateIdentifier`].

mod graph_base;

pub use graph_base::{Edge, EdgeIndex, VertexIndex};

use std::collections::{BTreeSet, HashSet};

use log::{debug, info, warn};

use lineage_core::{identifier::PersonId, person::Person};

use crate::{diagnostic::Diagnostic, error::LineageError};
use graph_base::GraphInternal;

/// Directed parent/child graph over a snapshot of person records.
///
/// The graph borrows the records it was built from; it is rebuilt from
/// scratch for every layout run.
#[derive(Debug)]
pub struct FamilyGraph<'a> {
    graph: GraphInternal<'a>,
    affinities: Vec<(VertexIndex, VertexIndex)>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> FamilyGraph<'a> {
    /// Builds the family graph for `persons`.
    ///
    /// # Errors
    ///
    /// Returns [`LineageError::DuplicateIdentifier`] listing every identifier
    /// used by more than one record.
    ///
    /// # Examples
    ///
    /// ```
    /// use lineage::{person::Person, structure::FamilyGraph};
    ///
    /// let persons = vec![
    ///     Person::new("a"),
    ///     Person::new("b").with_parents(["a", "ghost"]),
    /// ];
    ///
    /// let graph = FamilyGraph::build(&persons).unwrap();
    /// assert_eq!(graph.vertex_count(), 2);
    /// assert_eq!(graph.edge_count(), 1);
    /// assert_eq!(graph.diagnostics().len(), 1);
    /// ```
    pub fn build(persons: &'a [Person]) -> Result<Self, LineageError> {
        info!(persons_count = persons.len(); "Building family graph");

        let mut graph = GraphInternal::new();
        let mut duplicates = BTreeSet::new();

        for person in persons {
            if graph.add_vertex(person).is_err() {
                duplicates.insert(person.id().clone());
            }
        }

        if !duplicates.is_empty() {
            let duplicates: Vec<PersonId> = duplicates.into_iter().collect();
            warn!(duplicates_count = duplicates.len(); "Duplicate identifiers in input");
            return Err(LineageError::DuplicateIdentifier(duplicates));
        }

        let mut diagnostics = Vec::new();

        for person in persons {
            let Some(child) = graph.vertex_index(person.id().as_str()) else {
                continue;
            };
            let mut seen = HashSet::new();

            for parent_id in person.parent_ids() {
                let Some(parent) = graph.vertex_index(parent_id.as_str()) else {
                    diagnostics.push(Diagnostic::DanglingReference {
                        child_id: person.id().clone(),
                        missing_parent_id: parent_id.clone(),
                    });
                    continue;
                };

                if !seen.insert(parent) {
                    diagnostics.push(Diagnostic::RedundantParentReference {
                        child_id: person.id().clone(),
                        parent_id: parent_id.clone(),
                    });
                    continue;
                }

                graph.add_edge(parent, child);
            }
        }

        let affinities = Self::collect_affinities(&graph, persons, &mut diagnostics);

        for diagnostic in &diagnostics {
            warn!(code = diagnostic.code().as_str(); "{diagnostic}");
        }
        debug!(
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            affinities = affinities.len(),
            diagnostics = diagnostics.len();
            "Family graph built"
        );

        Ok(Self {
            graph,
            affinities,
            diagnostics,
        })
    }

    /// Resolves spouse references into normalized, deduplicated vertex pairs.
    ///
    /// Pairs are ordered by `(min, max)` vertex index and sorted, so
    /// asymmetric storage (only one partner lists the other) and symmetric
    /// storage produce the same list.
    fn collect_affinities(
        graph: &GraphInternal<'a>,
        persons: &'a [Person],
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Vec<(VertexIndex, VertexIndex)> {
        let mut pairs = BTreeSet::new();

        for person in persons {
            let Some(vertex) = graph.vertex_index(person.id().as_str()) else {
                continue;
            };
            for spouse_id in person.spouse_ids() {
                match graph.vertex_index(spouse_id.as_str()) {
                    Some(spouse) if spouse == vertex => {}
                    Some(spouse) => {
                        pairs.insert((vertex.min(spouse), vertex.max(spouse)));
                    }
                    None => diagnostics.push(Diagnostic::DanglingSpouseReference {
                        person_id: person.id().clone(),
                        missing_spouse_id: spouse_id.clone(),
                    }),
                }
            }
        }

        pairs.into_iter().collect()
    }

    /// Returns the number of vertices (one per input record).
    pub fn vertex_count(&self) -> usize {
        self.graph.vertex_count()
    }

    /// Returns the number of parent/child edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns an iterator over all vertices in input order.
    pub fn vertices(&self) -> impl Iterator<Item = VertexIndex> + '_ {
        self.graph.vertices()
    }

    /// Returns an iterator over all edges in input order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeIndex, Edge)> + '_ {
        self.graph.edges()
    }

    /// Returns the edge at `idx`.
    ///
    /// # Panics
    /// Panics if the index does not belong to this graph.
    pub fn edge(&self, idx: EdgeIndex) -> Edge {
        self.graph.edge(idx)
    }

    /// Returns the edges from `vertex`'s parents.
    pub fn incoming_edges(&self, vertex: VertexIndex) -> &[EdgeIndex] {
        self.graph.incoming_edges(vertex)
    }

    /// Returns the edges to `vertex`'s children.
    pub fn outgoing_edges(&self, vertex: VertexIndex) -> &[EdgeIndex] {
        self.graph.outgoing_edges(vertex)
    }

    /// Looks up a vertex by person identifier.
    pub fn vertex_index(&self, id: &str) -> Option<VertexIndex> {
        self.graph.vertex_index(id)
    }

    /// Returns the record behind `vertex`.
    ///
    /// # Panics
    /// Panics if the index does not belong to this graph.
    pub fn person(&self, vertex: VertexIndex) -> &'a Person {
        self.graph.person(vertex)
    }

    /// Returns the identifier of `vertex`.
    ///
    /// # Panics
    /// Panics if the index does not belong to this graph.
    pub fn id(&self, vertex: VertexIndex) -> &PersonId {
        self.graph.id(vertex)
    }

    /// Returns the `(parentId, childId)` pair for an edge.
    pub fn edge_ids(&self, idx: EdgeIndex) -> (&PersonId, &PersonId) {
        let edge = self.graph.edge(idx);
        (self.graph.id(edge.parent()), self.graph.id(edge.child()))
    }

    /// Returns the spouse affinity pairs, each ordered `(lower, higher)` index.
    pub fn affinities(&self) -> &[(VertexIndex, VertexIndex)] {
        &self.affinities
    }

    /// Returns the diagnostics collected while building.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}
