//! Generation (rank) assignment.
//!
//! Ranks come from longest-path layering over the parent/child DAG: a vertex
//! without ranked parents gets rank 0, every other vertex gets one more than
//! its deepest parent. Every ranked edge therefore points strictly downward.
//!
//! Records may describe impossible ancestry (A is B's parent and B is A's
//! parent, or someone is their own parent). Before layering, cycles are
//! broken one edge per strongly connected component at a time, always
//! excluding the lexicographically greatest `(parentId, childId)` edge inside
//! the component, until the residual graph is acyclic. Excluded edges are
//! reported as [`Diagnostic::CycleBroken`] and flagged as unranked.

use std::collections::HashSet;

use log::{debug, trace, warn};
use petgraph::{
    Direction,
    algo::{tarjan_scc, toposort},
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
};

use crate::{
    diagnostic::Diagnostic,
    error::LineageError,
    structure::{EdgeIndex, FamilyGraph, VertexIndex},
};

/// Result of rank assignment.
#[derive(Debug, Clone)]
pub struct Ranking {
    ranks: Vec<usize>,
    unranked: Vec<bool>,
    rank_count: usize,
    diagnostics: Vec<Diagnostic>,
}

impl Ranking {
    /// Returns the generation of `vertex`.
    ///
    /// # Panics
    /// Panics if the vertex does not belong to the ranked graph.
    pub fn rank(&self, vertex: VertexIndex) -> usize {
        self.ranks[vertex.index()]
    }

    /// Returns `true` if the edge took part in rank computation.
    pub fn is_ranked(&self, edge: EdgeIndex) -> bool {
        !self.unranked[edge.index()]
    }

    /// Number of generations (highest rank + 1, or 0 for an empty graph).
    pub fn rank_count(&self) -> usize {
        self.rank_count
    }

    /// Returns one [`Diagnostic::CycleBroken`] per excluded edge.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

/// Assigns a rank to every vertex of `graph`.
///
/// With `tighten_roots`, parentless vertices that have children are moved
/// down to sit directly above their highest child, so a person who married
/// into the family appears one generation above their children instead of
/// at rank 0.
///
/// # Errors
///
/// Returns [`LineageError::Layout`] if the residual graph is still cyclic
/// after cycle breaking, which indicates a bug rather than bad input.
pub fn assign_ranks(graph: &FamilyGraph, tighten_roots: bool) -> Result<Ranking, LineageError> {
    let (unranked, diagnostics) = break_cycles(graph);
    let dag = residual_graph(graph, &unranked);

    let topological = toposort(&dag, None).map_err(|cycle| {
        let vertex = VertexIndex::new(cycle.node_id().index());
        LineageError::Layout(format!(
            "cycle through `{}` survived cycle breaking",
            graph.id(vertex)
        ))
    })?;

    let mut ranks = vec![0usize; graph.vertex_count()];
    for &node in &topological {
        ranks[node.index()] = dag
            .edges_directed(node, Direction::Incoming)
            .map(|edge| ranks[edge.source().index()] + 1)
            .max()
            .unwrap_or(0);
    }

    if tighten_roots {
        for &node in &topological {
            if dag
                .edges_directed(node, Direction::Incoming)
                .next()
                .is_some()
            {
                continue;
            }
            let highest_child = dag
                .edges_directed(node, Direction::Outgoing)
                .map(|edge| ranks[edge.target().index()])
                .min();
            if let Some(child_rank) = highest_child {
                trace!(vertex = graph.id(VertexIndex::new(node.index())).as_str(), rank = child_rank - 1; "Tightened root");
                ranks[node.index()] = child_rank - 1;
            }
        }
    }

    let rank_count = ranks.iter().max().map_or(0, |max| max + 1);
    debug!(
        rank_count = rank_count,
        excluded_edges = diagnostics.len();
        "Ranks assigned"
    );

    Ok(Ranking {
        ranks,
        unranked,
        rank_count,
        diagnostics,
    })
}

/// Builds the petgraph view of `graph` without the excluded edges.
///
/// Node `i` of the result is vertex `i` of the family graph; edge weights are
/// the family graph's edge indices.
fn residual_graph(graph: &FamilyGraph, excluded: &[bool]) -> DiGraph<(), EdgeIndex> {
    let mut dag = DiGraph::with_capacity(graph.vertex_count(), graph.edge_count());
    for _ in graph.vertices() {
        dag.add_node(());
    }
    for (idx, edge) in graph.edges() {
        if !excluded[idx.index()] {
            dag.add_edge(
                NodeIndex::new(edge.parent().index()),
                NodeIndex::new(edge.child().index()),
                idx,
            );
        }
    }
    dag
}

/// Excludes edges until no strongly connected component contains a cycle.
///
/// Components evolve independently of each other, so excluding the greatest
/// edge of every cyclic component in the same round gives the same result as
/// excluding the single greatest edge overall per round.
fn break_cycles(graph: &FamilyGraph) -> (Vec<bool>, Vec<Diagnostic>) {
    let mut excluded = vec![false; graph.edge_count()];
    let mut diagnostics = Vec::new();

    loop {
        let residual = residual_graph(graph, &excluded);
        let mut broken: Vec<EdgeIndex> = tarjan_scc(&residual)
            .into_iter()
            .filter_map(|component| {
                let members: HashSet<NodeIndex> = component.iter().copied().collect();
                component
                    .iter()
                    .flat_map(|&node| residual.edges(node))
                    .filter(|edge| members.contains(&edge.target()))
                    .map(|edge| *edge.weight())
                    .max_by(|a, b| graph.edge_ids(*a).cmp(&graph.edge_ids(*b)))
            })
            .collect();

        if broken.is_empty() {
            break;
        }

        broken.sort_by(|a, b| graph.edge_ids(*a).cmp(&graph.edge_ids(*b)));
        for edge in broken {
            let (parent, child) = graph.edge_ids(edge);
            warn!(parent = parent.as_str(), child = child.as_str(); "Excluding edge to break ancestry cycle");
            excluded[edge.index()] = true;
            diagnostics.push(Diagnostic::CycleBroken {
                excluded_edge: (parent.clone(), child.clone()),
            });
        }
    }

    (excluded, diagnostics)
}

#[cfg(test)]
mod tests {
    use lineage_core::{identifier::PersonId, person::Person};

    use super::*;

    fn rank_of(graph: &FamilyGraph, ranking: &Ranking, id: &str) -> usize {
        ranking.rank(graph.vertex_index(id).unwrap())
    }

    fn unranked_edges(graph: &FamilyGraph, ranking: &Ranking) -> Vec<(String, String)> {
        graph
            .edges()
            .filter(|(idx, _)| !ranking.is_ranked(*idx))
            .map(|(idx, _)| {
                let (parent, child) = graph.edge_ids(idx);
                (parent.to_string(), child.to_string())
            })
            .collect()
    }

    #[test]
    fn test_empty_graph() {
        let graph = FamilyGraph::build(&[]).unwrap();
        let ranking = assign_ranks(&graph, false).unwrap();
        assert_eq!(ranking.rank_count(), 0);
        assert!(ranking.diagnostics().is_empty());
    }

    #[test]
    fn test_diamond_ranks() {
        let persons = vec![
            Person::new("A"),
            Person::new("B").with_parents(["A"]),
            Person::new("C").with_parents(["A"]),
            Person::new("D").with_parents(["B", "C"]),
        ];
        let graph = FamilyGraph::build(&persons).unwrap();
        let ranking = assign_ranks(&graph, false).unwrap();

        assert_eq!(rank_of(&graph, &ranking, "A"), 0);
        assert_eq!(rank_of(&graph, &ranking, "B"), 1);
        assert_eq!(rank_of(&graph, &ranking, "C"), 1);
        assert_eq!(rank_of(&graph, &ranking, "D"), 2);
        assert_eq!(ranking.rank_count(), 3);
    }

    #[test]
    fn test_longest_path_wins() {
        // g -> p -> c and g -> c: c must sit below p, not directly below g.
        let persons = vec![
            Person::new("g"),
            Person::new("p").with_parents(["g"]),
            Person::new("c").with_parents(["g", "p"]),
        ];
        let graph = FamilyGraph::build(&persons).unwrap();
        let ranking = assign_ranks(&graph, false).unwrap();

        assert_eq!(rank_of(&graph, &ranking, "c"), 2);
    }

    #[test]
    fn test_two_cycle_excludes_greatest_edge() {
        let persons = vec![
            Person::new("A").with_parents(["B"]),
            Person::new("B").with_parents(["A"]),
        ];
        let graph = FamilyGraph::build(&persons).unwrap();
        let ranking = assign_ranks(&graph, false).unwrap();

        assert_eq!(
            unranked_edges(&graph, &ranking),
            vec![("B".to_string(), "A".to_string())]
        );
        assert_eq!(rank_of(&graph, &ranking, "A"), 0);
        assert_eq!(rank_of(&graph, &ranking, "B"), 1);
        assert_eq!(
            ranking.diagnostics(),
            &[Diagnostic::CycleBroken {
                excluded_edge: (PersonId::new("B"), PersonId::new("A"))
            }]
        );
    }

    #[test]
    fn test_self_loop_is_excluded() {
        let persons = vec![Person::new("A").with_parents(["A"])];
        let graph = FamilyGraph::build(&persons).unwrap();
        let ranking = assign_ranks(&graph, false).unwrap();

        assert_eq!(
            unranked_edges(&graph, &ranking),
            vec![("A".to_string(), "A".to_string())]
        );
        assert_eq!(rank_of(&graph, &ranking, "A"), 0);
    }

    #[test]
    fn test_three_cycle_needs_one_exclusion() {
        // a -> b -> c -> a
        let persons = vec![
            Person::new("a").with_parents(["c"]),
            Person::new("b").with_parents(["a"]),
            Person::new("c").with_parents(["b"]),
        ];
        let graph = FamilyGraph::build(&persons).unwrap();
        let ranking = assign_ranks(&graph, false).unwrap();

        assert_eq!(
            unranked_edges(&graph, &ranking),
            vec![("c".to_string(), "a".to_string())]
        );
        assert_eq!(rank_of(&graph, &ranking, "a"), 0);
        assert_eq!(rank_of(&graph, &ranking, "b"), 1);
        assert_eq!(rank_of(&graph, &ranking, "c"), 2);
    }

    #[test]
    fn test_nested_cycles_repeat_until_acyclic() {
        // Two cycles sharing vertex x: x <-> y and x <-> z.
        let persons = vec![
            Person::new("x").with_parents(["y", "z"]),
            Person::new("y").with_parents(["x"]),
            Person::new("z").with_parents(["x"]),
        ];
        let graph = FamilyGraph::build(&persons).unwrap();
        let ranking = assign_ranks(&graph, false).unwrap();

        let mut unranked = unranked_edges(&graph, &ranking);
        unranked.sort();
        assert_eq!(
            unranked,
            vec![
                ("y".to_string(), "x".to_string()),
                ("z".to_string(), "x".to_string()),
            ]
        );
        assert_eq!(ranking.diagnostics().len(), 2);
    }

    #[test]
    fn test_disconnected_components_rank_independently() {
        let persons = vec![
            Person::new("a1"),
            Person::new("a2").with_parents(["a1"]),
            Person::new("a3").with_parents(["a2"]),
            Person::new("b1"),
            Person::new("b2").with_parents(["b1"]),
            Person::new("loner"),
        ];
        let graph = FamilyGraph::build(&persons).unwrap();
        let ranking = assign_ranks(&graph, false).unwrap();

        assert_eq!(rank_of(&graph, &ranking, "a3"), 2);
        assert_eq!(rank_of(&graph, &ranking, "b1"), 0);
        assert_eq!(rank_of(&graph, &ranking, "b2"), 1);
        assert_eq!(rank_of(&graph, &ranking, "loner"), 0);
    }

    #[test]
    fn test_tighten_roots_moves_married_in_parent_down() {
        let persons = vec![
            Person::new("gp"),
            Person::new("dad").with_parents(["gp"]),
            Person::new("mom"),
            Person::new("kid").with_parents(["dad", "mom"]),
            Person::new("loner"),
        ];
        let graph = FamilyGraph::build(&persons).unwrap();

        let loose = assign_ranks(&graph, false).unwrap();
        assert_eq!(rank_of(&graph, &loose, "mom"), 0);

        let tight = assign_ranks(&graph, true).unwrap();
        assert_eq!(rank_of(&graph, &tight, "mom"), 1);
        assert_eq!(rank_of(&graph, &tight, "dad"), 1);
        assert_eq!(rank_of(&graph, &tight, "gp"), 0);
        assert_eq!(rank_of(&graph, &tight, "kid"), 2);
        assert_eq!(rank_of(&graph, &tight, "loner"), 0);
    }
}
