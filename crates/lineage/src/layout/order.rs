//! Within-rank ordering (crossing reduction).
//!
//! The initial order comes from a depth-first walk from the roots, visiting
//! children in identifier order, so subtrees start out contiguous. Sweeps
//! then alternate direction: a downward pass reorders each rank by the
//! median position of the vertices' ranked parents, an upward pass by their
//! ranked children. Ties fall back to the mean position and then to the
//! identifier, which keeps the result independent of hash iteration order.
//! The ordering with the fewest crossings seen across all passes wins.
//!
//! A final pass tries to place spouses on the same rank next to each other
//! when that does not add more crossings than the configured tolerance.

use log::{debug, trace};

use super::{crossing::bilayer_crossings, rank::Ranking};
use crate::structure::{FamilyGraph, VertexIndex};

/// Vertices of every rank in left-to-right order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ordering {
    layers: Vec<Vec<VertexIndex>>,
    crossings: usize,
}

impl Ordering {
    /// Returns every rank's vertices, indexed by rank.
    pub fn layers(&self) -> &[Vec<VertexIndex>] {
        &self.layers
    }

    /// Returns the vertices of `rank`, or an empty slice past the last rank.
    pub fn layer(&self, rank: usize) -> &[VertexIndex] {
        self.layers.get(rank).map_or(&[], Vec::as_slice)
    }

    /// Total crossings between adjacent ranks in this ordering.
    pub fn crossings(&self) -> usize {
        self.crossings
    }
}

/// Ranked parent and child lists per vertex, in identifier order.
struct Neighbourhood {
    parents: Vec<Vec<VertexIndex>>,
    children: Vec<Vec<VertexIndex>>,
    /// `spans[r]` holds the ranked edges from rank `r` to rank `r + 1`.
    spans: Vec<Vec<(VertexIndex, VertexIndex)>>,
}

impl Neighbourhood {
    fn new(graph: &FamilyGraph, ranking: &Ranking) -> Self {
        let n = graph.vertex_count();
        let mut parents = vec![Vec::new(); n];
        let mut children = vec![Vec::new(); n];
        let mut spans = vec![Vec::new(); ranking.rank_count().saturating_sub(1)];

        for (idx, edge) in graph.edges() {
            if !ranking.is_ranked(idx) {
                continue;
            }
            let (parent, child) = (edge.parent(), edge.child());
            parents[child.index()].push(parent);
            children[parent.index()].push(child);

            let upper = ranking.rank(parent);
            if ranking.rank(child) == upper + 1 {
                spans[upper].push((parent, child));
            }
        }

        let by_id = |a: &VertexIndex, b: &VertexIndex| graph.id(*a).cmp(graph.id(*b));
        for list in parents.iter_mut().chain(children.iter_mut()) {
            list.sort_by(by_id);
        }

        Self {
            parents,
            children,
            spans,
        }
    }
}

/// Working state: the layers plus every vertex's index within its layer.
struct LayerState {
    layers: Vec<Vec<VertexIndex>>,
    position: Vec<usize>,
}

impl LayerState {
    fn new(layers: Vec<Vec<VertexIndex>>, vertex_count: usize) -> Self {
        let mut state = Self {
            layers,
            position: vec![0; vertex_count],
        };
        for rank in 0..state.layers.len() {
            state.reindex(rank);
        }
        state
    }

    fn reindex(&mut self, rank: usize) {
        for (i, vertex) in self.layers[rank].iter().enumerate() {
            self.position[vertex.index()] = i;
        }
    }

    fn set_layer(&mut self, rank: usize, layer: Vec<VertexIndex>) {
        self.layers[rank] = layer;
        self.reindex(rank);
    }

    fn span_crossings(&self, hood: &Neighbourhood, upper: usize) -> usize {
        bilayer_crossings(
            &hood.spans[upper],
            &self.position,
            self.layers[upper + 1].len(),
        )
    }

    fn total_crossings(&self, hood: &Neighbourhood) -> usize {
        (0..hood.spans.len())
            .map(|upper| self.span_crossings(hood, upper))
            .sum()
    }

    /// Crossings on the spans touching `rank`.
    fn local_crossings(&self, hood: &Neighbourhood, rank: usize) -> usize {
        let above = rank
            .checked_sub(1)
            .map_or(0, |upper| self.span_crossings(hood, upper));
        let below = if rank < hood.spans.len() {
            self.span_crossings(hood, rank)
        } else {
            0
        };
        above + below
    }

    fn are_adjacent(&self, a: VertexIndex, b: VertexIndex) -> bool {
        self.position[a.index()].abs_diff(self.position[b.index()]) == 1
    }

    /// Reorders `rank` by the median position of each vertex's neighbours.
    ///
    /// Returns `true` if the order changed.
    fn reorder(
        &mut self,
        graph: &FamilyGraph,
        rank: usize,
        neighbours: &[Vec<VertexIndex>],
    ) -> bool {
        let mut keyed: Vec<(f64, f64, VertexIndex)> = self.layers[rank]
            .iter()
            .map(|&vertex| {
                let mut positions: Vec<f64> = neighbours[vertex.index()]
                    .iter()
                    .map(|n| self.position[n.index()] as f64)
                    .collect();
                if positions.is_empty() {
                    let current = self.position[vertex.index()] as f64;
                    return (current, current, vertex);
                }
                positions.sort_by(f64::total_cmp);
                (median(&positions), mean(&positions), vertex)
            })
            .collect();

        keyed.sort_by(|a, b| {
            a.0.total_cmp(&b.0)
                .then(a.1.total_cmp(&b.1))
                .then_with(|| graph.id(a.2).cmp(graph.id(b.2)))
        });

        let reordered: Vec<VertexIndex> = keyed.into_iter().map(|(_, _, v)| v).collect();
        if reordered == self.layers[rank] {
            return false;
        }
        self.set_layer(rank, reordered);
        true
    }
}

fn median(sorted: &[f64]) -> f64 {
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Orders the vertices of every rank to reduce edge crossings.
///
/// `passes` bounds the number of alternating sweeps; sweeping stops early
/// once a downward and an upward pass in a row leave every rank unchanged,
/// or once no crossings remain. `affinity_tolerance` is the number of extra
/// crossings the spouse pass may introduce to bring a couple together.
pub fn order_vertices(
    graph: &FamilyGraph,
    ranking: &Ranking,
    passes: usize,
    affinity_tolerance: usize,
) -> Ordering {
    let hood = Neighbourhood::new(graph, ranking);
    let mut state = LayerState::new(
        initial_layers(graph, ranking, &hood),
        graph.vertex_count(),
    );

    let mut best_crossings = state.total_crossings(&hood);
    let mut best_layers = state.layers.clone();
    debug!(crossings = best_crossings; "Initial ordering");

    let rank_count = ranking.rank_count();
    let mut quiet_passes = 0;
    for pass in 0..passes {
        if best_crossings == 0 {
            break;
        }
        let changed = if pass % 2 == 0 {
            (1..rank_count).fold(false, |changed, rank| {
                state.reorder(graph, rank, &hood.parents) || changed
            })
        } else {
            (0..rank_count.saturating_sub(1))
                .rev()
                .fold(false, |changed, rank| {
                    state.reorder(graph, rank, &hood.children) || changed
                })
        };

        let crossings = state.total_crossings(&hood);
        trace!(pass, crossings, changed; "Sweep finished");
        if crossings < best_crossings {
            best_crossings = crossings;
            best_layers = state.layers.clone();
        }

        quiet_passes = if changed { 0 } else { quiet_passes + 1 };
        if quiet_passes >= 2 {
            break;
        }
    }

    let mut state = LayerState::new(best_layers, graph.vertex_count());
    pull_spouses_together(graph, ranking, &hood, &mut state, affinity_tolerance);

    let crossings = state.total_crossings(&hood);
    debug!(crossings; "Ordering finished");

    Ordering {
        layers: state.layers,
        crossings,
    }
}

/// Depth-first layer assignment starting from the roots in identifier order.
fn initial_layers(
    graph: &FamilyGraph,
    ranking: &Ranking,
    hood: &Neighbourhood,
) -> Vec<Vec<VertexIndex>> {
    let mut layers = vec![Vec::new(); ranking.rank_count()];
    let mut visited = vec![false; graph.vertex_count()];

    let mut roots: Vec<VertexIndex> = graph
        .vertices()
        .filter(|v| hood.parents[v.index()].is_empty())
        .collect();
    roots.sort_by(|a, b| graph.id(*a).cmp(graph.id(*b)));

    for root in roots {
        let mut stack = vec![root];
        while let Some(vertex) = stack.pop() {
            if visited[vertex.index()] {
                continue;
            }
            visited[vertex.index()] = true;
            layers[ranking.rank(vertex)].push(vertex);
            // Reversed so the smallest identifier is visited first.
            stack.extend(hood.children[vertex.index()].iter().rev().copied());
        }
    }

    layers
}

/// Moves spouses on the same rank next to each other where it is cheap.
///
/// For each couple (in identifier order) that is not already adjacent, four
/// candidates are tried: either partner placed directly left or right of the
/// other. A candidate is accepted if it increases the number of adjacent
/// couples on the rank and adds at most `tolerance` crossings; among
/// accepted candidates the one with the fewest crossings wins, first tried
/// on ties.
fn pull_spouses_together(
    graph: &FamilyGraph,
    ranking: &Ranking,
    hood: &Neighbourhood,
    state: &mut LayerState,
    tolerance: usize,
) {
    let mut couples: Vec<Vec<(VertexIndex, VertexIndex)>> =
        vec![Vec::new(); ranking.rank_count()];
    for &(a, b) in graph.affinities() {
        let rank = ranking.rank(a);
        if rank != ranking.rank(b) {
            continue;
        }
        let pair = if graph.id(a) <= graph.id(b) {
            (a, b)
        } else {
            (b, a)
        };
        couples[rank].push(pair);
    }

    for (rank, pairs) in couples.iter_mut().enumerate() {
        pairs.sort_by(|x, y| {
            (graph.id(x.0), graph.id(x.1)).cmp(&(graph.id(y.0), graph.id(y.1)))
        });

        for &(a, b) in pairs.iter() {
            if state.are_adjacent(a, b) {
                continue;
            }

            let adjacent_count = |state: &LayerState| {
                pairs
                    .iter()
                    .filter(|(x, y)| state.are_adjacent(*x, *y))
                    .count()
            };
            let current_layer = state.layers[rank].clone();
            let current_adjacent = adjacent_count(state);
            let current_crossings = state.local_crossings(hood, rank);

            let mut best: Option<(usize, Vec<VertexIndex>)> = None;
            for (moving, anchor, right) in
                [(b, a, true), (b, a, false), (a, b, true), (a, b, false)]
            {
                let Some(candidate) = moved(&current_layer, moving, anchor, right) else {
                    continue;
                };
                state.set_layer(rank, candidate);
                let adjacent = adjacent_count(state);
                let crossings = state.local_crossings(hood, rank);

                let accepted = adjacent > current_adjacent
                    && crossings <= current_crossings + tolerance
                    && best
                        .as_ref()
                        .is_none_or(|(best_crossings, _)| crossings < *best_crossings);
                if accepted {
                    best = Some((crossings, state.layers[rank].clone()));
                }
            }

            match best {
                Some((crossings, layer)) => {
                    trace!(
                        a = graph.id(a).as_str(),
                        b = graph.id(b).as_str(),
                        crossings;
                        "Placed spouses side by side"
                    );
                    state.set_layer(rank, layer);
                }
                None => state.set_layer(rank, current_layer),
            }
        }
    }
}

/// Returns `layer` with `moving` reinserted directly beside `anchor`.
fn moved(
    layer: &[VertexIndex],
    moving: VertexIndex,
    anchor: VertexIndex,
    right: bool,
) -> Option<Vec<VertexIndex>> {
    let mut out: Vec<VertexIndex> = layer.iter().copied().filter(|v| *v != moving).collect();
    let at = out.iter().position(|v| *v == anchor)?;
    out.insert(if right { at + 1 } else { at }, moving);
    Some(out)
}

#[cfg(test)]
mod tests {
    use lineage_core::person::Person;

    use super::*;
    use crate::layout::rank::assign_ranks;

    fn ids(graph: &FamilyGraph, layer: &[VertexIndex]) -> Vec<String> {
        layer.iter().map(|v| graph.id(*v).to_string()).collect()
    }

    fn order(persons: &[Person], tolerance: usize) -> (FamilyGraph<'_>, Ordering) {
        let graph = FamilyGraph::build(persons).unwrap();
        let ranking = assign_ranks(&graph, false).unwrap();
        let ordering = order_vertices(&graph, &ranking, 8, tolerance);
        (graph, ordering)
    }

    #[test]
    fn test_empty_graph() {
        let (_, ordering) = order(&[], 0);
        assert!(ordering.layers().is_empty());
        assert_eq!(ordering.crossings(), 0);
        assert!(ordering.layer(3).is_empty());
    }

    #[test]
    fn test_diamond_order() {
        let persons = vec![
            Person::new("A"),
            Person::new("B").with_parents(["A"]),
            Person::new("C").with_parents(["A"]),
            Person::new("D").with_parents(["B", "C"]),
        ];
        let (graph, ordering) = order(&persons, 0);

        assert_eq!(ids(&graph, ordering.layer(0)), ["A"]);
        assert_eq!(ids(&graph, ordering.layer(1)), ["B", "C"]);
        assert_eq!(ids(&graph, ordering.layer(2)), ["D"]);
        assert_eq!(ordering.crossings(), 0);
    }

    #[test]
    fn test_every_vertex_appears_once() {
        let persons = vec![
            Person::new("r1"),
            Person::new("r2"),
            Person::new("x").with_parents(["r1", "r2"]),
            Person::new("y").with_parents(["r2"]),
            Person::new("z").with_parents(["x", "y"]),
            Person::new("solo"),
        ];
        let (graph, ordering) = order(&persons, 0);

        let mut seen: Vec<String> = ordering
            .layers()
            .iter()
            .flat_map(|layer| ids(&graph, layer))
            .collect();
        seen.sort();
        assert_eq!(seen, ["r1", "r2", "solo", "x", "y", "z"]);
    }

    #[test]
    fn test_sweeps_remove_crossing() {
        // Depth-first order gives [m, n, o]; a -> n crosses b -> m.
        let persons = vec![
            Person::new("a"),
            Person::new("b"),
            Person::new("m").with_parents(["a", "b"]),
            Person::new("n").with_parents(["a"]),
            Person::new("o").with_parents(["b"]),
        ];
        let (graph, ordering) = order(&persons, 0);

        assert_eq!(ids(&graph, ordering.layer(1)), ["n", "m", "o"]);
        assert_eq!(ordering.crossings(), 0);
    }

    #[test]
    fn test_spouses_become_adjacent() {
        let persons = vec![
            Person::new("p1"),
            Person::new("p2"),
            Person::new("a").with_parents(["p1"]),
            Person::new("b").with_parents(["p1"]),
            Person::new("c").with_parents(["p2"]).with_spouses(["a"]),
        ];
        let (graph, ordering) = order(&persons, 0);

        assert_eq!(ids(&graph, ordering.layer(1)), ["b", "a", "c"]);
        assert_eq!(ordering.crossings(), 0);
    }

    #[test]
    fn test_spouse_pass_respects_tolerance() {
        // Bringing x and y together would force their parents' edges to
        // cross.
        let persons = vec![
            Person::new("p"),
            Person::new("q"),
            Person::new("x").with_parents(["p"]),
            Person::new("m").with_parents(["p", "q"]),
            Person::new("y").with_parents(["q"]).with_spouses(["x"]),
        ];

        let (graph, strict) = order(&persons, 0);
        assert_eq!(ids(&graph, strict.layer(1)), ["x", "m", "y"]);
        assert_eq!(strict.crossings(), 0);

        let (graph, relaxed) = order(&persons, 4);
        let layer = ids(&graph, relaxed.layer(1));
        let x = layer.iter().position(|id| id == "x").unwrap();
        let y = layer.iter().position(|id| id == "y").unwrap();
        assert_eq!(x.abs_diff(y), 1, "layer was {layer:?}");
    }

    #[test]
    fn test_order_is_deterministic() {
        let persons = vec![
            Person::new("g"),
            Person::new("h"),
            Person::new("k1").with_parents(["g", "h"]),
            Person::new("k2").with_parents(["h"]),
            Person::new("k3").with_parents(["g"]).with_spouses(["k2"]),
            Person::new("gk").with_parents(["k1", "k3"]),
        ];
        let (_, first) = order(&persons, 1);
        for _ in 0..5 {
            let (_, again) = order(&persons, 1);
            assert_eq!(first, again);
        }
    }

    #[test]
    fn test_moved_inserts_beside_anchor() {
        let v: Vec<VertexIndex> = (0..4).map(VertexIndex::new).collect();
        assert_eq!(
            moved(&v, v[3], v[0], true),
            Some(vec![v[0], v[3], v[1], v[2]])
        );
        assert_eq!(
            moved(&v, v[0], v[3], false),
            Some(vec![v[1], v[2], v[0], v[3]])
        );
        assert_eq!(moved(&v[..2], v[0], v[3], true), None);
    }
}
