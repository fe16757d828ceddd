//! Coordinate assignment.

use log::trace;

use lineage_core::geometry::{Point, Size};

use super::{PlacedVertex, order::Ordering, rank::Ranking};
use crate::{
    config::{LayoutConfig, RankDirection},
    structure::FamilyGraph,
};

/// Places every vertex of `graph`.
///
/// Each rank occupies a horizontal band of `node_height + rank_gap`; within
/// a rank, vertices are spaced `node_width + node_gap` apart and centred on
/// `x = 0`, so adding a vertex to one rank never shifts the others
/// sideways. Positions are top-left corners.
///
/// The result is indexed by vertex: entry `i` belongs to `VertexIndex(i)`.
pub fn place(
    graph: &FamilyGraph,
    ranking: &Ranking,
    ordering: &Ordering,
    config: &LayoutConfig,
) -> Vec<PlacedVertex> {
    let size = Size::new(config.node_width(), config.node_height());
    let last_rank = ranking.rank_count().saturating_sub(1);

    let mut placed: Vec<Option<PlacedVertex>> = vec![None; graph.vertex_count()];
    for (rank, layer) in ordering.layers().iter().enumerate() {
        let band = match config.direction() {
            RankDirection::TopToBottom => rank,
            RankDirection::BottomToTop => last_rank - rank,
        };
        let y = band as f32 * config.vertical_step();
        let centre = (layer.len() as f32 - 1.0) / 2.0;

        for (order, &vertex) in layer.iter().enumerate() {
            let x = (order as f32 - centre) * config.horizontal_step() - config.node_width() / 2.0;
            trace!(vertex = graph.id(vertex).as_str(), rank, order, x, y; "Placed vertex");
            placed[vertex.index()] = Some(PlacedVertex::new(
                graph.person(vertex),
                rank,
                order,
                Point::new(x, y),
                size,
            ));
        }
    }

    debug_assert!(placed.iter().all(Option::is_some));
    placed.into_iter().flatten().collect()
}
