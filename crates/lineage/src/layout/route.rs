//! Edge routing hints.

use lineage_core::geometry::{Bounds, Point};

use super::{EdgeRoute, PlacedVertex, RouteStyle, rank::Ranking};
use crate::{
    config::{LayoutConfig, RankDirection},
    structure::FamilyGraph,
};

/// Clearance kept around a node by self-loop routes.
const LOOP_MARGIN: f32 = 12.0;

/// Computes a route for every edge of `graph`, in build order.
///
/// `placed` must be indexed by vertex, as returned by [`super::place`].
///
/// Routes leave the parent from its child-facing side and enter the child
/// from its parent-facing side. Vertically aligned anchors are joined by a
/// straight segment; otherwise the route turns twice, with the horizontal
/// segment in the middle of the gap next to the parent (ranked edges) or
/// halfway between the anchors (unranked edges).
pub fn route_edges(
    graph: &FamilyGraph,
    ranking: &Ranking,
    placed: &[PlacedVertex],
    config: &LayoutConfig,
) -> Vec<EdgeRoute> {
    let direction = config.direction();
    let downward = match direction {
        RankDirection::TopToBottom => 1.0,
        RankDirection::BottomToTop => -1.0,
    };

    graph
        .edges()
        .map(|(idx, edge)| {
            let parent = &placed[edge.parent().index()];
            let child = &placed[edge.child().index()];
            let (parent_id, child_id) = graph.edge_ids(idx);
            let ranked = ranking.is_ranked(idx);

            let (start, end) = match direction {
                RankDirection::TopToBottom => (parent.bottom_anchor(), child.top_anchor()),
                RankDirection::BottomToTop => (parent.top_anchor(), child.bottom_anchor()),
            };

            let (style, waypoints) = if edge.is_self_loop() {
                (
                    RouteStyle::Orthogonal,
                    self_loop(parent.bounds(), start, end, downward),
                )
            } else if (start.x() - end.x()).abs() < f32::EPSILON {
                (RouteStyle::Straight, vec![start, end])
            } else {
                let bend_y = if ranked {
                    start.y() + downward * config.rank_gap() / 2.0
                } else {
                    start.midpoint(end).y()
                };
                (
                    RouteStyle::Orthogonal,
                    vec![
                        start,
                        Point::new(start.x(), bend_y),
                        Point::new(end.x(), bend_y),
                        end,
                    ],
                )
            };

            EdgeRoute::new(parent_id, child_id, !ranked, style, waypoints)
        })
        .collect()
}

/// Loop around the right side of a node from `start` back into `end`.
fn self_loop(bounds: Bounds, start: Point, end: Point, downward: f32) -> Vec<Point> {
    let out_y = start.y() + downward * LOOP_MARGIN;
    let in_y = end.y() - downward * LOOP_MARGIN;
    let side_x = bounds.max_x() + LOOP_MARGIN;
    vec![
        start,
        Point::new(start.x(), out_y),
        Point::new(side_x, out_y),
        Point::new(side_x, in_y),
        Point::new(end.x(), in_y),
        end,
    ]
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;
    use lineage_core::person::Person;

    use super::*;
    use crate::layout::{order::order_vertices, position::place, rank::assign_ranks};

    fn routes(persons: &[Person], config: &LayoutConfig) -> Vec<EdgeRoute> {
        let graph = FamilyGraph::build(persons).unwrap();
        let ranking = assign_ranks(&graph, false).unwrap();
        let ordering = order_vertices(&graph, &ranking, 8, 0);
        let placed = place(&graph, &ranking, &ordering, config);
        route_edges(&graph, &ranking, &placed, config)
    }

    fn find<'a>(routes: &'a [EdgeRoute], id: &str) -> &'a EdgeRoute {
        routes.iter().find(|r| r.id() == id).unwrap()
    }

    #[test]
    fn test_aligned_edge_is_straight() {
        let routes = routes(
            &[Person::new("p"), Person::new("c").with_parents(["p"])],
            &LayoutConfig::default(),
        );
        let route = find(&routes, "p-c");

        assert_eq!(route.style(), RouteStyle::Straight);
        assert_eq!(route.waypoints().len(), 2);
        // Bottom of p (y = 100) to top of c (y = 180).
        assert!(approx_eq!(f32, route.start().y(), 100.0));
        assert!(approx_eq!(f32, route.end().y(), 180.0));
        assert!(approx_eq!(f32, route.start().x(), 0.0));
    }

    #[test]
    fn test_offset_edge_bends_in_gap_band() {
        let routes = routes(
            &[
                Person::new("A"),
                Person::new("B").with_parents(["A"]),
                Person::new("C").with_parents(["A"]),
            ],
            &LayoutConfig::default(),
        );
        let route = find(&routes, "A-C");

        assert_eq!(route.style(), RouteStyle::Orthogonal);
        let points = route.waypoints();
        assert_eq!(points.len(), 4);
        assert!(approx_eq!(f32, points[1].y(), 140.0));
        assert!(approx_eq!(f32, points[2].y(), 140.0));
        assert!(approx_eq!(f32, points[1].x(), 0.0));
        assert!(approx_eq!(f32, points[2].x(), 150.0));
        assert_eq!(points[3], route.end());
    }

    #[test]
    fn test_bottom_to_top_routes_upward() {
        let config = LayoutConfig::default().with_direction(RankDirection::BottomToTop);
        let routes = routes(
            &[
                Person::new("A"),
                Person::new("B").with_parents(["A"]),
                Person::new("C").with_parents(["A"]),
            ],
            &config,
        );
        let route = find(&routes, "A-B");

        // A sits at y = 180, B at y = 0: leave A's top, enter B's bottom.
        assert!(approx_eq!(f32, route.start().y(), 180.0));
        assert!(approx_eq!(f32, route.end().y(), 100.0));
        assert!(approx_eq!(f32, route.waypoints()[1].y(), 140.0));
    }

    #[test]
    fn test_unranked_edge_bends_at_midpoint() {
        let routes = routes(
            &[
                Person::new("a").with_parents(["b"]),
                Person::new("b").with_parents(["a"]),
                Person::new("x").with_parents(["a"]),
            ],
            &LayoutConfig::default(),
        );
        let route = find(&routes, "b-a");

        assert!(route.is_unranked());
        assert!(!find(&routes, "a-b").is_unranked());
        if route.style() == RouteStyle::Orthogonal {
            let mid = route.start().midpoint(route.end()).y();
            assert!(approx_eq!(f32, route.waypoints()[1].y(), mid));
        }
    }

    #[test]
    fn test_self_loop_goes_around_the_node() {
        let routes = routes(
            &[Person::new("a").with_parents(["a"])],
            &LayoutConfig::default(),
        );
        let route = find(&routes, "a-a");

        assert!(route.is_unranked());
        assert_eq!(route.style(), RouteStyle::Orthogonal);
        assert_eq!(route.waypoints().len(), 6);
        // Node spans x in [-125, 125].
        assert!(route.waypoints().iter().any(|p| p.x() > 125.0));
        assert!(approx_eq!(f32, route.start().y(), 100.0));
        assert!(approx_eq!(f32, route.end().y(), 0.0));
    }
}
