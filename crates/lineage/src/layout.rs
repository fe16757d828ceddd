//! Layered layout of a [`FamilyGraph`].
//!
//! The layout runs in four stages, each usable on its own:
//!
//! 1. [`assign_ranks`] - generations by longest-path layering, with ancestry
//!    cycles broken deterministically.
//! 2. [`order_vertices`] - left-to-right order within each generation,
//!    reducing edge crossings and keeping spouses together.
//! 3. [`place`] - top-left coordinates, every generation centred on `x = 0`.
//! 4. [`route_edges`] - connector geometry for every parent/child edge.
//!
//! [`Engine`] chains the stages and packages the result as a
//! [`FamilyLayout`].

mod crossing;
mod order;
mod position;
mod rank;
mod route;

pub use order::{Ordering, order_vertices};
pub use position::place;
pub use rank::{Ranking, assign_ranks};
pub use route::route_edges;

use log::{debug, info};
use serde::Serialize;

use lineage_core::{
    geometry::{Bounds, Point, Size},
    identifier::PersonId,
    person::Person,
};

use crate::{
    config::LayoutConfig, diagnostic::Diagnostic, error::LineageError, structure::FamilyGraph,
};

/// A person's box in the finished layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedVertex {
    id: PersonId,
    label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    lifespan: Option<String>,
    rank: usize,
    order: usize,
    position: Point,
    size: Size,
}

impl PlacedVertex {
    pub(crate) fn new(
        person: &Person,
        rank: usize,
        order: usize,
        position: Point,
        size: Size,
    ) -> Self {
        Self {
            id: person.id().clone(),
            label: person.display_name(),
            lifespan: person.lifespan_label(),
            rank,
            order,
            position,
            size,
        }
    }

    pub fn id(&self) -> &PersonId {
        &self.id
    }

    /// Display name shown in the box.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Optional `"birth - death"` line shown under the name.
    pub fn lifespan(&self) -> Option<&str> {
        self.lifespan.as_deref()
    }

    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn order(&self) -> usize {
        self.order
    }

    /// Top-left corner of the box.
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new_from_top_left(self.position, self.size)
    }

    pub fn center(&self) -> Point {
        self.bounds().center()
    }

    /// Centre of the top edge.
    pub fn top_anchor(&self) -> Point {
        Point::new(self.center().x(), self.position.y())
    }

    /// Centre of the bottom edge.
    pub fn bottom_anchor(&self) -> Point {
        Point::new(self.center().x(), self.position.y() + self.size.height())
    }
}

/// How a renderer should draw an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteStyle {
    /// A single straight segment from `start` to `end`.
    Straight,
    /// Axis-aligned segments through the waypoints.
    Orthogonal,
}

/// Connector geometry for one parent/child edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeRoute {
    id: String,
    source: PersonId,
    target: PersonId,
    unranked: bool,
    style: RouteStyle,
    start: Point,
    end: Point,
    waypoints: Vec<Point>,
}

impl EdgeRoute {
    pub(crate) fn new(
        source: &PersonId,
        target: &PersonId,
        unranked: bool,
        style: RouteStyle,
        waypoints: Vec<Point>,
    ) -> Self {
        let start = waypoints.first().copied().unwrap_or_default();
        let end = waypoints.last().copied().unwrap_or_default();
        Self {
            id: format!("{source}-{target}"),
            source: source.clone(),
            target: target.clone(),
            unranked,
            style,
            start,
            end,
            waypoints,
        }
    }

    /// Stable edge identifier, `"{parent}-{child}"`.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The parent.
    pub fn source(&self) -> &PersonId {
        &self.source
    }

    /// The child.
    pub fn target(&self) -> &PersonId {
        &self.target
    }

    /// Returns `true` if the edge was excluded from ranking to break a cycle.
    pub fn is_unranked(&self) -> bool {
        self.unranked
    }

    pub fn style(&self) -> RouteStyle {
        self.style
    }

    /// Parent-side anchor.
    pub fn start(&self) -> Point {
        self.start
    }

    /// Child-side anchor.
    pub fn end(&self) -> Point {
        self.end
    }

    /// Every point of the route, `start` and `end` included.
    pub fn waypoints(&self) -> &[Point] {
        &self.waypoints
    }
}

/// The complete result of one layout run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FamilyLayout {
    vertices: Vec<PlacedVertex>,
    edges: Vec<EdgeRoute>,
    diagnostics: Vec<Diagnostic>,
    bounds: Bounds,
    rank_count: usize,
    crossings: usize,
}

impl FamilyLayout {
    /// Placed vertices sorted by rank, then order.
    pub fn vertices(&self) -> &[PlacedVertex] {
        &self.vertices
    }

    /// Looks up a placed vertex by person identifier.
    pub fn vertex(&self, id: &str) -> Option<&PlacedVertex> {
        self.vertices.iter().find(|vertex| vertex.id() == id)
    }

    /// Edge routes in the order the edges were built.
    pub fn edges(&self) -> &[EdgeRoute] {
        &self.edges
    }

    /// Build diagnostics followed by cycle-breaking diagnostics.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Union of every vertex box; empty for an empty layout.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn rank_count(&self) -> usize {
        self.rank_count
    }

    /// Remaining crossings between adjacent ranks.
    pub fn crossings(&self) -> usize {
        self.crossings
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// Runs the layout pipeline with a fixed configuration.
///
/// The engine keeps no state between runs; every call to
/// [`Engine::calculate`] lays out the graph from scratch.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: LayoutConfig,
}

impl Engine {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lays out `graph`.
    ///
    /// # Errors
    ///
    /// Returns [`LineageError::Config`] if the layout configuration is
    /// invalid, or [`LineageError::Layout`] on an internal invariant failure.
    pub fn calculate(&self, graph: &FamilyGraph) -> Result<FamilyLayout, LineageError> {
        self.config.validate().map_err(LineageError::Config)?;

        info!(
            vertices = graph.vertex_count(),
            edges = graph.edge_count();
            "Calculating family layout"
        );

        let ranking = assign_ranks(graph, self.config.tighten_roots())?;
        let ordering = order_vertices(
            graph,
            &ranking,
            self.config.sweep_passes(),
            self.config.affinity_tolerance(),
        );
        let placed = place(graph, &ranking, &ordering, &self.config);
        let edges = route_edges(graph, &ranking, &placed, &self.config);

        let bounds = placed
            .iter()
            .map(PlacedVertex::bounds)
            .reduce(|acc, bounds| acc.merge(&bounds))
            .unwrap_or_default();

        let mut vertices = placed;
        vertices.sort_by_key(|vertex| (vertex.rank(), vertex.order()));

        let diagnostics: Vec<Diagnostic> = graph
            .diagnostics()
            .iter()
            .chain(ranking.diagnostics())
            .cloned()
            .collect();

        debug!(
            rank_count = ranking.rank_count(),
            crossings = ordering.crossings(),
            diagnostics = diagnostics.len(),
            bounds:?;
            "Layout calculated"
        );

        Ok(FamilyLayout {
            vertices,
            edges,
            diagnostics,
            bounds,
            rank_count: ranking.rank_count(),
            crossings: ordering.crossings(),
        })
    }
}
