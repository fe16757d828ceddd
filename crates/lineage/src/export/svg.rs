//! SVG rendering of family layouts.

use std::io::Write;

use log::debug;
use svg::{self, Node, node::element as svg_element};

use lineage_core::{
    color::Color,
    geometry::{Bounds, Point, Size},
};

use super::{Error, Exporter};
use crate::{
    config::StyleConfig,
    layout::{EdgeRoute, FamilyLayout, PlacedVertex},
};

/// Space between the layout bounds and the document edge.
const MARGIN: f32 = 20.0;
const CORNER_RADIUS: f32 = 8.0;
const NAME_FONT_SIZE: f32 = 16.0;
const LIFESPAN_FONT_SIZE: f32 = 12.0;
const FONT_FAMILY: &str = "sans-serif";

/// Resolved colors for one render.
#[derive(Debug, Clone)]
struct Palette {
    background: Option<Color>,
    node_fill: Color,
    node_stroke: Color,
    text: Color,
    edge: Color,
    unranked_edge: Color,
}

impl Palette {
    fn from_style(style: &StyleConfig) -> Result<Self, Error> {
        Ok(Self {
            background: style.background_color().map_err(Error::Render)?,
            node_fill: style.node_fill().map_err(Error::Render)?,
            node_stroke: style.node_stroke().map_err(Error::Render)?,
            text: style.text_color().map_err(Error::Render)?,
            edge: style.edge_color().map_err(Error::Render)?,
            unranked_edge: style.unranked_edge_color().map_err(Error::Render)?,
        })
    }
}

/// Builder for [`Svg`] exporters.
pub struct SvgBuilder<W: Write> {
    writer: W,
    style: StyleConfig,
}

impl<W: Write> SvgBuilder<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            style: StyleConfig::default(),
        }
    }

    pub fn with_style(mut self, style: &StyleConfig) -> Self {
        self.style = style.clone();
        self
    }

    /// Resolves the style colors.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if a configured color cannot be parsed.
    pub fn build(self) -> Result<Svg<W>, Error> {
        Ok(Svg {
            writer: self.writer,
            palette: Palette::from_style(&self.style)?,
        })
    }
}

/// SVG exporter writing one document per exported layout.
pub struct Svg<W: Write> {
    writer: W,
    palette: Palette,
}

impl<W: Write> Svg<W> {
    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Renders `layout` to an SVG document.
    pub fn render_layout(&self, layout: &FamilyLayout) -> svg::Document {
        let content_bounds = layout.bounds();
        let svg_size = Size::new(
            content_bounds.width() + 2.0 * MARGIN,
            content_bounds.height() + 2.0 * MARGIN,
        );

        let doc = svg::Document::new()
            .set(
                "viewBox",
                format!("0 0 {} {}", svg_size.width(), svg_size.height()),
            )
            .set("width", svg_size.width())
            .set("height", svg_size.height());

        let mut doc = self.add_background(doc, svg_size);
        doc = doc.add(self.marker_definitions());

        let mut main_group = svg_element::Group::new().set(
            "transform",
            format!(
                "translate({}, {})",
                MARGIN - content_bounds.min_x(),
                MARGIN - content_bounds.min_y()
            ),
        );

        // Edges go first so the boxes cover their ends.
        for edge in layout.edges() {
            main_group = main_group.add(self.render_edge(edge));
        }
        for vertex in layout.vertices() {
            main_group = main_group.add(self.render_vertex(vertex));
        }

        doc.add(main_group)
    }

    fn add_background(&self, doc: svg::Document, size: Size) -> svg::Document {
        let Some(color) = self.palette.background else {
            return doc;
        };
        doc.add(
            svg_element::Rectangle::new()
                .set("x", 0)
                .set("y", 0)
                .set("width", size.width())
                .set("height", size.height())
                .set("fill", color),
        )
    }

    fn marker_id(color: Color) -> String {
        format!("arrow-{}", color.to_id_safe_string())
    }

    fn marker_definitions(&self) -> svg_element::Definitions {
        let mut defs = svg_element::Definitions::new();
        let mut colors = vec![self.palette.edge];
        if self.palette.unranked_edge != self.palette.edge {
            colors.push(self.palette.unranked_edge);
        }
        for color in colors {
            defs.append(
                svg_element::Marker::new()
                    .set("id", Self::marker_id(color))
                    .set("viewBox", "0 0 10 10")
                    .set("refX", 9)
                    .set("refY", 5)
                    .set("markerWidth", 6)
                    .set("markerHeight", 6)
                    .set("orient", "auto")
                    .add(
                        svg_element::Path::new()
                            .set("d", "M 0 0 L 10 5 L 0 10 z")
                            .set("fill", color),
                    ),
            );
        }
        defs
    }

    fn render_edge(&self, edge: &EdgeRoute) -> svg_element::Path {
        let color = if edge.is_unranked() {
            self.palette.unranked_edge
        } else {
            self.palette.edge
        };

        let mut path = svg_element::Path::new()
            .set("id", format!("edge-{}", edge.id()))
            .set("d", path_data(edge.waypoints()))
            .set("fill", "none")
            .set("stroke", color)
            .set("stroke-width", 2)
            .set("marker-end", format!("url(#{})", Self::marker_id(color)));
        if edge.is_unranked() {
            path = path.set("stroke-dasharray", "6 4");
        }
        path
    }

    fn render_vertex(&self, vertex: &PlacedVertex) -> svg_element::Group {
        let bounds: Bounds = vertex.bounds();
        let center = bounds.center();

        let rect = svg_element::Rectangle::new()
            .set("x", bounds.min_x())
            .set("y", bounds.min_y())
            .set("width", bounds.width())
            .set("height", bounds.height())
            .set("rx", CORNER_RADIUS)
            .set("fill", self.palette.node_fill)
            .set("stroke", self.palette.node_stroke)
            .set("stroke-width", 2);

        let name_y = match vertex.lifespan() {
            Some(_) => center.y() - LIFESPAN_FONT_SIZE / 2.0,
            None => center.y(),
        };

        let mut group = svg_element::Group::new()
            .set("id", format!("person-{}", vertex.id()))
            .add(rect)
            .add(self.text(vertex.label(), Point::new(center.x(), name_y), NAME_FONT_SIZE));

        if let Some(lifespan) = vertex.lifespan() {
            let lifespan_y = center.y() + NAME_FONT_SIZE / 2.0 + 2.0;
            group = group.add(
                self.text(lifespan, Point::new(center.x(), lifespan_y), LIFESPAN_FONT_SIZE)
                    .set("fill-opacity", 0.7),
            );
        }

        group
    }

    fn text(&self, content: &str, at: Point, font_size: f32) -> svg_element::Text {
        svg_element::Text::new(content)
            .set("x", at.x())
            .set("y", at.y())
            .set("text-anchor", "middle")
            .set("dominant-baseline", "middle")
            .set("font-family", FONT_FAMILY)
            .set("font-size", font_size)
            .set("fill", self.palette.text)
    }
}

/// SVG path data through `points`.
fn path_data(points: &[Point]) -> String {
    points
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let command = if i == 0 { 'M' } else { 'L' };
            format!("{command} {} {}", point.x(), point.y())
        })
        .collect::<Vec<_>>()
        .join(" ")
}

impl<W: Write> Exporter for Svg<W> {
    fn export_layout(&mut self, layout: &FamilyLayout) -> Result<(), Error> {
        let doc = self.render_layout(layout);
        svg::write(&mut self.writer, &doc)?;
        self.writer.flush()?;
        debug!(
            vertices = layout.vertices().len(),
            edges = layout.edges().len();
            "Exported layout as SVG"
        );
        Ok(())
    }
}
