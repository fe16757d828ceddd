//! Lineage - genealogy graphs and layered family tree layout.
//!
//! Turns a snapshot of person records, each listing parent and spouse
//! identifiers, into a generation-banded diagram: parents above children,
//! few crossing lines, spouses side by side and no overlapping boxes.
//! Inconsistent records (unknown parents, ancestry cycles) are repaired
//! locally and reported as [`diagnostic::Diagnostic`]s; only duplicate
//! identifiers fail a run.

pub mod config;
pub mod diagnostic;
pub mod export;
pub mod layout;
pub mod structure;

mod error;

pub use lineage_core::{color, geometry, identifier, person};

pub use error::LineageError;

use log::{debug, info, trace};

use config::AppConfig;
use export::Exporter;
use layout::{Engine, FamilyLayout};
use person::Person;
use structure::FamilyGraph;

/// Builder for laying out and rendering family trees.
///
/// # Examples
///
/// ```rust
/// use lineage::{TreeBuilder, config::AppConfig};
///
/// let json = r#"[
///     {"id": "A"},
///     {"id": "B", "parent_ids": ["A"]},
///     {"id": "C", "parent_ids": ["A"]},
///     {"id": "D", "parent_ids": ["B", "C"]}
/// ]"#;
///
/// let builder = TreeBuilder::new(AppConfig::default());
/// let persons = builder.parse(json).expect("valid records");
/// let layout = builder.layout(&persons).expect("unique identifiers");
///
/// assert_eq!(layout.vertex("D").map(|v| v.rank()), Some(2));
///
/// let svg = builder.render_svg(&layout).expect("default style renders");
/// assert!(svg.starts_with("<svg"));
/// ```
#[derive(Default)]
pub struct TreeBuilder {
    config: AppConfig,
}

impl TreeBuilder {
    /// Create a new tree builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse a JSON array of person records.
    ///
    /// Records use the snake_case field names of [`Person`]; only `id` is
    /// required and `null` relationship lists are read as empty.
    ///
    /// # Errors
    ///
    /// Returns [`LineageError::Input`] if the text is not a JSON array of
    /// person records.
    pub fn parse(&self, source: &str) -> Result<Vec<Person>, LineageError> {
        info!("Parsing person records");

        let persons: Vec<Person> = serde_json::from_str(source)
            .map_err(|err| LineageError::Input(format!("malformed person records: {err}")))?;

        debug!(persons_count = persons.len(); "Person records parsed");
        trace!(persons:?; "Parsed records");

        Ok(persons)
    }

    /// Build the family graph for `persons` and lay it out.
    ///
    /// # Errors
    ///
    /// Returns [`LineageError::DuplicateIdentifier`] if two records share an
    /// identifier and [`LineageError::Config`] for an invalid layout
    /// configuration.
    pub fn layout(&self, persons: &[Person]) -> Result<FamilyLayout, LineageError> {
        info!(persons_count = persons.len(); "Building family graph");
        let graph = FamilyGraph::build(persons)?;

        let engine = Engine::new(self.config.layout().clone());
        let layout = engine.calculate(&graph)?;

        info!(
            ranks = layout.rank_count(),
            crossings = layout.crossings(),
            diagnostics = layout.diagnostics().len();
            "Layout calculated"
        );
        Ok(layout)
    }

    /// Render a finished layout to an SVG string.
    ///
    /// # Errors
    ///
    /// Returns [`LineageError::Export`] if a configured style color is
    /// invalid.
    pub fn render_svg(&self, layout: &FamilyLayout) -> Result<String, LineageError> {
        let mut exporter = export::svg::SvgBuilder::new(Vec::new())
            .with_style(self.config.style())
            .build()?;
        exporter.export_layout(layout)?;

        let svg = String::from_utf8(exporter.into_inner())
            .map_err(|err| export::Error::Render(err.to_string()))?;
        info!("SVG rendered successfully");
        Ok(svg)
    }

    /// Render a finished layout to a pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`LineageError::Export`] if serialization fails.
    pub fn render_json(&self, layout: &FamilyLayout) -> Result<String, LineageError> {
        let mut exporter = export::json::JsonExporter::new(Vec::new());
        exporter.export_layout(layout)?;

        let json = String::from_utf8(exporter.into_inner())
            .map_err(|err| export::Error::Render(err.to_string()))?;
        info!("JSON rendered successfully");
        Ok(json)
    }
}
