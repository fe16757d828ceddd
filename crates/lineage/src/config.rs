//! Configuration types for Lineage layout and rendering.
//!
//! This module provides configuration structures that control how family
//! trees are laid out and styled. All types implement [`serde::Deserialize`]
//! for loading from external sources; every field is optional and falls back
//! to its default.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining layout and style settings.
//! - [`LayoutConfig`] - Node dimensions, spacing, and ordering heuristics.
//! - [`StyleConfig`] - Colors used by the SVG exporter.
//!
//! # Example
//!
//! ```
//! # use lineage::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.layout().node_width(), 250.0);
//! assert!(config.style().edge_color().is_ok());
//! ```

use serde::Deserialize;

use lineage_core::color::Color;

/// Upper bound on crossing-reduction passes.
pub const MAX_SWEEP_PASSES: usize = 32;

/// Top-level application configuration combining layout and style settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified layout and style configurations.
    pub fn new(layout: LayoutConfig, style: StyleConfig) -> Self {
        Self { layout, style }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }
}

/// Vertical orientation of the generations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankDirection {
    /// Oldest generation at the top.
    #[default]
    TopToBottom,

    /// Oldest generation at the bottom.
    BottomToTop,
}

/// Layout settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    node_width: f32,
    node_height: f32,
    node_gap: f32,
    rank_gap: f32,
    sweep_passes: usize,
    affinity_tolerance: usize,
    tighten_roots: bool,
    direction: RankDirection,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 250.0,
            node_height: 100.0,
            node_gap: 50.0,
            rank_gap: 80.0,
            sweep_passes: 8,
            affinity_tolerance: 0,
            tighten_roots: false,
            direction: RankDirection::TopToBottom,
        }
    }
}

impl LayoutConfig {
    /// Width of every person box.
    pub fn node_width(&self) -> f32 {
        self.node_width
    }

    /// Height of every person box.
    pub fn node_height(&self) -> f32 {
        self.node_height
    }

    /// Horizontal space between neighbouring boxes of one generation.
    pub fn node_gap(&self) -> f32 {
        self.node_gap
    }

    /// Vertical space between generations.
    pub fn rank_gap(&self) -> f32 {
        self.rank_gap
    }

    /// Number of crossing-reduction passes, clamped to `1..=MAX_SWEEP_PASSES`.
    pub fn sweep_passes(&self) -> usize {
        self.sweep_passes.clamp(1, MAX_SWEEP_PASSES)
    }

    /// Extra crossings allowed when pulling spouses next to each other.
    pub fn affinity_tolerance(&self) -> usize {
        self.affinity_tolerance
    }

    /// Whether parentless ancestors are moved down next to their children.
    pub fn tighten_roots(&self) -> bool {
        self.tighten_roots
    }

    pub fn direction(&self) -> RankDirection {
        self.direction
    }

    /// Horizontal distance between the left edges of neighbouring boxes.
    pub fn horizontal_step(&self) -> f32 {
        self.node_width + self.node_gap
    }

    /// Vertical distance between the top edges of consecutive generations.
    pub fn vertical_step(&self) -> f32 {
        self.node_height + self.rank_gap
    }

    pub fn with_node_size(mut self, width: f32, height: f32) -> Self {
        self.node_width = width;
        self.node_height = height;
        self
    }

    pub fn with_node_gap(mut self, gap: f32) -> Self {
        self.node_gap = gap;
        self
    }

    pub fn with_rank_gap(mut self, gap: f32) -> Self {
        self.rank_gap = gap;
        self
    }

    pub fn with_sweep_passes(mut self, passes: usize) -> Self {
        self.sweep_passes = passes;
        self
    }

    pub fn with_affinity_tolerance(mut self, tolerance: usize) -> Self {
        self.affinity_tolerance = tolerance;
        self
    }

    pub fn with_tighten_roots(mut self, tighten: bool) -> Self {
        self.tighten_roots = tighten;
        self
    }

    pub fn with_direction(mut self, direction: RankDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Checks that the dimensions describe a drawable layout.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first offending field.
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("node_width", self.node_width),
            ("node_height", self.node_height),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("{name} must be a positive number, got {value}"));
            }
        }
        for (name, value) in [("node_gap", self.node_gap), ("rank_gap", self.rank_gap)] {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{name} must be a non-negative number, got {value}"));
            }
        }
        Ok(())
    }
}

/// Visual styling configuration for rendered trees.
///
/// Colors are CSS color strings. Fields that are not set fall back to the
/// defaults documented on each accessor.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    background_color: Option<String>,
    node_fill: Option<String>,
    node_stroke: Option<String>,
    text_color: Option<String>,
    edge_color: Option<String>,
    unranked_edge_color: Option<String>,
}

impl StyleConfig {
    /// Returns the parsed background [`Color`], or `None` for a transparent background.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        self.background_color
            .as_ref()
            .map(|color| Color::new(color))
            .transpose()
            .map_err(|err| format!("Invalid background color in config: {err}"))
    }

    /// Fill of person boxes. Defaults to white.
    pub fn node_fill(&self) -> Result<Color, String> {
        parse_or(self.node_fill.as_deref(), "white", "node fill")
    }

    /// Outline of person boxes. Defaults to `#10b981`.
    pub fn node_stroke(&self) -> Result<Color, String> {
        parse_or(self.node_stroke.as_deref(), "#10b981", "node stroke")
    }

    /// Text color. Defaults to `#1f2937`.
    pub fn text_color(&self) -> Result<Color, String> {
        parse_or(self.text_color.as_deref(), "#1f2937", "text color")
    }

    /// Parent/child connector color. Defaults to `#059669`.
    pub fn edge_color(&self) -> Result<Color, String> {
        parse_or(self.edge_color.as_deref(), "#059669", "edge color")
    }

    /// Connector color for edges excluded from ranking. Defaults to `#dc2626`.
    pub fn unranked_edge_color(&self) -> Result<Color, String> {
        parse_or(
            self.unranked_edge_color.as_deref(),
            "#dc2626",
            "unranked edge color",
        )
    }
}

fn parse_or(value: Option<&str>, default: &str, what: &str) -> Result<Color, String> {
    Color::new(value.unwrap_or(default)).map_err(|err| format!("Invalid {what} in config: {err}"))
}
