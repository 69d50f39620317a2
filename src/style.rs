//! Typed edge-style configuration
//!
//! The reference model carried edge styling as loose key/value pairs; this
//! module replaces those lookups with a typed struct that deserializes from
//! TOML and provides the same defaults.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::direction::Direction;

/// Default segment length for entity-relation edges
pub const ENTITY_SEGMENT: f64 = 30.0;

/// Default segment length for loop edges (the reference used the grid size)
pub const LOOP_SEGMENT: f64 = 10.0;

/// Default marker size used when a jetty is sized automatically from an arrow
pub const DEFAULT_MARKER_SIZE: f64 = 6.0;

/// Errors that can occur when parsing style values
#[derive(Debug, Error)]
pub enum StyleError {
    #[error("unknown direction '{0}'")]
    UnknownDirection(String),

    #[error("unknown elbow orientation '{0}' (expected 'horizontal' or 'vertical')")]
    UnknownElbow(String),

    #[error("unknown edge style '{0}'")]
    UnknownEdgeStyle(String),

    #[error("failed to read style file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse style TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Bend orientation override for the elbow connector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElbowOrientation {
    Horizontal,
    Vertical,
}

impl FromStr for ElbowOrientation {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "horizontal" => Ok(ElbowOrientation::Horizontal),
            "vertical" => Ok(ElbowOrientation::Vertical),
            _ => Err(StyleError::UnknownElbow(s.to_string())),
        }
    }
}

/// Jetty length: a fixed value, or derived from the arrow marker
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JettySize {
    /// Compute from the end's arrow marker size
    Auto,
    /// Fixed length in unscaled units
    Fixed(f64),
}

impl Serialize for JettySize {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match self {
            JettySize::Auto => s.serialize_str("auto"),
            JettySize::Fixed(v) => s.serialize_f64(*v),
        }
    }
}

impl<'de> Deserialize<'de> for JettySize {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Num(f64),
            Word(String),
        }

        match Raw::deserialize(d)? {
            Raw::Num(n) => Ok(JettySize::Fixed(n)),
            Raw::Word(w) if w == "auto" => Ok(JettySize::Auto),
            Raw::Word(w) => Err(serde::de::Error::custom(format!(
                "unknown jetty size '{w}' (expected a number or 'auto')"
            ))),
        }
    }
}

/// Arrow marker on one end of the edge, as far as routing cares: its size
/// feeds automatic jetty computation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Marker {
    pub enabled: bool,
    pub size: Option<f64>,
}

/// Styling inputs consumed by the routing strategies.
///
/// Every field is optional; each strategy applies the reference defaults at
/// its point of use.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct EdgeStyle {
    /// Length of the straight run leaving a terminal (entity/loop styles)
    pub segment: Option<f64>,

    /// Jetty length for both ends of an orthogonal edge
    pub jetty_size: Option<JettySize>,

    /// Source-end jetty override
    pub source_jetty_size: Option<JettySize>,

    /// Target-end jetty override
    pub target_jetty_size: Option<JettySize>,

    /// Bend orientation override for the elbow connector
    pub elbow: Option<ElbowOrientation>,

    /// Side on which a loop edge leaves its terminal
    pub direction: Option<Direction>,

    /// Start arrow marker (auto jetty sizing input)
    pub start_marker: Marker,

    /// End arrow marker (auto jetty sizing input)
    pub end_marker: Marker,
}

impl EdgeStyle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a style from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, StyleError> {
        Ok(toml::from_str(content)?)
    }

    /// Load a style from a TOML file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, StyleError> {
        Self::from_toml(&std::fs::read_to_string(path)?)
    }

    /// Set the segment length
    pub fn with_segment(mut self, segment: f64) -> Self {
        self.segment = Some(segment);
        self
    }

    /// Set the jetty size for both ends
    pub fn with_jetty_size(mut self, size: JettySize) -> Self {
        self.jetty_size = Some(size);
        self
    }

    /// Set the elbow orientation override
    pub fn with_elbow(mut self, elbow: ElbowOrientation) -> Self {
        self.elbow = Some(elbow);
        self
    }

    /// Set the loop exit direction
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_style_is_empty() {
        let style = EdgeStyle::default();
        assert_eq!(style.segment, None);
        assert_eq!(style.jetty_size, None);
        assert_eq!(style.elbow, None);
        assert!(!style.start_marker.enabled);
    }

    #[test]
    fn test_builder() {
        let style = EdgeStyle::new()
            .with_segment(40.0)
            .with_elbow(ElbowOrientation::Vertical)
            .with_direction(Direction::North);
        assert_eq!(style.segment, Some(40.0));
        assert_eq!(style.elbow, Some(ElbowOrientation::Vertical));
        assert_eq!(style.direction, Some(Direction::North));
    }

    #[test]
    fn test_from_toml() {
        let style = EdgeStyle::from_toml(
            r#"
            segment = 20.0
            jetty-size = "auto"
            source-jetty-size = 15.0
            elbow = "vertical"
            direction = "south"

            [start-marker]
            enabled = true
            size = 8.0
            "#,
        )
        .unwrap();

        assert_eq!(style.segment, Some(20.0));
        assert_eq!(style.jetty_size, Some(JettySize::Auto));
        assert_eq!(style.source_jetty_size, Some(JettySize::Fixed(15.0)));
        assert_eq!(style.elbow, Some(ElbowOrientation::Vertical));
        assert_eq!(style.direction, Some(Direction::South));
        assert!(style.start_marker.enabled);
        assert_eq!(style.start_marker.size, Some(8.0));
    }

    #[test]
    fn test_from_toml_rejects_bad_elbow() {
        assert!(EdgeStyle::from_toml("elbow = \"diagonal\"").is_err());
    }

    #[test]
    fn test_elbow_from_str() {
        assert_eq!(
            "horizontal".parse::<ElbowOrientation>().unwrap(),
            ElbowOrientation::Horizontal
        );
        assert!("diagonal".parse::<ElbowOrientation>().is_err());
    }
}
