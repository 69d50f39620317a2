//! Edge routing strategies
//!
//! Each strategy computes the intermediate waypoints of an edge between two
//! terminals and appends them to a caller-owned result vector. Routing is
//! pure and synchronous; unroutable input appends nothing.

pub mod elbow;
pub mod entity;
pub mod ortho;
pub mod patterns;
pub mod segment;
pub mod selfloop;

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::direction::DirectionSet;
use crate::geom::{Point, Rect};
use crate::style::{EdgeStyle, JettySize, StyleError, DEFAULT_MARKER_SIZE};

/// Default jetty length for orthogonal edges
pub const ORTH_BUFFER: f64 = 10.0;

/// Whether the orthogonal router hands edges with waypoint hints to the
/// segment connector
pub const ORTH_POINTS_FALLBACK: bool = true;

/// A terminal with known geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FixedTerminal {
    /// Bounding rectangle in scaled space
    pub bounds: Rect,

    /// Rotation in degrees; the router axis-aligns the bounds itself
    pub rotation: f64,

    /// Allowed connection directions for this end
    pub constraint: DirectionSet,

    /// Explicit fixed connection point on the terminal, if any
    pub anchor: Option<Point>,

    /// A port's relative placement on its parent (0..1 per axis)
    pub relative_position: Option<(f64, f64)>,

    /// Fractional offsets added to the center for routing
    pub routing_center: (f64, f64),

    /// True when the terminal is itself an edge
    pub is_edge: bool,
}

impl Default for FixedTerminal {
    fn default() -> Self {
        Self {
            bounds: Rect::default(),
            rotation: 0.0,
            constraint: DirectionSet::ALL,
            anchor: None,
            relative_position: None,
            routing_center: (0.0, 0.0),
            is_edge: false,
        }
    }
}

impl FixedTerminal {
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            ..Self::default()
        }
    }

    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn with_constraint(mut self, constraint: DirectionSet) -> Self {
        self.constraint = constraint;
        self
    }

    pub fn with_anchor(mut self, anchor: Point) -> Self {
        self.anchor = Some(anchor);
        self
    }

    pub fn with_relative_position(mut self, x: f64, y: f64) -> Self {
        self.relative_position = Some((x, y));
        self
    }

    pub fn with_routing_center(mut self, x: f64, y: f64) -> Self {
        self.routing_center = (x, y);
        self
    }

    pub fn as_edge(mut self) -> Self {
        self.is_edge = true;
        self
    }

    /// Horizontal routing center in the terminal's own space
    pub fn routing_center_x(&self) -> f64 {
        self.bounds.center().x + self.routing_center.0 * self.bounds.width
    }

    /// Vertical routing center in the terminal's own space
    pub fn routing_center_y(&self) -> f64 {
        self.bounds.center().y + self.routing_center.1 * self.bounds.height
    }
}

/// One end of an edge: a terminal with geometry, or a bare endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TerminalRef {
    Fixed(FixedTerminal),
    Floating(Point),
}

impl TerminalRef {
    pub fn fixed(bounds: Rect) -> Self {
        TerminalRef::Fixed(FixedTerminal::new(bounds))
    }

    pub fn floating(x: f64, y: f64) -> Self {
        TerminalRef::Floating(Point::new(x, y))
    }

    /// The terminal's geometry, if it has any
    pub fn as_fixed(&self) -> Option<&FixedTerminal> {
        match self {
            TerminalRef::Fixed(t) => Some(t),
            TerminalRef::Floating(_) => None,
        }
    }

    /// The explicit endpoint for this end: the floating point, or a fixed
    /// terminal's anchor
    pub fn end_point(&self) -> Option<Point> {
        match self {
            TerminalRef::Fixed(t) => t.anchor,
            TerminalRef::Floating(p) => Some(*p),
        }
    }
}

/// Immutable inputs for one routing call
#[derive(Debug, Clone, Copy)]
pub struct RouteRequest<'a> {
    pub style: &'a EdgeStyle,
    pub scale: f64,
    pub source: Option<&'a TerminalRef>,
    pub target: Option<&'a TerminalRef>,
    pub hints: &'a [Point],
}

impl<'a> RouteRequest<'a> {
    pub fn new(
        style: &'a EdgeStyle,
        scale: f64,
        source: Option<&'a TerminalRef>,
        target: Option<&'a TerminalRef>,
        hints: &'a [Point],
    ) -> Self {
        Self {
            style,
            scale,
            source,
            target,
            hints,
        }
    }

    /// Explicit endpoint on the given end, if any
    pub(crate) fn end_point(&self, is_source: bool) -> Option<Point> {
        let term = if is_source { self.source } else { self.target };
        term.and_then(TerminalRef::end_point)
    }

    /// The effective state of one end for the simple strategies: an explicit
    /// endpoint collapses the end to a zero-sized rectangle at that point.
    pub(crate) fn simple_end(&self, is_source: bool) -> Option<FixedTerminal> {
        let term = if is_source { self.source } else { self.target }?;

        if let Some(p) = term.end_point() {
            return Some(FixedTerminal::new(Rect::at_point(p)));
        }
        term.as_fixed().cloned()
    }
}

/// The closed set of routing strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeStyleKind {
    Elbow,
    SideToSide,
    TopToBottom,
    EntityRelation,
    Loop,
    Segment,
    Orthogonal,
}

impl FromStr for EdgeStyleKind {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "elbow" => Ok(EdgeStyleKind::Elbow),
            "side-to-side" => Ok(EdgeStyleKind::SideToSide),
            "top-to-bottom" => Ok(EdgeStyleKind::TopToBottom),
            "entity-relation" => Ok(EdgeStyleKind::EntityRelation),
            "loop" => Ok(EdgeStyleKind::Loop),
            "segment" => Ok(EdgeStyleKind::Segment),
            "orthogonal" => Ok(EdgeStyleKind::Orthogonal),
            _ => Err(StyleError::UnknownEdgeStyle(s.to_string())),
        }
    }
}

/// Route one edge with the given strategy, appending the intermediate
/// waypoints to `result`
pub fn route(kind: EdgeStyleKind, request: &RouteRequest, result: &mut Vec<Point>) {
    match kind {
        EdgeStyleKind::Elbow => elbow::route(request, result),
        EdgeStyleKind::SideToSide => elbow::side_to_side(request, result),
        EdgeStyleKind::TopToBottom => elbow::top_to_bottom(request, result),
        EdgeStyleKind::EntityRelation => entity::route(request, result),
        EdgeStyleKind::Loop => selfloop::route(request, result),
        EdgeStyleKind::Segment => segment::route(request, result),
        EdgeStyleKind::Orthogonal => ortho::route(request, result),
    }
}

/// Jetty length for one end of an orthogonal edge, in unscaled units
pub(crate) fn jetty_size(style: &EdgeStyle, is_source: bool) -> f64 {
    let end_override = if is_source {
        style.source_jetty_size
    } else {
        style.target_jetty_size
    };

    match end_override.or(style.jetty_size) {
        None => ORTH_BUFFER,
        Some(JettySize::Fixed(v)) => v,
        Some(JettySize::Auto) => {
            let marker = if is_source {
                &style.start_marker
            } else {
                &style.end_marker
            };

            if marker.enabled {
                let size = marker.size.unwrap_or(DEFAULT_MARKER_SIZE);
                2f64.max(((size + ORTH_BUFFER) / ORTH_BUFFER).ceil()) * ORTH_BUFFER
            } else {
                2.0 * ORTH_BUFFER
            }
        }
    }
}

/// Remove consecutive duplicate points in place. Applying this to an
/// already-pruned path changes nothing.
pub fn dedup_consecutive(points: &mut Vec<Point>) {
    let mut index = 1;
    while index < points.len() {
        if points[index - 1] == points[index] {
            points.remove(index);
        } else {
            index += 1;
        }
    }
}
