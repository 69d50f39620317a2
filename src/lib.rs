//! Orthogonal edge routing for diagram layouts
//!
//! This library computes the intermediate waypoints of edges between
//! diagram terminals: orthogonal routes with jetties and clearance,
//! hint-following segment routes, single-bend elbows, entity-relation
//! stubs and self-reference loops.
//!
//! Routing never fails: an edge that cannot be routed simply contributes
//! no waypoints.
//!
//! # Example
//!
//! ```rust
//! use ortho_router::{route, EdgeStyle, EdgeStyleKind, Rect, RouteRequest, TerminalRef};
//!
//! let style = EdgeStyle::default();
//! let source = TerminalRef::fixed(Rect::new(0.0, 0.0, 100.0, 40.0));
//! let target = TerminalRef::fixed(Rect::new(300.0, 200.0, 100.0, 40.0));
//! let request = RouteRequest::new(&style, 1.0, Some(&source), Some(&target), &[]);
//!
//! let mut waypoints = Vec::new();
//! route(EdgeStyleKind::Orthogonal, &request, &mut waypoints);
//! assert!(!waypoints.is_empty());
//! ```

pub mod direction;
pub mod geom;
pub mod route;
pub mod style;

pub use direction::{Direction, DirectionSet};
pub use geom::{Point, Rect};
pub use route::{
    dedup_consecutive, route, EdgeStyleKind, FixedTerminal, RouteRequest, TerminalRef,
};
pub use style::{EdgeStyle, ElbowOrientation, JettySize, Marker, StyleError};
