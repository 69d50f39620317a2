//! Entity-relation connector
//!
//! Leaves both terminals horizontally with a fixed-length stub, then joins
//! the stubs with at most two bends. Which side each stub leaves from is
//! decided by the port's relative placement, the endpoints' order, or an
//! explicit west/east port constraint.

use crate::direction::DirectionSet;
use crate::geom::{Point, Rect};
use crate::style::ENTITY_SEGMENT;

use super::{dedup_consecutive, FixedTerminal, RouteRequest, TerminalRef};

/// Route an entity-relation edge, appending the waypoints to `result`
pub fn route(req: &RouteRequest, result: &mut Vec<Point>) {
    let scale = if req.scale > 0.0 { req.scale } else { 1.0 };
    let segment = req.style.segment.unwrap_or(ENTITY_SEGMENT) * scale;

    let source_state = req.source.and_then(TerminalRef::as_fixed);
    let target_state = req.target.and_then(TerminalRef::as_fixed);

    let p0 = req.end_point(true);
    let pe = req.end_point(false);

    let mut is_source_left = false;

    if let Some(s) = source_state {
        if let Some((rx, _)) = s.relative_position {
            is_source_left = rx <= 0.5;
        } else if let Some(t) = target_state {
            let target_x = pe.map_or(t.bounds.right(), |p| p.x);
            let source_x = p0.map_or(s.bounds.x, |p| p.x);
            is_source_left = target_x < source_x;
        }
    }

    let source = match (p0, source_state) {
        (Some(p), _) => FixedTerminal::new(Rect::at_point(p)),
        (None, Some(s)) => {
            if let Some(side) = constrained_side(s.constraint) {
                is_source_left = side;
            }
            s.clone()
        }
        (None, None) => return,
    };

    let mut is_target_left = true;

    if let Some(t) = target_state {
        if let Some((rx, _)) = t.relative_position {
            is_target_left = rx <= 0.5;
        } else {
            let source_x = p0.map_or(source.bounds.right(), |p| p.x);
            let target_x = pe.map_or(t.bounds.x, |p| p.x);
            is_target_left = source_x < target_x;
        }
    }

    let target = match (pe, target_state) {
        (Some(p), _) => FixedTerminal::new(Rect::at_point(p)),
        (None, Some(t)) => {
            if let Some(side) = constrained_side(t.constraint) {
                is_target_left = side;
            }
            t.clone()
        }
        (None, None) => return,
    };

    let x0 = if is_source_left {
        source.bounds.x
    } else {
        source.bounds.right()
    };
    let y0 = source.routing_center_y();

    let xe = if is_target_left {
        target.bounds.x
    } else {
        target.bounds.right()
    };
    let ye = target.routing_center_y();

    let dx = if is_source_left { -segment } else { segment };
    let dep = Point::new(x0 + dx, y0);

    let dx = if is_target_left { -segment } else { segment };
    let arr = Point::new(xe + dx, ye);

    if is_source_left == is_target_left {
        // Both stubs leave on the same side; wrap around the outer edge
        let x = if is_source_left {
            x0.min(xe) - segment
        } else {
            x0.max(xe) + segment
        };

        result.push(Point::new(x, y0));
        result.push(Point::new(x, ye));
    } else if (dep.x < arr.x) == is_source_left {
        // The stubs point at each other; bend twice at mid height
        let mid_y = y0 + (ye - y0) / 2.0;

        result.push(dep);
        result.push(Point::new(dep.x, mid_y));
        result.push(Point::new(arr.x, mid_y));
        result.push(arr);
    } else {
        result.push(dep);
        result.push(arr);
    }

    dedup_consecutive(result);
}

/// An explicit single west/east preference from a port constraint.
/// An unconstrained mask or a symmetric west+east mask expresses none.
fn constrained_side(constraint: DirectionSet) -> Option<bool> {
    let bits = constraint.bits();
    let west_east = DirectionSet::WEST.0 | DirectionSet::EAST.0;

    if bits == DirectionSet::NONE.0 || bits == west_east || bits == DirectionSet::ALL.0 {
        return None;
    }
    Some(constraint == DirectionSet::WEST)
}
