//! Self-reference loop connector
//!
//! Routes an edge from a terminal back to itself as a rectangular bulge on
//! one side, sized by the segment style and optionally dragged by a hint.

use crate::direction::Direction;
use crate::geom::Point;
use crate::style::LOOP_SEGMENT;

use super::{dedup_consecutive, RouteRequest, TerminalRef};

/// Route a loop edge, appending the waypoints to `result`
pub fn route(req: &RouteRequest, result: &mut Vec<Point>) {
    let scale = if req.scale > 0.0 { req.scale } else { 1.0 };

    let p0 = req.end_point(true);
    let pe = req.end_point(false);

    // Both endpoints fixed: the hints already describe the loop
    if p0.is_some() && pe.is_some() {
        result.extend_from_slice(req.hints);
        dedup_consecutive(result);
        return;
    }

    let Some(source) = req.source.and_then(TerminalRef::as_fixed) else {
        return;
    };
    let bounds = source.bounds;

    // A hint inside the terminal does not count
    let hint = req.hints.first().copied().filter(|p| !bounds.contains(*p));

    let seg = req.style.segment.unwrap_or(LOOP_SEGMENT) * scale;
    let dir = req.style.direction.unwrap_or(Direction::West);

    let mut x = 0.0;
    let mut dx = 0.0;
    let mut y = 0.0;
    let mut dy = 0.0;

    if matches!(dir, Direction::North | Direction::South) {
        x = source.routing_center_x();
        dx = seg;
    } else {
        y = source.routing_center_y();
        dy = seg;
    }

    let hint_in_band = hint.is_some_and(|p| p.x >= bounds.x && p.x <= bounds.right());

    if !hint_in_band {
        match hint {
            Some(p) => {
                x = p.x;
                dy = (y - p.y).abs().max(dy);
            }
            None => match dir {
                Direction::North => y = bounds.y - 2.0 * dx,
                Direction::South => y = bounds.bottom() + 2.0 * dx,
                Direction::East => x = bounds.right() + 2.0 * dy,
                Direction::West => x = bounds.x - 2.0 * dy,
            },
        }
    } else if let Some(p) = hint {
        // The hint only moves the loop vertically; keep it centered
        x = source.routing_center_x();
        dx = (x - p.x).abs().max(dy);
        y = p.y;
        dy = 0.0;
    }

    result.push(Point::new(x - dx, y - dy));
    result.push(Point::new(x + dx, y + dy));
    dedup_consecutive(result);
}
