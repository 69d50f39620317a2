//! Local orthogonal router between two terminals
//!
//! Resolves an outgoing direction for each end from port constraints,
//! anchors and the rectangles' relative position, then synthesizes the
//! waypoints from a predetermined route pattern. All scratch state is
//! call-local so routing can run from many threads at once.

use crate::direction::DirectionSet;
use crate::geom::{round1, Point, Rect};

use super::patterns::{route_pattern, RoutePatternEntry};
use super::{
    dedup_consecutive, jetty_size, segment, RouteRequest, TerminalRef, ORTH_POINTS_FALLBACK,
};

/// Direction vectors indexed by direction index - 1 (west, north, east, south)
const DIR_VECTORS: [[f64; 2]; 4] = [[-1.0, 0.0], [0.0, -1.0], [1.0, 0.0], [0.0, 1.0]];

/// Upper bound on waypoints a pattern walk can produce
const MAX_WAYPOINTS: usize = 12;

const HORIZONTAL_MASK: u32 = DirectionSet::EAST.0 | DirectionSet::WEST.0;

/// Route an orthogonal edge, appending the waypoints to `result`
pub fn route(req: &RouteRequest, result: &mut Vec<Point>) {
    let scale = if req.scale > 0.0 { req.scale } else { 1.0 };

    let source_fixed = req.source.and_then(TerminalRef::as_fixed);
    let target_fixed = req.target.and_then(TerminalRef::as_fixed);

    let source_edge = source_fixed.is_some_and(|t| t.is_edge);
    let target_edge = target_fixed.is_some_and(|t| t.is_edge);

    // Everything below runs in unscaled space.
    let p0 = req.end_point(true).map(|p| unscale(p, scale));
    let pe = req.end_point(false).map(|p| unscale(p, scale));

    let source_rect =
        source_fixed.map(|t| t.bounds.unscaled(scale).rotated_bounds(t.rotation));
    let target_rect =
        target_fixed.map(|t| t.bounds.unscaled(scale).rotated_bounds(t.rotation));

    let geo_source = match source_rect.or(p0.map(Rect::at_point)) {
        Some(r) => r,
        None => return,
    };
    let geo_target = match target_rect.or(pe.map(Rect::at_point)) {
        Some(r) => r,
        None => return,
    };

    let mut source_buffer = jetty_size(req.style, true);
    let mut target_buffer = jetty_size(req.style, false);

    // A loop back to the same terminal routes with one consistent clearance
    if source_rect.is_some() && source_rect == target_rect {
        target_buffer = source_buffer.max(target_buffer);
        source_buffer = target_buffer;
    }

    let total_buffer = source_buffer + target_buffer;

    // Fixed endpoints closer than the combined clearance cannot fit the
    // jetties; hints and edge terminals are the segment connector's job.
    let too_short = match (p0, pe) {
        (Some(p0), Some(pe)) => {
            let dx = pe.x - p0.x;
            let dy = pe.y - p0.y;
            dx * dx + dy * dy < total_buffer * total_buffer
        }
        _ => false,
    };

    if too_short
        || (ORTH_POINTS_FALLBACK && !req.hints.is_empty())
        || source_edge
        || target_edge
    {
        segment::route(req, result);
        return;
    }

    let geo = [geo_source, geo_target];
    let buffer = [source_buffer, target_buffer];
    let port_constraint = [
        source_fixed.map_or(DirectionSet::ALL, |t| t.constraint),
        target_fixed.map_or(DirectionSet::ALL, |t| t.constraint),
    ];

    // Anchors pin a direction when they sit on a side, and define the
    // relative connection offset used by the center clamps.
    let mut dir = [0u32; 2];
    let mut constraint_rel = [[0.5f64; 2]; 2];

    let anchors = [
        source_fixed.and(p0.as_ref()),
        target_fixed.and(pe.as_ref()),
    ];

    for i in 0..2 {
        let Some(p) = anchors[i] else { continue };

        if geo[i].width != 0.0 {
            constraint_rel[i][0] = (p.x - geo[i].x) / geo[i].width;
        }
        if (p.x - geo[i].x).abs() <= 1.0 {
            dir[i] = DirectionSet::WEST.0;
        } else if (p.x - geo[i].right()).abs() <= 1.0 {
            dir[i] = DirectionSet::EAST.0;
        }

        if geo[i].height != 0.0 {
            constraint_rel[i][1] = (p.y - geo[i].y) / geo[i].height;
        }
        if (p.y - geo[i].y).abs() <= 1.0 {
            dir[i] = DirectionSet::NORTH.0;
        } else if (p.y - geo[i].bottom()).abs() <= 1.0 {
            dir[i] = DirectionSet::SOUTH.0;
        }
    }

    // Pairwise separations between the rectangles, and the net gaps left
    // once the jetty clearance is taken out (indexed by direction index).
    let source_top_dist = geo[0].y - geo[1].bottom();
    let source_left_dist = geo[0].x - geo[1].right();
    let source_bottom_dist = geo[1].y - geo[0].bottom();
    let source_right_dist = geo[1].x - geo[0].right();

    let mut separations = [0.0f64; 5];
    separations[1] = (source_left_dist - total_buffer).max(0.0);
    separations[2] = (source_top_dist - total_buffer).max(0.0);
    separations[3] = (source_right_dist - total_buffer).max(0.0);
    separations[4] = (source_bottom_dist - total_buffer).max(0.0);

    // Quadrant of the target relative to the source:
    //   0 | 1
    //   -----
    //   3 | 2
    let dx = geo[0].center().x - geo[1].center().x;
    let dy = geo[0].center().y - geo[1].center().y;

    let mut quad = 0;
    if dx < 0.0 {
        quad = if dy < 0.0 { 2 } else { 1 };
    } else if dy <= 0.0 {
        quad = 3;
        // Special case on dx = 0 and non-positive dy
        if dx == 0.0 {
            quad = 2;
        }
    }

    resolve_directions(
        &mut dir,
        port_constraint,
        [source_left_dist, source_right_dist],
        [source_top_dist, source_bottom_dist],
    );

    let source_dir = DirectionSet(dir[0]);
    let target_dir = DirectionSet(dir[1]);
    if source_dir.single().is_none() || target_dir.single().is_none() {
        return;
    }

    let pattern = route_pattern(source_dir, target_dir, quad, dx, dy);

    // Side limits: positions one clearance outside each rectangle's sides,
    // indexed by side bit (left 1, top 2, right 4, bottom 8).
    let mut limits = [[0.0f64; 9]; 2];
    for i in 0..2 {
        limits[i][1] = geo[i].x - buffer[i];
        limits[i][2] = geo[i].y - buffer[i];
        limits[i][4] = geo[i].right() + buffer[i];
        limits[i][8] = geo[i].bottom() + buffer[i];
    }

    synthesize(
        pattern,
        quad,
        dir,
        &geo,
        &constraint_rel,
        &limits,
        &separations,
        buffer[0],
        result,
        scale,
    );

    dedup_consecutive(result);
}

/// Resolve the outgoing direction of each end that an anchor has not
/// already pinned, honoring port constraints and preferring the axis with
/// the larger separation.
fn resolve_directions(
    dir: &mut [u32; 2],
    port_constraint: [DirectionSet; 2],
    horizontal_dists: [f64; 2],
    vertical_dists: [f64; 2],
) {
    let [source_left_dist, source_right_dist] = horizontal_dists;
    let [source_top_dist, source_bottom_dist] = vertical_dists;

    let pc = [port_constraint[0].0, port_constraint[1].0];

    let mut hor_pref = [0u32; 2];
    let mut vert_pref = [0u32; 2];

    hor_pref[0] = if source_left_dist >= source_right_dist {
        DirectionSet::WEST.0
    } else {
        DirectionSet::EAST.0
    };
    vert_pref[0] = if source_top_dist >= source_bottom_dist {
        DirectionSet::NORTH.0
    } else {
        DirectionSet::SOUTH.0
    };

    hor_pref[1] = DirectionSet(hor_pref[0]).reversed().0;
    vert_pref[1] = DirectionSet(vert_pref[0]).reversed().0;

    let preferred_horiz_dist = source_left_dist.max(source_right_dist);
    let preferred_vert_dist = source_top_dist.max(source_bottom_dist);

    let mut pref_ordering = [[0u32; 2]; 2];
    let mut preferred_order_set = false;

    // If the preferred port isn't available, switch it
    for i in 0..2 {
        if dir[i] != 0 {
            continue;
        }
        if hor_pref[i] & pc[i] == 0 {
            hor_pref[i] = DirectionSet(hor_pref[i]).reversed().0;
        }
        if vert_pref[i] & pc[i] == 0 {
            vert_pref[i] = DirectionSet(vert_pref[i]).reversed().0;
        }
        pref_ordering[i] = [vert_pref[i], hor_pref[i]];
    }

    if preferred_vert_dist > 0.0 && preferred_horiz_dist > 0.0 {
        // Possibility of a two segment connection
        if hor_pref[0] & pc[0] > 0 && vert_pref[1] & pc[1] > 0 {
            pref_ordering[0] = [hor_pref[0], vert_pref[0]];
            pref_ordering[1] = [vert_pref[1], hor_pref[1]];
            preferred_order_set = true;
        } else if vert_pref[0] & pc[0] > 0 && hor_pref[1] & pc[1] > 0 {
            pref_ordering[0] = [vert_pref[0], hor_pref[0]];
            pref_ordering[1] = [hor_pref[1], vert_pref[1]];
            preferred_order_set = true;
        }
    }

    if preferred_vert_dist > 0.0 && !preferred_order_set {
        pref_ordering[0] = [vert_pref[0], hor_pref[0]];
        pref_ordering[1] = [vert_pref[1], hor_pref[1]];
        preferred_order_set = true;
    }

    if preferred_horiz_dist > 0.0 && !preferred_order_set {
        pref_ordering[0] = [hor_pref[0], vert_pref[0]];
        pref_ordering[1] = [hor_pref[1], vert_pref[1]];
    }

    // The orderings are now a packed priority word per end; compact each
    // word by shifting until an allowed direction occupies the low nibble.
    for i in 0..2 {
        if dir[i] != 0 {
            continue;
        }

        if pref_ordering[i][0] & pc[i] == 0 {
            pref_ordering[i][0] = pref_ordering[i][1];
        }

        let mut word = pref_ordering[i][0] & pc[i];
        word |= (pref_ordering[i][1] & pc[i]) << 8;
        word |= (pref_ordering[1 - i][i] & pc[i]) << 16;
        word |= (pref_ordering[1 - i][1 - i] & pc[i]) << 24;

        if word & 0xF == 0 {
            word <<= 8;
        }
        if word & 0xF00 == 0 {
            word = (word & 0xF) | (word >> 8);
        }
        if word & 0xF0000 == 0 {
            word = (word & 0xFFFF) | ((word & 0xF00_0000) >> 8);
        }

        dir[i] = word & 0xF;

        // An explicit single-direction port constraint wins outright
        if port_constraint[i].is_single() {
            dir[i] = pc[i];
        }
    }
}

/// Walk the route pattern and emit the clamped waypoints
#[allow(clippy::too_many_arguments)]
fn synthesize(
    pattern: &[RoutePatternEntry],
    quad: i32,
    dir: [u32; 2],
    geo: &[Rect; 2],
    constraint_rel: &[[f64; 2]; 2],
    limits: &[[f64; 9]; 2],
    separations: &[f64; 5],
    source_buffer: f64,
    result: &mut Vec<Point>,
    scale: f64,
) {
    let mut waypoints = [[0.0f64; 2]; MAX_WAYPOINTS];

    // Jetty-out point on the source boundary
    waypoints[0] = [geo[0].x, geo[0].y];
    match DirectionSet(dir[0]) {
        DirectionSet::WEST => {
            waypoints[0][0] -= source_buffer;
            waypoints[0][1] += constraint_rel[0][1] * geo[0].height;
        }
        DirectionSet::SOUTH => {
            waypoints[0][0] += constraint_rel[0][0] * geo[0].width;
            waypoints[0][1] += geo[0].height + source_buffer;
        }
        DirectionSet::EAST => {
            waypoints[0][0] += geo[0].width + source_buffer;
            waypoints[0][1] += constraint_rel[0][1] * geo[0].height;
        }
        _ => {
            waypoints[0][0] += constraint_rel[0][0] * geo[0].width;
            waypoints[0][1] -= source_buffer;
        }
    }

    let mut current_index = 0usize;

    // Orientation: 0 horizontal, 1 vertical
    let mut last_orientation = if dir[0] & HORIZONTAL_MASK > 0 { 0 } else { 1 };
    let initial_orientation = last_orientation;

    for entry in pattern {
        // Rotate the move's direction by the quadrant to get the real one
        let mut direction_index = if entry.direction == DirectionSet::EAST.0 {
            3
        } else {
            entry.direction as i32
        };
        direction_index += quad;
        if direction_index > 4 {
            direction_index -= 4;
        }

        let vector = DIR_VECTORS[(direction_index - 1) as usize];
        let current_orientation = if direction_index % 2 > 0 { 0 } else { 1 };

        // A change of orientation starts a new waypoint; the same point is
        // moved in place until the direction turns.
        if current_orientation != last_orientation {
            current_index += 1;
            if current_index >= MAX_WAYPOINTS {
                break;
            }
            waypoints[current_index] = waypoints[current_index - 1];
        }

        let mut side = entry.side << quad;
        if side > 0xF {
            side >>= 4;
        }

        if (entry.source_relative || entry.target_relative) && side < 9 {
            let end = if entry.source_relative { 0 } else { 1 };

            let limit = if entry.is_center && current_orientation == 0 {
                geo[end].x + constraint_rel[end][0] * geo[end].width
            } else if entry.is_center {
                geo[end].y + constraint_rel[end][1] * geo[end].height
            } else {
                limits[end][side as usize]
            };

            if current_orientation == 0 {
                let last_x = waypoints[current_index][0];
                let delta_x = (limit - last_x) * vector[0];
                if delta_x > 0.0 {
                    waypoints[current_index][0] += vector[0] * delta_x;
                }
            } else {
                let last_y = waypoints[current_index][1];
                let delta_y = (limit - last_y) * vector[1];
                if delta_y > 0.0 {
                    waypoints[current_index][1] += vector[1] * delta_y;
                }
            }
        } else if entry.is_center {
            // A true center move travels half the net separation
            let half = (separations[direction_index as usize] / 2.0).abs();
            waypoints[current_index][0] += vector[0] * half;
            waypoints[current_index][1] += vector[1] * half;
        }

        if current_index > 0
            && waypoints[current_index][current_orientation]
                == waypoints[current_index - 1][current_orientation]
        {
            current_index -= 1;
        } else {
            last_orientation = current_orientation;
        }
    }

    for (i, wp) in waypoints.iter().enumerate().take(current_index + 1) {
        if i == current_index {
            // The last segment may run in the same direction as the target
            // jetty. Same source/target jetty orientation requires an even
            // number of points, different an odd number; otherwise the
            // final point is dropped.
            let target_orientation = if dir[1] & HORIZONTAL_MASK > 0 { 0 } else { 1 };
            let same_orient = if target_orientation == initial_orientation {
                0
            } else {
                1
            };

            if same_orient != (current_index + 1) % 2 {
                break;
            }
        }

        result.push(Point::new(
            round1(wp[0] * scale),
            round1(wp[1] * scale),
        ));
    }
}

fn unscale(p: Point, scale: f64) -> Point {
    Point::new(round1(p.x / scale), round1(p.y / scale))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::FixedTerminal;
    use crate::style::EdgeStyle;

    fn fixed(x: f64, y: f64, w: f64, h: f64) -> TerminalRef {
        TerminalRef::fixed(Rect::new(x, y, w, h))
    }

    fn run(source: &TerminalRef, target: &TerminalRef) -> Vec<Point> {
        let style = EdgeStyle::default();
        let req = RouteRequest::new(&style, 1.0, Some(source), Some(target), &[]);
        let mut out = Vec::new();
        route(&req, &mut out);
        out
    }

    #[test]
    fn test_level_terminals_route_straight() {
        let a = fixed(0.0, 0.0, 100.0, 40.0);
        let b = fixed(300.0, 0.0, 100.0, 40.0);
        assert!(run(&a, &b).is_empty());
    }

    #[test]
    fn test_offset_terminals_produce_orthogonal_bends() {
        let a = fixed(0.0, 0.0, 100.0, 40.0);
        let b = fixed(300.0, 200.0, 100.0, 40.0);
        let path = run(&a, &b);
        assert!(!path.is_empty());
        for pair in path.windows(2) {
            let same_x = pair[0].x == pair[1].x;
            let same_y = pair[0].y == pair[1].y;
            assert!(same_x || same_y, "diagonal segment {pair:?}");
        }
    }

    #[test]
    fn test_single_direction_constraint_wins() {
        let a = TerminalRef::Fixed(
            FixedTerminal::new(Rect::new(0.0, 0.0, 100.0, 40.0))
                .with_constraint(DirectionSet::NORTH),
        );
        let b = fixed(300.0, 0.0, 100.0, 40.0);
        let path = run(&a, &b);

        // The first waypoint must leave through the north side.
        assert!(!path.is_empty());
        assert!(path[0].y <= 0.0, "expected a north jetty, got {path:?}");
    }

    #[test]
    fn test_hints_fall_back_to_segment_connector() {
        let style = EdgeStyle::default();
        let a = TerminalRef::floating(0.0, 20.0);
        let b = TerminalRef::floating(300.0, 220.0);
        let hints = [Point::new(150.0, 20.0)];
        let req = RouteRequest::new(&style, 1.0, Some(&a), Some(&b), &hints);

        let mut out = Vec::new();
        route(&req, &mut out);
        assert!(!out.is_empty());
    }

    #[test]
    fn test_close_endpoints_fall_back() {
        // Anchored endpoints closer than the combined jetty clearance
        let a = TerminalRef::Fixed(
            FixedTerminal::new(Rect::new(0.0, 0.0, 10.0, 10.0)).with_anchor(Point::new(10.0, 5.0)),
        );
        let b = TerminalRef::Fixed(
            FixedTerminal::new(Rect::new(15.0, 0.0, 10.0, 10.0)).with_anchor(Point::new(15.0, 5.0)),
        );
        let style = EdgeStyle::default();
        let req = RouteRequest::new(&style, 1.0, Some(&a), Some(&b), &[]);

        // Must not panic and must not loop; the segment connector handles it.
        let mut out = Vec::new();
        route(&req, &mut out);
    }

    #[test]
    fn test_missing_both_terminals_emits_nothing() {
        let style = EdgeStyle::default();
        let req = RouteRequest::new(&style, 1.0, None, None, &[]);
        let mut out = Vec::new();
        route(&req, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_deterministic() {
        let a = fixed(0.0, 0.0, 80.0, 30.0);
        let b = fixed(40.0, 150.0, 80.0, 30.0);
        assert_eq!(run(&a, &b), run(&a, &b));
    }
}
