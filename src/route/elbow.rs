//! Single-bend elbow connectors
//!
//! `side_to_side` bends through a shared vertical channel, `top_to_bottom`
//! through a shared horizontal one. `route` picks between them from the
//! terminals' overlap, an optional hint, and the style's elbow override.

use crate::geom::Point;
use crate::style::ElbowOrientation;

use super::{dedup_consecutive, RouteRequest, TerminalRef};

/// Route an elbow edge, appending the waypoints to `result`
pub fn route(req: &RouteRequest, result: &mut Vec<Point>) {
    let hint = req.hints.first();

    let mut vertical = false;
    let mut horizontal = false;

    let source = req.source.and_then(TerminalRef::as_fixed);
    let target = req.target.and_then(TerminalRef::as_fixed);

    if let (Some(source), Some(target)) = (source, target) {
        match hint {
            Some(pt) => {
                let left = source.bounds.x.min(target.bounds.x);
                let right = source.bounds.right().max(target.bounds.right());
                let top = source.bounds.y.min(target.bounds.y);
                let bottom = source.bounds.bottom().max(target.bounds.bottom());

                vertical = pt.y < top || pt.y > bottom;
                horizontal = pt.x < left || pt.x > right;
            }
            None => {
                // With no hint the bend runs across whichever axis the
                // terminals do not overlap on.
                let left = source.bounds.x.max(target.bounds.x);
                let right = source.bounds.right().min(target.bounds.right());

                vertical = left == right;

                if !vertical {
                    let top = source.bounds.y.max(target.bounds.y);
                    let bottom = source.bounds.bottom().min(target.bounds.bottom());

                    horizontal = top == bottom;
                }
            }
        }
    }

    if !horizontal && (vertical || req.style.elbow == Some(ElbowOrientation::Vertical)) {
        top_to_bottom(req, result);
    } else {
        side_to_side(req, result);
    }
}

/// Elbow through a vertical channel between the terminals
pub fn side_to_side(req: &RouteRequest, result: &mut Vec<Point>) {
    let start = result.len();
    let hint = req.hints.first();

    let (Some(source), Some(target)) = (req.simple_end(true), req.simple_end(false)) else {
        return;
    };

    let l = source.bounds.x.max(target.bounds.x);
    let r = source.bounds.right().min(target.bounds.right());

    let x = match hint {
        Some(pt) => pt.x,
        None => (r + (l - r) / 2.0).round(),
    };

    let mut y1 = source.routing_center_y();
    let mut y2 = target.routing_center_y();

    if let Some(pt) = hint {
        if pt.y >= source.bounds.y && pt.y <= source.bounds.bottom() {
            y1 = pt.y;
        }
        if pt.y >= target.bounds.y && pt.y <= target.bounds.bottom() {
            y2 = pt.y;
        }
    }

    if !target.bounds.contains(Point::new(x, y1)) && !source.bounds.contains(Point::new(x, y1)) {
        result.push(Point::new(x, y1));
    }

    if !target.bounds.contains(Point::new(x, y2)) && !source.bounds.contains(Point::new(x, y2)) {
        result.push(Point::new(x, y2));
    }

    if result.len() - start == 1 {
        match hint {
            Some(pt) => {
                if !target.bounds.contains(Point::new(x, pt.y))
                    && !source.bounds.contains(Point::new(x, pt.y))
                {
                    result.push(Point::new(x, pt.y));
                }
            }
            None => {
                let t = source.bounds.y.max(target.bounds.y);
                let b = source.bounds.bottom().min(target.bounds.bottom());

                result.push(Point::new(x, t + (b - t) / 2.0));
            }
        }
    }

    dedup_consecutive(result);
}

/// Elbow through a horizontal channel between the terminals
pub fn top_to_bottom(req: &RouteRequest, result: &mut Vec<Point>) {
    let start = result.len();
    let hint = req.hints.first();

    let (Some(source), Some(target)) = (req.simple_end(true), req.simple_end(false)) else {
        return;
    };

    let t = source.bounds.y.max(target.bounds.y);
    let b = source.bounds.bottom().min(target.bounds.bottom());

    let mut x = source.routing_center_x();

    if let Some(pt) = hint {
        if pt.x >= source.bounds.x && pt.x <= source.bounds.right() {
            x = pt.x;
        }
    }

    let y = match hint {
        Some(pt) => pt.y,
        None => (b + (t - b) / 2.0).round(),
    };

    if !target.bounds.contains(Point::new(x, y)) && !source.bounds.contains(Point::new(x, y)) {
        result.push(Point::new(x, y));
    }

    match hint {
        Some(pt) if pt.x >= target.bounds.x && pt.x <= target.bounds.right() => {
            x = pt.x;
        }
        _ => {
            x = target.routing_center_x();
        }
    }

    if !target.bounds.contains(Point::new(x, y)) && !source.bounds.contains(Point::new(x, y)) {
        result.push(Point::new(x, y));
    }

    if result.len() - start == 1 {
        match hint {
            Some(pt) => {
                if !target.bounds.contains(Point::new(pt.x, y))
                    && !source.bounds.contains(Point::new(pt.x, y))
                {
                    result.push(Point::new(pt.x, y));
                }
            }
            None => {
                let l = source.bounds.x.max(target.bounds.x);
                let r = source.bounds.right().min(target.bounds.right());

                result.push(Point::new(l + (r - l) / 2.0, y));
            }
        }
    }

    dedup_consecutive(result);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Rect;
    use crate::style::EdgeStyle;

    fn fixed(x: f64, y: f64, w: f64, h: f64) -> TerminalRef {
        TerminalRef::fixed(Rect::new(x, y, w, h))
    }

    fn run(
        f: fn(&RouteRequest, &mut Vec<Point>),
        style: &EdgeStyle,
        source: &TerminalRef,
        target: &TerminalRef,
        hints: &[Point],
    ) -> Vec<Point> {
        let req = RouteRequest::new(style, 1.0, Some(source), Some(target), hints);
        let mut out = Vec::new();
        f(&req, &mut out);
        out
    }

    #[test]
    fn test_top_to_bottom_stacked_terminals() {
        // Vertically stacked terminals bend once in the gap between them.
        let style = EdgeStyle::default();
        let a = fixed(0.0, 0.0, 100.0, 40.0);
        let b = fixed(0.0, 200.0, 100.0, 40.0);

        let path = run(top_to_bottom, &style, &a, &b, &[]);
        assert_eq!(path, vec![Point::new(50.0, 120.0)]);
    }

    #[test]
    fn test_side_to_side_offset_terminals() {
        let style = EdgeStyle::default();
        let a = fixed(0.0, 0.0, 100.0, 40.0);
        let b = fixed(300.0, 200.0, 100.0, 40.0);

        let path = run(side_to_side, &style, &a, &b, &[]);
        assert_eq!(path, vec![Point::new(200.0, 20.0), Point::new(200.0, 220.0)]);
    }

    #[test]
    fn test_side_to_side_suppresses_contained_bends() {
        // Overlapping terminals swallow both channel points; the midpoint
        // fallback does not apply when zero points survive.
        let style = EdgeStyle::default();
        let a = fixed(0.0, 0.0, 100.0, 40.0);
        let b = fixed(0.0, 0.0, 100.0, 40.0);

        let path = run(side_to_side, &style, &a, &b, &[]);
        assert!(path.is_empty());
    }

    #[test]
    fn test_elbow_dispatches_on_touching_extents() {
        // Terminals whose horizontal extents only touch route top to
        // bottom through the vertical gap.
        let style = EdgeStyle::default();
        let a = fixed(0.0, 0.0, 100.0, 40.0);
        let b = fixed(100.0, 60.0, 100.0, 40.0);

        let path = run(route, &style, &a, &b, &[]);
        assert_eq!(path, vec![Point::new(50.0, 50.0), Point::new(150.0, 50.0)]);
    }

    #[test]
    fn test_elbow_vertical_style_override() {
        let style = EdgeStyle::new().with_elbow(ElbowOrientation::Vertical);
        let a = fixed(0.0, 0.0, 100.0, 40.0);
        let b = fixed(300.0, 200.0, 100.0, 40.0);

        let path = run(route, &style, &a, &b, &[]);
        // One horizontal channel bend per terminal center
        assert_eq!(path, vec![Point::new(50.0, 120.0), Point::new(350.0, 120.0)]);
    }

    #[test]
    fn test_elbow_hint_outside_extent_forces_vertical() {
        let style = EdgeStyle::default();
        let a = fixed(0.0, 0.0, 100.0, 40.0);
        let b = fixed(300.0, 0.0, 100.0, 40.0);
        let hints = [Point::new(200.0, 300.0)];

        // The hint lies below both terminals, so the edge routes top to
        // bottom through the hint's y.
        let path = run(route, &style, &a, &b, &hints);
        assert!(!path.is_empty());
        assert!(path.iter().all(|p| p.y == 300.0));
    }

    #[test]
    fn test_missing_terminal_emits_nothing() {
        let style = EdgeStyle::default();
        let a = fixed(0.0, 0.0, 100.0, 40.0);
        let req = RouteRequest::new(&style, 1.0, Some(&a), None, &[]);
        let mut out = Vec::new();
        route(&req, &mut out);
        assert!(out.is_empty());
    }
}
