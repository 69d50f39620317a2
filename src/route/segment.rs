//! Hint-following orthogonal connector
//!
//! Routes through user waypoint hints with alternating horizontal and
//! vertical runs. The orientation of the first run is detected from the
//! hint's alignment with the endpoints, or from the channels of the
//! terminal rectangles when an end floats.

use crate::geom::{round1, Point, Rect};

use super::{dedup_consecutive, FixedTerminal, RouteRequest, TerminalRef};

const TOLERANCE: f64 = 1.0;

/// Route a segment edge, appending the waypoints to `result`
pub fn route(req: &RouteRequest, result: &mut Vec<Point>) {
    let scale = if req.scale > 0.0 { req.scale } else { 1.0 };
    let start = result.len();

    // Everything below runs in unscaled space; points are rescaled as
    // they are pushed.
    let source = req
        .source
        .and_then(TerminalRef::as_fixed)
        .map(|t| unscaled_terminal(t, scale));
    let target = req
        .target
        .and_then(TerminalRef::as_fixed)
        .map(|t| unscaled_terminal(t, scale));

    let p0 = req.end_point(true).map(|p| unscale(p, scale));
    let pe = req.end_point(false).map(|p| unscale(p, scale));

    let mut last_pushed = result.first().copied();

    let mut push_point = |result: &mut Vec<Point>, p: Point| {
        let p = Point::new(round1(p.x * scale), round1(p.y * scale));

        let outside = match last_pushed {
            None => true,
            Some(lp) => {
                (lp.x - p.x).abs() >= TOLERANCE || (lp.y - p.y).abs() >= 1f64.max(scale)
            }
        };
        if outside {
            result.push(p);
            last_pushed = Some(p);
        }
    };

    // Cursor starts at the fixed source point, or the source's routing
    // center for a floating connection.
    let mut cursor = match p0.or_else(|| source.as_ref().map(routing_center)) {
        Some(p) => p,
        None => return,
    };

    // First segment orientation: 0 horizontal by default
    let mut horizontal = true;
    let mut hint;

    let mut hints: Vec<Point> = req.hints.iter().map(|h| unscale(*h, scale)).collect();

    if !hints.is_empty() {
        // Aligns the outer hints with the fixed endpoints
        if let Some(p0) = p0 {
            align_hint(&mut hints[0], p0);
        }
        if let Some(pe) = pe {
            let last = hints.len() - 1;
            align_hint(&mut hints[last], pe);
        }

        hint = hints[0];

        // Check for alignment with fixed points and with channels at the
        // source and target segments only.
        let mut current_term = if p0.is_some() { None } else { source.as_ref() };
        let mut current_pt = p0;
        let mut current_hint = hint;

        for i in 0..2 {
            let fixed_vert_align = current_pt.is_some_and(|p| p.x == current_hint.x);
            let fixed_hoz_align = current_pt.is_some_and(|p| p.y == current_hint.y);

            let in_hoz_chan = current_term.is_some_and(|t| {
                current_hint.y >= t.bounds.y && current_hint.y <= t.bounds.bottom()
            });
            let in_vert_chan = current_term.is_some_and(|t| {
                current_hint.x >= t.bounds.x && current_hint.x <= t.bounds.right()
            });

            let hoz_chan = fixed_hoz_align || (current_pt.is_none() && in_hoz_chan);
            let vert_chan = fixed_vert_align || (current_pt.is_none() && in_vert_chan);

            // A hint in both channels, or coincident with a fixed point,
            // is ambiguous at the source; the target end decides.
            let ambiguous = (hoz_chan && vert_chan) || (fixed_vert_align && fixed_hoz_align);

            if (i != 0 || !ambiguous) && (vert_chan || hoz_chan) {
                horizontal = hoz_chan;
                if i == 1 {
                    // Worked back from the target end; the hint count
                    // flips the orientation of the first segment.
                    horizontal = if hints.len() % 2 == 0 {
                        hoz_chan
                    } else {
                        vert_chan
                    };
                }
                break;
            }

            if i == 0 {
                current_term = if pe.is_some() { None } else { target.as_ref() };
                current_pt = pe;
                current_hint = hints[hints.len() - 1];

                if fixed_vert_align && fixed_hoz_align {
                    hints.remove(0);
                }
            }
        }

        // Stub from the source end towards the first hint
        if horizontal
            && (p0.is_some_and(|p| p.y != hint.y)
                || (p0.is_none()
                    && source
                        .as_ref()
                        .is_some_and(|s| hint.y < s.bounds.y || hint.y > s.bounds.bottom())))
        {
            push_point(result, Point::new(cursor.x, hint.y));
        } else if !horizontal
            && (p0.is_some_and(|p| p.x != hint.x)
                || (p0.is_none()
                    && source
                        .as_ref()
                        .is_some_and(|s| hint.x < s.bounds.x || hint.x > s.bounds.right())))
        {
            push_point(result, Point::new(hint.x, cursor.y));
        }

        if horizontal {
            cursor.y = hint.y;
        } else {
            cursor.x = hint.x;
        }

        for h in &hints {
            horizontal = !horizontal;
            hint = *h;

            if horizontal {
                cursor.y = hint.y;
            } else {
                cursor.x = hint.x;
            }

            push_point(result, cursor);
        }
    } else {
        hint = cursor;
        horizontal = true;
    }

    // Stub from the last hint towards the target end
    let end = pe.or_else(|| target.as_ref().map(routing_center));

    if let Some(end) = end {
        if horizontal
            && (pe.is_some_and(|p| p.y != hint.y)
                || (pe.is_none()
                    && target
                        .as_ref()
                        .is_some_and(|t| hint.y < t.bounds.y || hint.y > t.bounds.bottom())))
        {
            push_point(result, Point::new(end.x, hint.y));
        } else if !horizontal
            && (pe.is_some_and(|p| p.x != hint.x)
                || (pe.is_none()
                    && target
                        .as_ref()
                        .is_some_and(|t| hint.x < t.bounds.x || hint.x > t.bounds.right())))
        {
            push_point(result, Point::new(hint.x, end.y));
        }
    }

    // Removes bends inside the source terminal for floating ports
    if p0.is_none() {
        if let Some(s) = &source {
            while result.len() > start + 1 && contains_scaled(&s.bounds, result[start + 1], scale)
            {
                result.remove(start + 1);
            }
        }
    }

    // Removes bends inside the target terminal
    if pe.is_none() {
        if let Some(t) = &target {
            while result.len() > start + 1
                && contains_scaled(&t.bounds, result[result.len() - 1], scale)
            {
                result.pop();
            }
        }
    }

    // Drop a final bend that coincides with the fixed endpoint, and line
    // the new last bend up with it.
    if !req.hints.is_empty() {
        if let (Some(pe), Some(last)) = (pe, result.last().copied()) {
            if result.len() > start {
                let pe = Point::new(round1(pe.x * scale), round1(pe.y * scale));

                if (pe.x - last.x).abs() <= TOLERANCE && (pe.y - last.y).abs() <= TOLERANCE {
                    result.pop();

                    if let Some(prev) = result.last_mut() {
                        if (prev.x - pe.x).abs() < TOLERANCE {
                            prev.x = pe.x;
                        }
                        if (prev.y - pe.y).abs() < TOLERANCE {
                            prev.y = pe.y;
                        }
                    }
                }
            }
        }
    }

    dedup_consecutive(result);
}

fn unscale(p: Point, scale: f64) -> Point {
    Point::new(round1(p.x / scale), round1(p.y / scale))
}

fn unscaled_terminal(t: &FixedTerminal, scale: f64) -> FixedTerminal {
    FixedTerminal {
        bounds: t.bounds.unscaled(scale),
        ..t.clone()
    }
}

fn routing_center(t: &FixedTerminal) -> Point {
    Point::new(t.routing_center_x(), t.routing_center_y())
}

fn align_hint(hint: &mut Point, endpoint: Point) {
    if (hint.x - endpoint.x).abs() < TOLERANCE {
        hint.x = endpoint.x;
    }
    if (hint.y - endpoint.y).abs() < TOLERANCE {
        hint.y = endpoint.y;
    }
}

/// Containment test for a scaled result point against an unscaled rect
fn contains_scaled(rect: &Rect, p: Point, scale: f64) -> bool {
    rect.contains(Point::new(p.x / scale, p.y / scale))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::EdgeStyle;

    fn run(
        source: Option<&TerminalRef>,
        target: Option<&TerminalRef>,
        hints: &[Point],
        scale: f64,
    ) -> Vec<Point> {
        let style = EdgeStyle::default();
        let req = RouteRequest::new(&style, scale, source, target, hints);
        let mut out = Vec::new();
        route(&req, &mut out);
        out
    }

    #[test]
    fn test_no_hints_between_level_terminals() {
        let a = TerminalRef::fixed(Rect::new(0.0, 0.0, 100.0, 40.0));
        let b = TerminalRef::fixed(Rect::new(300.0, 0.0, 100.0, 40.0));
        assert!(run(Some(&a), Some(&b), &[], 1.0).is_empty());
    }

    #[test]
    fn test_single_hint_produces_two_bends() {
        let a = TerminalRef::floating(0.0, 20.0);
        let b = TerminalRef::floating(300.0, 220.0);
        let hints = [Point::new(150.0, 20.0)];

        let path = run(Some(&a), Some(&b), &hints, 1.0);
        assert_eq!(path, vec![Point::new(150.0, 20.0), Point::new(150.0, 220.0)]);
    }

    #[test]
    fn test_hint_on_source_point_adds_nothing() {
        // A hint within tolerance of the fixed source point aligns with it
        // instead of producing a bend.
        let a = TerminalRef::floating(100.0, 20.0);
        let b = TerminalRef::floating(300.0, 20.0);
        let hints = [Point::new(100.5, 20.3)];

        assert!(run(Some(&a), Some(&b), &hints, 1.0).is_empty());
    }

    #[test]
    fn test_floating_source_strips_interior_bends() {
        let a = TerminalRef::fixed(Rect::new(0.0, 0.0, 100.0, 40.0));
        let b = TerminalRef::floating(300.0, 220.0);
        let hints = [Point::new(150.0, 20.0)];

        let path = run(Some(&a), Some(&b), &hints, 1.0);
        for p in &path {
            assert!(
                !(p.x > 0.0 && p.x < 100.0 && p.y > 0.0 && p.y < 40.0),
                "bend {p:?} inside the source terminal"
            );
        }
        assert!(!path.is_empty());
    }

    #[test]
    fn test_scaled_output_is_rescaled() {
        let a = TerminalRef::floating(0.0, 40.0);
        let b = TerminalRef::floating(600.0, 440.0);
        let hints = [Point::new(300.0, 40.0)];

        let path = run(Some(&a), Some(&b), &hints, 2.0);
        assert_eq!(path, vec![Point::new(300.0, 40.0), Point::new(300.0, 440.0)]);
    }

    #[test]
    fn test_missing_everything_emits_nothing() {
        assert!(run(None, None, &[], 1.0).is_empty());
    }

    #[test]
    fn test_deterministic() {
        let a = TerminalRef::fixed(Rect::new(0.0, 0.0, 100.0, 40.0));
        let b = TerminalRef::floating(300.0, 220.0);
        let hints = [Point::new(150.0, 60.0), Point::new(150.0, 120.0)];
        assert_eq!(
            run(Some(&a), Some(&b), &hints, 1.0),
            run(Some(&a), Some(&b), &hints, 1.0)
        );
    }
}
