//! Route pattern tables for the orthogonal router
//!
//! The packed tables are empirically tuned constants; they are transcribed
//! verbatim and decoded once into typed entries. Each packed value holds a
//! direction in the low nibble, a side mask in bits 5-8 and the center,
//! source and target flags above those.

use once_cell::sync::Lazy;

use crate::direction::DirectionSet;

pub const LEFT_MASK: u32 = 32;
pub const TOP_MASK: u32 = 64;
pub const RIGHT_MASK: u32 = 128;
pub const BOTTOM_MASK: u32 = 256;

/// All four side bits
pub const SIDE_MASK: u32 = LEFT_MASK | TOP_MASK | RIGHT_MASK | BOTTOM_MASK;

pub const CENTER_MASK: u32 = 512;
pub const SOURCE_MASK: u32 = 1024;
pub const TARGET_MASK: u32 = 2048;

/// One decoded move of a route pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutePatternEntry {
    /// Direction mask (one of west 1, north 2, south 4, east 8), before
    /// quadrant rotation
    pub direction: u32,
    /// Clamp against the source rectangle's side limits
    pub source_relative: bool,
    /// Clamp against the target rectangle's side limits
    pub target_relative: bool,
    /// Which side limits the move (4-bit, unrotated: left 1, top 2,
    /// right 4, bottom 8)
    pub side: u32,
    /// Move to the center between or on a terminal
    pub is_center: bool,
}

fn decode(packed: u32) -> RoutePatternEntry {
    RoutePatternEntry {
        direction: packed & 0xF,
        source_relative: packed & SOURCE_MASK > 0,
        target_relative: packed & TARGET_MASK > 0,
        side: (packed & SIDE_MASK) >> 5,
        is_center: packed & CENTER_MASK > 0,
    }
}

fn decode_all(packed: &[u32]) -> Vec<RoutePatternEntry> {
    packed.iter().copied().map(decode).collect()
}

/// Main 4x4 table indexed by quadrant-shifted (source, target) direction
const ROUTE_PATTERNS: [[&[u32]; 4]; 4] = [
    [
        &[513, 2308, 2081, 2562],
        &[513, 1090, 514, 2184, 2114, 2561],
        &[513, 1090, 514, 2564, 2184, 2562],
        &[513, 2308, 2561, 1090, 514, 2568, 2308],
    ],
    [
        &[514, 1057, 513, 2308, 2081, 2562],
        &[514, 2184, 2114, 2561],
        &[514, 2184, 2562, 1057, 513, 2564, 2184],
        &[514, 1057, 513, 2568, 2308, 2561],
    ],
    [
        &[1090, 514, 1057, 513, 2308, 2081, 2562],
        &[2114, 2561],
        &[1090, 2562, 1057, 513, 2564, 2184],
        &[1090, 514, 1057, 513, 2308, 2561, 2568],
    ],
    [
        &[2081, 2562],
        &[1057, 513, 1090, 514, 2184, 2114, 2561],
        &[1057, 513, 1090, 514, 2184, 2562, 2564],
        &[1057, 2561, 1090, 514, 2568, 2308],
    ],
];

/// Overrides used when the terminals are exactly aligned on one axis
const INLINE_ROUTE_PATTERNS: [[Option<&[u32]>; 4]; 4] = [
    [None, Some(&[2114, 2568]), None, None],
    [None, Some(&[514, 2081, 2114, 2568]), None, None],
    [None, Some(&[2114, 2561]), None, None],
    [
        Some(&[2081, 2562]),
        Some(&[1057, 2114, 2568]),
        Some(&[2184, 2562]),
        None,
    ],
];

static DECODED_PATTERNS: Lazy<[[Vec<RoutePatternEntry>; 4]; 4]> = Lazy::new(|| {
    ROUTE_PATTERNS.map(|row| row.map(decode_all))
});

static DECODED_INLINE: Lazy<[[Option<Vec<RoutePatternEntry>>; 4]; 4]> =
    Lazy::new(|| INLINE_ROUTE_PATTERNS.map(|row| row.map(|cell| cell.map(decode_all))));

/// Fold a direction mask into a table index 1..=4 (east becomes 3)
fn direction_index(dir: DirectionSet) -> i32 {
    if dir == DirectionSet::EAST {
        3
    } else {
        dir.bits() as i32
    }
}

/// Look up the route pattern for the resolved directions and quadrant.
/// `dx`/`dy` are the center offsets between the terminals; exact alignment
/// on one axis selects the inline table when it has an entry for the pair.
pub fn route_pattern(
    source_dir: DirectionSet,
    target_dir: DirectionSet,
    quad: i32,
    dx: f64,
    dy: f64,
) -> &'static [RoutePatternEntry] {
    let mut source_index = direction_index(source_dir) - quad;
    let mut target_index = direction_index(target_dir) - quad;

    if source_index < 1 {
        source_index += 4;
    }
    if target_index < 1 {
        target_index += 4;
    }

    let row = (source_index - 1) as usize;
    let col = (target_index - 1) as usize;

    if dx == 0.0 || dy == 0.0 {
        if let Some(inline) = &DECODED_INLINE[row][col] {
            return inline;
        }
    }

    &DECODED_PATTERNS[row][col]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_fields() {
        // 2308 = target | center | south-side(256) | south-direction(4)
        let entry = decode(2308);
        assert_eq!(entry.direction, DirectionSet::SOUTH.bits());
        assert!(entry.target_relative);
        assert!(!entry.source_relative);
        assert_eq!(entry.side, 8);
        assert!(!entry.is_center);

        // 513 = center | west
        let entry = decode(513);
        assert_eq!(entry.direction, DirectionSet::WEST.bits());
        assert!(entry.is_center);
        assert_eq!(entry.side, 0);
    }

    #[test]
    fn test_every_entry_has_a_single_direction() {
        for row in ROUTE_PATTERNS.iter() {
            for pattern in row.iter() {
                for &packed in pattern.iter() {
                    let dir = packed & 0xF;
                    assert!(matches!(dir, 1 | 2 | 4 | 8), "bad direction in {packed}");
                }
            }
        }
    }

    #[test]
    fn test_pattern_lengths_match_reference() {
        let lens: Vec<Vec<usize>> = ROUTE_PATTERNS
            .iter()
            .map(|row| row.iter().map(|p| p.len()).collect())
            .collect();
        assert_eq!(
            lens,
            vec![
                vec![4, 6, 6, 7],
                vec![6, 4, 7, 6],
                vec![7, 2, 6, 7],
                vec![2, 7, 7, 6],
            ]
        );
    }

    #[test]
    fn test_lookup_wraps_by_quadrant() {
        // West/west in quadrant 0 hits the top-left cell.
        let p = route_pattern(DirectionSet::WEST, DirectionSet::WEST, 0, 10.0, 10.0);
        assert_eq!(p.len(), 4);

        // Shifting both indices by a full cycle lands on the same cell.
        let q = route_pattern(DirectionSet::SOUTH, DirectionSet::SOUTH, 3, 10.0, 10.0);
        assert_eq!(p, q);
    }

    #[test]
    fn test_inline_pattern_selected_on_axis_alignment() {
        // West/north in quadrant 0 has an inline override.
        let aligned = route_pattern(DirectionSet::WEST, DirectionSet::NORTH, 0, 0.0, 10.0);
        assert_eq!(aligned.len(), 2);
        assert_eq!(aligned[0].direction, DirectionSet::NORTH.bits());

        let offset = route_pattern(DirectionSet::WEST, DirectionSet::NORTH, 0, 5.0, 10.0);
        assert_eq!(offset.len(), 6);
    }
}
