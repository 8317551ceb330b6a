use serde::{Deserialize, Serialize};

use crate::position::Position;

/// Four candidate "soft" tiles flanking a fortification's entrance that the
/// `gap_mask` can leave `Free` instead of `Used`, opening an approach
/// corridor (glossary: Gap mask). Offsets are relative to the entrance
/// tile, which itself sits at `pos + (w/2, h-1)`.
pub const GAP_CANDIDATE_OFFSETS: [(i32, i32); 4] = [(-1, 0), (1, 0), (-1, -1), (1, -1)];

/// Rectangular on-map footprint shared by every scenario object variant
/// (§3 MapElement).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapElement {
    pub pos: Position,
    pub width: i32,
    pub height: i32,
    /// Bitmask over [`GAP_CANDIDATE_OFFSETS`]; a set bit leaves that
    /// candidate tile `Free` rather than part of the blocked footprint.
    pub gap_mask: u8,
    pub entrance_override: Option<Position>,
}

impl MapElement {
    pub fn new(pos: Position, width: i32, height: i32) -> Self {
        Self {
            pos,
            width,
            height,
            gap_mask: 0,
            entrance_override: None,
        }
    }

    pub fn with_gap_mask(mut self, gap_mask: u8) -> Self {
        self.gap_mask = gap_mask;
        self
    }

    /// Bottom-center tile unless an override was set.
    pub fn entrance(&self) -> Position {
        self.entrance_override
            .unwrap_or_else(|| self.pos.add(self.width / 2, self.height - 1))
    }

    /// Every tile of the rectangle, in row-major order.
    pub fn footprint(&self) -> Vec<Position> {
        let mut out = Vec::with_capacity((self.width * self.height) as usize);
        for dy in 0..self.height {
            for dx in 0..self.width {
                out.push(self.pos.add(dx, dy));
            }
        }
        out
    }

    fn gap_positions(&self) -> Vec<Position> {
        let entrance = self.entrance();
        GAP_CANDIDATE_OFFSETS
            .iter()
            .enumerate()
            .filter(|(bit, _)| self.gap_mask & (1 << bit) != 0)
            .map(|(_, (dx, dy))| entrance.add(*dx, *dy))
            .collect()
    }

    /// Footprint tiles that must end up `Used`, i.e. the full rectangle
    /// minus any tiles opened up by the gap mask.
    pub fn blocked_offsets(&self) -> Vec<Position> {
        let gaps = self.gap_positions();
        self.footprint().into_iter().filter(|p| !gaps.contains(p)).collect()
    }

    /// Gap-mask tiles that stay `Free` instead of being part of the
    /// footprint's occupied set.
    pub fn soft_tiles(&self) -> Vec<Position> {
        self.gap_positions()
    }

    /// The 1-tile neighborhood around the entrance used for "is this
    /// object reachable?" tests.
    pub fn entrance_offsets(&self) -> Vec<Position> {
        let entrance = self.entrance();
        Position::ALL_NEIGHBORS.iter().map(|(dx, dy)| entrance.add(*dx, *dy)).collect()
    }

    pub fn touches_rect(&self, min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> bool {
        self.pos.x < min_x
            || self.pos.y < min_y
            || self.pos.x + self.width > max_x
            || self.pos.y + self.height > max_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entrance_is_bottom_center() {
        let el = MapElement::new(Position::new(10, 10), 5, 5);
        assert_eq!(el.entrance(), Position::new(12, 14));
    }

    #[test]
    fn gap_mask_removes_tiles_from_blocked_offsets() {
        let el = MapElement::new(Position::new(0, 0), 5, 5).with_gap_mask(0b0011);
        let blocked = el.blocked_offsets();
        let full = el.footprint();
        assert!(blocked.len() < full.len());
        for soft in el.soft_tiles() {
            assert!(!blocked.contains(&soft));
        }
    }

    #[test]
    fn footprint_has_width_times_height_tiles() {
        let el = MapElement::new(Position::new(0, 0), 3, 4);
        assert_eq!(el.footprint().len(), 12);
    }
}
