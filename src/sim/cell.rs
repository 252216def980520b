//! Per-pixel collision data

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// What occupies a grid cell.
///
/// The discriminants are ordered: anything above `Valid` blocks the ball,
/// anything below it is a hole or trigger. Construction compares kinds by
/// this rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(i8)]
pub enum CellKind {
    Wall = 2,
    /// Band around a wall, one ball radius wide, where the ball center may not go
    WallPeriphery = 1,
    #[default]
    Valid = 0,
    /// Funnel around a hole; pulls the ball toward the center
    HoleArea = -1,
    /// Absorbing core of a hole
    HoleCenter = -2,
    Checkpoint = -3,
}

impl CellKind {
    #[inline]
    pub fn rank(self) -> i8 {
        self as i8
    }

    /// Wall or periphery
    #[inline]
    pub fn is_obstacle(self) -> bool {
        self.rank() > CellKind::Valid.rank()
    }

    /// Character used by the debug map dump
    pub fn glyph(self) -> char {
        match self {
            CellKind::Wall => '#',
            CellKind::WallPeriphery => '+',
            CellKind::Valid => '.',
            CellKind::HoleArea => 'o',
            CellKind::HoleCenter => '@',
            CellKind::Checkpoint => 'C',
        }
    }
}

/// One grid cell
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Cell {
    pub kind: CellKind,
    /// Surface normal near walls, pull vector inside hole areas
    pub normal: Vec2,
    /// Checkpoint index (only meaningful for `Checkpoint` cells)
    pub checkpoint: usize,
}

impl Cell {
    /// Returned for every query outside the grid, so leaving the board
    /// counts as falling into a hole.
    pub const OUT_OF_BOUNDS: Cell = Cell {
        kind: CellKind::HoleCenter,
        normal: Vec2::ZERO,
        checkpoint: 0,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_ordering() {
        use CellKind::*;
        let ordered = [Wall, WallPeriphery, Valid, HoleArea, HoleCenter, Checkpoint];
        for pair in ordered.windows(2) {
            assert!(pair[0].rank() > pair[1].rank());
        }
        assert!(Wall.is_obstacle());
        assert!(WallPeriphery.is_obstacle());
        assert!(!Valid.is_obstacle());
        assert!(!Checkpoint.is_obstacle());
    }
}
