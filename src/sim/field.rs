//! Rasterized collision field
//!
//! The board is precomputed once into a grid of [`Cell`]s so that every
//! collision query during simulation is a single array lookup. Construction
//! stamps primitives in a fixed order and later stamps overwrite earlier ones
//! inside their footprint:
//!
//! 1. walls
//! 2. holes (disk stencil with funnel normals)
//! 3. checkpoints
//! 4. wall periphery bands (normals accumulate where bands overlap)
//! 5. rounded wall corners (quarter disks, replace valid/hole-area cells only)

use glam::{IVec2, Vec2};

use super::cell::{Cell, CellKind};
use super::map::{MapDescription, WallRect};
use crate::consts::HOLE_NORM_EPSILON;
use crate::settings::Settings;
use crate::to_cell;

/// Precomputed cells relative to a center pixel
#[derive(Debug, Clone)]
struct Stencil {
    entries: Vec<(IVec2, Cell)>,
}

impl Stencil {
    /// Hole disk. Offsets are sampled at pixel centers relative to the
    /// hole center, and the offset used for the normal skips zero so the
    /// stencil is symmetric.
    fn hole(hole_radius: u32, ball_radius: u32) -> Self {
        let r = hole_radius as i32;
        let rf = hole_radius as f32;
        let outer_sq = rf * rf;
        let inner_sq = (rf - ball_radius as f32).powi(2);

        let mut entries = Vec::new();
        for fy in -r..r {
            for fx in -r..r {
                let dist_sq = (fx as f32 + 0.5).powi(2) + (fy as f32 + 0.5).powi(2);
                if dist_sq > outer_sq {
                    continue;
                }

                let sym = |v: i32| if v >= 0 { v + 1 } else { v };
                let scaled = -Vec2::new(sym(fx) as f32, sym(fy) as f32) / rf;
                let mut norm_sq = scaled.length_squared();
                if norm_sq == 0.0 {
                    norm_sq = HOLE_NORM_EPSILON;
                }

                let kind = if dist_sq <= inner_sq {
                    CellKind::HoleCenter
                } else {
                    CellKind::HoleArea
                };
                entries.push((
                    IVec2::new(fx, fy),
                    Cell {
                        kind,
                        normal: scaled / norm_sq,
                        checkpoint: 0,
                    },
                ));
            }
        }
        Self { entries }
    }

    /// Full disk of periphery with outward radial normals, used a quarter at
    /// a time to round wall corners. The center row and column are omitted
    /// since no quarter uses them.
    fn corner(ball_radius: u32) -> Self {
        let r = ball_radius as i32;
        let rf = ball_radius as f32;

        let mut entries = Vec::new();
        for dy in -r..=r {
            for dx in -r..=r {
                if dx == 0 || dy == 0 || dx * dx + dy * dy > r * r {
                    continue;
                }
                entries.push((
                    IVec2::new(dx, dy),
                    Cell {
                        kind: CellKind::WallPeriphery,
                        normal: Vec2::new(dx as f32, dy as f32) / rf,
                        checkpoint: 0,
                    },
                ));
            }
        }
        Self { entries }
    }

    /// Entries in the quadrant given by the sign of each axis
    fn quadrant(&self, sign: IVec2) -> impl Iterator<Item = &(IVec2, Cell)> {
        self.entries
            .iter()
            .filter(move |(offset, _)| offset.x.signum() == sign.x && offset.y.signum() == sign.y)
    }
}

/// Immutable per-pixel classification of a board
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionField {
    width: u32,
    height: u32,
    ball_radius: u32,
    hole_radius: u32,
    cells: Vec<Cell>,
}

impl CollisionField {
    /// Build the field for a map using the configured geometry. A hole
    /// radius in the map overrides the configured one.
    pub fn from_settings(settings: &Settings, map: &MapDescription) -> Self {
        Self::build(
            settings.screen_width,
            settings.screen_height,
            map,
            settings.ball_radius,
            map.hole_radius.unwrap_or(settings.hole_radius),
        )
    }

    pub fn build(
        width: u32,
        height: u32,
        map: &MapDescription,
        ball_radius: u32,
        hole_radius: u32,
    ) -> Self {
        let mut field = Self {
            width,
            height,
            ball_radius,
            hole_radius,
            cells: vec![Cell::default(); width as usize * height as usize],
        };

        warn_overlaps(map);

        for wall in &map.walls {
            field.fill(wall.min, wall.max, |cell| cell.kind = CellKind::Wall);
        }

        let hole = Stencil::hole(hole_radius, ball_radius);
        for &center in &map.holes {
            for (offset, stamp) in &hole.entries {
                if let Some(cell) = field.cell_mut(center + *offset) {
                    cell.kind = stamp.kind;
                    cell.normal = stamp.normal;
                }
            }
        }

        let r = hole_radius as i32;
        for (index, checkpoint) in map.checkpoints.iter().enumerate() {
            let c = checkpoint.center;
            for y in c.y - r..=c.y + r {
                for x in c.x - r..=c.x + r {
                    let d = IVec2::new(x, y) - c;
                    if d.length_squared() > r * r {
                        continue;
                    }
                    if let Some(cell) = field.cell_mut(IVec2::new(x, y)) {
                        cell.kind = CellKind::Checkpoint;
                        cell.checkpoint = index;
                    }
                }
            }
        }

        for wall in &map.walls {
            field.add_periphery_bands(wall);
        }

        let corner = Stencil::corner(ball_radius);
        for wall in &map.walls {
            field.round_corners(wall, &corner);
        }

        log::info!(
            "Collision field built: {}x{}, ball radius {}, hole radius {}",
            width,
            height,
            ball_radius,
            hole_radius
        );
        field
    }

    /// Cell at a grid coordinate. Anything off the grid reads as a hole center.
    #[inline]
    pub fn classify(&self, x: i32, y: i32) -> Cell {
        self.index(IVec2::new(x, y))
            .map(|i| self.cells[i])
            .unwrap_or(Cell::OUT_OF_BOUNDS)
    }

    /// Cell containing a continuous position
    #[inline]
    pub fn classify_point(&self, pos: Vec2) -> Cell {
        let p = to_cell(pos);
        self.classify(p.x, p.y)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn ball_radius(&self) -> u32 {
        self.ball_radius
    }

    pub fn hole_radius(&self) -> u32 {
        self.hole_radius
    }

    /// Downsampled character map of the classification, one glyph per
    /// `step` pixels in each direction
    pub fn render_ascii(&self, step: u32) -> String {
        let step = step.max(1) as usize;
        let mut out = String::new();
        for y in (0..self.height as i32).step_by(step) {
            for x in (0..self.width as i32).step_by(step) {
                out.push(self.classify(x, y).kind.glyph());
            }
            out.push('\n');
        }
        out
    }

    #[inline]
    fn index(&self, p: IVec2) -> Option<usize> {
        if p.x < 0 || p.y < 0 || p.x >= self.width as i32 || p.y >= self.height as i32 {
            return None;
        }
        Some(p.y as usize * self.width as usize + p.x as usize)
    }

    #[inline]
    fn cell_mut(&mut self, p: IVec2) -> Option<&mut Cell> {
        let i = self.index(p)?;
        Some(&mut self.cells[i])
    }

    /// Apply `f` to every cell in `[min, max)`, clipped to the grid
    fn fill(&mut self, min: IVec2, max: IVec2, mut f: impl FnMut(&mut Cell)) {
        let lo = min.max(IVec2::ZERO);
        let hi = max.min(IVec2::new(self.width as i32, self.height as i32));
        for y in lo.y..hi.y {
            for x in lo.x..hi.x {
                if let Some(cell) = self.cell_mut(IVec2::new(x, y)) {
                    f(cell);
                }
            }
        }
    }

    fn add_periphery_bands(&mut self, wall: &WallRect) {
        let r = self.ball_radius as i32;
        let (min, max) = (wall.min, wall.max);

        let bands = [
            // above
            (IVec2::new(min.x, min.y - r), IVec2::new(max.x, min.y), Vec2::NEG_Y),
            // below
            (IVec2::new(min.x, max.y), IVec2::new(max.x, max.y + r), Vec2::Y),
            // left
            (IVec2::new(min.x - r, min.y), IVec2::new(min.x, max.y), Vec2::NEG_X),
            // right
            (IVec2::new(max.x, min.y), IVec2::new(max.x + r, max.y), Vec2::X),
        ];

        for (lo, hi, normal) in bands {
            self.fill(lo, hi, |cell| {
                if cell.kind == CellKind::Wall {
                    return;
                }
                cell.normal += normal;
                // Kind is forced, never summed
                if cell.kind.rank() <= CellKind::Valid.rank() {
                    cell.kind = CellKind::WallPeriphery;
                }
            });
        }
    }

    fn round_corners(&mut self, wall: &WallRect, corner: &Stencil) {
        let (min, max) = (wall.min, wall.max);
        let corners = [
            (IVec2::new(min.x, min.y), IVec2::new(-1, -1)),
            (IVec2::new(max.x - 1, min.y), IVec2::new(1, -1)),
            (IVec2::new(min.x, max.y - 1), IVec2::new(-1, 1)),
            (IVec2::new(max.x - 1, max.y - 1), IVec2::new(1, 1)),
        ];

        for (origin, sign) in corners {
            for (offset, stamp) in corner.quadrant(sign) {
                if let Some(cell) = self.cell_mut(origin + *offset) {
                    if matches!(cell.kind, CellKind::Valid | CellKind::HoleArea) {
                        *cell = *stamp;
                    }
                }
            }
        }
    }
}

/// Overlapping primitives are legal (later stamps win) but usually a map
/// authoring mistake, so point them out.
fn warn_overlaps(map: &MapDescription) {
    for hole in &map.holes {
        if map.walls.iter().any(|w| w.contains(*hole)) {
            log::warn!("Hole at {} lies inside a wall", hole);
        }
    }
    for checkpoint in &map.checkpoints {
        if map.walls.iter().any(|w| w.contains(checkpoint.center)) {
            log::warn!(
                "Checkpoint {} at {} lies inside a wall",
                checkpoint.name,
                checkpoint.center
            );
        }
    }
}
