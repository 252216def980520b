//! Map description: the geometric primitives a board is built from
//!
//! Text format, one primitive per line:
//!
//! ```text
//! # comment
//! s 40 40            start point
//! r 12               hole radius override
//! w 0 0 800 10       wall rectangle (two corners)
//! h 300 200          hole center
//! c 700 400          checkpoint center
//! ```

use std::path::Path;

use glam::IVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: unknown primitive `{tag}`")]
    UnknownTag { line: usize, tag: String },

    #[error("line {line}: `{tag}` expects {expected} values, found {found}")]
    Arity {
        line: usize,
        tag: char,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: invalid number `{value}`")]
    Number { line: usize, value: String },

    #[error("line {line}: hole radius must be positive")]
    Radius { line: usize },
}

/// Axis-aligned wall covering `[min.x, max.x) x [min.y, max.y)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WallRect {
    pub min: IVec2,
    pub max: IVec2,
}

impl WallRect {
    /// Build from any two opposite corners
    pub fn from_corners(a: IVec2, b: IVec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    #[inline]
    pub fn contains(&self, p: IVec2) -> bool {
        p.x >= self.min.x && p.x < self.max.x && p.y >= self.min.y && p.y < self.max.y
    }
}

/// Checkpoint as placed on the map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointSpec {
    pub center: IVec2,
    pub name: String,
}

/// Everything needed to build a collision field, in load order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapDescription {
    pub start: IVec2,
    /// Overrides the configured hole radius when present
    pub hole_radius: Option<u32>,
    pub walls: Vec<WallRect>,
    pub holes: Vec<IVec2>,
    pub checkpoints: Vec<CheckpointSpec>,
}

impl MapDescription {
    /// Parse a map. `names` provides checkpoint display names by index.
    pub fn parse(text: &str, names: impl Fn(usize) -> String) -> Result<Self, MapError> {
        let mut map = MapDescription::default();
        let mut has_start = false;

        for (i, raw) in text.lines().enumerate() {
            let line = i + 1;
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let mut parts = trimmed.split_whitespace();
            let tag = parts.next().unwrap_or_default();
            let args: Vec<&str> = parts.collect();

            match tag {
                "s" => {
                    let [x, y] = numbers::<2>(line, 's', &args)?;
                    map.start = IVec2::new(x, y);
                    has_start = true;
                }
                "r" => {
                    let [r] = numbers::<1>(line, 'r', &args)?;
                    if r <= 0 {
                        return Err(MapError::Radius { line });
                    }
                    map.hole_radius = Some(r as u32);
                }
                "w" => {
                    let [x1, y1, x2, y2] = numbers::<4>(line, 'w', &args)?;
                    map.walls
                        .push(WallRect::from_corners(IVec2::new(x1, y1), IVec2::new(x2, y2)));
                }
                "h" => {
                    let [x, y] = numbers::<2>(line, 'h', &args)?;
                    map.holes.push(IVec2::new(x, y));
                }
                "c" => {
                    let [x, y] = numbers::<2>(line, 'c', &args)?;
                    let name = names(map.checkpoints.len());
                    map.checkpoints.push(CheckpointSpec {
                        center: IVec2::new(x, y),
                        name,
                    });
                }
                other => {
                    return Err(MapError::UnknownTag {
                        line,
                        tag: other.to_string(),
                    });
                }
            }
        }

        if !has_start {
            log::warn!("Map has no start point, using origin");
        }

        log::info!(
            "Map loaded: {} walls, {} holes, {} checkpoints",
            map.walls.len(),
            map.holes.len(),
            map.checkpoints.len()
        );
        Ok(map)
    }

    /// Load and parse a map file
    pub fn load(path: impl AsRef<Path>, names: impl Fn(usize) -> String) -> Result<Self, MapError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text, names)
    }
}

fn numbers<const N: usize>(line: usize, tag: char, args: &[&str]) -> Result<[i32; N], MapError> {
    if args.len() != N {
        return Err(MapError::Arity {
            line,
            tag,
            expected: N,
            found: args.len(),
        });
    }
    let mut out = [0; N];
    for (slot, arg) in out.iter_mut().zip(args) {
        *slot = arg.parse().map_err(|_| MapError::Number {
            line,
            value: arg.to_string(),
        })?;
    }
    Ok(out)
}
