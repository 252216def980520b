//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - The collision field is built once and never mutated afterwards
//! - Haptic output goes through the `Haptic` trait, never to hardware directly
//! - No rendering or platform dependencies

pub mod body;
pub mod cell;
pub mod checkpoint;
pub mod course;
pub mod field;
pub mod haptic;
pub mod map;
pub mod session;
pub mod tick;

pub use body::{Body, BodyEvent, Motion};
pub use cell::{Cell, CellKind};
pub use checkpoint::{Checkpoint, CheckpointRegistry};
pub use course::Course;
pub use field::CollisionField;
pub use haptic::{Haptic, NullHaptic, PulseLog, PulseTimer};
pub use map::{CheckpointSpec, MapDescription, MapError, WallRect};
pub use session::{LoadError, Session};
pub use tick::{FixedTimestep, TickInput, tick};
