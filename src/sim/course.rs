//! Per-session progress over a map
//!
//! The collision field is shared geometry. Which checkpoints have been
//! reached, and where the ball respawns, belong to one play session.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::checkpoint::{Checkpoint, CheckpointRegistry};
use super::map::MapDescription;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    checkpoints: CheckpointRegistry,
    default_start: Vec2,
    start: Vec2,
}

impl Course {
    /// Checkpoints share the hole radius
    pub fn new(map: &MapDescription, checkpoint_radius: f32) -> Self {
        let start = map.start.as_vec2();
        Self {
            checkpoints: CheckpointRegistry::from_specs(&map.checkpoints, checkpoint_radius),
            default_start: start,
            start,
        }
    }

    /// Where the ball respawns
    pub fn start_point(&self) -> Vec2 {
        self.start
    }

    pub fn set_start_point(&mut self, start: Vec2) {
        self.start = start;
    }

    pub fn reset_start_point(&mut self) {
        self.start = self.default_start;
    }

    pub fn list_checkpoints(&self) -> &[Checkpoint] {
        self.checkpoints.as_slice()
    }

    pub fn checkpoints(&self) -> &CheckpointRegistry {
        &self.checkpoints
    }

    pub fn all_reached(&self) -> bool {
        self.checkpoints.all_reached()
    }

    /// Mark a checkpoint reached and move the respawn point onto it.
    /// Returns `false` for unknown or already reached checkpoints.
    pub fn reach(&mut self, index: usize) -> bool {
        let Some(checkpoint) = self.checkpoints.get_mut(index) else {
            return false;
        };
        if !checkpoint.mark_reached() {
            return false;
        }
        self.start = checkpoint.center();
        log::info!("Checkpoint {} ({}) reached", index, checkpoint.name());
        true
    }

    /// Forget all progress
    pub fn reset(&mut self) {
        self.checkpoints.reset_all();
        self.reset_start_point();
    }
}
