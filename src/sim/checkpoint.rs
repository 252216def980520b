//! Checkpoints and their reached state

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::map::CheckpointSpec;

/// A circular checkpoint on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    position: Vec2,
    radius: f32,
    name: String,
    reached: bool,
}

impl Checkpoint {
    pub fn new(position: Vec2, radius: f32, name: impl Into<String>) -> Self {
        Self {
            position,
            radius,
            name: name.into(),
            reached: false,
        }
    }

    pub fn is_reached(&self) -> bool {
        self.reached
    }

    /// Mark as reached. Returns `true` only on the transition, so a second
    /// call is a no-op.
    pub fn mark_reached(&mut self) -> bool {
        if self.reached {
            return false;
        }
        self.reached = true;
        true
    }

    pub fn reset(&mut self) {
        self.reached = false;
    }

    pub fn center(&self) -> Vec2 {
        self.position
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// All checkpoints of a map, indexed by the number stamped into the field
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckpointRegistry {
    checkpoints: Vec<Checkpoint>,
}

impl CheckpointRegistry {
    pub fn from_specs(specs: &[CheckpointSpec], radius: f32) -> Self {
        Self {
            checkpoints: specs
                .iter()
                .map(|spec| Checkpoint::new(spec.center.as_vec2(), radius, spec.name.clone()))
                .collect(),
        }
    }

    pub fn get(&self, index: usize) -> Option<&Checkpoint> {
        self.checkpoints.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Checkpoint> {
        self.checkpoints.get_mut(index)
    }

    pub fn as_slice(&self) -> &[Checkpoint] {
        &self.checkpoints
    }

    pub fn iter(&self) -> impl Iterator<Item = &Checkpoint> {
        self.checkpoints.iter()
    }

    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }

    /// Every checkpoint reached (false for a map without checkpoints)
    pub fn all_reached(&self) -> bool {
        !self.checkpoints.is_empty() && self.checkpoints.iter().all(Checkpoint::is_reached)
    }

    pub fn reset_all(&mut self) {
        for checkpoint in &mut self.checkpoints {
            checkpoint.reset();
        }
    }
}
