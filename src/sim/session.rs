//! One play session over a shared collision field
//!
//! The field is immutable and can be shared between sessions. Everything a
//! session mutates (ball, checkpoint progress, respawn point) lives here.

use std::path::Path;
use std::sync::Arc;

use glam::Vec2;
use thiserror::Error;

use super::body::{Body, BodyEvent, Motion};
use super::checkpoint::Checkpoint;
use super::course::Course;
use super::field::CollisionField;
use super::haptic::Haptic;
use super::map::{MapDescription, MapError};
use crate::settings::{Settings, SettingsError};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("settings: {0}")]
    Settings(#[from] SettingsError),

    #[error("map: {0}")]
    Map(#[from] MapError),
}

pub struct Session<H: Haptic> {
    field: Arc<CollisionField>,
    course: Course,
    body: Body,
    haptic: H,
    respawn_delay_ms: u32,
    /// Remaining time before a captured ball respawns
    respawn_ms: u32,
    holes: u32,
}

impl<H: Haptic> Session<H> {
    pub fn new(
        field: Arc<CollisionField>,
        map: &MapDescription,
        settings: &Settings,
        haptic: H,
    ) -> Self {
        let course = Course::new(map, field.hole_radius() as f32);
        let body = Body::new(
            course.start_point(),
            field.ball_radius() as f32,
            Motion::from(settings),
        );
        Self {
            field,
            course,
            body,
            haptic,
            respawn_delay_ms: settings.respawn_delay_ms,
            respawn_ms: 0,
            holes: 0,
        }
    }

    /// Load a map file and build a fresh field for it
    pub fn load(
        settings: &Settings,
        map_path: impl AsRef<Path>,
        haptic: H,
    ) -> Result<Self, LoadError> {
        let map = MapDescription::load(map_path, |i| settings.checkpoint_name(i))?;
        let field = Arc::new(CollisionField::from_settings(settings, &map));
        Ok(Self::new(field, &map, settings, haptic))
    }

    /// Advance one tick.
    ///
    /// While a captured ball waits to respawn the input is ignored and no
    /// events are produced.
    pub fn update(&mut self, accel: Vec2) -> Vec<BodyEvent> {
        let tick_ms = self.body.motion().tick_ms;
        if self.respawn_ms > 0 {
            self.respawn_ms = self.respawn_ms.saturating_sub(tick_ms);
            if self.respawn_ms == 0 {
                self.respawn();
            }
            return Vec::new();
        }

        let events = self
            .body
            .update(accel, &self.field, &mut self.course, &mut self.haptic);

        if events.contains(&BodyEvent::Hole) {
            self.holes += 1;
            log::info!("Ball caught by hole #{} at {}", self.holes, self.body.pos);
            self.haptic.pulse(self.respawn_delay_ms);
            self.respawn_ms = self.respawn_delay_ms;
            if self.respawn_ms == 0 {
                self.respawn();
            }
        }
        events
    }

    fn respawn(&mut self) {
        self.reset_position();
        self.reset_velocity();
    }

    /// Ball position
    pub fn position(&self) -> Vec2 {
        self.body.position()
    }

    pub fn velocity(&self) -> Vec2 {
        self.body.velocity()
    }

    /// Move the ball to the active start point
    pub fn reset_position(&mut self) {
        self.body.reset_position(self.course.start_point());
    }

    pub fn reset_velocity(&mut self) {
        self.body.reset_velocity();
    }

    /// Restore the map's original start point
    pub fn reset_start_point(&mut self) {
        self.course.reset_start_point();
    }

    pub fn list_checkpoints(&self) -> &[Checkpoint] {
        self.course.list_checkpoints()
    }

    /// Start over: no checkpoints reached, ball at rest on the map start
    pub fn reset(&mut self) {
        self.course.reset();
        self.respawn_ms = 0;
        self.respawn();
        log::info!("Session reset");
    }

    pub fn is_respawning(&self) -> bool {
        self.respawn_ms > 0
    }

    /// Times the ball was caught by a hole
    pub fn holes(&self) -> u32 {
        self.holes
    }

    pub fn course(&self) -> &Course {
        &self.course
    }

    pub fn field(&self) -> &Arc<CollisionField> {
        &self.field
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn haptic(&self) -> &H {
        &self.haptic
    }

    pub fn haptic_mut(&mut self) -> &mut H {
        &mut self.haptic
    }
}
