//! Ball kinematics and collision response
//!
//! Each tick the desired displacement is cut into substeps no longer than
//! the position step, and every substep probes the collision field at the
//! candidate position. Obstacles reflect the remaining displacement and the
//! velocity about the stored normal, hole centers absorb the ball, and
//! checkpoints fire once.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::cell::CellKind;
use super::course::Course;
use super::field::CollisionField;
use super::haptic::Haptic;
use crate::consts::*;
use crate::project;
use crate::settings::Settings;

/// Something the game rules need to react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyEvent {
    /// Ball fell into a hole (or left the board)
    Hole,
    /// A checkpoint was reached for the first time
    CheckpointReached { index: usize },
}

/// Integration parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Motion {
    pub tick_ms: u32,
    pub position_step: f32,
    pub acceleration_factor: f32,
    pub damping: f32,
    pub haptic_pulse_ms: u32,
}

impl Default for Motion {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

impl From<&Settings> for Motion {
    fn from(settings: &Settings) -> Self {
        Self {
            tick_ms: settings.time_step_size,
            position_step: settings.position_step_size,
            acceleration_factor: settings.acceleration_factor,
            damping: settings.damping_factor,
            haptic_pulse_ms: settings.haptic_pulse_ms,
        }
    }
}

impl Motion {
    #[inline]
    fn dt(&self) -> f32 {
        self.tick_ms as f32 / 1000.0
    }

    /// Number of substeps needed to cover `displacement`
    #[inline]
    fn substeps(&self, displacement: Vec2) -> u32 {
        let dist = displacement.length();
        if dist > self.position_step {
            (dist / self.position_step) as u32
        } else {
            1
        }
    }
}

/// The ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    motion: Motion,
}

impl Body {
    pub fn new(start: Vec2, radius: f32, motion: Motion) -> Self {
        Self {
            pos: start,
            vel: Vec2::ZERO,
            radius,
            motion,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.pos
    }

    pub fn velocity(&self) -> Vec2 {
        self.vel
    }

    pub fn motion(&self) -> &Motion {
        &self.motion
    }

    pub fn reset_position(&mut self, start: Vec2) {
        self.pos = start;
    }

    pub fn reset_velocity(&mut self) {
        self.vel = Vec2::ZERO;
    }

    /// Advance one tick under the given tilt acceleration.
    ///
    /// Returns the events of this tick in the order they happened. Wall
    /// impacts are reported to `haptic` directly.
    pub fn update(
        &mut self,
        accel: Vec2,
        field: &CollisionField,
        course: &mut Course,
        haptic: &mut impl Haptic,
    ) -> Vec<BodyEvent> {
        let m = self.motion;
        let dt = m.dt();
        let mut events = Vec::new();
        let start_pos = self.pos;
        let mut contacts: Vec<Vec2> = Vec::new();

        self.vel += accel * m.acceleration_factor * dt;

        let mut remaining = self.vel * dt;
        let mut steps = m.substeps(remaining);
        let mut dstep = remaining / steps as f32;
        let mut done = 0;
        let mut iterations = 0;

        while done < steps {
            iterations += 1;
            if iterations > MAX_SUBSTEP_ITERATIONS {
                log::warn!(
                    "Substep limit reached at {}, dropping rest of tick",
                    self.pos
                );
                break;
            }

            let cell = field.classify_point(self.pos + dstep);
            match cell.kind {
                CellKind::Wall | CellKind::WallPeriphery => {
                    let n = cell.normal;
                    if !contacts.contains(&n) {
                        contacts.push(n);
                    }

                    if n.dot(remaining) < 0.0 {
                        // Mirror about the normal, then give back part of
                        // the normal component
                        let removed_d = project(remaining, n);
                        let removed_v = project(self.vel, n);
                        remaining = remaining - 2.0 * removed_d + removed_d * m.damping;
                        self.vel = self.vel - 2.0 * removed_v + removed_v * m.damping;

                        steps = m.substeps(remaining);
                        dstep = remaining / steps as f32;
                        done = 0;
                    } else {
                        // Rasterized corners can report a normal we are
                        // already leaving along; nudge out instead
                        let shift = n.normalize_or_zero() * m.position_step;
                        self.pos += shift;
                        remaining -= shift;
                        done += 1;
                    }
                    continue;
                }
                CellKind::HoleCenter => {
                    self.reset_velocity();
                    events.push(BodyEvent::Hole);
                    break;
                }
                CellKind::Checkpoint => {
                    let index = cell.checkpoint;
                    if course.reach(index) {
                        events.push(BodyEvent::CheckpointReached { index });
                    }
                }
                CellKind::Valid | CellKind::HoleArea => {}
            }

            self.pos += dstep;
            remaining -= dstep;
            done += 1;
        }

        // A captured ball stays at rest until it respawns
        if !events.contains(&BodyEvent::Hole) {
            self.apply_funnel(field);
        }
        self.signal_impacts(start_pos, &contacts, haptic);

        events
    }

    /// Pull toward the hole center and bleed off orbiting motion
    fn apply_funnel(&mut self, field: &CollisionField) {
        let cell = field.classify_point(self.pos);
        if cell.kind != CellKind::HoleArea {
            return;
        }
        let n = cell.normal;
        let tangent = Vec2::new(n.y, -n.x);
        let orbit = project(self.vel, tangent);
        self.vel += n * FUNNEL_PULL;
        self.vel -= orbit * FUNNEL_TANGENT_DAMPING;
    }

    /// One pulse per contact normal the ball actually moved along this tick.
    /// Resting against a wall barely moves along its normal, so it stays quiet.
    fn signal_impacts(&self, start_pos: Vec2, contacts: &[Vec2], haptic: &mut impl Haptic) {
        let moved = self.pos - start_pos;
        for &n in contacts {
            if project(moved, n).length() > IMPACT_THRESHOLD {
                log::debug!("Impact along {} at {}", n, self.pos);
                haptic.pulse(self.motion.haptic_pulse_ms);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::haptic::{NullHaptic, PulseLog};
    use crate::sim::map::{CheckpointSpec, MapDescription, WallRect};
    use glam::IVec2;
    use proptest::prelude::*;

    fn wall_map() -> MapDescription {
        MapDescription {
            start: IVec2::new(40, 40),
            walls: vec![WallRect::from_corners(
                IVec2::new(100, 100),
                IVec2::new(200, 200),
            )],
            ..Default::default()
        }
    }

    fn hole_map() -> MapDescription {
        MapDescription {
            start: IVec2::new(40, 40),
            holes: vec![IVec2::new(400, 240)],
            ..Default::default()
        }
    }

    fn setup(map: &MapDescription) -> (CollisionField, Course) {
        let field = CollisionField::build(800, 480, map, 10, 12);
        let course = Course::new(map, 12.0);
        (field, course)
    }

    fn body_at(x: f32, y: f32, vel: Vec2) -> Body {
        let mut body = Body::new(Vec2::new(x, y), 10.0, Motion::default());
        body.vel = vel;
        body
    }

    #[test]
    fn test_free_motion() {
        let (field, mut course) = setup(&wall_map());
        let mut body = body_at(400.0, 300.0, Vec2::new(100.0, -50.0));

        let events = body.update(Vec2::ZERO, &field, &mut course, &mut NullHaptic);
        assert!(events.is_empty());
        assert!((body.pos - Vec2::new(402.0, 299.0)).length() < 1e-3);
        assert_eq!(body.vel, Vec2::new(100.0, -50.0));
    }

    #[test]
    fn test_acceleration_integrates_velocity() {
        let (field, mut course) = setup(&wall_map());
        let mut body = body_at(400.0, 300.0, Vec2::ZERO);

        // 1.5 * 100 * 0.02
        body.update(Vec2::new(1.5, 0.0), &field, &mut course, &mut NullHaptic);
        assert!((body.vel - Vec2::new(3.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_head_on_wall_bounce() {
        let (field, mut course) = setup(&wall_map());
        let mut haptic = PulseLog::new();
        let mut body = body_at(150.0, 87.0, Vec2::new(0.0, 200.0));

        let events = body.update(Vec2::ZERO, &field, &mut course, &mut haptic);
        assert!(events.is_empty());

        // v - 2p + 0.8p with p = (0, 200)
        assert!((body.vel - Vec2::new(0.0, -40.0)).length() < 1e-3);
        assert!(body.vel.y.abs() < 200.0);
        assert!(body.pos.y < 90.0);

        // Fresh impact: exactly one pulse
        assert_eq!(haptic.pulses, vec![HAPTIC_PULSE_MS]);
    }

    #[test]
    fn test_elastic_without_damping() {
        let (field, mut course) = setup(&wall_map());
        let motion = Motion {
            damping: 0.0,
            ..Motion::default()
        };
        let mut body = Body::new(Vec2::new(150.0, 87.0), 10.0, motion);
        body.vel = Vec2::new(0.0, 200.0);

        body.update(Vec2::ZERO, &field, &mut course, &mut NullHaptic);
        assert!((body.vel - Vec2::new(0.0, -200.0)).length() < 1e-3);
    }

    #[test]
    fn test_oblique_bounce_keeps_tangential_velocity() {
        let (field, mut course) = setup(&wall_map());
        let mut body = body_at(150.0, 87.0, Vec2::new(50.0, 200.0));

        body.update(Vec2::ZERO, &field, &mut course, &mut NullHaptic);
        assert!((body.vel - Vec2::new(50.0, -40.0)).length() < 1e-3);
    }

    #[test]
    fn test_resting_contact_is_quiet() {
        let (field, mut course) = setup(&wall_map());
        let mut haptic = PulseLog::new();
        let mut body = body_at(150.0, 89.5, Vec2::ZERO);
        let tilt = Vec2::new(0.0, 1.0);

        // Settle against the wall
        for _ in 0..50 {
            body.update(tilt, &field, &mut course, &mut haptic);
        }
        haptic.drain();

        for _ in 0..100 {
            let events = body.update(tilt, &field, &mut course, &mut haptic);
            assert!(events.is_empty());
            assert!(body.pos.y > 89.0 && body.pos.y < 90.0);
        }
        assert_eq!(haptic.count(), 0);
    }

    #[test]
    fn test_leaving_periphery_along_normal() {
        let (field, mut course) = setup(&wall_map());
        // Inside the band above the wall, moving away from it
        let mut body = body_at(150.0, 95.5, Vec2::new(0.0, -100.0));

        body.update(Vec2::ZERO, &field, &mut course, &mut NullHaptic);
        assert!((body.pos.y - 93.5).abs() < 1e-3);
        assert_eq!(body.vel, Vec2::new(0.0, -100.0));
    }

    #[test]
    fn test_hole_capture() {
        let (field, mut course) = setup(&hole_map());
        let mut body = body_at(390.5, 240.5, Vec2::new(500.0, 0.0));

        let events = body.update(Vec2::ZERO, &field, &mut course, &mut NullHaptic);
        assert_eq!(events, vec![BodyEvent::Hole]);
        assert_eq!(body.vel, Vec2::ZERO);
        // Stopped at the edge of the core
        assert!(body.pos.x < 398.0);
    }

    #[test]
    fn test_leaving_board_counts_as_hole() {
        let (field, mut course) = setup(&wall_map());
        let mut body = body_at(2.0, 240.5, Vec2::new(-300.0, 0.0));

        let events = body.update(Vec2::ZERO, &field, &mut course, &mut NullHaptic);
        assert_eq!(events, vec![BodyEvent::Hole]);
        assert_eq!(body.vel, Vec2::ZERO);
    }

    #[test]
    fn test_funnel_pulls_toward_center() {
        let (field, mut course) = setup(&hole_map());
        let mut body = body_at(408.5, 240.5, Vec2::ZERO);

        let events = body.update(Vec2::ZERO, &field, &mut course, &mut NullHaptic);
        assert!(events.is_empty());
        // Position unchanged, velocity biased toward the center
        assert_eq!(body.pos, Vec2::new(408.5, 240.5));
        let to_center = Vec2::new(400.0, 240.0) - body.pos;
        assert!(body.vel.dot(to_center) > 0.0);
        assert!(body.vel.x < -10.0);
    }

    #[test]
    fn test_funnel_damps_orbit() {
        let (field, mut course) = setup(&hole_map());
        let before = Vec2::new(0.0, 50.0);
        let mut body = body_at(408.5, 240.5, before);

        body.update(Vec2::ZERO, &field, &mut course, &mut NullHaptic);
        let n = field.classify_point(body.pos).normal;
        let tangent = Vec2::new(n.y, -n.x);
        let orbit_before = before.dot(tangent);
        let orbit_after = body.vel.dot(tangent);
        assert!((orbit_after - 0.7 * orbit_before).abs() < 1e-2);
    }

    #[test]
    fn test_checkpoint_fires_once() {
        let map = MapDescription {
            start: IVec2::new(40, 40),
            checkpoints: vec![CheckpointSpec {
                center: IVec2::new(400, 240),
                name: "1H".into(),
            }],
            ..Default::default()
        };
        let (field, mut course) = setup(&map);
        let mut body = body_at(380.5, 240.5, Vec2::new(500.0, 0.0));

        let events = body.update(Vec2::ZERO, &field, &mut course, &mut NullHaptic);
        assert_eq!(events, vec![BodyEvent::CheckpointReached { index: 0 }]);
        assert_eq!(course.start_point(), Vec2::new(400.0, 240.0));
        assert!(course.list_checkpoints()[0].is_reached());
        // Checkpoints do not stop the ball
        assert!((body.pos.x - 390.5).abs() < 1e-2);

        let events = body.update(Vec2::ZERO, &field, &mut course, &mut NullHaptic);
        assert!(events.is_empty());
    }

    #[test]
    fn test_degenerate_reflection_hits_safety_cap() {
        let (field, mut course) = setup(&wall_map());
        // Restoring the full normal component turns reflection into a no-op,
        // so the ball keeps bouncing off the same cell
        let motion = Motion {
            damping: 2.0,
            ..Motion::default()
        };
        let mut body = Body::new(Vec2::new(150.0, 89.5), 10.0, motion);
        body.vel = Vec2::new(0.0, 200.0);

        let events = body.update(Vec2::ZERO, &field, &mut course, &mut NullHaptic);
        assert!(events.is_empty());
        assert!(body.pos.y < 90.0);
    }

    #[test]
    fn test_determinism() {
        let map = MapDescription {
            holes: vec![IVec2::new(600, 300)],
            ..wall_map()
        };
        let (field, mut course1) = setup(&map);
        let mut course2 = course1.clone();
        let mut a = body_at(60.0, 60.0, Vec2::ZERO);
        let mut b = a.clone();

        for i in 0..300 {
            let t = i as f32 * 0.05;
            let tilt = Vec2::new(t.sin() * 3.0, (t * 0.7).cos() * 3.0);
            let ea = a.update(tilt, &field, &mut course1, &mut NullHaptic);
            let eb = b.update(tilt, &field, &mut course2, &mut NullHaptic);
            assert_eq!(ea, eb);
            assert_eq!(a.pos.to_array(), b.pos.to_array());
            assert_eq!(a.vel.to_array(), b.vel.to_array());
        }
    }

    proptest! {
        #[test]
        fn prop_trajectory_through_core_is_captured(angle in 0.0f32..std::f32::consts::TAU) {
            let (field, mut course) = setup(&hole_map());
            let dir = Vec2::from_angle(angle);
            let target = Vec2::new(400.5, 240.5);
            let mut body = body_at(0.0, 0.0, -dir * 600.0);
            body.pos = target + dir * 9.0;

            let events = body.update(Vec2::ZERO, &field, &mut course, &mut NullHaptic);
            let holes = events.iter().filter(|e| **e == BodyEvent::Hole).count();
            prop_assert_eq!(holes, 1);
            prop_assert_eq!(body.vel, Vec2::ZERO);
        }
    }
}
