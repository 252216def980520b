//! Tilt input sources
//!
//! A tilt source produces the acceleration fed into each tick. Reading a
//! real accelerometer is left to the embedding application; the sources
//! here cover keyboard control, scripted playback and seeded noise.

use std::collections::HashSet;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Tilt applied per axis while an arrow key is held
pub const KEY_TILT: f32 = 7.0;

/// Something that can be polled for the current board tilt
pub trait TiltSource {
    /// Whether the source is usable. Callers fall back to another source
    /// when this returns `false`.
    fn status(&self) -> bool {
        true
    }

    /// Current tilt, in input units before the acceleration factor
    fn acceleration(&mut self) -> Vec2;
}

impl<T: TiltSource + ?Sized> TiltSource for Box<T> {
    fn status(&self) -> bool {
        (**self).status()
    }

    fn acceleration(&mut self) -> Vec2 {
        (**self).acceleration()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
}

/// Arrow key state mapped to a fixed tilt per axis.
///
/// Up wins over Down and Left wins over Right when both are held.
#[derive(Debug, Clone, Default)]
pub struct KeyTilt {
    pressed: HashSet<Key>,
}

impl KeyTilt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: Key) {
        self.pressed.insert(key);
    }

    pub fn release(&mut self, key: Key) {
        self.pressed.remove(&key);
    }

    pub fn is_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    pub fn clear(&mut self) {
        self.pressed.clear();
    }
}

impl TiltSource for KeyTilt {
    fn acceleration(&mut self) -> Vec2 {
        let y = if self.is_pressed(Key::Up) {
            -KEY_TILT
        } else if self.is_pressed(Key::Down) {
            KEY_TILT
        } else {
            0.0
        };
        let x = if self.is_pressed(Key::Left) {
            -KEY_TILT
        } else if self.is_pressed(Key::Right) {
            KEY_TILT
        } else {
            0.0
        };
        Vec2::new(x, y)
    }
}

/// Replays a fixed list of tilts, one per poll, wrapping around at the end
#[derive(Debug, Clone)]
pub struct ScriptedTilt {
    steps: Vec<Vec2>,
    cursor: usize,
}

impl ScriptedTilt {
    pub fn new(steps: Vec<Vec2>) -> Self {
        Self { steps, cursor: 0 }
    }

    /// Hold each tilt for `ticks` polls
    pub fn held(steps: &[Vec2], ticks: usize) -> Self {
        let steps = steps
            .iter()
            .flat_map(|&tilt| std::iter::repeat_n(tilt, ticks))
            .collect();
        Self::new(steps)
    }
}

impl TiltSource for ScriptedTilt {
    fn status(&self) -> bool {
        !self.steps.is_empty()
    }

    fn acceleration(&mut self) -> Vec2 {
        if self.steps.is_empty() {
            return Vec2::ZERO;
        }
        let tilt = self.steps[self.cursor];
        self.cursor = (self.cursor + 1) % self.steps.len();
        tilt
    }
}

/// Base tilt plus seeded uniform noise on each axis
#[derive(Debug, Clone)]
pub struct JitterTilt {
    base: Vec2,
    amplitude: f32,
    rng: Pcg32,
}

impl JitterTilt {
    pub fn new(base: Vec2, amplitude: f32, seed: u64) -> Self {
        Self {
            base,
            amplitude: amplitude.abs(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn set_base(&mut self, base: Vec2) {
        self.base = base;
    }
}

impl TiltSource for JitterTilt {
    fn acceleration(&mut self) -> Vec2 {
        if self.amplitude == 0.0 {
            return self.base;
        }
        let a = self.amplitude;
        self.base
            + Vec2::new(
                self.rng.random_range(-a..=a),
                self.rng.random_range(-a..=a),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_tilt() {
        let mut keys = KeyTilt::new();
        assert_eq!(keys.acceleration(), Vec2::ZERO);

        keys.press(Key::Down);
        keys.press(Key::Right);
        assert_eq!(keys.acceleration(), Vec2::new(7.0, 7.0));

        // Up and Left take precedence
        keys.press(Key::Up);
        keys.press(Key::Left);
        assert_eq!(keys.acceleration(), Vec2::new(-7.0, -7.0));

        keys.release(Key::Up);
        keys.release(Key::Right);
        assert_eq!(keys.acceleration(), Vec2::new(-7.0, 7.0));

        keys.clear();
        assert_eq!(keys.acceleration(), Vec2::ZERO);
        assert!(keys.status());
    }

    #[test]
    fn test_scripted_tilt_wraps() {
        let mut script = ScriptedTilt::held(&[Vec2::X, Vec2::Y], 2);
        let polled: Vec<Vec2> = (0..5).map(|_| script.acceleration()).collect();
        assert_eq!(polled, vec![Vec2::X, Vec2::X, Vec2::Y, Vec2::Y, Vec2::X]);

        let mut empty = ScriptedTilt::new(Vec::new());
        assert!(!empty.status());
        assert_eq!(empty.acceleration(), Vec2::ZERO);
    }

    #[test]
    fn test_jitter_tilt_seeded() {
        let base = Vec2::new(1.0, -2.0);
        let mut a = JitterTilt::new(base, 0.5, 42);
        let mut b = JitterTilt::new(base, 0.5, 42);
        for _ in 0..100 {
            let tilt = a.acceleration();
            assert_eq!(tilt, b.acceleration());
            assert!((tilt - base).abs().max_element() <= 0.5);
        }

        let mut still = JitterTilt::new(base, 0.0, 7);
        assert_eq!(still.acceleration(), base);
    }

    #[test]
    fn test_boxed_source() {
        let mut source: Box<dyn TiltSource> = Box::new(ScriptedTilt::new(vec![Vec2::NEG_X]));
        assert!(source.status());
        assert_eq!(source.acceleration(), Vec2::NEG_X);
    }
}
