//! Haptic feedback sinks
//!
//! The simulation only ever asks for a pulse of a given length and never
//! waits for the actuator. Driving real hardware is up to the implementor.

/// Fire-and-forget vibration actuator
pub trait Haptic {
    fn pulse(&mut self, duration_ms: u32);
}

impl<H: Haptic + ?Sized> Haptic for &mut H {
    fn pulse(&mut self, duration_ms: u32) {
        (**self).pulse(duration_ms)
    }
}

impl<H: Haptic + ?Sized> Haptic for Box<H> {
    fn pulse(&mut self, duration_ms: u32) {
        (**self).pulse(duration_ms)
    }
}

/// Discards every pulse
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHaptic;

impl Haptic for NullHaptic {
    fn pulse(&mut self, _duration_ms: u32) {}
}

/// Records pulse durations in order
#[derive(Debug, Clone, Default)]
pub struct PulseLog {
    pub pulses: Vec<u32>,
}

impl PulseLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.pulses.len()
    }

    /// Take the recorded pulses, leaving the log empty
    pub fn drain(&mut self) -> Vec<u32> {
        std::mem::take(&mut self.pulses)
    }
}

impl Haptic for PulseLog {
    fn pulse(&mut self, duration_ms: u32) {
        self.pulses.push(duration_ms);
    }
}

/// On/off state of a vibration motor with a cooldown.
///
/// A pulse switches the motor on and (re)arms the cooldown; `update` is
/// called once per tick and switches it off when the cooldown runs out.
#[derive(Debug, Clone, Default)]
pub struct PulseTimer {
    remaining_ms: u32,
    active: bool,
}

impl PulseTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn remaining_ms(&self) -> u32 {
        self.remaining_ms
    }

    /// Advance the cooldown. Returns `true` on the tick the motor switches off.
    pub fn update(&mut self, elapsed_ms: u32) -> bool {
        if !self.active {
            return false;
        }
        self.remaining_ms = self.remaining_ms.saturating_sub(elapsed_ms);
        if self.remaining_ms == 0 {
            self.active = false;
            return true;
        }
        false
    }

    /// Switch off immediately
    pub fn stop(&mut self) {
        self.active = false;
        self.remaining_ms = 0;
    }
}

impl Haptic for PulseTimer {
    fn pulse(&mut self, duration_ms: u32) {
        self.remaining_ms = duration_ms;
        self.active = duration_ms > 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pulse_log() {
        let mut log = PulseLog::new();
        {
            let sink: &mut dyn Haptic = &mut log;
            sink.pulse(100);
            sink.pulse(500);
        }
        assert_eq!(log.count(), 2);
        assert_eq!(log.drain(), vec![100, 500]);
        assert_eq!(log.count(), 0);
    }

    #[test]
    fn test_pulse_timer_cooldown() {
        let mut timer = PulseTimer::new();
        assert!(!timer.update(20));

        timer.pulse(50);
        assert!(timer.is_active());
        assert!(!timer.update(20));
        assert!(!timer.update(20));
        assert!(timer.update(20));
        assert!(!timer.is_active());

        // A new pulse re-arms the cooldown
        timer.pulse(100);
        timer.update(60);
        timer.pulse(100);
        assert_eq!(timer.remaining_ms(), 100);

        timer.stop();
        assert!(!timer.is_active());
        assert_eq!(timer.remaining_ms(), 0);
    }
}
