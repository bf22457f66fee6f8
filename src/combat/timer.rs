//! Count-up timers polled with the frame delta

/// A one-shot timer. `tick` reports the frame it expires on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CombatTimer {
    duration: f32,
    elapsed: f32,
    running: bool,
}

impl CombatTimer {
    pub const fn new(duration: f32) -> Self {
        Self {
            duration,
            elapsed: 0.0,
            running: false,
        }
    }

    /// (Re)start from zero
    pub fn start(&mut self) {
        self.elapsed = 0.0;
        self.running = true;
    }

    /// Restart with a different duration (attack variants share one timer)
    pub fn start_with(&mut self, duration: f32) {
        self.duration = duration;
        self.start();
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Stop and rewind to zero
    pub fn reset(&mut self) {
        self.running = false;
        self.elapsed = 0.0;
    }

    /// Advance by `dt`. Returns true only on the tick the timer expires.
    pub fn tick(&mut self, dt: f32) -> bool {
        if !self.running {
            return false;
        }
        self.elapsed += dt;
        if self.elapsed >= self.duration {
            self.running = false;
            return true;
        }
        false
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Fraction of the duration elapsed, in `[0, 1]`
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (self.elapsed / self.duration).min(1.0)
    }
}
