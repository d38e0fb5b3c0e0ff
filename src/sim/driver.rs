use std::f64::consts::TAU;

/// Cancellable per-frame clock. Measures time between display ticks while armed.
#[derive(Clone, Debug, Default)]
pub struct FrameClock {
    armed: bool,
    last_ms: Option<f64>,
}

impl FrameClock {
    /// Start accepting ticks. The next tick measures zero elapsed time.
    pub fn arm(&mut self) {
        self.armed = true;
        self.last_ms = None;
    }

    /// Drop the pending frame and forget the last timestamp.
    pub fn cancel(&mut self) {
        self.armed = false;
        self.last_ms = None;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Seconds since the previous tick, or `None` if the clock is cancelled.
    pub fn advance(&mut self, timestamp_ms: f64) -> Option<f64> {
        if !self.armed {
            return None;
        }
        let dt = self.since_last(timestamp_ms).unwrap_or(0.0);
        self.last_ms = Some(timestamp_ms);
        Some(dt)
    }

    /// Seconds between the last tick and `now_ms` without consuming a tick.
    /// Clock skew backwards reads as zero.
    pub fn since_last(&self, now_ms: f64) -> Option<f64> {
        self.last_ms.map(|last| ((now_ms - last) / 1000.0).max(0.0))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverState {
    Stopped,
    Running,
}

/// Phase accumulator for the beam marker.
#[derive(Clone, Debug)]
pub struct AnimationDriver {
    state: DriverState,
    phase: f64,
    clock: FrameClock,
}

impl Default for AnimationDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationDriver {
    pub fn new() -> Self {
        Self {
            state: DriverState::Stopped,
            phase: 0.0,
            clock: FrameClock::default(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.state == DriverState::Running
    }

    /// Accumulated phase in radians. Not reduced; only its value mod 2π matters.
    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn start(&mut self) {
        if self.state == DriverState::Running && self.clock.is_armed() {
            return;
        }
        self.state = DriverState::Running;
        self.clock.arm();
    }

    pub fn stop(&mut self) {
        self.state = DriverState::Stopped;
        self.clock.cancel();
    }

    pub fn reset_phase(&mut self) {
        self.phase = 0.0;
    }

    /// Advance by the time since the last tick. Returns the elapsed seconds,
    /// or `None` when stopped.
    pub fn tick(&mut self, timestamp_ms: f64, frequency: f64) -> Option<f64> {
        if self.state != DriverState::Running {
            return None;
        }
        let dt = self.clock.advance(timestamp_ms)?;
        self.phase += dt * frequency * TAU;
        Some(dt)
    }

    pub fn marker_index(&self, n: usize) -> usize {
        marker_index(self.phase, n)
    }
}

/// Which of `n` loop samples the beam sits on at `phase`.
pub fn marker_index(phase: f64, n: usize) -> usize {
    if n == 0 {
        return 0;
    }
    let wrapped = phase.rem_euclid(TAU);
    ((wrapped / TAU * n as f64).floor() as usize) % n
}
