use std::time::Duration;

/// Turns variable frame times into a whole number of fixed simulation steps.
///
/// Leftover time carries over to the next frame. When a frame owes more than
/// `max_steps`, the backlog is dropped instead of replayed.
#[derive(Debug)]
pub struct FixedTimestep {
    step: Duration,
    max_steps: u32,
    accumulator: Duration,
}

impl FixedTimestep {
    pub fn new(step: Duration, max_steps: u32) -> Self {
        assert!(!step.is_zero(), "step must be non-zero");
        Self {
            step,
            max_steps,
            accumulator: Duration::ZERO,
        }
    }

    /// Fixed step at `hz` steps per second
    pub fn from_hz(hz: u32, max_steps: u32) -> Self {
        Self::new(Duration::from_secs(1) / hz.max(1), max_steps)
    }

    #[cfg(test)]
    pub fn step(&self) -> Duration {
        self.step
    }

    /// Add elapsed frame time and return how many steps to run now
    pub fn accumulate(&mut self, elapsed: Duration) -> u32 {
        self.accumulator += elapsed;

        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_steps {
            self.accumulator -= self.step;
            steps += 1;
        }

        if self.accumulator >= self.step {
            log::debug!(
                "Dropping {:.1} ms of simulation backlog",
                self.accumulator.as_secs_f64() * 1000.0
            );
            self.accumulator = Duration::ZERO;
        }

        steps
    }
}
