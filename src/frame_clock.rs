use log::{info, trace};

// Monotonic clock handed to the visual each frame, plus a running estimate of
// the frame rate against the configured budget.
#[derive(Debug)]
pub struct FrameClock {
    start: std::time::Instant,
    iteration_start: std::time::Instant,
    pub iteration_duration: std::time::Duration,
    fps_estimate: f64,
}

// Weight of the newest frame in the running average.
const SMOOTHING: f64 = 0.1;

impl FrameClock {
    pub fn new(fps: f64) -> FrameClock {
        let now = std::time::Instant::now();
        FrameClock {
            start: now,
            iteration_start: now,
            iteration_duration: std::time::Duration::from_secs_f64(1.0 / fps.max(1.0)),
            fps_estimate: fps,
        }
    }

    /// Seconds since the clock was created.
    pub fn elapsed(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }

    // Marks the end of a frame and returns its duration.
    pub fn tick(&mut self) -> std::time::Duration {
        let budget_end = self.iteration_start + self.iteration_duration;
        let now = std::time::Instant::now();
        if now > budget_end {
            info!("Over time budget by: {:?}", now - budget_end);
        }
        let delta_t = now - self.iteration_start;
        self.iteration_start = now;
        let dt = delta_t.as_secs_f64();
        if dt > 0.0 {
            self.fps_estimate += SMOOTHING * (1.0 / dt - self.fps_estimate);
        }
        trace!("Frame time: {:?}, fps: {:.1}", delta_t, self.fps_estimate);
        delta_t
    }
}
