//! Frame pacing for the interactive viewer.

use std::time::{Duration, Instant};

/// Sleeps out the remainder of each frame so the viewer loop runs at a
/// fixed rate.
#[derive(Debug, Clone, Copy)]
pub struct FrameLimiter {
    frame_time: Duration,
    last_frame: Instant,
}

impl FrameLimiter {
    /// Target `fps` frames per second. Zero is treated as one.
    pub fn new(fps: u64) -> Self {
        Self {
            frame_time: Duration::from_secs(1) / fps.clamp(1, u32::MAX as u64) as u32,
            last_frame: Instant::now(),
        }
    }

    /// Time budget of one frame.
    pub fn frame_time(&self) -> Duration {
        self.frame_time
    }

    /// Sleep until the current frame's budget is used up and return how
    /// long the frame took, sleep included.
    pub fn wait(&mut self) -> Duration {
        if let Some(rest) = self.frame_time.checked_sub(self.last_frame.elapsed()) {
            std::thread::sleep(rest);
        }
        let now = Instant::now();
        let frame = now.duration_since(self.last_frame);
        self.last_frame = now;
        frame
    }
}
