mod font;

pub use font::{BitmapFont, GLYPH_SIZE};

use std::time::Instant;

/// Averages frame times over one-second windows.
pub struct FPSCounter {
    frame_times: Vec<f32>,
    last_update: Instant,
    current_fps: f32,
}

impl FPSCounter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            frame_times: Vec::with_capacity(60),
            last_update: Instant::now(),
            current_fps: 0.0,
        }
    }

    pub fn update(&mut self, delta_time: f32) {
        self.frame_times.push(delta_time);

        let now = Instant::now();
        if now.duration_since(self.last_update).as_secs_f32() >= 1.0 {
            if !self.frame_times.is_empty() {
                let avg_frame_time =
                    self.frame_times.iter().sum::<f32>() / self.frame_times.len() as f32;
                if avg_frame_time > 0.0 {
                    self.current_fps = 1.0 / avg_frame_time;
                }
                self.frame_times.clear();
            }
            self.last_update = now;
        }
    }

    #[must_use]
    pub fn fps(&self) -> f32 {
        self.current_fps
    }
}

impl Default for FPSCounter {
    fn default() -> Self {
        Self::new()
    }
}
