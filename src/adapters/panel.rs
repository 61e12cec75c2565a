//! Light panel adapter: maps logical buttons onto a pixel strip.
//!
//! Button `i` owns the contiguous pixel range `[i * w, (i + 1) * w)` where
//! `w` is the pixels-per-button width.  Every port call stages its pixels
//! and then flushes the strip once, so one logical operation is never
//! visible half-done.

use crate::app::ports::LightPanelPort;
use crate::drivers::{PixelStrip, Rgb};
use crate::error::{PanelError, Result};

const OFF: Rgb = (0, 0, 0);

pub struct LightPanel<S: PixelStrip> {
    strip: S,
    lights: usize,
    pixels_per_button: usize,
    /// Brightness written with "off" pixels.
    off_brightness: f32,
}

impl<S: PixelStrip> LightPanel<S> {
    pub fn new(strip: S, lights: usize, pixels_per_button: usize, off_brightness: f32) -> Self {
        debug_assert!(strip.pixel_count() >= lights * pixels_per_button);
        Self {
            strip,
            lights,
            pixels_per_button,
            off_brightness,
        }
    }

    pub fn strip(&self) -> &S {
        &self.strip
    }

    /// Pixel range behind button `index`.
    pub fn pixel_range(&self, index: usize) -> Result<std::ops::Range<usize>> {
        if index >= self.lights {
            return Err(PanelError::IndexOutOfRange {
                index,
                lights: self.lights,
            }
            .into());
        }
        let start = index * self.pixels_per_button;
        Ok(start..start + self.pixels_per_button)
    }

    fn fill(&mut self, index: usize, colour: Rgb, brightness: f32) -> Result<()> {
        for px in self.pixel_range(index)? {
            self.strip.set_pixel(px, colour, brightness);
        }
        self.show()
    }

    fn show(&mut self) -> Result<()> {
        self.strip.show().map_err(|e| PanelError::Driver(e).into())
    }
}

impl<S: PixelStrip> LightPanelPort for LightPanel<S> {
    fn light_button(&mut self, index: usize, colour: Rgb, brightness: f32) -> Result<()> {
        self.fill(index, colour, brightness)
    }

    fn clear_button(&mut self, index: usize) -> Result<()> {
        self.fill(index, OFF, self.off_brightness)
    }

    fn light_all(&mut self, colour: Rgb, brightness: f32) -> Result<()> {
        self.strip.set_all(colour, brightness);
        self.show()
    }

    fn clear_all(&mut self) -> Result<()> {
        self.strip.set_all(OFF, self.off_brightness);
        self.show()
    }
}
