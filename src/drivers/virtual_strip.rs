//! In-memory pixel strip for running without LED hardware.
//!
//! Tracks the visible frame only; `show` copies the staged buffer and logs
//! which buttons are lit at debug level.

use std::io;

use log::debug;

use super::{PixelStrip, Rgb};

pub struct VirtualStrip {
    staged: Vec<(Rgb, f32)>,
    visible: Vec<(Rgb, f32)>,
    frames: u64,
}

impl VirtualStrip {
    pub fn new(pixel_count: usize) -> Self {
        Self {
            staged: vec![((0, 0, 0), 0.0); pixel_count],
            visible: vec![((0, 0, 0), 0.0); pixel_count],
            frames: 0,
        }
    }

    /// Colour currently shown at `index`.
    pub fn pixel(&self, index: usize) -> Option<Rgb> {
        self.visible.get(index).map(|&(c, _)| c)
    }

    /// Number of frames pushed so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl PixelStrip for VirtualStrip {
    fn pixel_count(&self) -> usize {
        self.staged.len()
    }

    fn set_pixel(&mut self, index: usize, colour: Rgb, brightness: f32) {
        if let Some(px) = self.staged.get_mut(index) {
            *px = (colour, brightness);
        }
    }

    fn show(&mut self) -> io::Result<()> {
        self.visible.clone_from(&self.staged);
        self.frames += 1;
        let lit = self.visible.iter().filter(|(c, _)| *c != (0, 0, 0)).count();
        debug!("virtual strip: frame {} ({} pixels lit)", self.frames, lit);
        Ok(())
    }
}
