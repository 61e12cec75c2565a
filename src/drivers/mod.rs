//! Pixel strip drivers behind the light panel.

pub mod apa102;
pub mod virtual_strip;

use std::io;

/// Colour as (R, G, B) tuple, each 0–255.
pub type Rgb = (u8, u8, u8);

/// An addressable LED strip with a frame buffer.
///
/// `set_pixel` only touches the buffer; nothing is visible until `show`
/// pushes the whole frame out.
pub trait PixelStrip {
    fn pixel_count(&self) -> usize;

    /// Stage one pixel.  Indices past the end are ignored.
    fn set_pixel(&mut self, index: usize, colour: Rgb, brightness: f32);

    /// Stage every pixel.
    fn set_all(&mut self, colour: Rgb, brightness: f32) {
        for i in 0..self.pixel_count() {
            self.set_pixel(i, colour, brightness);
        }
    }

    /// Push the staged frame to the LEDs.
    fn show(&mut self) -> io::Result<()>;
}
