//! APA102 ("DotStar") strip driver.
//!
//! Frame encoding lives in `apa102-spi`; this module keeps a staged
//! [`RGB8`] buffer and hands it to any [`SmartLedsWrite`] sink on `show`.
//! On Linux the sink is an `apa102_spi::Apa102` over a configured
//! `/dev/spidevB.C` bus (see [`open`]).  Host tests plug in a recording
//! writer instead.
//!
//! Brightness is applied per pixel by scaling the colour channels, so the
//! wire always carries full global brightness.

use std::fmt;
use std::io;

use smart_leds::{RGB8, SmartLedsWrite};

use super::{PixelStrip, Rgb};

pub struct SmartLedStrip<D> {
    driver: D,
    pixels: Vec<RGB8>,
}

impl<D> SmartLedStrip<D>
where
    D: SmartLedsWrite<Color = RGB8>,
    D::Error: fmt::Debug,
{
    pub fn new(driver: D, pixel_count: usize) -> Self {
        Self {
            driver,
            pixels: vec![RGB8::default(); pixel_count],
        }
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }
}

fn scale(channel: u8, brightness: f32) -> u8 {
    (f32::from(channel) * brightness.clamp(0.0, 1.0)).round() as u8
}

impl<D> PixelStrip for SmartLedStrip<D>
where
    D: SmartLedsWrite<Color = RGB8>,
    D::Error: fmt::Debug,
{
    fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    fn set_pixel(&mut self, index: usize, colour: Rgb, brightness: f32) {
        let (r, g, b) = colour;
        if let Some(px) = self.pixels.get_mut(index) {
            *px = RGB8::new(
                scale(r, brightness),
                scale(g, brightness),
                scale(b, brightness),
            );
        }
    }

    fn show(&mut self) -> io::Result<()> {
        self.driver
            .write(self.pixels.iter().copied())
            .map_err(|e| io::Error::other(format!("LED write failed: {e:?}")))
    }
}

/// APA102 strip on a Linux spidev bus.
#[cfg(target_os = "linux")]
pub type SpiApa102 = SmartLedStrip<apa102_spi::Apa102<linux_embedded_hal::SpidevBus>>;

/// Open and configure an SPI device node (mode 0, 8-bit words) and put an
/// APA102 encoder on it.
#[cfg(target_os = "linux")]
pub fn open(device: &std::path::Path, pixel_count: usize, speed_hz: u32) -> io::Result<SpiApa102> {
    use linux_embedded_hal::SpidevBus;
    use linux_embedded_hal::spidev::{SpiModeFlags, Spidev, SpidevOptions};

    let mut spi = Spidev::open(device)?;
    let options = SpidevOptions::new()
        .bits_per_word(8)
        .max_speed_hz(speed_hz)
        .mode(SpiModeFlags::SPI_MODE_0)
        .build();
    spi.configure(&options)?;
    log::debug!("SPI {} configured at {} Hz", device.display(), speed_hz);
    Ok(SmartLedStrip::new(
        apa102_spi::Apa102::new(SpidevBus(spi)),
        pixel_count,
    ))
}
