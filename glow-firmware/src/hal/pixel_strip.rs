// Neopixel-Strip über das RMT Peripheral
//
// Implementiert den PixelStrip-Trait aus glow-core für echte Hardware.

use esp_hal::Blocking;
use esp_hal::rmt::Rmt;
use esp_hal::time::Rate;
use esp_hal_smartled::SmartLedsAdapter;
use rgb::RGB8;
use smart_leds::brightness;
use smart_leds_trait::SmartLedsWrite;

use crate::config::PIXEL_COUNT;
use crate::{LedError, PixelStrip};

/// Buffer-Größe für den Strip (24 Bits pro LED + 1 Reset)
pub const PIXEL_BUFFER_SIZE: usize = PIXEL_COUNT * 24 + 1;

/// Real Hardware Pixel Strip
///
/// Nutzt ESP32 RMT Peripheral um WS2812 LEDs anzusteuern und wendet
/// die globale Helligkeit auf jeden Frame an.
///
/// Hinweis: Der Buffer muss 'static sein, daher wird er im Task erstellt
/// und als Parameter übergeben statt im Constructor allokiert.
pub struct RmtPixelStrip<'a> {
    leds: SmartLedsAdapter<'a, PIXEL_BUFFER_SIZE>,
    brightness: u8,
}

impl<'a> RmtPixelStrip<'a> {
    /// Erstellt einen neuen RmtPixelStrip
    ///
    /// # Parameter
    /// - `gpio8`: GPIO8 Peripheral für die Datenleitung
    /// - `rmt_peripheral`: RMT Peripheral
    /// - `rmt_clock_mhz`: RMT Clock Frequenz in MHz (z.B. 80)
    /// - `buffer`: Buffer für LED-Daten (erstellt mit smart_led_buffer! Macro)
    /// - `brightness`: globale Helligkeit 0-255
    pub fn new(
        gpio8: esp_hal::peripherals::GPIO8<'a>,
        rmt_peripheral: esp_hal::peripherals::RMT<'a>,
        rmt_clock_mhz: u32,
        buffer: &'a mut [esp_hal::rmt::PulseCode; PIXEL_BUFFER_SIZE],
        brightness: u8,
    ) -> Result<Self, LedError> {
        let rmt: Rmt<'a, Blocking> = Rmt::new(rmt_peripheral, Rate::from_mhz(rmt_clock_mhz))
            .map_err(|_| LedError::WriteFailed)?;

        let leds = SmartLedsAdapter::new(rmt.channel0, gpio8, buffer);

        Ok(Self { leds, brightness })
    }
}

impl PixelStrip for RmtPixelStrip<'_> {
    fn write(&mut self, pixels: &[RGB8]) -> Result<(), LedError> {
        self.leds
            .write(brightness(pixels.iter().copied(), self.brightness))
            .map_err(|_| LedError::WriteFailed)
    }
}
