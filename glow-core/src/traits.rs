//! Hardware Abstraction Traits
//!
//! Diese Traits definieren Schnittstellen für Hardware-Zugriff
//! ohne konkrete Implementierung.

use rgb::RGB8;

/// Fehler-Typ für LED-Operationen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedError {
    WriteFailed,
}

#[cfg(feature = "defmt")]
impl defmt::Format for LedError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            LedError::WriteFailed => defmt::write!(fmt, "WriteFailed"),
        }
    }
}

/// Trait für eine Kette adressierbarer RGB LEDs (WS2812/Neopixel)
///
/// # Implementierungen
/// - **Production:** RmtPixelStrip (ESP32 RMT Peripheral)
/// - **Testing:** MockPixelStrip (in-memory Mock)
pub trait PixelStrip {
    /// Schreibt einen kompletten Frame auf den Strip
    ///
    /// `pixels[i]` landet auf LED `i`. Helligkeit wird von der
    /// Implementierung angewendet, nicht vom Aufrufer.
    ///
    /// # Fehlerbehandlung
    /// Gibt `LedError::WriteFailed` zurück wenn Hardware-Zugriff fehlschlägt
    fn write(&mut self, pixels: &[RGB8]) -> Result<(), LedError>;
}
