//! Core Types für die Pixel-Steuerung
//!
//! Datenstrukturen ohne Hardware-Dependencies

use rgb::RGB8;

/// Animations-Kommando für den Pixel-Task
///
/// Wird vom BLE-Task an den Pixel-Task geschickt und dort in
/// Empfangsreihenfolge abgespielt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelCommand {
    /// Setzt die LEDs nacheinander auf `color`, `wait_ms` pro LED
    Chase { color: RGB8, wait_ms: u32 },
    /// Einmal durch das Farbrad, `wait_ms` pro Frame
    Rainbow { wait_ms: u32 },
    /// Alle LEDs sofort auf eine Farbe
    Fill(RGB8),
}

/// Betriebsart der Firmware
///
/// Wird zur Build-Zeit über `GLOW_MODE` gewählt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GlowMode {
    /// SMS-Benachrichtigungen eines gekoppelten Apple-Geräts
    #[default]
    Notify,
    /// Anzahl BLE-Geräte in der Umgebung
    Crowd,
}

impl core::convert::TryFrom<&str> for GlowMode {
    type Error = ();

    fn try_from(name: &str) -> Result<Self, Self::Error> {
        if name.eq_ignore_ascii_case("notify") {
            Ok(Self::Notify)
        } else if name.eq_ignore_ascii_case("crowd") {
            Ok(Self::Crowd)
        } else {
            Err(())
        }
    }
}

// ============================================================================
// defmt::Format Implementations (optional feature)
// ============================================================================

#[cfg(feature = "defmt")]
impl defmt::Format for PixelCommand {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            PixelCommand::Chase { color, wait_ms } => {
                defmt::write!(
                    fmt,
                    "Chase {{ rgb: ({}, {}, {}), wait_ms: {} }}",
                    color.r,
                    color.g,
                    color.b,
                    wait_ms
                )
            }
            PixelCommand::Rainbow { wait_ms } => {
                defmt::write!(fmt, "Rainbow {{ wait_ms: {} }}", wait_ms)
            }
            PixelCommand::Fill(color) => {
                defmt::write!(fmt, "Fill ({}, {}, {})", color.r, color.g, color.b)
            }
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for GlowMode {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            GlowMode::Notify => defmt::write!(fmt, "Notify"),
            GlowMode::Crowd => defmt::write!(fmt, "Crowd"),
        }
    }
}
