//! Benannte Farbpalette
//!
//! Feste Zuordnung Name → RGB8. Die Namen entsprechen dem, was per SMS
//! geschickt wird (Groß-/Kleinschreibung egal).

use rgb::RGB8;

/// Eine Farbe aus der festen Palette
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedColor {
    Red,
    Yellow,
    Green,
    Cyan,
    Blue,
    Purple,
    White,
    Orange,
    Pink,
    Off,
}

impl NamedColor {
    /// Alle Paletteneinträge in Tabellen-Reihenfolge
    pub const ALL: [NamedColor; 10] = [
        NamedColor::Red,
        NamedColor::Yellow,
        NamedColor::Green,
        NamedColor::Cyan,
        NamedColor::Blue,
        NamedColor::Purple,
        NamedColor::White,
        NamedColor::Orange,
        NamedColor::Pink,
        NamedColor::Off,
    ];

    /// Gespeicherter Schlüssel (Großbuchstaben)
    pub const fn name(self) -> &'static str {
        match self {
            NamedColor::Red => "RED",
            NamedColor::Yellow => "YELLOW",
            NamedColor::Green => "GREEN",
            NamedColor::Cyan => "CYAN",
            NamedColor::Blue => "BLUE",
            NamedColor::Purple => "PURPLE",
            NamedColor::White => "WHITE",
            NamedColor::Orange => "ORANGE",
            NamedColor::Pink => "PINK",
            NamedColor::Off => "OFF",
        }
    }

    /// RGB-Wert bei voller Helligkeit
    pub const fn rgb(self) -> RGB8 {
        let (r, g, b) = match self {
            NamedColor::Red => (255, 0, 0),
            NamedColor::Yellow => (255, 150, 0),
            NamedColor::Green => (0, 255, 0),
            NamedColor::Cyan => (0, 255, 255),
            NamedColor::Blue => (0, 0, 255),
            NamedColor::Purple => (180, 0, 255),
            NamedColor::White => (255, 255, 255),
            NamedColor::Orange => (255, 165, 0),
            NamedColor::Pink => (255, 192, 203),
            NamedColor::Off => (0, 0, 0),
        };
        RGB8 { r, g, b }
    }

    /// Sucht einen Eintrag ohne Rücksicht auf Groß-/Kleinschreibung
    ///
    /// Leerzeichen werden nicht entfernt: `" red"` ist keine Farbe.
    ///
    /// Der Vergleich ignoriert nur ASCII-Großschreibung: Nicht-ASCII-Zeichen
    /// wie das türkische "ı" werden nicht auf "I" abgebildet.
    ///
    /// ```
    /// # use glow_core::NamedColor;
    /// assert_eq!(NamedColor::lookup("pInK"), Some(NamedColor::Pink));
    /// assert_eq!(NamedColor::lookup("magenta"), None);
    /// ```
    pub fn lookup(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|color| color.name().eq_ignore_ascii_case(name))
    }
}

impl core::convert::TryFrom<&str> for NamedColor {
    type Error = ();

    fn try_from(name: &str) -> Result<Self, Self::Error> {
        Self::lookup(name).ok_or(())
    }
}

impl From<NamedColor> for RGB8 {
    fn from(color: NamedColor) -> Self {
        color.rgb()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for NamedColor {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_ignores_case() {
        assert_eq!(NamedColor::lookup("red"), Some(NamedColor::Red));
        assert_eq!(NamedColor::lookup("Purple"), Some(NamedColor::Purple));
        assert_eq!(NamedColor::lookup("OFF"), Some(NamedColor::Off));
    }

    #[test]
    fn test_lookup_rejects_unknown_and_padded() {
        assert_eq!(NamedColor::lookup(""), None);
        assert_eq!(NamedColor::lookup("red "), None);
        assert_eq!(NamedColor::lookup("Rot"), None);
    }

    #[test]
    fn test_lookup_is_ascii_only() {
        assert_eq!(NamedColor::lookup("pınk"), None);
        assert_eq!(NamedColor::lookup("PİNK"), None);
        assert_eq!(NamedColor::lookup("PiNk"), Some(NamedColor::Pink));
    }

    #[test]
    fn test_every_name_round_trips() {
        for color in NamedColor::ALL {
            assert_eq!(NamedColor::lookup(color.name()), Some(color));
        }
    }
}
