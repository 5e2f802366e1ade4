//! Farbrad für Regenbogen-Animationen
//!
//! Pure Function ohne Hardware-Dependencies (testbar!)

use rgb::RGB8;

/// Bildet eine Position 0-255 auf eine Farbe ab: Rot → Grün → Blau → Rot
///
/// Drei lineare Segmente à 85 Schritte (das letzte deckt 170..=255 ab).
/// Positionen außerhalb von 0-255 ergeben Schwarz statt eines Fehlers.
///
/// # Beispiele
///
/// ```
/// # use rgb::RGB8;
/// # use glow_core::wheel;
/// assert_eq!(wheel(0), RGB8 { r: 255, g: 0, b: 0 });
/// assert_eq!(wheel(85), RGB8 { r: 0, g: 255, b: 0 });
/// assert_eq!(wheel(256), RGB8 { r: 0, g: 0, b: 0 });
/// ```
pub fn wheel(pos: i32) -> RGB8 {
    if !(0..=255).contains(&pos) {
        return RGB8 { r: 0, g: 0, b: 0 };
    }
    // Nach der Bereichsprüfung passt jeder Kanalwert in u8
    let pos = pos as u8;
    if pos < 85 {
        return RGB8 {
            r: 255 - pos * 3,
            g: pos * 3,
            b: 0,
        };
    }
    if pos < 170 {
        let p = pos - 85;
        return RGB8 {
            r: 0,
            g: 255 - p * 3,
            b: p * 3,
        };
    }
    let p = pos - 170;
    RGB8 {
        r: p * 3,
        g: 0,
        b: 255 - p * 3,
    }
}
