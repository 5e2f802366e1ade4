//! Frame-Generatoren für Chase- und Regenbogen-Animationen
//!
//! Die Generatoren schreiben nur in einen Pixel-Buffer des Aufrufers.
//! Timing und Ausgabe übernimmt der Pixel-Task.

use rgb::RGB8;

use crate::color_wheel::wheel;
use crate::types::PixelCommand;

/// Anzahl Frames eines Regenbogen-Durchlaufs
pub const RAINBOW_FRAMES: u16 = 255;

/// Pause nach dem letzten Chase-Frame in Millisekunden
pub const CHASE_SETTLE_MS: u32 = 500;

/// Setzt alle Pixel auf eine Farbe
pub fn fill(pixels: &mut [RGB8], color: RGB8) {
    pixels.iter_mut().for_each(|pixel| *pixel = color);
}

/// Schreibt Frame `frame` des Regenbogens in den Buffer
///
/// Pixel `i` bekommt `wheel((i + frame) & 255)`.
pub fn rainbow_frame(pixels: &mut [RGB8], frame: u16) {
    for (i, pixel) in pixels.iter_mut().enumerate() {
        let idx = (i + usize::from(frame)) & 255;
        *pixel = wheel(idx as i32);
    }
}

/// Laufende Animation, erzeugt aus einem `PixelCommand`
///
/// ```
/// # use rgb::RGB8;
/// # use glow_core::{Animation, PixelCommand};
/// let red = RGB8 { r: 255, g: 0, b: 0 };
/// let mut pixels = [RGB8::default(); 3];
/// let mut chase = Animation::new(PixelCommand::Chase { color: red, wait_ms: 500 });
/// assert!(chase.step(&mut pixels));
/// assert_eq!(pixels, [red, RGB8::default(), RGB8::default()]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Animation {
    command: PixelCommand,
    frame: u16,
}

impl Animation {
    pub fn new(command: PixelCommand) -> Self {
        Self { command, frame: 0 }
    }

    /// Berechnet den nächsten Frame
    ///
    /// Gibt `false` zurück wenn die Animation fertig ist; der Buffer
    /// bleibt dann unverändert.
    pub fn step(&mut self, pixels: &mut [RGB8]) -> bool {
        let frame = self.frame;
        let produced = match self.command {
            PixelCommand::Chase { color, .. } => match pixels.get_mut(usize::from(frame)) {
                Some(pixel) => {
                    *pixel = color;
                    true
                }
                None => false,
            },
            PixelCommand::Rainbow { .. } => {
                if frame < RAINBOW_FRAMES {
                    rainbow_frame(pixels, frame);
                    true
                } else {
                    false
                }
            }
            PixelCommand::Fill(color) => {
                if frame == 0 {
                    fill(pixels, color);
                    true
                } else {
                    false
                }
            }
        };
        if produced {
            self.frame = frame.saturating_add(1);
        }
        produced
    }

    /// Wartezeit nach jedem Frame in Millisekunden
    pub fn frame_wait_ms(&self) -> u32 {
        match self.command {
            PixelCommand::Chase { wait_ms, .. } | PixelCommand::Rainbow { wait_ms } => wait_ms,
            PixelCommand::Fill(_) => 0,
        }
    }

    /// Wartezeit nach dem letzten Frame in Millisekunden
    pub fn settle_ms(&self) -> u32 {
        match self.command {
            PixelCommand::Chase { .. } => CHASE_SETTLE_MS,
            _ => 0,
        }
    }

    /// Gesamte Abspieldauer auf `pixel_count` LEDs in Millisekunden
    pub fn duration_ms(&self, pixel_count: usize) -> u32 {
        let frames = match self.command {
            PixelCommand::Chase { .. } => u32::try_from(pixel_count).unwrap_or(u32::MAX),
            PixelCommand::Rainbow { .. } => u32::from(RAINBOW_FRAMES),
            PixelCommand::Fill(_) => 1,
        };
        frames
            .saturating_mul(self.frame_wait_ms())
            .saturating_add(self.settle_ms())
    }
}
