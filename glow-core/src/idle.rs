//! Wartephase ohne Verbindung
//!
//! Solange kein Apple-Gerät verbunden ist, läuft pro Tick ein Aus-Chase
//! und eine Pause. Nach `rest_after_ticks` Ticks (ca. 15 Minuten) gibt es
//! einmal einen Regenbogen und eine lange Ruhephase.

/// Was im aktuellen Tick zu tun ist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleStep {
    /// Nur Aus-Chase und normale Pause
    Wait,
    /// Aus-Chase, Regenbogen, Ruhephase, dann normale Pause
    Rest,
}

/// Zähler der Wartephase
///
/// Nach einer Ruhephase wird der Zähler nicht zurückgesetzt, die Ruhe
/// kommt also nur einmal pro Wartephase. Erst `reset()` (beim Koppeln)
/// startet die Zählung neu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdleTimer {
    ticks: u32,
    rest_after_ticks: u32,
}

impl IdleTimer {
    pub const fn new(rest_after_ticks: u32) -> Self {
        Self {
            ticks: 0,
            rest_after_ticks,
        }
    }

    /// Bisher gezählte Ticks
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Liefert die Aktion für diesen Tick und zählt weiter
    pub fn tick(&mut self) -> IdleStep {
        let step = if self.ticks == self.rest_after_ticks {
            IdleStep::Rest
        } else {
            IdleStep::Wait
        };
        self.ticks = self.ticks.saturating_add(1);
        step
    }

    pub fn reset(&mut self) {
        self.ticks = 0;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for IdleStep {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            IdleStep::Wait => defmt::write!(fmt, "Wait"),
            IdleStep::Rest => defmt::write!(fmt, "Rest"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rest_on_exact_tick() {
        let mut timer = IdleTimer::new(3);
        assert_eq!(timer.tick(), IdleStep::Wait);
        assert_eq!(timer.tick(), IdleStep::Wait);
        assert_eq!(timer.tick(), IdleStep::Wait);
        assert_eq!(timer.tick(), IdleStep::Rest);
        assert_eq!(timer.ticks(), 4);
    }

    #[test]
    fn test_rest_only_once_without_reset() {
        let mut timer = IdleTimer::new(1);
        let rests = (0..100)
            .filter(|_| timer.tick() == IdleStep::Rest)
            .count();
        assert_eq!(rests, 1);
    }

    #[test]
    fn test_reset_restarts_counting() {
        let mut timer = IdleTimer::new(1);
        timer.tick();
        timer.tick();
        timer.reset();
        assert_eq!(timer.tick(), IdleStep::Wait);
        assert_eq!(timer.tick(), IdleStep::Rest);
    }
}
