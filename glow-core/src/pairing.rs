//! Wartet nach dem Verbinden auf eine verschlüsselte Verbindung
//!
//! Apple-Geräte geben ANCS erst nach dem Pairing frei. Vorher schlägt jedes
//! Abonnieren mit "Insufficient Authentication" fehl.

/// Verbindungs-Ereignis, reduziert auf das was das Pairing betrifft
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkEvent {
    /// Pairing oder Re-Encryption abgeschlossen
    PairingComplete { encrypted: bool },
    PairingFailed,
    Disconnected,
    /// Alles andere (z.B. Parameter-Updates)
    Other,
}

/// Nächster Schritt nach einem Ereignis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStep {
    /// Weiter auf Ereignisse warten (Nutzer sieht noch den Pair-Dialog)
    Wait,
    /// Verbindung verschlüsselt, ANCS darf abonniert werden
    Secured,
    /// Verbindung aufgeben und wieder advertisen
    Abort,
}

/// Zustand des Pairings einer Verbindung
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PairingGate {
    secured: bool,
}

impl PairingGate {
    pub const fn new() -> Self {
        Self { secured: false }
    }

    pub fn is_secured(&self) -> bool {
        self.secured
    }

    /// Wertet ein Ereignis aus
    ///
    /// Ein Pairing ohne Verschlüsselung reicht für ANCS nicht und bricht ab.
    pub fn on_event(&mut self, event: LinkEvent) -> LinkStep {
        match event {
            LinkEvent::Other => LinkStep::Wait,
            LinkEvent::PairingComplete { encrypted: true } => {
                self.secured = true;
                LinkStep::Secured
            }
            LinkEvent::PairingComplete { encrypted: false }
            | LinkEvent::PairingFailed
            | LinkEvent::Disconnected => {
                self.secured = false;
                LinkStep::Abort
            }
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for LinkStep {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            LinkStep::Wait => defmt::write!(fmt, "Wait"),
            LinkStep::Secured => defmt::write!(fmt, "Secured"),
            LinkStep::Abort => defmt::write!(fmt, "Abort"),
        }
    }
}
