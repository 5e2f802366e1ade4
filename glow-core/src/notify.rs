//! Auswertung von SMS-Benachrichtigungen
//!
//! Enthält die komplette Entscheidungslogik der verbundenen Phase:
//! - nur neue SMS (nicht pre-existing, UID noch nicht gesehen)
//! - Nachricht muss eine Palettenfarbe sein
//! - jede dritte gefundene Farbe kommt mit Regenbogen davor

use heapless::Vec;

use crate::palette::NamedColor;

/// App Identifier der Nachrichten-App auf iOS
pub const SMS_APP_ID: &str = "com.apple.MobileSMS";

/// Wie viele Notification UIDs gemerkt werden
pub const KNOWN_UIDS: usize = 32;

/// Eine Benachrichtigung, wie sie vom Apple-Gerät gemeldet wird
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notification<'a> {
    pub uid: u32,
    pub app_id: &'a str,
    pub message: &'a str,
    pub preexisting: bool,
}

/// Reaktion auf eine gültige Farb-SMS
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmsReaction {
    /// Vor dem Chase einen schnellen Regenbogen zeigen
    pub celebrate: bool,
    pub color: NamedColor,
}

/// Zustand der verbundenen Phase
#[derive(Debug, Clone)]
pub struct SmsWatcher {
    found_color_count: u8,
    rainbow_after: u8,
    known: Vec<u32, KNOWN_UIDS>,
}

impl SmsWatcher {
    /// `rainbow_after`: nach so vielen Farben kommt beim nächsten Treffer
    /// ein Regenbogen
    pub fn new(rainbow_after: u8) -> Self {
        Self {
            found_color_count: 0,
            rainbow_after,
            known: Vec::new(),
        }
    }

    /// Anzahl Farben seit dem letzten Regenbogen
    pub fn found_color_count(&self) -> u8 {
        self.found_color_count
    }

    /// Wertet eine Benachrichtigung aus
    ///
    /// Gibt `None` zurück wenn die Benachrichtigung ignoriert wird.
    pub fn on_notification(&mut self, notification: &Notification<'_>) -> Option<SmsReaction> {
        if notification.app_id != SMS_APP_ID || notification.preexisting {
            return None;
        }
        if !self.remember(notification.uid) {
            return None;
        }

        let color = NamedColor::lookup(notification.message)?;

        let celebrate = self.found_color_count == self.rainbow_after;
        if celebrate {
            self.found_color_count = 0;
        }
        self.found_color_count = self.found_color_count.saturating_add(1);

        Some(SmsReaction { celebrate, color })
    }

    /// Merkt sich eine UID, `false` wenn sie schon bekannt war
    fn remember(&mut self, uid: u32) -> bool {
        if self.known.contains(&uid) {
            return false;
        }
        if self.known.is_full() {
            self.known.remove(0);
        }
        // Nach dem Entfernen ist immer Platz
        let _ = self.known.push(uid);
        true
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for SmsReaction {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "SmsReaction {{ color: {}, celebrate: {} }}",
            self.color,
            self.celebrate
        )
    }
}
