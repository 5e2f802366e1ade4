// Library-Root: Wiederverwendbare Logik und Module
// Keine Standard-Bibliothek (Embedded System)
#![no_std]

// Module
pub mod config;
pub mod hal;
pub mod tasks;

// Re-exports von glow-core
pub use glow_core::{LedError, NamedColor, PixelCommand, PixelStrip};

// Embassy Channel-Typen
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender};
use embassy_sync::signal::Signal;

use crate::config::PIXEL_COMMAND_QUEUE;

// ============================================================================
// Type-Aliase für Channel-Typen
// ============================================================================
//
// Statt:  Sender<'static, NoopRawMutex, PixelCommand, 4>
// Nutze:  PixelCommandSender

/// Channel für Animations-Kommandos (BLE Task → Pixel Task)
/// Beide Tasks laufen auf demselben Executor, daher NoopRawMutex
pub type PixelCommandChannel = Channel<NoopRawMutex, PixelCommand, PIXEL_COMMAND_QUEUE>;

/// Sender für Animations-Kommandos
pub type PixelCommandSender = Sender<'static, NoopRawMutex, PixelCommand, PIXEL_COMMAND_QUEUE>;

/// Receiver für Animations-Kommandos (Pixel Task empfängt)
pub type PixelCommandReceiver =
    Receiver<'static, NoopRawMutex, PixelCommand, PIXEL_COMMAND_QUEUE>;

/// Meldet dem BLE-Task, dass der Pixel-Task alle Kommandos abgespielt hat
pub type PixelIdleSignal = Signal<NoopRawMutex, ()>;

/// Zugang des BLE-Tasks zum Pixel-Task
///
/// `queue()` reiht nur ein, `play()` blockiert wie ein direkter Aufruf
/// bis die Animation samt Pause fertig ist.
#[derive(Clone, Copy)]
pub struct PixelPlayer {
    sender: PixelCommandSender,
    idle: &'static PixelIdleSignal,
}

impl PixelPlayer {
    pub fn new(sender: PixelCommandSender, idle: &'static PixelIdleSignal) -> Self {
        Self { sender, idle }
    }

    /// Reiht ein Kommando ein, wartet nur bei vollem Channel
    pub async fn queue(&self, command: PixelCommand) {
        self.sender.send(command).await;
    }

    /// Spielt ein Kommando und wartet, bis der Strip wieder frei ist
    pub async fn play(&self, command: PixelCommand) {
        // Signal von früheren Kommandos verwerfen, bevor unseres eingereiht ist
        self.idle.reset();
        self.sender.send(command).await;
        self.idle.wait().await;
    }
}
