// Task-Modul: Enthält alle Embassy Tasks
//
// Jeder Task läuft asynchron und unabhängig.
// Der BLE-Task schickt Animations-Kommandos an den Pixel-Task.

pub mod ble;
pub mod crowd;
pub mod notify;
pub mod pixels;

// Re-export Tasks für einfachen Import
pub use ble::ble_task;
pub use pixels::pixel_task;
