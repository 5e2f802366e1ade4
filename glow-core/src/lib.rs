//! Glow Core - Platform-agnostic Logic and Traits
//!
//! Diese Crate enthält KEINE Hardware-Dependencies.
//! Sie definiert Traits, Zustandsmaschinen und Pure Functions.

#![no_std]

pub mod ancs;
pub mod animation;
pub mod color_wheel;
pub mod crowd;
pub mod idle;
pub mod notify;
pub mod pairing;
pub mod palette;
pub mod traits;
pub mod types;

// Re-exports für einfachen Zugriff
pub use animation::Animation;
pub use color_wheel::wheel;
pub use crowd::{CrowdLevel, CrowdThresholds, DeviceCounter, ScanSummary};
pub use idle::{IdleStep, IdleTimer};
pub use notify::{Notification, SmsReaction, SmsWatcher};
pub use pairing::{LinkEvent, LinkStep, PairingGate};
pub use palette::NamedColor;
pub use traits::{LedError, PixelStrip};
pub use types::{GlowMode, PixelCommand};
