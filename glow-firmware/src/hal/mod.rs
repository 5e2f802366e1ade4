// Hardware Abstraction Layer (HAL) Module
//
// Dieses Modul kapselt Hardware-Zugriffe hinter den Traits aus glow-core.

pub mod pixel_strip;

pub use pixel_strip::{PIXEL_BUFFER_SIZE, RmtPixelStrip};
