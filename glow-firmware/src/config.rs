// Projekt-Konfiguration: Konstanten und Hardware-Zuordnungen
use glow_core::{CrowdThresholds, GlowMode};

// ============================================================================
// Pixel Konfiguration
// ============================================================================

/// GPIO-Pin für die Neopixel-Datenleitung (WS2812)
pub const PIXEL_GPIO_PIN: u8 = 8;

/// Anzahl der LEDs im Strip
pub const PIXEL_COUNT: usize = 10;

/// Globale Helligkeit (0-255), ca. 10 %
/// Wird beim Schreiben auf jede Farbe angewendet
pub const PIXEL_BRIGHTNESS: u8 = 26;

/// RMT Taktfrequenz in MHz
/// 80 MHz ist optimal für WS2812 LED-Timing
pub const RMT_CLOCK_MHZ: u32 = 80;

/// Kapazität des Kommando-Channels BLE-Task → Pixel-Task
pub const PIXEL_COMMAND_QUEUE: usize = 4;

// ============================================================================
// Animations-Timing
// ============================================================================

/// Wartezeit pro LED beim Chase (Millisekunden)
pub const CHASE_WAIT_MS: u32 = 500;

/// Wartezeit pro Frame beim Ruhe-Regenbogen (Millisekunden)
pub const IDLE_RAINBOW_WAIT_MS: u32 = 100;

/// Wartezeit pro Frame beim Feier-Regenbogen nach Farb-SMS (Millisekunden)
pub const CELEBRATE_RAINBOW_WAIT_MS: u32 = 10;

// ============================================================================
// Notify-Modus
// ============================================================================

/// Pause pro Tick ohne Verbindung (Sekunden)
pub const IDLE_TICK_SECS: u64 = 6;

/// Ticks bis zur Ruhephase (150 × 6 s = 15 Minuten)
pub const REST_AFTER_TICKS: u32 = 150;

/// Dauer der Ruhephase (Sekunden)
pub const REST_SECS: u64 = 300;

/// Nach so vielen Farb-SMS kommt beim nächsten Treffer ein Regenbogen
pub const RAINBOW_AFTER_COLORS: u8 = 2;

/// Zeit für den Pair-Dialog auf dem Apple-Gerät (Sekunden)
pub const PAIRING_TIMEOUT_SECS: u64 = 60;

/// Maximale Länge der angeforderten SMS-Nachricht in Bytes
pub const MESSAGE_MAX_LEN: u16 = 32;

/// Reassembly-Buffer für Data Source Antworten in Bytes
pub const ATTRIBUTE_BUFFER_SIZE: usize = 128;

/// Timeout für eine Data Source Antwort (Sekunden)
pub const ATTRIBUTE_TIMEOUT_SECS: u64 = 5;

// ============================================================================
// Crowd-Modus
// ============================================================================

/// Länge eines Scan-Fensters (Sekunden)
pub const SCAN_WINDOW_SECS: u64 = 10;

/// Maximal gemerkte Adressen pro Scan-Fenster
pub const MAX_TRACKED_DEVICES: usize = 64;

/// Jedes n-te Scan-Fenster bekommt einen Regenbogen
pub const CROWD_RAINBOW_EVERY: u32 = 30;

/// Schwellwerte für die Einordnung der Geräteanzahl
pub const CROWD_THRESHOLDS: CrowdThresholds = CrowdThresholds {
    few: 1,
    moderate: 3,
    many: 6,
    crowd: 10,
};

// ============================================================================
// BLE Konfiguration
// ============================================================================

/// Gewählter Modus
/// Wird zur Build-Zeit aus der Environment Variable GLOW_MODE geladen
/// ("notify" oder "crowd", Default: notify)
pub const GLOW_MODE: Option<&str> = option_env!("GLOW_MODE");

/// Advertising-Name
/// Wird zur Build-Zeit aus der Environment Variable GLOW_DEVICE_NAME geladen
pub const DEVICE_NAME: &str = match option_env!("GLOW_DEVICE_NAME") {
    Some(name) => name,
    None => "Glow",
};

/// Maximale Anzahl gleichzeitiger Verbindungen
pub const CONNECTIONS_MAX: usize = 1;

/// Maximale Anzahl L2CAP-Kanäle (Signal + ATT)
pub const L2CAP_CHANNELS_MAX: usize = 2;

/// HCI Command Slots des Controllers
pub const BLE_SLOTS: usize = 20;

/// Wartezeit nach BLE-Fehlern (Sekunden)
pub const BLE_RETRY_DELAY_SECS: u64 = 2;

/// Heap-Größe für den BLE-Controller (Bytes)
pub const RADIO_HEAP_SIZE: usize = 65536; // 64 KB

/// Parst GLOW_MODE, unbekannte Werte fallen auf Notify zurück
pub fn glow_mode() -> GlowMode {
    GLOW_MODE
        .and_then(|name| GlowMode::try_from(name).ok())
        .unwrap_or_default()
}
