// Pixel Task - Spielt Animationen auf dem Neopixel-Strip ab
use defmt::{error, info};
use embassy_time::{Duration, Timer};
use esp_hal_smartled::smart_led_buffer;
use glow_core::Animation;
use rgb::RGB8;

use crate::config::{PIXEL_BRIGHTNESS, PIXEL_COUNT, RMT_CLOCK_MHZ};
use crate::hal::RmtPixelStrip;
use crate::{PixelCommandReceiver, PixelIdleSignal, PixelStrip};

/// Pixel Logic - Testbare Ablauf-Logik ohne Hardware-Abhängigkeit
///
/// Empfängt Animations-Kommandos und spielt sie strikt nacheinander ab.
/// Der Frame-Buffer bleibt zwischen Kommandos erhalten, ein Chase läuft
/// also über die vorherige Farbe.
///
/// # Parameter
/// - `strip`: Pixel Strip (Hardware oder Mock)
/// - `command_receiver`: Channel Receiver für Kommandos vom BLE-Task
/// - `idle`: wird gesetzt, sobald nach einem Kommando nichts mehr ansteht
pub async fn pixel_logic<S: PixelStrip>(
    mut strip: S,
    command_receiver: PixelCommandReceiver,
    idle: &PixelIdleSignal,
) {
    let mut pixels = [RGB8::default(); PIXEL_COUNT];

    // Strip beim Start einmal löschen
    if strip.write(&pixels).is_err() {
        error!("Failed to clear pixels");
    }

    loop {
        let command = command_receiver.receive().await;
        let mut animation = Animation::new(command);
        info!(
            "Animation: {} ({} ms)",
            command,
            animation.duration_ms(PIXEL_COUNT)
        );

        while animation.step(&mut pixels) {
            if let Err(e) = strip.write(&pixels) {
                error!("Failed to write pixels: {}", e);
            }
            let wait_ms = animation.frame_wait_ms();
            if wait_ms > 0 {
                Timer::after(Duration::from_millis(u64::from(wait_ms))).await;
            }
        }

        let settle_ms = animation.settle_ms();
        if settle_ms > 0 {
            Timer::after(Duration::from_millis(u64::from(settle_ms))).await;
        }

        if command_receiver.is_empty() {
            idle.signal(());
        }
    }
}

/// Pixel Task - Embassy Task für parallele Ausführung
///
/// Dieser Task übernimmt die Hardware-Initialisierung und ruft dann
/// die testbare `pixel_logic()` Funktion auf.
///
/// # Parameter
/// - `gpio8`: GPIO8 Peripheral für die Datenleitung
/// - `rmt_peripheral`: RMT Peripheral für präzises Timing
/// - `command_receiver`: Channel Receiver für Kommandos vom BLE-Task
/// - `idle`: Rückmeldung an den BLE-Task
#[embassy_executor::task]
pub async fn pixel_task(
    gpio8: esp_hal::peripherals::GPIO8<'static>,
    rmt_peripheral: esp_hal::peripherals::RMT<'static>,
    command_receiver: PixelCommandReceiver,
    idle: &'static PixelIdleSignal,
) {
    // Buffer für SmartLED Daten erstellen
    // Macro allokiert Speicher im richtigen Format für RMT
    let mut rmt_buffer = smart_led_buffer!(PIXEL_COUNT);

    let strip = match RmtPixelStrip::new(
        gpio8,
        rmt_peripheral,
        RMT_CLOCK_MHZ,
        &mut rmt_buffer,
        PIXEL_BRIGHTNESS,
    ) {
        Ok(strip) => strip,
        Err(e) => {
            error!("Failed to initialize RMT: {}", e);
            return;
        }
    };

    info!("Pixels: {} LEDs ready", PIXEL_COUNT);
    pixel_logic(strip, command_receiver, idle).await;
}
