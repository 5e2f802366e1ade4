// Crowd-Modus - Zählt BLE-Geräte in der Umgebung und zeigt die Menge als Farbe
use defmt::{Debug2Format, info, warn};
use embassy_time::{Duration, Instant, Timer, with_deadline};
use glow_core::{DeviceCounter, PixelCommand};
use trouble_host::prelude::*;
use trouble_host::scan::Scanner;

use crate::PixelPlayer;
use crate::config::*;
use crate::tasks::ble::{BleController, ScanChannel};

/// Scan-Parameter: aktiv, 1M PHY, durchgehend scannen
fn scan_config() -> ScanConfig<'static> {
    ScanConfig {
        active: true,
        phys: PhySet::M1,
        interval: Duration::from_secs(1),
        window: Duration::from_secs(1),
        ..Default::default()
    }
}

/// Crowd-Modus, läuft endlos
///
/// Pro Scan-Fenster werden eindeutige Adressen gezählt, danach zeigt ein
/// Chase die Stufe an. Jedes n-te Fenster kommt vorher ein Regenbogen.
///
/// # Parameter
/// - `central`: Central-Rolle für den Scanner
/// - `scan_channel`: Adressen vom Event Handler des Runners
/// - `pixels`: Zugang zum Pixel-Task
pub async fn run(
    central: Central<'_, BleController, DefaultPacketPool>,
    scan_channel: &ScanChannel,
    pixels: PixelPlayer,
) {
    let mut scanner = Scanner::new(central);
    let mut counter = DeviceCounter::<MAX_TRACKED_DEVICES>::new(CROWD_THRESHOLDS, CROWD_RAINBOW_EVERY);
    let config = scan_config();

    loop {
        // Reports aus der Anzeige-Pause gehören nicht ins neue Fenster
        scan_channel.clear();

        let session = match scanner.scan(&config).await {
            Ok(session) => session,
            Err(e) => {
                warn!("Crowd: failed to start scan: {}", Debug2Format(&e));
                Timer::after(Duration::from_secs(BLE_RETRY_DELAY_SECS)).await;
                continue;
            }
        };

        let deadline = Instant::now() + Duration::from_secs(SCAN_WINDOW_SECS);
        // Ende des Fensters: with_deadline liefert Err(TimeoutError)
        let _ = with_deadline(deadline, async {
            loop {
                let address = scan_channel.receive().await;
                counter.observe(address);
            }
        })
        .await;
        // Session droppen beendet den Scan
        drop(session);

        let summary = counter.finish_scan();
        info!("Crowd: {}", summary);

        // Anzeige abwarten, damit das nächste Fenster nicht überlappt
        if summary.celebrate {
            pixels
                .play(PixelCommand::Rainbow {
                    wait_ms: IDLE_RAINBOW_WAIT_MS,
                })
                .await;
        }
        pixels
            .play(PixelCommand::Chase {
                color: summary.level.color().rgb(),
                wait_ms: CHASE_WAIT_MS,
            })
            .await;
    }
}
