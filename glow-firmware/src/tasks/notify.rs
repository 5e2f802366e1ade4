// Notify-Modus - SMS-Farben von einem gekoppelten Apple-Gerät
//
// Ohne Verbindung: Advertising mit ANCS-Solicitation, parallel Aus-Chase
// und Ruhephasen. Mit Verbindung: Pairing abwarten, ANCS abonnieren,
// neue SMS auswerten.
use defmt::{Debug2Format, info, warn};
use embassy_futures::select::{Either, Either3, select, select3};
use embassy_time::{Duration, Timer, with_timeout};
use glow_core::ancs::{
    self, AncsError, AttributeAssembler, EventId, GET_ATTRIBUTES_LEN, NotificationEvent,
    encode_get_attributes,
};
use glow_core::{
    IdleStep, IdleTimer, LinkEvent, LinkStep, NamedColor, PairingGate, PixelCommand, SmsWatcher,
};
use trouble_host::prelude::*;

use crate::PixelPlayer;
use crate::config::*;
use crate::tasks::ble::{BleController, BleStack};

type ControllerError = <BleController as bt_hci::controller::Controller>::Error;

/// Maximale Anzahl Services bei der Discovery
const GATT_MAX_SERVICES: usize = 4;

/// Länge eines AD-Eintrags mit 128-Bit UUID (Typ + 16 Bytes)
const SOLICIT_AD_LEN: u8 = 17;

/// AD-Typ "List of 128-bit Service Solicitation UUIDs"
const AD_TYPE_SOLICIT_UUIDS_128: u8 = 0x15;

/// AD-Typ "Complete Local Name"
const AD_TYPE_COMPLETE_NAME: u8 = 0x09;

/// Advertising-Daten: Flags + ANCS Solicitation (21 Bytes)
fn adv_data() -> [u8; 21] {
    let mut data = [0u8; 21];
    // Flags: LE General Discoverable + BR/EDR Not Supported
    data[..3].copy_from_slice(&[0x02, 0x01, 0x06]);
    data[3] = SOLICIT_AD_LEN;
    data[4] = AD_TYPE_SOLICIT_UUIDS_128;
    data[5..].copy_from_slice(&ancs::SERVICE_UUID.to_le_bytes());
    data
}

/// Scan Response mit dem Gerätenamen, wird bei Bedarf gekürzt
fn scan_data(buf: &mut [u8; 31]) -> &[u8] {
    let name = DEVICE_NAME.as_bytes();
    let len = name.len().min(buf.len() - 2);
    buf[0] = (len + 1) as u8;
    buf[1] = AD_TYPE_COMPLETE_NAME;
    buf[2..2 + len].copy_from_slice(&name[..len]);
    &buf[..2 + len]
}

/// Fehler während der verbundenen Phase
#[derive(Debug)]
enum WatchError {
    /// GATT-Operation fehlgeschlagen (meist Verbindung weg)
    Gatt,
    /// ANCS Service oder Characteristic nicht gefunden
    ServiceMissing,
    /// Antwort des Apple-Geräts nicht dekodierbar
    Ancs(AncsError),
    /// Pairing fehlgeschlagen, unverschlüsselt oder Verbindung vorher weg
    NotPaired,
    /// Nutzer hat den Pair-Dialog nicht rechtzeitig bestätigt
    PairingTimeout,
}

impl From<AncsError> for WatchError {
    fn from(e: AncsError) -> Self {
        Self::Ancs(e)
    }
}

/// Notify-Modus, läuft endlos
///
/// # Parameter
/// - `stack`: trouble-host Stack (für den GATT Client)
/// - `peripheral`: Peripheral-Rolle für Advertising
/// - `pixels`: Zugang zum Pixel-Task
pub async fn run(
    stack: &BleStack,
    mut peripheral: Peripheral<'_, BleController, DefaultPacketPool>,
    pixels: PixelPlayer,
) {
    let mut idle = IdleTimer::new(REST_AFTER_TICKS);
    let mut watcher = SmsWatcher::new(RAINBOW_AFTER_COLORS);

    loop {
        let conn = match select(advertise(&mut peripheral), idle_loop(&mut idle, pixels)).await {
            Either::First(Ok(conn)) => conn,
            Either::First(Err(e)) => {
                warn!("Notify: advertising failed: {}", Debug2Format(&e));
                Timer::after(Duration::from_secs(BLE_RETRY_DELAY_SECS)).await;
                continue;
            }
            Either::Second(_) => unreachable!(),
        };

        info!("Notify: connected, requesting pairing");
        if let Err(e) = conn.request_security() {
            warn!("Notify: pairing request failed: {}", Debug2Format(&e));
        }
        idle.reset();

        match watch(stack, &conn, &mut watcher, pixels).await {
            Ok(()) => info!("Notify: disconnected"),
            Err(e) => warn!("Notify: connection ended: {}", Debug2Format(&e)),
        }
    }
}

/// Startet Advertising und wartet auf eine Verbindung
async fn advertise<'a>(
    peripheral: &mut Peripheral<'a, BleController, DefaultPacketPool>,
) -> Result<Connection<'a, DefaultPacketPool>, BleHostError<ControllerError>> {
    let adv_data = adv_data();
    let mut scan_buf = [0u8; 31];
    let scan_data = scan_data(&mut scan_buf);

    info!("Notify: advertising as '{}'", DEVICE_NAME);
    let advertiser = peripheral
        .advertise(
            &Default::default(),
            Advertisement::ConnectableScannableUndirected {
                adv_data: &adv_data,
                scan_data,
            },
        )
        .await?;
    advertiser.accept().await
}

/// Wartephase: Aus-Chase, Pause, nach 15 Minuten Regenbogen und Ruhe
///
/// Jede Animation wird zu Ende gespielt bevor die Pause beginnt, ein Tick
/// dauert also Chase (5,5 s) plus `IDLE_TICK_SECS`.
async fn idle_loop(idle: &mut IdleTimer, pixels: PixelPlayer) {
    loop {
        pixels
            .play(PixelCommand::Chase {
                color: NamedColor::Off.rgb(),
                wait_ms: CHASE_WAIT_MS,
            })
            .await;

        if idle.tick() == IdleStep::Rest {
            info!("Notify: no connection for a while, resting {}s", REST_SECS);
            pixels
                .play(PixelCommand::Rainbow {
                    wait_ms: IDLE_RAINBOW_WAIT_MS,
                })
                .await;
            Timer::after(Duration::from_secs(REST_SECS)).await;
        }

        Timer::after(Duration::from_secs(IDLE_TICK_SECS)).await;
    }
}

/// Verbundene Phase bis zum Disconnect
///
/// ANCS ist erst nach dem Pairing lesbar, vorher wird nur gewartet.
async fn watch(
    stack: &BleStack,
    conn: &Connection<'_, DefaultPacketPool>,
    watcher: &mut SmsWatcher,
    pixels: PixelPlayer,
) -> Result<(), WatchError> {
    with_timeout(
        Duration::from_secs(PAIRING_TIMEOUT_SECS),
        wait_for_pairing(conn),
    )
    .await
    .map_err(|_| WatchError::PairingTimeout)??;

    let client = GattClient::<BleController, DefaultPacketPool, GATT_MAX_SERVICES>::new(stack, conn)
        .await
        .map_err(|_| WatchError::Gatt)?;

    match select3(
        client.task(),
        watch_notifications(&client, watcher, pixels),
        wait_for_disconnect(conn),
    )
    .await
    {
        Either3::First(_) | Either3::Third(_) => Ok(()),
        Either3::Second(result) => result,
    }
}

/// Wartet bis die Verbindung verschlüsselt ist
async fn wait_for_pairing(conn: &Connection<'_, DefaultPacketPool>) -> Result<(), WatchError> {
    let mut gate = PairingGate::new();
    loop {
        let event = match conn.next().await {
            ConnectionEvent::PairingComplete { security_level, .. } => {
                info!("Notify: paired ({})", Debug2Format(&security_level));
                LinkEvent::PairingComplete {
                    encrypted: security_level.encrypted(),
                }
            }
            ConnectionEvent::PairingFailed(e) => {
                warn!("Notify: pairing failed: {}", Debug2Format(&e));
                LinkEvent::PairingFailed
            }
            ConnectionEvent::Disconnected { reason } => {
                info!("Notify: disconnect reason {}", Debug2Format(&reason));
                LinkEvent::Disconnected
            }
            _ => LinkEvent::Other,
        };
        match gate.on_event(event) {
            LinkStep::Wait => {}
            LinkStep::Secured => return Ok(()),
            LinkStep::Abort => return Err(WatchError::NotPaired),
        }
    }
}

/// Wartet auf das Disconnect-Event
async fn wait_for_disconnect(conn: &Connection<'_, DefaultPacketPool>) {
    loop {
        if let ConnectionEvent::Disconnected { reason } = conn.next().await {
            info!("Notify: disconnect reason {}", Debug2Format(&reason));
            break;
        }
    }
}

/// Abonniert ANCS und setzt neue Farb-SMS in Animationen um
async fn watch_notifications(
    client: &GattClient<'_, BleController, DefaultPacketPool, GATT_MAX_SERVICES>,
    watcher: &mut SmsWatcher,
    pixels: PixelPlayer,
) -> Result<(), WatchError> {
    let services = client
        .services_by_uuid(&Uuid::new_long(ancs::SERVICE_UUID.to_le_bytes()))
        .await
        .map_err(|_| WatchError::Gatt)?;
    let service = services.first().cloned().ok_or(WatchError::ServiceMissing)?;

    // Typ-Parameter nur für typisierte Reads relevant, ANCS nutzt Rohdaten
    let notification_source: Characteristic<u8> = client
        .characteristic_by_uuid(
            &service,
            &Uuid::new_long(ancs::NOTIFICATION_SOURCE_UUID.to_le_bytes()),
        )
        .await
        .map_err(|_| WatchError::ServiceMissing)?;
    let control_point: Characteristic<u8> = client
        .characteristic_by_uuid(
            &service,
            &Uuid::new_long(ancs::CONTROL_POINT_UUID.to_le_bytes()),
        )
        .await
        .map_err(|_| WatchError::ServiceMissing)?;
    let data_source: Characteristic<u8> = client
        .characteristic_by_uuid(
            &service,
            &Uuid::new_long(ancs::DATA_SOURCE_UUID.to_le_bytes()),
        )
        .await
        .map_err(|_| WatchError::ServiceMissing)?;

    // Data Source zuerst, sonst gehen frühe Antworten verloren
    let mut data_listener = client
        .subscribe(&data_source, false)
        .await
        .map_err(|_| WatchError::Gatt)?;
    let mut event_listener = client
        .subscribe(&notification_source, false)
        .await
        .map_err(|_| WatchError::Gatt)?;
    info!("Notify: subscribed to ANCS");

    let mut assembler = AttributeAssembler::<ATTRIBUTE_BUFFER_SIZE>::new();

    loop {
        let data = event_listener.next().await;
        let event = match NotificationEvent::parse(data.as_ref()) {
            Ok(event) => event,
            Err(e) => {
                warn!("Notify: bad notification event: {}", e);
                continue;
            }
        };
        if event.event != EventId::Added || event.flags.preexisting() {
            continue;
        }

        let mut request_buf = [0u8; GET_ATTRIBUTES_LEN];
        let request = encode_get_attributes(event.uid, MESSAGE_MAX_LEN, &mut request_buf)?;
        client
            .write_characteristic(&control_point, request)
            .await
            .map_err(|_| WatchError::Gatt)?;

        assembler.clear();
        // Antwort kann über mehrere GATT-Notifications verteilt sein
        let read_attributes = async {
            loop {
                let fragment = data_listener.next().await;
                if let Err(e) = assembler.push(fragment.as_ref()) {
                    break Err(e);
                }
                match assembler.attributes(event.uid) {
                    Err(AncsError::Incomplete) => {}
                    other => break other.map(|_| ()),
                }
            }
        };
        let complete =
            with_timeout(Duration::from_secs(ATTRIBUTE_TIMEOUT_SECS), read_attributes).await;
        match complete {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                warn!("Notify: bad attributes for {}: {}", event.uid, e);
                continue;
            }
            Err(_) => {
                // z.B. Notification schon wieder entfernt, Verbindung bleibt
                warn!("Notify: no attributes for {} in time", event.uid);
                continue;
            }
        }

        let attributes = assembler.attributes(event.uid)?;
        let notification = attributes.to_notification(&event);
        let Some(reaction) = watcher.on_notification(&notification) else {
            continue;
        };

        info!("Notify: {}", reaction);
        if reaction.celebrate {
            pixels
                .queue(PixelCommand::Rainbow {
                    wait_ms: CELEBRATE_RAINBOW_WAIT_MS,
                })
                .await;
        }
        pixels
            .queue(PixelCommand::Chase {
                color: reaction.color.rgb(),
                wait_ms: CHASE_WAIT_MS,
            })
            .await;
    }
}
