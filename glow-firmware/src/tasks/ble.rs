// BLE Task - Baut den trouble-host Stack auf und startet den gewählten Modus
use bt_hci::controller::ExternalController;
use bt_hci::param::LeAdvReportsIter;
use defmt::{Debug2Format, error, info};
use embassy_futures::select::{Either, select};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use esp_hal::efuse::Efuse;
use esp_hal::peripherals::BT;
use esp_radio::ble::controller::BleConnector;
use glow_core::GlowMode;
use glow_core::crowd::DeviceAddress;
use static_cell::StaticCell;
use trouble_host::prelude::*;

use crate::PixelPlayer;
use crate::config::{BLE_SLOTS, CONNECTIONS_MAX, L2CAP_CHANNELS_MAX, glow_mode};
use crate::tasks::{crowd, notify};

/// HCI Controller über den ESP32 Radio-Treiber
pub type BleController = ExternalController<BleConnector<'static>, BLE_SLOTS>;

/// trouble-host Stack mit Standard-Paketpool
pub type BleStack = Stack<'static, BleController, DefaultPacketPool>;

type BleResources = HostResources<DefaultPacketPool, CONNECTIONS_MAX, L2CAP_CHANNELS_MAX>;

/// Kapazität des Channels für Advertising Reports
pub const SCAN_CHANNEL_SIZE: usize = 16;

/// Adressen aus Advertising Reports (Event Handler → Crowd-Logik)
pub type ScanChannel = Channel<CriticalSectionRawMutex, DeviceAddress, SCAN_CHANNEL_SIZE>;

/// Leitet die Adresse jedes Advertising Reports weiter
///
/// Läuft im Kontext des BLE-Runners und darf nicht blockieren: ist der
/// Channel voll, wird der Report verworfen.
pub struct AdvertiserHandler<'a> {
    pub channel: &'a ScanChannel,
}

impl EventHandler for AdvertiserHandler<'_> {
    fn on_adv_reports(&self, reports: LeAdvReportsIter) {
        reports.filter_map(Result::ok).for_each(|report| {
            // Voller Channel: Gerät wird im nächsten Report erneut gemeldet
            let _ = self.channel.try_send(report.addr.into_inner());
        });
    }
}

/// Startet das Gerät neu
///
/// Sicherheitsnetz für Fehler, von denen sich der BLE-Stack nicht erholt.
fn restart() -> ! {
    error!("BLE: unrecoverable error, restarting device");
    esp_hal::system::software_reset()
}

/// BLE Task
///
/// Initialisiert Controller und Host, dann läuft der Runner parallel zur
/// Logik des gewählten Modus. Endet der Runner, wird neu gestartet.
///
/// # Parameter
/// - `radio`: initialisierter esp-radio Controller
/// - `bt`: BT Peripheral
/// - `pixels`: Zugang zum Pixel-Task
#[embassy_executor::task]
pub async fn ble_task(
    radio: &'static esp_radio::Controller<'static>,
    bt: BT<'static>,
    pixels: PixelPlayer,
) {
    let connector = match BleConnector::new(radio, bt, Default::default()) {
        Ok(connector) => connector,
        Err(e) => {
            error!("BLE: failed to create connector: {}", Debug2Format(&e));
            restart();
        }
    };
    let controller: BleController = ExternalController::new(connector);

    static RESOURCES: StaticCell<BleResources> = StaticCell::new();
    let resources = RESOURCES.init(BleResources::new());

    let address = Address::random(Efuse::mac_address());
    info!("BLE: address {}", Debug2Format(&address));

    let stack: BleStack = trouble_host::new(controller, resources)
        .set_random_address(address)
        .set_io_capabilities(IoCapabilities::NoInputNoOutput);
    let Host {
        central,
        peripheral,
        mut runner,
        ..
    } = stack.build();

    let scan_channel = ScanChannel::new();
    let handler = AdvertiserHandler {
        channel: &scan_channel,
    };

    let mode = glow_mode();
    info!("BLE: starting in {} mode", mode);

    let app = async {
        match mode {
            GlowMode::Notify => notify::run(&stack, peripheral, pixels).await,
            GlowMode::Crowd => crowd::run(central, &scan_channel, pixels).await,
        }
    };

    match select(runner.run_with_handler(&handler), app).await {
        Either::First(result) => {
            error!("BLE: host runner stopped: {}", Debug2Format(&result));
            restart();
        }
        Either::Second(_) => unreachable!(),
    }
}
