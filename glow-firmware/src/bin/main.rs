// Keine Standard-Bibliothek verwenden (Embedded System)
#![no_std]
// Kein normaler main() Einstiegspunkt (wird von esp_rtos bereitgestellt)
#![no_main]
// Verbiete mem::forget - gefährlich bei ESP HAL Types mit DMA-Buffern
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
// Verbiete große Stack-Frames (Stack ist auf Embedded Systemen begrenzt)
#![deny(clippy::large_stack_frames)]

// Heap Allocator (BLE-Controller benötigt dynamischen Speicher)
extern crate alloc;

// Embassy Async Runtime
use embassy_executor::Spawner;
use embassy_time::{Duration, Timer};

// ESP32-C6 HAL
use esp_hal::clock::CpuClock;
use esp_hal::timer::timg::TimerGroup;

// Backtrace bei Panic und println!() Support
use {esp_backtrace as _, esp_println as _};

use defmt::info;

// Projekt-Module und Konfiguration
use ble_glow::{PixelCommandChannel, PixelIdleSignal, PixelPlayer};
use ble_glow::config::{DEVICE_NAME, PIXEL_COUNT, PIXEL_GPIO_PIN, RADIO_HEAP_SIZE};
use ble_glow::tasks::{ble_task, pixel_task};

// ESP-IDF App Descriptor - erforderlich für den Bootloader!
// Ohne diesen schlägt das Flashen mit "ESP-IDF App Descriptor missing" fehl
esp_bootloader_esp_idf::esp_app_desc!();

/// Main Entry Point
///
/// Initialisiert Hardware und Radio, startet Embassy Runtime und spawnt
/// Pixel- und BLE-Task. Danach schläft main() - alle Arbeit läuft in Tasks.
#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    // ESP32-C6 Konfiguration: CPU auf maximale Taktfrequenz (160 MHz)
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    // Heap Allocator im reclaimed RAM (Bootloader-Bereich)
    esp_alloc::heap_allocator!(
        #[esp_hal::ram(reclaimed)]
        size: RADIO_HEAP_SIZE
    );

    // Embassy Runtime initialisieren (Timer + Software Interrupt)
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let sw_interrupt =
        esp_hal::interrupt::software::SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    esp_rtos::start(timg0.timer0, sw_interrupt.software_interrupt0);

    info!(
        "{}: {} pixels on GPIO{}",
        DEVICE_NAME, PIXEL_COUNT, PIXEL_GPIO_PIN
    );

    // Radio initialisieren, muss 'static sein für den BLE-Task
    static RADIO_INIT: static_cell::StaticCell<esp_radio::Controller> =
        static_cell::StaticCell::new();
    let radio_init = RADIO_INIT.init(esp_radio::init().expect("Failed to initialize BLE controller"));

    // Kommando-Channel erstellen (BLE Task → Pixel Task)
    static COMMAND_CHANNEL: static_cell::StaticCell<PixelCommandChannel> =
        static_cell::StaticCell::new();
    let command_channel: &'static PixelCommandChannel =
        COMMAND_CHANNEL.init(PixelCommandChannel::new());

    // Rückmeldung Pixel Task → BLE Task (Animation fertig)
    static PIXELS_IDLE: static_cell::StaticCell<PixelIdleSignal> = static_cell::StaticCell::new();
    let pixels_idle: &'static PixelIdleSignal = PIXELS_IDLE.init(PixelIdleSignal::new());

    // Spawn Pixel Task (spielt Animationen ab)
    spawner
        .spawn(pixel_task(
            peripherals.GPIO8,
            peripherals.RMT,
            command_channel.receiver(),
            pixels_idle,
        ))
        .unwrap();

    // Spawn BLE Task (Notify- oder Crowd-Modus)
    spawner
        .spawn(ble_task(
            radio_init,
            peripherals.BT,
            PixelPlayer::new(command_channel.sender(), pixels_idle),
        ))
        .unwrap();

    // Main-Loop: schläft (alle Arbeit läuft in Tasks)
    loop {
        Timer::after(Duration::from_secs(3600)).await;
    }
}
