//! Integration Tests für die Glow Logic
//!
//! Diese Tests laufen auf dem Host (x86_64) und nutzen MockPixelStrip

use glow_core::ancs::{
    AncsError, AttributeAssembler, EventFlags, NotificationAttributes, NotificationEvent,
    encode_get_attributes,
};
use glow_core::notify::SMS_APP_ID;
use glow_core::{
    Animation, CrowdLevel, CrowdThresholds, DeviceCounter, GlowMode, IdleStep, IdleTimer,
    LedError, LinkEvent, LinkStep, NamedColor, PairingGate, PixelCommand, PixelStrip, SmsWatcher,
    wheel,
};
use rgb::RGB8;

const PIXEL_COUNT: usize = 10;

// ============================================================================
// Mock Pixel Strip
// ============================================================================

#[derive(Default)]
pub struct MockPixelStrip {
    pub last_frame: Option<[RGB8; PIXEL_COUNT]>,
    pub write_count: usize,
    pub fail_next_write: bool,
}

impl MockPixelStrip {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PixelStrip for MockPixelStrip {
    fn write(&mut self, pixels: &[RGB8]) -> Result<(), LedError> {
        if self.fail_next_write {
            self.fail_next_write = false;
            return Err(LedError::WriteFailed);
        }

        let mut frame = [RGB8::default(); PIXEL_COUNT];
        frame.copy_from_slice(pixels);
        self.last_frame = Some(frame);
        self.write_count += 1;
        Ok(())
    }
}

/// Spielt ein Kommando ohne Wartezeiten ab, gibt die Anzahl Frames zurück
fn play(
    command: PixelCommand,
    strip: &mut MockPixelStrip,
    pixels: &mut [RGB8; PIXEL_COUNT],
) -> Result<usize, LedError> {
    let mut animation = Animation::new(command);
    let mut frames = 0;
    while animation.step(pixels) {
        strip.write(pixels)?;
        frames += 1;
    }
    Ok(frames)
}

// ============================================================================
// Tests: MockPixelStrip
// ============================================================================

#[test]
fn test_mock_pixel_strip_write() {
    let mut mock = MockPixelStrip::new();
    let frame = [NamedColor::Red.rgb(); PIXEL_COUNT];

    assert_eq!(mock.write_count, 0);
    assert_eq!(mock.last_frame, None);

    mock.write(&frame).unwrap();

    assert_eq!(mock.write_count, 1);
    assert_eq!(mock.last_frame, Some(frame));
}

#[test]
fn test_mock_pixel_strip_recovers_after_fail() {
    let mut mock = MockPixelStrip::new();
    mock.fail_next_write = true;

    let result1 = mock.write(&[RGB8::default(); PIXEL_COUNT]);
    assert_eq!(result1, Err(LedError::WriteFailed));

    let result2 = mock.write(&[NamedColor::Green.rgb(); PIXEL_COUNT]);
    assert!(result2.is_ok());
    assert_eq!(mock.write_count, 1);
}

// ============================================================================
// Tests: wheel()
// ============================================================================

#[test]
fn test_wheel_reference_points() {
    assert_eq!(wheel(0), RGB8 { r: 255, g: 0, b: 0 });
    assert_eq!(wheel(85), RGB8 { r: 0, g: 255, b: 0 });
    assert_eq!(wheel(170), RGB8 { r: 0, g: 0, b: 255 });
    assert_eq!(wheel(-1), RGB8 { r: 0, g: 0, b: 0 });
    assert_eq!(wheel(256), RGB8 { r: 0, g: 0, b: 0 });
}

#[test]
fn test_wheel_channel_sum_is_constant() {
    // Jeder Wert ist 255 - k*3 und k*3, also Summe 255
    for pos in 0..=255 {
        let c = wheel(pos);
        assert_eq!(
            u16::from(c.r) + u16::from(c.g) + u16::from(c.b),
            255,
            "pos {pos}"
        );
    }
}

#[test]
fn test_wheel_monotonic_within_bands() {
    for band in [0..85, 85..170, 170..256] {
        let start = band.start;
        for pos in band.skip(1) {
            let prev = wheel(pos - 1);
            let next = wheel(pos);
            let deltas = [
                i16::from(next.r) - i16::from(prev.r),
                i16::from(next.g) - i16::from(prev.g),
                i16::from(next.b) - i16::from(prev.b),
            ];
            assert_eq!(
                deltas.iter().filter(|d| **d < 0).count(),
                1,
                "band from {start}, pos {pos}"
            );
            assert_eq!(deltas.iter().filter(|d| **d > 0).count(), 1);
            assert_eq!(deltas.iter().filter(|d| **d == 0).count(), 1);
        }
    }
}

// ============================================================================
// Tests: NamedColor
// ============================================================================

#[test]
fn test_palette_literal_values() {
    let table = [
        ("RED", (255, 0, 0)),
        ("YELLOW", (255, 150, 0)),
        ("GREEN", (0, 255, 0)),
        ("CYAN", (0, 255, 255)),
        ("BLUE", (0, 0, 255)),
        ("PURPLE", (180, 0, 255)),
        ("WHITE", (255, 255, 255)),
        ("ORANGE", (255, 165, 0)),
        ("PINK", (255, 192, 203)),
        ("OFF", (0, 0, 0)),
    ];
    for (name, (r, g, b)) in table {
        let color = NamedColor::lookup(&name.to_lowercase()).unwrap();
        assert_eq!(color.rgb(), RGB8 { r, g, b }, "{name}");
        assert_eq!(color.name(), name);
    }
    assert_eq!(NamedColor::ALL.len(), table.len());
}

#[test]
fn test_palette_try_from() {
    use core::convert::TryFrom;
    assert_eq!(NamedColor::try_from("Cyan"), Ok(NamedColor::Cyan));
    assert!(NamedColor::try_from("Gelb").is_err());
}

// ============================================================================
// Tests: Animation
// ============================================================================

#[test]
fn test_chase_sweeps_whole_strip() {
    let mut mock = MockPixelStrip::new();
    let mut pixels = [RGB8::default(); PIXEL_COUNT];
    let purple = NamedColor::Purple.rgb();

    let frames = play(
        PixelCommand::Chase {
            color: purple,
            wait_ms: 500,
        },
        &mut mock,
        &mut pixels,
    )
    .unwrap();

    assert_eq!(frames, PIXEL_COUNT);
    assert_eq!(mock.write_count, PIXEL_COUNT);
    assert_eq!(mock.last_frame, Some([purple; PIXEL_COUNT]));
}

#[test]
fn test_rainbow_last_frame() {
    let mut mock = MockPixelStrip::new();
    let mut pixels = [RGB8::default(); PIXEL_COUNT];

    let frames = play(PixelCommand::Rainbow { wait_ms: 100 }, &mut mock, &mut pixels).unwrap();

    assert_eq!(frames, 255);
    let last = mock.last_frame.unwrap();
    // Letzter Frame ist j = 254
    assert_eq!(last[0], wheel(254));
    assert_eq!(last[1], wheel(255));
    assert_eq!(last[2], wheel(0));
}

#[test]
fn test_animation_stops_on_write_error() {
    let mut mock = MockPixelStrip::new();
    mock.fail_next_write = true;
    let mut pixels = [RGB8::default(); PIXEL_COUNT];

    let result = play(
        PixelCommand::Fill(NamedColor::White.rgb()),
        &mut mock,
        &mut pixels,
    );
    assert_eq!(result, Err(LedError::WriteFailed));
    assert_eq!(mock.write_count, 0);
}

// ============================================================================
// Tests: Notify Mode
// ============================================================================

#[test]
fn test_idle_rest_after_fifteen_minutes() {
    // 150 Ticks à 6 Sekunden
    let mut idle = IdleTimer::new(150);
    let first_rest = (0..1000).position(|_| idle.tick() == IdleStep::Rest);
    assert_eq!(first_rest, Some(150));
}

#[test]
fn test_sms_from_ancs_wire_to_reaction() {
    let mut watcher = SmsWatcher::new(2);
    let uid = 77u32;

    let event = NotificationEvent::parse(&[0, 0, 4, 1, 77, 0, 0, 0]).unwrap();
    assert_eq!(event.uid, uid);

    let mut request = [0u8; 16];
    let request = encode_get_attributes(event.uid, 32, &mut request).unwrap();
    assert_eq!(&request[1..5], &uid.to_le_bytes());

    let mut assembler = AttributeAssembler::<128>::new();
    let mut response = vec![0u8, 77, 0, 0, 0, 0];
    response.extend_from_slice(&(SMS_APP_ID.len() as u16).to_le_bytes());
    response.extend_from_slice(SMS_APP_ID.as_bytes());
    response.extend_from_slice(&[3, 6, 0]);
    response.extend_from_slice(b"orange");
    let (head, tail) = response.split_at(10);
    assembler.push(head).unwrap();
    assembler.push(tail).unwrap();

    let attrs = assembler.attributes(uid).unwrap();
    let notification = attrs.to_notification(&event);
    let reaction = watcher.on_notification(&notification).unwrap();
    assert_eq!(reaction.color, NamedColor::Orange);
    assert!(!reaction.celebrate);
}

#[test]
fn test_lost_answer_does_not_block_next_notification() {
    let mut watcher = SmsWatcher::new(2);
    let mut assembler = AttributeAssembler::<128>::new();

    // Antwort auf UID 5 bleibt nach dem ersten Fragment stecken
    assembler.push(&[0, 5, 0, 0, 0, 0, 19]).unwrap();
    assert_eq!(assembler.attributes(5), Err(AncsError::Incomplete));

    // Nächste Anfrage beginnt mit leerem Buffer
    assembler.clear();
    let mut response = vec![0u8, 6, 0, 0, 0, 0];
    response.extend_from_slice(&(SMS_APP_ID.len() as u16).to_le_bytes());
    response.extend_from_slice(SMS_APP_ID.as_bytes());
    response.extend_from_slice(&[3, 4, 0]);
    response.extend_from_slice(b"cyan");
    assembler.push(&response).unwrap();

    let event = NotificationEvent::parse(&[0, 0, 4, 1, 6, 0, 0, 0]).unwrap();
    let attrs = assembler.attributes(6).unwrap();
    let reaction = watcher.on_notification(&attrs.to_notification(&event));
    assert_eq!(reaction.map(|r| r.color), Some(NamedColor::Cyan));
}

#[test]
fn test_pairing_gate_before_subscribe() {
    let mut gate = PairingGate::new();
    // Pair-Dialog noch offen
    assert_eq!(gate.on_event(LinkEvent::Other), LinkStep::Wait);
    assert!(!gate.is_secured());
    assert_eq!(
        gate.on_event(LinkEvent::PairingComplete { encrypted: true }),
        LinkStep::Secured
    );

    let mut rejected = PairingGate::new();
    assert_eq!(rejected.on_event(LinkEvent::PairingFailed), LinkStep::Abort);
}

#[test]
fn test_idle_tick_plays_chase_before_sleeping() {
    // Aus-Chase 5,5 s, Ruhe-Regenbogen 25,5 s
    let chase = Animation::new(PixelCommand::Chase {
        color: NamedColor::Off.rgb(),
        wait_ms: 500,
    });
    assert_eq!(chase.duration_ms(PIXEL_COUNT), 5_500);
    let rainbow = Animation::new(PixelCommand::Rainbow { wait_ms: 100 });
    assert_eq!(rainbow.duration_ms(PIXEL_COUNT), 25_500);
}

#[test]
fn test_preexisting_flag_is_carried_over() {
    let mut watcher = SmsWatcher::new(2);
    let event =
        NotificationEvent::parse(&[0, EventFlags::PRE_EXISTING, 4, 1, 1, 0, 0, 0]).unwrap();
    let attrs = NotificationAttributes {
        uid: 1,
        app_id: SMS_APP_ID,
        message: "red",
    };
    assert_eq!(watcher.on_notification(&attrs.to_notification(&event)), None);
}

// ============================================================================
// Tests: Crowd Mode
// ============================================================================

#[test]
fn test_crowd_window_to_color() {
    let mut counter = DeviceCounter::<32>::new(CrowdThresholds::default(), 10);
    for i in 0..7u8 {
        counter.observe([i, 0, 0, 0, 0, 0xC0]);
        counter.observe([i, 0, 0, 0, 0, 0xC0]);
    }
    let summary = counter.finish_scan();
    assert_eq!(summary.count, 7);
    assert_eq!(summary.level, CrowdLevel::Many);
    assert_eq!(summary.level.color(), NamedColor::Orange);
}

#[test]
fn test_crowd_empty_window_is_blue() {
    let mut counter = DeviceCounter::<32>::new(CrowdThresholds::default(), 10);
    assert_eq!(counter.finish_scan().level.color(), NamedColor::Blue);
}

// ============================================================================
// Tests: GlowMode
// ============================================================================

#[test]
fn test_glow_mode_try_from() {
    use core::convert::TryFrom;
    assert_eq!(GlowMode::try_from("crowd"), Ok(GlowMode::Crowd));
    assert_eq!(GlowMode::try_from("NOTIFY"), Ok(GlowMode::Notify));
    assert!(GlowMode::try_from("party").is_err());
    assert_eq!(GlowMode::default(), GlowMode::Notify);
}
