//! Apple Notification Center Service (ANCS) Codec
//!
//! Wire-Format der drei ANCS-Characteristics, ohne BLE-Stack:
//! - Notification Source: 8-Byte Events (neu / geändert / entfernt)
//! - Control Point: "Get Notification Attributes" Kommando
//! - Data Source: Antwort mit Attribut-Tupeln, ggf. über mehrere
//!   GATT-Notifications verteilt
//!
//! Alle Mehrbyte-Werte sind Little Endian.

use heapless::Vec;

use crate::notify::Notification;

/// ANCS Service UUID
pub const SERVICE_UUID: u128 = 0x7905_F431_B5CE_4E99_A40F_4B1E_122D_00D0;
/// Notification Source Characteristic (notify)
pub const NOTIFICATION_SOURCE_UUID: u128 = 0x9FBF_120D_6301_42D9_8C58_25E6_99A2_1DBD;
/// Control Point Characteristic (write with response)
pub const CONTROL_POINT_UUID: u128 = 0x69D1_D8F3_45E1_49A8_9821_9BBD_FDAA_D4D9;
/// Data Source Characteristic (notify)
pub const DATA_SOURCE_UUID: u128 = 0x22EA_C6E9_24D6_4BB5_BE44_B36A_CE7C_7BFB;

/// CommandID für "Get Notification Attributes"
pub const COMMAND_GET_NOTIFICATION_ATTRIBUTES: u8 = 0;

/// Länge eines Notification Source Events in Bytes
pub const EVENT_LEN: usize = 8;

/// Länge des Get-Attributes-Kommandos für App Identifier + Message
pub const GET_ATTRIBUTES_LEN: usize = 9;

/// Fehler beim Kodieren/Dekodieren
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AncsError {
    /// Weniger Bytes als das Format verlangt
    TooShort,
    /// EventID oder CommandID unbekannt
    UnknownCommand,
    /// Antwort gehört zu einer anderen Notification
    UidMismatch,
    /// Reassembly-Buffer voll
    BufferFull,
    /// Attributwert ist kein UTF-8
    InvalidUtf8,
    /// Antwort noch nicht vollständig empfangen
    Incomplete,
}

/// Art des Notification Source Events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventId {
    Added,
    Modified,
    Removed,
}

impl core::convert::TryFrom<u8> for EventId {
    type Error = AncsError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Added),
            1 => Ok(Self::Modified),
            2 => Ok(Self::Removed),
            _ => Err(AncsError::UnknownCommand),
        }
    }
}

/// EventFlags Bitfeld
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventFlags(pub u8);

impl EventFlags {
    pub const SILENT: u8 = 1 << 0;
    pub const IMPORTANT: u8 = 1 << 1;
    pub const PRE_EXISTING: u8 = 1 << 2;
    pub const POSITIVE_ACTION: u8 = 1 << 3;
    pub const NEGATIVE_ACTION: u8 = 1 << 4;

    pub fn silent(self) -> bool {
        self.0 & Self::SILENT != 0
    }

    pub fn important(self) -> bool {
        self.0 & Self::IMPORTANT != 0
    }

    /// Notification existierte schon vor dem Verbinden
    pub fn preexisting(self) -> bool {
        self.0 & Self::PRE_EXISTING != 0
    }
}

/// Kategorie der Notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Other,
    IncomingCall,
    MissedCall,
    Voicemail,
    Social,
    Schedule,
    Email,
    News,
    HealthAndFitness,
    BusinessAndFinance,
    Location,
    Entertainment,
    /// Von neueren iOS-Versionen eingeführt
    Unknown(u8),
}

impl From<u8> for Category {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::Other,
            1 => Self::IncomingCall,
            2 => Self::MissedCall,
            3 => Self::Voicemail,
            4 => Self::Social,
            5 => Self::Schedule,
            6 => Self::Email,
            7 => Self::News,
            8 => Self::HealthAndFitness,
            9 => Self::BusinessAndFinance,
            10 => Self::Location,
            11 => Self::Entertainment,
            other => Self::Unknown(other),
        }
    }
}

/// Event von der Notification Source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationEvent {
    pub event: EventId,
    pub flags: EventFlags,
    pub category: Category,
    pub category_count: u8,
    pub uid: u32,
}

impl NotificationEvent {
    /// Dekodiert ein 8-Byte Event; zusätzliche Bytes werden ignoriert
    pub fn parse(data: &[u8]) -> Result<Self, AncsError> {
        let [event, flags, category, category_count, u0, u1, u2, u3, ..] = *data else {
            return Err(AncsError::TooShort);
        };
        Ok(Self {
            event: EventId::try_from(event)?,
            flags: EventFlags(flags),
            category: Category::from(category),
            category_count,
            uid: u32::from_le_bytes([u0, u1, u2, u3]),
        })
    }
}

/// Attribut-IDs für Notification Attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AttributeId {
    AppIdentifier = 0,
    Title = 1,
    Subtitle = 2,
    Message = 3,
    MessageSize = 4,
    Date = 5,
    PositiveActionLabel = 6,
    NegativeActionLabel = 7,
}

/// Kodiert "Get Notification Attributes" für App Identifier und Message
///
/// Gibt den beschriebenen Teil von `buf` zurück.
///
/// ```
/// # use glow_core::ancs::encode_get_attributes;
/// let mut buf = [0u8; 16];
/// let cmd = encode_get_attributes(0x0102_0304, 32, &mut buf).unwrap();
/// assert_eq!(cmd, &[0, 4, 3, 2, 1, 0, 3, 32, 0]);
/// ```
pub fn encode_get_attributes(
    uid: u32,
    message_max_len: u16,
    buf: &mut [u8],
) -> Result<&[u8], AncsError> {
    let out = buf
        .get_mut(..GET_ATTRIBUTES_LEN)
        .ok_or(AncsError::TooShort)?;
    out[0] = COMMAND_GET_NOTIFICATION_ATTRIBUTES;
    out[1..5].copy_from_slice(&uid.to_le_bytes());
    out[5] = AttributeId::AppIdentifier as u8;
    out[6] = AttributeId::Message as u8;
    out[7..9].copy_from_slice(&message_max_len.to_le_bytes());
    Ok(out)
}

/// Dekodierte Attribute einer Notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationAttributes<'a> {
    pub uid: u32,
    pub app_id: &'a str,
    pub message: &'a str,
}

impl<'a> NotificationAttributes<'a> {
    /// Dekodiert eine vollständige Data Source Antwort
    ///
    /// Unbekannte Attribute werden übersprungen. Fehlen App Identifier oder
    /// Message, ist die Antwort `Incomplete`.
    pub fn parse(data: &'a [u8]) -> Result<Self, AncsError> {
        let [command, u0, u1, u2, u3, ref rest @ ..] = *data else {
            return Err(AncsError::Incomplete);
        };
        if command != COMMAND_GET_NOTIFICATION_ATTRIBUTES {
            return Err(AncsError::UnknownCommand);
        }

        let mut app_id = None;
        let mut message = None;
        let mut rest = rest;
        while app_id.is_none() || message.is_none() {
            let [id, l0, l1, ref tail @ ..] = *rest else {
                return Err(AncsError::Incomplete);
            };
            let len = usize::from(u16::from_le_bytes([l0, l1]));
            if tail.len() < len {
                return Err(AncsError::Incomplete);
            }
            let (value, next) = tail.split_at(len);
            let value = core::str::from_utf8(value).map_err(|_| AncsError::InvalidUtf8)?;
            if id == AttributeId::AppIdentifier as u8 {
                app_id = Some(value);
            } else if id == AttributeId::Message as u8 {
                message = Some(value);
            }
            rest = next;
        }

        match (app_id, message) {
            (Some(app_id), Some(message)) => Ok(Self {
                uid: u32::from_le_bytes([u0, u1, u2, u3]),
                app_id,
                message,
            }),
            _ => Err(AncsError::Incomplete),
        }
    }

    /// Verknüpft die Attribute mit den Flags des auslösenden Events
    pub fn to_notification(&self, event: &NotificationEvent) -> Notification<'a> {
        Notification {
            uid: self.uid,
            app_id: self.app_id,
            message: self.message,
            preexisting: event.flags.preexisting(),
        }
    }
}

/// Sammelt Data Source Fragmente bis eine Antwort vollständig ist
#[derive(Debug, Clone, Default)]
pub struct AttributeAssembler<const N: usize> {
    buf: Vec<u8, N>,
}

impl<const N: usize> AttributeAssembler<N> {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Verwirft angefangene Antworten
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Hängt ein Fragment an
    pub fn push(&mut self, fragment: &[u8]) -> Result<(), AncsError> {
        self.buf
            .extend_from_slice(fragment)
            .map_err(|_| AncsError::BufferFull)
    }

    /// Versucht die Antwort für `uid` zu dekodieren
    ///
    /// `Incomplete` heißt: auf weitere Fragmente warten.
    pub fn attributes(&self, uid: u32) -> Result<NotificationAttributes<'_>, AncsError> {
        let attributes = NotificationAttributes::parse(&self.buf)?;
        if attributes.uid != uid {
            return Err(AncsError::UidMismatch);
        }
        Ok(attributes)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for AncsError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            AncsError::TooShort => defmt::write!(fmt, "TooShort"),
            AncsError::UnknownCommand => defmt::write!(fmt, "UnknownCommand"),
            AncsError::UidMismatch => defmt::write!(fmt, "UidMismatch"),
            AncsError::BufferFull => defmt::write!(fmt, "BufferFull"),
            AncsError::InvalidUtf8 => defmt::write!(fmt, "InvalidUtf8"),
            AncsError::Incomplete => defmt::write!(fmt, "Incomplete"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_event_added() {
        let data = [0, EventFlags::PRE_EXISTING, 4, 1, 0x78, 0x56, 0x34, 0x12];
        let event = NotificationEvent::parse(&data).unwrap();
        assert_eq!(event.event, EventId::Added);
        assert!(event.flags.preexisting());
        assert!(!event.flags.silent());
        assert_eq!(event.category, Category::Social);
        assert_eq!(event.uid, 0x1234_5678);
    }

    #[test]
    fn test_parse_event_rejects_short_and_unknown() {
        assert_eq!(
            NotificationEvent::parse(&[0, 0, 0]),
            Err(AncsError::TooShort)
        );
        assert_eq!(
            NotificationEvent::parse(&[9, 0, 0, 0, 0, 0, 0, 0]),
            Err(AncsError::UnknownCommand)
        );
    }

    #[test]
    fn test_unknown_category_is_kept() {
        let event = NotificationEvent::parse(&[2, 0, 42, 0, 1, 0, 0, 0]).unwrap();
        assert_eq!(event.event, EventId::Removed);
        assert_eq!(event.category, Category::Unknown(42));
    }

    #[test]
    fn test_encode_needs_room() {
        let mut buf = [0u8; 4];
        assert_eq!(
            encode_get_attributes(1, 32, &mut buf),
            Err(AncsError::TooShort)
        );
    }

    #[test]
    fn test_parse_attributes_any_order() {
        let data = [
            0, 9, 0, 0, 0, // command + uid
            3, 3, 0, b'r', b'e', b'd', // message
            1, 2, 0, b'h', b'i', // title, wird übersprungen
            0, 2, 0, b'a', b'b', // app id
        ];
        let attrs = NotificationAttributes::parse(&data).unwrap();
        assert_eq!(attrs.uid, 9);
        assert_eq!(attrs.message, "red");
        assert_eq!(attrs.app_id, "ab");
    }

    #[test]
    fn test_parse_attributes_truncated_is_incomplete() {
        let data = [0, 9, 0, 0, 0, 0, 5, 0, b'c', b'o'];
        assert_eq!(
            NotificationAttributes::parse(&data),
            Err(AncsError::Incomplete)
        );
    }

    #[test]
    fn test_parse_attributes_invalid_utf8() {
        let data = [0, 1, 0, 0, 0, 3, 1, 0, 0xFF];
        assert_eq!(
            NotificationAttributes::parse(&data),
            Err(AncsError::InvalidUtf8)
        );
    }

    #[test]
    fn test_assembler_joins_fragments() {
        let mut assembler = AttributeAssembler::<64>::new();
        assembler.push(&[0, 5, 0, 0, 0, 0, 2, 0]).unwrap();
        assert_eq!(assembler.attributes(5), Err(AncsError::Incomplete));
        assembler.push(&[b'i', b'd', 3, 4, 0]).unwrap();
        assembler.push(&[b'P', b'I', b'N', b'K']).unwrap();

        let attrs = assembler.attributes(5).unwrap();
        assert_eq!(attrs.app_id, "id");
        assert_eq!(attrs.message, "PINK");
        assert_eq!(assembler.attributes(6), Err(AncsError::UidMismatch));
    }

    #[test]
    fn test_assembler_overflow() {
        let mut assembler = AttributeAssembler::<4>::new();
        assert_eq!(assembler.push(&[0; 5]), Err(AncsError::BufferFull));
    }
}
