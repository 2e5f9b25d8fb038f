//! EEP D2-50: heat recovery ventilation.
//!
//! Applies to D2-50-00, D2-50-01, D2-50-10 and D2-50-11, which share a layout. Known to be sent
//! by e.g. the Dimplex DL 50 WE2 and DL 50 WH2.
//!
//! Only the basic status message is decoded. Byte offsets below are into the VLD payload, i.e.
//! the ERP1 data field with the RORG byte removed.

use crate::bits;
use crate::error::DecodeError;
use tracing::trace;

/// Sub-format of a D2-50 telegram, from the top three bits of byte 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageType {
    RemoteTransmissionRequest,
    Control,
    BasicStatus,
    ExtendedStatus,
}

impl MessageType {
    pub fn from_byte(byte0: u8) -> Result<Self, DecodeError> {
        let code = byte0 >> 5 & 0b111;
        Ok(match code {
            0 => Self::RemoteTransmissionRequest,
            1 => Self::Control,
            2 => Self::BasicStatus,
            3 => Self::ExtendedStatus,
            _ => return Err(DecodeError::InvalidEnumCode { field: "message type", code }),
        })
    }
}

/// Ventilation mode reported in the low nibble of byte 0.
///
/// Codes 5 to 10 and 15 are reserved by the profile and rejected.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    strum::IntoStaticStr,
    strum::EnumString,
    strum::VariantArray,
    serde::Serialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
#[repr(u8)]
pub enum OperationMode {
    Off = 0,
    #[strum(serialize = "level-1")]
    #[serde(rename = "level-1")]
    Level1 = 1,
    #[strum(serialize = "level-2")]
    #[serde(rename = "level-2")]
    Level2 = 2,
    #[strum(serialize = "level-3")]
    #[serde(rename = "level-3")]
    Level3 = 3,
    #[strum(serialize = "level-4")]
    #[serde(rename = "level-4")]
    Level4 = 4,
    Automatic = 11,
    AutomaticOnDemand = 12,
    SupplyAirOnly = 13,
    ExhaustAirOnly = 14,
}

impl OperationMode {
    pub fn from_byte(byte0: u8) -> Result<Self, DecodeError> {
        let code = byte0 & 0x0F;
        Ok(match code {
            0 => Self::Off,
            1 => Self::Level1,
            2 => Self::Level2,
            3 => Self::Level3,
            4 => Self::Level4,
            11 => Self::Automatic,
            12 => Self::AutomaticOnDemand,
            13 => Self::SupplyAirOnly,
            14 => Self::ExhaustAirOnly,
            _ => return Err(DecodeError::InvalidEnumCode { field: "operation mode", code }),
        })
    }

    /// The wire code of this mode.
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl std::fmt::Display for OperationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(<&'static str>::from(self))
    }
}

/// Result of a field whose position in the telegram is not known.
///
/// The layout documentation for these fields is incomplete, so they are reported as unavailable
/// rather than as a zero reading.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field<T> {
    Value(T),
    Unsupported,
}

macro_rules! flags {
    ($($(#[$meta:meta])* $name:ident = byte $byte:literal, bit $bit:literal;)*) => {
        $(
            $(#[$meta])*
            pub fn $name(&self) -> Result<bool, DecodeError> {
                bits::bit(self.bytes, $byte, $bit)
            }
        )*
    };
}

/// A received D2-50 payload.
#[derive(Clone, Copy, Debug)]
pub struct Telegram<'a> {
    bytes: &'a [u8],
}

impl<'a> Telegram<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    pub fn message_type(&self) -> Result<MessageType, DecodeError> {
        let byte0 = bits::byte(self.bytes, 0)?;
        let message_type = MessageType::from_byte(byte0);
        trace!(byte0, ?message_type, "decoded message type");
        message_type
    }

    pub fn operation_mode(&self) -> Result<OperationMode, DecodeError> {
        OperationMode::from_byte(bits::byte(self.bytes, 0)?)
    }

    flags! {
        safety_mode_enabled = byte 1, bit 3;
        heat_exchanger_bypass_opened = byte 1, bit 2;
        supply_air_flap_opened = byte 1, bit 1;
        exhaust_air_flap_opened = byte 1, bit 0;
        defrost_mode_active = byte 2, bit 7;
        cooling_protection_active = byte 2, bit 6;
        outdoor_air_heater_active = byte 2, bit 5;
        supply_air_heater_active = byte 2, bit 4;
        drain_heater_active = byte 2, bit 3;
        timer_operation_mode_active = byte 2, bit 2;
        filter_maintenance_required = byte 2, bit 1;
        weekly_timer_program_active = byte 2, bit 0;
        room_temperature_control_active = byte 3, bit 7;
        /// `true` when the unit is configured as master.
        is_master = byte 4, bit 7;
    }

    /// Air quality in percent. The field is 7 bits wide, so values above 100 can appear and are
    /// passed through.
    pub fn air_quality_1(&self) -> Result<u8, DecodeError> {
        bits::masked(self.bytes, 3, 0x7F)
    }

    pub fn air_quality_2(&self) -> Result<u8, DecodeError> {
        bits::masked(self.bytes, 4, 0x7F)
    }

    /// Degrees Celsius, −64 to 63.
    pub fn outdoor_air_temperature(&self) -> Result<i16, DecodeError> {
        let raw = bits::bits(self.bytes, 5, 1, 7)?;
        Ok(i16::from(raw) - 64)
    }

    /// Degrees Celsius.
    ///
    /// The bit widths and the offset are not confirmed against the profile document; byte 6 is
    /// taken unsigned.
    pub fn supply_air_temperature(&self) -> Result<i16, DecodeError> {
        let high = i16::from(bits::masked(self.bytes, 5, 0x7F)?);
        let low = i16::from(bits::bits(self.bytes, 6, 2, 6)?);
        Ok((high << 6 | low) - 64)
    }

    pub fn indoor_air_temperature(&self) -> Field<i16> {
        Field::Unsupported
    }

    pub fn exhaust_air_temperature(&self) -> Field<i16> {
        Field::Unsupported
    }

    /// Nominally 0 to 1023 m³/h.
    pub fn supply_fan_flow_rate(&self) -> Field<u16> {
        Field::Unsupported
    }

    pub fn exhaust_fan_flow_rate(&self) -> Field<u16> {
        Field::Unsupported
    }

    /// Nominally 0 to 4095 rpm, somewhere in bytes 11 and 12.
    pub fn supply_fan_speed(&self) -> Field<u16> {
        Field::Unsupported
    }

    /// Nominally 0 to 4095 rpm, somewhere in bytes 12 and 13.
    pub fn exhaust_fan_speed(&self) -> Field<u16> {
        Field::Unsupported
    }
}
