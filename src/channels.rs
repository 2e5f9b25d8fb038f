//! Routing of decoded fields to named channels.

use crate::d2_50::{Field, MessageType, OperationMode, Telegram};
use crate::error::DecodeError;
use tracing::debug;

/// What a channel's value measures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Unit {
    None,
    OnOff,
    OpenClosed,
    Percent,
    Celsius,
    CubicMetresPerHour,
    Hertz,
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Unit::None => "",
            Unit::OnOff => "on/off",
            Unit::OpenClosed => "open/closed",
            Unit::Percent => "%",
            Unit::Celsius => "°C",
            Unit::CubicMetresPerHour => "m³/h",
            Unit::Hertz => "Hz",
        })
    }
}

macro_rules! channels {
    ($($variant:ident = $id:tt: $unit:ident, $description:literal;)*) => {
        /// The channel vocabulary of a D2-50 device.
        #[derive(
            Clone,
            Copy,
            Debug,
            PartialEq,
            Eq,
            Hash,
            strum::IntoStaticStr,
            strum::EnumString,
            strum::VariantArray,
            strum::VariantNames,
        )]
        pub enum Channel {
            $(#[strum(serialize = $id)] $variant,)*
        }

        impl Channel {
            pub fn unit(self) -> Unit {
                match self {
                    $(Self::$variant => Unit::$unit,)*
                }
            }

            pub fn description(self) -> &'static str {
                match self {
                    $(Self::$variant => $description,)*
                }
            }
        }
    };
}

channels! {
    OperationMode = "operation-mode": None, "ventilation level or automatic mode";
    SafetyMode = "safety-mode": OnOff, "safety mode enabled";
    HeatExchangerBypass = "heat-exchanger-bypass": OpenClosed, "heat exchanger bypass";
    SupplyAirFlapPosition = "supply-air-flap-position": OpenClosed, "supply air flap";
    ExhaustAirFlapPosition = "exhaust-air-flap-position": OpenClosed, "exhaust air flap";
    DefrostMode = "defrost-mode": OnOff, "defrosting the heat exchanger";
    CoolingProtection = "cooling-protection": OnOff, "cooling protection active";
    OutdoorAirHeater = "outdoor-air-heater": OnOff, "outdoor air heater running";
    SupplyAirHeater = "supply-air-heater": OnOff, "supply air heater running";
    DrainHeater = "drain-heater": OnOff, "drain heater running";
    TimerOperationMode = "timer-operation-mode": OnOff, "running on a timer";
    FilterMaintenance = "filter-maintenance": OnOff, "filter needs maintenance";
    WeeklyTimerProgram = "weekly-timer-program": OnOff, "weekly timer program active";
    RoomTemperatureControl = "room-temperature-control": OnOff, "room temperature control active";
    AirQualitySensor1 = "air-quality-sensor-1": Percent, "air quality at sensor 1";
    MasterSlaveConfiguration = "master-slave-configuration": OnOff, "on when configured as master";
    AirQualitySensor2 = "air-quality-sensor-2": Percent, "air quality at sensor 2";
    OutdoorAirTemperature = "outdoor-air-temperature": Celsius, "outdoor air temperature";
    SupplyAirTemperature = "supply-air-temperature": Celsius, "supply air temperature";
    IndoorAirTemperature = "indoor-air-temperature": Celsius, "indoor air temperature";
    ExhaustAirTemperature = "exhaust-air-temperature": Celsius, "exhaust air temperature";
    SupplyFanFlowRate = "supply-fan-flow-rate": CubicMetresPerHour, "supply fan air flow";
    ExhaustFanFlowRate = "exhaust-fan-flow-rate": CubicMetresPerHour, "exhaust fan air flow";
    SupplyFanSpeed = "supply-fan-speed": Hertz, "supply fan speed";
    ExhaustFanSpeed = "exhaust-fan-speed": Hertz, "exhaust fan speed";
}

impl Channel {
    pub fn id(self) -> &'static str {
        self.into()
    }

    pub fn all() -> &'static [Channel] {
        <Self as strum::VariantArray>::VARIANTS
    }
}

impl serde::Serialize for Channel {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.id())
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// A decoded value tagged with what it means.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelValue {
    Mode(OperationMode),
    OnOff(bool),
    OpenClosed(bool),
    Percent(u8),
    Celsius(i16),
    CubicMetresPerHour(u16),
    Hertz(u16),
}

impl ChannelValue {
    pub fn unit(&self) -> Unit {
        match self {
            ChannelValue::Mode(_) => Unit::None,
            ChannelValue::OnOff(_) => Unit::OnOff,
            ChannelValue::OpenClosed(_) => Unit::OpenClosed,
            ChannelValue::Percent(_) => Unit::Percent,
            ChannelValue::Celsius(_) => Unit::Celsius,
            ChannelValue::CubicMetresPerHour(_) => Unit::CubicMetresPerHour,
            ChannelValue::Hertz(_) => Unit::Hertz,
        }
    }
}

impl std::fmt::Display for ChannelValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            ChannelValue::Mode(m) => std::fmt::Display::fmt(&m, f),
            ChannelValue::OnOff(v) => f.write_str(if v { "on" } else { "off" }),
            ChannelValue::OpenClosed(v) => f.write_str(if v { "open" } else { "closed" }),
            ChannelValue::Percent(n) => write!(f, "{n}"),
            ChannelValue::Celsius(n) => write!(f, "{n}"),
            ChannelValue::CubicMetresPerHour(n) => write!(f, "{n}"),
            ChannelValue::Hertz(n) => write!(f, "{n}"),
        }
    }
}

impl serde::Serialize for ChannelValue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            ChannelValue::Mode(m) => serde::Serialize::serialize(&m, serializer),
            ChannelValue::OnOff(_) | ChannelValue::OpenClosed(_) => {
                serializer.serialize_str(&self.to_string())
            }
            ChannelValue::Percent(n) => serializer.serialize_u8(n),
            ChannelValue::Celsius(n) => serializer.serialize_i16(n),
            ChannelValue::CubicMetresPerHour(n) => serializer.serialize_u16(n),
            ChannelValue::Hertz(n) => serializer.serialize_u16(n),
        }
    }
}

/// Outcome of asking a telegram for one channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    Value(ChannelValue),
    /// The channel is not carried by this kind of message.
    Undefined,
    /// The channel is carried, but where in the telegram is not known.
    Unsupported,
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            State::Value(v) => std::fmt::Display::fmt(v, f),
            State::Undefined => f.write_str("undefined"),
            State::Unsupported => f.write_str("unsupported"),
        }
    }
}

/// Resolve a channel by its string identifier.
///
/// Identifiers outside the vocabulary resolve to [`State::Undefined`] once the message type has
/// been decoded successfully.
pub fn resolve(channel_id: &str, telegram: &Telegram<'_>) -> Result<State, DecodeError> {
    telegram.message_type()?;
    match channel_id.parse::<Channel>() {
        Ok(channel) => resolve_channel(channel, telegram),
        Err(_) => {
            debug!(channel_id, "unknown channel");
            Ok(State::Undefined)
        }
    }
}

pub fn resolve_channel(channel: Channel, telegram: &Telegram<'_>) -> Result<State, DecodeError> {
    match telegram.message_type()? {
        MessageType::BasicStatus => basic_status(channel, telegram),
        // TODO: decode extended status once the layout of its fields is confirmed.
        MessageType::ExtendedStatus => Ok(State::Undefined),
        message_type @ (MessageType::RemoteTransmissionRequest | MessageType::Control) => {
            debug!(%channel, ?message_type, "channels are only decoded from basic status");
            Ok(State::Undefined)
        }
    }
}

/// Every channel of the vocabulary, in declaration order.
pub fn resolve_all<'a>(
    telegram: &'a Telegram<'a>,
) -> impl Iterator<Item = (Channel, Result<State, DecodeError>)> + 'a {
    Channel::all().iter().map(move |&c| (c, resolve_channel(c, telegram)))
}

fn on_off(v: bool) -> State {
    State::Value(ChannelValue::OnOff(v))
}

fn open_closed(v: bool) -> State {
    State::Value(ChannelValue::OpenClosed(v))
}

fn field<T>(field: Field<T>, f: impl FnOnce(T) -> ChannelValue) -> State {
    match field {
        Field::Value(v) => State::Value(f(v)),
        Field::Unsupported => State::Unsupported,
    }
}

fn basic_status(channel: Channel, t: &Telegram<'_>) -> Result<State, DecodeError> {
    Ok(match channel {
        Channel::OperationMode => State::Value(ChannelValue::Mode(t.operation_mode()?)),
        Channel::SafetyMode => on_off(t.safety_mode_enabled()?),
        Channel::HeatExchangerBypass => open_closed(t.heat_exchanger_bypass_opened()?),
        Channel::SupplyAirFlapPosition => open_closed(t.supply_air_flap_opened()?),
        Channel::ExhaustAirFlapPosition => open_closed(t.exhaust_air_flap_opened()?),
        Channel::DefrostMode => on_off(t.defrost_mode_active()?),
        Channel::CoolingProtection => on_off(t.cooling_protection_active()?),
        Channel::OutdoorAirHeater => on_off(t.outdoor_air_heater_active()?),
        Channel::SupplyAirHeater => on_off(t.supply_air_heater_active()?),
        Channel::DrainHeater => on_off(t.drain_heater_active()?),
        Channel::TimerOperationMode => on_off(t.timer_operation_mode_active()?),
        Channel::FilterMaintenance => on_off(t.filter_maintenance_required()?),
        Channel::WeeklyTimerProgram => on_off(t.weekly_timer_program_active()?),
        Channel::RoomTemperatureControl => on_off(t.room_temperature_control_active()?),
        Channel::AirQualitySensor1 => State::Value(ChannelValue::Percent(t.air_quality_1()?)),
        Channel::MasterSlaveConfiguration => on_off(t.is_master()?),
        Channel::AirQualitySensor2 => State::Value(ChannelValue::Percent(t.air_quality_2()?)),
        Channel::OutdoorAirTemperature => {
            State::Value(ChannelValue::Celsius(t.outdoor_air_temperature()?))
        }
        Channel::SupplyAirTemperature => {
            State::Value(ChannelValue::Celsius(t.supply_air_temperature()?))
        }
        Channel::IndoorAirTemperature => field(t.indoor_air_temperature(), ChannelValue::Celsius),
        Channel::ExhaustAirTemperature => {
            field(t.exhaust_air_temperature(), ChannelValue::Celsius)
        }
        Channel::SupplyFanFlowRate => {
            field(t.supply_fan_flow_rate(), ChannelValue::CubicMetresPerHour)
        }
        Channel::ExhaustFanFlowRate => {
            field(t.exhaust_fan_flow_rate(), ChannelValue::CubicMetresPerHour)
        }
        Channel::SupplyFanSpeed => field(t.supply_fan_speed(), ChannelValue::Hertz),
        Channel::ExhaustFanSpeed => field(t.exhaust_fan_speed(), ChannelValue::Hertz),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const AUTOMATIC: [u8; 14] =
        [0x4B, 0x03, 0x00, 0x2B, 0x00, 0x87, 0x38, 0x00, 0x00, 0x60, 0x18, 0x41, 0xA2, 0xD0];
    const EXTENDED: [u8; 14] =
        [0x60, 0xD8, 0x06, 0x07, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];

    #[test]
    fn vocabulary() {
        assert_eq!(Channel::all().len(), 25);
        for &channel in Channel::all() {
            assert_eq!(channel.id().parse::<Channel>(), Ok(channel));
        }
        assert_eq!(Channel::SupplyAirFlapPosition.id(), "supply-air-flap-position");
        assert_eq!(<Channel as strum::VariantNames>::VARIANTS[0], "operation-mode");
    }

    #[test]
    fn units_match_values() {
        let telegram = Telegram::new(&AUTOMATIC);
        for (channel, state) in resolve_all(&telegram) {
            if let Ok(State::Value(value)) = state {
                assert_eq!(value.unit(), channel.unit(), "{channel}");
            }
        }
    }

    #[test]
    fn flaps_open_in_automatic() {
        let telegram = Telegram::new(&AUTOMATIC);
        assert_eq!(
            resolve("operation-mode", &telegram),
            Ok(State::Value(ChannelValue::Mode(OperationMode::Automatic)))
        );
        assert_eq!(
            resolve("supply-air-flap-position", &telegram),
            Ok(State::Value(ChannelValue::OpenClosed(true)))
        );
        assert_eq!(
            resolve("exhaust-air-flap-position", &telegram),
            Ok(State::Value(ChannelValue::OpenClosed(true)))
        );
        assert_eq!(
            resolve("heat-exchanger-bypass", &telegram),
            Ok(State::Value(ChannelValue::OpenClosed(false)))
        );
        assert_eq!(
            resolve("air-quality-sensor-1", &telegram),
            Ok(State::Value(ChannelValue::Percent(43)))
        );
        assert_eq!(
            resolve("outdoor-air-temperature", &telegram),
            Ok(State::Value(ChannelValue::Celsius(3)))
        );
    }

    #[test]
    fn extended_status_is_undefined() {
        let telegram = Telegram::new(&EXTENDED);
        for (channel, state) in resolve_all(&telegram) {
            assert_eq!(state, Ok(State::Undefined), "{channel}");
            assert_eq!(resolve(channel.id(), &telegram), Ok(State::Undefined));
        }
    }

    #[test]
    fn other_message_types_are_undefined() {
        for byte0 in [0x0B, 0x2B] {
            let mut data = AUTOMATIC;
            data[0] = byte0;
            let telegram = Telegram::new(&data);
            for &channel in Channel::all() {
                assert_eq!(resolve_channel(channel, &telegram), Ok(State::Undefined));
            }
        }
    }

    #[test]
    fn string_and_typed_lookup_agree() {
        let mut data = AUTOMATIC;
        for byte0 in 0..=u8::MAX {
            data[0] = byte0;
            let telegram = Telegram::new(&data);
            for &channel in Channel::all() {
                assert_eq!(
                    resolve(channel.id(), &telegram),
                    resolve_channel(channel, &telegram),
                    "{byte0:#04x} {channel}"
                );
            }
        }
    }

    #[test]
    fn unknown_channels_are_undefined() {
        let telegram = Telegram::new(&AUTOMATIC);
        assert_eq!(resolve("humidity", &telegram), Ok(State::Undefined));
        assert_eq!(resolve("", &telegram), Ok(State::Undefined));
        assert_eq!(resolve("Supply-Air-Flap-Position", &telegram), Ok(State::Undefined));
    }

    #[test]
    fn unsupported_channels() {
        let telegram = Telegram::new(&AUTOMATIC);
        for id in [
            "indoor-air-temperature",
            "exhaust-air-temperature",
            "supply-fan-flow-rate",
            "exhaust-fan-flow-rate",
            "supply-fan-speed",
            "exhaust-fan-speed",
        ] {
            assert_eq!(resolve(id, &telegram), Ok(State::Unsupported), "{id}");
        }
    }

    #[test]
    fn invalid_codes_are_errors() {
        let mut data = AUTOMATIC;
        data[0] = 0x45;
        let telegram = Telegram::new(&data);
        assert_eq!(
            resolve("operation-mode", &telegram),
            Err(DecodeError::InvalidEnumCode { field: "operation mode", code: 5 })
        );
        // Other channels do not depend on the mode nibble.
        assert_eq!(
            resolve("supply-air-flap-position", &telegram),
            Ok(State::Value(ChannelValue::OpenClosed(true)))
        );

        data[0] = 0x8B;
        let telegram = Telegram::new(&data);
        assert_eq!(
            resolve("humidity", &telegram),
            Err(DecodeError::InvalidEnumCode { field: "message type", code: 4 })
        );
    }

    #[test]
    fn truncated_basic_status() {
        let telegram = Telegram::new(&AUTOMATIC[..3]);
        assert_eq!(
            resolve("air-quality-sensor-1", &telegram),
            Err(DecodeError::BufferBounds { offset: 3, len: 3 })
        );
        assert_eq!(
            resolve("defrost-mode", &telegram),
            Ok(State::Value(ChannelValue::OnOff(false)))
        );
    }

    #[test]
    fn value_rendering() {
        assert_eq!(State::Value(ChannelValue::OpenClosed(true)).to_string(), "open");
        assert_eq!(State::Value(ChannelValue::OnOff(false)).to_string(), "off");
        assert_eq!(State::Value(ChannelValue::Celsius(-12)).to_string(), "-12");
        assert_eq!(State::Value(ChannelValue::Percent(127)).to_string(), "127");
        assert_eq!(State::Value(ChannelValue::Hertz(4095)).to_string(), "4095");
        let mode = ChannelValue::Mode(OperationMode::Level2);
        assert_eq!(State::Value(mode).to_string(), "level-2");
        assert_eq!(State::Unsupported.to_string(), "unsupported");
        let json = serde_json::to_string(&ChannelValue::Mode(OperationMode::SupplyAirOnly)).unwrap();
        assert_eq!(json, "\"supply-air-only\"");
        let json = serde_json::to_string(&ChannelValue::OnOff(true)).unwrap();
        assert_eq!(json, "\"on\"");
    }
}
