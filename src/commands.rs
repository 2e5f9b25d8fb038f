pub mod decode {
    use crate::channels::{self, Channel, ChannelValue, State};
    use crate::d2_50::Telegram;
    use crate::erp1::{self, Erp1};
    use crate::output;
    use tracing::warn;

    /// Decode D2-50 telegrams given as hexadecimal strings.
    #[derive(clap::Parser)]
    pub struct Args {
        #[clap(flatten)]
        output: output::Args,
        /// Input is a full ERP1 data field: RORG, payload, sender id and status.
        #[arg(long)]
        erp1: bool,
        /// Only output these channels. May be given multiple times.
        #[arg(long = "channel", short = 'c', value_parser = parse_channel)]
        channels: Vec<Channel>,
        /// Telegrams in hex. Spaces and `:` between bytes are ignored.
        #[arg(required = true)]
        telegrams: Vec<String>,
    }

    #[derive(thiserror::Error, Debug)]
    pub enum Error {
        #[error("could not parse `{1}` as hexadecimal")]
        Hex(#[source] hex::FromHexError, String),
        #[error("could not split `{1}` as an ERP1 data field")]
        Erp1(#[source] erp1::Error, String),
        #[error("could not set up the output")]
        Output(#[source] output::Error),
    }

    #[derive(serde::Serialize)]
    struct Record<'a> {
        telegram: &'a str,
        #[serde(skip_serializing_if = "Option::is_none")]
        sender_id: Option<String>,
        channel: Channel,
        unit: channels::Unit,
        #[serde(flatten)]
        state: StateRecord,
    }

    #[derive(serde::Serialize)]
    #[serde(tag = "state", rename_all = "kebab-case")]
    enum StateRecord {
        Value {
            value: ChannelValue,
            /// Wire code of an operation mode value.
            #[serde(skip_serializing_if = "Option::is_none")]
            code: Option<u8>,
        },
        Undefined,
        Unsupported,
        Error { error: String },
    }

    fn mode_code(value: ChannelValue) -> Option<u8> {
        match value {
            ChannelValue::Mode(mode) => Some(mode.code()),
            _ => None,
        }
    }

    fn parse_channel(s: &str) -> Result<Channel, String> {
        s.parse().map_err(|_| {
            let known = <Channel as strum::VariantNames>::VARIANTS.join(", ");
            format!("unknown channel, expected one of: {known}")
        })
    }

    pub(crate) fn parse_hex(input: &str) -> Result<Vec<u8>, hex::FromHexError> {
        let digits = input
            .chars()
            .filter(|c| !c.is_whitespace() && *c != ':')
            .collect::<String>();
        hex::decode(digits)
    }

    pub fn run(args: Args) -> Result<(), Error> {
        let mut inputs = Vec::with_capacity(args.telegrams.len());
        for text in &args.telegrams {
            let data = parse_hex(text).map_err(|e| Error::Hex(e, text.clone()))?;
            inputs.push((text.as_str(), data));
        }
        let selected = if args.channels.is_empty() { Channel::all() } else { &args.channels[..] };

        let mut output = args.output.to_output().map_err(Error::Output)?;
        output
            .table_headers(&["Telegram", "Sender", "Channel", "Value", "Unit"])
            .map_err(Error::Output)?;
        for (text, data) in &inputs {
            let (payload, sender_id) = if args.erp1 {
                let erp1 = Erp1::split(data).map_err(|e| Error::Erp1(e, text.to_string()))?;
                (erp1.payload, Some(format!("{:08X}", erp1.sender_id)))
            } else {
                (&data[..], None)
            };
            let telegram = Telegram::new(payload);
            for &channel in selected {
                let state = match channels::resolve_channel(channel, &telegram) {
                    Ok(State::Value(value)) => StateRecord::Value { value, code: mode_code(value) },
                    Ok(State::Undefined) => StateRecord::Undefined,
                    Ok(State::Unsupported) => StateRecord::Unsupported,
                    Err(e) => {
                        warn!(telegram = text, %channel, error = %e, "could not decode");
                        StateRecord::Error { error: e.to_string() }
                    }
                };
                let unit = channel.unit();
                let value = match &state {
                    StateRecord::Value { value, .. } => value.to_string(),
                    StateRecord::Undefined => "undefined".to_string(),
                    StateRecord::Unsupported => "unsupported".to_string(),
                    StateRecord::Error { error } => format!("error: {error}"),
                };
                output
                    .result(
                        || {
                            vec![
                                text.to_string(),
                                sender_id.clone().unwrap_or_default(),
                                channel.to_string(),
                                value,
                                unit.to_string(),
                            ]
                        },
                        || Record {
                            telegram: text,
                            sender_id: sender_id.clone(),
                            channel,
                            unit,
                            state,
                        },
                    )
                    .map_err(Error::Output)?;
            }
        }
        output.commit().map_err(Error::Output)
    }

}

pub mod channels {
    use crate::channels::Channel;
    use crate::output;

    /// List the channels that can be decoded.
    #[derive(clap::Parser)]
    pub struct Args {
        #[clap(flatten)]
        output: output::Args,
        /// Only list channels whose identifier or description contains this text.
        filter: Option<String>,
    }

    #[derive(thiserror::Error, Debug)]
    pub enum Error {
        #[error("could not write the channel list")]
        Output(#[source] output::Error),
    }

    #[derive(serde::Serialize)]
    pub struct ChannelSchema {
        pub id: &'static str,
        pub unit: crate::channels::Unit,
        pub description: &'static str,
    }

    impl ChannelSchema {
        pub fn all_channels() -> impl Iterator<Item = Self> {
            Channel::all().iter().map(|&channel| ChannelSchema {
                id: channel.id(),
                unit: channel.unit(),
                description: channel.description(),
            })
        }

        pub fn is_match(&self, pattern: &str) -> bool {
            let pattern = pattern.to_lowercase();
            self.id.contains(&pattern) || self.description.to_lowercase().contains(&pattern)
        }
    }

    pub fn run(args: Args) -> Result<(), Error> {
        let mut output = args.output.to_output().map_err(Error::Output)?;
        output.table_headers(&["Channel", "Unit", "Description"]).map_err(Error::Output)?;
        for channel in ChannelSchema::all_channels() {
            if let Some(pattern) = &args.filter {
                if !channel.is_match(pattern) {
                    continue;
                }
            }
            output
                .result(
                    || {
                        vec![
                            channel.id.to_string(),
                            channel.unit.to_string(),
                            channel.description.to_string(),
                        ]
                    },
                    || &channel,
                )
                .map_err(Error::Output)?;
        }
        output.commit().map_err(Error::Output)
    }

}
