//! Splitting of an ERP1 radio telegram's data field.
//!
//! The data field of a VLD telegram is laid out as
//! `RORG (0xD2) | payload | sender id (4 bytes) | status (1 byte)`. Gateways and sniffers usually
//! print it in this form, so this is the shape the decode command accepts.

pub const RORG_VLD: u8 = 0xD2;
const SENDER_ID_LEN: usize = 4;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("telegram is not a VLD telegram (RORG {rorg:#04x})")]
    NotVld { rorg: u8 },
    #[error("a {len} byte data field cannot hold RORG, sender id and status")]
    TooShort { len: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Erp1<'a> {
    pub payload: &'a [u8],
    pub sender_id: u32,
    pub status: u8,
}

impl<'a> Erp1<'a> {
    pub fn split(data: &'a [u8]) -> Result<Self, Error> {
        let [rorg, remainder @ ..] = data else {
            return Err(Error::TooShort { len: 0 });
        };
        if *rorg != RORG_VLD {
            return Err(Error::NotVld { rorg: *rorg });
        }
        let Some((status, remainder)) = remainder.split_last() else {
            return Err(Error::TooShort { len: data.len() });
        };
        let Some((payload, sender_id)) = remainder.split_last_chunk::<SENDER_ID_LEN>() else {
            return Err(Error::TooShort { len: data.len() });
        };
        Ok(Self { payload, sender_id: u32::from_be_bytes(*sender_id), status: *status })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_reference_telegram() {
        let data = hex::decode("D24B03002B0087380000601841A2D00586955E00").unwrap();
        let erp1 = Erp1::split(&data).unwrap();
        assert_eq!(erp1.payload.len(), 14);
        assert_eq!(erp1.payload[0], 0x4B);
        assert_eq!(erp1.payload[13], 0xD0);
        assert_eq!(erp1.sender_id, 0x0586955E);
        assert_eq!(erp1.status, 0);
    }

    #[test]
    fn rejects_other_rorgs() {
        let data = hex::decode("A5000000080586955E00").unwrap();
        assert_eq!(Erp1::split(&data), Err(Error::NotVld { rorg: 0xA5 }));
    }

    #[test]
    fn rejects_short_fields() {
        assert_eq!(Erp1::split(&[]), Err(Error::TooShort { len: 0 }));
        assert_eq!(Erp1::split(&[0xD2]), Err(Error::TooShort { len: 1 }));
        assert_eq!(Erp1::split(&[0xD2, 1, 2, 3, 4]), Err(Error::TooShort { len: 5 }));
        let empty_payload = Erp1::split(&[0xD2, 1, 2, 3, 4, 0x80]).unwrap();
        assert!(empty_payload.payload.is_empty());
        assert_eq!(empty_payload.status, 0x80);
    }
}
