//! NAV class messages.

use std::any::Any;

use bytes::Bytes;
use ubxbus_frame::{PackedReader, PackedWriter};

use crate::class::NAV;
use crate::message::{Message, MessageType};

/// Message id of NAV-POSLLH.
pub const NAV_POSLLH: u8 = 0x02;

/// Payload size of a NAV-POSLLH solution.
pub const NAV_POSLLH_LEN: usize = 28;

/// Geodetic position solution (NAV-POSLLH).
///
/// Angles are in units of 1e-7 degrees, heights and accuracies in
/// millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavPosllh {
    /// GPS time of week of the navigation epoch, in milliseconds.
    pub itow: u32,
    pub lon: i32,
    pub lat: i32,
    /// Height above the ellipsoid.
    pub height: i32,
    /// Height above mean sea level.
    pub hmsl: i32,
    pub h_acc: u32,
    pub v_acc: u32,
}

impl NavPosllh {
    pub const TYPE: MessageType = MessageType::new(NAV, NAV_POSLLH, "NAV-POSLLH", Self::decode);

    /// Decode a 28-byte payload. Any other length yields `None`.
    pub fn decode(payload: &[u8]) -> Option<Box<dyn Message>> {
        Self::parse(payload).map(|message| Box::new(message) as Box<dyn Message>)
    }

    pub fn parse(payload: &[u8]) -> Option<Self> {
        if payload.len() != NAV_POSLLH_LEN {
            return None;
        }
        let mut reader = PackedReader::new(payload);
        Some(Self {
            itow: reader.read_u32_le().ok()?,
            lon: reader.read_i32_le().ok()?,
            lat: reader.read_i32_le().ok()?,
            height: reader.read_i32_le().ok()?,
            hmsl: reader.read_i32_le().ok()?,
            h_acc: reader.read_u32_le().ok()?,
            v_acc: reader.read_u32_le().ok()?,
        })
    }

    pub fn lon_degrees(&self) -> f64 {
        f64::from(self.lon) * 1e-7
    }

    pub fn lat_degrees(&self) -> f64 {
        f64::from(self.lat) * 1e-7
    }
}

impl Message for NavPosllh {
    fn message_type(&self) -> MessageType {
        Self::TYPE
    }

    fn serialize_payload(&self) -> Bytes {
        let mut writer = PackedWriter::new(NAV_POSLLH_LEN);
        // Seven 4-byte fields exactly fill the writer.
        let _ = writer.write_u32_le(self.itow);
        let _ = writer.write_i32_le(self.lon);
        let _ = writer.write_i32_le(self.lat);
        let _ = writer.write_i32_le(self.height);
        let _ = writer.write_i32_le(self.hmsl);
        let _ = writer.write_u32_le(self.h_acc);
        let _ = writer.write_u32_le(self.v_acc);
        writer.into_bytes()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Poll request for NAV-POSLLH: same class and id, empty payload.
///
/// Not registered for decoding; an empty NAV-POSLLH frame from a device is
/// malformed as far as the registry is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavPosllhPoll;

impl Message for NavPosllhPoll {
    fn message_type(&self) -> MessageType {
        MessageType::new(NAV, NAV_POSLLH, "NAV-POSLLH-POLL", |payload| {
            payload
                .is_empty()
                .then(|| Box::new(NavPosllhPoll) as Box<dyn Message>)
        })
    }

    fn serialize_payload(&self) -> Bytes {
        Bytes::new()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
