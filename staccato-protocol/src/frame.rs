//! Fixed-size queued frame
//!
//! Frame layout:
//! - STATUS (1 byte): status byte of the message
//! - DATA1 (1 byte): first data byte, or zero
//! - DATA2 (1 byte): second data byte, or zero
//! - PADDING (1 byte): always zero
//!
//! A System Exclusive end frame carries a sequence tag in DATA1 instead of
//! MIDI data. The tag pairs the frame with the block held in the queue's
//! side channel.

use crate::consts::FRAME_SIZE;
use crate::status::SystemKind;

/// One reassembled MIDI message, ready for the hand-off queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Frame {
    bytes: [u8; FRAME_SIZE],
}

impl Frame {
    /// Wrap raw frame bytes
    pub const fn new(bytes: [u8; FRAME_SIZE]) -> Self {
        Self { bytes }
    }

    /// Build a frame from a status byte and its data bytes
    pub const fn message(status: u8, data1: u8, data2: u8) -> Self {
        Self::new([status, data1, data2, 0])
    }

    /// A standalone single-byte frame (realtime or tune request)
    pub const fn single(status: u8) -> Self {
        Self::new([status, 0, 0, 0])
    }

    /// Marks the opening of a System Exclusive block
    pub const fn sysex_start() -> Self {
        Self::single(SystemKind::SysexStart as u8)
    }

    /// Marks the completion of the System Exclusive block stored under `tag`
    pub const fn sysex_end(tag: u8) -> Self {
        Self::new([SystemKind::SysexEnd as u8, tag, 0, 0])
    }

    /// Status byte
    pub fn status(&self) -> u8 {
        self.bytes[0]
    }

    /// First data byte
    pub fn data1(&self) -> u8 {
        self.bytes[1]
    }

    /// Second data byte
    pub fn data2(&self) -> u8 {
        self.bytes[2]
    }

    /// Raw frame bytes
    pub fn as_bytes(&self) -> &[u8; FRAME_SIZE] {
        &self.bytes
    }

    /// Combine the two data bytes into a 14-bit value, LSB first
    pub fn data_u14(&self) -> u16 {
        (self.data1() & 0x7F) as u16 | (((self.data2() & 0x7F) as u16) << 7)
    }
}

impl From<[u8; FRAME_SIZE]> for Frame {
    fn from(bytes: [u8; FRAME_SIZE]) -> Self {
        Self::new(bytes)
    }
}
