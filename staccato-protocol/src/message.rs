//! Typed decoding of queued frames
//!
//! A [`Frame`] is decoded by classifying its status byte again, the same
//! way the accumulator did when it built the frame, and pulling the data
//! bytes out according to the kind.

use crate::frame::Frame;
use crate::status::{classify_status, classify_system, StatusKind, SystemKind};

/// A decoded MIDI message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MidiMessage {
    // Channel voice
    NoteOff { channel: u8, key: u8, velocity: u8 },
    NoteOn { channel: u8, key: u8, velocity: u8 },
    PolyPressure { channel: u8, key: u8, pressure: u8 },
    ControlChange { channel: u8, controller: u8, value: u8 },
    ProgramChange { channel: u8, program: u8 },
    ChannelPressure { channel: u8, pressure: u8 },
    /// 14-bit bend, 0x2000 is centre
    PitchBend { channel: u8, value: u16 },

    // System common
    /// MIDI Time Code quarter frame, raw fields only
    TimeCode { msg_type: u8, value: u8 },
    SongPosition(u16),
    SongSelect(u8),
    TuneRequest,

    // System exclusive
    SysexStart,
    /// Completed block, stored in the side channel under `tag`
    SysexEnd { tag: u8 },

    // System realtime
    TimingClock,
    SequenceStart,
    SequenceContinue,
    SequenceStop,
    ActiveSensing,
    Reset,
}

impl MidiMessage {
    /// Decode a frame
    ///
    /// Returns `None` for frames whose status byte is not a recognised
    /// message; those are discarded by the dispatcher.
    pub fn from_frame(frame: &Frame) -> Option<Self> {
        let status = frame.status();
        let class = classify_status(status)?;
        let (d1, d2) = (frame.data1(), frame.data2());

        // channel is always Some for the channel voice arms
        let channel = class.channel.unwrap_or(0);

        let msg = match class.kind {
            StatusKind::NoteOff => Self::NoteOff {
                channel,
                key: d1,
                velocity: d2,
            },
            StatusKind::NoteOn => Self::NoteOn {
                channel,
                key: d1,
                velocity: d2,
            },
            StatusKind::PolyPressure => Self::PolyPressure {
                channel,
                key: d1,
                pressure: d2,
            },
            StatusKind::ControlChange => Self::ControlChange {
                channel,
                controller: d1,
                value: d2,
            },
            StatusKind::ProgramChange => Self::ProgramChange {
                channel,
                program: d1,
            },
            StatusKind::ChannelPressure => Self::ChannelPressure {
                channel,
                pressure: d1,
            },
            StatusKind::PitchBend => Self::PitchBend {
                channel,
                value: frame.data_u14(),
            },
            StatusKind::System => match classify_system(status).kind? {
                SystemKind::SysexStart => Self::SysexStart,
                SystemKind::SysexEnd => Self::SysexEnd { tag: d1 },
                SystemKind::TimeCode => Self::TimeCode {
                    msg_type: (d1 >> 4) & 0x7,
                    value: d1 & 0xF,
                },
                SystemKind::SongPosition => Self::SongPosition(frame.data_u14()),
                SystemKind::SongSelect => Self::SongSelect(d1),
                SystemKind::TuneRequest => Self::TuneRequest,
                SystemKind::TimingClock => Self::TimingClock,
                SystemKind::SequenceStart => Self::SequenceStart,
                SystemKind::SequenceContinue => Self::SequenceContinue,
                SystemKind::SequenceStop => Self::SequenceStop,
                SystemKind::ActiveSensing => Self::ActiveSensing,
                SystemKind::Reset => Self::Reset,
            },
        };

        Some(msg)
    }

    /// Channel of a channel voice message
    pub fn channel(&self) -> Option<u8> {
        match self {
            Self::NoteOff { channel, .. }
            | Self::NoteOn { channel, .. }
            | Self::PolyPressure { channel, .. }
            | Self::ControlChange { channel, .. }
            | Self::ProgramChange { channel, .. }
            | Self::ChannelPressure { channel, .. }
            | Self::PitchBend { channel, .. } => Some(*channel),
            _ => None,
        }
    }

    /// Check if this is a system realtime message
    pub fn is_realtime(&self) -> bool {
        matches!(
            self,
            Self::TimingClock
                | Self::SequenceStart
                | Self::SequenceContinue
                | Self::SequenceStop
                | Self::ActiveSensing
                | Self::Reset
        )
    }
}

impl TryFrom<Frame> for MidiMessage {
    type Error = Frame;

    fn try_from(frame: Frame) -> Result<Self, Self::Error> {
        Self::from_frame(&frame).ok_or(frame)
    }
}
