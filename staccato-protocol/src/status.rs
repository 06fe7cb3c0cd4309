//! Status byte classification
//!
//! Two pure classifiers: [`classify_status`] looks at the top nibble of any
//! byte, [`classify_system`] resolves the specific message of a `0xFn`
//! system byte. Both are cheap enough to run inside the receive interrupt.

/// Kind of a status byte, taken from its top nibble
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum StatusKind {
    NoteOff = 0x8,
    NoteOn = 0x9,
    PolyPressure = 0xA,
    ControlChange = 0xB,
    ProgramChange = 0xC,
    ChannelPressure = 0xD,
    PitchBend = 0xE,
    /// `0xF0..=0xFF`, resolved further by [`classify_system`]
    System = 0xF,
}

impl StatusKind {
    /// Map a top nibble to a kind
    pub fn from_nibble(nibble: u8) -> Option<Self> {
        match nibble {
            0x8 => Some(Self::NoteOff),
            0x9 => Some(Self::NoteOn),
            0xA => Some(Self::PolyPressure),
            0xB => Some(Self::ControlChange),
            0xC => Some(Self::ProgramChange),
            0xD => Some(Self::ChannelPressure),
            0xE => Some(Self::PitchBend),
            0xF => Some(Self::System),
            _ => None,
        }
    }

    /// Whether this is a channel voice kind
    pub fn is_channel_voice(&self) -> bool {
        !matches!(self, Self::System)
    }
}

/// Specific system message, identified by the full status byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum SystemKind {
    // System exclusive
    SysexStart = 0xF0,
    SysexEnd = 0xF7,

    // System common
    TimeCode = 0xF1,
    SongPosition = 0xF2,
    SongSelect = 0xF3,
    TuneRequest = 0xF6,

    // System realtime
    TimingClock = 0xF8,
    SequenceStart = 0xFA,
    SequenceContinue = 0xFB,
    SequenceStop = 0xFC,
    ActiveSensing = 0xFE,
    Reset = 0xFF,
}

impl SystemKind {
    /// Map a system byte to a kind; undefined bytes yield `None`
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0xF0 => Some(Self::SysexStart),
            0xF1 => Some(Self::TimeCode),
            0xF2 => Some(Self::SongPosition),
            0xF3 => Some(Self::SongSelect),
            0xF6 => Some(Self::TuneRequest),
            0xF7 => Some(Self::SysexEnd),
            0xF8 => Some(Self::TimingClock),
            0xFA => Some(Self::SequenceStart),
            0xFB => Some(Self::SequenceContinue),
            0xFC => Some(Self::SequenceStop),
            0xFE => Some(Self::ActiveSensing),
            0xFF => Some(Self::Reset),
            _ => None,
        }
    }

    /// The status byte for this kind
    pub fn as_byte(&self) -> u8 {
        *self as u8
    }

    /// Whether this is a system realtime message
    pub fn is_realtime(&self) -> bool {
        is_realtime(self.as_byte())
    }
}

/// Number of data bytes following a status byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PayloadLen {
    /// Exactly this many data bytes (0, 1 or 2)
    Fixed(u8),
    /// Unbounded until a terminator is seen (System Exclusive)
    Variable,
}

impl PayloadLen {
    /// The fixed length, or `None` for a variable-length payload
    pub fn fixed(&self) -> Option<u8> {
        match self {
            Self::Fixed(n) => Some(*n),
            Self::Variable => None,
        }
    }
}

/// System Exclusive boundary signalled by a system byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SysexSignal {
    Open,
    Close,
}

/// Result of [`classify_status`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusClass {
    pub kind: StatusKind,
    /// Data bytes expected after the status byte. Always `Fixed(0)` for
    /// [`StatusKind::System`]; use [`classify_system`] for the real length.
    pub payload_len: PayloadLen,
    /// Low nibble of the status byte, channel voice kinds only
    pub channel: Option<u8>,
}

/// Result of [`classify_system`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SystemClass {
    /// `None` for the undefined bytes `0xF4`, `0xF5`, `0xF9` and `0xFD`
    pub kind: Option<SystemKind>,
    pub payload_len: PayloadLen,
    pub sysex: Option<SysexSignal>,
}

/// True for any byte with the high bit set
#[inline]
pub fn is_status(byte: u8) -> bool {
    byte & 0x80 != 0
}

/// True for system realtime bytes (`0xF8..=0xFF`)
///
/// This is the interrupt fast-path check, evaluated before any other
/// classification.
#[inline]
pub fn is_realtime(byte: u8) -> bool {
    byte & 0xF8 == 0xF8
}

/// Classify a status byte by its top nibble
///
/// Returns `None` for data bytes (high bit clear).
pub fn classify_status(byte: u8) -> Option<StatusClass> {
    if !is_status(byte) {
        return None;
    }

    let kind = StatusKind::from_nibble(byte >> 4)?;
    let (payload_len, channel) = match kind {
        StatusKind::ProgramChange | StatusKind::ChannelPressure => {
            (PayloadLen::Fixed(1), Some(byte & 0x0F))
        }
        StatusKind::NoteOff
        | StatusKind::NoteOn
        | StatusKind::PolyPressure
        | StatusKind::ControlChange
        | StatusKind::PitchBend => (PayloadLen::Fixed(2), Some(byte & 0x0F)),
        StatusKind::System => (PayloadLen::Fixed(0), None),
    };

    Some(StatusClass {
        kind,
        payload_len,
        channel,
    })
}

/// Classify a system message byte
///
/// The caller must already know the top nibble is `0xF` (for example via
/// [`classify_status`]). Undefined system bytes fall through to a zero
/// length, no-signal result.
pub fn classify_system(byte: u8) -> SystemClass {
    debug_assert_eq!(byte >> 4, 0xF, "not a system message byte");

    let kind = SystemKind::from_byte(byte);
    let (payload_len, sysex) = match kind {
        Some(SystemKind::TimeCode) | Some(SystemKind::SongSelect) => (PayloadLen::Fixed(1), None),
        Some(SystemKind::SongPosition) => (PayloadLen::Fixed(2), None),
        Some(SystemKind::SysexStart) => (PayloadLen::Variable, Some(SysexSignal::Open)),
        Some(SystemKind::SysexEnd) => (PayloadLen::Fixed(0), Some(SysexSignal::Close)),
        _ => (PayloadLen::Fixed(0), None),
    };

    SystemClass {
        kind,
        payload_len,
        sysex,
    }
}
