//! MIDI 1.0 Wire Protocol
//!
//! This crate turns the raw byte stream of a MIDI DIN input into
//! fixed-size frames. It is split into three layers:
//!
//! - [`status`]: stateless classifiers mapping a status byte to its
//!   message kind, channel and payload length
//! - [`accumulator`]: the per-input state machine reassembling frames and
//!   System Exclusive blocks one byte at a time, with system realtime bytes
//!   taking priority at every byte boundary
//! - [`message`]: typed decoding of a completed [`Frame`]
//!
//! # Frame Layout
//!
//! ```text
//! ┌────────┬───────┬───────┬─────────┐
//! │ STATUS │ DATA1 │ DATA2 │ PADDING │
//! │ 1B     │ 1B    │ 1B    │ 1B      │
//! └────────┴───────┴───────┴─────────┘
//! ```
//!
//! Unused data bytes are zero. Running status is not supported: every
//! message on the wire must carry its own status byte.

#![no_std]
#![deny(unsafe_code)]

pub mod accumulator;
pub mod consts;
pub mod frame;
pub mod message;
pub mod status;

pub use accumulator::{Accumulator, AccumulatorError, DefaultAccumulator, Emit};
pub use consts::{FRAME_SIZE, MAX_BURST, MAX_SYSEX_DATA, QUEUE_DEPTH};
pub use frame::Frame;
pub use message::MidiMessage;
pub use status::{
    classify_status, classify_system, is_realtime, is_status, PayloadLen, StatusClass,
    StatusKind, SysexSignal, SystemClass, SystemKind,
};
