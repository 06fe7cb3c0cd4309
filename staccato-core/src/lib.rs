//! Interrupt-driven MIDI input pipeline
//!
//! This crate wires the stream accumulator from `staccato-protocol` into a
//! two-context runtime:
//!
//! ```text
//!  UART RX IRQ                         worker task
//! ┌──────────────┐   ┌────────────┐   ┌────────────┐   ┌─────────────┐
//! │ MidiReceiver │──▶│ MidiQueue  │──▶│ Dispatcher │──▶│ MidiHandler │
//! │ (accumulator)│   │ (10 frames)│   │ (decode)   │   │ (callbacks) │
//! └──────────────┘   └────────────┘   └────────────┘   └─────────────┘
//! ```
//!
//! - [`receiver`]: interrupt context, owns the accumulator, never blocks
//! - [`queue`]: bounded hand-off with drop-oldest overflow and a side
//!   channel for System Exclusive payloads
//! - [`dispatcher`]: worker context, decodes frames and calls the handler
//! - [`handler`]: per-message callbacks, logging by default
//! - [`stats`]: diagnostic counters readable from any context

#![no_std]
#![deny(unsafe_code)]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod dispatcher;
pub mod handler;
pub mod queue;
pub mod receiver;
pub mod stats;

pub use dispatcher::Dispatcher;
pub use handler::{LogHandler, MidiHandler};
pub use queue::{DefaultMidiQueue, MidiQueue};
pub use receiver::{start, stop, MidiReceiver, ReceiveError};
pub use stats::{Counters, Stats};

pub use staccato_protocol as protocol;
