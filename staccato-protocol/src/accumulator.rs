//! Stream reassembly state machine
//!
//! The accumulator is fed one byte at a time from the receive interrupt and
//! is really two machines composed by priority:
//!
//! 1. A stateless realtime detector. Any `0xF8..=0xFF` byte is emitted as a
//!    standalone frame immediately, at any position in the stream, without
//!    touching the reassembly state below.
//! 2. A stateful reassembler for channel voice, system common and System
//!    Exclusive messages.
//!
//! ```text
//!            status                 data (remaining > 0)
//!   ┌──────┐ ──────────▶ ┌─────────┐ ─────┐
//!   │ Idle │             │ Framing │ ◀────┘
//!   └──────┘ ◀────────── └─────────┘
//!     │  ▲     remaining == 0: emit Frame
//!     │  │
//!  F0 │  │ F7: emit Sysex
//!     ▼  │
//!   ┌──────────┐
//!   │  Sysex   │ ── overflow: discard, back to Idle
//!   └──────────┘
//! ```

use heapless::Vec;

use crate::consts::{FRAME_SIZE, MAX_SYSEX_DATA};
use crate::frame::Frame;
use crate::status::{
    classify_status, classify_system, is_realtime, StatusKind, SysexSignal,
};

/// Errors surfaced while accumulating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AccumulatorError {
    /// System Exclusive block exceeded the buffer before its terminator;
    /// the block was discarded
    SysexOverflow,
}

/// Output of a single [`Accumulator::push`]
#[derive(Debug, PartialEq, Eq)]
pub enum Emit<'a> {
    /// A completed fixed-size frame
    Frame(Frame),
    /// A completed System Exclusive block: every byte between `0xF0` and
    /// the terminating `0xF7`, exclusive
    Sysex(&'a [u8]),
}

/// Accumulator with the default System Exclusive capacity
pub type DefaultAccumulator = Accumulator<MAX_SYSEX_DATA>;

/// Reassembly state for one MIDI input
///
/// Lives as long as the input binding and is only ever touched from that
/// input's receive interrupt.
#[derive(Debug, Clone)]
pub struct Accumulator<const S: usize = MAX_SYSEX_DATA> {
    /// Frame under construction
    frame: [u8; FRAME_SIZE],
    /// Valid bytes in `frame`
    frame_fill: usize,
    /// Data bytes still needed to complete `frame`
    remaining: usize,
    /// Between SysexStart and SysexEnd
    sysex_open: bool,
    /// Bytes of the current (or last completed) System Exclusive block
    sysex_buf: Vec<u8, S>,
}

impl<const S: usize> Default for Accumulator<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const S: usize> Accumulator<S> {
    /// Create an idle accumulator
    pub const fn new() -> Self {
        Self {
            frame: [0; FRAME_SIZE],
            frame_fill: 0,
            remaining: 0,
            sysex_open: false,
            sysex_buf: Vec::new(),
        }
    }

    /// Drop any partial message and return to idle
    pub fn reset(&mut self) {
        self.clear_frame();
        self.sysex_open = false;
        self.sysex_buf.clear();
    }

    /// No frame or System Exclusive block in progress
    pub fn is_idle(&self) -> bool {
        self.frame_fill == 0 && !self.sysex_open
    }

    /// Inside a System Exclusive block
    pub fn is_sysex_open(&self) -> bool {
        self.sysex_open
    }

    /// Bytes currently held in the frame under construction
    pub fn frame_fill(&self) -> usize {
        self.frame_fill
    }

    /// Data bytes still needed to complete the current frame
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Bytes buffered for the open System Exclusive block
    pub fn sysex_len(&self) -> usize {
        self.sysex_buf.len()
    }

    /// Feed a single byte
    ///
    /// Returns `Ok(Some(_))` when the byte completes a frame or a System
    /// Exclusive block, `Ok(None)` when more bytes are needed or the byte
    /// was dropped, and `Err` when a System Exclusive block had to be
    /// discarded.
    pub fn push(&mut self, byte: u8) -> Result<Option<Emit<'_>>, AccumulatorError> {
        // Realtime bytes bypass all reassembly state
        if is_realtime(byte) {
            return Ok(Some(Emit::Frame(Frame::single(byte))));
        }

        if self.sysex_open {
            return self.push_sysex(byte);
        }

        if self.frame_fill == 0 {
            return Ok(self.start_frame(byte));
        }

        Ok(self.continue_frame(byte))
    }

    fn push_sysex(&mut self, byte: u8) -> Result<Option<Emit<'_>>, AccumulatorError> {
        let closes = classify_status(byte)
            .filter(|class| class.kind == StatusKind::System)
            .and_then(|_| classify_system(byte).sysex)
            == Some(SysexSignal::Close);

        if closes {
            self.sysex_open = false;
            self.clear_frame();
            return Ok(Some(Emit::Sysex(&self.sysex_buf)));
        }

        if self.sysex_buf.push(byte).is_err() {
            self.sysex_open = false;
            self.sysex_buf.clear();
            self.clear_frame();
            return Err(AccumulatorError::SysexOverflow);
        }
        Ok(None)
    }

    fn start_frame(&mut self, byte: u8) -> Option<Emit<'_>> {
        // Stray data bytes and unknown nibbles are dropped
        let class = classify_status(byte)?;

        let payload_len = if class.kind == StatusKind::System {
            let system = classify_system(byte);
            match system.sysex {
                Some(SysexSignal::Open) => {
                    self.sysex_open = true;
                    self.sysex_buf.clear();
                    return Some(Emit::Frame(Frame::sysex_start()));
                }
                // End of a block we never saw open
                Some(SysexSignal::Close) => return None,
                None => {}
            }
            // Undefined system common byte
            if system.kind.is_none() {
                return None;
            }
            system.payload_len
        } else {
            class.payload_len
        };

        self.frame = [0; FRAME_SIZE];
        self.frame[0] = byte;
        self.frame_fill = 1;
        self.remaining = payload_len.fixed().unwrap_or(0) as usize;

        if self.remaining == 0 {
            return Some(self.complete());
        }
        None
    }

    fn continue_frame(&mut self, byte: u8) -> Option<Emit<'_>> {
        if let Some(slot) = self.frame.get_mut(self.frame_fill) {
            *slot = byte;
            self.frame_fill += 1;
        }
        self.remaining = self.remaining.saturating_sub(1);

        if self.remaining == 0 {
            return Some(self.complete());
        }
        None
    }

    fn complete(&mut self) -> Emit<'static> {
        let frame = Frame::new(self.frame);
        self.clear_frame();
        Emit::Frame(frame)
    }

    fn clear_frame(&mut self) {
        self.frame = [0; FRAME_SIZE];
        self.frame_fill = 0;
        self.remaining = 0;
    }
}
