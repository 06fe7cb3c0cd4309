//! Interrupt-to-task hand-off queue
//!
//! A bounded FIFO of [`Frame`]s with a single producer (the receive
//! interrupt) and a single consumer (the dispatcher task).
//!
//! Enqueue never blocks. When the queue is full the producer purges every
//! queued frame and retries, favouring fresh data over a stale backlog the
//! consumer could not keep up with anyway. Dequeue waits for the next frame.
//!
//! Completed System Exclusive blocks do not fit in a frame. They are copied
//! into a single-slot side channel under a rolling tag, and a
//! `Frame::sysex_end(tag)` is queued behind them so the dispatcher picks up
//! the payload in order with the other messages.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::channel::{Channel, TrySendError};
use heapless::Vec;

use staccato_protocol::{Frame, MAX_SYSEX_DATA, QUEUE_DEPTH};

use crate::stats::{Counter, Counters, Stats};

/// Queue with the default depth and System Exclusive capacity
pub type DefaultMidiQueue<M> = MidiQueue<M, QUEUE_DEPTH, MAX_SYSEX_DATA>;

/// Most recent completed System Exclusive block
struct SysexSlot<const S: usize> {
    tag: u8,
    pending: bool,
    data: Vec<u8, S>,
}

/// Bounded frame queue shared between interrupt and task context
///
/// `N` must be non-zero.
pub struct MidiQueue<M: RawMutex, const N: usize = QUEUE_DEPTH, const S: usize = MAX_SYSEX_DATA> {
    frames: Channel<M, Frame, N>,
    sysex: Mutex<M, RefCell<SysexSlot<S>>>,
    counters: Counters,
}

impl<M: RawMutex, const N: usize, const S: usize> Default for MidiQueue<M, N, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex, const N: usize, const S: usize> MidiQueue<M, N, S> {
    /// Create an empty queue, usable in a `static`
    pub const fn new() -> Self {
        Self {
            frames: Channel::new(),
            sysex: Mutex::new(RefCell::new(SysexSlot {
                tag: 0,
                pending: false,
                data: Vec::new(),
            })),
            counters: Counters::new(),
        }
    }

    /// Queue a frame without blocking
    ///
    /// Purges the queue if it is full. Safe to call from interrupt context.
    pub fn enqueue(&self, frame: Frame) {
        let mut frame = frame;
        loop {
            match self.frames.try_send(frame) {
                Ok(()) => {
                    self.counters.record(Counter::FrameEnqueued);
                    return;
                }
                Err(TrySendError::Full(rejected)) => {
                    let purged = self.frames.len();
                    self.frames.clear();
                    self.counters.record(Counter::QueuePurge);
                    self.counters.record_purged(purged);
                    warn!("MIDI queue full, purged {} frames", purged);
                    frame = rejected;
                }
            }
        }
    }

    /// Wait for the next frame
    pub async fn dequeue(&self) -> Frame {
        self.frames.receive().await
    }

    /// Take the next frame if one is queued
    pub fn try_dequeue(&self) -> Option<Frame> {
        self.frames.try_receive().ok()
    }

    /// Frames currently queued
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// No frames queued
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Store a completed System Exclusive block and queue its end frame
    ///
    /// An earlier block that was never taken is replaced and counted as
    /// dropped. Safe to call from interrupt context.
    pub fn submit_sysex(&self, data: &[u8]) {
        let tag = self.sysex.lock(|slot| {
            let mut slot = slot.borrow_mut();
            if slot.pending {
                self.counters.record(Counter::SysexDropped);
            }
            slot.tag = slot.tag.wrapping_add(1);
            slot.data.clear();
            slot.pending = slot.data.extend_from_slice(data).is_ok();
            slot.pending.then_some(slot.tag)
        });

        match tag {
            Some(tag) => self.enqueue(Frame::sysex_end(tag)),
            None => {
                self.counters.record(Counter::SysexOverflow);
                warn!("sysex block of {} bytes does not fit side channel", data.len());
            }
        }
    }

    /// Take the System Exclusive block stored under `tag`
    ///
    /// Returns `None` if the block has since been replaced.
    pub fn take_sysex(&self, tag: u8) -> Option<Vec<u8, S>> {
        self.sysex.lock(|slot| {
            let mut slot = slot.borrow_mut();
            if !slot.pending || slot.tag != tag {
                return None;
            }
            slot.pending = false;
            Some(core::mem::take(&mut slot.data))
        })
    }

    /// Live diagnostic counters
    pub fn counters(&self) -> &Counters {
        &self.counters
    }

    /// Snapshot of the diagnostic counters
    pub fn stats(&self) -> Stats {
        self.counters.snapshot()
    }
}
