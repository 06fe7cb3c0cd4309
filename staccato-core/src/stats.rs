//! Diagnostic counters
//!
//! None of the pipeline's error paths propagate out of interrupt context.
//! Each one bumps a counter here instead, which the application can read
//! from any context.

use portable_atomic::{AtomicU32, Ordering};

/// Counter selector for [`Counters::record`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Counter {
    /// Frame accepted by the queue
    FrameEnqueued,
    /// Queue purged to make room
    QueuePurge,
    /// System Exclusive block exceeded the buffer
    SysexOverflow,
    /// Completed System Exclusive block replaced before delivery
    SysexDropped,
    /// Receive interrupt found nothing to read
    EmptyRead,
    /// UART reported a receive error
    UartError,
}

/// Live counters, updated with relaxed atomics
#[derive(Debug, Default)]
pub struct Counters {
    frames_enqueued: AtomicU32,
    queue_purges: AtomicU32,
    frames_purged: AtomicU32,
    sysex_overflows: AtomicU32,
    sysex_dropped: AtomicU32,
    empty_reads: AtomicU32,
    uart_errors: AtomicU32,
}

impl Counters {
    /// All counters at zero
    pub const fn new() -> Self {
        Self {
            frames_enqueued: AtomicU32::new(0),
            queue_purges: AtomicU32::new(0),
            frames_purged: AtomicU32::new(0),
            sysex_overflows: AtomicU32::new(0),
            sysex_dropped: AtomicU32::new(0),
            empty_reads: AtomicU32::new(0),
            uart_errors: AtomicU32::new(0),
        }
    }

    /// Increment one counter
    pub fn record(&self, counter: Counter) {
        let slot = match counter {
            Counter::FrameEnqueued => &self.frames_enqueued,
            Counter::QueuePurge => &self.queue_purges,
            Counter::SysexOverflow => &self.sysex_overflows,
            Counter::SysexDropped => &self.sysex_dropped,
            Counter::EmptyRead => &self.empty_reads,
            Counter::UartError => &self.uart_errors,
        };
        slot.fetch_add(1, Ordering::Relaxed);
    }

    /// Account for frames discarded by a purge
    pub fn record_purged(&self, frames: usize) {
        self.frames_purged.fetch_add(frames as u32, Ordering::Relaxed);
    }

    /// Take a snapshot
    pub fn snapshot(&self) -> Stats {
        Stats {
            frames_enqueued: self.frames_enqueued.load(Ordering::Relaxed),
            queue_purges: self.queue_purges.load(Ordering::Relaxed),
            frames_purged: self.frames_purged.load(Ordering::Relaxed),
            sysex_overflows: self.sysex_overflows.load(Ordering::Relaxed),
            sysex_dropped: self.sysex_dropped.load(Ordering::Relaxed),
            empty_reads: self.empty_reads.load(Ordering::Relaxed),
            uart_errors: self.uart_errors.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`Counters`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Stats {
    pub frames_enqueued: u32,
    pub queue_purges: u32,
    pub frames_purged: u32,
    pub sysex_overflows: u32,
    pub sysex_dropped: u32,
    pub empty_reads: u32,
    pub uart_errors: u32,
}
