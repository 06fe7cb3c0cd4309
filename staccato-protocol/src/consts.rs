//! Sizing constants shared by the input pipeline

/// Size of one queued frame in bytes (status + 2 data + padding)
pub const FRAME_SIZE: usize = 4;

/// Frames held by the hand-off queue before the producer purges it
pub const QUEUE_DEPTH: usize = 10;

/// Capacity of the System Exclusive buffer in bytes
pub const MAX_SYSEX_DATA: usize = 128;

/// Largest number of bytes drained from the UART FIFO per interrupt
pub const MAX_BURST: usize = 4;
