//! UART receive abstractions
//!
//! MIDI input only ever needs the receive half of a UART, driven from its
//! receive-ready interrupt. The binding exposes exactly four operations:
//! a readiness check, a non-blocking FIFO read, handler registration and
//! interrupt enable/disable. Line settings (31 250 baud, 8N1) belong to
//! the chip HAL that brings the peripheral up.

use embedded_io::{ErrorType, ReadReady};

/// Interrupt-driven UART receiver
///
/// The readiness check comes from [`ReadReady`], the error type from
/// [`ErrorType`].
pub trait UartRxIrq: ReadReady {
    /// Drain up to `buf.len()` bytes from the receive FIFO
    ///
    /// Never blocks. Returns the number of bytes copied, which may be zero
    /// if the FIFO emptied between the readiness check and the read.
    fn read_fifo(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Register the handler invoked from the receive-ready interrupt
    ///
    /// Replaces any previously registered handler. The handler is borrowed
    /// for the rest of the program, so it is usually placed in a
    /// `StaticCell`.
    fn set_rx_handler(&mut self, handler: &'static mut dyn RxInterruptHandler<Self>)
    where
        Self: Sized + 'static;

    /// Unmask the receive-ready interrupt
    fn enable_rx_irq(&mut self);

    /// Mask the receive-ready interrupt
    fn disable_rx_irq(&mut self);
}

/// Receive-ready interrupt callback
///
/// Runs in interrupt context: must not block and must not allocate. The
/// platform serializes invocations for a given UART, so an implementation
/// may keep mutable state without further locking.
pub trait RxInterruptHandler<U: ErrorType + ?Sized>: Send {
    /// Called with the UART that raised the interrupt
    fn on_rx_ready(&mut self, uart: &mut U);
}
