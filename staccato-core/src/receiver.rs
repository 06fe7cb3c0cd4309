//! Interrupt-side byte intake
//!
//! [`MidiReceiver`] is the long-lived owner of the input's [`Accumulator`].
//! It is built once at start-up, handed by exclusive `'static` reference to
//! the UART's interrupt registration, and from then on only runs inside the
//! receive-ready interrupt. Each interrupt drains one burst from the FIFO,
//! feeds it byte by byte to the accumulator and queues whatever completes.

use embassy_sync::blocking_mutex::raw::RawMutex;

use staccato_hal::{RxInterruptHandler, UartRxIrq};
use staccato_protocol::{
    Accumulator, AccumulatorError, Emit, MAX_BURST, MAX_SYSEX_DATA, QUEUE_DEPTH,
};

use crate::queue::MidiQueue;
use crate::stats::Counter;

/// Errors from a single receive pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReceiveError<E> {
    /// The UART signalled ready but the FIFO was empty
    EmptyRead,
    /// The UART reported an error
    Uart(E),
    /// A System Exclusive block was discarded
    Accumulator(AccumulatorError),
}

impl<E> From<AccumulatorError> for ReceiveError<E> {
    fn from(err: AccumulatorError) -> Self {
        ReceiveError::Accumulator(err)
    }
}

/// Producer half of the input pipeline
pub struct MidiReceiver<
    'q,
    M: RawMutex,
    const N: usize = QUEUE_DEPTH,
    const S: usize = MAX_SYSEX_DATA,
> {
    accumulator: Accumulator<S>,
    queue: &'q MidiQueue<M, N, S>,
}

impl<'q, M: RawMutex, const N: usize, const S: usize> MidiReceiver<'q, M, N, S> {
    /// Create a receiver with an idle accumulator
    pub const fn new(queue: &'q MidiQueue<M, N, S>) -> Self {
        Self {
            accumulator: Accumulator::new(),
            queue,
        }
    }

    /// Reassembly state, for inspection
    pub fn accumulator(&self) -> &Accumulator<S> {
        &self.accumulator
    }

    /// Feed a burst of received bytes
    ///
    /// Every byte is processed even if a System Exclusive block overflows
    /// part way through; the overflow is counted and reported afterwards.
    pub fn feed(&mut self, bytes: &[u8]) -> Result<(), AccumulatorError> {
        let mut result = Ok(());
        for &byte in bytes {
            if let Err(err) = self.push(byte) {
                self.queue.counters().record(Counter::SysexOverflow);
                warn!("Sysex overflow, block discarded");
                result = Err(err);
            }
        }
        result
    }

    fn push(&mut self, byte: u8) -> Result<(), AccumulatorError> {
        let queue = self.queue;
        match self.accumulator.push(byte)? {
            Some(Emit::Frame(frame)) => queue.enqueue(frame),
            Some(Emit::Sysex(data)) => queue.submit_sysex(data),
            None => {}
        }
        Ok(())
    }

    /// Run one receive pass: readiness check, one FIFO burst, accumulate
    ///
    /// Returns the number of bytes consumed. Errors are counted in the
    /// queue's diagnostics before being returned.
    pub fn poll<U: UartRxIrq>(&mut self, uart: &mut U) -> Result<usize, ReceiveError<U::Error>> {
        let queue = self.queue;
        let counters = queue.counters();

        let ready = uart.read_ready().map_err(|err| {
            counters.record(Counter::UartError);
            error!("UART readiness check failed");
            ReceiveError::Uart(err)
        })?;
        if !ready {
            return Ok(0);
        }

        let mut burst = [0u8; MAX_BURST];
        let read = uart.read_fifo(&mut burst).map_err(|err| {
            counters.record(Counter::UartError);
            error!("UART read error");
            ReceiveError::Uart(err)
        })?;

        // The FIFO can drain between the readiness check and the read
        if read == 0 {
            counters.record(Counter::EmptyRead);
            warn!("Empty UART read");
            return Err(ReceiveError::EmptyRead);
        }

        let read = read.min(MAX_BURST);
        trace!("RX: {} bytes", read);
        self.feed(&burst[..read])?;
        Ok(read)
    }
}

impl<M: RawMutex + 'static, const N: usize, const S: usize> MidiReceiver<'static, M, N, S>
where
    M: Sync,
{
    /// Register this receiver as the UART's receive interrupt handler
    ///
    /// Interrupts stay masked until [`start`] is called.
    pub fn attach<U: UartRxIrq + 'static>(&'static mut self, uart: &mut U) {
        debug!("MIDI receiver attached");
        uart.set_rx_handler(self);
    }
}

impl<'q, M, U, const N: usize, const S: usize> RxInterruptHandler<U> for MidiReceiver<'q, M, N, S>
where
    M: RawMutex + Sync,
    U: UartRxIrq,
{
    fn on_rx_ready(&mut self, uart: &mut U) {
        // Already counted and logged; nothing to propagate to from an ISR
        let _ = self.poll(uart);
    }
}

/// Unmask receive interrupts, starting the flow of MIDI input
pub fn start<U: UartRxIrq>(uart: &mut U) {
    debug!("MIDI start");
    uart.enable_rx_irq();
}

/// Mask receive interrupts
pub fn stop<U: UartRxIrq>(uart: &mut U) {
    debug!("MIDI stop");
    uart.disable_rx_irq();
}
