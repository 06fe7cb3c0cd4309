//! Test doubles shared by the integration tests

#![allow(dead_code)]

use std::collections::VecDeque;

use embedded_io::{ErrorKind, ErrorType, ReadReady};
use staccato_core::MidiHandler;
use staccato_hal::{RxInterruptHandler, UartRxIrq};

/// UART whose receive FIFO is filled by the test
#[derive(Default)]
pub struct MockUart {
    pub fifo: VecDeque<u8>,
    pub irq_enabled: bool,
    /// Report ready with an empty FIFO on the next pass
    pub spurious_ready: bool,
    /// Fail the next read
    pub fail_read: bool,
    handler: Option<&'static mut dyn RxInterruptHandler<MockUart>>,
}

impl MockUart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    /// Simulate bytes arriving on the wire, one interrupt per burst
    pub fn receive(&mut self, bytes: &[u8]) {
        self.fifo.extend(bytes.iter().copied());
        while !self.fifo.is_empty() && self.irq_enabled && self.handler.is_some() {
            self.fire_irq();
        }
    }

    /// Raise the receive-ready interrupt once
    pub fn fire_irq(&mut self) {
        if let Some(handler) = self.handler.take() {
            handler.on_rx_ready(self);
            self.handler = Some(handler);
        }
    }
}

impl ErrorType for MockUart {
    type Error = ErrorKind;
}

impl ReadReady for MockUart {
    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        Ok(self.spurious_ready || self.fail_read || !self.fifo.is_empty())
    }
}

impl UartRxIrq for MockUart {
    fn read_fifo(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if self.fail_read {
            self.fail_read = false;
            return Err(ErrorKind::Other);
        }
        self.spurious_ready = false;

        let mut read = 0;
        while read < buf.len() {
            match self.fifo.pop_front() {
                Some(byte) => {
                    buf[read] = byte;
                    read += 1;
                }
                None => break,
            }
        }
        Ok(read)
    }

    fn set_rx_handler(&mut self, handler: &'static mut dyn RxInterruptHandler<Self>) {
        self.handler = Some(handler);
    }

    fn enable_rx_irq(&mut self) {
        self.irq_enabled = true;
    }

    fn disable_rx_irq(&mut self) {
        self.irq_enabled = false;
    }
}

/// One recorded callback
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    NoteOff(u8, u8, u8),
    NoteOn(u8, u8, u8),
    PolyKeyPressure(u8, u8, u8),
    ControlChange(u8, u8, u8),
    ProgramChange(u8, u8),
    ChannelPressure(u8, u8),
    PitchBend(u8, u16),
    SysexStart,
    SysexEnd(Vec<u8>),
    TimeCode(u8, u8),
    SongPosition(u16),
    SongSelect(u8),
    TuneRequest,
    TimingClock,
    SequenceStart,
    SequenceContinue,
    SequenceStop,
    ActiveSensing,
    Reset,
}

/// Handler that records every callback
#[derive(Debug, Default)]
pub struct Recorder {
    pub calls: Vec<Call>,
}

impl MidiHandler for Recorder {
    fn note_off(&mut self, channel: u8, key: u8, velocity: u8) {
        self.calls.push(Call::NoteOff(channel, key, velocity));
    }

    fn note_on(&mut self, channel: u8, key: u8, velocity: u8) {
        self.calls.push(Call::NoteOn(channel, key, velocity));
    }

    fn poly_key_pressure(&mut self, channel: u8, key: u8, pressure: u8) {
        self.calls.push(Call::PolyKeyPressure(channel, key, pressure));
    }

    fn control_change(&mut self, channel: u8, controller: u8, value: u8) {
        self.calls.push(Call::ControlChange(channel, controller, value));
    }

    fn program_change(&mut self, channel: u8, program: u8) {
        self.calls.push(Call::ProgramChange(channel, program));
    }

    fn channel_pressure(&mut self, channel: u8, pressure: u8) {
        self.calls.push(Call::ChannelPressure(channel, pressure));
    }

    fn pitch_bend(&mut self, channel: u8, value: u16) {
        self.calls.push(Call::PitchBend(channel, value));
    }

    fn sysex_start(&mut self) {
        self.calls.push(Call::SysexStart);
    }

    fn sysex_end(&mut self, data: &[u8]) {
        self.calls.push(Call::SysexEnd(data.to_vec()));
    }

    fn time_code(&mut self, msg_type: u8, value: u8) {
        self.calls.push(Call::TimeCode(msg_type, value));
    }

    fn song_position(&mut self, position: u16) {
        self.calls.push(Call::SongPosition(position));
    }

    fn song_select(&mut self, song: u8) {
        self.calls.push(Call::SongSelect(song));
    }

    fn tune_request(&mut self) {
        self.calls.push(Call::TuneRequest);
    }

    fn timing_clock(&mut self) {
        self.calls.push(Call::TimingClock);
    }

    fn sequence_start(&mut self) {
        self.calls.push(Call::SequenceStart);
    }

    fn sequence_continue(&mut self) {
        self.calls.push(Call::SequenceContinue);
    }

    fn sequence_stop(&mut self) {
        self.calls.push(Call::SequenceStop);
    }

    fn active_sensing(&mut self) {
        self.calls.push(Call::ActiveSensing);
    }

    fn reset(&mut self) {
        self.calls.push(Call::Reset);
    }
}
