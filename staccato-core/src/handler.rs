//! Message callbacks
//!
//! [`MidiHandler`] has one method per message kind. Every method has a
//! default that only logs, so an application overrides just the messages it
//! cares about. Callbacks run in the dispatcher task, never in interrupt
//! context, and may take as long as they need.

/// Per-message callbacks invoked by the [`Dispatcher`](crate::Dispatcher)
///
/// Channels are `0..=15`. Data bytes are passed through as received.
pub trait MidiHandler {
    fn note_off(&mut self, channel: u8, key: u8, velocity: u8) {
        debug!("NOTE OFF\t{}, {}, {}", channel, key, velocity);
    }

    fn note_on(&mut self, channel: u8, key: u8, velocity: u8) {
        debug!("NOTE ON\t{}, {}, {}", channel, key, velocity);
    }

    fn poly_key_pressure(&mut self, channel: u8, key: u8, pressure: u8) {
        debug!("Poly Key Pres\t{}, {}, {}", channel, key, pressure);
    }

    fn control_change(&mut self, channel: u8, controller: u8, value: u8) {
        debug!("CC\t\t{}, {}, {}", channel, controller, value);
    }

    fn program_change(&mut self, channel: u8, program: u8) {
        debug!("Prog Chg\t{}, {}", channel, program);
    }

    fn channel_pressure(&mut self, channel: u8, pressure: u8) {
        debug!("Chan Pres\t{}, {}", channel, pressure);
    }

    /// `value` is 14 bits, `0x2000` is centre
    fn pitch_bend(&mut self, channel: u8, value: u16) {
        debug!("Pitch Bend\t{}, {}", channel, value);
    }

    fn sysex_start(&mut self) {
        debug!("SYSEX start");
    }

    /// Completed block: bytes after `0xF0`, terminator included
    fn sysex_end(&mut self, data: &[u8]) {
        debug!("SYSEX end, {} bytes", data.len());
    }

    /// Raw quarter-frame fields: `msg_type` is 3 bits, `value` 4 bits
    fn time_code(&mut self, msg_type: u8, value: u8) {
        debug!("Time code {} {}", msg_type, value);
    }

    /// Position in MIDI beats (sixteenth notes)
    fn song_position(&mut self, position: u16) {
        debug!("Song position {}", position);
    }

    fn song_select(&mut self, song: u8) {
        debug!("Song select {}", song);
    }

    fn tune_request(&mut self) {
        debug!("Tune rqst");
    }

    fn timing_clock(&mut self) {
        debug!("Timing clock");
    }

    fn sequence_start(&mut self) {
        debug!("Seq start");
    }

    fn sequence_continue(&mut self) {
        debug!("Seq continue");
    }

    fn sequence_stop(&mut self) {
        debug!("Seq stop");
    }

    fn active_sensing(&mut self) {
        debug!("Active sense");
    }

    fn reset(&mut self) {
        debug!("Reset");
    }
}

/// Handler that keeps every default, logging each message
#[derive(Debug, Clone, Copy, Default)]
pub struct LogHandler;

impl MidiHandler for LogHandler {}
