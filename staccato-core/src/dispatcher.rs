//! Worker-side frame dispatch
//!
//! The dispatcher owns the application's [`MidiHandler`] and drains the
//! [`MidiQueue`], decoding each frame and invoking exactly one callback for
//! it. Unrecognised frames are discarded without a callback.

use embassy_sync::blocking_mutex::raw::RawMutex;

use staccato_protocol::{Frame, MidiMessage, MAX_SYSEX_DATA, QUEUE_DEPTH};

use crate::handler::MidiHandler;
use crate::queue::MidiQueue;

/// Consumer half of the input pipeline
pub struct Dispatcher<
    'q,
    M: RawMutex,
    H,
    const N: usize = QUEUE_DEPTH,
    const S: usize = MAX_SYSEX_DATA,
> {
    queue: &'q MidiQueue<M, N, S>,
    handler: H,
}

impl<'q, M, H, const N: usize, const S: usize> Dispatcher<'q, M, H, N, S>
where
    M: RawMutex,
    H: MidiHandler,
{
    /// Create a dispatcher reading from `queue`
    pub fn new(queue: &'q MidiQueue<M, N, S>, handler: H) -> Self {
        Self { queue, handler }
    }

    /// The injected handler
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// The injected handler, mutably
    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    /// Consume the dispatcher, returning the handler
    pub fn into_handler(self) -> H {
        self.handler
    }

    /// Run forever, dispatching frames as they arrive
    pub async fn run(&mut self) -> ! {
        info!("MIDI dispatcher started");
        loop {
            self.next().await;
        }
    }

    /// Wait for one frame and dispatch it
    ///
    /// Returns whether a callback was invoked.
    pub async fn next(&mut self) -> bool {
        let frame = self.queue.dequeue().await;
        self.dispatch(frame)
    }

    /// Dispatch one queued frame, if any, without waiting
    ///
    /// Returns `None` when the queue is empty, otherwise whether the frame
    /// invoked a callback. Drain with `while dispatcher.poll().is_some() {}`.
    pub fn poll(&mut self) -> Option<bool> {
        self.queue.try_dequeue().map(|frame| self.dispatch(frame))
    }

    /// Decode a frame and invoke the matching callback
    ///
    /// Returns whether a callback was invoked.
    pub fn dispatch(&mut self, frame: Frame) -> bool {
        match MidiMessage::from_frame(&frame) {
            Some(msg) => self.invoke(msg),
            None => {
                trace!("Discarding frame {}", frame.as_bytes());
                false
            }
        }
    }

    fn invoke(&mut self, msg: MidiMessage) -> bool {
        let handler = &mut self.handler;
        match msg {
            MidiMessage::NoteOff {
                channel,
                key,
                velocity,
            } => handler.note_off(channel, key, velocity),
            MidiMessage::NoteOn {
                channel,
                key,
                velocity,
            } => handler.note_on(channel, key, velocity),
            MidiMessage::PolyPressure {
                channel,
                key,
                pressure,
            } => handler.poly_key_pressure(channel, key, pressure),
            MidiMessage::ControlChange {
                channel,
                controller,
                value,
            } => handler.control_change(channel, controller, value),
            MidiMessage::ProgramChange { channel, program } => {
                handler.program_change(channel, program)
            }
            MidiMessage::ChannelPressure { channel, pressure } => {
                handler.channel_pressure(channel, pressure)
            }
            MidiMessage::PitchBend { channel, value } => handler.pitch_bend(channel, value),
            MidiMessage::TimeCode { msg_type, value } => handler.time_code(msg_type, value),
            MidiMessage::SongPosition(position) => handler.song_position(position),
            MidiMessage::SongSelect(song) => handler.song_select(song),
            MidiMessage::TuneRequest => handler.tune_request(),
            MidiMessage::SysexStart => handler.sysex_start(),
            MidiMessage::SysexEnd { tag } => match self.queue.take_sysex(tag) {
                Some(data) => handler.sysex_end(&data),
                None => {
                    debug!("Sysex block {} superseded, skipping", tag);
                    return false;
                }
            },
            MidiMessage::TimingClock => handler.timing_clock(),
            MidiMessage::SequenceStart => handler.sequence_start(),
            MidiMessage::SequenceContinue => handler.sequence_continue(),
            MidiMessage::SequenceStop => handler.sequence_stop(),
            MidiMessage::ActiveSensing => handler.active_sensing(),
            MidiMessage::Reset => handler.reset(),
        }
        true
    }
}
