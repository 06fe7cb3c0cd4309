//! End-to-end tests: UART bursts in, handler callbacks out

mod common;

use common::{Call, MockUart, Recorder};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use static_cell::StaticCell;

use staccato_core::{
    start, stop, DefaultMidiQueue, Dispatcher, LogHandler, MidiQueue, MidiReceiver,
    ReceiveError,
};
use staccato_protocol::{AccumulatorError, Frame, MAX_SYSEX_DATA};

type Queue = DefaultMidiQueue<CriticalSectionRawMutex>;

/// Push each burst through the receiver, then dispatch everything queued
fn run(bursts: &[&[u8]]) -> (Vec<Call>, Queue) {
    let queue = Queue::new();
    let calls = {
        let mut receiver = MidiReceiver::new(&queue);
        let mut uart = MockUart::new();
        for burst in bursts {
            uart.fifo.extend(burst.iter().copied());
            while !uart.fifo.is_empty() {
                let _ = receiver.poll(&mut uart);
            }
        }

        let mut dispatcher = Dispatcher::new(&queue, Recorder::default());
        while dispatcher.poll().is_some() {}
        dispatcher.into_handler().calls
    };
    (calls, queue)
}

#[test]
fn test_note_on() {
    let (calls, _) = run(&[&[0x91, 0x40, 0x60]]);
    assert_eq!(calls, vec![Call::NoteOn(1, 0x40, 0x60)]);
}

#[test]
fn test_pitch_bend_14_bit() {
    let (calls, _) = run(&[&[0xE0, 0x00, 0x40]]);
    assert_eq!(calls, vec![Call::PitchBend(0, 0x2000)]);
}

#[test]
fn test_realtime_interleaved_single_burst() {
    let (calls, _) = run(&[&[0x91, 0xF8, 0x40, 0x60]]);
    assert_eq!(calls, vec![Call::TimingClock, Call::NoteOn(1, 0x40, 0x60)]);
}

#[test]
fn test_realtime_interleaved_split_bursts() {
    let (calls, _) = run(&[&[0x91], &[0xF8, 0x40], &[0x60]]);
    assert_eq!(calls, vec![Call::TimingClock, Call::NoteOn(1, 0x40, 0x60)]);
}

#[test]
fn test_every_channel_voice_kind() {
    let (calls, _) = run(&[
        &[0x80, 60, 0],
        &[0xA1, 60, 33],
        &[0xB2, 7, 100],
        &[0xC3, 12],
        &[0xD4, 90],
        &[0xEF, 0x7F, 0x7F],
    ]);
    assert_eq!(
        calls,
        vec![
            Call::NoteOff(0, 60, 0),
            Call::PolyKeyPressure(1, 60, 33),
            Call::ControlChange(2, 7, 100),
            Call::ProgramChange(3, 12),
            Call::ChannelPressure(4, 90),
            Call::PitchBend(15, 0x3FFF),
        ]
    );
}

#[test]
fn test_system_common_and_realtime() {
    let (calls, _) = run(&[
        &[0xF1, 0x35],
        &[0xF2, 0x00, 0x01],
        &[0xF3, 0x04],
        &[0xF6],
        &[0xFA, 0xFB, 0xFC, 0xFE],
        &[0xFF],
    ]);
    assert_eq!(
        calls,
        vec![
            Call::TimeCode(3, 5),
            Call::SongPosition(0x80),
            Call::SongSelect(4),
            Call::TuneRequest,
            Call::SequenceStart,
            Call::SequenceContinue,
            Call::SequenceStop,
            Call::ActiveSensing,
            Call::Reset,
        ]
    );
}

#[test]
fn test_sysex_returns_to_idle_and_delivers() {
    let queue = Queue::new();
    let mut receiver = MidiReceiver::new(&queue);
    receiver.feed(&[0xF0, 0x01, 0x02, 0xF7]).unwrap();

    assert!(!receiver.accumulator().is_sysex_open());
    assert_eq!(receiver.accumulator().frame_fill(), 0);

    let mut dispatcher = Dispatcher::new(&queue, Recorder::default());
    while dispatcher.poll().is_some() {}
    assert_eq!(
        dispatcher.handler().calls,
        vec![Call::SysexStart, Call::SysexEnd(vec![0x01, 0x02])]
    );
}

#[test]
fn test_sysex_with_clock_inside() {
    let (calls, _) = run(&[&[0xF0, 0x7E, 0xF8, 0x09], &[0x01, 0xF7, 0x90, 0x3C], &[0x40]]);
    assert_eq!(
        calls,
        vec![
            Call::SysexStart,
            Call::TimingClock,
            Call::SysexEnd(vec![0x7E, 0x09, 0x01]),
            Call::NoteOn(0, 0x3C, 0x40),
        ]
    );
}

#[test]
fn test_sysex_overflow_recovers() {
    let mut long = vec![0xF0];
    long.extend(std::iter::repeat(0x11).take(200));
    long.push(0xF7);

    let mut bursts: Vec<&[u8]> = long.chunks(4).collect();
    bursts.push(&[0x92, 0x30, 0x31]);

    let (calls, queue) = run(&bursts);
    assert_eq!(calls, vec![Call::SysexStart, Call::NoteOn(2, 0x30, 0x31)]);
    assert_eq!(queue.stats().sysex_overflows, 1);
}

#[test]
fn test_garbage_is_dropped_silently() {
    let (calls, queue) = run(&[&[0x00, 0x12, 0xF4, 0xF5], &[0xF7, 0xF9, 0xFD]]);
    assert!(calls.is_empty());
    assert!(queue.is_empty());
}

#[test]
fn test_undefined_realtime_does_not_stall_dispatch() {
    let (calls, queue) = run(&[&[0xF9, 0x90, 0x3C], &[0x40, 0xFD], &[0xF8]]);
    assert_eq!(calls, vec![Call::NoteOn(0, 0x3C, 0x40), Call::TimingClock]);
    assert!(queue.is_empty());
}

#[test]
fn test_sysex_of_full_capacity_is_delivered() {
    let mut block = vec![0xF0];
    block.extend(std::iter::repeat(0x22).take(MAX_SYSEX_DATA));
    block.push(0xF7);
    let bursts: Vec<&[u8]> = block.chunks(4).collect();

    let (calls, queue) = run(&bursts);
    assert_eq!(
        calls,
        vec![Call::SysexStart, Call::SysexEnd(vec![0x22; MAX_SYSEX_DATA])]
    );
    assert_eq!(queue.stats().sysex_overflows, 0);
}

#[test]
fn test_flood_does_not_block_producer() {
    let queue = Queue::new();
    let mut receiver = MidiReceiver::new(&queue);

    // 25 clocks into a queue of 10, nothing consuming
    for _ in 0..25 {
        receiver.feed(&[0xF8]).unwrap();
    }
    assert!(queue.len() <= 10);
    assert!(queue.stats().queue_purges >= 1);

    let frame = queue.try_dequeue().unwrap();
    assert_eq!(frame, Frame::single(0xF8));
}

#[test]
fn test_empty_read_is_counted() {
    let queue = Queue::new();
    let mut receiver = MidiReceiver::new(&queue);
    let mut uart = MockUart::new();
    uart.spurious_ready = true;

    assert_eq!(receiver.poll(&mut uart), Err(ReceiveError::EmptyRead));
    assert_eq!(queue.stats().empty_reads, 1);
    assert!(receiver.accumulator().is_idle());
}

#[test]
fn test_uart_error_is_counted() {
    let queue = Queue::new();
    let mut receiver = MidiReceiver::new(&queue);
    let mut uart = MockUart::new();
    uart.fail_read = true;

    assert!(matches!(receiver.poll(&mut uart), Err(ReceiveError::Uart(_))));
    assert_eq!(queue.stats().uart_errors, 1);
}

#[test]
fn test_poll_reports_overflow() {
    let queue: MidiQueue<CriticalSectionRawMutex, 10, 2> = MidiQueue::new();
    let mut receiver = MidiReceiver::new(&queue);
    let mut uart = MockUart::new();
    uart.fifo.extend([0xF0, 1, 2, 3]);

    assert_eq!(
        receiver.poll(&mut uart),
        Err(ReceiveError::Accumulator(AccumulatorError::SysexOverflow))
    );
}

#[test]
fn test_idle_uart_reads_nothing() {
    let queue = Queue::new();
    let mut receiver = MidiReceiver::new(&queue);
    let mut uart = MockUart::new();
    assert_eq!(receiver.poll(&mut uart), Ok(0));
}

#[test]
fn test_attach_start_stop() {
    static QUEUE: Queue = MidiQueue::new();
    static RECEIVER: StaticCell<MidiReceiver<'static, CriticalSectionRawMutex>> =
        StaticCell::new();

    let mut uart = MockUart::new();
    RECEIVER.init(MidiReceiver::new(&QUEUE)).attach(&mut uart);
    assert!(uart.has_handler());

    // Masked until started
    uart.receive(&[0x90, 0x3C, 0x7F]);
    assert!(QUEUE.is_empty());

    start(&mut uart);
    assert!(uart.irq_enabled);
    uart.fire_irq();
    assert_eq!(QUEUE.try_dequeue(), Some(Frame::message(0x90, 0x3C, 0x7F)));

    uart.receive(&[0xF8]);
    assert_eq!(QUEUE.try_dequeue(), Some(Frame::single(0xF8)));

    stop(&mut uart);
    assert!(!uart.irq_enabled);
}

#[test]
fn test_log_handler_accepts_everything() {
    let queue = Queue::new();
    let mut receiver = MidiReceiver::new(&queue);
    receiver
        .feed(&[0x90, 1, 2, 0xF0, 3, 0xF7, 0xF1, 0x10, 0xFE])
        .unwrap();

    let mut dispatcher = Dispatcher::new(&queue, LogHandler);
    let mut invoked = 0;
    while !queue.is_empty() {
        if dispatcher.poll() == Some(true) {
            invoked += 1;
        }
    }
    assert_eq!(invoked, 5);
}
