//! Staccato Hardware Abstraction Layer
//!
//! This crate defines the receive-side UART binding that the MIDI input
//! core is written against. Chip-specific HALs implement it on top of
//! their UART peripheral and interrupt controller.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  staccato-core (receiver, dispatcher)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  staccato-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  chip HAL (UART FIFO + RX interrupt)    │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::UartRxIrq`] - Interrupt-driven UART receiver
//! - [`uart::RxInterruptHandler`] - Callback invoked on receive-ready

#![no_std]
#![deny(unsafe_code)]

pub mod uart;

// Re-export key traits at crate root for convenience
pub use uart::{RxInterruptHandler, UartRxIrq};
