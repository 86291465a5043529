//! Bit-banged driver for the TM1637 4-digit 7-segment display
//!
//! The TM1637 speaks a two-wire synchronous serial protocol (CLK plus a
//! bidirectional DIO) that borrows I2C's start/stop framing but is
//! clocked entirely by the transmitter - no addressing, no arbitration.
//! This crate produces that protocol in software over any pair of GPIO
//! lines; no serial peripheral is involved.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Caller (firmware task, demo loop)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  Tm1637 (display.rs)                    │  commands, addressing,
//! │                                         │  segment patterns
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  TwoWireBus (bus.rs)                    │  start/stop framing,
//! │                                         │  bit timing, ack sampling
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!               CLK / DIO lines
//! ```
//!
//! Control only flows downward. The single piece of data flowing back up
//! is the acknowledge bit the chip pulls on DIO after every byte; the
//! plain display operations discard it, the `try_*` variants report it.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod bus;
pub mod display;
pub mod segments;

pub use bus::TwoWireBus;
pub use display::{Tm1637, Tm1637Config, Tm1637Error};

#[cfg(test)]
mod sim;
