//! RP2040-specific HAL for the Tetras display driver
//!
//! Implements the `tetras-hal` line abstraction on top of embassy-rp's
//! flexible GPIO, which can switch a pin between input and output at
//! runtime the way the open-drain bus emulation needs.
//!
//! For the delay source, use `embassy_time::Delay` - it implements the
//! blocking `embedded_hal::delay::DelayNs` the driver expects.

#![no_std]

pub mod line;

pub use line::FlexLine;
