//! Two-wire bus transmitter
//!
//! Software-clocked implementation of the TM1637 bus protocol:
//!
//! - Idle state: both lines high.
//! - Start: DIO falls while CLK is high, then CLK falls.
//! - Bit: DIO is set up while CLK is low; the receiver samples on the
//!   CLK rising edge. Bytes go out least significant bit first.
//! - Ack: after 8 bits the receiver pulls DIO low for a ninth clock
//!   pulse; the transmitter samples DIO while that pulse is high.
//! - Stop: with both lines low, CLK rises, then DIO rises.
//!
//! DIO is never driven high during a bit. A 1 is transmitted by
//! releasing the line and letting the pull-up raise it, which is what
//! keeps the line open-drain correct even though only one device writes.
//!
//! Every level change is followed by a settle delay so the chip's
//! minimum setup/hold times are met. A transaction (start through stop)
//! contains no suspension point, and every operation takes `&mut self`,
//! so two transactions can never interleave their line transitions.

use embedded_hal::delay::DelayNs;
use tetras_hal::BusLine;

/// Minimum time between line transitions, in microseconds.
///
/// 20us keeps every clock phase above the chip's minimum timing.
/// Raising it only slows the bus down; lowering it breaks transfers on
/// real hardware, so [`TwoWireBus::with_settle_delay`] refuses values
/// below this.
pub const SETTLE_DELAY_US: u32 = 20;

/// Software implementation of the TM1637 two-wire bus.
///
/// Owns the two lines and the delay source for its whole lifetime;
/// nothing else may touch the pins while the bus exists.
pub struct TwoWireBus<CLK, DIO, D> {
    clk: CLK,
    dio: DIO,
    delay: D,
    settle_us: u32,
}

impl<CLK, DIO, D> TwoWireBus<CLK, DIO, D>
where
    CLK: BusLine,
    DIO: BusLine,
    D: DelayNs,
{
    /// Take ownership of the two lines and put the bus in its idle
    /// state: both lines driven high.
    pub fn new(clk: CLK, dio: DIO, delay: D) -> Self {
        Self::with_settle_delay(clk, dio, delay, SETTLE_DELAY_US)
    }

    /// Like [`new`](Self::new), with a slower settle delay for long or
    /// noisy wiring. Values below [`SETTLE_DELAY_US`] are raised to it.
    pub fn with_settle_delay(mut clk: CLK, mut dio: DIO, delay: D, settle_us: u32) -> Self {
        clk.set_output();
        dio.set_output();
        clk.set_high();
        dio.set_high();

        Self {
            clk,
            dio,
            delay,
            settle_us: settle_us.max(SETTLE_DELAY_US),
        }
    }

    fn settle(&mut self) {
        self.delay.delay_us(self.settle_us);
    }

    /// Signal the beginning of a transaction.
    ///
    /// DIO falls while CLK stays high; the chip re-synchronizes on that
    /// edge. Expects the idle state left behind by [`new`](Self::new)
    /// or [`stop`](Self::stop).
    pub fn start(&mut self) {
        self.dio.set_output();
        self.dio.set_high();
        self.clk.set_high();
        self.settle();
        self.dio.set_low();
        self.settle();
        self.clk.set_low();
    }

    /// Signal the end of a transaction, returning both lines to
    /// idle-high.
    pub fn stop(&mut self) {
        self.dio.set_output();
        self.clk.set_low();
        self.dio.set_low();
        self.settle();
        self.clk.set_high();
        self.settle();
        self.dio.set_high();
        self.settle();
    }

    /// Transmit a single bit.
    ///
    /// A 1 releases DIO to the pull-up instead of driving it high. The
    /// chip samples on the rising CLK edge.
    pub fn write_bit(&mut self, bit: bool) {
        self.clk.set_low();
        if bit {
            self.dio.set_input();
        } else {
            self.dio.set_output();
            self.dio.set_low();
        }
        self.settle();
        self.clk.set_high();
        self.settle();
        self.clk.set_low();
        self.dio.set_output();
    }

    /// Transmit one byte, least significant bit first, then clock the
    /// acknowledge window.
    ///
    /// Returns true when the chip acknowledged by holding DIO low
    /// during the ninth clock pulse. Callers are free to discard the
    /// result; the plain display operations do (see the crate docs).
    pub fn write_byte(&mut self, byte: u8) -> bool {
        let mut byte = byte;
        for _ in 0..8 {
            self.write_bit(byte & 0x01 != 0);
            byte >>= 1;
        }

        // Ack window: release DIO and clock one extra pulse. The chip
        // answers by keeping the released line low.
        self.dio.set_input();
        self.settle();
        self.clk.set_low();
        self.settle();
        self.clk.set_high();
        self.settle();
        let ack = self.dio.is_low();
        self.clk.set_low();
        self.dio.set_output();
        ack
    }

    /// Transmit a single command byte in its own transaction.
    pub fn write_command(&mut self, command: u8) -> bool {
        self.start();
        let ack = self.write_byte(command);
        self.stop();
        ack
    }
}
