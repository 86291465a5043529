//! TM1637 display controller
//!
//! Translates digit and brightness requests into the chip's command
//! sequences. The chip understands three command families:
//!
//! - data commands (`0x40` auto-increment, `0x44` fixed addressing),
//! - address commands (`0xC0` plus the digit position),
//! - display control (`0x88` OR a brightness level; bit 3 doubles as
//!   display-on).
//!
//! Every update here uses fixed addressing: one data command announcing
//! the mode, then one start/address/pattern/stop transaction per digit.
//! An address write that is not preceded by a data command of the
//! matching mode leaves the chip in an undefined state, so the data
//! command is reissued for every logical update rather than remembered.
//!
//! Invalid input (position, digit, or value out of range) is dropped
//! before any bus traffic: an update either happens whole or not at all.

use embedded_hal::delay::DelayNs;
use tetras_hal::BusLine;

use crate::bus::TwoWireBus;
use crate::segments;

/// TM1637 command bytes.
pub mod cmd {
    /// Data command: write display registers, auto-increment addressing.
    pub const DATA_AUTO: u8 = 0x40;
    /// Data command: write display registers, fixed addressing.
    pub const DATA_FIXED: u8 = 0x44;
    /// Address command for digit position 0; positions 1-3 add onto it.
    pub const ADDR_START: u8 = 0xC0;
    /// Display control: display on; OR with a brightness level 0-7.
    pub const DISPLAY_CTRL: u8 = 0x88;
}

/// Number of digit positions on the module.
pub const POSITIONS: u8 = 4;

/// Highest brightness level the control command encodes.
pub const BRIGHTNESS_MAX: u8 = 7;

/// Largest value the four digits can render.
pub const VALUE_MAX: i32 = 9999;

/// Errors surfaced by the checked (`try_*`) display operations.
///
/// The plain operations keep the classic silent behavior: invalid input
/// is dropped without touching the bus, and missing acknowledges are
/// ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Tm1637Error {
    /// Digit position outside 0-3.
    InvalidPosition,
    /// Digit value outside 0-9.
    InvalidDigit,
    /// Number outside 0-9999.
    ValueOutOfRange,
    /// The chip did not pull DIO low after at least one byte.
    Nack,
}

/// Display controller configuration.
#[derive(Debug, Clone)]
pub struct Tm1637Config {
    /// Brightness level applied during init, clamped to 0-7.
    pub initial_brightness: u8,
    /// Settle delay for the underlying bus, in microseconds. Values
    /// below [`crate::bus::SETTLE_DELAY_US`] are raised to it.
    pub settle_us: u32,
}

impl Default for Tm1637Config {
    fn default() -> Self {
        Self {
            initial_brightness: BRIGHTNESS_MAX,
            settle_us: crate::bus::SETTLE_DELAY_US,
        }
    }
}

/// Driver for the TM1637 4-digit display module.
///
/// The chip itself holds all display state; this struct owns nothing
/// but the bus. Dropping it leaves the display showing whatever was
/// last written.
pub struct Tm1637<CLK, DIO, D> {
    bus: TwoWireBus<CLK, DIO, D>,
}

impl<CLK, DIO, D> Tm1637<CLK, DIO, D>
where
    CLK: BusLine,
    DIO: BusLine,
    D: DelayNs,
{
    /// Bind the two bus lines and bring the display up: all segments
    /// off, brightness at maximum.
    pub fn new(clk: CLK, dio: DIO, delay: D) -> Self {
        Self::with_config(clk, dio, delay, Tm1637Config::default())
    }

    /// Like [`new`](Self::new) with explicit initial brightness and
    /// bus timing.
    pub fn with_config(clk: CLK, dio: DIO, delay: D, config: Tm1637Config) -> Self {
        let bus = TwoWireBus::with_settle_delay(clk, dio, delay, config.settle_us);
        let mut display = Self { bus };
        display.clear();
        display.set_brightness(config.initial_brightness);
        display
    }

    /// Set display brightness, clamping to 0-7.
    ///
    /// Level 0 is minimum duty cycle, not display-off: the control
    /// command always keeps the display-on bit set.
    pub fn set_brightness(&mut self, level: u8) {
        let _ = self.try_set_brightness(level);
    }

    /// Checked variant of [`set_brightness`](Self::set_brightness).
    /// The level is still clamped; the only reportable failure is a
    /// missing acknowledge.
    pub fn try_set_brightness(&mut self, level: u8) -> Result<(), Tm1637Error> {
        let level = level.min(BRIGHTNESS_MAX);
        if self.bus.write_command(cmd::DISPLAY_CTRL | level) {
            Ok(())
        } else {
            Err(Tm1637Error::Nack)
        }
    }

    /// Render one digit at one position. An out-of-range position or
    /// digit is silently dropped without any bus traffic.
    pub fn display_digit(&mut self, position: u8, digit: u8) {
        let _ = self.try_display_digit(position, digit);
    }

    /// Checked variant of [`display_digit`](Self::display_digit).
    pub fn try_display_digit(&mut self, position: u8, digit: u8) -> Result<(), Tm1637Error> {
        if position >= POSITIONS {
            return Err(Tm1637Error::InvalidPosition);
        }
        let pattern = segments::digit_pattern(digit).ok_or(Tm1637Error::InvalidDigit)?;

        let mut ack = self.bus.write_command(cmd::DATA_FIXED);
        ack &= self.write_register(position, pattern);
        if ack {
            Ok(())
        } else {
            Err(Tm1637Error::Nack)
        }
    }

    /// Render a value zero-padded across all four digits, most
    /// significant digit at position 0. Values outside 0-9999 are
    /// silently dropped without any bus traffic.
    pub fn display_number(&mut self, value: i32) {
        let _ = self.try_display_number(value);
    }

    /// Checked variant of [`display_number`](Self::display_number).
    pub fn try_display_number(&mut self, value: i32) -> Result<(), Tm1637Error> {
        if !(0..=VALUE_MAX).contains(&value) {
            return Err(Tm1637Error::ValueOutOfRange);
        }
        let digits = decompose(value as u16);
        self.write_all(|position| segments::DIGIT_PATTERNS[digits[position] as usize])
    }

    /// Blank all four positions.
    pub fn clear(&mut self) {
        let _ = self.try_clear();
    }

    /// Checked variant of [`clear`](Self::clear).
    pub fn try_clear(&mut self) -> Result<(), Tm1637Error> {
        self.write_all(|_| segments::BLANK)
    }

    /// One fixed-address update: the data command once, then each
    /// position in its own transaction. The chip's fixed-address write
    /// mode addresses every digit independently, so this is 5 bus
    /// transactions, never one batched transaction.
    fn write_all(&mut self, pattern_at: impl Fn(usize) -> u8) -> Result<(), Tm1637Error> {
        let mut ack = self.bus.write_command(cmd::DATA_FIXED);
        for position in 0..POSITIONS {
            ack &= self.write_register(position, pattern_at(position as usize));
        }
        if ack {
            Ok(())
        } else {
            Err(Tm1637Error::Nack)
        }
    }

    /// Address plus pattern in a single transaction. Callers must have
    /// issued the fixed-addressing data command beforehand.
    fn write_register(&mut self, position: u8, pattern: u8) -> bool {
        self.bus.start();
        let mut ack = self.bus.write_byte(cmd::ADDR_START + position);
        ack &= self.bus.write_byte(pattern);
        self.bus.stop();
        ack
    }
}

/// Split a value into its four decimal digits, most significant first.
fn decompose(mut value: u16) -> [u8; 4] {
    let mut digits = [0u8; 4];
    for slot in digits.iter_mut().rev() {
        *slot = (value % 10) as u8;
        value /= 10;
    }
    digits
}
