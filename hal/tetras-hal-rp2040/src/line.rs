//! Bus line over embassy-rp flexible GPIO

use embassy_rp::gpio::{Flex, Pull};
use tetras_hal::BusLine;

/// A display bus line on an RP2040 GPIO.
///
/// The internal pull-up is enabled so a released line reads high even
/// before the display module's own pull-up takes over.
pub struct FlexLine<'d> {
    pin: Flex<'d>,
}

impl<'d> FlexLine<'d> {
    /// Wrap a GPIO in a bus line, leaving it driven high (bus idle).
    pub fn new(mut pin: Flex<'d>) -> Self {
        pin.set_pull(Pull::Up);
        pin.set_high();
        pin.set_as_output();
        Self { pin }
    }
}

impl BusLine for FlexLine<'_> {
    fn set_output(&mut self) {
        self.pin.set_as_output();
    }

    fn set_input(&mut self) {
        self.pin.set_as_input();
    }

    fn set_high(&mut self) {
        self.pin.set_high();
    }

    fn set_low(&mut self) {
        self.pin.set_low();
    }

    fn is_high(&mut self) -> bool {
        self.pin.is_high()
    }
}
