//! Counting demo for the Tetras display driver
//!
//! Wires the display module's CLK to GPIO2 and DIO to GPIO3, then
//! counts 0 through 9999 forever, half a second per step. All the
//! protocol work lives in `tetras-driver`; this binary is only a
//! caller.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::Flex;
use embassy_time::{Delay, Duration, Timer};
use {defmt_rtt as _, panic_probe as _};

use tetras_driver::Tm1637;
use tetras_hal_rp2040::FlexLine;

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Tetras demo starting...");

    let p = embassy_rp::init(Default::default());

    let clk = FlexLine::new(Flex::new(p.PIN_2));
    let dio = FlexLine::new(Flex::new(p.PIN_3));

    // Init clears the display and raises brightness to maximum
    let mut display = Tm1637::new(clk, dio, Delay);
    display.set_brightness(4);
    display.display_number(1234);
    info!("Display initialized");

    loop {
        for value in 0..=9999i32 {
            display.display_number(value);
            Timer::after(Duration::from_millis(500)).await;
        }

        display.clear();
        Timer::after(Duration::from_secs(1)).await;
    }
}
