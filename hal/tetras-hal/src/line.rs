//! Open-drain bus line abstraction
//!
//! The display bus is idle-high with pull-up resistors on both wires. A
//! transmitter may drive a line low or release it and let the pull-up
//! supply the high level; it must never push a high level onto a line
//! another device could be pulling low. Releasing is modelled as
//! switching the pin to input mode, so implementations need pins whose
//! direction can change at runtime.

/// One digital line of the two-wire display bus.
///
/// The line is in one of two modes: driven (push-pull output) or
/// released (input, held high by the pull-up unless a receiver pulls it
/// low). `set_high`/`set_low` only take effect in output mode.
pub trait BusLine {
    /// Reconfigure the line as a driven output.
    ///
    /// The line resumes driving its last output level.
    fn set_output(&mut self);

    /// Release the line: switch to input mode.
    ///
    /// The pull-up supplies the high level. Implementations must not
    /// drive the line in any way while it is released.
    fn set_input(&mut self);

    /// Drive the line high (output mode only).
    fn set_high(&mut self);

    /// Drive the line low (output mode only).
    fn set_low(&mut self);

    /// Sample the electrical level of the line.
    ///
    /// While released this reads whatever the bus carries: the pull-up,
    /// or a receiver pulling the line low.
    fn is_high(&mut self) -> bool;

    /// Sample the line for a low level.
    fn is_low(&mut self) -> bool {
        !self.is_high()
    }
}
