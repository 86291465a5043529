//! Behavioral model of the TM1637 bus receiver, used by the unit tests.
//!
//! The model watches every line transition the driver produces and runs
//! the receiving side of the protocol: start/stop detection, rising-edge
//! bit sampling (least significant bit first), byte assembly, and the
//! ack pulse. Tests read back whole transactions as byte lists instead
//! of raw edge traces, so they assert protocol meaning rather than pin
//! wiggles.
//!
//! The model is strict: driving a released line, stopping in the middle
//! of a byte, or starting inside an open transaction panics the test.

use core::cell::RefCell;

use embedded_hal::delay::DelayNs;
use heapless::Vec;
use tetras_hal::BusLine;

/// Bytes of one start..stop transaction.
pub type Transaction = Vec<u8, 8>;

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Clk,
    Dio,
}

#[derive(Clone, Copy)]
struct LineState {
    driven: bool,
    level: bool,
}

impl LineState {
    // Both lines rest driven-high, the bus idle state.
    fn idle() -> Self {
        Self {
            driven: true,
            level: true,
        }
    }
}

/// The receiver model. Share it between the two [`SimLine`] handles
/// through a `RefCell`.
pub struct ChipSim {
    /// Completed start..stop transactions, oldest first.
    pub transactions: Vec<Transaction, 32>,
    /// Whether the model acknowledges bytes. A real chip always does;
    /// tests flip this to exercise the nack path.
    pub ack_enabled: bool,

    clk: LineState,
    dio: LineState,
    /// Chip side of DIO during the ack window.
    pulling_dio: bool,

    in_transaction: bool,
    current: Transaction,
    byte: u8,
    /// Rising edges seen for the current byte: 0..8 data, then ack.
    bits_seen: u8,
    ack_pulse_seen: bool,

    /// Every data bit in sampling order, across all transactions.
    bits: Vec<bool, 512>,
    /// Data bits that arrived as 1 with DIO actively driven - an
    /// open-drain violation the driver must never commit.
    driven_high_bits: usize,
}

impl ChipSim {
    pub fn new() -> Self {
        Self {
            transactions: Vec::new(),
            ack_enabled: true,
            clk: LineState::idle(),
            dio: LineState::idle(),
            pulling_dio: false,
            in_transaction: false,
            current: Transaction::new(),
            byte: 0,
            bits_seen: 0,
            ack_pulse_seen: false,
            bits: Vec::new(),
            driven_high_bits: 0,
        }
    }

    pub fn clk_is_high(&self) -> bool {
        self.electrical(Role::Clk)
    }

    pub fn dio_is_high(&self) -> bool {
        self.electrical(Role::Dio)
    }

    pub fn sampled_bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn driven_high_bits(&self) -> usize {
        self.driven_high_bits
    }

    /// Drain the completed transactions.
    pub fn take_transactions(&mut self) -> Vec<Transaction, 32> {
        core::mem::take(&mut self.transactions)
    }

    fn electrical(&self, role: Role) -> bool {
        let line = match role {
            Role::Clk => &self.clk,
            Role::Dio => &self.dio,
        };
        if line.driven {
            line.level
        } else if role == Role::Dio && self.pulling_dio {
            false
        } else {
            // released line, pull-up wins
            true
        }
    }

    fn line_event(&mut self, role: Role, event: Event) {
        let clk_before = self.electrical(Role::Clk);
        let dio_before = self.electrical(Role::Dio);

        {
            let line = match role {
                Role::Clk => &mut self.clk,
                Role::Dio => &mut self.dio,
            };
            match event {
                Event::SetOutput => line.driven = true,
                Event::SetInput => line.driven = false,
                Event::SetHigh => {
                    assert!(line.driven, "driving a released line high");
                    line.level = true;
                }
                Event::SetLow => {
                    assert!(line.driven, "driving a released line low");
                    line.level = false;
                }
            }
        }

        let clk_after = self.electrical(Role::Clk);
        let dio_after = self.electrical(Role::Dio);

        if !clk_before && clk_after {
            self.on_clk_rise(dio_after);
        } else if clk_before && !clk_after {
            self.on_clk_fall();
        } else if clk_before && clk_after {
            // DIO edges while CLK stays high are the framing conditions
            if dio_before && !dio_after {
                self.on_start();
            } else if !dio_before && dio_after {
                self.on_stop();
            }
        }
    }

    fn on_start(&mut self) {
        assert!(!self.in_transaction, "start inside an open transaction");
        self.in_transaction = true;
        self.current = Transaction::new();
        self.byte = 0;
        self.bits_seen = 0;
        self.ack_pulse_seen = false;
        self.pulling_dio = false;
    }

    fn on_stop(&mut self) {
        assert!(self.in_transaction, "stop outside a transaction");
        // The CLK rise inside the stop frame clocks one spurious low
        // bit before DIO rises; discard it.
        if self.bits_seen == 1 && self.byte == 0 {
            self.bits_seen = 0;
            self.bits.pop();
        }
        assert_eq!(self.bits_seen, 0, "stop in the middle of a byte");
        let finished = core::mem::take(&mut self.current);
        self.transactions
            .push(finished)
            .expect("transaction log full");
        self.in_transaction = false;
        self.pulling_dio = false;
    }

    fn on_clk_rise(&mut self, dio_level: bool) {
        if !self.in_transaction {
            return;
        }
        if self.bits_seen < 8 {
            if dio_level {
                self.byte |= 1 << self.bits_seen;
                if self.dio.driven {
                    self.driven_high_bits += 1;
                }
            }
            self.bits.push(dio_level).expect("bit log full");
            self.bits_seen += 1;
            if self.bits_seen == 8 {
                self.current.push(self.byte).expect("transaction too long");
                self.byte = 0;
            }
        } else {
            // ninth pulse: the ack window the chip answers in
            self.ack_pulse_seen = true;
        }
    }

    fn on_clk_fall(&mut self) {
        if !self.in_transaction || self.bits_seen != 8 {
            return;
        }
        if self.ack_pulse_seen {
            // ack window closed, byte complete
            self.pulling_dio = false;
            self.ack_pulse_seen = false;
            self.bits_seen = 0;
        } else {
            // first fall after the eighth bit: chip asserts its ack
            self.pulling_dio = self.ack_enabled;
        }
    }
}

#[derive(Clone, Copy)]
enum Event {
    SetOutput,
    SetInput,
    SetHigh,
    SetLow,
}

/// One driver-facing handle onto a [`ChipSim`] line.
pub struct SimLine<'a> {
    chip: &'a RefCell<ChipSim>,
    role: Role,
}

/// The CLK and DIO handles for a shared chip model.
pub fn sim_lines(chip: &RefCell<ChipSim>) -> (SimLine<'_>, SimLine<'_>) {
    (
        SimLine {
            chip,
            role: Role::Clk,
        },
        SimLine {
            chip,
            role: Role::Dio,
        },
    )
}

impl BusLine for SimLine<'_> {
    fn set_output(&mut self) {
        self.chip.borrow_mut().line_event(self.role, Event::SetOutput);
    }

    fn set_input(&mut self) {
        self.chip.borrow_mut().line_event(self.role, Event::SetInput);
    }

    fn set_high(&mut self) {
        self.chip.borrow_mut().line_event(self.role, Event::SetHigh);
    }

    fn set_low(&mut self) {
        self.chip.borrow_mut().line_event(self.role, Event::SetLow);
    }

    fn is_high(&mut self) -> bool {
        self.chip.borrow().electrical(self.role)
    }
}

/// Delay statistics recorded by [`SimDelay`].
#[derive(Default)]
pub struct DelayLog {
    pub calls: usize,
    pub min_us: u32,
    pub max_us: u32,
}

/// Delay source that records instead of waiting.
pub struct SimDelay<'a> {
    log: &'a RefCell<DelayLog>,
}

impl<'a> SimDelay<'a> {
    pub fn new(log: &'a RefCell<DelayLog>) -> Self {
        Self { log }
    }
}

impl DelayNs for SimDelay<'_> {
    fn delay_ns(&mut self, ns: u32) {
        let us = ns / 1_000;
        let mut log = self.log.borrow_mut();
        if log.calls == 0 {
            log.min_us = us;
            log.max_us = us;
        } else {
            log.min_us = log.min_us.min(us);
            log.max_us = log.max_us.max(us);
        }
        log.calls += 1;
    }
}
