//! Hardware collaborator traits
//!
//! The duo never talks to a bus directly. It is handed a [`Transport`] that
//! performs one register write on the currently selected chip, plus two
//! digital outputs (selector and reset) and a blocking [`Delay`].
//!
//! # Example
//!
//! ```
//! use opl3_duo::hal::{OutputPin, PinLevel, Transport};
//!
//! struct Spi;
//!
//! impl Transport for Spi {
//!     fn write(&mut self, bank: u8, register: u8, value: u8) {
//!         // latch A1 = bank, A0 = register, then data = value
//!         let _ = (bank, register, value);
//!     }
//! }
//!
//! struct Gpio(bool);
//!
//! impl OutputPin for Gpio {
//!     fn set_level(&mut self, level: PinLevel) {
//!         self.0 = level.is_high();
//!     }
//! }
//! ```

use std::time::Duration;

/// Logic level of a digital output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PinLevel {
    /// Driven low
    Low,
    /// Driven high
    High,
}

impl PinLevel {
    /// `High` for `true`, `Low` for `false`.
    pub fn from_bool(high: bool) -> Self {
        if high { PinLevel::High } else { PinLevel::Low }
    }

    /// True when driven high.
    pub fn is_high(self) -> bool {
        self == PinLevel::High
    }
}

/// Synchronous register write on the selected OPL3 chip.
///
/// Writes are assumed to always succeed.
pub trait Transport {
    /// Prepare the bus (SPI, latches, address lines). Default is a no-op.
    fn begin(&mut self) {}

    /// Write to a register of the selected chip.
    ///
    /// # Arguments
    ///
    /// * `bank` - Within-chip register set (A1), 0 or 1
    /// * `register` - Register byte
    /// * `value` - Register value
    fn write(&mut self, bank: u8, register: u8, value: u8);
}

/// Digital output line.
pub trait OutputPin {
    /// Drive the line to `level`. Returns once the level is settled.
    fn set_level(&mut self, level: PinLevel);
}

/// Blocking sleep used for reset pulse timing.
pub trait Delay {
    /// Block for at least `ms` milliseconds.
    fn delay_ms(&mut self, ms: u32);
}

/// [`Delay`] backed by `std::thread::sleep`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdDelay;

impl Delay for StdDelay {
    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(Duration::from_millis(ms as u64));
    }
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn begin(&mut self) {
        (**self).begin();
    }

    fn write(&mut self, bank: u8, register: u8, value: u8) {
        (**self).write(bank, register, value);
    }
}

impl<P: OutputPin + ?Sized> OutputPin for &mut P {
    fn set_level(&mut self, level: PinLevel) {
        (**self).set_level(level);
    }
}

impl<D: Delay + ?Sized> Delay for &mut D {
    fn delay_ms(&mut self, ms: u32) {
        (**self).delay_ms(ms);
    }
}
