//! Selector-aware bus writer
//!
//! Two chips share one bus. The selector line picks the chip (low = unit 0,
//! high = unit 1) and must be settled before the transport write starts.
//! This is the only place that drives the selector or calls the transport.

use log::trace;

use crate::address::{physical_unit, PhysicalAddress};
use crate::hal::{OutputPin, PinLevel, Transport};
use crate::registers::SynthUnit;

/// Writes to either chip of the duo through a shared transport.
#[derive(Debug)]
pub struct DualChipWriter<T, P> {
    transport: T,
    selector: P,
    selected: SynthUnit,
}

impl<T: Transport, P: OutputPin> DualChipWriter<T, P> {
    /// Wrap a transport and the selector output.
    pub fn new(transport: T, selector: P) -> Self {
        Self {
            transport,
            selector,
            selected: SynthUnit::Unit0,
        }
    }

    /// Drive the selector low, then set up the transport.
    pub fn begin(&mut self) {
        self.select(SynthUnit::Unit0);
        self.transport.begin();
    }

    /// Point the selector line at `unit`.
    pub fn select(&mut self, unit: SynthUnit) {
        self.selector
            .set_level(PinLevel::from_bool(unit == SynthUnit::Unit1));
        self.selected = unit;
    }

    /// Unit the selector currently points at.
    pub fn selected(&self) -> SynthUnit {
        self.selected
    }

    /// Write `value` to `reg` in the combined 2-bit `bank`.
    ///
    /// Bank bit 1 selects the chip, bank bit 0 is passed to the transport as
    /// the chip's own A1 line.
    pub fn write(&mut self, bank: u8, reg: u8, value: u8) {
        self.write_physical(PhysicalAddress::new(bank, reg, value));
    }

    /// Perform a resolved physical write.
    pub fn write_physical(&mut self, addr: PhysicalAddress) {
        debug_assert_eq!(addr.unit, physical_unit(addr.bank));
        trace!(
            "write {} bank {} reg 0x{:02X} = 0x{:02X}",
            addr.unit,
            addr.chip_bank(),
            addr.register,
            addr.value
        );
        self.select(addr.unit);
        self.transport
            .write(addr.chip_bank(), addr.register, addr.value);
    }

    /// Borrow the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Release the transport and selector.
    pub fn into_parts(self) -> (T, P) {
        (self.transport, self.selector)
    }
}
