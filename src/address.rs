//! Logical to physical address arithmetic
//!
//! Pure functions that turn (unit, channel, operator, base register) tuples
//! into the dense mirror offsets and the (bank, register) pairs the bus
//! expects. Nothing here touches hardware or mirror storage.
//!
//! # Banks
//!
//! A bank is the 2-bit value `A1 | unit << 1`:
//!
//! | bank | unit | A1 | logical channels |
//! |------|------|----|------------------|
//! | 0    | 0    | 0  | 0..9             |
//! | 1    | 0    | 1  | 9..18            |
//! | 2    | 1    | 0  | 18..27           |
//! | 3    | 1    | 1  | 27..36           |

use std::ops::Range;

use crate::registers::{
    ChannelRegister, ChipRegister, Operator, OperatorRegister, SynthUnit, CHANNELS_PER_BANK,
    CHANNELS_PER_UNIT, TOTAL_CHANNELS,
};

/// Mirror bytes per unit for chip-wide registers.
pub const CHIP_REGISTERS_PER_UNIT: usize = ChipRegister::ALL.len();
/// Mirror bytes per channel for channel registers.
pub const REGISTERS_PER_CHANNEL: usize = ChannelRegister::ALL.len();
/// Mirror bytes per operator.
pub const REGISTERS_PER_OPERATOR: usize = OperatorRegister::ALL.len();
/// Mirror bytes per channel for operator registers (two operators).
pub const OPERATOR_REGISTERS_PER_CHANNEL: usize = REGISTERS_PER_OPERATOR * 2;

/// Register offset of each operator slot within one bank.
///
/// Operators are interleaved in groups of three, so channel `n` does not
/// simply sit at `base + n`.
const OPERATOR_OFFSETS: [[u8; CHANNELS_PER_BANK as usize]; 2] = [
    [0x00, 0x01, 0x02, 0x08, 0x09, 0x0A, 0x10, 0x11, 0x12],
    [0x03, 0x04, 0x05, 0x0B, 0x0C, 0x0D, 0x13, 0x14, 0x15],
];

/// A fully resolved bus write. Derived on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PhysicalAddress {
    /// Chip the selector line must point at
    pub unit: SynthUnit,
    /// Combined 2-bit bank (`A1 | unit << 1`)
    pub bank: u8,
    /// Register byte within the bank
    pub register: u8,
    /// Value to write
    pub value: u8,
}

impl PhysicalAddress {
    /// Build from a combined bank; the unit is derived from bank bit 1.
    pub fn new(bank: u8, register: u8, value: u8) -> Self {
        let bank = bank & 0x03;
        Self {
            unit: physical_unit(bank),
            bank,
            register,
            value,
        }
    }

    /// The within-chip A1 bit handed to the transport.
    pub fn chip_bank(&self) -> u8 {
        self.bank & 0x01
    }
}

/// Dense offset of a chip-wide register within one unit's slot.
#[inline]
pub fn chip_offset(reg: ChipRegister) -> usize {
    reg.position()
}

/// Dense offset of a chip-wide register across both units.
#[inline]
pub fn chip_mirror_offset(unit: SynthUnit, reg: ChipRegister) -> usize {
    unit.index() * CHIP_REGISTERS_PER_UNIT + chip_offset(reg)
}

/// Dense offset of a channel register: `channel * 3 + position(base)`.
#[inline]
pub fn channel_offset(base: ChannelRegister, channel: u8) -> usize {
    debug_assert_channel(channel);
    channel as usize * REGISTERS_PER_CHANNEL + base.position()
}

/// Dense offset of an operator register: `channel * 10 + op * 5 + position(base)`.
#[inline]
pub fn operator_offset(base: OperatorRegister, channel: u8, op: Operator) -> usize {
    debug_assert_channel(channel);
    channel as usize * OPERATOR_REGISTERS_PER_CHANNEL
        + op.index() * REGISTERS_PER_OPERATOR
        + base.position()
}

/// Bank and physical register byte for a logical channel.
///
/// With `op == None` the register is `base + channel % 9`; with an operator
/// the intra-bank operator offset table is used instead.
#[inline]
pub fn bank_and_register(base: u8, channel: u8, op: Option<Operator>) -> (u8, u8) {
    debug_assert_channel(channel);
    let bank = (channel / CHANNELS_PER_BANK) & 0x03;
    let slot = channel % CHANNELS_PER_BANK;
    let offset = match op {
        None => slot,
        Some(op) => OPERATOR_OFFSETS[op.index()][slot as usize],
    };
    (bank, base.wrapping_add(offset))
}

/// Physical write for a chip-wide register on a given unit.
#[inline]
pub fn chip_bank(unit: SynthUnit, reg: ChipRegister) -> u8 {
    (((reg.addr() >> 8) & 0x01) as u8) | ((unit.index() as u8) << 1)
}

/// Resolve a chip-wide register write.
pub fn chip_address(unit: SynthUnit, reg: ChipRegister, value: u8) -> PhysicalAddress {
    PhysicalAddress::new(chip_bank(unit, reg), (reg.addr() & 0xFF) as u8, value)
}

/// Resolve a channel register write.
pub fn channel_address(base: ChannelRegister, channel: u8, value: u8) -> PhysicalAddress {
    let (bank, register) = bank_and_register(base.addr(), channel, None);
    PhysicalAddress::new(bank, register, value)
}

/// Resolve an operator register write.
pub fn operator_address(
    base: OperatorRegister,
    channel: u8,
    op: Operator,
    value: u8,
) -> PhysicalAddress {
    let (bank, register) = bank_and_register(base.addr(), channel, Some(op));
    PhysicalAddress::new(bank, register, value)
}

/// Physical chip owning a bank (bit 1 of the bank).
#[inline]
pub fn physical_unit(bank: u8) -> SynthUnit {
    SynthUnit::from_index((bank >> 1) & 0x01)
}

/// Logical channels served by one physical chip.
#[inline]
pub fn channels_of(unit: SynthUnit) -> Range<u8> {
    let first = unit.index() as u8 * CHANNELS_PER_UNIT;
    first..first + CHANNELS_PER_UNIT
}

#[inline]
fn debug_assert_channel(channel: u8) {
    debug_assert!(
        channel < TOTAL_CHANNELS,
        "channel {channel} out of range (0..{TOTAL_CHANNELS})"
    );
}
