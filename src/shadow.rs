//! Shadow registers
//!
//! OPL3 registers are write-only, so every value sent to the chips is kept
//! here for read-back. Only the 478 valid register bytes of the two chips are
//! stored, in three dense mirrors addressed through [`crate::address`].

use serde::{Deserialize, Serialize};

use crate::address::{
    channel_offset, chip_mirror_offset, operator_offset, CHIP_REGISTERS_PER_UNIT,
    OPERATOR_REGISTERS_PER_CHANNEL, REGISTERS_PER_CHANNEL,
};
use crate::registers::{
    ChannelRegister, ChipRegister, Operator, OperatorRegister, SynthUnit, TOTAL_CHANNELS,
    UNIT_COUNT,
};

const CHIP_MIRROR_SIZE: usize = CHIP_REGISTERS_PER_UNIT * UNIT_COUNT;
const CHANNEL_MIRROR_SIZE: usize = REGISTERS_PER_CHANNEL * TOTAL_CHANNELS as usize;
const OPERATOR_MIRROR_SIZE: usize = OPERATOR_REGISTERS_PER_CHANNEL * TOTAL_CHANNELS as usize;

/// Mirror of every chip-wide, channel and operator register of both chips.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShadowRegisters {
    chip: [u8; CHIP_MIRROR_SIZE],
    channel: [u8; CHANNEL_MIRROR_SIZE],
    operator: [u8; OPERATOR_MIRROR_SIZE],
}

impl ShadowRegisters {
    /// Create a mirror with every register at 0x00.
    pub fn new() -> Self {
        Self {
            chip: [0; CHIP_MIRROR_SIZE],
            channel: [0; CHANNEL_MIRROR_SIZE],
            operator: [0; OPERATOR_MIRROR_SIZE],
        }
    }

    /// Total number of mirrored register bytes.
    pub const SIZE: usize = CHIP_MIRROR_SIZE + CHANNEL_MIRROR_SIZE + OPERATOR_MIRROR_SIZE;

    /// Read a chip-wide register.
    #[inline]
    pub fn chip(&self, unit: SynthUnit, reg: ChipRegister) -> u8 {
        self.chip[chip_mirror_offset(unit, reg)]
    }

    /// Store a chip-wide register.
    #[inline]
    pub fn set_chip(&mut self, unit: SynthUnit, reg: ChipRegister, value: u8) {
        self.chip[chip_mirror_offset(unit, reg)] = value;
    }

    /// Read a channel register.
    #[inline]
    pub fn channel(&self, base: ChannelRegister, channel: u8) -> u8 {
        self.channel[channel_offset(base, channel)]
    }

    /// Store a channel register.
    #[inline]
    pub fn set_channel(&mut self, base: ChannelRegister, channel: u8, value: u8) {
        self.channel[channel_offset(base, channel)] = value;
    }

    /// Read an operator register.
    #[inline]
    pub fn operator(&self, base: OperatorRegister, channel: u8, op: Operator) -> u8 {
        self.operator[operator_offset(base, channel, op)]
    }

    /// Store an operator register.
    #[inline]
    pub fn set_operator(&mut self, base: OperatorRegister, channel: u8, op: Operator, value: u8) {
        self.operator[operator_offset(base, channel, op)] = value;
    }

    /// Reset every mirrored register to 0x00.
    pub fn clear(&mut self) {
        self.chip.fill(0);
        self.channel.fill(0);
        self.operator.fill(0);
    }

    /// True when no register holds a non-zero value.
    pub fn is_zeroed(&self) -> bool {
        self.chip
            .iter()
            .chain(self.channel.iter())
            .chain(self.operator.iter())
            .all(|&b| b == 0)
    }

    /// Copy the mirror into a serializable snapshot.
    pub fn snapshot(&self) -> RegisterSnapshot {
        RegisterSnapshot {
            chip: self.chip.to_vec(),
            channel: self.channel.to_vec(),
            operator: self.operator.to_vec(),
        }
    }
}

impl Default for ShadowRegisters {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializable dump of the three mirrors, in mirror order.
///
/// - `chip`: 5 bytes per unit (0x001, 0x104, 0x105, 0x008, 0x0BD)
/// - `channel`: 3 bytes per channel (0xA0, 0xB0, 0xC0)
/// - `operator`: 10 bytes per channel, operator 1 then operator 2
///   (0x20, 0x40, 0x60, 0x80, 0xE0)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterSnapshot {
    /// Chip-wide registers of both units
    pub chip: Vec<u8>,
    /// Channel registers of all 36 channels
    pub channel: Vec<u8>,
    /// Operator registers of all 72 operators
    pub operator: Vec<u8>,
}

impl RegisterSnapshot {
    /// Encode as JSON.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
