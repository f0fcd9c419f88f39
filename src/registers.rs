//! OPL3 Register Definitions
//!
//! The YMF262 exposes three families of registers that survive in the shadow
//! store: five chip-wide registers, three per-channel registers and five
//! per-operator registers. Each family is an enum so that an unrecognized
//! base address cannot be expressed through the typed API.

use std::fmt;

use bitflags::bitflags;

use crate::Opl3DuoError;

/// Number of physical OPL3 chips driven by the duo.
pub const UNIT_COUNT: usize = 2;
/// Channels addressable in one OPL3 bank (A1 = 0 or A1 = 1).
pub const CHANNELS_PER_BANK: u8 = 9;
/// Banks per physical chip.
pub const BANKS_PER_UNIT: u8 = 2;
/// Channels provided by one physical chip.
pub const CHANNELS_PER_UNIT: u8 = CHANNELS_PER_BANK * BANKS_PER_UNIT;
/// Channels in the unified address space.
pub const TOTAL_CHANNELS: u8 = CHANNELS_PER_UNIT * UNIT_COUNT as u8;

/// One of the two physical chips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SynthUnit {
    /// Chip selected while the selector line is low
    Unit0 = 0,
    /// Chip selected while the selector line is high
    Unit1 = 1,
}

impl SynthUnit {
    /// Both units in selection order.
    pub const ALL: [SynthUnit; UNIT_COUNT] = [SynthUnit::Unit0, SynthUnit::Unit1];

    /// Lenient conversion that only looks at bit 0, as the hardware does.
    pub fn from_index(index: u8) -> Self {
        if index & 0x01 == 0 {
            SynthUnit::Unit0
        } else {
            SynthUnit::Unit1
        }
    }

    /// Unit number (0 or 1).
    pub fn index(self) -> usize {
        self as usize
    }
}

impl TryFrom<u8> for SynthUnit {
    type Error = Opl3DuoError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(SynthUnit::Unit0),
            1 => Ok(SynthUnit::Unit1),
            other => Err(Opl3DuoError::InvalidSynthUnit(other)),
        }
    }
}

impl fmt::Display for SynthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unit {}", self.index())
    }
}

/// Operator within a two-operator channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operator {
    /// Modulator
    Operator1 = 0,
    /// Carrier
    Operator2 = 1,
}

impl Operator {
    /// Both operators of a channel.
    pub const ALL: [Operator; 2] = [Operator::Operator1, Operator::Operator2];

    /// Operator number (0 or 1).
    pub fn index(self) -> usize {
        self as usize
    }
}

impl TryFrom<u8> for Operator {
    type Error = Opl3DuoError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Operator::Operator1),
            1 => Ok(Operator::Operator2),
            other => Err(Opl3DuoError::InvalidOperator(other)),
        }
    }
}

/// Chip-wide registers, addressed with the 9-bit (A1:A7..A0) address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChipRegister {
    /// Test / waveform select enable - 0x001
    WaveformSelect = 0x001,
    /// 4-operator connection select - 0x104
    FourOpConnection = 0x104,
    /// OPL3 mode ("NEW") - 0x105
    NewMode = 0x105,
    /// CSM / keyboard split note select - 0x008
    NoteSelect = 0x008,
    /// Tremolo and vibrato depth, rhythm mode - 0x0BD
    Rhythm = 0x0BD,
}

impl ChipRegister {
    /// All chip-wide registers in mirror order.
    pub const ALL: [ChipRegister; 5] = [
        ChipRegister::WaveformSelect,
        ChipRegister::FourOpConnection,
        ChipRegister::NewMode,
        ChipRegister::NoteSelect,
        ChipRegister::Rhythm,
    ];

    /// Convert a 9-bit register address to a chip-wide register.
    pub fn from_addr(addr: u16) -> Option<Self> {
        match addr {
            0x001 => Some(ChipRegister::WaveformSelect),
            0x104 => Some(ChipRegister::FourOpConnection),
            0x105 => Some(ChipRegister::NewMode),
            0x008 => Some(ChipRegister::NoteSelect),
            0x0BD => Some(ChipRegister::Rhythm),
            _ => None,
        }
    }

    /// 9-bit register address.
    pub fn addr(self) -> u16 {
        self as u16
    }

    /// Dense position in the chip-wide mirror.
    pub fn position(self) -> usize {
        match self {
            ChipRegister::WaveformSelect => 0,
            ChipRegister::FourOpConnection => 1,
            ChipRegister::NewMode => 2,
            ChipRegister::NoteSelect => 3,
            ChipRegister::Rhythm => 4,
        }
    }
}

impl TryFrom<u16> for ChipRegister {
    type Error = Opl3DuoError;

    fn try_from(addr: u16) -> Result<Self, Self::Error> {
        Self::from_addr(addr).ok_or(Opl3DuoError::UnknownRegister(addr))
    }
}

/// Per-channel base registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelRegister {
    /// F-number low byte - 0xA0
    FNumberLow = 0xA0,
    /// Key on, block, F-number high bits - 0xB0
    KeyOnBlock = 0xB0,
    /// Panning, feedback, synthesis type - 0xC0
    FeedbackSynth = 0xC0,
}

impl ChannelRegister {
    /// All channel registers in mirror order.
    pub const ALL: [ChannelRegister; 3] = [
        ChannelRegister::FNumberLow,
        ChannelRegister::KeyOnBlock,
        ChannelRegister::FeedbackSynth,
    ];

    /// Convert a base register address to a channel register.
    pub fn from_addr(addr: u8) -> Option<Self> {
        match addr {
            0xA0 => Some(ChannelRegister::FNumberLow),
            0xB0 => Some(ChannelRegister::KeyOnBlock),
            0xC0 => Some(ChannelRegister::FeedbackSynth),
            _ => None,
        }
    }

    /// Base register address.
    pub fn addr(self) -> u8 {
        self as u8
    }

    /// Dense position within one channel's mirror slot.
    pub fn position(self) -> usize {
        match self {
            ChannelRegister::FNumberLow => 0,
            ChannelRegister::KeyOnBlock => 1,
            ChannelRegister::FeedbackSynth => 2,
        }
    }
}

impl TryFrom<u8> for ChannelRegister {
    type Error = Opl3DuoError;

    fn try_from(addr: u8) -> Result<Self, Self::Error> {
        Self::from_addr(addr).ok_or(Opl3DuoError::UnknownRegister(addr as u16))
    }
}

/// Per-operator base registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorRegister {
    /// Tremolo, vibrato, sustain, KSR, frequency multiplier - 0x20
    Characteristic = 0x20,
    /// Key scale level, output level - 0x40
    Levels = 0x40,
    /// Attack and decay rates - 0x60
    AttackDecay = 0x60,
    /// Sustain level and release rate - 0x80
    SustainRelease = 0x80,
    /// Waveform select - 0xE0
    Waveform = 0xE0,
}

impl OperatorRegister {
    /// All operator registers in mirror order.
    pub const ALL: [OperatorRegister; 5] = [
        OperatorRegister::Characteristic,
        OperatorRegister::Levels,
        OperatorRegister::AttackDecay,
        OperatorRegister::SustainRelease,
        OperatorRegister::Waveform,
    ];

    /// Convert a base register address to an operator register.
    pub fn from_addr(addr: u8) -> Option<Self> {
        match addr {
            0x20 => Some(OperatorRegister::Characteristic),
            0x40 => Some(OperatorRegister::Levels),
            0x60 => Some(OperatorRegister::AttackDecay),
            0x80 => Some(OperatorRegister::SustainRelease),
            0xE0 => Some(OperatorRegister::Waveform),
            _ => None,
        }
    }

    /// Base register address.
    pub fn addr(self) -> u8 {
        self as u8
    }

    /// Dense position within one operator's mirror slot.
    pub fn position(self) -> usize {
        match self {
            OperatorRegister::Characteristic => 0,
            OperatorRegister::Levels => 1,
            OperatorRegister::AttackDecay => 2,
            OperatorRegister::SustainRelease => 3,
            OperatorRegister::Waveform => 4,
        }
    }
}

impl TryFrom<u8> for OperatorRegister {
    type Error = Opl3DuoError;

    fn try_from(addr: u8) -> Result<Self, Self::Error> {
        Self::from_addr(addr).ok_or(Opl3DuoError::UnknownRegister(addr as u16))
    }
}

impl fmt::Display for ChipRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChipRegister::WaveformSelect => write!(f, "0x001 (Waveform Select Enable)"),
            ChipRegister::FourOpConnection => write!(f, "0x104 (4-OP Connection Select)"),
            ChipRegister::NewMode => write!(f, "0x105 (OPL3 Mode)"),
            ChipRegister::NoteSelect => write!(f, "0x008 (CSM / Note Select)"),
            ChipRegister::Rhythm => write!(f, "0x0BD (Depth / Rhythm)"),
        }
    }
}

impl fmt::Display for ChannelRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelRegister::FNumberLow => write!(f, "0xA0 (F-Number Low)"),
            ChannelRegister::KeyOnBlock => write!(f, "0xB0 (Key On / Block)"),
            ChannelRegister::FeedbackSynth => write!(f, "0xC0 (Panning / Feedback)"),
        }
    }
}

impl fmt::Display for OperatorRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperatorRegister::Characteristic => write!(f, "0x20 (Characteristic)"),
            OperatorRegister::Levels => write!(f, "0x40 (Key Scale / Output Level)"),
            OperatorRegister::AttackDecay => write!(f, "0x60 (Attack / Decay)"),
            OperatorRegister::SustainRelease => write!(f, "0x80 (Sustain / Release)"),
            OperatorRegister::Waveform => write!(f, "0xE0 (Waveform)"),
        }
    }
}

bitflags! {
    /// Channel register 0xC0 bitflags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ChannelFlags: u8 {
        /// Additive synthesis (1) instead of FM (0)
        const SYNTH_ADDITIVE = 0x01;
        /// Left speaker output
        const PAN_LEFT = 0x10;
        /// Right speaker output
        const PAN_RIGHT = 0x20;
    }
}

impl ChannelFlags {
    /// Both panning bits.
    pub const PAN_MASK: ChannelFlags = ChannelFlags::PAN_LEFT.union(ChannelFlags::PAN_RIGHT);

    /// Panning bits for the given speaker selection.
    pub fn panning(left: bool, right: bool) -> Self {
        let mut flags = ChannelFlags::empty();
        flags.set(ChannelFlags::PAN_LEFT, left);
        flags.set(ChannelFlags::PAN_RIGHT, right);
        flags
    }
}

bitflags! {
    /// Chip register 0x105 bitflags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct NewModeFlags: u8 {
        /// OPL3 extended mode
        const OPL3 = 0x01;
    }
}
