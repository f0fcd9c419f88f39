//! OPL3 Duo controller
//!
//! Drives two OPL3 chips as a single 36-channel device. Channels 0-17 live on
//! unit 0 and channels 18-35 on unit 1; within a unit the first nine channels
//! use register set A1 = 0 and the next nine A1 = 1.
//!
//! Every register write goes through the shadow mirror first and then out to
//! the selected chip, so reads never touch the bus.

use std::ops::Range;
use std::sync::Arc;

use log::debug;
use parking_lot::Mutex;

use crate::address::{self, channel_address, chip_address, operator_address};
use crate::config::DuoConfig;
use crate::hal::{Delay, OutputPin, PinLevel, Transport};
use crate::registers::{
    ChannelFlags, ChannelRegister, ChipRegister, NewModeFlags, Operator, OperatorRegister,
    SynthUnit, TOTAL_CHANNELS,
};
use crate::shadow::{RegisterSnapshot, ShadowRegisters};
use crate::writer::DualChipWriter;
use crate::Result;

/// Controller lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuoState {
    /// Pins and transport not yet set up
    Uninitialized,
    /// `begin()` completed
    Ready,
}

/// A controller behind a mutex, for callers that share the device.
///
/// Hold the lock for a whole operation; selector changes and writes from
/// different threads must never interleave.
pub type SharedDuo<T, S, R, D> = Arc<Mutex<Opl3Duo<T, S, R, D>>>;

/// Two OPL3 chips on one bus, addressed as one device.
#[derive(Debug)]
pub struct Opl3Duo<T, S, R, D> {
    writer: DualChipWriter<T, S>,
    reset_pin: R,
    delay: D,
    shadow: ShadowRegisters,
    config: DuoConfig,
    state: DuoState,
}

impl<T, S, R, D> Opl3Duo<T, S, R, D>
where
    T: Transport,
    S: OutputPin,
    R: OutputPin,
    D: Delay,
{
    /// Create a controller with the default configuration.
    ///
    /// Nothing is sent to the hardware until [`Opl3Duo::begin`].
    pub fn new(transport: T, selector: S, reset_pin: R, delay: D) -> Self {
        Self {
            writer: DualChipWriter::new(transport, selector),
            reset_pin,
            delay,
            shadow: ShadowRegisters::new(),
            config: DuoConfig::default(),
            state: DuoState::Uninitialized,
        }
    }

    /// Create a controller with a validated configuration.
    pub fn with_config(
        config: DuoConfig,
        transport: T,
        selector: S,
        reset_pin: R,
        delay: D,
    ) -> Result<Self> {
        config.validate()?;
        let mut duo = Self::new(transport, selector, reset_pin, delay);
        duo.config = config;
        Ok(duo)
    }

    /// Drive the selector low, set up the transport and hard reset both chips.
    pub fn begin(&mut self) {
        debug!("OPL3 Duo begin ({:?})", self.config);
        self.writer.begin();
        self.reset();
        self.state = DuoState::Ready;
    }

    /// Hard reset both chips and zero every register.
    ///
    /// Each unit receives a reset pulse, then all chip-wide, channel and
    /// operator registers are written with 0x00 through the normal write
    /// path so that mirror and hardware agree. The selector is left on
    /// unit 0.
    pub fn reset(&mut self) {
        debug!(
            "OPL3 Duo hard reset (pulse {} ms)",
            self.config.reset_pulse_ms
        );
        for unit in SynthUnit::ALL {
            self.writer.select(unit);
            self.reset_pin.set_level(PinLevel::Low);
            self.delay.delay_ms(self.config.reset_pulse_ms);
            self.reset_pin.set_level(PinLevel::High);
        }

        self.shadow.clear();

        for unit in SynthUnit::ALL {
            for reg in ChipRegister::ALL {
                self.set_chip_register(unit, reg, 0x00);
            }
        }

        for channel in 0..TOTAL_CHANNELS {
            for base in ChannelRegister::ALL {
                self.set_channel_register(base, channel, 0x00);
            }
            for op in Operator::ALL {
                for base in OperatorRegister::ALL {
                    self.set_operator_register(base, channel, op, 0x00);
                }
            }
        }

        self.writer.select(SynthUnit::Unit0);
    }

    /// Lifecycle state.
    pub fn state(&self) -> DuoState {
        self.state
    }

    /// Active configuration.
    pub fn config(&self) -> &DuoConfig {
        &self.config
    }

    /// Number of logical channels (36).
    pub fn channel_count(&self) -> u8 {
        TOTAL_CHANNELS
    }

    /// Logical channels served by `unit`.
    pub fn channels_of(&self, unit: SynthUnit) -> Range<u8> {
        address::channels_of(unit)
    }

    /// Read a chip-wide register from the mirror.
    pub fn chip_register(&self, unit: SynthUnit, reg: ChipRegister) -> u8 {
        self.shadow.chip(unit, reg)
    }

    /// Write a chip-wide register on one unit.
    pub fn set_chip_register(&mut self, unit: SynthUnit, reg: ChipRegister, value: u8) {
        self.shadow.set_chip(unit, reg, value);
        self.writer.write_physical(chip_address(unit, reg, value));
    }

    /// Read a channel register from the mirror.
    pub fn channel_register(&self, base: ChannelRegister, channel: u8) -> u8 {
        self.shadow.channel(base, channel)
    }

    /// Write a channel register.
    ///
    /// # Arguments
    ///
    /// * `base` - Base register
    /// * `channel` - Logical channel [0, 35]
    /// * `value` - Register value
    pub fn set_channel_register(&mut self, base: ChannelRegister, channel: u8, value: u8) {
        self.shadow.set_channel(base, channel, value);
        self.writer
            .write_physical(channel_address(base, channel, value));
    }

    /// Read an operator register from the mirror.
    pub fn operator_register(&self, base: OperatorRegister, channel: u8, op: Operator) -> u8 {
        self.shadow.operator(base, channel, op)
    }

    /// Write an operator register of a channel.
    ///
    /// # Arguments
    ///
    /// * `base` - Base register
    /// * `channel` - Logical channel [0, 35]
    /// * `op` - Operator of the channel
    /// * `value` - Register value
    pub fn set_operator_register(
        &mut self,
        base: OperatorRegister,
        channel: u8,
        op: Operator,
        value: u8,
    ) {
        self.shadow.set_operator(base, channel, op, value);
        self.writer
            .write_physical(operator_address(base, channel, op, value));
    }

    /// Whether OPL3 mode is enabled on `unit`.
    pub fn is_opl3_enabled_on(&self, unit: SynthUnit) -> bool {
        NewModeFlags::from_bits_truncate(self.chip_register(unit, ChipRegister::NewMode))
            .contains(NewModeFlags::OPL3)
    }

    /// Whether OPL3 mode is enabled on both units.
    pub fn is_opl3_enabled(&self) -> bool {
        SynthUnit::ALL
            .iter()
            .all(|&unit| self.is_opl3_enabled_on(unit))
    }

    /// Enable or disable OPL3 mode on both units.
    ///
    /// Also sets panning of every channel to `enable` on both sides, so that
    /// entering OPL3 mode makes all channels audible on left and right.
    pub fn set_opl3_enabled(&mut self, enable: bool) {
        for unit in SynthUnit::ALL {
            self.write_new_mode(unit, enable);
        }
        for channel in 0..TOTAL_CHANNELS {
            self.set_panning(channel, enable, enable);
        }
    }

    /// Enable or disable OPL3 mode on one unit.
    ///
    /// Panning of the unit's 18 channels follows `enable` on both sides.
    pub fn set_opl3_enabled_on(&mut self, unit: SynthUnit, enable: bool) {
        self.write_new_mode(unit, enable);
        for channel in address::channels_of(unit) {
            self.set_panning(channel, enable, enable);
        }
    }

    fn write_new_mode(&mut self, unit: SynthUnit, enable: bool) {
        debug!(
            "OPL3 mode {} on {unit}",
            if enable { "enabled" } else { "disabled" }
        );
        let flags = if enable {
            NewModeFlags::OPL3
        } else {
            NewModeFlags::empty()
        };
        self.set_chip_register(unit, ChipRegister::NewMode, flags.bits());
    }

    /// Left and right output enables of a channel.
    pub fn panning(&self, channel: u8) -> (bool, bool) {
        let flags = ChannelFlags::from_bits_retain(
            self.channel_register(ChannelRegister::FeedbackSynth, channel),
        );
        (
            flags.contains(ChannelFlags::PAN_LEFT),
            flags.contains(ChannelFlags::PAN_RIGHT),
        )
    }

    /// Set the left and right output enables of a channel, keeping the
    /// feedback and synthesis bits of register 0xC0.
    pub fn set_panning(&mut self, channel: u8, left: bool, right: bool) {
        let mut flags = ChannelFlags::from_bits_retain(
            self.channel_register(ChannelRegister::FeedbackSynth, channel),
        );
        flags.remove(ChannelFlags::PAN_MASK);
        flags.insert(ChannelFlags::panning(left, right));
        self.set_channel_register(ChannelRegister::FeedbackSynth, channel, flags.bits());
    }

    /// Unit the selector currently points at.
    pub fn selected_unit(&self) -> SynthUnit {
        self.writer.selected()
    }

    /// The shadow mirror.
    pub fn shadow(&self) -> &ShadowRegisters {
        &self.shadow
    }

    /// Serializable copy of the mirror.
    pub fn snapshot(&self) -> RegisterSnapshot {
        self.shadow.snapshot()
    }

    /// Borrow the transport.
    pub fn transport(&self) -> &T {
        self.writer.transport()
    }

    /// Wrap the controller for shared use.
    pub fn into_shared(self) -> SharedDuo<T, S, R, D> {
        Arc::new(Mutex::new(self))
    }
}
