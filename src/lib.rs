//! Dual OPL3 (YMF262) driver core
//!
//! Drives two OPL3 FM chips that share one control bus as a single logical
//! device with 36 two-operator channels. A selector line picks the physical
//! chip before every bus write, and an in-memory mirror of all valid
//! registers provides read-back on this write-only chip family.
//!
//! # Features
//! - Unified channel numbering: channels 0-17 on unit 0, 18-35 on unit 1
//! - Shadow registers for all 478 valid register bytes of both chips
//! - Selector-then-write ordering on a shared bus
//! - Hard reset sequencing and OPL3 mode control with panning defaults
//! - Hardware access through small traits ([`hal::Transport`],
//!   [`hal::OutputPin`], [`hal::Delay`]) plus a recording backend for dry
//!   runs
//!
//! # Quick start
//! ```
//! use opl3_duo::recorder::BusRecorder;
//! use opl3_duo::{ChannelRegister, Opl3Duo, Operator, OperatorRegister, SynthUnit};
//!
//! let bus = BusRecorder::new();
//! let mut duo = Opl3Duo::new(bus.transport(), bus.selector_pin(), bus.reset_pin(), bus.delay());
//! duo.begin();
//! duo.set_opl3_enabled(true);
//!
//! // Channel 20 lives on the second chip
//! duo.set_operator_register(OperatorRegister::Levels, 20, Operator::Operator2, 0x10);
//! duo.set_channel_register(ChannelRegister::FNumberLow, 20, 0x98);
//! assert_eq!(duo.channel_register(ChannelRegister::FNumberLow, 20), 0x98);
//! assert!(duo.is_opl3_enabled_on(SynthUnit::Unit1));
//! ```

#![warn(missing_docs)]

pub mod address; // Logical -> physical address arithmetic
pub mod config; // Board wiring and reset timing
pub mod duo; // Controller
pub mod hal; // Hardware collaborator traits
pub mod recorder; // Recording backend
pub mod registers; // Register enums and flags
pub mod shadow; // Register mirror
pub mod writer; // Selector-aware bus writer

/// Error types for OPL3 Duo operations
///
/// Register writes themselves cannot fail; errors come from decoding raw
/// numbers into typed addresses and from configuration.
#[derive(thiserror::Error, Debug)]
pub enum Opl3DuoError {
    /// Register address is not one of the mirrored registers
    #[error("Unknown register: 0x{0:03X}")]
    UnknownRegister(u16),

    /// Synth unit outside [0, 1]
    #[error("Invalid synth unit: {0}")]
    InvalidSynthUnit(u8),

    /// Operator outside [0, 1]
    #[error("Invalid operator: {0}")]
    InvalidOperator(u8),

    /// Channel outside the logical channel range
    #[error("Invalid channel {channel} (total channels: {total})")]
    InvalidChannel {
        /// Requested channel
        channel: u8,
        /// Number of logical channels
        total: u8,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Configuration or snapshot JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for OPL3 Duo operations
pub type Result<T> = std::result::Result<T, Opl3DuoError>;

/// Check a raw logical channel number.
///
/// # Examples
///
/// ```
/// use opl3_duo::checked_channel;
///
/// assert_eq!(checked_channel(35).unwrap(), 35);
/// assert!(checked_channel(36).is_err());
/// ```
pub fn checked_channel(channel: u8) -> Result<u8> {
    if channel < registers::TOTAL_CHANNELS {
        Ok(channel)
    } else {
        Err(Opl3DuoError::InvalidChannel {
            channel,
            total: registers::TOTAL_CHANNELS,
        })
    }
}

// Public API exports
pub use config::DuoConfig;
pub use duo::{DuoState, Opl3Duo, SharedDuo};
pub use registers::{
    ChannelFlags, ChannelRegister, ChipRegister, NewModeFlags, Operator, OperatorRegister,
    SynthUnit, CHANNELS_PER_BANK, CHANNELS_PER_UNIT, TOTAL_CHANNELS,
};
pub use shadow::{RegisterSnapshot, ShadowRegisters};
