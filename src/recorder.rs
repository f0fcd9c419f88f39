//! Bus recorder
//!
//! A dry-run backend: transport, pins and delay all append to one shared
//! timeline so the exact order of selector changes, reset pulses and register
//! writes can be inspected afterwards.
//!
//! # Example
//!
//! ```
//! use opl3_duo::recorder::BusRecorder;
//! use opl3_duo::{ChannelRegister, Opl3Duo};
//!
//! let recorder = BusRecorder::new();
//! let mut duo = Opl3Duo::new(
//!     recorder.transport(),
//!     recorder.selector_pin(),
//!     recorder.reset_pin(),
//!     recorder.delay(),
//! );
//! duo.begin();
//! recorder.clear();
//!
//! duo.set_channel_register(ChannelRegister::KeyOnBlock, 18, 0x31);
//! let writes = recorder.register_writes();
//! assert_eq!(writes.len(), 1);
//! assert_eq!(writes[0].bank, 2);
//! assert_eq!(writes[0].register, 0xB0);
//! ```

use std::sync::Arc;

use parking_lot::Mutex;

use crate::address::PhysicalAddress;
use crate::hal::{Delay, OutputPin, PinLevel, Transport};

/// Name used for the chip selector line.
pub const SELECTOR_PIN: &str = "selector";
/// Name used for the hardware reset line.
pub const RESET_PIN: &str = "reset";

/// One recorded bus action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusEvent {
    /// Transport setup
    Begin,
    /// Transport write on the selected chip
    Write {
        /// Within-chip bank (A1)
        bank: u8,
        /// Register byte
        register: u8,
        /// Value written
        value: u8,
    },
    /// Digital output change
    Pin {
        /// Pin name
        name: &'static str,
        /// New level
        level: PinLevel,
    },
    /// Blocking delay
    Delay {
        /// Duration in milliseconds
        ms: u32,
    },
}

type Timeline = Arc<Mutex<Vec<BusEvent>>>;

/// Shared event timeline with handles for each collaborator.
#[derive(Debug, Clone, Default)]
pub struct BusRecorder {
    events: Timeline,
}

impl BusRecorder {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport handle.
    pub fn transport(&self) -> RecordingTransport {
        RecordingTransport {
            events: Arc::clone(&self.events),
        }
    }

    /// Output pin handle recorded under `name`.
    pub fn pin(&self, name: &'static str) -> RecordingPin {
        RecordingPin {
            name,
            events: Arc::clone(&self.events),
        }
    }

    /// Selector pin handle.
    pub fn selector_pin(&self) -> RecordingPin {
        self.pin(SELECTOR_PIN)
    }

    /// Reset pin handle.
    pub fn reset_pin(&self) -> RecordingPin {
        self.pin(RESET_PIN)
    }

    /// Delay handle. Records the delay without sleeping.
    pub fn delay(&self) -> RecordingDelay {
        RecordingDelay {
            events: Arc::clone(&self.events),
        }
    }

    /// Copy of the timeline so far.
    pub fn events(&self) -> Vec<BusEvent> {
        self.events.lock().clone()
    }

    /// Drop all recorded events.
    pub fn clear(&self) {
        self.events.lock().clear();
    }

    /// Transport writes resolved against the selector state at the time of
    /// each write. The selector starts low.
    pub fn register_writes(&self) -> Vec<PhysicalAddress> {
        let events = self.events.lock();
        let mut selector_high = false;
        let mut writes = Vec::new();
        for event in events.iter() {
            match *event {
                BusEvent::Pin {
                    name: SELECTOR_PIN,
                    level,
                } => selector_high = level.is_high(),
                BusEvent::Write {
                    bank,
                    register,
                    value,
                } => {
                    let unit_bit = if selector_high { 0x02 } else { 0x00 };
                    writes.push(PhysicalAddress::new(unit_bit | bank, register, value));
                }
                _ => {}
            }
        }
        writes
    }

    /// Level of a pin after the last recorded change, if it was ever driven.
    pub fn pin_level(&self, name: &str) -> Option<PinLevel> {
        self.events.lock().iter().rev().find_map(|event| match *event {
            BusEvent::Pin { name: n, level } if n == name => Some(level),
            _ => None,
        })
    }
}

/// [`Transport`] that records into a [`BusRecorder`].
#[derive(Debug, Clone)]
pub struct RecordingTransport {
    events: Timeline,
}

impl Transport for RecordingTransport {
    fn begin(&mut self) {
        self.events.lock().push(BusEvent::Begin);
    }

    fn write(&mut self, bank: u8, register: u8, value: u8) {
        self.events.lock().push(BusEvent::Write {
            bank,
            register,
            value,
        });
    }
}

/// [`OutputPin`] that records into a [`BusRecorder`].
#[derive(Debug, Clone)]
pub struct RecordingPin {
    name: &'static str,
    events: Timeline,
}

impl OutputPin for RecordingPin {
    fn set_level(&mut self, level: PinLevel) {
        self.events.lock().push(BusEvent::Pin {
            name: self.name,
            level,
        });
    }
}

/// [`Delay`] that records into a [`BusRecorder`].
#[derive(Debug, Clone)]
pub struct RecordingDelay {
    events: Timeline,
}

impl Delay for RecordingDelay {
    fn delay_ms(&mut self, ms: u32) {
        self.events.lock().push(BusEvent::Delay { ms });
    }
}
