use std::thread;

use opl3_duo::address::{bank_and_register, physical_unit};
use opl3_duo::hal::PinLevel;
use opl3_duo::recorder::{
    BusEvent, BusRecorder, RecordingDelay, RecordingPin, RecordingTransport, RESET_PIN,
    SELECTOR_PIN,
};
use opl3_duo::{
    ChannelRegister, ChipRegister, DuoConfig, Opl3Duo, Operator, OperatorRegister, SynthUnit,
    TOTAL_CHANNELS,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

type TestDuo = Opl3Duo<RecordingTransport, RecordingPin, RecordingPin, RecordingDelay>;

fn ready_duo() -> (TestDuo, BusRecorder) {
    let bus = BusRecorder::new();
    let mut duo = Opl3Duo::new(
        bus.transport(),
        bus.selector_pin(),
        bus.reset_pin(),
        bus.delay(),
    );
    duo.begin();
    bus.clear();
    (duo, bus)
}

#[derive(Debug, Clone, Copy)]
enum Address {
    Chip(SynthUnit, ChipRegister),
    Channel(ChannelRegister, u8),
    Operator(OperatorRegister, u8, Operator),
}

fn all_addresses() -> Vec<Address> {
    let mut addresses = Vec::new();
    for unit in SynthUnit::ALL {
        for reg in ChipRegister::ALL {
            addresses.push(Address::Chip(unit, reg));
        }
    }
    for channel in 0..TOTAL_CHANNELS {
        for base in ChannelRegister::ALL {
            addresses.push(Address::Channel(base, channel));
        }
        for op in Operator::ALL {
            for base in OperatorRegister::ALL {
                addresses.push(Address::Operator(base, channel, op));
            }
        }
    }
    addresses
}

fn write(duo: &mut TestDuo, address: Address, value: u8) {
    match address {
        Address::Chip(unit, reg) => duo.set_chip_register(unit, reg, value),
        Address::Channel(base, channel) => duo.set_channel_register(base, channel, value),
        Address::Operator(base, channel, op) => {
            duo.set_operator_register(base, channel, op, value)
        }
    }
}

fn read(duo: &TestDuo, address: Address) -> u8 {
    match address {
        Address::Chip(unit, reg) => duo.chip_register(unit, reg),
        Address::Channel(base, channel) => duo.channel_register(base, channel),
        Address::Operator(base, channel, op) => duo.operator_register(base, channel, op),
    }
}

#[test]
fn channel_9_rolls_over_to_second_bank_of_unit_0() {
    let (mut duo, bus) = ready_duo();
    duo.set_channel_register(ChannelRegister::KeyOnBlock, 9, 0x31);

    let writes = bus.register_writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].unit, SynthUnit::Unit0);
    assert_eq!(writes[0].bank, 1);
    assert_eq!(writes[0].register, 0xB0);
    assert_eq!(writes[0].value, 0x31);
    assert_eq!(
        bus.events(),
        vec![
            BusEvent::Pin {
                name: SELECTOR_PIN,
                level: PinLevel::Low
            },
            BusEvent::Write {
                bank: 1,
                register: 0xB0,
                value: 0x31
            },
        ]
    );
}

#[test]
fn channel_18_crosses_to_unit_1() {
    let (mut duo, bus) = ready_duo();
    duo.set_channel_register(ChannelRegister::KeyOnBlock, 18, 0x31);

    let writes = bus.register_writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].unit, SynthUnit::Unit1);
    assert_eq!(writes[0].bank, 2);
    assert_eq!(writes[0].register, 0xB0);
    assert_eq!(
        bus.events()[0],
        BusEvent::Pin {
            name: SELECTOR_PIN,
            level: PinLevel::High
        }
    );
}

#[test]
fn every_write_is_preceded_by_its_selector_level() {
    let (mut duo, bus) = ready_duo();
    for address in all_addresses() {
        write(&mut duo, address, 0x5A);
    }

    let events = bus.events();
    let writes: Vec<usize> = events
        .iter()
        .enumerate()
        .filter(|(_, e)| matches!(e, BusEvent::Write { .. }))
        .map(|(i, _)| i)
        .collect();
    assert_eq!(writes.len(), all_addresses().len());

    // Each transport write comes straight after a selector change
    for i in writes {
        assert!(i > 0);
        assert!(matches!(
            events[i - 1],
            BusEvent::Pin {
                name: SELECTOR_PIN,
                ..
            }
        ));
    }
}

#[test]
fn channel_writes_target_the_unit_owning_the_channel() {
    let (mut duo, bus) = ready_duo();
    for channel in 0..TOTAL_CHANNELS {
        duo.set_operator_register(OperatorRegister::AttackDecay, channel, Operator::Operator2, 1);
    }
    for (channel, write) in bus.register_writes().iter().enumerate() {
        let expected = if channel < 18 {
            SynthUnit::Unit0
        } else {
            SynthUnit::Unit1
        };
        assert_eq!(write.unit, expected, "channel {channel}");
        let (bank, reg) = bank_and_register(0x60, channel as u8, Some(Operator::Operator2));
        assert_eq!(write.bank, bank);
        assert_eq!(write.register, reg);
        assert_eq!(physical_unit(bank), expected);
    }
}

#[test]
fn chip_registers_use_bit_8_as_bank() {
    let (mut duo, bus) = ready_duo();
    duo.set_chip_register(SynthUnit::Unit0, ChipRegister::NewMode, 0x01);
    duo.set_chip_register(SynthUnit::Unit1, ChipRegister::Rhythm, 0xC0);

    let writes = bus.register_writes();
    assert_eq!((writes[0].bank, writes[0].register), (1, 0x05));
    assert_eq!((writes[1].bank, writes[1].register), (2, 0xBD));
}

#[test]
fn reset_pulses_each_unit_then_zeroes_everything() {
    let (mut duo, bus) = ready_duo();
    for address in all_addresses() {
        write(&mut duo, address, 0xFF);
    }
    bus.clear();

    duo.reset();

    let events = bus.events();
    let pulse = |level| BusEvent::Pin {
        name: RESET_PIN,
        level,
    };
    let select = |level| BusEvent::Pin {
        name: SELECTOR_PIN,
        level,
    };
    assert_eq!(
        &events[..8],
        &[
            select(PinLevel::Low),
            pulse(PinLevel::Low),
            BusEvent::Delay { ms: 1 },
            pulse(PinLevel::High),
            select(PinLevel::High),
            pulse(PinLevel::Low),
            BusEvent::Delay { ms: 1 },
            pulse(PinLevel::High),
        ]
    );

    for address in all_addresses() {
        assert_eq!(read(&duo, address), 0x00, "{address:?}");
    }
    assert!(bus.register_writes().iter().all(|w| w.value == 0x00));
    assert_eq!(bus.pin_level(SELECTOR_PIN), Some(PinLevel::Low));
    assert_eq!(bus.pin_level(RESET_PIN), Some(PinLevel::High));
}

#[test]
fn reset_pulse_width_comes_from_config() {
    let bus = BusRecorder::new();
    let config = DuoConfig::from_json(r#"{ "reset_pulse_ms": 10 }"#).unwrap();
    let mut duo = Opl3Duo::with_config(
        config,
        bus.transport(),
        bus.selector_pin(),
        bus.reset_pin(),
        bus.delay(),
    )
    .unwrap();
    duo.reset();

    let delays: Vec<_> = bus
        .events()
        .into_iter()
        .filter(|e| matches!(e, BusEvent::Delay { .. }))
        .collect();
    assert_eq!(delays, vec![BusEvent::Delay { ms: 10 }; 2]);
}

#[test]
fn opl3_toggle_forces_panning_symmetrically() {
    let (mut duo, _bus) = ready_duo();
    for channel in 0..TOTAL_CHANNELS {
        duo.set_panning(channel, channel % 2 == 0, channel % 3 == 0);
    }

    duo.set_opl3_enabled(true);
    assert!(duo.is_opl3_enabled());
    for channel in 0..TOTAL_CHANNELS {
        assert_eq!(duo.panning(channel), (true, true));
    }

    duo.set_opl3_enabled(false);
    assert!(!duo.is_opl3_enabled());
    assert!(!duo.is_opl3_enabled_on(SynthUnit::Unit0));
    for channel in 0..TOTAL_CHANNELS {
        assert_eq!(duo.panning(channel), (false, false));
    }
}

#[test]
fn opl3_toggle_writes_mode_before_panning() {
    let (mut duo, bus) = ready_duo();
    duo.set_opl3_enabled_on(SynthUnit::Unit1, true);

    let writes = bus.register_writes();
    assert_eq!(writes.len(), 1 + 18);
    assert_eq!((writes[0].bank, writes[0].register, writes[0].value), (3, 0x05, 0x01));
    for write in &writes[1..] {
        assert_eq!(write.unit, SynthUnit::Unit1);
        assert_eq!(write.value & 0x30, 0x30);
    }
}

#[test]
fn random_round_trip_is_order_independent() {
    let mut rng = StdRng::seed_from_u64(0x0DD0_0262);
    let (mut duo, _bus) = ready_duo();

    let mut addresses = all_addresses();
    // Shuffle, keep the first 200 distinct addresses
    for i in (1..addresses.len()).rev() {
        let j = rng.random_range(0..=i);
        addresses.swap(i, j);
    }
    addresses.truncate(200);

    let values: Vec<u8> = addresses.iter().map(|_| rng.random()).collect();
    for (&address, &value) in addresses.iter().zip(&values) {
        write(&mut duo, address, value);
    }

    let mut order: Vec<usize> = (0..addresses.len()).collect();
    for i in (1..order.len()).rev() {
        let j = rng.random_range(0..=i);
        order.swap(i, j);
    }
    for i in order {
        assert_eq!(read(&duo, addresses[i]), values[i], "{:?}", addresses[i]);
    }
}

#[test]
fn reads_never_touch_the_bus() {
    let (mut duo, bus) = ready_duo();
    duo.set_opl3_enabled(true);
    bus.clear();

    for address in all_addresses() {
        let _ = read(&duo, address);
    }
    let _ = duo.is_opl3_enabled();
    let _ = duo.panning(12);
    assert!(bus.events().is_empty());
}

#[test]
fn shared_handle_serializes_access() {
    let (duo, bus) = ready_duo();
    let shared = duo.into_shared();

    let handles: Vec<_> = SynthUnit::ALL
        .into_iter()
        .map(|unit| {
            let shared = shared.clone();
            thread::spawn(move || {
                let range = shared.lock().channels_of(unit);
                for channel in range {
                    shared
                        .lock()
                        .set_channel_register(ChannelRegister::FNumberLow, channel, channel);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let duo = shared.lock();
    for channel in 0..TOTAL_CHANNELS {
        assert_eq!(duo.channel_register(ChannelRegister::FNumberLow, channel), channel);
    }
    // Selector changes and writes stay paired even with two writers
    for write in bus.register_writes() {
        let expected = if write.value < 18 {
            SynthUnit::Unit0
        } else {
            SynthUnit::Unit1
        };
        assert_eq!(write.unit, expected);
    }
}
