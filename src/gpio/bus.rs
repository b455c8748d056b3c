use crate::rcs926::{
	WakeControl,
	WakeSource,
};
use crate::twspi::{
	Direction,
	Hardware,
	Level,
	Line,
};

use super::mapped::Mapped;

// BCM283x GPIO register block, offsets relative to /dev/gpiomem
const GPFSEL0: usize = 0x00; // function select: 3 bits per pin, 10 pins per register
const GPSET0: usize = 0x1c; // output set: 1 bit per pin, 32 pins per register
const GPCLR0: usize = 0x28; // output clear
const GPLEV0: usize = 0x34; // pin level
const GPREN0: usize = 0x4c; // rising edge detect enable
const GPFEN0: usize = 0x58; // falling edge detect enable

const FSEL_INPUT: u32 = 0b000;
const FSEL_OUTPUT: u32 = 0b001;

pub(super) const GPIO_PIN_COUNT: u8 = 54;

fn fsel_offset(pin: u8) -> usize {
	GPFSEL0 + 4 * (pin as usize / 10)
}

fn fsel_shift(pin: u8) -> u32 {
	3 * (u32::from(pin) % 10)
}

fn bank_offset(base: usize, pin: u8) -> usize {
	base + 4 * (pin as usize / 32)
}

fn bank_bit(pin: u8) -> u32 {
	1 << (u32::from(pin) % 32)
}

/// Which GPIO pin (BCM numbering) each bus line is wired to.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct PinMap {
	pub select: u8,
	pub clock: u8,
	pub data: u8,
	pub power_switch: u8,
	pub data_ready_irq: u8,
	pub field_detect: u8,
}

impl PinMap {
	fn pin(&self, line: Line) -> u8 {
		match line {
			Line::Select => self.select,
			Line::Clock => self.clock,
			Line::Data => self.data,
			Line::PowerSwitch => self.power_switch,
			Line::DataReadyIrq => self.data_ready_irq,
			Line::FieldDetect => self.field_detect,
		}
	}

	pub fn pins(&self) -> [u8; 6] {
		[
			self.select,
			self.clock,
			self.data,
			self.power_switch,
			self.data_ready_irq,
			self.field_detect,
		]
	}
}

pub struct GpioBus {
	gpio: Mapped,
	pins: PinMap,
	// the GPIO block has no single top-level interrupt enable, so the
	// shared wake flag gates whether the per-pin edge detects get
	// written out at all
	rf_wake_mask: bool,
	data_ready_wake_mask: bool,
	wake_enabled: bool,
}

impl GpioBus {
	pub(super) fn new(gpio: Mapped, pins: PinMap) -> GpioBus {
		GpioBus {
			gpio,
			pins,
			rf_wake_mask: false,
			data_ready_wake_mask: false,
			wake_enabled: false,
		}
	}

	pub fn pins(&self) -> PinMap {
		self.pins
	}

	fn update_bit(&mut self, offset: usize, bit: u32, set: bool) {
		let mut reg = self.gpio.read_dword(offset);
		if set {
			reg |= bit;
		} else {
			reg &= !bit;
		}
		self.gpio.write_dword(offset, reg);
	}

	// both edges armed means "level change", like the pin-change unit
	// of the original host controller
	fn apply_edge_detect(&mut self, source_pin: u8, armed: bool) {
		self.update_bit(bank_offset(GPREN0, source_pin), bank_bit(source_pin), armed);
		self.update_bit(bank_offset(GPFEN0, source_pin), bank_bit(source_pin), armed);
	}

	fn apply_wake(&mut self) {
		let rf = self.wake_enabled && self.rf_wake_mask;
		let data_ready = self.wake_enabled && self.data_ready_wake_mask;
		let rf_pin = self.pins.field_detect;
		let irq_pin = self.pins.data_ready_irq;
		self.apply_edge_detect(rf_pin, rf);
		self.apply_edge_detect(irq_pin, data_ready);
	}
}

impl Hardware for GpioBus {
	fn set_direction(&mut self, line: Line, direction: Direction) {
		let pin = self.pins.pin(line);
		let offset = fsel_offset(pin);
		let function = match direction {
			Direction::Input => FSEL_INPUT,
			Direction::Output => FSEL_OUTPUT,
		};

		let mut fsel = self.gpio.read_dword(offset);
		fsel &= !(0b111 << fsel_shift(pin));
		fsel |= function << fsel_shift(pin);
		self.gpio.write_dword(offset, fsel);
	}

	fn set_level(&mut self, line: Line, level: Level) {
		let pin = self.pins.pin(line);
		// set/clear registers only react to 1 bits, no read-modify-write
		let base = if level.is_high() { GPSET0 } else { GPCLR0 };
		self.gpio.write_dword(bank_offset(base, pin), bank_bit(pin));
	}

	fn level(&mut self, line: Line) -> Level {
		let pin = self.pins.pin(line);
		Level::from(0 != self.gpio.read_dword(bank_offset(GPLEV0, pin)) & bank_bit(pin))
	}
}

impl WakeControl for GpioBus {
	fn set_source_mask(&mut self, source: WakeSource, enabled: bool) {
		match source {
			WakeSource::RfDetect => self.rf_wake_mask = enabled,
			WakeSource::DataReady => self.data_ready_wake_mask = enabled,
		}
		self.apply_wake();
	}

	fn set_shared_enable(&mut self, enabled: bool) {
		self.wake_enabled = enabled;
		self.apply_wake();
	}
}
