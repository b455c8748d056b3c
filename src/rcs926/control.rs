use std::ops::{
	Deref,
	DerefMut,
};

use crate::twspi::{
	Direction,
	Hardware,
	Level,
	Line,
};

// the plug needs time to become ready after SW goes high
const POWER_UP_SETTLE_US: u32 = 50;

pub trait PlugControl: Hardware {
	/// Configures SEL, CLK and SW as outputs.
	///
	/// The levels are left at whatever the backend latched before (a
	/// hardware reset usually leaves them low, meaning SEL asserted and
	/// the plug suspended); the first end of a send raises SEL, `resume`
	/// raises SW.
	fn init(&mut self) {
		self.set_direction(Line::Select, Direction::Output);
		self.set_direction(Line::Clock, Direction::Output);
		self.set_direction(Line::PowerSwitch, Direction::Output);
	}

	/// Resets all driven lines to high impedance, relinquishing the bus
	/// until `init` runs again.
	fn disable(&mut self) {
		self.set_direction(Line::Select, Direction::Input);
		self.set_direction(Line::Clock, Direction::Input);
		self.set_direction(Line::PowerSwitch, Direction::Input);
	}

	/// Suspends the plug by pulling SW low.
	fn suspend(&mut self) {
		trace!("suspending plug");
		self.set_level(Line::PowerSwitch, Level::Low);
	}

	/// Activates the plug by pulling SW high, then blocks until the
	/// chip had time to become ready. No transfers before this returns.
	fn resume(&mut self) {
		trace!("resuming plug");
		self.set_level(Line::PowerSwitch, Level::High);
		self.delay_us(POWER_UP_SETTLE_US);
	}

	/// True if the plug received data from an initiator. A snapshot of
	/// the IRQ line, nothing is latched or debounced.
	fn data_ready(&mut self) -> bool {
		self.level(Line::DataReadyIrq).is_high()
	}

	/// True if an external RF field is detected (RFDET reads low).
	fn rf_present(&mut self) -> bool {
		!self.level(Line::FieldDetect).is_high()
	}

	/// Resumes the plug and suspends it again when the returned guard
	/// goes out of scope.
	fn activate(&mut self) -> Activated<Self> {
		self.resume();

		Activated(self)
	}
}

impl<H: Hardware + ?Sized> PlugControl for H {}

pub struct Activated<'a, H: ?Sized + Hardware + 'a>(&'a mut H);

impl<'a, H: ?Sized + Hardware> Drop for Activated<'a, H> {
	fn drop(&mut self) {
		self.0.suspend();
	}
}

impl<'a, H: ?Sized + Hardware> Deref for Activated<'a, H> {
	type Target = H;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl<'a, H: ?Sized + Hardware> DerefMut for Activated<'a, H> {
	fn deref_mut(&mut self) -> &mut Self::Target {
		&mut self.0
	}
}

#[cfg(test)]
mod test {
	use crate::twspi::testing::{
		Event,
		SimBus,
	};
	use crate::twspi::{
		Direction,
		Level,
		Line,
		Transfer,
	};

	use super::PlugControl;

	#[test]
	fn init_drives_the_output_lines() {
		let mut bus = SimBus::new();

		bus.init();

		assert_eq!(Direction::Output, bus.direction(Line::Select));
		assert_eq!(Direction::Output, bus.direction(Line::Clock));
		assert_eq!(Direction::Output, bus.direction(Line::PowerSwitch));
		assert_eq!(Direction::Input, bus.direction(Line::Data));
		assert_eq!(Direction::Input, bus.direction(Line::DataReadyIrq));
		assert_eq!(Direction::Input, bus.direction(Line::FieldDetect));
		// directions only; levels stay wherever the backend left them
		assert!(bus.events.iter().all(|ev| match *ev {
			Event::Direction(..) => true,
			_ => false,
		}));
	}

	#[test]
	fn disable_releases_the_output_lines() {
		let mut bus = SimBus::new();

		bus.init();
		bus.resume();
		bus.disable();

		assert_eq!(Direction::Input, bus.direction(Line::Select));
		assert_eq!(Direction::Input, bus.direction(Line::Clock));
		assert_eq!(Direction::Input, bus.direction(Line::PowerSwitch));
	}

	#[test]
	fn suspend_then_resume_cycles_power() {
		let mut bus = SimBus::new();

		bus.suspend();
		bus.resume();

		assert_eq!(
			bus.events,
			vec![
				Event::Level(Line::PowerSwitch, Level::Low),
				Event::Level(Line::PowerSwitch, Level::High),
				Event::Delay(50),
			],
		);
		assert_eq!(Level::High, bus.latched_level(Line::PowerSwitch));
	}

	#[test]
	fn resume_settles_before_returning() {
		let mut bus = SimBus::new();

		bus.resume();

		// the settle delay runs after SW goes high, before resume returns
		assert_eq!(
			bus.events,
			vec![
				Event::Level(Line::PowerSwitch, Level::High),
				Event::Delay(50),
			],
		);
	}

	#[test]
	fn data_ready_samples_irq() {
		let mut bus = SimBus::new();

		bus.drive(Line::DataReadyIrq, Level::Low);
		assert!(!bus.data_ready());
		bus.drive(Line::DataReadyIrq, Level::High);
		assert!(bus.data_ready());
	}

	#[test]
	fn rf_present_is_active_low() {
		let mut bus = SimBus::new();

		bus.drive(Line::FieldDetect, Level::Low);
		assert!(bus.rf_present());
		bus.drive(Line::FieldDetect, Level::High);
		assert!(!bus.rf_present());
	}

	#[test]
	fn activated_guard_suspends_on_drop() {
		let mut bus = SimBus::new();

		{
			let mut plug = bus.activate();
			let mut tx = plug.begin_send();
			tx.send(0x01);
		}

		assert_eq!(
			Some(&Event::Level(Line::PowerSwitch, Level::Low)),
			bus.events.last(),
		);
		assert_eq!(
			Event::Level(Line::PowerSwitch, Level::High),
			bus.events[0],
		);
		assert_eq!(8, bus.clock_cycles());
	}
}
