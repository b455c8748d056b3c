/// Host wake sources tied to the plug's status lines.
///
/// Both sources are level-change interrupts sharing a single top-level
/// enable flag in the host's interrupt unit; the per-source mask bits
/// select which line changes actually fire. Arming only configures the
/// wake condition; the sleep/wake scheduling itself lives outside this
/// crate, and a wake handler must never touch the bus while a transfer
/// runs on the main context.

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum WakeSource {
	RfDetect,
	DataReady,
}

/// Interrupt unit backend: one mask bit per source, one shared enable
/// on top of both.
pub trait WakeControl {
	fn set_source_mask(&mut self, source: WakeSource, enabled: bool);
	fn set_shared_enable(&mut self, enabled: bool);
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum WakeDiscipline {
	/// Disabling a source clears only its own mask bit; the shared
	/// enable stays set once anything armed it.
	Legacy,
	/// Additionally clears the shared enable once the last armed source
	/// is disabled.
	Counted,
}

/// Tracks which sources are armed and keeps the shared enable flag of a
/// `WakeControl` backend consistent with the chosen discipline.
pub struct WakeSources {
	discipline: WakeDiscipline,
	rf_armed: bool,
	data_ready_armed: bool,
}

impl Default for WakeSources {
	fn default() -> Self {
		WakeSources::new(WakeDiscipline::Legacy)
	}
}

impl WakeSources {
	pub fn new(discipline: WakeDiscipline) -> Self {
		WakeSources {
			discipline,
			rf_armed: false,
			data_ready_armed: false,
		}
	}

	/// Wake the host on level changes of RFDET (field appearing or
	/// disappearing).
	pub fn set_wake_on_rf<W>(&mut self, hw: &mut W, enable: bool)
	where
		W: WakeControl + ?Sized,
	{
		trace!("wake on rf: {}", enable);
		self.rf_armed = enable;
		self.apply(hw, WakeSource::RfDetect, enable);
	}

	/// Wake the host on level changes of IRQ (data arriving).
	pub fn set_wake_on_data_ready<W>(&mut self, hw: &mut W, enable: bool)
	where
		W: WakeControl + ?Sized,
	{
		trace!("wake on data ready: {}", enable);
		self.data_ready_armed = enable;
		self.apply(hw, WakeSource::DataReady, enable);
	}

	pub fn armed(&self) -> bool {
		self.rf_armed || self.data_ready_armed
	}

	fn apply<W>(&self, hw: &mut W, source: WakeSource, enable: bool)
	where
		W: WakeControl + ?Sized,
	{
		hw.set_source_mask(source, enable);
		if enable {
			hw.set_shared_enable(true);
		} else if let WakeDiscipline::Counted = self.discipline {
			if !self.armed() {
				hw.set_shared_enable(false);
			}
		}
	}
}

#[cfg(test)]
mod test {
	use super::{
		WakeControl,
		WakeDiscipline,
		WakeSource,
		WakeSources,
	};

	struct FakeInterruptUnit {
		rf_mask: bool,
		data_ready_mask: bool,
		shared: bool,
	}

	impl FakeInterruptUnit {
		fn new() -> Self {
			FakeInterruptUnit {
				rf_mask: false,
				data_ready_mask: false,
				shared: false,
			}
		}
	}

	impl WakeControl for FakeInterruptUnit {
		fn set_source_mask(&mut self, source: WakeSource, enabled: bool) {
			match source {
				WakeSource::RfDetect => self.rf_mask = enabled,
				WakeSource::DataReady => self.data_ready_mask = enabled,
			}
		}

		fn set_shared_enable(&mut self, enabled: bool) {
			self.shared = enabled;
		}
	}

	#[test]
	fn legacy_disable_keeps_shared_enable() {
		let mut unit = FakeInterruptUnit::new();
		let mut wake = WakeSources::new(WakeDiscipline::Legacy);

		wake.set_wake_on_rf(&mut unit, true);
		wake.set_wake_on_data_ready(&mut unit, true);
		wake.set_wake_on_rf(&mut unit, false);

		assert!(!unit.rf_mask);
		assert!(unit.data_ready_mask);
		assert!(unit.shared);
		assert!(wake.armed());
	}

	#[test]
	fn legacy_never_clears_shared_enable() {
		let mut unit = FakeInterruptUnit::new();
		let mut wake = WakeSources::new(WakeDiscipline::Legacy);

		wake.set_wake_on_rf(&mut unit, true);
		wake.set_wake_on_rf(&mut unit, false);
		wake.set_wake_on_data_ready(&mut unit, true);
		wake.set_wake_on_data_ready(&mut unit, false);

		assert!(!unit.rf_mask);
		assert!(!unit.data_ready_mask);
		assert!(unit.shared);
		assert!(!wake.armed());
	}

	#[test]
	fn counted_clears_shared_enable_with_last_source() {
		let mut unit = FakeInterruptUnit::new();
		let mut wake = WakeSources::new(WakeDiscipline::Counted);

		wake.set_wake_on_rf(&mut unit, true);
		wake.set_wake_on_data_ready(&mut unit, true);

		wake.set_wake_on_rf(&mut unit, false);
		assert!(unit.shared, "other source still armed");

		wake.set_wake_on_data_ready(&mut unit, false);
		assert!(!unit.shared);
		assert!(!unit.rf_mask);
		assert!(!unit.data_ready_mask);
	}

	#[test]
	fn enabling_either_source_sets_shared_enable() {
		let mut unit = FakeInterruptUnit::new();
		let mut wake = WakeSources::default();

		wake.set_wake_on_data_ready(&mut unit, true);

		assert!(!unit.rf_mask);
		assert!(unit.data_ready_mask);
		assert!(unit.shared);
	}
}
