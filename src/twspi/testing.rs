//! Simulated bus backend for the test suite: records every direction
//! change, level change and delay, and feeds scripted levels while a
//! line is read as input. Delays only advance the recorded virtual
//! time, nothing sleeps.

use std::collections::VecDeque;

use super::{
	Direction,
	Hardware,
	Level,
	Line,
};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Event {
	Direction(Line, Direction),
	Level(Line, Level),
	Delay(u32),
}

fn idx(line: Line) -> usize {
	match line {
		Line::Select => 0,
		Line::Clock => 1,
		Line::Data => 2,
		Line::PowerSwitch => 3,
		Line::DataReadyIrq => 4,
		Line::FieldDetect => 5,
	}
}

pub struct SimBus {
	directions: [Direction; 6],
	// last level latched by the driver, kept across direction changes
	// like a real port register
	latched: [Level; 6],
	// what the outside world drives on lines read as input
	driven: [Level; 6],
	// bits the plug shifts out while DATA is an input, MSB first
	pub data_script: VecDeque<Level>,
	pub events: Vec<Event>,
}

impl SimBus {
	pub fn new() -> Self {
		SimBus {
			directions: [Direction::Input; 6],
			latched: [Level::Low; 6],
			driven: [Level::Low; 6],
			data_script: VecDeque::new(),
			events: Vec::new(),
		}
	}

	/// Sets the level the outside world drives on `line`.
	pub fn drive(&mut self, line: Line, level: Level) {
		self.driven[idx(line)] = level;
	}

	/// Queues bytes for the plug to shift out on DATA, MSB first.
	pub fn script_data_bytes(&mut self, bytes: &[u8]) {
		for b in bytes {
			for i in (0..8).rev() {
				self.data_script.push_back(Level::from(0 != b & (1 << i)));
			}
		}
	}

	pub fn direction(&self, line: Line) -> Direction {
		self.directions[idx(line)]
	}

	pub fn latched_level(&self, line: Line) -> Level {
		self.latched[idx(line)]
	}

	/// DATA levels seen by the plug at each rising CLK edge.
	pub fn data_bits_at_rising_clock(&self) -> Vec<bool> {
		let mut bits = Vec::new();
		let mut clock = Level::Low;
		let mut data = Level::Low;
		for ev in &self.events {
			match *ev {
				Event::Level(Line::Data, level) => data = level,
				Event::Level(Line::Clock, level) => {
					if level.is_high() && !clock.is_high() {
						bits.push(data.is_high());
					}
					clock = level;
				},
				_ => (),
			}
		}
		bits
	}

	/// Number of full (low then high) CLK cycles recorded.
	pub fn clock_cycles(&self) -> usize {
		let mut cycles = 0;
		let mut clock = Level::Low;
		for ev in &self.events {
			if let Event::Level(Line::Clock, level) = *ev {
				if level.is_high() && !clock.is_high() {
					cycles += 1;
				}
				clock = level;
			}
		}
		cycles
	}

	pub fn delays(&self) -> Vec<u32> {
		self.events
			.iter()
			.filter_map(|ev| match *ev {
				Event::Delay(us) => Some(us),
				_ => None,
			})
			.collect()
	}
}

impl Hardware for SimBus {
	fn set_direction(&mut self, line: Line, direction: Direction) {
		self.directions[idx(line)] = direction;
		self.events.push(Event::Direction(line, direction));
	}

	fn set_level(&mut self, line: Line, level: Level) {
		self.latched[idx(line)] = level;
		self.events.push(Event::Level(line, level));
	}

	fn level(&mut self, line: Line) -> Level {
		match self.directions[idx(line)] {
			Direction::Output => self.latched[idx(line)],
			Direction::Input => {
				if let Line::Data = line {
					if let Some(level) = self.data_script.pop_front() {
						return level;
					}
				}
				self.driven[idx(line)]
			},
		}
	}

	fn delay_us(&mut self, us: u32) {
		self.events.push(Event::Delay(us));
	}
}
