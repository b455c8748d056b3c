use std::fmt;
use std::str;
use std::thread;
use std::time::{
	Duration,
	Instant,
};

pub fn reliable_sleep(mut duration: Duration) {
	loop {
		let now = Instant::now();
		thread::sleep(duration);
		let elapsed = now.elapsed();
		if elapsed >= duration {
			return;
		}
		duration -= elapsed;
	}
}

/// Lines connecting host and plug.
///
/// `Select`, `Clock` and `PowerSwitch` are driven by the host once
/// configured, `DataReadyIrq` and `FieldDetect` only ever by the plug.
/// `Data` is the one line that changes direction at runtime.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Line {
	Select,
	Clock,
	Data,
	PowerSwitch,
	DataReadyIrq,
	FieldDetect,
}

impl fmt::Display for Line {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		let name = match *self {
			Line::Select => "sel",
			Line::Clock => "clk",
			Line::Data => "data",
			Line::PowerSwitch => "sw",
			Line::DataReadyIrq => "irq",
			Line::FieldDetect => "rfdet",
		};
		write!(f, "{}", name)
	}
}

impl str::FromStr for Line {
	type Err = ::failure::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"sel" => Ok(Line::Select),
			"clk" => Ok(Line::Clock),
			"data" => Ok(Line::Data),
			"sw" => Ok(Line::PowerSwitch),
			"irq" => Ok(Line::DataReadyIrq),
			"rfdet" => Ok(Line::FieldDetect),
			_ => bail!("unknown line name: {:?} (try sel, clk, data, sw, irq, rfdet)", s),
		}
	}
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Direction {
	Input,
	Output,
}

impl fmt::Display for Direction {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match *self {
			Direction::Input => write!(f, "in"),
			Direction::Output => write!(f, "out"),
		}
	}
}

impl str::FromStr for Direction {
	type Err = ::failure::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"in" => Ok(Direction::Input),
			"out" => Ok(Direction::Output),
			_ => bail!("unknown direction: {:?} (try in, out)", s),
		}
	}
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Level {
	Low,
	High,
}

impl Level {
	pub fn is_high(self) -> bool {
		self == Level::High
	}
}

impl From<bool> for Level {
	fn from(v: bool) -> Self {
		match v {
			false => Level::Low,
			true => Level::High,
		}
	}
}

impl fmt::Display for Level {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match *self {
			Level::Low => write!(f, "low"),
			Level::High => write!(f, "high"),
		}
	}
}

impl str::FromStr for Level {
	type Err = ::failure::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"low" => Ok(Level::Low),
			"high" => Ok(Level::High),
			_ => bail!("unknown level: {:?} (try low, high)", s),
		}
	}
}

pub trait Hardware {
	/// Configuring a direction doesn't assert a level: whatever the
	/// backend latched last (including its reset default) keeps showing
	/// once the line becomes an output again.
	fn set_direction(&mut self, line: Line, direction: Direction);

	fn set_level(&mut self, line: Line, level: Level);

	fn level(&mut self, line: Line) -> Level;

	// delay for at least the given duration
	fn delay_us(&mut self, us: u32) {
		reliable_sleep(Duration::from_micros(u64::from(us)));
	}
}
