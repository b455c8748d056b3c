#[macro_use]
extern crate clap;
#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;

extern crate rcs926_twspi;
use rcs926_twspi::*;

use std::process::exit;

use rcs926_twspi::gpio::PinMap;
use rcs926_twspi::rcs926::PlugControl;
use rcs926_twspi::twspi::{
	Hardware,
	Level,
	Line,
	Transfer,
};

const DEFAULT_SEL: u8 = 8;
const DEFAULT_CLK: u8 = 11;
const DEFAULT_DATA: u8 = 10;
const DEFAULT_SW: u8 = 25;
const DEFAULT_IRQ: u8 = 24;
const DEFAULT_RFDET: u8 = 23;

fn get_param<T>(matches: &clap::ArgMatches, name: &str) -> AResult<T>
where
	T: std::str::FromStr,
	failure::Error: From<<T as std::str::FromStr>::Err>,
{
	let param = match matches.value_of(name) {
		Some(p) => p,
		None => bail!("missing parameter {}", name),
	};
	param.parse::<T>().map_err(|e| {
		let e = failure::Error::from(e);
		let msg = format!("invalid parameter {}: {}", name, e);
		e.context(msg).into()
	})
}

fn pin_param(matches: &clap::ArgMatches, name: &str, default: u8) -> AResult<u8> {
	let param = match matches.value_of(name) {
		None => return Ok(default),
		Some(p) => p,
	};
	param.parse::<u8>().map_err(|e| {
		let e = failure::Error::from(e);
		let msg = format!("invalid pin parameter {}: {}", name, e);
		e.context(msg).into()
	})
}

fn pin_map(matches: &clap::ArgMatches) -> AResult<PinMap> {
	Ok(PinMap {
		select: pin_param(matches, "sel", DEFAULT_SEL)?,
		clock: pin_param(matches, "clk", DEFAULT_CLK)?,
		data: pin_param(matches, "data", DEFAULT_DATA)?,
		power_switch: pin_param(matches, "sw", DEFAULT_SW)?,
		data_ready_irq: pin_param(matches, "irq", DEFAULT_IRQ)?,
		field_detect: pin_param(matches, "rfdet", DEFAULT_RFDET)?,
	})
}

fn lines(pins: PinMap) -> AResult<()> {
	let mut bus = gpio::open_gpio(pins)?;

	for line in [
		Line::Select,
		Line::Clock,
		Line::Data,
		Line::PowerSwitch,
		Line::DataReadyIrq,
		Line::FieldDetect,
	].iter() {
		println!("{}: {}", line, bus.level(*line));
	}

	Ok(())
}

fn init(pins: PinMap) -> AResult<()> {
	let mut bus = gpio::open_gpio(pins)?;
	bus.init();

	Ok(())
}

fn dir(pins: PinMap, sub_m: &clap::ArgMatches) -> AResult<()> {
	let line: Line = get_param(sub_m, "LINE")?;
	let direction = get_param(sub_m, "DIRECTION")?;

	let mut bus = gpio::open_gpio(pins)?;
	bus.set_direction(line, direction);

	Ok(())
}

fn set(pins: PinMap, sub_m: &clap::ArgMatches) -> AResult<()> {
	let line: Line = get_param(sub_m, "LINE")?;
	let level: Level = get_param(sub_m, "LEVEL")?;

	let mut bus = gpio::open_gpio(pins)?;
	bus.set_level(line, level);

	Ok(())
}

fn send(pins: PinMap, sub_m: &clap::ArgMatches) -> AResult<()> {
	let byte: u8 = get_param(sub_m, "BYTE")?;

	let mut bus = gpio::open_gpio(pins)?;
	bus.init();
	bus.begin_send().send(byte);

	Ok(())
}

fn recv(pins: PinMap, sub_m: &clap::ArgMatches) -> AResult<()> {
	let len: usize = get_param(sub_m, "LEN")?;

	let mut bus = gpio::open_gpio(pins)?;
	bus.init();
	for b in bus.get_buf(len)? {
		print!("{:02x} ", b);
	}
	println!("");

	Ok(())
}

fn watch(pins: PinMap, sub_m: &clap::ArgMatches) -> AResult<()> {
	let mut remaining = match sub_m.value_of("count") {
		None => None,
		Some(_) => Some(get_param::<u64>(sub_m, "count")?),
	};

	let mut bus = gpio::open_gpio(pins)?;
	let mut rf = bus.rf_present();
	let mut ready = bus.data_ready();
	println!("rf field: {} / data ready: {}", rf, ready);

	loop {
		if let Some(ref mut n) = remaining {
			if 0 == *n {
				return Ok(());
			}
			*n -= 1;
		}

		bus.delay_us(10_000);

		let now_rf = bus.rf_present();
		if now_rf != rf {
			rf = now_rf;
			println!("rf field: {}", rf);
		}
		let now_ready = bus.data_ready();
		if now_ready != ready {
			ready = now_ready;
			println!("data ready: {}", ready);
		}
	}
}

fn main_app() -> AResult<()> {
	let matches = clap_app!(@app (app_from_crate!())
		(@setting SubcommandRequiredElseHelp)
		(global_setting: clap::AppSettings::VersionlessSubcommands)
		(@arg sel: --sel +takes_value "GPIO pin (BCM) wired to SEL")
		(@arg clk: --clk +takes_value "GPIO pin (BCM) wired to CLK")
		(@arg data: --data +takes_value "GPIO pin (BCM) wired to DATA")
		(@arg sw: --sw +takes_value "GPIO pin (BCM) wired to the power switch")
		(@arg irq: --irq +takes_value "GPIO pin (BCM) wired to IRQ (data ready)")
		(@arg rfdet: --rfdet +takes_value "GPIO pin (BCM) wired to RFDET (field detect)")
		(@subcommand lines =>
			(about: "show the current level of every line")
		)
		(@subcommand init =>
			(about: "configure the driven lines as outputs")
		)
		(@subcommand dir =>
			(about: "configure a single line direction")
			(@arg LINE: +required "line name (sel, clk, data, sw, irq, rfdet)")
			(@arg DIRECTION: +required "in or out")
		)
		(@subcommand set =>
			(about: "latch a level on a line (drives only while the line is an output)")
			(@arg LINE: +required "line name (sel, clk, data, sw, irq, rfdet)")
			(@arg LEVEL: +required "low or high")
		)
		(@subcommand send =>
			(about: "clock a single byte out (full SEL/DATA framing)")
			(@arg BYTE: +required "byte to send (decimal)")
		)
		(@subcommand recv =>
			(about: "clock bytes in and dump them as hex")
			(@arg LEN: +required "number of bytes to read")
		)
		(@subcommand watch =>
			(about: "poll IRQ and RFDET and report level changes")
			(@arg count: -n --count +takes_value "stop after this many polls (default: run forever)")
		)
	).get_matches();

	let pins = pin_map(&matches)?;

	match matches.subcommand() {
		("lines", _) => {
			lines(pins)
		}
		("init", _) => {
			init(pins)
		}
		("dir", Some(sub_m)) => {
			dir(pins, sub_m)
		}
		("set", Some(sub_m)) => {
			set(pins, sub_m)
		}
		("send", Some(sub_m)) => {
			send(pins, sub_m)
		}
		("recv", Some(sub_m)) => {
			recv(pins, sub_m)
		}
		("watch", Some(sub_m)) => {
			watch(pins, sub_m)
		}
		("", _) => bail!("no subcommand"),
		(cmd, _) => bail!("not implemented subcommand {:?}", cmd),
	}
}

fn main() {
	env_logger::from_env(env_logger::Env::default().default_filter_or("info")).init();

	if let Err(e) = main_app() {
		error!("Error: {}", e);
		exit(1);
	}
}
