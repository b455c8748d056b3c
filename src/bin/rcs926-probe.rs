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
use rcs926_twspi::rcs926::{
	PlugControl,
	WakeSources,
};
use rcs926_twspi::twspi::{
	Hardware,
	Transfer,
};

// default wiring on the Raspberry Pi header (BCM numbering): the SPI0
// pins for the bus proper, free GPIOs for power and status
const DEFAULT_SEL: u8 = 8;
const DEFAULT_CLK: u8 = 11;
const DEFAULT_DATA: u8 = 10;
const DEFAULT_SW: u8 = 25;
const DEFAULT_IRQ: u8 = 24;
const DEFAULT_RFDET: u8 = 23;

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

fn parse_hex(s: &str) -> AResult<Vec<u8>> {
	let s: String = s.chars().filter(|c| !c.is_whitespace()).collect();
	ensure!(!s.is_empty(), "empty payload");
	ensure!(s.bytes().all(|b| b.is_ascii_hexdigit()), "invalid hex payload: {:?}", s);
	ensure!(s.len() % 2 == 0, "odd number of hex digits in payload");

	let mut buf = Vec::with_capacity(s.len() / 2);
	for i in 0..s.len() / 2 {
		match u8::from_str_radix(&s[2 * i..2 * i + 2], 16) {
			Ok(b) => buf.push(b),
			Err(_) => bail!("invalid hex payload: {:?}", s),
		}
	}
	Ok(buf)
}

fn format_hex(buf: &[u8]) -> String {
	let bytes: Vec<String> = buf.iter().map(|b| format!("{:02x}", b)).collect();
	bytes.join(" ")
}

// tool-level convenience; the driver itself never waits for the chip
fn wait_for_data_ready<H>(hw: &mut H) -> AResult<()>
where
	H: Hardware,
{
	for _ in 0..10_000 {
		if hw.data_ready() {
			return Ok(());
		}
		hw.delay_us(100);
	}
	bail!("timeout waiting for the plug to signal data ready");
}

fn status(pins: PinMap) -> AResult<()> {
	let mut bus = gpio::open_gpio(pins)?;
	bus.init();
	let mut plug = bus.activate();

	println!("rf field: {}", if plug.rf_present() { "present" } else { "absent" });
	println!("data ready: {}", if plug.data_ready() { "yes" } else { "no" });

	Ok(())
}

fn read_len_param(sub_m: &clap::ArgMatches) -> AResult<usize> {
	let param = match sub_m.value_of("read") {
		None => return Ok(0),
		Some(p) => p,
	};
	param.parse::<usize>().map_err(|e| {
		let e = failure::Error::from(e);
		let msg = format!("invalid read length: {}", e);
		e.context(msg).into()
	})
}

fn exchange(pins: PinMap, sub_m: &clap::ArgMatches) -> AResult<()> {
	let payload = parse_hex(sub_m.value_of("PAYLOAD").unwrap_or(""))?;
	let read_len = read_len_param(sub_m)?;

	let mut bus = gpio::open_gpio(pins)?;
	bus.init();
	let mut plug = bus.activate();

	plug.begin_send().send_buf(&payload)?;
	info!("sent {} bytes", payload.len());

	if read_len > 0 {
		if sub_m.is_present("wait") {
			wait_for_data_ready(&mut *plug)?;
		}
		let response = plug.get_buf(read_len)?;
		println!("{}", format_hex(&response));
	}

	Ok(())
}

fn suspend(pins: PinMap) -> AResult<()> {
	let mut bus = gpio::open_gpio(pins)?;
	bus.init();
	bus.suspend();

	Ok(())
}

fn resume(pins: PinMap) -> AResult<()> {
	let mut bus = gpio::open_gpio(pins)?;
	bus.init();
	bus.resume();

	Ok(())
}

fn release(pins: PinMap) -> AResult<()> {
	let mut bus = gpio::open_gpio(pins)?;
	bus.disable();

	Ok(())
}

fn wake(pins: PinMap, sub_m: &clap::ArgMatches) -> AResult<()> {
	let mut bus = gpio::open_gpio(pins)?;
	let mut sources = WakeSources::default();

	sources.set_wake_on_rf(&mut bus, sub_m.is_present("rf"));
	sources.set_wake_on_data_ready(&mut bus, sub_m.is_present("data_ready"));
	info!("wake sources {}", if sources.armed() { "armed" } else { "disarmed" });

	Ok(())
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
		(@subcommand status =>
			(about: "power the plug up and report field / data-ready state")
		)
		(@subcommand exchange =>
			(about: "power the plug up and send a hex payload, optionally reading a response")
			(@arg read: -r --read +takes_value "number of response bytes to read")
			(@arg wait: -w --wait "wait for data-ready before reading")
			(@arg PAYLOAD: +required "bytes to send (hex)")
		)
		(@subcommand suspend =>
			(about: "pull the power switch low")
		)
		(@subcommand resume =>
			(about: "pull the power switch high and wait for the plug to come up")
		)
		(@subcommand release =>
			(about: "set all driven lines back to high impedance")
		)
		(@subcommand wake =>
			(about: "arm level-change wake sources (disarms sources not given)")
			(@arg rf: --rf "wake on field changes")
			(@arg data_ready: --("data-ready") "wake on data-ready changes")
		)
	).get_matches();

	let pins = pin_map(&matches)?;

	match matches.subcommand() {
		("status", _) => {
			status(pins)
		}
		("exchange", Some(sub_m)) => {
			exchange(pins, sub_m)
		}
		("suspend", _) => {
			suspend(pins)
		}
		("resume", _) => {
			resume(pins)
		}
		("release", _) => {
			release(pins)
		}
		("wake", Some(sub_m)) => {
			wake(pins, sub_m)
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
