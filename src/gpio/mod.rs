mod bus;
mod mapped;

pub use self::bus::{
	GpioBus,
	PinMap,
};

use self::bus::GPIO_PIN_COUNT;

// OS-specific. for now linux only (/dev/gpiomem with a BCM283x-style
// register layout, as found on the Raspberry Pi).
const GPIOMEM_PATH: &str = "/dev/gpiomem";
// the register block is smaller, but mmap works in page granularity
const GPIOMEM_LEN: usize = 0x1000;

pub fn open_gpio(pins: PinMap) -> crate::AResult<GpioBus> {
	let assigned = pins.pins();
	for pin in assigned.iter() {
		ensure!(*pin < GPIO_PIN_COUNT, "no such GPIO pin: {}", pin);
	}
	for i in 0..assigned.len() {
		for j in i + 1..assigned.len() {
			ensure!(assigned[i] != assigned[j],
				"GPIO pin {} assigned to more than one line", assigned[i]
			);
		}
	}

	let gpio = with_context!(("open {}", GPIOMEM_PATH), {
		Ok(mapped::inner_open(GPIOMEM_PATH, GPIOMEM_LEN)?)
	})?;

	Ok(GpioBus::new(gpio, pins))
}
