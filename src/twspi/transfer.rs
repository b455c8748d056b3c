use super::{
	Direction,
	Hardware,
	Level,
	Line,
};

// Max specified bus speed is 1 MHz.
const HALF_CYCLE_US: u32 = 1;
// settle time around turning the DATA line
const TURNAROUND_US: u32 = 1;

pub trait Transfer: Hardware {
	/// Pulls SEL low to announce a transfer from the host and turns the
	/// DATA line around to output.
	///
	/// The send phase ends when the returned transaction goes out of
	/// scope; receiving is impossible while it is alive.
	fn begin_send(&mut self) -> SendTransaction<Self> {
		self.set_level(Line::Select, Level::Low);
		self.delay_us(TURNAROUND_US);
		self.set_direction(Line::Data, Direction::Output);

		SendTransaction(self)
	}

	/// Receives a byte from the bus, MSB first. The host drives the
	/// clock also while receiving, so this cannot block on the chip and
	/// needs no timeout.
	fn get(&mut self) -> u8 {
		let mut data = 0u8;

		for _ in 0..8 {
			self.set_level(Line::Clock, Level::Low);
			self.delay_us(HALF_CYCLE_US);
			data <<= 1;
			if self.level(Line::Data).is_high() {
				data |= 1;
			}
			self.set_level(Line::Clock, Level::High);
			self.delay_us(HALF_CYCLE_US);
		}

		data
	}

	/// Receives `len` bytes in order.
	fn get_buf(&mut self, len: usize) -> crate::AResult<Vec<u8>> {
		ensure!(len > 0, "refusing to receive an empty buffer");

		let mut buf = Vec::with_capacity(len);
		for _ in 0..len {
			buf.push(self.get());
		}
		Ok(buf)
	}
}

impl<H: Hardware + ?Sized> Transfer for H {}

pub struct SendTransaction<'a, H: ?Sized + Hardware + 'a>(&'a mut H);

impl<'a, H: ?Sized + Hardware> SendTransaction<'a, H> {
	/// Sends a single byte to the bus, MSB first.
	pub fn send(&mut self, mut data: u8) {
		for _ in 0..8 {
			self.0.set_level(Line::Clock, Level::Low);
			self.0.set_level(Line::Data, Level::from(0 != data & 0x80));
			data <<= 1;
			self.0.delay_us(HALF_CYCLE_US);
			self.0.set_level(Line::Clock, Level::High);
			self.0.delay_us(HALF_CYCLE_US);
		}
	}

	/// Sends a buffer to the bus in order.
	pub fn send_buf(&mut self, buf: &[u8]) -> crate::AResult<()> {
		ensure!(!buf.is_empty(), "refusing to send an empty buffer");

		trace!("sending {} bytes", buf.len());
		for b in buf {
			self.send(*b);
		}
		Ok(())
	}

	/// Ends the send phase (same as dropping the transaction).
	pub fn finish(self) {
	}
}

impl<'a, H: ?Sized + Hardware> Drop for SendTransaction<'a, H> {
	// turn DATA back to input, then raise SEL to hand the bus to the chip
	fn drop(&mut self) {
		self.0.delay_us(TURNAROUND_US);
		self.0.set_direction(Line::Data, Direction::Input);
		self.0.delay_us(TURNAROUND_US);
		self.0.set_level(Line::Select, Level::High);
	}
}
