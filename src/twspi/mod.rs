/// Half-duplex three-wire interface used by the Sony FeliCa Plug (RC-S926).
///
/// Three driven signals make up the bus proper:
/// - SEL: low while the host drives DATA, high while the bus is idle and
///   the chip may drive DATA
/// - CLK: bit clock, always generated by the host (one full low/high
///   cycle per bit, also while receiving)
/// - DATA: shared, bidirectional; direction follows SEL
///
/// Bytes are shifted MSB first. Max specified bus speed is 1 MHz, so
/// every half cycle holds for at least a microsecond.
///
/// Next to the bus the chip has a power switch line (SW) and two status
/// outputs (IRQ: data ready, RFDET: external field present, active low);
/// those are handled in `crate::rcs926`.
mod hardware;
mod transfer;

#[cfg(test)]
pub(crate) mod testing;

pub use self::hardware::{
	Direction,
	Hardware,
	Level,
	Line,
	reliable_sleep,
};

pub use self::transfer::{
	SendTransaction,
	Transfer,
};
