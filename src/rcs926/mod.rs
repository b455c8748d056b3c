/* Chip documentation: http://www.sony.net/Products/felica/business/tech-support */

/// Power, presence and wake handling for the RC-S926 FeliCa Plug.
///
/// The plug carries no protocol state of its own at this layer: the SW
/// line powers it, IRQ tells the host that an initiator delivered data,
/// and RFDET (active low) tells the host that an external field is
/// present. Whether and when to read data out belongs to the protocol
/// stack above.
mod control;
mod wake;

pub use self::control::{
	Activated,
	PlugControl,
};

pub use self::wake::{
	WakeControl,
	WakeDiscipline,
	WakeSource,
	WakeSources,
};
