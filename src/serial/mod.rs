//! Serial link to the EEPROM programmer
//!
//! The programmer is a microcontroller board attached through a serial line
//! (9600 8N1, raw, no flow control).  Every run starts with a single command
//! byte from the host:
//!
//! - `R`: READ; the programmer pushes the whole chip as hex text, up to 128
//!   digits (64 bytes) per round, upper case, high nibble first.
//! - `W`: WRITE; each round the programmer sends a 2-byte raw (little endian)
//!   address, the host answers with exactly 128 hex digits of image data
//!   starting at that address.  An address >= 0x8000 ends the transfer.
//! - `U`: UNLOCK (disable software data protection), no further data.
//!
//! The address header is the only binary part of the protocol.

mod ext;
mod transport;
mod tty;

#[cfg(test)]
pub(crate) mod mock;

pub use self::ext::TransportExt;

pub use self::transport::{
	Transport,
	reliable_sleep,
};

pub use self::tty::{
	Baud,
	SerialConfig,
	SerialPort,
	open,
};
