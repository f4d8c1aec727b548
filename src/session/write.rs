use std::io::{
	Read,
	Seek,
};

use crate::hex;
use crate::image::{
	self,
	ERASED,
};
use crate::serial::{
	Transport,
	TransportExt,
};
use crate::{
	BUFFER_SIZE,
	CHIP_SIZE,
};

use super::PROGRESS_STEP;

/// Answer address requests from the programmer with image data until it
/// requests an address past the chip; returns the number of rounds.
///
/// The programmer drives the transfer: addresses are taken as sent (repeats
/// and jumps included), the session never advances them itself.
pub fn run<T, S>(transport: &mut T, source: &mut S) -> crate::AResult<usize>
where
	T: Transport + ?Sized,
	S: Read + Seek + ?Sized,
{
	let mut rounds = 0usize;

	loop {
		let address = transport.receive_address()?;
		if usize::from(address) >= CHIP_SIZE {
			debug!("{:04X}: end of transfer", address);
			break;
		}
		debug!("{:04X}", address);

		let mut chunk = image::read_chunk_at(source, address)?;
		if !chunk.is_full() {
			warn!("{:04X}: image ends after {} bytes, padding with {:02X}", address, chunk.len(), ERASED);
			chunk.pad(ERASED);
		}

		transport.send_exact(&hex::encode(&chunk))?;
		rounds += 1;

		let next = usize::from(address) + BUFFER_SIZE;
		if 0 == next % PROGRESS_STEP {
			info!("Sent {:04X} / {:04X}", next, CHIP_SIZE);
		}
	}

	Ok(rounds)
}
