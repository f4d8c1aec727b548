use std::io::Write;

use crate::hex;
use crate::serial::{
	Transport,
	TransportExt,
};
use crate::CHIP_SIZE;

use super::PROGRESS_STEP;

/// Pull the whole chip into `sink`; returns the number of bytes written.
///
/// The programmer decides how many digits it pushes per round; progress is
/// only measured by decoded bytes.  The last frame is stored completely even
/// if it runs past the chip size.
pub fn run<T, W>(transport: &mut T, sink: &mut W) -> crate::AResult<usize>
where
	T: Transport + ?Sized,
	W: Write + ?Sized,
{
	let mut offset = 0usize;

	while offset < CHIP_SIZE {
		debug!("{:04X}", offset);
		let frame = transport.receive_frame()?;

		let invalid = frame.invalid_digits();
		if 0 != invalid {
			warn!("{:04X}: {} invalid hex digits in frame, decoded as 0: {}", offset, invalid, frame);
		}

		let chunk = hex::decode(&frame);
		sink.write_all(&chunk)?;

		let previous = offset;
		offset += chunk.len();
		if previous / PROGRESS_STEP != offset / PROGRESS_STEP {
			info!("Received {:04X} / {:04X}", offset, CHIP_SIZE);
		}
	}

	sink.flush()?;
	Ok(offset)
}
