use crate::{
	Frame,
	ProtocolError,
	FRAME_SIZE,
};

use super::Transport;

pub trait TransportExt: Transport {
	/// send all of `data` in one write; a short write is fatal
	fn send_exact(&mut self, data: &[u8]) -> crate::AResult<()> {
		let sent = self.send(data)?;
		if sent != data.len() {
			return Err(ProtocolError::ShortWrite {
				expected: data.len(),
				sent,
			}.into());
		}
		Ok(())
	}

	/// receive up to one frame worth of hex digits
	///
	/// The programmer doesn't necessarily push a full frame per round; the
	/// length is whatever a single receive returned, but must be even.
	fn receive_frame(&mut self) -> crate::AResult<Frame> {
		let mut buf = [0u8; FRAME_SIZE];
		let len = self.receive(&mut buf)?;
		let frame = Frame::from_received(&buf[..len])?;
		if frame.is_empty() {
			return Err(ProtocolError::TransportClosed.into());
		}
		Ok(frame)
	}

	/// receive the raw 2-byte address header (little endian)
	fn receive_address(&mut self) -> crate::AResult<u16> {
		let mut buf = [0u8; 2];
		let mut filled = 0;
		while filled < buf.len() {
			let len = self.receive(&mut buf[filled..])?;
			if 0 == len {
				return Err(ProtocolError::TransportClosed.into());
			}
			filled += len;
		}
		Ok(u16::from_le_bytes(buf))
	}
}

impl<T: Transport + ?Sized> TransportExt for T {
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::serial::mock::ScriptedTransport;

	#[test]
	fn short_send_is_fatal() {
		let mut t = ScriptedTransport::new().with_send_limit(3);
		let e = t.send_exact(b"ABCD").unwrap_err();
		assert_eq!(e.downcast_ref::<ProtocolError>(), Some(&ProtocolError::ShortWrite { expected: 4, sent: 3 }));
	}

	#[test]
	fn frame_length_is_what_was_received() {
		let mut t = ScriptedTransport::new().incoming(b"00FF");
		let frame = t.receive_frame().unwrap();
		assert_eq!(frame.as_bytes(), b"00FF");
	}

	#[test]
	fn odd_frame_is_rejected() {
		let mut t = ScriptedTransport::new().incoming(b"00F");
		let e = t.receive_frame().unwrap_err();
		assert_eq!(e.downcast_ref::<ProtocolError>(), Some(&ProtocolError::OddFrameLength { len: 3 }));
	}

	#[test]
	fn address_is_little_endian_and_may_arrive_split() {
		let mut t = ScriptedTransport::new().incoming(&[0x40]).incoming(&[0x7f]);
		assert_eq!(t.receive_address().unwrap(), 0x7f40);
	}

	#[test]
	fn empty_receive_means_closed_line() {
		let mut t = ScriptedTransport::new();
		let e = t.receive_frame().unwrap_err();
		assert_eq!(e.downcast_ref::<ProtocolError>(), Some(&ProtocolError::TransportClosed));
		assert_eq!(t.receives, 1);
	}

	#[test]
	fn closed_line_is_reported() {
		let mut t = ScriptedTransport::new().incoming(&[0x00]);
		let e = t.receive_address().unwrap_err();
		assert_eq!(e.downcast_ref::<ProtocolError>(), Some(&ProtocolError::TransportClosed));
	}
}
