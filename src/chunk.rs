//! Bounded protocol buffers
//!
//! A `Chunk` holds up to `BUFFER_SIZE` binary bytes, a `Frame` holds its
//! ASCII hex representation (up to `FRAME_SIZE` digits, always an even
//! count).  Both carry their own length; the length limits are checked when
//! they are built, not by the code using them.

use std::fmt;
use std::ops::Deref;

use crate::{
	BUFFER_SIZE,
	FRAME_SIZE,
	ProtocolError,
};

#[derive(Clone, Copy)]
pub struct Chunk {
	data: [u8; BUFFER_SIZE],
	len: usize,
}

impl Chunk {
	pub fn new() -> Self {
		Chunk {
			data: [0u8; BUFFER_SIZE],
			len: 0,
		}
	}

	pub fn from_slice(data: &[u8]) -> Result<Self, ProtocolError> {
		if data.len() > BUFFER_SIZE {
			return Err(ProtocolError::ChunkTooLong { len: data.len() });
		}
		let mut chunk = Chunk::new();
		chunk.data[..data.len()].copy_from_slice(data);
		chunk.len = data.len();
		Ok(chunk)
	}

	pub fn len(&self) -> usize {
		self.len
	}

	pub fn is_empty(&self) -> bool {
		0 == self.len
	}

	pub fn is_full(&self) -> bool {
		BUFFER_SIZE == self.len
	}

	pub fn as_slice(&self) -> &[u8] {
		&self.data[..self.len]
	}

	/// fill the remaining space with `value`
	pub fn pad(&mut self, value: u8) {
		for b in &mut self.data[self.len..] {
			*b = value;
		}
		self.len = BUFFER_SIZE;
	}

	// space after the current content
	pub(crate) fn unfilled_mut(&mut self) -> &mut [u8] {
		&mut self.data[self.len..]
	}

	pub(crate) fn advance(&mut self, count: usize) {
		assert!(count <= BUFFER_SIZE - self.len);
		self.len += count;
	}

	// full backing storage; caller sets the length afterwards
	pub(crate) fn storage_mut(&mut self) -> &mut [u8; BUFFER_SIZE] {
		&mut self.data
	}

	pub(crate) fn set_len(&mut self, len: usize) {
		assert!(len <= BUFFER_SIZE);
		self.len = len;
	}
}

impl Default for Chunk {
	fn default() -> Self {
		Chunk::new()
	}
}

impl Deref for Chunk {
	type Target = [u8];

	fn deref(&self) -> &Self::Target {
		self.as_slice()
	}
}

impl PartialEq for Chunk {
	fn eq(&self, other: &Self) -> bool {
		self.as_slice() == other.as_slice()
	}
}

impl Eq for Chunk {}

impl fmt::Debug for Chunk {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.debug_list().entries(self.as_slice()).finish()
	}
}

#[derive(Clone, Copy)]
pub struct Frame {
	data: [u8; FRAME_SIZE],
	len: usize,
}

impl Frame {
	/// wrap hex text as received from the device
	pub fn from_received(data: &[u8]) -> Result<Self, ProtocolError> {
		if data.len() > FRAME_SIZE {
			return Err(ProtocolError::FrameTooLong { len: data.len() });
		}
		if 0 != data.len() % 2 {
			return Err(ProtocolError::OddFrameLength { len: data.len() });
		}
		let mut frame = Frame {
			data: [0u8; FRAME_SIZE],
			len: data.len(),
		};
		frame.data[..data.len()].copy_from_slice(data);
		Ok(frame)
	}

	pub(crate) fn from_parts(data: [u8; FRAME_SIZE], len: usize) -> Self {
		assert!(len <= FRAME_SIZE && 0 == len % 2);
		Frame { data, len }
	}

	/// number of hex digits
	pub fn len(&self) -> usize {
		self.len
	}

	pub fn is_empty(&self) -> bool {
		0 == self.len
	}

	/// number of bytes this frame decodes to
	pub fn chunk_len(&self) -> usize {
		self.len / 2
	}

	pub fn as_bytes(&self) -> &[u8] {
		&self.data[..self.len]
	}

	/// count of characters the permissive decoder will treat as `0`
	pub fn invalid_digits(&self) -> usize {
		self.as_bytes().iter().filter(|&&c| !crate::hex::is_hex_digit(c)).count()
	}
}

impl Deref for Frame {
	type Target = [u8];

	fn deref(&self) -> &Self::Target {
		self.as_bytes()
	}
}

impl PartialEq for Frame {
	fn eq(&self, other: &Self) -> bool {
		self.as_bytes() == other.as_bytes()
	}
}

impl Eq for Frame {}

impl fmt::Display for Frame {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str(&String::from_utf8_lossy(self.as_bytes()))
	}
}

impl fmt::Debug for Frame {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "Frame({:?})", String::from_utf8_lossy(self.as_bytes()))
	}
}
