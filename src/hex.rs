//! ASCII hex transcoding of protocol chunks
//!
//! Upper case digits only, high nibble first.  Decoding is permissive: the
//! programmer firmware only ever sends `0-9A-F`, anything else is read as a
//! zero nibble instead of failing the whole transfer.

use crate::{
	Chunk,
	Frame,
	BUFFER_SIZE,
	FRAME_SIZE,
};

const DIGITS: &[u8; 16] = b"0123456789ABCDEF";

pub fn is_hex_digit(c: u8) -> bool {
	match c {
		b'0'..=b'9' | b'A'..=b'F' => true,
		_ => false,
	}
}

fn nibble_to_ascii(val: u8) -> u8 {
	DIGITS[(val & 0xf) as usize]
}

fn ascii_to_nibble(digit: u8) -> u8 {
	match digit {
		b'0'..=b'9' => digit - b'0',
		b'A'..=b'F' => digit - b'A' + 10,
		_ => 0,
	}
}

/// encode `source` into the first `2 * source.len()` bytes of `dest`
pub fn encode_into(source: &[u8], dest: &mut [u8]) {
	assert!(dest.len() >= 2 * source.len());
	for (i, b) in source.iter().enumerate() {
		dest[2 * i] = nibble_to_ascii(b >> 4);
		dest[2 * i + 1] = nibble_to_ascii(b & 0xf);
	}
}

/// decode pairs of digits from `source` into `dest`; `source` must have even length
pub fn decode_into(source: &[u8], dest: &mut [u8]) {
	assert!(0 == source.len() % 2);
	assert!(dest.len() >= source.len() / 2);
	for (i, pair) in source.chunks(2).enumerate() {
		dest[i] = ascii_to_nibble(pair[0]) << 4 | ascii_to_nibble(pair[1]);
	}
}

pub fn encode(source: &Chunk) -> Frame {
	let mut data = [0u8; FRAME_SIZE];
	encode_into(source.as_slice(), &mut data);
	Frame::from_parts(data, 2 * source.len())
}

pub fn decode(frame: &Frame) -> Chunk {
	let mut chunk = Chunk::new();
	let len = frame.chunk_len();
	debug_assert!(len <= BUFFER_SIZE);
	decode_into(frame.as_bytes(), chunk.storage_mut());
	chunk.set_len(len);
	chunk
}
