use failure::Fail;

/// Fatal protocol violations; none of them is retried.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Fail)]
pub enum ProtocolError {
	#[fail(display = "Tried to send {}, but only sent {}", expected, sent)]
	ShortWrite {
		expected: usize,
		sent: usize,
	},
	#[fail(display = "Odd number of bytes in frame ({})", len)]
	OddFrameLength {
		len: usize,
	},
	#[fail(display = "Frame too long: {} hex digits", len)]
	FrameTooLong {
		len: usize,
	},
	#[fail(display = "Chunk too long: {} bytes", len)]
	ChunkTooLong {
		len: usize,
	},
	#[fail(display = "No input file")]
	MissingInput,
	#[fail(display = "No output file")]
	MissingOutput,
	#[fail(display = "Serial line closed by remote")]
	TransportClosed,
}
