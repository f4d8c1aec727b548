#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;

macro_rules! with_context {
	(( $fmt:tt $($t:tt)* ), $e:expr) => {{
		use failure::Error;

		match (|| { $e })() {
			Ok(v) => Ok(v),
			Err(e) => {
				let e: Error = e;
				let msg = format!(concat!($fmt, ": {}") $($t)*, e);
				Err(Error::from(e.context(msg)))
			}
		}
	}};

	($msg:expr, $e:expr) => {
		with_context!(("{}", $msg), $e)
	};
}

pub type AResult<T> = Result<T, failure::Error>;

/// Size of the supported chip (28C256 family: 32 KiB)
pub const CHIP_SIZE: usize = 0x8000;
/// Bytes exchanged per protocol round
pub const BUFFER_SIZE: usize = 64;
/// Hex digits exchanged per protocol round
pub const FRAME_SIZE: usize = BUFFER_SIZE * 2;

/// Image file used for reading when no filename was given
pub const DEFAULT_FILENAME: &str = "file.bin";

pub mod chunk;
mod error;
pub mod hex;
pub mod image;
pub mod serial;
pub mod session;

pub use self::chunk::{
	Chunk,
	Frame,
};

pub use self::error::ProtocolError;
