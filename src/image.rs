//! Chip image files
//!
//! Sessions work on any `Read + Write + Seek`; these helpers open the file
//! backing a run and read image chunks at device supplied addresses.

use std::fs;
use std::io::{
	self,
	Read,
	Seek,
	SeekFrom,
	Write,
};
use std::path::Path;

use crate::session::Command;
use crate::{
	Chunk,
	ProtocolError,
	DEFAULT_FILENAME,
};

/// Backing store of a session: sink for READ, source for WRITE
pub trait ChipImage: Read + Write + Seek {
}

impl<T: Read + Write + Seek> ChipImage for T {
}

/// Value of an erased EEPROM cell; used to pad images shorter than the chip
pub const ERASED: u8 = 0xff;

/// image file a command works on
///
/// READ falls back to `DEFAULT_FILENAME`, WRITE needs an explicit file; the
/// other commands don't use one.  Checked before any device is opened.
pub fn resolve_path(command: Command, filename: Option<&str>) -> Result<Option<&str>, ProtocolError> {
	match (command, filename) {
		(Command::Read, None) => {
			info!("Using default filename {}", DEFAULT_FILENAME);
			Ok(Some(DEFAULT_FILENAME))
		},
		(Command::Read, Some(filename)) | (Command::Write, Some(filename)) => Ok(Some(filename)),
		(Command::Write, None) => Err(ProtocolError::MissingInput),
		(Command::Erase, _) | (Command::Unlock, _) => Ok(None),
	}
}

/// create (or truncate) the file a READ session stores the chip image in
pub fn create_sink<P: AsRef<Path>>(path: P) -> crate::AResult<fs::File> {
	let path = path.as_ref();
	with_context!(("couldn't create output file {}", path.display()), {
		Ok(fs::OpenOptions::new()
			.read(true)
			.write(true)
			.create(true)
			.truncate(true)
			.open(path)?)
	})
}

/// open the image a WRITE session sends to the chip
pub fn open_source<P: AsRef<Path>>(path: P) -> crate::AResult<fs::File> {
	let path = path.as_ref();
	with_context!(("couldn't open input file {}", path.display()), {
		let file = fs::File::open(path)?;
		let len = file.metadata()?.len();
		if len != crate::CHIP_SIZE as u64 {
			warn!("{}: image has {} bytes, chip has {}", path.display(), len, crate::CHIP_SIZE);
		}
		Ok(file)
	})
}

/// read up to one chunk starting at `address`
///
/// Partial reads are retried until the chunk is full; a short chunk means
/// the source ended.
pub fn read_chunk_at<S>(source: &mut S, address: u16) -> crate::AResult<Chunk>
where
	S: Read + Seek + ?Sized,
{
	source.seek(SeekFrom::Start(u64::from(address)))?;

	let mut chunk = Chunk::new();
	while !chunk.is_full() {
		match source.read(chunk.unfilled_mut()) {
			Ok(0) => break,
			Ok(n) => chunk.advance(n),
			Err(ref e) if e.kind() == io::ErrorKind::Interrupted => {},
			Err(e) => return Err(e.into()),
		}
	}
	Ok(chunk)
}
